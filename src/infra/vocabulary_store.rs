// ============================================================
// Layer 6: Vocabulary Persistence
// ============================================================
// Saves the frozen vocabulary as pretty JSON so it can be
// inspected by hand, and loads it back with validation.
//
// The vocabulary is written ONCE, by the train command, right
// after it is fitted on the training split. Every later command
// (evaluate, predict, encode) loads this file and never fits.

use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

use crate::data::vocabulary::Vocabulary;
use crate::domain::traits::Persistable;

impl Persistable for Vocabulary {
    fn save(&self, path: &str) -> Result<()> {
        if let Some(parent) = Path::new(path).parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Cannot create directory '{}'", parent.display()))?;
        }
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)
            .with_context(|| format!("Cannot write vocabulary to '{path}'"))?;

        tracing::info!("Vocabulary ({} tokens) saved to '{}'", self.len(), path);
        Ok(())
    }

    fn load(path: &str) -> Result<Self> {
        let json = fs::read_to_string(path)
            .with_context(|| format!(
                "Cannot read vocabulary from '{path}'. Have you run 'train' first?"
            ))?;
        let vocab: Vocabulary = serde_json::from_str(&json)
            .with_context(|| format!("Invalid vocabulary in '{path}'"))?;

        tracing::debug!("Loaded vocabulary with {} tokens", vocab.len());
        Ok(vocab)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::tokenizer::WordTokenizer;

    #[test]
    fn test_save_creates_missing_parent() {
        let dir   = tempfile::tempdir().unwrap();
        let path  = dir.path().join("nested").join("vocab.json");
        let path  = path.to_string_lossy();
        let vocab = Vocabulary::fit(&["x y"], 5, &WordTokenizer::new()).unwrap();

        vocab.save(&path).unwrap();
        assert_eq!(Vocabulary::load(&path).unwrap(), vocab);
    }

    #[test]
    fn test_unusable_parent_is_reported() {
        let dir     = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("blocker");
        fs::write(&blocker, "not a directory").unwrap();
        let path  = blocker.join("vocab.json");
        let vocab = Vocabulary::fit(&["x y"], 5, &WordTokenizer::new()).unwrap();

        let err = vocab.save(&path.to_string_lossy()).unwrap_err();
        assert!(err.to_string().contains("Cannot create directory"), "{err}");
    }

    #[test]
    fn test_corrupt_file_is_reported() {
        let dir  = tempfile::tempdir().unwrap();
        let path = dir.path().join("vocab.json");
        fs::write(&path, r#"{"max_size":3,"entries":[{"token":"","count":1}]}"#).unwrap();

        let err = Vocabulary::load(&path.to_string_lossy()).unwrap_err();
        assert!(format!("{err:#}").contains("empty token"));
    }
}
