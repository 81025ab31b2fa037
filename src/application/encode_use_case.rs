// ============================================================
// Layer 2: EncodeUseCase
// ============================================================
// Shows exactly what the model sees for a few documents:
// the encoded row and the tokens that survived the vocabulary
// and truncation.
//
// The shape settings default to the trained ones but can be
// overridden, which makes the effect of the padding and
// truncating sides easy to compare on the same vocabulary:
//
//   encode --text "a b" --text "a b c d e f g h" --seq-len 6 --padding pre  --truncating post
//   encode --text "a b" --text "a b c d e f g h" --seq-len 6 --padding post --truncating post

use std::sync::Arc;

use anyhow::Result;

use crate::data::encoder::{EncoderConfig, SequenceEncoder};
use crate::data::padding::PadSide;
use crate::data::vocabulary::Vocabulary;
use crate::infra::checkpoint::CheckpointManager;

/// Optional replacements for the trained encoder shape.
#[derive(Debug, Clone, Default)]
pub struct EncodeOverrides {
    pub seq_len:    Option<usize>,
    pub padding:    Option<PadSide>,
    pub truncating: Option<PadSide>,
}

impl EncodeOverrides {
    pub fn apply(&self, base: &EncoderConfig) -> EncoderConfig {
        EncoderConfig {
            vocab_size: base.vocab_size,
            seq_len:    self.seq_len.unwrap_or(base.seq_len),
            padding:    self.padding.unwrap_or(base.padding),
            truncating: self.truncating.unwrap_or(base.truncating),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct EncodedRow {
    pub text:     String,
    pub indices:  Vec<u32>,
    /// Tokens that survived, in row order
    pub retained: Vec<String>,
}

pub struct EncodeUseCase {
    encoder: SequenceEncoder,
}

impl EncodeUseCase {
    /// Load the trained vocabulary and config from a checkpoint directory.
    pub fn from_checkpoint(checkpoint_dir: impl Into<String>, overrides: &EncodeOverrides) -> Result<Self> {
        let ckpt_manager = CheckpointManager::new(checkpoint_dir);
        let (cfg, vocab) = ckpt_manager.load_artifacts()?;
        Self::new(Arc::new(vocab), overrides.apply(&cfg.encoder))
    }

    pub fn new(vocabulary: Arc<Vocabulary>, config: EncoderConfig) -> Result<Self> {
        let encoder = SequenceEncoder::new(config)?.with_vocabulary(vocabulary)?;
        Ok(Self { encoder })
    }

    pub fn config(&self) -> &EncoderConfig {
        self.encoder.config()
    }

    pub fn execute(&self, texts: &[String]) -> Result<Vec<EncodedRow>> {
        let matrix = self.encoder.encode_batch(texts)?;
        let vocab  = self.encoder.vocabulary();

        Ok(texts
            .iter()
            .zip(matrix.iter())
            .map(|(text, row)| EncodedRow {
                text:     text.clone(),
                indices:  row.to_vec(),
                retained: vocab
                    .map(|v| v.decode(row).into_iter().map(str::to_string).collect())
                    .unwrap_or_default(),
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::train_use_case::TrainConfig;
    use crate::data::tokenizer::WordTokenizer;

    fn alphabet() -> Arc<Vocabulary> {
        Arc::new(Vocabulary::fit(&["a b c d e f g h"], 26, &WordTokenizer::new()).unwrap())
    }

    fn texts() -> Vec<String> {
        vec!["a b".to_string(), "a b c d e f g h".to_string()]
    }

    #[test]
    fn test_overrides_replace_only_given_fields() {
        let base = EncoderConfig::default();
        let cfg  = EncodeOverrides { seq_len: Some(6), ..Default::default() }.apply(&base);
        assert_eq!(cfg.seq_len, 6);
        assert_eq!(cfg.padding, base.padding);
        assert_eq!(cfg.vocab_size, base.vocab_size);
    }

    #[test]
    fn test_rows_show_retained_tokens() {
        let uc   = EncodeUseCase::new(alphabet(), EncoderConfig::new(26, 6, PadSide::Pre, PadSide::Post)).unwrap();
        let rows = uc.execute(&texts()).unwrap();
        assert_eq!(rows[0].indices,  vec![0, 0, 0, 0, 1, 2]);
        assert_eq!(rows[0].retained, vec!["a", "b"]);
        assert_eq!(rows[1].indices,  vec![1, 2, 3, 4, 5, 6]);
        assert_eq!(rows[1].retained, vec!["a", "b", "c", "d", "e", "f"]);
    }

    #[test]
    fn test_post_padding_aligns_rows() {
        let uc   = EncodeUseCase::new(alphabet(), EncoderConfig::new(26, 6, PadSide::Post, PadSide::Post)).unwrap();
        let rows = uc.execute(&texts()).unwrap();
        assert_eq!(rows[0].indices[0], 1);
        assert_eq!(rows[1].indices[0], 1);
    }

    #[test]
    fn test_from_checkpoint_uses_saved_vocabulary() {
        let dir  = tempfile::tempdir().unwrap();
        let ckpt = CheckpointManager::new(dir.path().display().to_string());
        let mut cfg = TrainConfig::default();
        cfg.encoder = EncoderConfig::new(26, 4, PadSide::Pre, PadSide::Pre);
        ckpt.save_config(&cfg).unwrap();
        ckpt.save_vocabulary(&alphabet()).unwrap();

        let overrides = EncodeOverrides { padding: Some(PadSide::Post), ..Default::default() };
        let uc   = EncodeUseCase::from_checkpoint(dir.path().display().to_string(), &overrides).unwrap();
        assert_eq!(uc.config().seq_len, 4);
        assert_eq!(uc.config().padding, PadSide::Post);

        let rows = uc.execute(&["h a".to_string()]).unwrap();
        assert_eq!(rows[0].indices, vec![8, 1, 0, 0]);
    }

    #[test]
    fn test_zero_seq_len_override_is_rejected() {
        let err = EncodeUseCase::new(alphabet(), EncoderConfig::new(26, 0, PadSide::Pre, PadSide::Pre));
        assert!(err.is_err());
    }
}
