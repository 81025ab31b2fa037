// ============================================================
// Layer 2: EvaluateUseCase
// ============================================================
// Scores a trained checkpoint on a labelled CSV file:
//
//   Step 1: Load config + frozen vocabulary   (Layer 6 - infra)
//   Step 2: Load labelled blurbs              (Layer 4 - data)
//   Step 3: Encode with the LOADED vocabulary (Layer 4 - data)
//   Step 4: Rebuild model, load weights       (Layer 6 - infra)
//   Step 5: Loss + accuracy                   (Layer 5 - ml)
//
// Column names default to the ones used at training time.

use std::sync::Arc;

use anyhow::{bail, Result};

use crate::data::{dataset::BlurbDataset, encoder::SequenceEncoder, loader::CsvLoader};
use crate::domain::blurb::Blurb;
use crate::domain::traits::DocumentSource;
use crate::infra::checkpoint::CheckpointManager;
use crate::ml::evaluator::{evaluate, EvaluationReport};
use crate::ml::model::EmbeddingClassifier;

type EvalBackend = burn::backend::Wgpu;

pub struct EvaluateUseCase {
    checkpoint_dir: String,
    data_path:      String,
    text_column:    Option<String>,
    label_column:   Option<String>,
    batch_size:     usize,
}

impl EvaluateUseCase {
    pub fn new(
        checkpoint_dir: impl Into<String>,
        data_path:      impl Into<String>,
        text_column:    Option<String>,
        label_column:   Option<String>,
        batch_size:     usize,
    ) -> Self {
        Self {
            checkpoint_dir: checkpoint_dir.into(),
            data_path:      data_path.into(),
            text_column,
            label_column,
            batch_size,
        }
    }

    pub fn execute(&self) -> Result<EvaluationReport> {
        if self.batch_size == 0 {
            bail!("batch size must be greater than 0");
        }

        // ── Step 1 ────────────────────────────────────────────────────────────
        let ckpt_manager = CheckpointManager::new(&self.checkpoint_dir);
        let (cfg, vocab) = ckpt_manager.load_artifacts()?;
        let encoder      = SequenceEncoder::new(cfg.encoder.clone())?
            .with_vocabulary(Arc::new(vocab))?;

        // ── Step 2 ────────────────────────────────────────────────────────────
        let text_column  = self.text_column.as_deref().unwrap_or(&cfg.text_column);
        let label_column = self.label_column.as_deref().unwrap_or(&cfg.label_column);
        let blurbs = CsvLoader::new(&self.data_path, text_column, label_column).load_all()?;

        // ── Step 3 ────────────────────────────────────────────────────────────
        let dataset = encode_labelled(&encoder, &blurbs)?;

        // ── Step 4 + 5 ────────────────────────────────────────────────────────
        let device = burn::backend::wgpu::WgpuDevice::default();
        let model: EmbeddingClassifier<EvalBackend> = cfg.model_config().init(&device);
        let model  = ckpt_manager.load_model(model, &device)?;

        Ok(evaluate(&model, dataset, self.batch_size, &device))
    }
}

/// Encode blurbs with an already fitted encoder and attach their labels.
pub fn encode_labelled(encoder: &SequenceEncoder, blurbs: &[Blurb]) -> Result<BlurbDataset> {
    let texts: Vec<&str> = blurbs.iter().map(|b| b.text.as_str()).collect();
    let labels: Vec<u8>  = blurbs.iter().map(Blurb::class).collect();
    let matrix = encoder.encode_batch(&texts)?;
    Ok(BlurbDataset::from_encoded(&matrix, &labels))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::encoder::EncoderConfig;
    use crate::data::padding::PadSide;
    use burn::data::dataset::Dataset;

    #[test]
    fn test_encode_labelled_requires_fitted_encoder() {
        let encoder = SequenceEncoder::new(EncoderConfig::default()).unwrap();
        let err     = encode_labelled(&encoder, &[Blurb::new("x", true)]).unwrap_err();
        assert!(err.to_string().contains("not been fitted"));
    }

    #[test]
    fn test_encode_labelled_keeps_labels() {
        let mut encoder = SequenceEncoder::new(EncoderConfig::new(10, 2, PadSide::Post, PadSide::Post)).unwrap();
        encoder.fit(&["alpha beta"]).unwrap();
        let ds = encode_labelled(&encoder, &[Blurb::new("beta", false), Blurb::new("alpha", true)]).unwrap();
        assert_eq!(ds.get(0).unwrap().input_ids, vec![2, 0]);
        assert_eq!(ds.get(0).unwrap().label, 0);
        assert_eq!(ds.get(1).unwrap().label, 1);
    }

    #[test]
    fn test_missing_checkpoint_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let uc  = EvaluateUseCase::new(dir.path().display().to_string(), "unused.csv", None, None, 8);
        let err = uc.execute().unwrap_err();
        assert!(err.to_string().contains("train_config.json"));
    }
}
