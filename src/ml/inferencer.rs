// ============================================================
// Layer 5: Predictor
// ============================================================
use std::sync::Arc;

use anyhow::{anyhow, Result};
use burn::prelude::*;

use crate::data::encoder::SequenceEncoder;
use crate::infra::checkpoint::CheckpointManager;
use crate::ml::model::EmbeddingClassifier;

/// Probability at or above which a blurb is called successful.
pub const DECISION_THRESHOLD: f32 = 0.5;

#[derive(Debug, Clone, PartialEq)]
pub struct Prediction {
    pub text:        String,
    /// P(successful)
    pub probability: f32,
    pub successful:  bool,
}

/// A trained model plus the frozen encoder it was trained with.
pub struct Predictor<B: Backend> {
    model:   EmbeddingClassifier<B>,
    encoder: SequenceEncoder,
    device:  B::Device,
}

impl<B: Backend> Predictor<B> {
    pub fn new(model: EmbeddingClassifier<B>, encoder: SequenceEncoder, device: B::Device) -> Self {
        Self { model, encoder, device }
    }

    /// Rebuild encoder and model from a checkpoint directory.
    /// The vocabulary is LOADED, never re-fitted.
    pub fn from_checkpoint(ckpt_manager: &CheckpointManager, device: B::Device) -> Result<Self> {
        let (cfg, vocab) = ckpt_manager.load_artifacts()?;
        let encoder = SequenceEncoder::new(cfg.encoder.clone())?
            .with_vocabulary(Arc::new(vocab))?;

        let model: EmbeddingClassifier<B> = cfg.model_config().init(&device);
        let model = ckpt_manager.load_model(model, &device)?;
        tracing::info!("Model loaded from checkpoint");

        Ok(Self { model, encoder, device })
    }

    pub fn encoder(&self) -> &SequenceEncoder {
        &self.encoder
    }

    pub fn predict(&self, texts: &[String]) -> Result<Vec<Prediction>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        let matrix = self.encoder.encode_batch(texts)?;
        let flat: Vec<i32> = matrix.as_flat().iter().map(|&x| x as i32).collect();
        let input_ids = Tensor::<B, 1, Int>::from_ints(flat.as_slice(), &self.device)
            .reshape([matrix.rows(), matrix.seq_len()]);

        let probs: Vec<f32> = self.model
            .probabilities(input_ids)
            .into_data()
            .to_vec::<f32>()
            .map_err(|e| anyhow!("Cannot read probabilities: {e:?}"))?;

        Ok(texts
            .iter()
            .zip(probs)
            .map(|(text, probability)| Prediction {
                text: text.clone(),
                probability,
                successful: probability >= DECISION_THRESHOLD,
            })
            .collect())
    }
}
