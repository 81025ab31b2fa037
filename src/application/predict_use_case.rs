// ============================================================
// Layer 2: PredictUseCase
// ============================================================
// Loads a trained checkpoint once and scores new blurbs.
// The vocabulary comes from disk; nothing is fitted here.

use anyhow::{bail, Result};

use crate::infra::checkpoint::CheckpointManager;
use crate::ml::inferencer::{Prediction, Predictor};

type InferBackend = burn::backend::Wgpu;

pub struct PredictUseCase {
    predictor: Predictor<InferBackend>,
}

impl PredictUseCase {
    pub fn new(checkpoint_dir: impl Into<String>) -> Result<Self> {
        let ckpt_manager = CheckpointManager::new(checkpoint_dir);
        let device       = burn::backend::wgpu::WgpuDevice::default();
        let predictor    = Predictor::from_checkpoint(&ckpt_manager, device)?;
        Ok(Self { predictor })
    }

    pub fn predict(&self, texts: &[String]) -> Result<Vec<Prediction>> {
        if texts.is_empty() {
            bail!("Nothing to predict: pass at least one --text");
        }
        self.predictor.predict(texts)
    }
}
