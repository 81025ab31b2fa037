// ============================================================
// Layer 5: Training Loop
// ============================================================
// Train + validation loop using Burn's DataLoader.
//
//   - Training uses an Autodiff backend for gradients
//   - model.valid() returns the model on the inner backend with
//     dropout disabled; validation batches use that backend too
//   - The optimiser is chosen at runtime (adam | sgd), so the epoch
//     loop is generic over the optimiser type
//
// Reference: Burn Book §5, Kingma & Ba (2015) Adam

use std::fmt;
use std::str::FromStr;

use anyhow::Result;
use burn::{
    data::dataloader::DataLoaderBuilder,
    module::AutodiffModule,
    optim::{AdamConfig, GradientsParams, Optimizer, SgdConfig},
    prelude::*,
    tensor::backend::AutodiffBackend,
};
use serde::{Deserialize, Serialize};

use crate::application::train_use_case::TrainConfig;
use crate::data::{batcher::BlurbBatcher, dataset::BlurbDataset};
use crate::infra::checkpoint::CheckpointManager;
use crate::infra::metrics::{EpochMetrics, MetricsLogger};
use crate::ml::evaluator::evaluate_batches;
use crate::ml::model::{count_correct, EmbeddingClassifier};

type MyBackend = burn::backend::Autodiff<burn::backend::Wgpu>;

// ─── OptimizerKind ────────────────────────────────────────────────────────────
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OptimizerKind {
    Adam,
    Sgd,
}

impl fmt::Display for OptimizerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OptimizerKind::Adam => write!(f, "adam"),
            OptimizerKind::Sgd  => write!(f, "sgd"),
        }
    }
}

impl FromStr for OptimizerKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "adam" => Ok(OptimizerKind::Adam),
            "sgd"  => Ok(OptimizerKind::Sgd),
            other  => Err(format!("unknown optimizer '{other}', expected 'adam' or 'sgd'")),
        }
    }
}

// ─── TrainingHistory ──────────────────────────────────────────────────────────
/// Per-epoch metrics of one training run, in epoch order.
#[derive(Debug, Clone, Default)]
pub struct TrainingHistory {
    pub epochs: Vec<EpochMetrics>,
}

impl TrainingHistory {
    pub fn last(&self) -> Option<&EpochMetrics> {
        self.epochs.last()
    }

    /// Epoch with the lowest validation loss. NaN losses never win.
    pub fn best_epoch(&self) -> Option<&EpochMetrics> {
        self.epochs
            .iter()
            .filter(|m| !m.val_loss.is_nan())
            .min_by(|a, b| a.val_loss.total_cmp(&b.val_loss))
    }
}

/// Train on the default GPU device.
pub fn run_training(
    cfg:           &TrainConfig,
    train_dataset: BlurbDataset,
    val_dataset:   BlurbDataset,
    ckpt_manager:  &CheckpointManager,
    metrics:       &MetricsLogger,
) -> Result<(EmbeddingClassifier<burn::backend::Wgpu>, TrainingHistory)> {
    let device = burn::backend::wgpu::WgpuDevice::default();
    tracing::info!("Using WGPU device: {:?}", device);
    let (model, history) =
        train_loop::<MyBackend>(cfg, train_dataset, val_dataset, ckpt_manager, metrics, device)?;
    Ok((model.valid(), history))
}

/// Build a fresh model and train it with the configured optimiser.
pub fn train_loop<B: AutodiffBackend>(
    cfg:           &TrainConfig,
    train_dataset: BlurbDataset,
    val_dataset:   BlurbDataset,
    ckpt_manager:  &CheckpointManager,
    metrics:       &MetricsLogger,
    device:        B::Device,
) -> Result<(EmbeddingClassifier<B>, TrainingHistory)> {
    let model: EmbeddingClassifier<B> = cfg.model_config().init(&device);
    tracing::info!(
        "Model ready: embed_dim={}, hidden_dim={}, optimizer={}",
        cfg.embed_dim, cfg.hidden_dim, cfg.optimizer
    );

    match cfg.optimizer {
        OptimizerKind::Adam => {
            let optim = AdamConfig::new()
                .with_epsilon(1e-8)
                .init::<B, EmbeddingClassifier<B>>();
            epoch_loop(cfg, model, optim, train_dataset, val_dataset, ckpt_manager, metrics, device)
        }
        OptimizerKind::Sgd => {
            let optim = SgdConfig::new().init::<B, EmbeddingClassifier<B>>();
            epoch_loop(cfg, model, optim, train_dataset, val_dataset, ckpt_manager, metrics, device)
        }
    }
}

#[allow(clippy::too_many_arguments)]
fn epoch_loop<B, O>(
    cfg:           &TrainConfig,
    mut model:     EmbeddingClassifier<B>,
    mut optim:     O,
    train_dataset: BlurbDataset,
    val_dataset:   BlurbDataset,
    ckpt_manager:  &CheckpointManager,
    metrics:       &MetricsLogger,
    device:        B::Device,
) -> Result<(EmbeddingClassifier<B>, TrainingHistory)>
where
    B: AutodiffBackend,
    O: Optimizer<EmbeddingClassifier<B>, B>,
{
    // ── Training data loader (AutodiffBackend) ────────────────────────────────
    let train_batcher = BlurbBatcher::<B>::new(device.clone());
    let train_loader  = DataLoaderBuilder::new(train_batcher)
        .batch_size(cfg.batch_size)
        .shuffle(cfg.seed)
        .num_workers(1)
        .build(train_dataset);

    // ── Validation data loader (InnerBackend, no autodiff overhead) ───────────
    let val_batcher = BlurbBatcher::<B::InnerBackend>::new(device.clone());
    let val_loader  = DataLoaderBuilder::new(val_batcher)
        .batch_size(cfg.batch_size)
        .num_workers(1)
        .build(val_dataset);

    let mut history = TrainingHistory::default();

    for epoch in 1..=cfg.epochs {

        // ── Training phase ────────────────────────────────────────────────────
        let mut loss_sum = 0.0f64;
        let mut correct  = 0usize;
        let mut seen     = 0usize;

        for batch in train_loader.iter() {
            let batch_size = batch.labels.dims()[0];
            let output     = model.forward_loss(batch.input_ids, batch.labels.clone());

            loss_sum += output.loss.clone().into_scalar().elem::<f64>() * batch_size as f64;
            correct  += count_correct(output.logits, batch.labels);
            seen     += batch_size;

            // Backward pass + optimiser update
            let grads = output.loss.backward();
            let grads = GradientsParams::from_grads(grads, &model);
            model = optim.step(cfg.lr, model, grads);
        }

        let train_loss = if seen > 0 { loss_sum / seen as f64 } else { f64::NAN };
        let train_acc  = if seen > 0 { correct as f64 / seen as f64 } else { 0.0 };

        // ── Validation phase ──────────────────────────────────────────────────
        let report = evaluate_batches(&model.valid(), val_loader.iter());

        let m = EpochMetrics::new(epoch, train_loss, train_acc, report.loss, report.accuracy);
        println!(
            "Epoch {:>3}/{} | loss={:.4} | acc={:.1}% | val_loss={:.4} | val_acc={:.1}%",
            epoch, cfg.epochs, m.train_loss, m.train_acc * 100.0, m.val_loss, m.val_acc * 100.0,
        );
        metrics.log(&m)?;
        history.epochs.push(m);

        ckpt_manager.save_model(&model, epoch)?;
        tracing::info!("Checkpoint saved for epoch {}", epoch);
    }

    tracing::info!("Training complete!");
    Ok((model, history))
}
