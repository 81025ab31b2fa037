// ============================================================
// Layer 2: TrainUseCase
// ============================================================
// Orchestrates the full training pipeline in order:
//
//   Step 1: Load labelled blurbs          (Layer 4 - data)
//   Step 2: Split off the TEST set        (Layer 4 - data)
//   Step 3: Fit vocabulary on TRAIN only  (Layer 4 - data)
//   Step 4: Encode train and test         (Layer 4 - data)
//   Step 5: Split train into fit/val      (Layer 4 - data)
//   Step 6: Save config + vocabulary      (Layer 6 - infra)
//   Step 7: Run training loop             (Layer 5 - ml)
//   Step 8: Evaluate on the test set      (Layer 5 - ml)
//
// Step 2 MUST happen before Step 3. Fitting the vocabulary on
// all blurbs would let test-set words shape the features the
// model is later scored on.
//
// Reference: Burn Book §5 (Training)

use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};

use crate::data::{
    dataset::{samples_from_encoded, BlurbDataset},
    encoder::{EncoderConfig, SequenceEncoder},
    loader::CsvLoader,
    splitter::split_train_val,
};
use crate::domain::blurb::Blurb;
use crate::domain::traits::DocumentSource;
use crate::infra::{checkpoint::CheckpointManager, metrics::MetricsLogger};
use crate::ml::evaluator::{evaluate, EvaluationReport};
use crate::ml::model::EmbeddingClassifierConfig;
use crate::ml::trainer::{run_training, OptimizerKind, TrainingHistory};

// ─── Training Configuration ──────────────────────────────────────────────────
// All settings for a training run. Saved as JSON next to the
// checkpoints so inference can rebuild the same encoder and model.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainConfig {
    pub data_path:        String,
    pub text_column:      String,
    pub label_column:     String,
    pub checkpoint_dir:   String,
    pub encoder:          EncoderConfig,
    pub embed_dim:        usize,
    pub hidden_dim:       usize,
    pub dropout:          f64,
    pub optimizer:        OptimizerKind,
    pub lr:               f64,
    pub batch_size:       usize,
    pub epochs:           usize,
    pub validation_split: f64,
    pub test_split:       f64,
    pub seed:             u64,
}

impl Default for TrainConfig {
    fn default() -> Self {
        Self {
            data_path:        "data/blurbs.csv".to_string(),
            text_column:      "blurb".to_string(),
            label_column:     "state".to_string(),
            checkpoint_dir:   "checkpoints".to_string(),
            encoder:          EncoderConfig::default(),
            embed_dim:        8,
            hidden_dim:       32,
            dropout:          0.2,
            optimizer:        OptimizerKind::Adam,
            lr:               1e-3,
            batch_size:       32,
            epochs:           10,
            validation_split: 0.2,
            test_split:       0.2,
            seed:             42,
        }
    }
}

impl TrainConfig {
    /// Model architecture implied by this config.
    /// The embedding table has one extra row for the padding index.
    pub fn model_config(&self) -> EmbeddingClassifierConfig {
        EmbeddingClassifierConfig::new(self.encoder.vocab_size + 1, self.encoder.seq_len)
            .with_embed_dim(self.embed_dim)
            .with_hidden_dim(self.hidden_dim)
            .with_dropout(self.dropout)
    }

    pub fn validate(&self) -> Result<()> {
        self.encoder.validate()?;
        if self.batch_size == 0 {
            bail!("batch size must be greater than 0");
        }
        if self.epochs == 0 {
            bail!("epochs must be greater than 0");
        }
        if self.embed_dim == 0 || self.hidden_dim == 0 {
            bail!("embedding and hidden dimensions must be greater than 0");
        }
        for (name, value) in [("validation split", self.validation_split), ("test split", self.test_split)] {
            if !(0.0..1.0).contains(&value) {
                bail!("{name} must be in [0, 1), got {value}");
            }
        }
        if !(0.0..1.0).contains(&self.dropout) {
            bail!("dropout must be in [0, 1), got {}", self.dropout);
        }
        Ok(())
    }
}

// ─── Prepared datasets ───────────────────────────────────────────────────────
/// Encoded splits plus the encoder whose vocabulary produced them.
pub struct PreparedData {
    pub encoder: SequenceEncoder,
    pub train:   BlurbDataset,
    pub val:     BlurbDataset,
    pub test:    BlurbDataset,
}

/// Steps 2 to 5: split, fit on training text, encode everything.
pub fn prepare_datasets(cfg: &TrainConfig, blurbs: Vec<Blurb>) -> Result<PreparedData> {
    let (train, test) = split_train_val(blurbs, 1.0 - cfg.test_split, cfg.seed);
    tracing::info!("Split: {} train, {} test", train.len(), test.len());
    encode_splits(cfg, &train, &test)
}

/// Fit the vocabulary on `train` only, then encode both sets.
pub fn encode_splits(cfg: &TrainConfig, train: &[Blurb], test: &[Blurb]) -> Result<PreparedData> {
    let mut encoder = SequenceEncoder::new(cfg.encoder.clone())?;

    let train_texts: Vec<&str> = train.iter().map(|b| b.text.as_str()).collect();
    encoder.fit(&train_texts)?;

    let train_matrix  = encoder.encode_batch(&train_texts)?;
    let train_labels: Vec<u8> = train.iter().map(Blurb::class).collect();

    let test_texts: Vec<&str> = test.iter().map(|b| b.text.as_str()).collect();
    let test_matrix   = encoder.encode_batch(&test_texts)?;
    let test_labels: Vec<u8> = test.iter().map(Blurb::class).collect();

    // Validation comes out of the already-encoded training rows: the
    // vocabulary has seen their text, as with a framework's validation_split.
    let samples = samples_from_encoded(&train_matrix, &train_labels);
    let (fit_samples, val_samples) =
        split_train_val(samples, 1.0 - cfg.validation_split, cfg.seed.wrapping_add(1));

    Ok(PreparedData {
        encoder,
        train: BlurbDataset::new(fit_samples),
        val:   BlurbDataset::new(val_samples),
        test:  BlurbDataset::from_encoded(&test_matrix, &test_labels),
    })
}

// ─── TrainOutcome ─────────────────────────────────────────────────────────────
pub struct TrainOutcome {
    pub history:         TrainingHistory,
    pub test_report:     EvaluationReport,
    pub vocabulary_size: usize,
}

// ─── TrainUseCase ─────────────────────────────────────────────────────────────
pub struct TrainUseCase {
    config: TrainConfig,
}

impl TrainUseCase {
    pub fn new(config: TrainConfig) -> Self {
        Self { config }
    }

    /// Execute the full training pipeline end to end
    pub fn execute(&self) -> Result<TrainOutcome> {
        let cfg = &self.config;
        cfg.validate()?;

        // ── Step 1: Load blurbs ───────────────────────────────────────────────
        let loader = CsvLoader::new(&cfg.data_path, &cfg.text_column, &cfg.label_column);
        let blurbs = loader.load_all()?;
        if blurbs.is_empty() {
            bail!("No labelled blurbs found in '{}'", cfg.data_path);
        }

        // ── Steps 2-5: Split, fit vocabulary, encode ─────────────────────────
        let data  = prepare_datasets(cfg, blurbs)?;
        let vocab = data.encoder.vocabulary().map(|v| v.len()).unwrap_or_default();
        tracing::info!(
            "Datasets: {} fit, {} validation, {} test (positive rate {:.1}%)",
            data.train.sample_count(),
            data.val.sample_count(),
            data.test.sample_count(),
            data.train.positive_rate() * 100.0,
        );

        // ── Step 6: Save config + vocabulary for inference ───────────────────
        // Old weights go first: they may not fit the new config.
        let ckpt_manager = CheckpointManager::new(&cfg.checkpoint_dir);
        ckpt_manager.begin_run()?;
        ckpt_manager.save_config(cfg)?;
        if let Some(v) = data.encoder.vocabulary() {
            ckpt_manager.save_vocabulary(v)?;
        }
        let metrics = MetricsLogger::new(&cfg.checkpoint_dir)?;

        // ── Step 7: Train ─────────────────────────────────────────────────────
        let (model, history) = run_training(cfg, data.train, data.val, &ckpt_manager, &metrics)?;

        // ── Step 8: Held-out evaluation ──────────────────────────────────────
        let device      = burn::backend::wgpu::WgpuDevice::default();
        let test_report = evaluate(&model, data.test, cfg.batch_size, &device);
        tracing::info!(
            "Test set: loss={:.4}, accuracy={:.1}% over {} blurbs",
            test_report.loss,
            test_report.accuracy * 100.0,
            test_report.samples,
        );

        Ok(TrainOutcome { history, test_report, vocabulary_size: vocab })
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use burn::data::dataset::Dataset;

    fn blurbs(n: usize) -> Vec<Blurb> {
        (0..n)
            .map(|i| Blurb::new(format!("campaign number{} for solar lamps", i), i % 2 == 0))
            .collect()
    }

    #[test]
    fn test_default_config_is_valid() {
        assert!(TrainConfig::default().validate().is_ok());
    }

    #[test]
    fn test_invalid_configs_are_rejected() {
        let mut cfg = TrainConfig::default();
        cfg.encoder.seq_len = 0;
        assert!(cfg.validate().is_err());

        let mut cfg = TrainConfig::default();
        cfg.test_split = 1.0;
        assert!(cfg.validate().is_err());

        let mut cfg = TrainConfig::default();
        cfg.batch_size = 0;
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn test_model_config_reserves_padding_row() {
        let cfg = TrainConfig::default();
        let m   = cfg.model_config();
        assert_eq!(m.vocab_size, cfg.encoder.vocab_size + 1);
        assert_eq!(m.seq_len, cfg.encoder.seq_len);
    }

    #[test]
    fn test_vocabulary_is_fitted_on_training_text_only() {
        let cfg   = TrainConfig::default();
        let train = vec![Blurb::new("solar lamps for villages", true), Blurb::new("board game", false)];
        let test  = vec![Blurb::new("quantum teapot", true)];

        let data  = encode_splits(&cfg, &train, &test).unwrap();
        let vocab = data.encoder.vocabulary().unwrap();

        assert_eq!(vocab.index_of("quantum"), None);
        assert_eq!(vocab.index_of("teapot"), None);
        assert!(vocab.index_of("solar").is_some());

        // every test token is out of vocabulary → all padding
        let row = data.test.get(0).unwrap();
        assert!(row.input_ids.iter().all(|&i| i == 0));
        assert_eq!(row.input_ids.len(), cfg.encoder.seq_len);
        assert_eq!(row.label, 1);
    }

    #[test]
    fn test_prepare_keeps_every_blurb() {
        let cfg  = TrainConfig::default();
        let data = prepare_datasets(&cfg, blurbs(50)).unwrap();
        assert_eq!(data.test.len(), 10);
        assert_eq!(data.train.len() + data.val.len(), 40);
        assert_eq!(data.val.len(), 8);
    }

    #[test]
    fn test_prepare_is_reproducible() {
        let cfg = TrainConfig::default();
        let a   = prepare_datasets(&cfg, blurbs(30)).unwrap();
        let b   = prepare_datasets(&cfg, blurbs(30)).unwrap();
        assert_eq!(a.encoder.vocabulary(), b.encoder.vocabulary());
        for i in 0..a.train.len() {
            assert_eq!(a.train.get(i), b.train.get(i));
        }
    }
}
