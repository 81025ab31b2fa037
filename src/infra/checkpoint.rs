// ============================================================
// Layer 6: Checkpoint Manager
// ============================================================
// Owns the checkpoint directory. Inference rebuilds the exact
// training-time pipeline from what is stored here:
//
//   checkpoints/
//     model_epoch_<N>.mpk.gz   weights after epoch N
//     latest_epoch.json        N of the newest weights file
//     train_config.json        encoder + model hyperparameters
//     vocabulary.json          the frozen vocabulary
//     metrics.csv              written by MetricsLogger
//
// Weights alone are not enough: embedding row i only means
// something under the token → index mapping that was fitted at
// training time, and the model can only be rebuilt with the
// same seq_len and layer sizes.
//
// The three artifacts must agree. A new training run drops the
// old latest_epoch.json before it writes its config, so a run
// that dies before epoch 1 leaves no weights behind instead of
// weights from a different architecture. Loading checks the
// vocabulary cap against the config and the weight shapes
// against the rebuilt model.
//
// CompactRecorder writes MessagePack, gzip-compressed, with
// floats stored at half precision.

use anyhow::{bail, Context, Result};
use burn::{
    prelude::*,
    record::{CompactRecorder, Recorder},
};
use serde::{de::DeserializeOwned, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::application::train_use_case::TrainConfig;
use crate::data::vocabulary::Vocabulary;
use crate::domain::traits::Persistable;
use crate::ml::model::EmbeddingClassifier;

const LATEST_FILE: &str = "latest_epoch.json";
const CONFIG_FILE: &str = "train_config.json";
const VOCAB_FILE:  &str = "vocabulary.json";

pub struct CheckpointManager {
    dir: PathBuf,
}

impl CheckpointManager {
    /// Nothing touches the filesystem until the first save.
    pub fn new(dir: impl Into<String>) -> Self {
        Self { dir: PathBuf::from(dir.into()) }
    }

    fn ensure_dir(&self) -> Result<()> {
        fs::create_dir_all(&self.dir)
            .with_context(|| format!("Cannot create checkpoint directory '{}'", self.dir.display()))
    }

    /// Start a training run: forget the weights of any previous run.
    pub fn begin_run(&self) -> Result<()> {
        self.ensure_dir()?;
        let latest = self.dir.join(LATEST_FILE);
        if latest.exists() {
            fs::remove_file(&latest)
                .with_context(|| format!("Cannot remove '{}'", latest.display()))?;
            tracing::info!("Discarded weights pointer of a previous run in '{}'", self.dir.display());
        }
        Ok(())
    }

    /// Weights path for an epoch, without the extension the recorder adds.
    fn weights_path(&self, epoch: usize) -> PathBuf {
        self.dir.join(format!("model_epoch_{epoch}"))
    }

    /// Record the weights for `epoch` and point latest_epoch.json at them.
    pub fn save_model<B: Backend>(&self, model: &EmbeddingClassifier<B>, epoch: usize) -> Result<()> {
        self.ensure_dir()?;
        let path = self.weights_path(epoch);
        CompactRecorder::new()
            .record(model.clone().into_record(), path.clone())
            .with_context(|| format!("Cannot record weights to '{}'", path.display()))?;

        write_json(&self.dir.join(LATEST_FILE), &epoch)?;
        tracing::debug!("Weights for epoch {} written", epoch);
        Ok(())
    }

    /// Load the newest weights into `model`, which must have been built
    /// from the saved config. Weights of any other shape are rejected.
    pub fn load_model<B: Backend>(
        &self,
        model:  EmbeddingClassifier<B>,
        device: &B::Device,
    ) -> Result<EmbeddingClassifier<B>> {
        let epoch = self.latest_epoch()?;
        let path  = self.weights_path(epoch);
        tracing::info!("Loading weights from epoch {}", epoch);

        let record = CompactRecorder::new()
            .load(path.clone(), device)
            .with_context(|| format!("Cannot load weights '{}'", path.display()))?;

        let expected = model.weight_shapes();
        let model    = model.load_record(record);
        let found    = model.weight_shapes();
        if found != expected {
            bail!(
                "Weights in '{}' have layer shapes {:?} but {} describes {:?}; \
                 the checkpoint directory mixes two training runs, re-run 'train'",
                path.display(), found, CONFIG_FILE, expected,
            );
        }
        Ok(model)
    }

    pub fn save_config(&self, cfg: &TrainConfig) -> Result<()> {
        self.ensure_dir()?;
        write_json(&self.dir.join(CONFIG_FILE), cfg)
    }

    pub fn load_config(&self) -> Result<TrainConfig> {
        read_json(&self.dir.join(CONFIG_FILE))
    }

    pub fn vocabulary_path(&self) -> PathBuf {
        self.dir.join(VOCAB_FILE)
    }

    pub fn save_vocabulary(&self, vocab: &Vocabulary) -> Result<()> {
        vocab.save(&self.vocabulary_path().to_string_lossy())
    }

    pub fn load_vocabulary(&self) -> Result<Vocabulary> {
        Vocabulary::load(&self.vocabulary_path().to_string_lossy())
    }

    /// Config and vocabulary of the last run, checked against each other.
    pub fn load_artifacts(&self) -> Result<(TrainConfig, Vocabulary)> {
        let cfg   = self.load_config()?;
        let vocab = self.load_vocabulary()?;
        if vocab.max_size() != cfg.encoder.vocab_size {
            bail!(
                "{} was fitted with a cap of {} tokens but {} expects {}; \
                 the checkpoint directory mixes two training runs, re-run 'train'",
                VOCAB_FILE, vocab.max_size(), CONFIG_FILE, cfg.encoder.vocab_size,
            );
        }
        Ok((cfg, vocab))
    }

    pub fn latest_epoch(&self) -> Result<usize> {
        read_json(&self.dir.join(LATEST_FILE))
    }
}

fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value)?;
    fs::write(path, json).with_context(|| format!("Cannot write '{}'", path.display()))?;
    tracing::debug!("Wrote '{}'", path.display());
    Ok(())
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let json = fs::read_to_string(path).with_context(|| {
        format!("Cannot read '{}'. Have you run 'train' first?", path.display())
    })?;
    serde_json::from_str(&json).with_context(|| format!("Invalid JSON in '{}'", path.display()))
}
