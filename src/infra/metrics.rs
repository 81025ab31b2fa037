// ============================================================
// Layer 6: Metrics Logger
// ============================================================
// Appends one CSV row per training epoch to
// <checkpoint_dir>/metrics.csv:
//
//   epoch,train_loss,train_acc,val_loss,val_acc
//   1,0.692100,0.512000,0.689300,0.530000
//   2,0.655400,0.604000,0.671800,0.575000
//
// Losses are mean cross-entropy per sample, accuracies are
// fractions in [0, 1]. val_loss is NaN when the validation
// split is empty.
//
// Reading the file: val_loss climbing while train_loss keeps
// falling is overfitting, which short blurbs reach within a
// few epochs. val_acc stuck near the positive rate means the
// model has only learned the class prior.

use anyhow::{Context, Result};
use std::{
    fs::{self, OpenOptions},
    path::{Path, PathBuf},
};

const HEADER: [&str; 5] = ["epoch", "train_loss", "train_acc", "val_loss", "val_acc"];

/// Training and validation scores after one epoch.
#[derive(Debug, Clone, PartialEq)]
pub struct EpochMetrics {
    /// Starts at 1
    pub epoch:      usize,
    pub train_loss: f64,
    pub train_acc:  f64,
    pub val_loss:   f64,
    pub val_acc:    f64,
}

impl EpochMetrics {
    pub fn new(
        epoch:      usize,
        train_loss: f64,
        train_acc:  f64,
        val_loss:   f64,
        val_acc:    f64,
    ) -> Self {
        Self { epoch, train_loss, train_acc, val_loss, val_acc }
    }

    fn to_record(&self) -> [String; 5] {
        [
            self.epoch.to_string(),
            format!("{:.6}", self.train_loss),
            format!("{:.6}", self.train_acc),
            format!("{:.6}", self.val_loss),
            format!("{:.6}", self.val_acc),
        ]
    }
}

pub struct MetricsLogger {
    csv_path: PathBuf,
}

impl MetricsLogger {
    /// Successive runs against the same directory append to one file;
    /// the header is only written when the file is new.
    pub fn new(dir: impl Into<String>) -> Result<Self> {
        let dir = PathBuf::from(dir.into());
        fs::create_dir_all(&dir)
            .with_context(|| format!("Cannot create '{}'", dir.display()))?;

        let csv_path = dir.join("metrics.csv");
        if !csv_path.exists() {
            let mut writer = csv::Writer::from_path(&csv_path)
                .with_context(|| format!("Cannot create '{}'", csv_path.display()))?;
            writer.write_record(HEADER)?;
            writer.flush()?;
            tracing::debug!("Created metrics CSV: '{}'", csv_path.display());
        }

        Ok(Self { csv_path })
    }

    pub fn log(&self, m: &EpochMetrics) -> Result<()> {
        let file = OpenOptions::new()
            .append(true)
            .open(&self.csv_path)
            .with_context(|| format!("Cannot open '{}'", self.csv_path.display()))?;

        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(file);
        writer.write_record(m.to_record())?;
        writer.flush()?;

        tracing::debug!(
            "epoch {} logged: train_loss={:.4} val_loss={:.4}",
            m.epoch, m.train_loss, m.val_loss,
        );
        Ok(())
    }

    pub fn csv_path(&self) -> &Path {
        &self.csv_path
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_appends_rows_under_single_header() {
        let dir = tempfile::tempdir().unwrap();
        let dir = dir.path().display().to_string();

        let logger = MetricsLogger::new(dir.clone()).unwrap();
        logger.log(&EpochMetrics::new(1, 0.7, 0.5, 0.69, 0.52)).unwrap();

        // a second logger on the same directory must not rewrite the header
        let again = MetricsLogger::new(dir).unwrap();
        again.log(&EpochMetrics::new(2, 0.6, 0.6, 0.68, 0.55)).unwrap();

        let csv = fs::read_to_string(again.csv_path()).unwrap();
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], "epoch,train_loss,train_acc,val_loss,val_acc");
        assert_eq!(lines[1], "1,0.700000,0.500000,0.690000,0.520000");
        assert!(lines[2].starts_with("2,"));
    }

    #[test]
    fn test_nan_validation_loss_is_written() {
        let dir    = tempfile::tempdir().unwrap();
        let logger = MetricsLogger::new(dir.path().display().to_string()).unwrap();
        logger.log(&EpochMetrics::new(1, 0.7, 0.5, f64::NAN, 0.0)).unwrap();

        let csv = fs::read_to_string(logger.csv_path()).unwrap();
        assert_eq!(csv.lines().nth(1), Some("1,0.700000,0.500000,NaN,0.000000"));
    }
}
