// ============================================================
// Layer 5: Evaluator
// ============================================================
// Loss and accuracy of a model on held-out data.
//
// Loss is averaged per SAMPLE (each batch weighted by its size),
// so a short final batch does not skew the result.

use burn::{data::dataloader::DataLoaderBuilder, prelude::*};

use crate::data::batcher::{BlurbBatch, BlurbBatcher};
use crate::data::dataset::BlurbDataset;
use crate::ml::model::{count_correct, EmbeddingClassifier};

/// Loss and accuracy over a dataset.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EvaluationReport {
    /// Mean cross-entropy; NaN when there were no samples
    pub loss:     f64,
    /// Fraction of correctly classified samples in [0, 1]
    pub accuracy: f64,
    pub samples:  usize,
}

/// Evaluate over any stream of batches (e.g. a DataLoader iterator).
pub fn evaluate_batches<B, I>(model: &EmbeddingClassifier<B>, batches: I) -> EvaluationReport
where
    B: Backend,
    I: Iterator<Item = BlurbBatch<B>>,
{
    let mut loss_sum = 0.0f64;
    let mut correct  = 0usize;
    let mut samples  = 0usize;

    for batch in batches {
        let batch_size = batch.labels.dims()[0];
        let output     = model.forward_loss(batch.input_ids, batch.labels.clone());

        loss_sum += output.loss.into_scalar().elem::<f64>() * batch_size as f64;
        correct  += count_correct(output.logits, batch.labels);
        samples  += batch_size;
    }

    EvaluationReport {
        loss:     if samples > 0 { loss_sum / samples as f64 } else { f64::NAN },
        accuracy: if samples > 0 { correct as f64 / samples as f64 } else { 0.0 },
        samples,
    }
}

/// Evaluate a model on a whole dataset.
pub fn evaluate<B: Backend>(
    model:      &EmbeddingClassifier<B>,
    dataset:    BlurbDataset,
    batch_size: usize,
    device:     &B::Device,
) -> EvaluationReport {
    let loader = DataLoaderBuilder::new(BlurbBatcher::<B>::new(device.clone()))
        .batch_size(batch_size)
        .num_workers(1)
        .build(dataset);
    let report = evaluate_batches(model, loader.iter());
    tracing::debug!(
        "Evaluated {} samples: loss={:.4}, accuracy={:.4}",
        report.samples, report.loss, report.accuracy
    );
    report
}
