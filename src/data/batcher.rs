// ============================================================
// Layer 4: Blurb Batcher
// ============================================================
// Implements Burn's Batcher trait to convert a Vec<BlurbSample>
// into tensors.
//
// How batching works here:
//   Input:  Vec of N BlurbSamples, each with a row of length L
//   Output: BlurbBatch with input_ids [N, L] and labels [N]
//
//   We flatten all rows into one long Vec, then reshape:
//   [s1_t1, ..., s1_tL, s2_t1, ..., sN_tL] → [N, L]
//
// No dynamic padding is needed: the SequenceEncoder already
// guarantees every row has exactly L entries.
//
// Reference: Burn Book §4 (Batcher)

use burn::{
    data::dataloader::batcher::Batcher,
    prelude::*,
};

use crate::data::dataset::BlurbSample;

// ─── BlurbBatch ───────────────────────────────────────────────────────────────
/// A batch of encoded blurbs ready for the model forward pass.
#[derive(Debug, Clone)]
pub struct BlurbBatch<B: Backend> {
    /// Token indices, shape [batch_size, seq_len]
    pub input_ids: Tensor<B, 2, Int>,

    /// Class labels, shape [batch_size]
    pub labels: Tensor<B, 1, Int>,
}

// ─── BlurbBatcher ─────────────────────────────────────────────────────────────
/// Holds the target device so tensors are created on the right GPU/CPU.
#[derive(Clone, Debug)]
pub struct BlurbBatcher<B: Backend> {
    pub device: B::Device,
}

impl<B: Backend> BlurbBatcher<B> {
    pub fn new(device: B::Device) -> Self {
        Self { device }
    }
}

impl<B: Backend> Batcher<BlurbSample, BlurbBatch<B>> for BlurbBatcher<B> {
    fn batch(&self, items: Vec<BlurbSample>) -> BlurbBatch<B> {
        let batch_size = items.len();
        let seq_len    = items.first().map_or(0, |s| s.input_ids.len());

        // Burn Int tensors are built from i32 here
        let input_flat: Vec<i32> = items
            .iter()
            .flat_map(|s| s.input_ids.iter().map(|&x| x as i32))
            .collect();

        let labels: Vec<i32> = items
            .iter()
            .map(|s| s.label as i32)
            .collect();

        let input_ids = Tensor::<B, 1, Int>::from_ints(
            input_flat.as_slice(), &self.device
        ).reshape([batch_size, seq_len]);

        let labels = Tensor::<B, 1, Int>::from_ints(
            labels.as_slice(), &self.device
        );

        BlurbBatch { input_ids, labels }
    }
}
