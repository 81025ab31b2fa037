// ============================================================
// Layer 4: Train/Holdout Splitter
// ============================================================
// Shuffles samples and splits them into two sets. Used twice
// by the training pipeline:
//   1. all blurbs   → training + test   (BEFORE the vocabulary
//                                         is fitted, so test text
//                                         never shapes it)
//   2. training set → fit + validation
//
// Why shuffle before splitting?
//   Exports are often sorted (by date, by category). Without
//   shuffling, the holdout set would only contain the tail.
//
// The shuffle is seeded so a run can be reproduced exactly.
// Uses Fisher-Yates via rand::seq::SliceRandom.
//
// Reference: rand crate documentation

use rand::{rngs::StdRng, seq::SliceRandom, SeedableRng};

/// Shuffle `samples` with `seed` and split into (train, holdout).
///
/// # Arguments
/// * `samples`        - All available samples (consumed by this function)
/// * `train_fraction` - Proportion for training, e.g. 0.8 = 80%
/// * `seed`           - RNG seed; same seed, same split
pub fn split_train_val<T>(mut samples: Vec<T>, train_fraction: f64, seed: u64) -> (Vec<T>, Vec<T>) {
    let mut rng = StdRng::seed_from_u64(seed);
    samples.shuffle(&mut rng);

    let total    = samples.len();
    let split_at = ((total as f64) * train_fraction.clamp(0.0, 1.0)).round() as usize;
    let split_at = split_at.min(total);

    // split_off(n) leaves [0..n] in samples and returns [n..]
    let holdout = samples.split_off(split_at);

    tracing::debug!(
        "Dataset split: {} training, {} holdout (seed {})",
        samples.len(),
        holdout.len(),
        seed,
    );

    (samples, holdout)
}
