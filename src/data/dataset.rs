use burn::data::dataset::Dataset;

use crate::data::encoder::EncodedMatrix;

/// One encoded blurb and its class (1 = successful, 0 = failed).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlurbSample {
    pub input_ids: Vec<u32>,
    pub label:     u8,
}

#[derive(Debug)]
pub struct BlurbDataset {
    samples: Vec<BlurbSample>,
}

impl BlurbDataset {
    pub fn new(samples: Vec<BlurbSample>) -> Self { Self { samples } }

    pub fn from_encoded(matrix: &EncodedMatrix, labels: &[u8]) -> Self {
        Self { samples: samples_from_encoded(matrix, labels) }
    }

    pub fn sample_count(&self) -> usize { self.samples.len() }

    /// Fraction of samples labelled successful.
    pub fn positive_rate(&self) -> f64 {
        if self.samples.is_empty() {
            return 0.0;
        }
        let positives = self.samples.iter().filter(|s| s.label == 1).count();
        positives as f64 / self.samples.len() as f64
    }
}

/// Pair each matrix row with its label. Extra labels or rows are ignored.
pub fn samples_from_encoded(matrix: &EncodedMatrix, labels: &[u8]) -> Vec<BlurbSample> {
    matrix
        .iter()
        .zip(labels)
        .map(|(row, &label)| BlurbSample { input_ids: row.to_vec(), label })
        .collect()
}

impl Dataset<BlurbSample> for BlurbDataset {
    fn get(&self, index: usize) -> Option<BlurbSample> {
        self.samples.get(index).cloned()
    }

    fn len(&self) -> usize {
        self.samples.len()
    }
}
