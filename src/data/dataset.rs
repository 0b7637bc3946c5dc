use burn::data::dataset::Dataset;
use ndarray::Array2;
use serde::{Deserialize, Serialize};

/// One padded row, ready for batching.
/// Length is always the `maxlen` the row was padded to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextSample {
    pub input_ids: Vec<i32>,
}

impl TextSample {
    /// Number of non-pad positions.
    pub fn content_len(&self, pad_idx: i32) -> usize {
        self.input_ids.iter().filter(|&&id| id != pad_idx).count()
    }
}

pub struct TextDataset {
    samples: Vec<TextSample>,
}

impl TextDataset {
    pub fn new(samples: Vec<TextSample>) -> Self { Self { samples } }

    /// One sample per row of a padded `(rows, maxlen)` matrix.
    pub fn from_sequences(sequences: &Array2<i32>) -> Self {
        let samples = sequences
            .rows()
            .into_iter()
            .map(|row| TextSample { input_ids: row.to_vec() })
            .collect();
        Self::new(samples)
    }
}

impl Dataset<TextSample> for TextDataset {
    fn get(&self, index: usize) -> Option<TextSample> {
        self.samples.get(index).cloned()
    }

    fn len(&self) -> usize {
        self.samples.len()
    }
}
