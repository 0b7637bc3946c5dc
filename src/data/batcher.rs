// ============================================================
// Layer 4 — Text Batcher
// ============================================================
// Implements Burn's Batcher trait to stack padded TextSamples
// into one integer tensor for the model's embedding layer.
//
//   Input:  Vec of N TextSamples, each of length maxlen
//   Output: TextBatch with input_ids of shape [N, maxlen]
//
// All samples are padded to the same length beforehand, so the
// ids are flattened row by row and reshaped in one go.

use burn::{
    data::dataloader::batcher::Batcher,
    prelude::*,
};

use crate::data::dataset::TextSample;

#[derive(Debug, Clone)]
pub struct TextBatch<B: Backend> {
    /// Token ids — shape: [batch_size, maxlen]
    pub input_ids: Tensor<B, 2, Int>,
}

#[derive(Clone, Debug)]
pub struct TextBatcher<B: Backend> {
    pub device: B::Device,
}

impl<B: Backend> TextBatcher<B> {
    pub fn new(device: B::Device) -> Self {
        Self { device }
    }
}

impl<B: Backend> Batcher<TextSample, TextBatch<B>> for TextBatcher<B> {
    fn batch(&self, items: Vec<TextSample>) -> TextBatch<B> {
        let batch_size = items.len();
        let seq_len    = items.first().map(|s| s.input_ids.len()).unwrap_or(0);

        let flat: Vec<i32> = items
            .iter()
            .flat_map(|s| s.input_ids.iter().copied())
            .collect();

        let input_ids = Tensor::<B, 1, Int>::from_ints(flat.as_slice(), &self.device)
            .reshape([batch_size, seq_len]);

        TextBatch { input_ids }
    }
}
