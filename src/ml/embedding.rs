// ============================================================
// Layer 5 — Pretrained Embedding Layer
// ============================================================
// Turns the embedding matrix produced by build_embeddings_matrix
// into Burn types so a model can start from pretrained vectors.
//
//   Array2<f32> (vocab_size, dim)
//       │  flatten row by row, reshape
//       ▼
//   Tensor<B, 2> [vocab_size, dim]
//       │  replace the randomly initialised weight
//       ▼
//   nn::Embedding<B>   lookup: [batch, maxlen] → [batch, maxlen, dim]

use burn::{
    module::Param,
    nn::{Embedding, EmbeddingConfig},
    prelude::*,
};
use ndarray::Array2;

/// Copy an embedding matrix onto `device`.
pub fn embedding_tensor<B: Backend>(weights: &Array2<f32>, device: &B::Device) -> Tensor<B, 2> {
    let (rows, cols) = weights.dim();
    // iter() walks in logical row-major order whatever the memory layout
    let flat: Vec<f32> = weights.iter().copied().collect();
    Tensor::<B, 1>::from_floats(flat.as_slice(), device).reshape([rows, cols])
}

/// An embedding layer whose weights are `weights`.
pub fn pretrained_embedding<B: Backend>(weights: &Array2<f32>, device: &B::Device) -> Embedding<B> {
    let (rows, cols) = weights.dim();
    let mut layer = EmbeddingConfig::new(rows, cols).init(device);
    layer.weight = Param::from_tensor(embedding_tensor(weights, device));
    layer
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use burn::backend::NdArray;
    use ndarray::array;

    type TestBackend = NdArray;

    fn weights() -> Array2<f32> {
        array![[0.5, 0.5], [0.5, 0.5], [1.0, 0.0], [0.0, 1.0], [0.5, 0.5]]
    }

    #[test]
    fn test_tensor_matches_matrix() {
        let device = Default::default();
        let t = embedding_tensor::<TestBackend>(&weights(), &device);
        assert_eq!(t.dims(), [5, 2]);
        let values: Vec<f32> = t.into_data().to_vec().unwrap();
        assert_eq!(values, vec![0.5, 0.5, 0.5, 0.5, 1.0, 0.0, 0.0, 1.0, 0.5, 0.5]);
    }

    #[test]
    fn test_transposed_layout_still_row_major() {
        let device = Default::default();
        let m = array![[1.0f32, 3.0], [2.0, 4.0]].reversed_axes();
        let values: Vec<f32> = embedding_tensor::<TestBackend>(&m, &device)
            .into_data()
            .to_vec()
            .unwrap();
        assert_eq!(values, vec![1.0, 2.0, 3.0, 4.0]);
    }

    #[test]
    fn test_layer_looks_up_rows() {
        let device = Default::default();
        let layer = pretrained_embedding::<TestBackend>(&weights(), &device);
        let ids = Tensor::<TestBackend, 1, Int>::from_ints([2, 3, 0].as_slice(), &device)
            .reshape([1, 3]);
        let out = layer.forward(ids);
        assert_eq!(out.dims(), [1, 3, 2]);
        let values: Vec<f32> = out.into_data().to_vec().unwrap();
        assert_eq!(values, vec![1.0, 0.0, 0.0, 1.0, 0.5, 0.5]);
    }
}
