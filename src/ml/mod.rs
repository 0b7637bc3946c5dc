// ============================================================
// Layer 5 — ML Hand-off (Burn)
// ============================================================
// The only place, together with data::batcher and
// data::dataset, that touches Burn types. Everything upstream
// works on plain ndarray values.
//
//   embedding.rs — build a burn nn::Embedding from the
//                  pretrained embedding matrix

/// Pretrained embedding matrix → burn tensors and layers
pub mod embedding;
