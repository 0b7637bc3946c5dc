// ============================================================
// Layer 3 — Domain Layer
// ============================================================
// Plain Rust types that define what the pipeline produces and
// consumes. No file I/O and no framework types in here.
//
//   vocab.rs   — token ↔ id mapping with reserved special ids
//   traits.rs  — TextSource (dataset input) and Tokenize seams

/// Vocabulary construction and numericalization
pub mod vocab;

/// Core abstractions other layers implement
pub mod traits;
