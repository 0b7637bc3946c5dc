// ============================================================
// Layer 6 — Infrastructure Layer
// ============================================================
// File formats and persistence:
//
//   word_vectors.rs    — parses GloVe / fastText style text
//                        vector files
//
//   embeddings.rs      — aligns word vectors with a Vocab and
//                        fills rows for unknown tokens
//
//   tokenizer_store.rs — exports a Vocab as a `tokenizers`
//                        WordLevel tokenizer.json
//
//   artifact_store.rs  — writes config, vocab and tokenizer to
//                        one directory so serving uses the same
//                        ids as preparation

/// Pretrained word vector file reader
pub mod word_vectors;

/// Embedding matrix construction
pub mod embeddings;

/// Tokenizer export and loading
pub mod tokenizer_store;

/// Config + vocab + tokenizer persistence
pub mod artifact_store;
