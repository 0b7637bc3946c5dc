// ============================================================
// Layer 4 — Data Pipeline
// ============================================================
// Everything between a raw text column and model-ready id
// sequences.
//
//   CSV file / in-memory columns
//       │
//       ▼
//   CsvLoader, TextFrame  → named text columns
//       │
//       ▼
//   Preprocessor          → simple_preprocess: length-filtered
//       │                   words, optional deaccent
//       ▼
//   WordTokenizer         → rule-based tokens + special markers
//       │
//       ▼
//   Vocab (domain)        → token ids
//       │
//       ▼
//   pad_sequences         → fixed-length i32 rows
//       │
//       ▼
//   TextDataset           → Burn's Dataset trait
//       │
//       ▼
//   TextBatcher           → [batch, maxlen] Int tensors
//
// Each module does one step and is tested on its own.

/// Reads CSV files into a TextFrame
pub mod loader;

/// Minimal column table used as a TextSource
pub mod frame;

/// simple_preprocess and accent stripping
pub mod preprocessor;

/// Rule-based word tokenizer and get_texts
pub mod tokenizer;

/// pad_sequences / pad_all
pub mod padding;

/// Implements Burn's Dataset trait for padded sequences
pub mod dataset;

/// Implements Burn's Batcher trait to create tensor batches
pub mod batcher;
