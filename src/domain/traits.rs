// ============================================================
// Layer 3 — Core Traits (Abstractions)
// ============================================================
// The pipeline reads one named text column from a dataset.
// Anything that can hand back a column of strings by name
// implements TextSource:
//
//   - TextFrame      → in-memory columns, or loaded from CSV
//   - (anything else the caller already holds in memory)
//
// prepare_text only ever sees TextSource, so callers bring
// their own table type without converting it first.

use crate::error::Result;

/// A column-addressable table of text.
pub trait TextSource {
    /// Return every row of column `name`, in row order.
    /// Fails with `PrepError::MissingColumn` if there is no such column.
    fn column(&self, name: &str) -> Result<Vec<String>>;
}

/// Tokenization seam: turn raw rows into token lists, one per row,
/// without hidden state between calls.
pub trait Tokenize {
    fn tokenize_all(&self, texts: &[String]) -> Vec<Vec<String>>;
}
