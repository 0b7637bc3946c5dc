// ============================================================
// Shared Error Type
// ============================================================
// Every fallible step below the application layer returns
// PrepError. Variants that come from a file carry the path
// (and the 1-based line number where one exists) so a failure
// can be traced back to the offending input.
//
// The application layer wraps these in anyhow::Error with
// extra step context; callers can still recover the typed
// error with `err.downcast_ref::<PrepError>()`.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PrepError {
    #[error("cannot read '{}': {source}", path.display())]
    Io {
        path:   PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed word vector at '{}' line {line}: {reason}", path.display())]
    MalformedVector {
        path:   PathBuf,
        line:   usize,
        reason: String,
    },

    #[error(
        "word vector at '{}' line {line} has {found} components, expected {expected}",
        path.display()
    )]
    DimensionMismatch {
        path:     PathBuf,
        line:     usize,
        expected: usize,
        found:    usize,
    },

    #[error("word vector file '{}' contains no vectors", path.display())]
    EmptyVectorFile { path: PathBuf },

    #[error("column '{0}' not found in dataset")]
    MissingColumn(String),

    #[error("column '{name}' has {found} rows, expected {expected}")]
    RaggedColumn {
        name:     String,
        expected: usize,
        found:    usize,
    },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("token id {0} does not fit in an i32")]
    IdOverflow(usize),

    #[error("tokenizer export failed: {0}")]
    TokenizerExport(String),
}

pub type Result<T> = std::result::Result<T, PrepError>;
