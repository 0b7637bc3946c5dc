// ============================================================
// text_prep — text preprocessing for deep text models
// ============================================================
// Turns a text column into padded id sequences, a vocabulary,
// and optionally an embedding matrix aligned with that
// vocabulary.
//
//   domain/       — Vocab, special tokens, TextSource/Tokenize
//   data/         — preprocessing, tokenization, padding,
//                   tabular input, Burn dataset + batcher
//   infra/        — word vectors, embedding matrix, artifacts
//   application/  — prepare_text orchestration + PrepConfig
//   ml/           — pretrained Burn embedding layer
//
// The library never installs a tracing subscriber; the caller
// decides where log output goes.

#![recursion_limit = "256"]

/// Log at info level when `verbose` is set, debug otherwise.
macro_rules! progress {
    ($verbose:expr, $($arg:tt)+) => {
        if $verbose {
            tracing::info!($($arg)+)
        } else {
            tracing::debug!($($arg)+)
        }
    };
}

pub mod error;
pub mod domain;
pub mod data;
pub mod infra;
pub mod application;
pub mod ml;

pub use application::prepare_use_case::{prepare_text, PrepConfig, PrepareUseCase, PreparedText};
pub use data::frame::TextFrame;
pub use data::padding::{pad_all, pad_sequences, PadOptions};
pub use data::preprocessor::{simple_preprocess, PreprocessOptions, Preprocessor};
pub use data::tokenizer::{get_texts, get_texts_with, PostRule, PreRule, WordTokenizer};
pub use domain::traits::{TextSource, Tokenize};
pub use domain::vocab::Vocab;
pub use error::PrepError;
pub use infra::embeddings::{build_embeddings_matrix, build_embeddings_matrix_with, EmbeddingMatrix, OovStrategy};
pub use infra::word_vectors::WordVectors;
