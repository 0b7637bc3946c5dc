// ============================================================
// Layer 6 — Embedding Matrix Builder
// ============================================================
// Aligns pretrained word vectors with the vocabulary so that
// row i of the matrix is the vector for vocabulary id i.
//
//   vocab.itos:   [xxunk, xxpad, cat,   dog,   bird ]
//   vectors:              {cat: [1,0], dog: [0,1]}
//                           │
//                           ▼
//   matrix:       [[.5,.5],[.5,.5],[1,0],[0,1],[.5,.5]]
//
// Tokens missing from the vector file (special tokens, rare
// words, typos) get a fallback row chosen by OovStrategy:
//
//   Mean    — elementwise mean of every loaded vector (default)
//   Zero    — all zeros
//   Random  — uniform in [-0.25, 0.25], seeded
//
// Shape: (vocab.len(), dim), dim taken from the vector file.

use std::path::Path;

use ndarray::{Array1, Array2};
use rand::{rngs::StdRng, Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::domain::vocab::Vocab;
use crate::error::Result;
use crate::infra::word_vectors::WordVectors;

const RANDOM_INIT_RANGE: f32 = 0.25;

/// Fallback representation for vocabulary tokens without a vector.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum OovStrategy {
    #[default]
    Mean,
    Zero,
    Random { seed: u64 },
}

/// Embedding weights plus how many vocabulary rows were matched.
#[derive(Debug, Clone, PartialEq)]
pub struct EmbeddingMatrix {
    pub weights:        Array2<f32>,
    pub found_words:    usize,
    pub loaded_vectors: usize,
}

impl EmbeddingMatrix {
    pub fn dim(&self) -> usize {
        self.weights.ncols()
    }

    /// Fraction of vocabulary rows taken from the vector file.
    pub fn coverage(&self) -> f64 {
        let rows = self.weights.nrows();
        if rows == 0 {
            0.0
        } else {
            self.found_words as f64 / rows as f64
        }
    }
}

/// Load `word_vectors_path` and build a mean-fallback matrix for `vocab`.
pub fn build_embeddings_matrix(
    vocab:             &Vocab,
    word_vectors_path: impl AsRef<Path>,
    verbose:           bool,
) -> Result<Array2<f32>> {
    build_embeddings_matrix_with(vocab, word_vectors_path, OovStrategy::Mean, verbose)
        .map(|m| m.weights)
}

/// Load `word_vectors_path` and build a matrix for `vocab` using
/// `strategy` for tokens without a vector.
pub fn build_embeddings_matrix_with(
    vocab:             &Vocab,
    word_vectors_path: impl AsRef<Path>,
    strategy:          OovStrategy,
    verbose:           bool,
) -> Result<EmbeddingMatrix> {
    let path = word_vectors_path.as_ref();

    progress!(verbose, "Indexing word vectors from '{}'...", path.display());
    let vectors = WordVectors::load(path)?;
    progress!(verbose, "Loaded {} word vectors", vectors.len());
    progress!(verbose, "Preparing embeddings matrix...");

    let matrix = embed_vocab(vocab, &vectors, strategy);
    if matrix.found_words == 0 {
        tracing::warn!(
            "No vocabulary word has a vector in '{}'; every row uses the fallback",
            path.display()
        );
    }

    progress!(
        verbose,
        "{} words in the vocabulary had vectors in '{}' and appear more than the min frequency",
        matrix.found_words,
        path.display()
    );
    Ok(matrix)
}

/// Build the matrix from already loaded vectors.
pub fn embed_vocab(vocab: &Vocab, vectors: &WordVectors, strategy: OovStrategy) -> EmbeddingMatrix {
    let dim = vectors.dim();
    let mut weights = Array2::<f32>::zeros((vocab.len(), dim));

    let mean = match strategy {
        OovStrategy::Mean => Some(Array1::from(vectors.mean_vector())),
        _ => None,
    };
    let mut rng = match strategy {
        OovStrategy::Random { seed } => Some(StdRng::seed_from_u64(seed)),
        _ => None,
    };

    let mut found_words = 0;
    for (id, word) in vocab.itos().iter().enumerate() {
        let mut row = weights.row_mut(id);
        if let Some(v) = vectors.get(word) {
            row.assign(&ndarray::ArrayView1::from(v));
            found_words += 1;
        } else if let Some(mean) = &mean {
            row.assign(mean);
        } else if let Some(rng) = rng.as_mut() {
            row.mapv_inplace(|_| rng.gen_range(-RANDOM_INIT_RANGE..=RANDOM_INIT_RANGE));
        }
        // Zero: the row is already zeros
    }

    EmbeddingMatrix {
        weights,
        found_words,
        loaded_vectors: vectors.len(),
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PrepError;
    use ndarray::array;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn vector_file(content: &str) -> NamedTempFile {
        let mut f = NamedTempFile::new().unwrap();
        f.write_all(content.as_bytes()).unwrap();
        f
    }

    fn animal_vocab() -> Vocab {
        Vocab::from_itos(
            ["<unk>", "<pad>", "cat", "dog", "bird"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
        )
    }

    #[test]
    fn test_known_rows_copied_unknown_rows_get_mean() {
        let f = vector_file("cat 1 0\ndog 0 1\n");
        let m = build_embeddings_matrix(&animal_vocab(), f.path(), false).unwrap();
        assert_eq!(
            m,
            array![[0.5, 0.5], [0.5, 0.5], [1.0, 0.0], [0.0, 1.0], [0.5, 0.5]]
        );
    }

    #[test]
    fn test_rows_match_vocab_size() {
        let f = vector_file("cat 1 2 3\n");
        let m = build_embeddings_matrix(&animal_vocab(), f.path(), true).unwrap();
        assert_eq!(m.dim(), (5, 3));
    }

    #[test]
    fn test_report_counts_found_words() {
        let f = vector_file("cat 1 0\ndog 0 1\nfish 1 1\n");
        let m = build_embeddings_matrix_with(&animal_vocab(), f.path(), OovStrategy::Mean, false)
            .unwrap();
        assert_eq!(m.found_words, 2);
        assert_eq!(m.loaded_vectors, 3);
        assert_eq!(m.dim(), 2);
        assert!((m.coverage() - 0.4).abs() < 1e-12);
    }

    #[test]
    fn test_zero_strategy() {
        let f = vector_file("cat 1 0\ndog 0 1\n");
        let m = build_embeddings_matrix_with(&animal_vocab(), f.path(), OovStrategy::Zero, false)
            .unwrap();
        assert_eq!(m.weights.row(0), array![0.0, 0.0]);
        assert_eq!(m.weights.row(2), array![1.0, 0.0]);
        assert_eq!(m.weights.row(4), array![0.0, 0.0]);
    }

    #[test]
    fn test_random_strategy_is_seeded_and_bounded() {
        let f = vector_file("cat 1 0\ndog 0 1\n");
        let build = |seed| {
            build_embeddings_matrix_with(
                &animal_vocab(),
                f.path(),
                OovStrategy::Random { seed },
                false,
            )
            .unwrap()
            .weights
        };
        let a = build(7);
        let b = build(7);
        assert_eq!(a, b);
        assert_ne!(a, build(8));
        assert_eq!(a.row(3), array![0.0, 1.0]);
        assert!(a.row(4).iter().all(|x| x.abs() <= RANDOM_INIT_RANGE));
    }

    #[test]
    fn test_missing_file_fails() {
        let err = build_embeddings_matrix(&animal_vocab(), "/no/such/file.vec", false).unwrap_err();
        assert!(matches!(err, PrepError::Io { .. }));
    }

    #[test]
    fn test_empty_file_fails() {
        let f = vector_file("");
        let err = build_embeddings_matrix(&animal_vocab(), f.path(), false).unwrap_err();
        assert!(matches!(err, PrepError::EmptyVectorFile { .. }));
    }

    #[test]
    fn test_strategy_serde_shape() {
        let json = serde_json::to_string(&OovStrategy::Random { seed: 3 }).unwrap();
        assert_eq!(json, r#"{"kind":"random","seed":3}"#);
        let back: OovStrategy = serde_json::from_str(r#"{"kind":"mean"}"#).unwrap();
        assert_eq!(back, OovStrategy::Mean);
    }
}
