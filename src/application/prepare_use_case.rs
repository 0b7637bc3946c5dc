// ============================================================
// Layer 2 — PrepareUseCase
// ============================================================
// Orchestrates the full text preparation pipeline in order:
//
//   Step 1: Read the text column          (Layer 4 - data)
//   Step 2: Clean + tokenize every row    (Layer 4 - data)
//   Step 3: Build vocabulary              (Layer 3 - domain)
//   Step 4: Numericalize every row        (Layer 3 - domain)
//   Step 5: Pad / truncate to maxlen      (Layer 4 - data)
//   Step 6: Embedding matrix (optional)   (Layer 6 - infra)
//
// Any failing step aborts the whole call; there is nothing to
// retry. An empty column is not a failure: it yields zero rows.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use ndarray::{Array2, Axis};
use serde::{Deserialize, Serialize};

use crate::data::{
    dataset::TextDataset,
    padding::{pad_all, PadOptions},
    preprocessor::{PreprocessOptions, Preprocessor},
    tokenizer::{get_texts_with, PostRule, PreRule, WordTokenizer},
};
use crate::domain::{
    traits::TextSource,
    vocab::{Vocab, PAD_ID, SPECIAL_TOKENS},
};
use crate::error::PrepError;
use crate::infra::embeddings::{build_embeddings_matrix_with, OovStrategy};

// ─── Preparation Configuration ───────────────────────────────────────────────
// Every knob of a preparation run. Serialisable so the exact
// settings can be stored next to the vocabulary and reused when
// new text has to be prepared the same way.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PrepConfig {
    pub max_vocab:         usize,
    pub min_freq:          usize,
    pub maxlen:            usize,
    pub pad_first:         bool,
    pub pad_idx:           i32,
    pub word_vectors_path: Option<PathBuf>,
    pub oov_strategy:      OovStrategy,
    pub verbose:           bool,
    pub preprocess:        PreprocessOptions,
    pub pre_rules:         Vec<PreRule>,
    pub post_rules:        Vec<PostRule>,
}

impl Default for PrepConfig {
    fn default() -> Self {
        Self {
            max_vocab:         30000,
            min_freq:          5,
            maxlen:            190,
            pad_first:         true,
            pad_idx:           PAD_ID as i32,
            word_vectors_path: None,
            oov_strategy:      OovStrategy::Mean,
            verbose:           true,
            preprocess:        PreprocessOptions::default(),
            pre_rules:         PreRule::DEFAULTS.to_vec(),
            post_rules:        PostRule::DEFAULTS.to_vec(),
        }
    }
}

impl PrepConfig {
    pub fn new(max_vocab: usize, min_freq: usize, maxlen: usize) -> Self {
        Self { max_vocab, min_freq, maxlen, ..Self::default() }
    }

    pub fn with_word_vectors(mut self, path: impl Into<PathBuf>) -> Self {
        self.word_vectors_path = Some(path.into());
        self
    }

    pub fn with_oov_strategy(mut self, strategy: OovStrategy) -> Self {
        self.oov_strategy = strategy;
        self
    }

    pub fn quiet(mut self) -> Self {
        self.verbose = false;
        self
    }

    pub fn pad_options(&self) -> PadOptions {
        PadOptions {
            maxlen:    self.maxlen,
            pad_first: self.pad_first,
            pad_idx:   self.pad_idx,
        }
    }

    pub fn tokenizer(&self) -> WordTokenizer {
        WordTokenizer::new()
            .with_pre_rules(self.pre_rules.clone())
            .with_post_rules(self.post_rules.clone())
    }

    /// Reject settings the pipeline cannot honour.
    pub fn validate(&self) -> std::result::Result<(), PrepError> {
        if self.max_vocab < SPECIAL_TOKENS.len() {
            return Err(PrepError::InvalidConfig(format!(
                "max_vocab ({}) must be at least {}",
                self.max_vocab,
                SPECIAL_TOKENS.len()
            )));
        }
        if self.preprocess.min_len > self.preprocess.max_len {
            return Err(PrepError::InvalidConfig(format!(
                "preprocess.min_len ({}) is greater than preprocess.max_len ({})",
                self.preprocess.min_len, self.preprocess.max_len
            )));
        }
        Ok(())
    }

    /// Read a config from a JSON file; missing fields take defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = fs::read_to_string(path)
            .with_context(|| format!("Cannot read config from '{}'", path.display()))?;
        let cfg: Self = serde_json::from_str(&json)
            .with_context(|| format!("Invalid config JSON in '{}'", path.display()))?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        fs::write(path, serde_json::to_string_pretty(self)?)
            .with_context(|| format!("Cannot write config to '{}'", path.display()))
    }
}

// ─── PreparedText ─────────────────────────────────────────────────────────────
/// Output of one preparation run.
#[derive(Debug, Clone, PartialEq)]
pub struct PreparedText {
    /// Shape `(rows, maxlen)`.
    pub sequences:        Array2<i32>,
    /// Shape `(vocab.len(), dim)`, present when a vector file was given.
    pub embedding_matrix: Option<Array2<f32>>,
    pub vocab:            Vocab,
}

impl PreparedText {
    pub fn num_rows(&self) -> usize {
        self.sequences.len_of(Axis(0))
    }

    /// `(padded_sequences, embedding_matrix_or_none, vocabulary)`
    pub fn into_parts(self) -> (Array2<i32>, Option<Array2<f32>>, Vocab) {
        (self.sequences, self.embedding_matrix, self.vocab)
    }

    /// Rows as a burn dataset for a training loop.
    pub fn dataset(&self) -> TextDataset {
        TextDataset::from_sequences(&self.sequences)
    }
}

// ─── PrepareUseCase ───────────────────────────────────────────────────────────
pub struct PrepareUseCase {
    config: PrepConfig,
}

impl PrepareUseCase {
    pub fn new(config: PrepConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &PrepConfig {
        &self.config
    }

    /// Run the whole pipeline over column `text_col` of `source`.
    pub fn execute<S>(&self, source: &S, text_col: &str) -> Result<PreparedText>
    where
        S: TextSource + ?Sized,
    {
        let cfg = &self.config;
        cfg.validate()?;

        // ── Step 1: Extract the text column ──────────────────────────────────
        let texts = source
            .column(text_col)
            .with_context(|| format!("Cannot read text column '{text_col}'"))?;
        progress!(cfg.verbose, "Tokenizing {} rows of '{}'", texts.len(), text_col);

        // ── Step 2: Clean + tokenize ─────────────────────────────────────────
        let preprocessor = Preprocessor::new(cfg.preprocess.clone());
        let tokens = get_texts_with(&texts, &preprocessor, &cfg.tokenizer());

        // ── Step 3: Vocabulary ───────────────────────────────────────────────
        let vocab = Vocab::create(&tokens, cfg.max_vocab, cfg.min_freq)
            .context("Cannot build vocabulary")?;

        // ── Step 4: Numericalize ─────────────────────────────────────────────
        let sequences: Vec<Vec<usize>> = tokens.iter().map(|t| vocab.numericalize(t)).collect();

        // ── Step 5: Pad / truncate ───────────────────────────────────────────
        let padded = pad_all(&sequences, &cfg.pad_options()).context("Cannot pad sequences")?;
        progress!(cfg.verbose, "The vocabulary contains {} words", vocab.distinct_len());

        // ── Step 6: Embedding matrix ─────────────────────────────────────────
        let embedding_matrix = match &cfg.word_vectors_path {
            Some(path) => {
                let matrix =
                    build_embeddings_matrix_with(&vocab, path, cfg.oov_strategy, cfg.verbose)
                        .with_context(|| {
                            format!("Cannot build embedding matrix from '{}'", path.display())
                        })?;
                Some(matrix.weights)
            }
            None => None,
        };

        Ok(PreparedText {
            sequences: padded,
            embedding_matrix,
            vocab,
        })
    }
}

/// Prepare column `text_col` of `source` according to `config`.
pub fn prepare_text<S>(source: &S, text_col: &str, config: &PrepConfig) -> Result<PreparedText>
where
    S: TextSource + ?Sized,
{
    PrepareUseCase::new(config.clone()).execute(source, text_col)
}
