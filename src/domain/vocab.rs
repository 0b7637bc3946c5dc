// ============================================================
// Layer 3 — Vocabulary
// ============================================================
// Maps word tokens to small integer ids and back.
//
// Layout of the id space:
//
//   0..=8        special tokens (always present, fixed order)
//   9..          corpus tokens, most frequent first
//   tail         "xxfake" fillers up to a multiple of 8
//
//   itos: Vec<String>            id    → token
//   stoi: HashMap<String, usize> token → id
//
// Ordering rule for corpus tokens:
//   count descending, ties broken by first occurrence in the
//   corpus. Building twice from the same token lists always
//   yields the same ids.
//
// Only `itos` is serialised; `stoi` is rebuilt on load.

use std::cmp::Reverse;
use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::{PrepError, Result};

/// Unknown word.
pub const UNK: &str = "xxunk";
/// Padding.
pub const PAD: &str = "xxpad";
/// Beginning of stream.
pub const BOS: &str = "xxbos";
/// End of stream.
pub const EOS: &str = "xxeos";
/// Field separator.
pub const FLD: &str = "xxfld";
/// Next token was capitalised.
pub const TK_MAJ: &str = "xxmaj";
/// Next token was all caps.
pub const TK_UP: &str = "xxup";
/// Character repetition marker.
pub const TK_REP: &str = "xxrep";
/// Word repetition marker.
pub const TK_WREP: &str = "xxwrep";
/// Filler appended to round the vocabulary size up to a multiple of 8.
pub const FAKE: &str = "xxfake";

/// Reserved tokens in id order.
pub const SPECIAL_TOKENS: [&str; 9] =
    [UNK, PAD, BOS, EOS, FLD, TK_MAJ, TK_UP, TK_REP, TK_WREP];

pub const UNK_ID: usize = 0;
pub const PAD_ID: usize = 1;

const SIZE_MULTIPLE: usize = 8;

/// Returns true for tokens the tokenizer itself emits as markers.
pub fn is_special(token: &str) -> bool {
    SPECIAL_TOKENS.contains(&token)
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "VocabFile", into = "VocabFile")]
pub struct Vocab {
    itos: Vec<String>,
    stoi: HashMap<String, usize>,
}

#[derive(Serialize, Deserialize)]
struct VocabFile {
    itos: Vec<String>,
}

impl From<VocabFile> for Vocab {
    fn from(f: VocabFile) -> Self {
        Vocab::from_itos(f.itos)
    }
}

impl From<Vocab> for VocabFile {
    fn from(v: Vocab) -> Self {
        VocabFile { itos: v.itos }
    }
}

impl Vocab {
    /// Build a vocabulary from tokenized rows.
    ///
    /// The `max_vocab` most frequent tokens are considered, those
    /// seen fewer than `min_freq` times are dropped, and the special
    /// tokens are put in front. A vocabulary shorter than `max_vocab`
    /// is then filled with `xxfake` up to a multiple of 8.
    pub fn create(tokens: &[Vec<String>], max_vocab: usize, min_freq: usize) -> Result<Self> {
        if max_vocab < SPECIAL_TOKENS.len() {
            return Err(PrepError::InvalidConfig(format!(
                "max_vocab ({max_vocab}) must be at least the {} special tokens",
                SPECIAL_TOKENS.len()
            )));
        }

        // (count, first occurrence)
        let mut counts: HashMap<&str, (usize, usize)> = HashMap::new();
        for row in tokens {
            for tok in row {
                let next = counts.len();
                counts.entry(tok.as_str()).or_insert((0, next)).0 += 1;
            }
        }

        let mut ranked: Vec<(&str, usize, usize)> = counts
            .into_iter()
            .map(|(tok, (count, first))| (tok, count, first))
            .collect();
        ranked.sort_by_key(|&(_, count, first)| (Reverse(count), first));

        let mut itos: Vec<String> = SPECIAL_TOKENS.iter().map(|s| s.to_string()).collect();
        itos.extend(
            ranked
                .into_iter()
                .take(max_vocab)
                .filter(|&(tok, count, _)| count >= min_freq && !is_special(tok))
                .map(|(tok, _, _)| tok.to_string()),
        );
        itos.truncate(max_vocab);

        // only a vocabulary below the cap is filled, but then all the
        // way to the next multiple, even past max_vocab
        if itos.len() < max_vocab {
            while itos.len() % SIZE_MULTIPLE != 0 {
                itos.push(FAKE.to_string());
            }
        }

        tracing::debug!(
            "Vocabulary built: {} entries (max_vocab={}, min_freq={})",
            itos.len(),
            max_vocab,
            min_freq
        );

        Ok(Self::from_itos(itos))
    }

    /// Rebuild a vocabulary from an id → token list.
    /// Duplicate tokens resolve to their first id.
    pub fn from_itos(itos: Vec<String>) -> Self {
        let mut stoi = HashMap::with_capacity(itos.len());
        for (id, tok) in itos.iter().enumerate() {
            stoi.entry(tok.clone()).or_insert(id);
        }
        Self { itos, stoi }
    }

    /// Convert tokens to ids; unknown tokens become `UNK_ID`.
    pub fn numericalize<S: AsRef<str>>(&self, tokens: &[S]) -> Vec<usize> {
        tokens
            .iter()
            .map(|t| self.stoi.get(t.as_ref()).copied().unwrap_or(UNK_ID))
            .collect()
    }

    /// Convert ids back to tokens; ids past the end become `xxunk`.
    pub fn textify(&self, ids: &[usize]) -> Vec<String> {
        ids.iter()
            .map(|&id| self.token(id).unwrap_or(UNK).to_string())
            .collect()
    }

    pub fn index_of(&self, token: &str) -> Option<usize> {
        self.stoi.get(token).copied()
    }

    pub fn token(&self, id: usize) -> Option<&str> {
        self.itos.get(id).map(String::as_str)
    }

    pub fn itos(&self) -> &[String] {
        &self.itos
    }

    pub fn len(&self) -> usize {
        self.itos.len()
    }

    pub fn is_empty(&self) -> bool {
        self.itos.is_empty()
    }

    /// Number of distinct tokens; `xxfake` fillers count once.
    pub fn distinct_len(&self) -> usize {
        self.stoi.len()
    }
}
