// ============================================================
// Layer 6 — Tokenizer Store
// ============================================================
// Exports a Vocab as a Hugging Face `tokenizers` WordLevel
// tokenizer so a serving process can numericalize and pad text
// with the exact ids used at preparation time.
//
// The tokenizer JSON is written by hand and loaded back with
// Tokenizer::from_file, so the file on disk is always one the
// tokenizers crate accepts.
//
// What the exported tokenizer does on encode:
//   1. split special tokens (xxunk, xxmaj, ...) out as-is
//   2. split the rest on whitespace
//   3. look every word up in the vocabulary (unknown → xxunk)
//   4. truncate from the left to maxlen (keep the last ids)
//   5. pad to maxlen on the left (pad_first) or the right
//
// Input is expected to be already tokenized text, i.e. the
// tokens from get_texts joined with spaces.

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use serde_json::{json, Map, Value};
use tokenizers::Tokenizer;

use crate::data::padding::PadOptions;
use crate::domain::vocab::{Vocab, PAD, SPECIAL_TOKENS, UNK};
use crate::error::PrepError;

const TOKENIZER_FILE: &str = "tokenizer.json";

pub struct TokenizerStore {
    dir: PathBuf,
}

impl TokenizerStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn path(&self) -> PathBuf {
        self.dir.join(TOKENIZER_FILE)
    }

    /// Load a previously exported tokenizer.
    pub fn load(&self) -> Result<Tokenizer> {
        let path = self.path();
        Tokenizer::from_file(&path)
            .map_err(|e| PrepError::TokenizerExport(e.to_string()))
            .with_context(|| format!("Cannot load tokenizer from '{}'", path.display()))
    }

    /// Write `vocab` as tokenizer.json and load it back.
    pub fn export(&self, vocab: &Vocab, pad: &PadOptions) -> Result<Tokenizer> {
        fs::create_dir_all(&self.dir)
            .with_context(|| format!("Cannot create '{}'", self.dir.display()))?;

        let tokenizer_json = tokenizer_json(vocab, pad)?;
        let path = self.path();
        fs::write(&path, serde_json::to_string_pretty(&tokenizer_json)?)
            .with_context(|| format!("Cannot write tokenizer JSON to '{}'", path.display()))?;

        tracing::info!(
            "Tokenizer exported with {} words to '{}'",
            vocab.len(),
            path.display()
        );

        self.load()
    }
}

fn tokenizer_json(vocab: &Vocab, pad: &PadOptions) -> Result<Value> {
    // first id wins for repeated fillers
    let mut word_ids = Map::new();
    for (id, tok) in vocab.itos().iter().enumerate() {
        if !word_ids.contains_key(tok) {
            word_ids.insert(tok.clone(), json!(id));
        }
    }

    let added_tokens: Vec<Value> = SPECIAL_TOKENS
        .iter()
        .filter_map(|tok| vocab.index_of(tok).map(|id| (id, tok)))
        .map(|(id, tok)| {
            json!({
                "id": id, "content": tok, "single_word": false, "lstrip": false,
                "rstrip": false, "normalized": false, "special": true
            })
        })
        .collect();

    let pad_id = u32::try_from(pad.pad_idx).map_err(|_| {
        PrepError::InvalidConfig(format!(
            "pad_idx {} cannot be used as a tokenizer pad id",
            pad.pad_idx
        ))
    })?;
    let pad_token = vocab.token(pad_id as usize).unwrap_or(PAD);
    let direction = if pad.pad_first { "Left" } else { "Right" };

    Ok(json!({
        "version": "1.0",
        "truncation": {
            "direction": "Left",
            "max_length": pad.maxlen,
            "strategy": "LongestFirst",
            "stride": 0
        },
        "padding": {
            "strategy": { "Fixed": pad.maxlen },
            "direction": direction,
            "pad_to_multiple_of": null,
            "pad_id": pad_id,
            "pad_type_id": 0,
            "pad_token": pad_token
        },
        "added_tokens": added_tokens,
        "normalizer": null,
        "pre_tokenizer": { "type": "WhitespaceSplit" },
        "post_processor": null,
        "decoder": null,
        "model": {
            "type": "WordLevel",
            "vocab": word_ids,
            "unk_token": UNK
        }
    }))
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn vocab() -> Vocab {
        let rows = vec![vec!["the".to_string(), "cat".to_string(), "the".to_string()]];
        Vocab::create(&rows, 100, 1).unwrap()
    }

    #[test]
    fn test_exported_ids_match_vocab() {
        let dir = tempdir().unwrap();
        let store = TokenizerStore::new(dir.path());
        let v = vocab();
        let tok = store.export(&v, &PadOptions::new(4)).unwrap();

        let enc = tok.encode("the cat", false).unwrap();
        assert_eq!(enc.get_ids(), &[1, 1, 9, 10]);
    }

    #[test]
    fn test_unknown_words_and_specials() {
        let dir = tempdir().unwrap();
        let tok = TokenizerStore::new(dir.path())
            .export(&vocab(), &PadOptions::new(3))
            .unwrap();
        let enc = tok.encode("xxmaj dog", false).unwrap();
        assert_eq!(enc.get_ids(), &[1, 5, 0]);
    }

    #[test]
    fn test_left_truncation_and_right_padding() {
        let dir = tempdir().unwrap();
        let store = TokenizerStore::new(dir.path());
        let pad = PadOptions { maxlen: 2, pad_first: false, pad_idx: 1 };
        let tok = store.export(&vocab(), &pad).unwrap();

        assert_eq!(tok.encode("cat cat the", false).unwrap().get_ids(), &[10, 9]);
        assert_eq!(tok.encode("cat", false).unwrap().get_ids(), &[10, 1]);
    }

    #[test]
    fn test_reload_from_disk() {
        let dir = tempdir().unwrap();
        let store = TokenizerStore::new(dir.path());
        store.export(&vocab(), &PadOptions::new(3)).unwrap();
        let again = store.load().unwrap();
        assert_eq!(again.encode("cat", false).unwrap().get_ids(), &[1, 1, 10]);
    }

    #[test]
    fn test_negative_pad_idx_rejected() {
        let dir = tempdir().unwrap();
        let pad = PadOptions { maxlen: 3, pad_first: true, pad_idx: -1 };
        let err = TokenizerStore::new(dir.path()).export(&vocab(), &pad).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<PrepError>(),
            Some(PrepError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_load_missing_fails() {
        let dir = tempdir().unwrap();
        assert!(TokenizerStore::new(dir.path()).load().is_err());
    }
}
