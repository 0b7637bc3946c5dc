// ============================================================
// Layer 6 — Artifact Store
// ============================================================
// Persists what is needed to prepare new text exactly the way
// a previous run did.
//
// Layout:
//   artifacts/
//     prep_config.json   ← PrepConfig used for the run
//     vocab.json         ← {"itos": [...]} in id order
//     tokenizer.json     ← Hugging Face WordLevel export
//
// The vocabulary file is the source of truth; tokenizer.json is
// a convenience export for serving code that speaks `tokenizers`.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tokenizers::Tokenizer;

use crate::application::prepare_use_case::PrepConfig;
use crate::domain::vocab::Vocab;
use crate::infra::tokenizer_store::TokenizerStore;

const CONFIG_FILE: &str = "prep_config.json";
const VOCAB_FILE: &str = "vocab.json";

pub struct ArtifactStore {
    dir: PathBuf,
}

impl ArtifactStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn ensure_dir(&self) -> Result<()> {
        fs::create_dir_all(&self.dir)
            .with_context(|| format!("Cannot create '{}'", self.dir.display()))
    }

    pub fn save_config(&self, cfg: &PrepConfig) -> Result<()> {
        self.ensure_dir()?;
        let path = self.dir.join(CONFIG_FILE);
        cfg.save(&path)?;
        tracing::debug!("Saved preparation config to '{}'", path.display());
        Ok(())
    }

    pub fn load_config(&self) -> Result<PrepConfig> {
        PrepConfig::load(self.dir.join(CONFIG_FILE))
    }

    pub fn save_vocab(&self, vocab: &Vocab) -> Result<()> {
        self.ensure_dir()?;
        let path = self.dir.join(VOCAB_FILE);
        fs::write(&path, serde_json::to_string(vocab)?)
            .with_context(|| format!("Cannot write vocabulary to '{}'", path.display()))?;
        tracing::debug!("Saved {} vocabulary entries to '{}'", vocab.len(), path.display());
        Ok(())
    }

    pub fn load_vocab(&self) -> Result<Vocab> {
        let path = self.dir.join(VOCAB_FILE);
        let json = fs::read_to_string(&path).with_context(|| {
            format!(
                "Cannot read vocabulary from '{}'. Has the text been prepared yet?",
                path.display()
            )
        })?;
        serde_json::from_str(&json)
            .with_context(|| format!("Invalid vocabulary JSON in '{}'", path.display()))
    }

    /// Export `vocab` as tokenizer.json, padded the way `cfg` pads.
    pub fn export_tokenizer(&self, vocab: &Vocab, cfg: &PrepConfig) -> Result<Tokenizer> {
        TokenizerStore::new(&self.dir).export(vocab, &cfg.pad_options())
    }

    /// Save config, vocabulary and tokenizer export in one go.
    pub fn save_all(&self, cfg: &PrepConfig, vocab: &Vocab) -> Result<()> {
        self.save_config(cfg)?;
        self.save_vocab(vocab)?;
        self.export_tokenizer(vocab, cfg)?;
        tracing::info!("Saved preparation artifacts to '{}'", self.dir.display());
        Ok(())
    }
}
