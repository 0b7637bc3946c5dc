// ============================================================
// Layer 4 — Text Preprocessor
// ============================================================
// First cleaning pass over every raw row before the word
// tokenizer sees it.
//
// Steps (applied in order):
//   1. Optionally lowercase
//   2. Optionally strip accents (café → cafe)
//   3. Cut the text into runs of word characters, where decimal
//      digits count as separators ("abc123def" → "abc", "def")
//   4. Keep tokens whose length in chars is within
//      min_len..=max_len
//   5. Drop tokens that start with an underscore
//
// Everything that isn't a letter, a non-decimal numeric or an
// underscore disappears here: punctuation, digits, emoji,
// combining marks left over from decomposed text.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use unicode_normalization::{char::is_combining_mark, UnicodeNormalization};

/// Knobs for `simple_preprocess`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PreprocessOptions {
    pub lower:   bool,
    pub deacc:   bool,
    pub min_len: usize,
    pub max_len: usize,
}

impl Default for PreprocessOptions {
    fn default() -> Self {
        Self {
            lower:   false,
            deacc:   false,
            min_len: 2,
            max_len: 15,
        }
    }
}

/// Split `doc` into filtered alphabetic tokens.
pub fn simple_preprocess(doc: &str, opts: &PreprocessOptions) -> Vec<String> {
    let mut text = if opts.deacc { deaccent(doc) } else { doc.to_string() };
    if opts.lower {
        text = text.to_lowercase();
    }

    alphabetic_runs(&text)
        .filter(|tok| {
            let n = tok.chars().count();
            opts.min_len <= n && n <= opts.max_len && !tok.starts_with('_')
        })
        .map(str::to_string)
        .collect()
}

/// Remove accent marks: decompose, drop combining marks, recompose.
pub fn deaccent(text: &str) -> String {
    text.nfd()
        .filter(|&c| !is_combining_mark(c))
        .nfc()
        .collect()
}

// Letters, non-decimal numerics (½, ², Ⅻ) and underscore.
// Decimal digits and combining marks end a token.
static WORD_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[\p{L}\p{Nl}\p{No}_]+").unwrap());

/// Maximal runs of word characters, borrowed from `text`.
fn alphabetic_runs(text: &str) -> impl Iterator<Item = &str> {
    WORD_RUN.find_iter(text).map(|m| m.as_str())
}

/// Row-level wrapper used by the tokenization step.
/// Holds the options so every row is cleaned the same way.
#[derive(Debug, Clone, Default)]
pub struct Preprocessor {
    options: PreprocessOptions,
}

impl Preprocessor {
    pub fn new(options: PreprocessOptions) -> Self {
        Self { options }
    }

    /// Clean one row: filtered tokens joined by single spaces.
    pub fn clean(&self, text: &str) -> String {
        simple_preprocess(text, &self.options).join(" ")
    }

}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    fn pp(text: &str) -> Vec<String> {
        simple_preprocess(text, &PreprocessOptions::default())
    }

    #[test]
    fn test_drops_punctuation_and_short_tokens() {
        // "s" from "It's" is shorter than min_len
        assert_eq!(pp("Hello, World! It's 2024"), vec!["Hello", "World", "It"]);
    }

    #[test]
    fn test_digits_split_tokens() {
        assert_eq!(pp("abc123def"), vec!["abc", "def"]);
    }

    #[test]
    fn test_length_bounds_are_inclusive() {
        let opts = PreprocessOptions { min_len: 2, max_len: 5, ..Default::default() };
        assert_eq!(
            simple_preprocess("a ab abcde abcdef", &opts),
            vec!["ab", "abcde"]
        );
    }

    #[test]
    fn test_length_counts_chars_not_bytes() {
        let opts = PreprocessOptions { min_len: 2, max_len: 4, ..Default::default() };
        // 4 chars, 8 bytes
        assert_eq!(simple_preprocess("ßßßß", &opts), vec!["ßßßß"]);
    }

    #[test]
    fn test_non_decimal_numerics_are_word_chars() {
        let opts = PreprocessOptions { min_len: 1, ..Default::default() };
        assert_eq!(simple_preprocess("x² ½ cup 3", &opts), vec!["x²", "½", "cup"]);
    }

    #[test]
    fn test_combining_marks_split_tokens() {
        let opts = PreprocessOptions { min_len: 1, ..Default::default() };
        // "e" + U+0301 + "te", decomposed form of "éte"
        assert_eq!(simple_preprocess("e\u{301}te", &opts), vec!["e", "te"]);
        // composed form stays whole
        assert_eq!(simple_preprocess("\u{e9}te", &opts), vec!["\u{e9}te"]);
    }

    #[test]
    fn test_underscore_prefix_dropped() {
        assert_eq!(pp("_private snake_case"), vec!["snake_case"]);
    }

    #[test]
    fn test_deaccent() {
        let opts = PreprocessOptions { deacc: true, ..Default::default() };
        assert_eq!(simple_preprocess("café naïve", &opts), vec!["cafe", "naive"]);
        assert_eq!(deaccent("Ångström"), "Angstrom");
    }

    #[test]
    fn test_lower() {
        let opts = PreprocessOptions { lower: true, ..Default::default() };
        assert_eq!(simple_preprocess("Hello WORLD", &opts), vec!["hello", "world"]);
    }

    #[test]
    fn test_case_kept_by_default() {
        assert_eq!(pp("Hello WORLD"), vec!["Hello", "WORLD"]);
    }

    #[test]
    fn test_empty_string() {
        assert!(pp("").is_empty());
        assert_eq!(Preprocessor::default().clean("   "), "");
    }

    #[test]
    fn test_clean_joins_with_spaces() {
        let p = Preprocessor::default();
        assert_eq!(p.clean("  one,two;;three 4 "), "one two three");
    }
}
