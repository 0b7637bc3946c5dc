// ============================================================
// Layer 4 — Word Tokenizer
// ============================================================
// Second tokenization pass. Runs over the rows already cleaned
// by the Preprocessor and produces the final token lists.
//
//   raw row
//      │  Preprocessor::clean     (alphabetic tokens, joined)
//      ▼
//   cleaned row
//      │  pre-rules               (string → string)
//      │  word splitting          (string → tokens)
//      │  post-rules              (tokens → tokens)
//      ▼
//   token list
//
// Pre-rules, in default order:
//   fix_html           HTML artefacts and entities
//   replace_rep        "cooool"        → "c xxrep 4 o l"
//   replace_wrep       "go go go go x" → "xxwrep 4 go x"
//   spec_add_spaces    "a/b#c"         → "a / b # c"
//   rm_useless_spaces  collapse runs of spaces
//
// Word splitting peels punctuation and English contractions off
// whitespace-separated chunks ("don't" → "do", "n't").
//
// Post-rules, in default order:
//   replace_all_caps   "NICE"  → "xxup", "nice"
//   deal_caps          "Hello" → "xxmaj", "hello"; lowercases all
//
// The tokenizer is a plain value: no caches, no global state.

use std::sync::LazyLock;

use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};

use crate::data::preprocessor::Preprocessor;
use crate::domain::traits::Tokenize;
use crate::domain::vocab::{is_special, TK_MAJ, TK_REP, TK_UP, TK_WREP, UNK};

static HTML_ENTITY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"&(#[0-9]+|#[xX][0-9a-fA-F]+|[a-zA-Z]+);").unwrap());
static MULTI_SPACE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r" {2,}").unwrap());

const HTML_FIXES: [(&str, &str); 14] = [
    ("#39;", "'"),
    ("amp;", "&"),
    ("#146;", "'"),
    ("nbsp;", " "),
    ("#36;", "$"),
    ("\\n", "\n"),
    ("quot;", "'"),
    ("<br />", "\n"),
    ("\\\"", "\""),
    ("<unk>", UNK),
    (" @.@ ", "."),
    (" @-@ ", "-"),
    (" @,@ ", ","),
    ("\\", " \\ "),
];

const PREFIX_CHARS: &[char] = &['"', '\'', '(', '[', '{', '<', '¡', '¿', '$', '£', '€', '`', '“', '‘'];
const SUFFIX_CHARS: &[char] = &[
    '.', ',', '!', '?', ';', ':', ')', ']', '}', '>', '"', '\'', '%', '…', '”', '’',
];
const CONTRACTIONS: [&str; 14] = [
    "n't", "'s", "'re", "'ve", "'ll", "'d", "'m",
    "n’t", "’s", "’re", "’ve", "’ll", "’d", "’m",
];

/// String-level rules applied before splitting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PreRule {
    FixHtml,
    ReplaceRep,
    ReplaceWrep,
    SpecAddSpaces,
    RmUselessSpaces,
}

impl PreRule {
    pub const DEFAULTS: [PreRule; 5] = [
        PreRule::FixHtml,
        PreRule::ReplaceRep,
        PreRule::ReplaceWrep,
        PreRule::SpecAddSpaces,
        PreRule::RmUselessSpaces,
    ];

    pub fn apply(self, text: &str) -> String {
        match self {
            PreRule::FixHtml         => fix_html(text),
            PreRule::ReplaceRep      => replace_rep(text),
            PreRule::ReplaceWrep     => replace_wrep(text),
            PreRule::SpecAddSpaces   => text.replace('/', " / ").replace('#', " # "),
            PreRule::RmUselessSpaces => MULTI_SPACE.replace_all(text, " ").into_owned(),
        }
    }
}

/// Token-level rules applied after splitting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PostRule {
    ReplaceAllCaps,
    DealCaps,
}

impl PostRule {
    pub const DEFAULTS: [PostRule; 2] = [PostRule::ReplaceAllCaps, PostRule::DealCaps];

    pub fn apply(self, tokens: Vec<String>) -> Vec<String> {
        match self {
            PostRule::ReplaceAllCaps => replace_all_caps(tokens),
            PostRule::DealCaps       => deal_caps(tokens),
        }
    }
}

fn fix_html(text: &str) -> String {
    let mut s = text.to_string();
    for (from, to) in HTML_FIXES {
        s = s.replace(from, to);
    }
    let s = unescape_html(&s);
    MULTI_SPACE.replace_all(&s, " ").into_owned()
}

/// Decode numeric and the common named HTML entities.
/// Unknown entities are left as they are.
fn unescape_html(text: &str) -> String {
    HTML_ENTITY
        .replace_all(text, |caps: &Captures| {
            let body = &caps[1];
            let decoded = match body {
                "amp"  => Some('&'),
                "lt"   => Some('<'),
                "gt"   => Some('>'),
                "quot" => Some('"'),
                "apos" => Some('\''),
                "nbsp" => Some('\u{00A0}'),
                _ if body.starts_with("#x") || body.starts_with("#X") => {
                    u32::from_str_radix(&body[2..], 16).ok().and_then(char::from_u32)
                }
                _ if body.starts_with('#') => body[1..].parse().ok().and_then(char::from_u32),
                _ => None,
            };
            match decoded {
                Some(c) => c.to_string(),
                None    => caps[0].to_string(),
            }
        })
        .into_owned()
}

/// A non-space character repeated 4+ times becomes ` xxrep N c `.
fn replace_rep(text: &str) -> String {
    let chars: Vec<char> = text.chars().collect();
    let mut out = String::with_capacity(text.len());
    let mut i = 0;
    while i < chars.len() {
        let c = chars[i];
        let mut run = 1;
        while i + run < chars.len() && chars[i + run] == c {
            run += 1;
        }
        if run >= 4 && !c.is_whitespace() {
            out.push_str(&format!(" {TK_REP} {run} {c} "));
        } else {
            out.extend(std::iter::repeat(c).take(run));
        }
        i += run;
    }
    out
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// A word followed by the same separator, repeated 4+ times in a row,
/// becomes ` xxwrep N word<sep> `. Every repeat needs its separator,
/// so a run that ends the string counts one less ("go go go go" at
/// the end is three complete repeats and stays as it is).
fn replace_wrep(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut at_word_start = true;
    let mut i = 0;
    while i < text.len() {
        let rest = &text[i..];
        if at_word_start {
            if let Some((unit_len, count)) = word_repeat(rest) {
                out.push_str(&format!(" {TK_WREP} {count} {} ", &rest[..unit_len]));
                i += unit_len * count;
                continue;
            }
        }
        let Some(c) = rest.chars().next() else { break };
        out.push(c);
        at_word_start = !is_word_char(c);
        i += c.len_utf8();
    }
    out
}

/// Length in bytes of the repeated `word<sep>` unit at the start of
/// `rest` and how many times it repeats, if that is 4 or more.
fn word_repeat(rest: &str) -> Option<(usize, usize)> {
    let word_len: usize = rest
        .chars()
        .take_while(|&c| is_word_char(c))
        .map(char::len_utf8)
        .sum();
    if word_len == 0 {
        return None;
    }

    let sep_ends: Vec<usize> = rest[word_len..]
        .chars()
        .take_while(|&c| !is_word_char(c))
        .scan(0, |end, c| {
            *end += c.len_utf8();
            Some(*end)
        })
        .collect();

    // longest separator first
    for &sep_len in sep_ends.iter().rev() {
        let unit = &rest[..word_len + sep_len];
        let mut count = 1;
        while rest[unit.len() * count..].starts_with(unit) {
            count += 1;
        }
        if count >= 4 {
            return Some((unit.len(), count));
        }
    }
    None
}

fn is_upper(s: &str) -> bool {
    s.chars().any(char::is_uppercase) && !s.chars().any(char::is_lowercase)
}

fn is_lower(s: &str) -> bool {
    s.chars().any(char::is_lowercase) && !s.chars().any(char::is_uppercase)
}

fn replace_all_caps(tokens: Vec<String>) -> Vec<String> {
    let mut res = Vec::with_capacity(tokens.len());
    for t in tokens {
        if is_upper(&t) && t.chars().count() > 1 {
            res.push(TK_UP.to_string());
            res.push(t.to_lowercase());
        } else {
            res.push(t);
        }
    }
    res
}

fn deal_caps(tokens: Vec<String>) -> Vec<String> {
    let mut res = Vec::with_capacity(tokens.len());
    for t in tokens {
        let mut chars = t.chars();
        let Some(first) = chars.next() else { continue };
        let rest = chars.as_str();
        if first.is_uppercase() && !rest.is_empty() && is_lower(rest) {
            res.push(TK_MAJ.to_string());
        }
        res.push(t.to_lowercase());
    }
    res
}

/// Split one whitespace-free chunk into prefix punctuation,
/// core word pieces and suffix punctuation / contractions.
fn split_chunk(chunk: &str, out: &mut Vec<String>) {
    if is_special(chunk) {
        out.push(chunk.to_string());
        return;
    }

    let mut rest = chunk;

    // ── Prefixes ─────────────────────────────────────────────────────────────
    while rest.chars().count() > 1 {
        match rest.chars().next() {
            Some(c) if PREFIX_CHARS.contains(&c) => {
                out.push(c.to_string());
                rest = &rest[c.len_utf8()..];
            }
            _ => break,
        }
    }

    // ── Suffixes (collected back to front) ───────────────────────────────────
    let mut suffixes: Vec<&str> = Vec::new();
    loop {
        if rest.chars().count() <= 1 {
            break;
        }
        if let Some(c) = rest.chars().next_back().filter(|c| SUFFIX_CHARS.contains(c)) {
            let cut = rest.len() - c.len_utf8();
            suffixes.push(&rest[cut..]);
            rest = &rest[..cut];
            continue;
        }
        let contraction = CONTRACTIONS.iter().find(|s| {
            rest.len() > s.len()
                && rest.is_char_boundary(rest.len() - s.len())
                && rest[rest.len() - s.len()..].eq_ignore_ascii_case(s)
        });
        match contraction {
            Some(s) => {
                let cut = rest.len() - s.len();
                suffixes.push(&rest[cut..]);
                rest = &rest[..cut];
            }
            None => break,
        }
    }

    // ── Infix hyphens between word pieces ────────────────────────────────────
    if !rest.is_empty() {
        if rest.starts_with('-') || rest.ends_with('-') || rest.contains("--") {
            out.push(rest.to_string());
        } else {
            let mut pieces = rest.split('-').peekable();
            while let Some(p) = pieces.next() {
                out.push(p.to_string());
                if pieces.peek().is_some() {
                    out.push("-".to_string());
                }
            }
        }
    }

    out.extend(suffixes.into_iter().rev().map(str::to_string));
}

/// Rule-based English word tokenizer.
#[derive(Debug, Clone, PartialEq)]
pub struct WordTokenizer {
    pre_rules:  Vec<PreRule>,
    post_rules: Vec<PostRule>,
}

impl Default for WordTokenizer {
    fn default() -> Self {
        Self::new()
    }
}

impl WordTokenizer {
    /// Tokenizer with every default rule enabled.
    pub fn new() -> Self {
        Self {
            pre_rules:  PreRule::DEFAULTS.to_vec(),
            post_rules: PostRule::DEFAULTS.to_vec(),
        }
    }

    pub fn with_pre_rules(mut self, rules: Vec<PreRule>) -> Self {
        self.pre_rules = rules;
        self
    }

    pub fn with_post_rules(mut self, rules: Vec<PostRule>) -> Self {
        self.post_rules = rules;
        self
    }

    /// Tokenize a single string.
    pub fn process_text(&self, text: &str) -> Vec<String> {
        let mut s = text.to_string();
        for rule in &self.pre_rules {
            s = rule.apply(&s);
        }

        let mut tokens = Vec::new();
        for chunk in s.split_whitespace() {
            split_chunk(chunk, &mut tokens);
        }

        for rule in &self.post_rules {
            tokens = rule.apply(tokens);
        }
        tokens
    }

    /// Tokenize every row, preserving order.
    pub fn process_all(&self, texts: &[String]) -> Vec<Vec<String>> {
        texts.iter().map(|t| self.process_text(t)).collect()
    }
}

impl Tokenize for WordTokenizer {
    fn tokenize_all(&self, texts: &[String]) -> Vec<Vec<String>> {
        self.process_all(texts)
    }
}

/// Clean and tokenize every row with the default settings.
pub fn get_texts(texts: &[String]) -> Vec<Vec<String>> {
    get_texts_with(texts, &Preprocessor::default(), &WordTokenizer::new())
}

/// Clean every row with `preprocessor`, then tokenize the whole
/// cleaned corpus in one batch.
pub fn get_texts_with(
    texts:        &[String],
    preprocessor: &Preprocessor,
    tokenizer:    &dyn Tokenize,
) -> Vec<Vec<String>> {
    let cleaned: Vec<String> = texts.iter().map(|t| preprocessor.clean(t)).collect();
    let tokens = tokenizer.tokenize_all(&cleaned);
    tracing::debug!(
        "Tokenized {} rows into {} tokens",
        tokens.len(),
        tokens.iter().map(Vec::len).sum::<usize>()
    );
    tokens
}
