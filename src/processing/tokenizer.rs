//! Tokenization, stop-word filtering and suffix stemming

use crate::processing::normalizer::normalize;
use once_cell::sync::Lazy;
use std::collections::HashSet;

/// Suffixes removed by [`stem`], longest first so that `ing` wins over `s`.
const STEM_SUFFIXES: [&str; 4] = ["ing", "ed", "es", "s"];

const ENGLISH_STOP_WORDS: &[&str] = &[
    "the", "and", "or", "for", "with", "from", "that", "this", "you", "your", "are", "was", "were",
    "etc", "of", "in", "to", "a", "an", "is", "as", "by", "be",
];

const MALAY_STOP_WORDS: &[&str] = &[
    "dan", "atau", "yang", "dengan", "untuk", "pada", "serta", "dll", "kepada", "di",
];

static STOP_WORDS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    ENGLISH_STOP_WORDS
        .iter()
        .chain(MALAY_STOP_WORDS)
        .copied()
        .collect()
});

pub fn is_stop_word(token: &str) -> bool {
    STOP_WORDS.contains(token)
}

/// Split text into lowercase alphanumeric tokens.
///
/// Order and duplicates are preserved. Tokens of two characters or fewer
/// and stop words are dropped.
pub fn tokenize(text: &str) -> Vec<String> {
    let cleaned: String = normalize(text)
        .to_lowercase()
        .chars()
        .map(|c| {
            if c.is_ascii_lowercase() || c.is_ascii_digit() || c.is_whitespace() {
                c
            } else {
                ' '
            }
        })
        .collect();

    cleaned
        .split_whitespace()
        .filter(|token| token.len() > 2 && !is_stop_word(token))
        .map(str::to_string)
        .collect()
}

/// Remove one trailing `ing`, `ed`, `es` or `s`. Not applied recursively.
pub fn stem(token: &str) -> String {
    let lower = token.to_lowercase();
    for suffix in STEM_SUFFIXES {
        if let Some(stripped) = lower.strip_suffix(suffix) {
            return stripped.to_string();
        }
    }
    lower
}

/// Immutable set of tokens or stems built once per analysis.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TokenSet {
    tokens: HashSet<String>,
}

impl TokenSet {
    pub fn from_text(text: &str) -> Self {
        Self::from_tokens(tokenize(text))
    }

    pub fn from_tokens<I, S>(tokens: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            tokens: tokens.into_iter().map(Into::into).collect(),
        }
    }

    /// Stemmed token set of `text`, used for requirement matching.
    pub fn stemmed_from_text(text: &str) -> Self {
        Self::from_tokens(tokenize(text).iter().map(|t| stem(t)))
    }

    pub fn contains(&self, token: &str) -> bool {
        self.tokens.contains(token)
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.tokens.iter().map(String::as_str)
    }
}
