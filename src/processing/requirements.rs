//! Job description to requirement list

use crate::processing::normalizer::normalize;
use crate::processing::tokenizer::{stem, tokenize};
use log::debug;
use once_cell::sync::Lazy;
use regex::Regex;

pub const MAX_LINE_REQUIREMENTS: usize = 60;
pub const MAX_SENTENCE_REQUIREMENTS: usize = 40;

/// Lines shorter than this are headings or noise.
const MIN_LINE_CHARS: usize = 15;
/// Fallback sentences must be longer than this.
const MIN_SENTENCE_CHARS: usize = 25;
/// Below this many line requirements the sentence split takes over.
const MIN_LINE_RESULTS: usize = 3;

static LEADING_BULLETS: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[-*]+").expect("valid bullet regex"));

/// Extract ordered requirement strings from a job description.
///
/// Bulleted or line-per-requirement descriptions are taken line by line.
/// When that yields fewer than three requirements the raw text is split
/// on `.` and `;` instead. No deduplication happens on either path.
pub fn extract_requirements(job_text: &str) -> Vec<String> {
    let normalized = normalize(job_text);
    let lines: Vec<String> = normalized
        .split('\n')
        .map(str::trim)
        .filter(|line| !line.is_empty() && line.chars().count() >= MIN_LINE_CHARS)
        .map(|line| LEADING_BULLETS.replace(line, "").trim().to_string())
        .collect();

    if lines.len() >= MIN_LINE_RESULTS {
        debug!("Extracted {} line requirements", lines.len());
        return lines.into_iter().take(MAX_LINE_REQUIREMENTS).collect();
    }

    let sentences: Vec<String> = job_text
        .split(['.', ';'])
        .map(str::trim)
        .filter(|sentence| sentence.chars().count() > MIN_SENTENCE_CHARS)
        .take(MAX_SENTENCE_REQUIREMENTS)
        .map(str::to_string)
        .collect();
    debug!(
        "Only {} line requirements, fell back to {} sentences",
        lines.len(),
        sentences.len()
    );
    sentences
}

/// A requirement with its derived tokens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Requirement {
    /// Verbatim text from [`extract_requirements`]
    pub text: String,
    pub tokens: Vec<String>,
    pub stems: Vec<String>,
}

impl Requirement {
    pub fn new(text: impl Into<String>) -> Self {
        let text = text.into();
        let tokens = tokenize(&text);
        let stems = tokens.iter().map(|t| stem(t)).collect();
        Self { text, tokens, stems }
    }

    /// No tokens survived filtering, so the requirement cannot be scored.
    pub fn is_degenerate(&self) -> bool {
        self.tokens.is_empty()
    }
}
