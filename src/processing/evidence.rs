//! Resume sentence index used to cite evidence for a requirement

use crate::processing::tokenizer::TokenSet;

/// Evidence text reported when no resume sentence shares a token with a requirement.
pub const NOT_MENTIONED: &str = "Not mentioned in text.";

#[derive(Debug, Clone)]
pub struct EvidenceSentence {
    pub text: String,
    pub tokens: TokenSet,
}

/// Sentence-like chunks of a resume with their (unstemmed) token sets.
#[derive(Debug, Clone, Default)]
pub struct SentenceIndex {
    sentences: Vec<EvidenceSentence>,
}

impl SentenceIndex {
    pub fn build(resume_text: &str) -> Self {
        let sentences = resume_text
            .split(['\n', '.', '!', '?'])
            .map(str::trim)
            .filter(|chunk| !chunk.is_empty())
            .map(|chunk| EvidenceSentence {
                text: chunk.to_string(),
                tokens: TokenSet::from_text(chunk),
            })
            .collect();
        Self { sentences }
    }

    /// Sentence sharing the most requirement tokens.
    ///
    /// Repeated requirement tokens count once per occurrence. Ties keep the
    /// earliest sentence and a sentence needs at least one shared token.
    pub fn best_match(&self, requirement_tokens: &[String]) -> Option<&str> {
        let mut best: Option<&EvidenceSentence> = None;
        let mut best_overlap = 0;

        for sentence in &self.sentences {
            let overlap = requirement_tokens
                .iter()
                .filter(|token| sentence.tokens.contains(token))
                .count();
            if overlap > best_overlap {
                best_overlap = overlap;
                best = Some(sentence);
            }
        }

        best.map(|sentence| sentence.text.as_str())
    }

    /// Best matching sentence, or [`NOT_MENTIONED`].
    pub fn evidence_for(&self, requirement_tokens: &[String]) -> String {
        self.best_match(requirement_tokens)
            .unwrap_or(NOT_MENTIONED)
            .to_string()
    }

    pub fn len(&self) -> usize {
        self.sentences.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sentences.is_empty()
    }

    pub fn sentences(&self) -> &[EvidenceSentence] {
        &self.sentences
    }
}
