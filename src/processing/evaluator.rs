//! Per-requirement scoring kernel

use crate::config::ThresholdConfig;
use crate::processing::evidence::SentenceIndex;
use crate::processing::lexicon::Lexicon;
use crate::processing::requirements::Requirement;
use crate::processing::tokenizer::TokenSet;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StatusTier {
    Yes,
    Partially,
    No,
}

impl StatusTier {
    pub fn from_score(score: u8, thresholds: &ThresholdConfig) -> Self {
        if score >= thresholds.status_yes_cutoff {
            StatusTier::Yes
        } else if score >= thresholds.status_partial_cutoff {
            StatusTier::Partially
        } else {
            StatusTier::No
        }
    }

    /// Parse a status label case-insensitively. `Partial` is accepted for `Partially`.
    pub fn parse(label: &str) -> Option<Self> {
        match label.trim().to_lowercase().as_str() {
            "yes" => Some(StatusTier::Yes),
            "partially" | "partial" => Some(StatusTier::Partially),
            "no" => Some(StatusTier::No),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            StatusTier::Yes => "Yes",
            StatusTier::Partially => "Partially",
            StatusTier::No => "No",
        }
    }
}

impl fmt::Display for StatusTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Evaluation {
    pub requirement: String,
    pub status: StatusTier,
    pub score: u8,
    pub evidence: String,
}

/// Score one requirement against the resume.
///
/// `resume_stems` must be the stemmed token set of the resume. Returns
/// `None` when the requirement has no scorable tokens.
pub fn evaluate_requirement(
    requirement: &Requirement,
    resume_stems: &TokenSet,
    index: &SentenceIndex,
    lexicon: &Lexicon,
    thresholds: &ThresholdConfig,
) -> Option<Evaluation> {
    if requirement.is_degenerate() {
        return None;
    }

    let mut total_weight: u32 = requirement
        .stems
        .iter()
        .map(|s| lexicon.critical.weight(s))
        .sum();
    if total_weight == 0 {
        total_weight = requirement.stems.len() as u32;
    }

    let matched_weight: u32 = requirement
        .stems
        .iter()
        .filter(|s| {
            lexicon
                .synonyms
                .forms_of(s)
                .iter()
                .any(|form| resume_stems.contains(form))
        })
        .map(|s| lexicon.critical.weight(s))
        .sum();

    let score = score_from_weights(matched_weight, total_weight);

    Some(Evaluation {
        requirement: requirement.text.clone(),
        status: StatusTier::from_score(score, thresholds),
        score,
        evidence: index.evidence_for(&requirement.tokens),
    })
}

fn score_from_weights(matched: u32, total: u32) -> u8 {
    if total == 0 {
        return 0;
    }
    let ratio = f64::from(matched) / f64::from(total);
    (ratio * 100.0).round().clamp(0.0, 100.0) as u8
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::processing::evidence::NOT_MENTIONED;

    const RESUME: &str = "Led internal audits and maintained documentation per ISO 9001 for 3 years. Excellent communicator.";

    fn evaluate(requirement: &str, resume: &str) -> Option<Evaluation> {
        evaluate_requirement(
            &Requirement::new(requirement),
            &TokenSet::stemmed_from_text(resume),
            &SentenceIndex::build(resume),
            Lexicon::global(),
            &ThresholdConfig::default(),
        )
    }

    #[test]
    fn test_iso_audit_requirement_matches() {
        // experience (1) is the only word missing: 7 of 8
        let evaluation = evaluate("Experience with ISO 9001 audit and documentation", RESUME).unwrap();
        assert_eq!(evaluation.status, StatusTier::Yes);
        assert_eq!(evaluation.score, 88);
        assert_eq!(
            evaluation.evidence,
            "Led internal audits and maintained documentation per ISO 9001 for 3 years"
        );
    }

    #[test]
    fn test_communication_matches_communicator() {
        let evaluation = evaluate("Communication with clients", RESUME).unwrap();
        // clients is not in the resume
        assert_eq!(evaluation.score, 50);

        let evaluation = evaluate("Communication", RESUME).unwrap();
        assert_eq!(evaluation.status, StatusTier::Yes);
        assert_eq!(evaluation.score, 100);
    }

    #[test]
    fn test_posting_words_count_towards_the_score() {
        // strong and experience are scored like any other word
        let evaluation = evaluate("Strong experience in SQL", "Wrote SQL reports daily").unwrap();
        assert_eq!(evaluation.score, 33);
        assert_eq!(evaluation.status, StatusTier::Partially);
    }

    #[test]
    fn test_critical_tokens_weigh_double() {
        // iso (2) matched, kubernetes (1) missing -> 2/3
        let evaluation = evaluate("ISO kubernetes", RESUME).unwrap();
        assert_eq!(evaluation.score, 67);
        assert_eq!(evaluation.status, StatusTier::Yes);

        // documentation (1) matched, kubernetes (1) and calibration (2) missing -> 1/4
        let evaluation = evaluate("documentation kubernetes calibration", RESUME).unwrap();
        assert_eq!(evaluation.score, 25);
        assert_eq!(evaluation.status, StatusTier::No);
    }

    #[test]
    fn test_synonym_counts_once_per_requirement_word() {
        // "compliance" is reached via "conformance"; weight 2 added once
        let evaluation = evaluate("compliance reporting", "Ensured conformance and conformity").unwrap();
        assert_eq!(evaluation.score, 67);
        assert_eq!(evaluation.status, StatusTier::Yes);
    }

    #[test]
    fn test_partial_status() {
        // documentation (1) matched of documentation + kubernetes -> 50
        let evaluation = evaluate("documentation kubernetes", RESUME).unwrap();
        assert_eq!(evaluation.score, 50);
        assert_eq!(evaluation.status, StatusTier::Partially);
    }

    #[test]
    fn test_no_match_uses_sentinel() {
        let evaluation = evaluate("Kubernetes operators written in Golang", RESUME).unwrap();
        assert_eq!(evaluation.score, 0);
        assert_eq!(evaluation.status, StatusTier::No);
        assert_eq!(evaluation.evidence, NOT_MENTIONED);
    }

    #[test]
    fn test_degenerate_requirement_is_skipped() {
        assert!(evaluate("and the of to", RESUME).is_none());
        assert!(evaluate("", RESUME).is_none());
    }

    #[test]
    fn test_evaluation_is_idempotent() {
        let first = evaluate("Manage calibration and proficiency testing", RESUME);
        let second = evaluate("Manage calibration and proficiency testing", RESUME);
        assert_eq!(first, second);
    }

    #[test]
    fn test_adding_matching_tokens_never_lowers_score() {
        let requirement = "Quality management, calibration and proficiency testing";
        let mut resume = String::from("Worked in a laboratory.");
        let mut previous = evaluate(requirement, &resume).unwrap().score;
        for addition in [" Quality lead.", " Managed teams.", " Calibrated devices.", " Proficiency testing rounds."] {
            resume.push_str(addition);
            let score = evaluate(requirement, &resume).unwrap().score;
            assert!(score >= previous, "{} dropped to {}", previous, score);
            previous = score;
        }
        assert_eq!(previous, 100);
    }

    #[test]
    fn test_status_always_consistent_with_score() {
        let thresholds = ThresholdConfig::default();
        for requirement in [
            "ISO 17025 calibration and audits",
            "Customer feedback reporting",
            "Python and Rust development",
            "Training new hires",
        ] {
            let evaluation = evaluate(requirement, RESUME).unwrap();
            assert!(evaluation.score <= 100);
            assert_eq!(evaluation.status, StatusTier::from_score(evaluation.score, &thresholds));
        }
    }

    #[test]
    fn test_status_from_score_boundaries() {
        let thresholds = ThresholdConfig::default();
        assert_eq!(StatusTier::from_score(100, &thresholds), StatusTier::Yes);
        assert_eq!(StatusTier::from_score(60, &thresholds), StatusTier::Yes);
        assert_eq!(StatusTier::from_score(59, &thresholds), StatusTier::Partially);
        assert_eq!(StatusTier::from_score(30, &thresholds), StatusTier::Partially);
        assert_eq!(StatusTier::from_score(29, &thresholds), StatusTier::No);
        assert_eq!(StatusTier::from_score(0, &thresholds), StatusTier::No);
    }

    #[test]
    fn test_status_parse() {
        assert_eq!(StatusTier::parse(" yes "), Some(StatusTier::Yes));
        assert_eq!(StatusTier::parse("Partial"), Some(StatusTier::Partially));
        assert_eq!(StatusTier::parse("NO"), Some(StatusTier::No));
        assert_eq!(StatusTier::parse("maybe"), None);
    }
}
