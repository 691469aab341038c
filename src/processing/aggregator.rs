//! Combines requirement evaluations into an overall result

use crate::config::ThresholdConfig;
use crate::error::{Result, ResumeFitError};
use crate::processing::evaluator::Evaluation;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Requirement scores at or below this count as gaps.
pub const GAP_CEILING: u8 = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Classification {
    Strong,
    Moderate,
    Weak,
}

impl Classification {
    pub fn from_score(score: u8, thresholds: &ThresholdConfig) -> Self {
        if score >= thresholds.strong_cutoff {
            Classification::Strong
        } else if score >= thresholds.moderate_cutoff {
            Classification::Moderate
        } else {
            Classification::Weak
        }
    }

    /// Accepts `Strong`, `strong match`, `Strong Match` and so on.
    pub fn parse(label: &str) -> Option<Self> {
        let lower = label.trim().to_lowercase();
        match lower.strip_suffix(" match").unwrap_or(&lower).trim() {
            "strong" => Some(Classification::Strong),
            "moderate" => Some(Classification::Moderate),
            "weak" => Some(Classification::Weak),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Classification::Strong => "Strong Match",
            Classification::Moderate => "Moderate Match",
            Classification::Weak => "Weak Match",
        }
    }

    pub fn narrative(&self) -> &'static str {
        match self {
            Classification::Strong => {
                "Candidate demonstrates most critical technical and soft-skill requirements. \
                 High interview potential if salary/location fit."
            }
            Classification::Moderate => {
                "Candidate has core transferable skills but may lack some specific tools or \
                 domain experience required by the job description."
            }
            Classification::Weak => {
                "Candidate is missing several critical requirements or key qualifications. \
                 Interview chances may be low unless the role is flexible."
            }
        }
    }
}

impl fmt::Display for Classification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Which evaluator produced a result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum EvaluatorBackend {
    Local,
    Remote { model: String },
}

impl fmt::Display for EvaluatorBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EvaluatorBackend::Local => write!(f, "local"),
            EvaluatorBackend::Remote { model } => write!(f, "remote:{}", model),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub overall_score: u8,
    pub classification: Classification,
    pub explanation: String,
    pub evaluations: Vec<Evaluation>,
    /// Requirements scored 100
    pub strengths: Vec<String>,
    /// Requirements scored at or below [`GAP_CEILING`]
    pub gaps: Vec<String>,
    pub backend: EvaluatorBackend,
}

impl AnalysisResult {
    pub fn requirement_count(&self) -> usize {
        self.evaluations.len()
    }
}

/// Rounded mean of the evaluation scores.
pub fn overall_score(evaluations: &[Evaluation]) -> Option<u8> {
    if evaluations.is_empty() {
        return None;
    }
    let total: u32 = evaluations.iter().map(|e| u32::from(e.score)).sum();
    let mean = f64::from(total) / evaluations.len() as f64;
    Some(mean.round().clamp(0.0, 100.0) as u8)
}

pub fn strengths_of(evaluations: &[Evaluation]) -> Vec<String> {
    evaluations
        .iter()
        .filter(|e| e.score == 100)
        .map(|e| e.requirement.clone())
        .collect()
}

pub fn gaps_of(evaluations: &[Evaluation]) -> Vec<String> {
    evaluations
        .iter()
        .filter(|e| e.score <= GAP_CEILING)
        .map(|e| e.requirement.clone())
        .collect()
}

/// Build the overall result. An empty evaluation list means nothing could
/// be extracted from the job description.
pub fn aggregate(evaluations: Vec<Evaluation>, thresholds: &ThresholdConfig) -> Result<AnalysisResult> {
    let overall_score = overall_score(&evaluations).ok_or(ResumeFitError::NoRequirements)?;
    let classification = Classification::from_score(overall_score, thresholds);

    Ok(AnalysisResult {
        overall_score,
        classification,
        explanation: classification.narrative().to_string(),
        strengths: strengths_of(&evaluations),
        gaps: gaps_of(&evaluations),
        evaluations,
        backend: EvaluatorBackend::Local,
    })
}
