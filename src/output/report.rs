//! Per-run analysis session and the documents derived from it

use crate::error::{Result, ResumeFitError};
use crate::processing::aggregator::{AnalysisResult, Classification};
use crate::processing::evaluator::StatusTier;
use askama::Template;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// JD lines quoted in the cover letter
const COVER_LETTER_JD_LINES: usize = 4;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportMetadata {
    pub generated_at: DateTime<Utc>,
    pub resume_file: String,
    pub job_file: String,
    pub tool_version: String,
}

impl ReportMetadata {
    pub fn new(resume_file: impl Into<String>, job_file: impl Into<String>) -> Self {
        Self {
            generated_at: Utc::now(),
            resume_file: resume_file.into(),
            job_file: job_file.into(),
            tool_version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

/// Everything one analysis run produced. Read-only once created; a new
/// run creates a new session.
#[derive(Debug, Clone)]
pub struct AnalysisSession {
    resume_text: String,
    job_text: String,
    result: AnalysisResult,
    metadata: ReportMetadata,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CoverLetter {
    Generated(String),
    /// Not a strong match; carries the overall score
    Withheld { score: u8 },
}

impl CoverLetter {
    /// Letter text, or the explanation shown instead of it.
    pub fn text(&self) -> String {
        match self {
            CoverLetter::Generated(letter) => letter.clone(),
            CoverLetter::Withheld { score } => format!(
                "Match score of {}% is below the strong match cutoff. A cover letter will not be generated. \
                 Please improve your resume for a better chance.",
                score
            ),
        }
    }

    pub fn is_generated(&self) -> bool {
        matches!(self, CoverLetter::Generated(_))
    }
}

#[derive(Template)]
#[template(
    source = r#"Dear Hiring Manager,

I am writing to apply for the position described in your job posting. A requirement-by-requirement comparison of my resume against the posting puts my overall alignment at roughly {{ score }}%.

That comparison shows direct matches on most of the listed responsibilities. My background includes:
{% for strength in strengths -%}
- {{ strength }}
{% endfor %}
Your role, which focuses on {{ role_focus }}, fits my experience and the direction I want to grow in. I learn quickly, take ownership of my work and look for ways to improve the processes around me.

Thank you for considering my application. I would welcome the chance to discuss how I can contribute to your team.

Sincerely,
[Your Name Here]"#,
    ext = "txt"
)]
struct CoverLetterTemplate<'a> {
    score: u8,
    strengths: Vec<&'a str>,
    role_focus: String,
}

#[derive(Template)]
#[template(
    source = r#"ATS-Friendly Resume

Professional Summary:
{{ summary }}
{% if !original.is_empty() %}
Original Resume Content:
{{ original }}
{% endif %}
{% if additions.is_empty() -%}
Additional Skills & Qualifications:
- Your resume already covers all critical job requirements. Keep highlighting measurable achievements in concise bullet points.
{%- else -%}
Additional Skills & Qualifications (to close gaps):
{% for addition in additions -%}
- {{ addition }}
{% endfor %}
{%- endif %}"#,
    ext = "txt"
)]
struct EnhancedResumeTemplate<'a> {
    summary: &'a str,
    original: &'a str,
    additions: Vec<&'a str>,
}

impl AnalysisSession {
    pub fn new(
        resume_text: impl Into<String>,
        job_text: impl Into<String>,
        result: AnalysisResult,
        metadata: ReportMetadata,
    ) -> Self {
        Self {
            resume_text: resume_text.into(),
            job_text: job_text.into(),
            result,
            metadata,
        }
    }

    pub fn result(&self) -> &AnalysisResult {
        &self.result
    }

    pub fn metadata(&self) -> &ReportMetadata {
        &self.metadata
    }

    pub fn resume_text(&self) -> &str {
        &self.resume_text
    }

    pub fn job_text(&self) -> &str {
        &self.job_text
    }

    /// Cover letter for strong matches only.
    pub fn cover_letter(&self) -> Result<CoverLetter> {
        if self.result.classification != Classification::Strong {
            return Ok(CoverLetter::Withheld {
                score: self.result.overall_score,
            });
        }

        let role_focus = self
            .job_text
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .take(COVER_LETTER_JD_LINES)
            .collect::<Vec<_>>()
            .join(" ");
        let role_focus = if role_focus.is_empty() {
            "the responsibilities outlined in your advertisement".to_string()
        } else {
            role_focus
        };

        let mut strengths: Vec<&str> = self.result.strengths.iter().map(String::as_str).take(3).collect();
        if strengths.is_empty() {
            strengths.push("Delivering on responsibilities that closely mirror your requirements.");
        }

        let letter = CoverLetterTemplate {
            score: self.result.overall_score,
            strengths,
            role_focus,
        }
        .render()
        .map_err(|e| ResumeFitError::OutputFormatting(e.to_string()))?;

        Ok(CoverLetter::Generated(letter))
    }

    /// Resume rewrite listing every requirement not fully met.
    pub fn enhanced_resume(&self) -> Result<String> {
        let summary = match self.result.classification {
            Classification::Strong => {
                "A highly qualified candidate who meets nearly all job requirements and brings strong technical and soft skills."
            }
            Classification::Moderate => {
                "A candidate with solid core skills and experience, with some gaps that can be closed quickly through training and growth."
            }
            Classification::Weak => {
                "A motivated candidate eager to learn and develop, bringing foundational skills and a passion for growth."
            }
        };

        let additions = self
            .result
            .evaluations
            .iter()
            .filter(|e| e.status != StatusTier::Yes)
            .map(|e| e.requirement.as_str())
            .collect();

        let text = EnhancedResumeTemplate {
            summary,
            original: self.resume_text.trim(),
            additions,
        }
        .render()
        .map_err(|e| ResumeFitError::OutputFormatting(e.to_string()))?;

        Ok(text.trim().to_string())
    }

    /// Markdown table of every evaluated requirement.
    pub fn gap_table(&self) -> String {
        let mut table = String::from("| Requirement | Status | Score | Evidence |\n|---|---|---|---|\n");
        for evaluation in &self.result.evaluations {
            table.push_str(&format!(
                "| {} | {} | {}% | {} |\n",
                escape_cell(&evaluation.requirement),
                evaluation.status,
                evaluation.score,
                escape_cell(&evaluation.evidence)
            ));
        }
        table
    }
}

fn escape_cell(text: &str) -> String {
    text.replace('|', "\\|").replace('\n', " ")
}
