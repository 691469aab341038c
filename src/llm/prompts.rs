//! Prompt for the remote evaluator

use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};

static PLACEHOLDER: Lazy<Regex> = Lazy::new(|| Regex::new(r"\{(resume|job)\}").expect("valid placeholder regex"));

pub const SYSTEM_PROMPT: &str = "You are an experienced technical recruiter and ATS specialist. \
You compare resumes against job descriptions requirement by requirement and answer with JSON only.";

/// Prompt template with `{resume}` and `{job}` placeholders
#[derive(Debug, Clone)]
pub struct PromptTemplates {
    pub evaluation: String,
}

impl Default for PromptTemplates {
    fn default() -> Self {
        Self {
            evaluation: EVALUATION_TEMPLATE.to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PromptParams {
    pub resume_content: String,
    pub job_content: String,
}

impl PromptTemplates {
    /// Fill both placeholders in one pass, so braces inside the documents
    /// are never substituted.
    pub fn render_evaluation(&self, params: &PromptParams) -> String {
        PLACEHOLDER
            .replace_all(&self.evaluation, |caps: &Captures| match &caps[1] {
                "resume" => params.resume_content.as_str(),
                _ => params.job_content.as_str(),
            })
            .into_owned()
    }
}

const EVALUATION_TEMPLATE: &str = r#"TASK: Break the job posting into its individual requirements and judge how well the resume satisfies each one.

<RESUME>
{resume}
</RESUME>

<JOB POSTING>
{job}
</JOB POSTING>

Respond with a single JSON object and nothing else, using exactly these keys:
{
  "overall_score": <integer 0-100>,
  "classification": "Strong Match" | "Moderate Match" | "Weak Match",
  "itemized": [
    {
      "requirement": "<requirement text copied from the job posting>",
      "status": "Yes" | "Partially" | "No",
      "match_percent": <integer 0-100>,
      "justification": "<resume sentence supporting the judgement, or Not mentioned in text.>"
    }
  ],
  "strengths": ["<requirement>"],
  "gaps": ["<requirement>"],
  "summary": "<two sentences on interview potential>"
}

IMPORTANT: Quote the resume for every justification. Do not invent experience."#;
