//! Remote evaluator backed by an OpenAI-compatible chat completions API
//!
//! The remote service only supplies the requirement list, per-requirement
//! percentages, justifications and a summary. Statuses, the overall score,
//! the classification and the strength/gap lists are recomputed with the
//! local threshold table so every result obeys the same rules.

use crate::config::{RemoteConfig, ThresholdConfig};
use crate::error::Result;
use crate::llm::prompts::{PromptParams, PromptTemplates, SYSTEM_PROMPT};
use crate::processing::aggregator::{
    gaps_of, overall_score, strengths_of, AnalysisResult, Classification, EvaluatorBackend,
};
use crate::processing::analyzer::Evaluator;
use crate::processing::evaluator::{Evaluation, StatusTier};
use crate::processing::evidence::NOT_MENTIONED;
use log::debug;
use reqwest::Client;
use serde::{Deserialize, Deserializer, Serialize};
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RemoteError {
    #[error("API key not set (expected in ${0})")]
    MissingApiKey(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("remote evaluator returned empty content")]
    EmptyContent,

    #[error("malformed evaluation: {0}")]
    Malformed(String),
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    max_tokens: u32,
    temperature: f32,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiErrorEnvelope {
    error: ApiErrorBody,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    message: String,
}

/// JSON object the prompt asks for.
#[derive(Debug, Deserialize)]
struct RemoteReport {
    #[serde(default, deserialize_with = "lenient_percent")]
    overall_score: Option<f64>,
    #[serde(default)]
    classification: Option<String>,
    #[serde(default)]
    itemized: Vec<RemoteItem>,
    #[serde(default)]
    summary: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RemoteItem {
    #[serde(default)]
    requirement: String,
    #[serde(default)]
    status: Option<String>,
    #[serde(default, deserialize_with = "lenient_percent")]
    match_percent: Option<f64>,
    #[serde(default)]
    justification: Option<String>,
}

/// Accept `80`, `80.5`, `"80"` and `"80%"`.
fn lenient_percent<'de, D>(deserializer: D) -> std::result::Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(serde_json::Value::Number(n)) => n.as_f64(),
        Some(serde_json::Value::String(s)) => s.trim().trim_end_matches('%').trim().parse().ok(),
        _ => None,
    })
}

fn to_score(percent: f64) -> u8 {
    if percent.is_nan() {
        return 0;
    }
    percent.round().clamp(0.0, 100.0) as u8
}

/// Convert the assistant message into a result.
///
/// The JSON object is taken from the first `{` to the last `}` so code
/// fences and chatter around it are ignored.
pub fn parse_remote_report(
    content: &str,
    model: &str,
    thresholds: &ThresholdConfig,
) -> std::result::Result<AnalysisResult, RemoteError> {
    let json = match (content.find('{'), content.rfind('}')) {
        (Some(start), Some(end)) if start < end => &content[start..=end],
        _ => return Err(RemoteError::Malformed("no JSON object in response".to_string())),
    };

    let report: RemoteReport =
        serde_json::from_str(json).map_err(|e| RemoteError::Malformed(e.to_string()))?;

    let evaluations: Vec<Evaluation> = report
        .itemized
        .into_iter()
        .filter(|item| !item.requirement.trim().is_empty())
        .map(|item| {
            let score = to_score(item.match_percent.unwrap_or(0.0));
            let status = StatusTier::from_score(score, thresholds);
            if let Some(reported) = item.status.as_deref().and_then(StatusTier::parse) {
                if reported != status {
                    debug!(
                        "Remote status {} for '{}' overridden by score {}",
                        reported, item.requirement, score
                    );
                }
            }
            let evidence = item
                .justification
                .map(|j| j.trim().to_string())
                .filter(|j| !j.is_empty())
                .unwrap_or_else(|| NOT_MENTIONED.to_string());
            Evaluation {
                requirement: item.requirement.trim().to_string(),
                status,
                score,
                evidence,
            }
        })
        .collect();

    let overall = overall_score(&evaluations)
        .ok_or_else(|| RemoteError::Malformed("itemized list is empty".to_string()))?;
    if let Some(reported) = report.overall_score.map(to_score) {
        if reported != overall {
            debug!("Remote overall score {} differs from item mean {}", reported, overall);
        }
    }

    let classification = Classification::from_score(overall, thresholds);
    if let Some(reported) = report.classification.as_deref().and_then(Classification::parse) {
        if reported != classification {
            debug!("Remote classification {} overridden by {}", reported, classification);
        }
    }

    let explanation = report
        .summary
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| classification.narrative().to_string());

    Ok(AnalysisResult {
        overall_score: overall,
        classification,
        explanation,
        strengths: strengths_of(&evaluations),
        gaps: gaps_of(&evaluations),
        evaluations,
        backend: EvaluatorBackend::Remote {
            model: model.to_string(),
        },
    })
}

/// Chat completions client that returns a structured evaluation.
pub struct RemoteEvaluator {
    http: Client,
    config: RemoteConfig,
    api_key: Option<String>,
    thresholds: ThresholdConfig,
    templates: PromptTemplates,
}

impl RemoteEvaluator {
    /// The API key is read from `config.api_key_env` now; a missing key is
    /// reported on the first call.
    pub fn new(config: &RemoteConfig, thresholds: ThresholdConfig) -> Result<Self> {
        let http = Client::builder()
            .user_agent(concat!("resume-fit/", env!("CARGO_PKG_VERSION")))
            .connect_timeout(Duration::from_secs(config.timeout_secs.min(10)))
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(RemoteError::Http)?;
        let api_key = std::env::var(&config.api_key_env)
            .ok()
            .filter(|key| !key.trim().is_empty());

        Ok(Self {
            http,
            config: config.clone(),
            api_key,
            thresholds,
            templates: PromptTemplates::default(),
        })
    }

    async fn request(&self, resume: &str, job: &str) -> std::result::Result<AnalysisResult, RemoteError> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or_else(|| RemoteError::MissingApiKey(self.config.api_key_env.clone()))?;

        let prompt = self.templates.render_evaluation(&PromptParams {
            resume_content: resume.to_string(),
            job_content: job.to_string(),
        });
        let body = ChatRequest {
            model: &self.config.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: SYSTEM_PROMPT,
                },
                ChatMessage {
                    role: "user",
                    content: &prompt,
                },
            ],
            max_tokens: self.config.max_tokens,
            temperature: self.config.temperature,
        };

        debug!("Sending evaluation request to {}", self.config.endpoint);
        let response = self
            .http
            .post(&self.config.endpoint)
            .bearer_auth(api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ApiErrorEnvelope>(&text)
                .map(|e| e.error.message)
                .unwrap_or(text);
            return Err(RemoteError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let chat: ChatResponse = response.json().await?;
        let content = chat
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .filter(|content| !content.trim().is_empty())
            .ok_or(RemoteError::EmptyContent)?;

        parse_remote_report(&content, &self.config.model, &self.thresholds)
    }
}

impl Evaluator for RemoteEvaluator {
    async fn evaluate(&self, resume: &str, job: &str) -> Result<AnalysisResult> {
        Ok(self.request(resume, job).await?)
    }

    fn name(&self) -> String {
        format!("remote:{}", self.config.model)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RESPONSE: &str = r#"Here is the evaluation:
```json
{
  "overall_score": 90,
  "classification": "Strong Match",
  "itemized": [
    {"requirement": "ISO 9001 audits", "status": "Yes", "match_percent": 100, "justification": "Led internal audits per ISO 9001"},
    {"requirement": "Calibration", "status": "Partial", "match_percent": "45%", "justification": ""},
    {"requirement": "Kubernetes", "status": "No", "match_percent": 10}
  ],
  "strengths": ["ISO 9001 audits"],
  "gaps": ["Kubernetes"],
  "summary": "Solid quality background."
}
```"#;

    #[test]
    fn test_parse_fenced_response() {
        let result = parse_remote_report(RESPONSE, "gpt-4", &ThresholdConfig::default()).unwrap();

        assert_eq!(result.evaluations.len(), 3);
        assert_eq!(result.evaluations[0].status, StatusTier::Yes);
        assert_eq!(result.evaluations[1].score, 45);
        assert_eq!(result.evaluations[1].status, StatusTier::Partially);
        assert_eq!(result.evaluations[1].evidence, NOT_MENTIONED);
        assert_eq!(result.evaluations[2].evidence, NOT_MENTIONED);
        // (100 + 45 + 10) / 3 = 51.67
        assert_eq!(result.overall_score, 52);
        assert_eq!(result.classification, Classification::Moderate);
        assert_eq!(result.strengths, vec!["ISO 9001 audits"]);
        assert_eq!(result.gaps, vec!["Kubernetes"]);
        assert_eq!(result.explanation, "Solid quality background.");
        assert_eq!(
            result.backend,
            EvaluatorBackend::Remote {
                model: "gpt-4".to_string()
            }
        );
    }

    #[test]
    fn test_scores_are_clamped() {
        let content = r#"{"itemized": [{"requirement": "A", "match_percent": 140}, {"requirement": "B", "match_percent": -5}]}"#;
        let result = parse_remote_report(content, "m", &ThresholdConfig::default()).unwrap();
        assert_eq!(result.evaluations[0].score, 100);
        assert_eq!(result.evaluations[1].score, 0);
        assert_eq!(result.explanation, Classification::Moderate.narrative());
    }

    #[test]
    fn test_empty_itemized_is_malformed() {
        let content = r#"{"overall_score": 80, "itemized": []}"#;
        let err = parse_remote_report(content, "m", &ThresholdConfig::default()).unwrap_err();
        assert!(matches!(err, RemoteError::Malformed(_)));
    }

    #[test]
    fn test_non_json_is_malformed() {
        for content in ["I cannot help with that.", "} backwards {", "{ not json }"] {
            let err = parse_remote_report(content, "m", &ThresholdConfig::default()).unwrap_err();
            assert!(matches!(err, RemoteError::Malformed(_)), "{}", content);
        }
    }

    #[tokio::test]
    async fn test_missing_api_key() {
        let config = RemoteConfig {
            api_key_env: "RESUME_FIT_TEST_UNSET_KEY".to_string(),
            ..RemoteConfig::default()
        };
        let evaluator = RemoteEvaluator::new(&config, ThresholdConfig::default()).unwrap();
        let err = evaluator.request("resume", "job").await.unwrap_err();
        assert!(matches!(err, RemoteError::MissingApiKey(ref name) if name == "RESUME_FIT_TEST_UNSET_KEY"));
    }
}
