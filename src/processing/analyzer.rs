//! Analysis engine: input validation and evaluator selection

use crate::config::{Config, ThresholdConfig};
use crate::error::{Result, ResumeFitError};
use crate::llm::client::RemoteEvaluator;
use crate::processing::aggregator::{aggregate, AnalysisResult};
use crate::processing::evaluator::evaluate_requirement;
use crate::processing::evidence::SentenceIndex;
use crate::processing::lexicon::Lexicon;
use crate::processing::requirements::{extract_requirements, Requirement};
use crate::processing::tokenizer::TokenSet;
use log::{debug, info, warn};
use std::future::Future;
use std::time::Instant;

pub const RESUME_TOO_SHORT: &str = "Please provide enough resume text (at least a few lines).";
pub const JOB_TOO_SHORT: &str = "Please paste a complete job description.";

/// Strategy for turning a resume and a job description into a result.
pub trait Evaluator {
    fn evaluate(&self, resume: &str, job: &str) -> impl Future<Output = Result<AnalysisResult>> + Send;

    fn name(&self) -> String;
}

/// Deterministic keyword kernel. Never touches the network.
#[derive(Debug, Clone)]
pub struct LocalEvaluator {
    thresholds: ThresholdConfig,
    lexicon: &'static Lexicon,
}

impl LocalEvaluator {
    pub fn new(thresholds: ThresholdConfig) -> Self {
        Self {
            thresholds,
            lexicon: Lexicon::global(),
        }
    }

    /// Run the full local pipeline synchronously.
    pub fn analyze(&self, resume: &str, job: &str) -> Result<AnalysisResult> {
        let requirements = extract_requirements(job);
        debug!("Extracted {} requirements", requirements.len());

        let resume_stems = TokenSet::stemmed_from_text(resume);
        let index = SentenceIndex::build(resume);
        debug!(
            "Resume has {} distinct stems across {} sentences",
            resume_stems.len(),
            index.len()
        );

        let evaluations = requirements
            .into_iter()
            .map(Requirement::new)
            .filter_map(|req| {
                evaluate_requirement(&req, &resume_stems, &index, self.lexicon, &self.thresholds)
            })
            .collect();

        aggregate(evaluations, &self.thresholds)
    }

    pub fn thresholds(&self) -> &ThresholdConfig {
        &self.thresholds
    }
}

impl Evaluator for LocalEvaluator {
    async fn evaluate(&self, resume: &str, job: &str) -> Result<AnalysisResult> {
        self.analyze(resume, job)
    }

    fn name(&self) -> String {
        "local".to_string()
    }
}

/// Validates input, then tries the remote evaluator (when configured) and
/// falls back to the local kernel on any remote failure.
pub struct AnalysisEngine<R = RemoteEvaluator> {
    local: LocalEvaluator,
    remote: Option<R>,
    min_input_chars: usize,
}

impl AnalysisEngine<RemoteEvaluator> {
    pub fn from_config(config: &Config, local_only: bool) -> Result<Self> {
        let engine = Self::new(LocalEvaluator::new(config.thresholds), config.input.min_chars);
        if local_only || !config.remote.enabled {
            info!("Using local evaluator only");
            return Ok(engine);
        }
        let remote = RemoteEvaluator::new(&config.remote, config.thresholds)?;
        info!("Remote evaluator enabled ({})", remote.name());
        Ok(engine.with_remote(remote))
    }
}

impl<R: Evaluator> AnalysisEngine<R> {
    pub fn new(local: LocalEvaluator, min_input_chars: usize) -> Self {
        Self {
            local,
            remote: None,
            min_input_chars,
        }
    }

    pub fn with_remote(mut self, remote: R) -> Self {
        self.remote = Some(remote);
        self
    }

    pub fn has_remote(&self) -> bool {
        self.remote.is_some()
    }

    /// Reject inputs too short to analyze. Runs before any extraction.
    pub fn validate_input(&self, resume: &str, job: &str) -> Result<()> {
        if resume.trim().chars().count() < self.min_input_chars {
            return Err(ResumeFitError::InputValidation(RESUME_TOO_SHORT.to_string()));
        }
        if job.trim().chars().count() < self.min_input_chars {
            return Err(ResumeFitError::InputValidation(JOB_TOO_SHORT.to_string()));
        }
        Ok(())
    }

    pub async fn analyze(&self, resume: &str, job: &str) -> Result<AnalysisResult> {
        self.validate_input(resume, job)?;
        let started = Instant::now();

        if let Some(remote) = &self.remote {
            match remote.evaluate(resume, job).await {
                Ok(result) => {
                    info!(
                        "Remote evaluation ({}) finished in {}ms",
                        remote.name(),
                        started.elapsed().as_millis()
                    );
                    return Ok(result);
                }
                Err(e) => warn!("Remote evaluator {} failed, using local kernel: {}", remote.name(), e),
            }
        }

        let result = self.local.analyze(resume, job)?;
        info!(
            "Local evaluation of {} requirements finished in {}ms",
            result.requirement_count(),
            started.elapsed().as_millis()
        );
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::processing::aggregator::{Classification, EvaluatorBackend};

    const RESUME: &str = "Quality Engineer with 6 years in accredited laboratories.\n\
        Led internal audits and maintained documentation per ISO 9001 and ISO 17025.\n\
        Managed calibration schedules and proficiency testing rounds.";

    const JOB: &str = "- Conduct internal audits against ISO 17025\n\
        - Maintain calibration records and documentation\n\
        - Coordinate proficiency testing programmes\n\
        - Develop Kubernetes deployment pipelines";

    fn local_engine() -> AnalysisEngine<LocalEvaluator> {
        AnalysisEngine::new(LocalEvaluator::new(ThresholdConfig::default()), 50)
    }

    #[tokio::test]
    async fn test_empty_inputs_fail_validation() {
        let engine = local_engine();
        let err = engine.analyze("", "").await.unwrap_err();
        match err {
            ResumeFitError::InputValidation(message) => assert_eq!(message, RESUME_TOO_SHORT),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_short_job_fails_validation() {
        let engine = local_engine();
        let err = engine.analyze(RESUME, "Rust dev").await.unwrap_err();
        assert!(matches!(err, ResumeFitError::InputValidation(ref m) if m == JOB_TOO_SHORT));
    }

    #[tokio::test]
    async fn test_local_analysis() {
        let engine = local_engine();
        let result = engine.analyze(RESUME, JOB).await.unwrap();

        assert_eq!(result.requirement_count(), 4);
        assert_eq!(result.backend, EvaluatorBackend::Local);
        assert!(result.gaps.contains(&"Develop Kubernetes deployment pipelines".to_string()));
        assert!(result.evaluations.iter().all(|e| e.score <= 100));
        assert_eq!(result.evaluations[0].requirement, "Conduct internal audits against ISO 17025");
    }

    #[tokio::test]
    async fn test_job_without_requirements() {
        let engine = local_engine();
        // Long enough to pass validation, but only short lines and short sentences
        let job = "Apply now.\nGreat team.\nFun office.\nRemote ok.\nFree lunch.\nGood pay.";
        let err = engine.analyze(RESUME, job).await.unwrap_err();
        assert!(matches!(err, ResumeFitError::NoRequirements));
    }

    #[test]
    fn test_local_kernel_is_idempotent() {
        let local = LocalEvaluator::new(ThresholdConfig::default());
        assert_eq!(local.analyze(RESUME, JOB).unwrap(), local.analyze(RESUME, JOB).unwrap());
    }

    #[test]
    fn test_custom_thresholds_change_classification() {
        let lenient = ThresholdConfig {
            strong_cutoff: 20,
            moderate_cutoff: 10,
            ..ThresholdConfig::default()
        };
        let result = LocalEvaluator::new(lenient).analyze(RESUME, JOB).unwrap();
        assert_eq!(result.classification, Classification::Strong);
    }
}
