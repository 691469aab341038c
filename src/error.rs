//! Error handling for the resume fit application

use crate::llm::client::RemoteError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ResumeFitError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("PDF extraction error: {0}")]
    PdfExtraction(String),

    #[error("DOCX extraction error: {0}")]
    DocxExtraction(String),

    #[error("File format not supported: {0}")]
    UnsupportedFormat(String),

    /// Resume or job description rejected before analysis.
    #[error("{0}")]
    InputValidation(String),

    #[error("Could not extract clear requirements from the job description. Please ensure it includes bullet points or sentences.")]
    NoRequirements,

    #[error("Remote evaluator error: {0}")]
    Remote(#[from] RemoteError),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Output formatting error: {0}")]
    OutputFormatting(String),

    #[error("Document export error: {0}")]
    DocumentWrite(String),

    #[error("Tracker error: {0}")]
    Tracker(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl ResumeFitError {
    /// Errors the user can fix by changing their input, as opposed to
    /// failures of the tool itself.
    pub fn is_user_facing(&self) -> bool {
        matches!(
            self,
            ResumeFitError::InputValidation(_)
                | ResumeFitError::NoRequirements
                | ResumeFitError::UnsupportedFormat(_)
                | ResumeFitError::PdfExtraction(_)
                | ResumeFitError::DocxExtraction(_)
                | ResumeFitError::InvalidInput(_)
                | ResumeFitError::Tracker(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, ResumeFitError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_facing_classification() {
        assert!(ResumeFitError::NoRequirements.is_user_facing());
        assert!(ResumeFitError::InputValidation("too short".to_string()).is_user_facing());
        assert!(ResumeFitError::DocxExtraction("not a zip".to_string()).is_user_facing());
        assert!(!ResumeFitError::Configuration("bad".to_string()).is_user_facing());
        assert!(!ResumeFitError::Remote(RemoteError::EmptyContent).is_user_facing());
    }

    #[test]
    fn test_no_requirements_message() {
        let message = ResumeFitError::NoRequirements.to_string();
        assert!(message.starts_with("Could not extract clear requirements"));
    }
}
