//! Error types for the Extractor

use scrivener_store::StoreError;
use thiserror::Error;

/// Errors that can occur during extraction
///
/// Unusable model output is not an error: the parser degrades it to `N/A`.
#[derive(Error, Debug)]
pub enum ExtractorError {
    /// Unknown answer category, ambiguous schema or invalid settings
    #[error("Configuration error: {0}")]
    Config(String),

    /// Question id absent from the registry
    #[error("Question id not found: {0}")]
    QuestionNotFound(String),

    /// LLM provider error; fails the whole request
    #[error("LLM error: {0}")]
    Llm(String),

    /// Prompt template could not be loaded
    #[error("Template error: {0}")]
    Template(String),

    /// Registry or prompt folder error
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// Contract exceeds maximum length
    #[error("Text too long: {0} chars (max: {1})")]
    TextTooLong(usize, usize),

    /// Ground truth and sample contracts do not line up
    #[error("Evaluation error: {0}")]
    Evaluation(String),
}

impl ExtractorError {
    /// Whether the error reports an unknown question id
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            ExtractorError::QuestionNotFound(_) | ExtractorError::Store(StoreError::NotFound(_))
        )
    }
}
