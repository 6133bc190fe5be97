//! Error types for the analysis core

use thiserror::Error;

/// Result type alias using [`AnalysisError`]
pub type Result<T> = std::result::Result<T, AnalysisError>;

/// Errors that abort an analysis run
///
/// Missing or odd individual page signals never surface here; they resolve
/// to zero/empty values inside the scorers.
#[derive(Debug, Error)]
pub enum AnalysisError {
    /// The LLM reply had no JSON object boundary or failed to parse
    #[error("analysis incomplete: malformed LLM response: {0}")]
    MalformedResponse(String),

    /// Balance outside of 0..=100
    #[error("balance must be between 0 and 100, got {0}")]
    InvalidBalance(i64),

    /// The industry detector collaborator failed
    #[error("industry detection failed: {0:#}")]
    Detector(#[source] anyhow::Error),

    /// The LLM collaborator failed before returning a response
    #[error("LLM request failed: {0:#}")]
    Llm(#[source] anyhow::Error),
}

impl AnalysisError {
    /// Whether the AIO side could not be computed at all
    pub fn is_incomplete(&self) -> bool {
        matches!(self, Self::MalformedResponse(_) | Self::Llm(_))
    }
}
