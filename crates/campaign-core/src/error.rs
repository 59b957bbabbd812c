//! Centralized error types for the campaign advisor.

use thiserror::Error;

/// Main error type for campaign operations.
#[derive(Error, Debug)]
pub enum CampaignError {
    #[error("Missing credential: {0}")]
    MissingCredential(String),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Model transport error: {0}")]
    Transport(String),

    #[error("Model API error (HTTP {status}): {body}")]
    Api { status: u16, body: String },

    #[error("Missing payload: {0}")]
    MissingPayload(String),

    #[error("Render error: {0}")]
    Render(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for campaign operations.
pub type CampaignResult<T> = Result<T, CampaignError>;

impl CampaignError {
    /// Create a validation error.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::ValidationError(msg.into())
    }

    /// Create a render error.
    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render(msg.into())
    }

    /// Create a missing payload error.
    pub fn missing_payload(msg: impl Into<String>) -> Self {
        Self::MissingPayload(msg.into())
    }
}
