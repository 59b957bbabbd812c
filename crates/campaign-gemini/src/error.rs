//! Gemini client errors.

use campaign_core::CampaignError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum GeminiError {
    #[error("Failed to call Gemini API: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Gemini API error (HTTP {status}): {body}")]
    Api { status: u16, body: String },

    #[error("Gemini blocked the prompt: {0}")]
    Blocked(String),

    #[error("Invalid inline image data: {0}")]
    Decode(#[from] base64::DecodeError),
}

impl From<GeminiError> for CampaignError {
    fn from(e: GeminiError) -> Self {
        match e {
            GeminiError::Api { status, body } => CampaignError::Api { status, body },
            GeminiError::Http(e) => CampaignError::Transport(e.to_string()),
            GeminiError::Blocked(reason) => {
                CampaignError::missing_payload(format!("prompt bloqué ({})", reason))
            }
            GeminiError::Decode(e) => CampaignError::missing_payload(e.to_string()),
        }
    }
}
