//! Gemini HTTP client.
//!
//! One POST per call: no retry, no streaming, no caching.

use std::time::Duration;

use async_trait::async_trait;
use campaign_core::{CampaignResult, GenerationRequest, GenerativeModel, ModelResponse};
use tracing::debug;

use crate::error::GeminiError;
use crate::wire::{GenerateContentRequest, GenerateContentResponse};

/// Default Gemini API URL.
pub const DEFAULT_API_BASE: &str = "https://generativelanguage.googleapis.com";

/// Image generation is slow; the timeout only guards against hung connections.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(180);

/// Client for the Gemini `generateContent` endpoint.
#[derive(Clone)]
pub struct GeminiClient {
    api_key: String,
    base_url: String,
    client: reqwest::Client,
}

impl GeminiClient {
    /// Create a client for the public API.
    pub fn new(api_key: &str) -> Self {
        Self::with_base_url(api_key, DEFAULT_API_BASE)
    }

    /// Create a client against another base URL.
    pub fn with_base_url(api_key: &str, base_url: &str) -> Self {
        let client = reqwest::Client::builder()
            .timeout(DEFAULT_TIMEOUT)
            .build()
            .unwrap_or_default();

        Self {
            api_key: api_key.to_string(),
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        }
    }

    /// Endpoint for a model, accepting both `gemini-pro` and `models/gemini-pro`.
    pub fn endpoint(&self, model: &str) -> String {
        let model = model.trim().trim_start_matches('/');
        let model = model.strip_prefix("models/").unwrap_or(model);
        format!("{}/v1beta/models/{}:generateContent", self.base_url, model)
    }

    /// Send one request and return the first candidate's parts.
    pub async fn generate_content(
        &self,
        request: &GenerationRequest,
    ) -> Result<ModelResponse, GeminiError> {
        let url = self.endpoint(&request.model);
        let body = GenerateContentRequest::from(request);

        debug!(model = %request.model, "Calling Gemini API");
        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(GeminiError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: GenerateContentResponse = response.json().await?;
        let result = parsed.into_model_response()?;
        debug!(parts = result.parts.len(), "Gemini response received");
        Ok(result)
    }
}

#[async_trait]
impl GenerativeModel for GeminiClient {
    async fn generate(&self, request: &GenerationRequest) -> CampaignResult<ModelResponse> {
        Ok(self.generate_content(request).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use campaign_core::generation::generate_text;
    use campaign_core::StageOutcome;

    #[test]
    fn test_endpoint_normalizes_model_prefix() {
        let client = GeminiClient::with_base_url("k", "http://localhost:9999/");
        assert_eq!(
            client.endpoint("models/gemini-2.5-flash-image-preview"),
            "http://localhost:9999/v1beta/models/gemini-2.5-flash-image-preview:generateContent"
        );
        assert_eq!(
            client.endpoint("gemini-pro"),
            "http://localhost:9999/v1beta/models/gemini-pro:generateContent"
        );
    }

    #[tokio::test]
    async fn test_unreachable_endpoint_yields_no_result() {
        // Port 1 is never bound in the test environment; the connection is refused.
        let client = GeminiClient::with_base_url("k", "http://127.0.0.1:1");
        let request = GenerationRequest::new("gemini-pro", "prompt");

        let err = client.generate(&request).await.unwrap_err();
        assert!(matches!(err, campaign_core::CampaignError::Transport(_)));

        let outcome = generate_text(&client, &request).await;
        assert!(matches!(outcome, StageOutcome::Failed { .. }));
    }
}
