//! Generation model boundary.
//!
//! `GenerativeModel` is the seam between the pipeline and a hosted model.
//! The helpers here turn every failure into a `StageOutcome` so no error
//! crosses into the caller.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, warn};

use crate::error::{CampaignError, CampaignResult};
use crate::outcome::StageOutcome;

/// Sampling temperature sent with every request.
pub const DEFAULT_TEMPERATURE: f32 = 0.7;
/// Nucleus sampling threshold sent with every request.
pub const DEFAULT_TOP_P: f32 = 1.0;

/// Sampling options.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GenerationOptions {
    pub temperature: f32,
    pub top_p: f32,
}

impl Default for GenerationOptions {
    fn default() -> Self {
        Self {
            temperature: DEFAULT_TEMPERATURE,
            top_p: DEFAULT_TOP_P,
        }
    }
}

/// One call to the model.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationRequest {
    pub model: String,
    pub prompt: String,
    pub options: GenerationOptions,
}

impl GenerationRequest {
    pub fn new(model: impl Into<String>, prompt: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            prompt: prompt.into(),
            options: GenerationOptions::default(),
        }
    }

    pub fn with_options(mut self, options: GenerationOptions) -> Self {
        self.options = options;
        self
    }
}

/// Binary image returned inline by the model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageBlob {
    pub mime_type: String,
    pub data: Vec<u8>,
}

/// One part of a model response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResponsePart {
    Text(String),
    Image(ImageBlob),
}

/// Parts of the first candidate, in order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ModelResponse {
    pub parts: Vec<ResponsePart>,
}

impl ModelResponse {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            parts: vec![ResponsePart::Text(text.into())],
        }
    }

    /// Concatenated text parts, `None` when there is no non-blank text.
    pub fn joined_text(&self) -> Option<String> {
        let text: String = self
            .parts
            .iter()
            .filter_map(|p| match p {
                ResponsePart::Text(t) => Some(t.as_str()),
                ResponsePart::Image(_) => None,
            })
            .collect();
        if text.trim().is_empty() {
            None
        } else {
            Some(text)
        }
    }

    /// First inline image, if any.
    pub fn first_image(&self) -> Option<&ImageBlob> {
        self.parts.iter().find_map(|p| match p {
            ResponsePart::Image(img) => Some(img),
            ResponsePart::Text(_) => None,
        })
    }

    pub fn into_first_image(self) -> Option<ImageBlob> {
        self.parts.into_iter().find_map(|p| match p {
            ResponsePart::Image(img) => Some(img),
            ResponsePart::Text(_) => None,
        })
    }
}

/// A hosted generation model. Each call is a fresh, billed request.
#[async_trait]
pub trait GenerativeModel: Send + Sync {
    async fn generate(&self, request: &GenerationRequest) -> CampaignResult<ModelResponse>;
}

/// Generate text. Transport or API errors and empty answers are hard failures.
pub async fn generate_text(
    model: &dyn GenerativeModel,
    request: &GenerationRequest,
) -> StageOutcome<String> {
    debug!(model = %request.model, prompt_len = request.prompt.len(), "Generating text");
    match model.generate(request).await {
        Ok(response) => match response.joined_text() {
            Some(text) => StageOutcome::Success(text),
            None => {
                warn!(model = %request.model, "Model returned no text");
                StageOutcome::failed("Erreur génération : le modèle n'a renvoyé aucun texte")
            }
        },
        Err(e) => {
            error!(model = %request.model, error = %e, "Text generation failed");
            StageOutcome::failed(format!("Erreur génération : {}", e))
        }
    }
}

/// Generate an image. A response without an image part is a soft failure.
pub async fn generate_image(
    model: &dyn GenerativeModel,
    request: &GenerationRequest,
    missing_warning: &str,
) -> StageOutcome<ImageBlob> {
    debug!(model = %request.model, "Generating image");
    match model.generate(request).await {
        Ok(response) => match response.into_first_image() {
            Some(image) => StageOutcome::Success(image),
            None => {
                warn!(model = %request.model, "Model response contained no image");
                StageOutcome::degraded(missing_warning)
            }
        },
        Err(e) => {
            error!(model = %request.model, error = %e, "Image generation failed");
            StageOutcome::failed(format!("Erreur lors de la génération du visuel : {}", e))
        }
    }
}

/// Error for a model that cannot be used because no API key was configured.
pub fn missing_credential_error() -> CampaignError {
    CampaignError::MissingCredential(
        "Clé API Gemini non trouvée : définissez GEMINI_API_KEY puis redémarrez l'application"
            .to_string(),
    )
}
