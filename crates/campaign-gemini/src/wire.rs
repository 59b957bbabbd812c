//! JSON shapes of the `generateContent` API.

use base64::Engine;
use campaign_core::generation::{GenerationRequest, ImageBlob, ModelResponse, ResponsePart};
use serde::{Deserialize, Serialize};

use crate::error::GeminiError;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct GenerateContentRequest {
    contents: Vec<Content>,
    generation_config: GenerationConfig,
}

#[derive(Serialize)]
struct Content {
    role: &'static str,
    parts: Vec<RequestPart>,
}

#[derive(Serialize)]
struct RequestPart {
    text: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    temperature: f32,
    top_p: f32,
}

impl From<&GenerationRequest> for GenerateContentRequest {
    fn from(req: &GenerationRequest) -> Self {
        Self {
            contents: vec![Content {
                role: "user",
                parts: vec![RequestPart {
                    text: req.prompt.clone(),
                }],
            }],
            generation_config: GenerationConfig {
                temperature: req.options.temperature,
                top_p: req.options.top_p,
            },
        }
    }
}

#[derive(Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub(crate) struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    prompt_feedback: Option<PromptFeedback>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePartWire>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ResponsePartWire {
    text: Option<String>,
    inline_data: Option<InlineData>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct InlineData {
    mime_type: String,
    data: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    block_reason: Option<String>,
}

impl GenerateContentResponse {
    /// Convert the first candidate, decoding inline images.
    pub(crate) fn into_model_response(self) -> Result<ModelResponse, GeminiError> {
        let reason = self.prompt_feedback.and_then(|f| f.block_reason);
        let Some(content) = self.candidates.into_iter().next().and_then(|c| c.content) else {
            return match reason {
                Some(reason) => Err(GeminiError::Blocked(reason)),
                None => Ok(ModelResponse::default()),
            };
        };

        let mut parts = Vec::with_capacity(content.parts.len());
        for part in content.parts {
            if let Some(text) = part.text {
                parts.push(ResponsePart::Text(text));
            }
            if let Some(inline) = part.inline_data {
                let data = base64::engine::general_purpose::STANDARD.decode(inline.data.trim())?;
                parts.push(ResponsePart::Image(ImageBlob {
                    mime_type: inline.mime_type,
                    data,
                }));
            }
        }
        Ok(ModelResponse { parts })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(json: &str) -> Result<ModelResponse, GeminiError> {
        serde_json::from_str::<GenerateContentResponse>(json)
            .unwrap()
            .into_model_response()
    }

    #[test]
    fn test_request_body_shape() {
        let req = GenerationRequest::new("gemini-pro", "Bonjour");
        let body = serde_json::to_value(GenerateContentRequest::from(&req)).unwrap();
        assert_eq!(body["contents"][0]["role"], "user");
        assert_eq!(body["contents"][0]["parts"][0]["text"], "Bonjour");
        assert!((body["generationConfig"]["temperature"].as_f64().unwrap() - 0.7).abs() < 1e-6);
        assert_eq!(body["generationConfig"]["topP"], 1.0);
    }

    #[test]
    fn test_text_response() {
        let response = parse(
            r####"{"candidates":[{"content":{"role":"model","parts":[{"text":"### Analyse"}]},"finishReason":"STOP"}]}"####,
        )
        .unwrap();
        assert_eq!(response.joined_text().as_deref(), Some("### Analyse"));
    }

    #[test]
    fn test_inline_image_is_decoded() {
        // "iVBORw==" is base64 for the first bytes of a PNG signature.
        let response = parse(
            r#"{"candidates":[{"content":{"parts":[
                {"text":"Voici le visuel"},
                {"inlineData":{"mimeType":"image/png","data":"iVBORw=="}}
            ]}}]}"#,
        )
        .unwrap();
        let image = response.first_image().unwrap();
        assert_eq!(image.mime_type, "image/png");
        assert_eq!(image.data, vec![0x89, b'P', b'N', b'G']);
    }

    #[test]
    fn test_invalid_base64_is_an_error() {
        let err = parse(
            r#"{"candidates":[{"content":{"parts":[{"inlineData":{"mimeType":"image/png","data":"@@@"}}]}}]}"#,
        )
        .unwrap_err();
        assert!(matches!(err, GeminiError::Decode(_)));
    }

    #[test]
    fn test_blocked_prompt() {
        let err = parse(r#"{"promptFeedback":{"blockReason":"SAFETY"}}"#).unwrap_err();
        assert!(matches!(err, GeminiError::Blocked(ref r) if r == "SAFETY"));
    }

    #[test]
    fn test_empty_candidates_give_empty_response() {
        let response = parse(r#"{"candidates":[]}"#).unwrap();
        assert!(response.parts.is_empty());
    }
}
