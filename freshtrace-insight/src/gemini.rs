//! Gemini REST client
//!
//! Calls the `generateContent` surface of the Generative Language API with
//! a text part and an optional inline image part. The request timeout is
//! the only deadline applied here; a timeout surfaces as a `ModelError`
//! and the pipeline degrades.

use async_trait::async_trait;
use base64::Engine as _;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::model::{GenerativeModel, ImageAttachment, ModelError, ModelResult};

/// Default API base URL
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";
/// Default model name
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";
/// Default request timeout in seconds
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// HTTP client for the Gemini generateContent API
pub struct GeminiModel {
    client: reqwest::Client,
    base_url: String,
    model: String,
    api_key: String,
}

impl GeminiModel {
    /// Create a client for the default model and endpoint
    pub fn new(api_key: impl Into<String>) -> ModelResult<Self> {
        Self::with_config(DEFAULT_BASE_URL, DEFAULT_MODEL, api_key, DEFAULT_TIMEOUT_SECS)
    }

    /// Create with custom endpoint, model name, and timeout
    pub fn with_config(
        base_url: &str,
        model: &str,
        api_key: impl Into<String>,
        timeout_secs: u64,
    ) -> ModelResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| ModelError::Unavailable(e.to_string()))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            model: model.to_string(),
            api_key: api_key.into(),
        })
    }

    /// Model name this client invokes
    pub fn model_name(&self) -> &str {
        &self.model
    }
}

// ============ Wire Format ============

#[derive(Serialize)]
struct GenerateRequest {
    contents: Vec<Content>,
}

#[derive(Serialize)]
struct Content {
    parts: Vec<Part>,
}

#[derive(Serialize)]
struct Part {
    #[serde(skip_serializing_if = "Option::is_none")]
    text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    inline_data: Option<InlineData>,
}

impl Part {
    fn text(text: &str) -> Self {
        Self {
            text: Some(text.to_string()),
            inline_data: None,
        }
    }

    fn inline_data(image: &ImageAttachment) -> Self {
        Self {
            text: None,
            inline_data: Some(InlineData {
                mime_type: image.media_type.clone(),
                data: base64::engine::general_purpose::STANDARD.encode(&image.bytes),
            }),
        }
    }
}

#[derive(Serialize)]
struct InlineData {
    mime_type: String,
    data: String,
}

#[derive(Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<ResponseContent>,
}

#[derive(Deserialize)]
struct ResponseContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Deserialize)]
struct ResponsePart {
    #[serde(default)]
    text: Option<String>,
}

#[async_trait]
impl GenerativeModel for GeminiModel {
    async fn generate(
        &self,
        prompt: &str,
        image: Option<&ImageAttachment>,
    ) -> ModelResult<String> {
        let url = format!(
            "{}/v1beta/models/{}:generateContent?key={}",
            self.base_url, self.model, self.api_key
        );

        let mut parts = vec![Part::text(prompt)];
        if let Some(image) = image {
            parts.push(Part::inline_data(image));
        }
        let body = GenerateRequest {
            contents: vec![Content { parts }],
        };

        let response = self
            .client
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(|e| ModelError::Unavailable(format!("HTTP request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(ModelError::Endpoint { status, body });
        }

        let result: GenerateResponse = response
            .json()
            .await
            .map_err(|e| ModelError::Unavailable(format!("Failed to parse response: {}", e)))?;

        let text: String = result
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content)
            .map(|c| {
                c.parts
                    .into_iter()
                    .filter_map(|p| p.text)
                    .collect::<Vec<_>>()
                    .join("")
            })
            .unwrap_or_default();

        if text.is_empty() {
            return Err(ModelError::EmptyResponse);
        }
        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_with_config_trims_trailing_slash() {
        let model =
            GeminiModel::with_config("http://localhost:9000/", "test-model", "key", 5).unwrap();
        assert_eq!(model.model_name(), "test-model");
        assert_eq!(model.base_url, "http://localhost:9000");
    }

    #[test]
    fn test_request_body_shape() {
        let image = ImageAttachment::new("image/png", vec![1, 2, 3]);
        let body = GenerateRequest {
            contents: vec![Content {
                parts: vec![Part::text("hello"), Part::inline_data(&image)],
            }],
        };

        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["contents"][0]["parts"][0]["text"], "hello");
        assert_eq!(
            json["contents"][0]["parts"][1]["inline_data"]["mime_type"],
            "image/png"
        );
        // Text parts carry no inline_data key and vice versa
        assert!(json["contents"][0]["parts"][0].get("inline_data").is_none());
        assert!(json["contents"][0]["parts"][1].get("text").is_none());
    }

    #[tokio::test]
    async fn test_unreachable_endpoint_is_unavailable() {
        let model =
            GeminiModel::with_config("http://192.0.2.1:1", "test-model", "key", 1).unwrap();
        let result = model.generate("prompt", None).await;
        assert!(matches!(result, Err(ModelError::Unavailable(_))));
    }
}
