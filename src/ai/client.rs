//! Gemini REST client.
//!
//! Speaks the `models/{model}:generateContent` endpoint with a single
//! user-role text part. The response body is returned as raw JSON so the
//! extraction strategies in [`crate::ai::extract`] can tolerate the several
//! shapes the service has been observed to produce.

use serde::Serialize;
use serde_json::Value;

use crate::ai::AiError;
use crate::utils::HttpClient;

const GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Model used when no override is configured
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";

/// Client for the Gemini generateContent API
#[derive(Debug, Clone)]
pub struct GeminiClient {
    http: HttpClient,
    api_key: String,
    base_url: String,
    model: String,
}

impl GeminiClient {
    pub fn new(api_key: &str, model: &str) -> Result<Self, AiError> {
        Self::with_base_url(api_key, model, GEMINI_API_BASE)
    }

    /// Create a client against a custom API base (used by tests)
    pub fn with_base_url(api_key: &str, model: &str, base_url: &str) -> Result<Self, AiError> {
        if api_key.trim().is_empty() {
            return Err(AiError::Unavailable);
        }

        Ok(Self {
            http: HttpClient::new().map_err(|e| AiError::Network(e.to_string()))?,
            api_key: api_key.to_string(),
            base_url: base_url.trim_end_matches('/').to_string(),
            model: model.to_string(),
        })
    }

    /// The model identifier this client invokes
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Send a single user-turn prompt and return the raw response body.
    pub async fn generate_content(&self, prompt: &str) -> Result<Value, AiError> {
        let request = GenerateContentRequest {
            contents: vec![Content {
                role: "user",
                parts: vec![Part { text: prompt }],
            }],
            generation_config: GenerationConfig {
                temperature: 0.7,
                top_k: 40,
                top_p: 0.9,
                max_output_tokens: 2048,
            },
        };

        let url = format!(
            "{}/models/{}:generateContent?key={}",
            self.base_url, self.model, self.api_key
        );

        let response = self
            .http
            .post(&url)
            .header("content-type", "application/json")
            .json(&request)
            .send()
            .await
            .map_err(|e| AiError::Network(format!("Failed to reach Gemini: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AiError::Api(format!(
                "Gemini API returned status {}: {}",
                status, body
            )));
        }

        response
            .json()
            .await
            .map_err(|e| AiError::InvalidResponse(format!("Response body was not JSON: {}", e)))
    }
}

#[derive(Debug, Serialize)]
struct GenerateContentRequest<'a> {
    contents: Vec<Content<'a>>,
    #[serde(rename = "generationConfig")]
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    role: &'a str,
    parts: Vec<Part<'a>>,
}

#[derive(Debug, Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Debug, Serialize)]
struct GenerationConfig {
    temperature: f32,
    #[serde(rename = "topK")]
    top_k: i32,
    #[serde(rename = "topP")]
    top_p: f32,
    #[serde(rename = "maxOutputTokens")]
    max_output_tokens: i32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_generate_content_posts_user_turn() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock(
                "POST",
                "/models/gemini-2.5-flash:generateContent?key=test-key",
            )
            .match_body(mockito::Matcher::PartialJson(serde_json::json!({
                "contents": [{ "role": "user", "parts": [{ "text": "hello" }] }]
            })))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                serde_json::json!({
                    "candidates": [
                        { "content": { "parts": [{ "text": "world" }] } }
                    ]
                })
                .to_string(),
            )
            .create_async()
            .await;

        let client =
            GeminiClient::with_base_url("test-key", DEFAULT_MODEL, &server.url()).unwrap();
        let response = client.generate_content("hello").await.unwrap();

        mock.assert_async().await;
        assert_eq!(
            response["candidates"][0]["content"]["parts"][0]["text"],
            "world"
        );
    }

    #[test]
    fn test_blank_credential_is_unavailable() {
        let error = GeminiClient::new("   ", DEFAULT_MODEL).unwrap_err();
        assert!(matches!(error, AiError::Unavailable));
    }

    #[tokio::test]
    async fn test_non_success_status_is_api_error() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock(
                "POST",
                "/models/gemini-2.5-flash:generateContent?key=test-key",
            )
            .with_status(429)
            .with_body("quota exhausted")
            .create_async()
            .await;

        let client =
            GeminiClient::with_base_url("test-key", DEFAULT_MODEL, &server.url()).unwrap();
        let error = client.generate_content("hello").await.unwrap_err();
        assert!(matches!(error, AiError::Api(_)));
    }
}
