//! AI-backed generator: the primary tier.
//!
//! Builds a mode-specific prompt with a strict JSON contract, invokes the
//! model once, and coerces the reply into a [`StudyPackage`]. The package
//! timestamp is stamped here at call time, and the topic is always the
//! sentence-cased source title, never the model's own rendering.

use chrono::Utc;
use std::sync::Arc;

use crate::ai::extract::{extract_json, extract_text};
use crate::ai::{AiError, GeminiClient};
use crate::generator::{display_topic, validate};
use crate::models::{SourceDocument, StudyMode, StudyPackage, StudyRequest};
use crate::utils::truncate;

/// Character budget for the extract embedded in the prompt context block
const CONTEXT_CHAR_BUDGET: usize = 2400;

const STANDARD_PROMPT_HEADER: &str = r#"You are Smart Study Assistant, an educational AI that creates concise study materials.
Using ONLY the reference material provided, produce JSON that matches this schema exactly:
{
  "summary": ["", "", ""],
  "quiz": [
    {
      "prompt": "",
      "options": ["", "", "", ""],
      "correctIndex": 0,
      "explanation": ""
    },
    { ... second question ... },
    { ... third question ... }
  ],
  "studyTip": ""
}
Rules:
- Return exactly 3 summary bullet points, each under 200 characters.
- Quiz must contain 3 multiple-choice questions.
- Each quiz entry needs 4 distinct answer options and a zero-based "correctIndex".
- The explanation should reference why the correct option is true.
- Respond with STRICT JSON only, without markdown fences or commentary."#;

const MATH_PROMPT_HEADER: &str = r#"You are Smart Study Assistant, an AI that creates quantitative or logic practice.
Create a JSON object that follows this schema exactly:
{
  "question": "",
  "answer": "",
  "explanation": ""
}
Requirements:
- Provide ONE well-posed quantitative or logic question tied to the topic theme.
- Give the correct answer as a concise string.
- Provide a step-by-step explanation that justifies the answer.
- Respond with STRICT JSON only, without markdown fences or commentary."#;

/// AI-backed study package generator
#[derive(Debug)]
pub struct AiBackedGenerator {
    client: Arc<GeminiClient>,
}

impl AiBackedGenerator {
    pub fn new(client: Arc<GeminiClient>) -> Self {
        Self { client }
    }

    /// Generate a study package via the model.
    pub async fn generate(
        &self,
        request: &StudyRequest,
        source: &SourceDocument,
    ) -> Result<StudyPackage, AiError> {
        let prompt = match request.mode {
            StudyMode::Standard => build_standard_prompt(&request.topic, source),
            StudyMode::Math => build_math_prompt(&request.topic, source),
        };

        tracing::debug!(model = self.client.model(), mode = %request.mode, "requesting study package from Gemini");
        let response = self.client.generate_content(&prompt).await?;

        let raw_text = extract_text(&response).ok_or_else(|| {
            AiError::InvalidResponse("response contained no text content".to_string())
        })?;
        let parsed = extract_json(&raw_text).ok_or_else(|| {
            AiError::InvalidResponse("response did not include valid JSON content".to_string())
        })?;

        let payload = match request.mode {
            StudyMode::Standard => validate::standard_payload(&parsed)?,
            StudyMode::Math => validate::math_payload(&parsed)?,
        };

        Ok(StudyPackage {
            topic: display_topic(source, &request.topic),
            mode: request.mode,
            generated_at: Utc::now(),
            payload,
        })
    }
}

fn build_standard_prompt(topic: &str, source: &SourceDocument) -> String {
    format!(
        "{}\n\nTopic: {}\nReference material: {}",
        STANDARD_PROMPT_HEADER,
        topic,
        build_context(source)
    )
}

fn build_math_prompt(topic: &str, source: &SourceDocument) -> String {
    format!(
        "{}\n\nTopic: {}\nReference material: {}",
        MATH_PROMPT_HEADER,
        topic,
        build_context(source)
    )
}

/// Context block for the prompt: description plus a bounded extract, the
/// leading sentences when no extract exists, or a neutral placeholder.
fn build_context(source: &SourceDocument) -> String {
    let mut parts = Vec::new();

    if !source.description.trim().is_empty() {
        parts.push(format!("Description: {}", source.description));
    }

    if !source.extract.trim().is_empty() {
        parts.push(format!(
            "Extract: {}",
            truncate(&source.extract, CONTEXT_CHAR_BUDGET)
        ));
    } else if !source.sentences.is_empty() {
        let facts: Vec<&str> = source
            .sentences
            .iter()
            .take(5)
            .map(String::as_str)
            .collect();
        parts.push(format!("Key facts: {}", facts.join(" ")));
    }

    if parts.is_empty() {
        "No additional reference material provided.".to_string()
    } else {
        parts.join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::DEFAULT_MODEL;
    use crate::models::StudyPayload;
    use crate::reference::mock::make_document;

    fn model_reply(body: serde_json::Value) -> String {
        serde_json::json!({
            "candidates": [
                { "content": { "parts": [{ "text": body.to_string() }] } }
            ]
        })
        .to_string()
    }

    fn math_body() -> serde_json::Value {
        serde_json::json!({
            "question": "A plant fixes 6 mol of CO2. How many mol of O2 are released?",
            "answer": "6",
            "explanation": "The photosynthesis equation releases one O2 per CO2 fixed."
        })
    }

    async fn generator_for(server: &mockito::Server) -> AiBackedGenerator {
        let client =
            GeminiClient::with_base_url("test-key", DEFAULT_MODEL, &server.url()).unwrap();
        AiBackedGenerator::new(Arc::new(client))
    }

    #[tokio::test]
    async fn test_math_package_from_model_reply() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", mockito::Matcher::Any)
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(model_reply(math_body()))
            .create_async()
            .await;

        let generator = generator_for(&server).await;
        let source = make_document("Photosynthesis", "Plants convert light.");
        let request = StudyRequest::new("photosynthesis", StudyMode::Math);

        let package = generator.generate(&request, &source).await.unwrap();
        assert_eq!(package.topic, "Photosynthesis");
        assert_eq!(package.mode, StudyMode::Math);
        let StudyPayload::Math { answer, .. } = package.payload else {
            panic!("expected math payload");
        };
        assert_eq!(answer, "6");
    }

    #[tokio::test]
    async fn test_invalid_model_json_is_rejected() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", mockito::Matcher::Any)
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                serde_json::json!({
                    "candidates": [
                        { "content": { "parts": [{ "text": "I could not produce JSON, sorry." }] } }
                    ]
                })
                .to_string(),
            )
            .create_async()
            .await;

        let generator = generator_for(&server).await;
        let source = make_document("Photosynthesis", "Plants convert light.");
        let request = StudyRequest::new("photosynthesis", StudyMode::Math);

        let error = generator.generate(&request, &source).await.unwrap_err();
        assert!(matches!(error, AiError::InvalidResponse(_)));
    }

    #[test]
    fn test_context_prefers_truncated_extract() {
        let mut source = make_document("Topic", &"long extract text ".repeat(400));
        source.description = "A description".to_string();
        let context = build_context(&source);

        assert!(context.starts_with("Description: A description"));
        assert!(context.contains("Extract: "));
        let extract_line = context.lines().nth(1).unwrap();
        assert!(extract_line.chars().count() <= "Extract: ".len() + CONTEXT_CHAR_BUDGET);
    }

    #[test]
    fn test_context_empty_source_uses_placeholder() {
        let mut source = make_document("Topic", "");
        source.description = String::new();
        assert_eq!(
            build_context(&source),
            "No additional reference material provided."
        );
    }

    #[test]
    fn test_prompt_embeds_topic_and_rules() {
        let source = make_document("Photosynthesis", "Plants convert light.");
        let prompt = build_standard_prompt("photosynthesis", &source);
        assert!(prompt.contains("Topic: photosynthesis"));
        assert!(prompt.contains("exactly 3 summary bullet points"));
        assert!(prompt.contains("Reference material: "));
    }
}
