//! Study package model: the generated output for a request.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Generation mode requested by the caller
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StudyMode {
    /// Summary + quiz + study tip
    Standard,
    /// One quantitative question with answer and explanation, AI-only
    Math,
}

impl StudyMode {
    /// Returns the wire identifier for the mode
    pub fn id(&self) -> &str {
        match self {
            StudyMode::Standard => "standard",
            StudyMode::Math => "math",
        }
    }
}

impl std::fmt::Display for StudyMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.id())
    }
}

/// Caller-supplied generation parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StudyRequest {
    /// Topic to study (non-empty)
    pub topic: String,

    /// Generation mode
    pub mode: StudyMode,
}

impl StudyRequest {
    /// Create a new request
    pub fn new(topic: &str, mode: StudyMode) -> Self {
        Self {
            topic: topic.to_string(),
            mode,
        }
    }
}

/// A single multiple-choice quiz question
///
/// Invariant: `correct_index` always indexes into `options`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizQuestion {
    /// Question text (non-empty)
    pub prompt: String,

    /// Exactly 4 answer options
    pub options: Vec<String>,

    /// Zero-based index of the correct option
    pub correct_index: usize,

    /// Why the correct option is true (non-empty)
    pub explanation: String,
}

/// Mode-specific package content
///
/// The shape is fully determined by the request mode; standard and math
/// content never mix.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StudyPayload {
    /// Standard-mode content
    #[serde(rename_all = "camelCase")]
    Standard {
        /// Exactly 3 summary bullet points
        summary: Vec<String>,
        /// Exactly 3 quiz questions
        quiz: Vec<QuizQuestion>,
        /// Study technique suggestion (non-empty)
        study_tip: String,
    },
    /// Math-mode content
    Math {
        /// One quantitative or logic question
        question: String,
        /// Canonical answer as a concise string
        answer: String,
        /// Step-by-step justification
        explanation: String,
    },
}

/// The generated output for a request: mode-tagged payload plus metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudyPackage {
    /// Sentence-cased topic display name
    pub topic: String,

    /// Mode the package was generated for
    pub mode: StudyMode,

    /// When the package was generated (stamped at call time)
    pub generated_at: DateTime<Utc>,

    /// Mode-specific content, flattened into the serialized form
    #[serde(flatten)]
    pub payload: StudyPayload,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mode_serializes_lowercase() {
        assert_eq!(
            serde_json::to_string(&StudyMode::Standard).unwrap(),
            "\"standard\""
        );
        assert_eq!(serde_json::to_string(&StudyMode::Math).unwrap(), "\"math\"");
    }

    #[test]
    fn test_package_flattens_payload_fields() {
        let package = StudyPackage {
            topic: "Photosynthesis".to_string(),
            mode: StudyMode::Standard,
            generated_at: Utc::now(),
            payload: StudyPayload::Standard {
                summary: vec!["a".to_string(), "b".to_string(), "c".to_string()],
                quiz: Vec::new(),
                study_tip: "Review daily.".to_string(),
            },
        };

        let value = serde_json::to_value(&package).unwrap();
        assert_eq!(value["topic"], "Photosynthesis");
        assert_eq!(value["mode"], "standard");
        assert_eq!(value["summary"].as_array().unwrap().len(), 3);
        assert_eq!(value["studyTip"], "Review daily.");
        assert!(value.get("payload").is_none());
    }

    #[test]
    fn test_quiz_question_uses_camel_case_index() {
        let question = QuizQuestion {
            prompt: "Which statement is accurate?".to_string(),
            options: vec!["a".into(), "b".into(), "c".into(), "d".into()],
            correct_index: 2,
            explanation: "Because it is.".to_string(),
        };
        let value = serde_json::to_value(&question).unwrap();
        assert_eq!(value["correctIndex"], 2);
    }
}
