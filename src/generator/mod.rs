//! Study-package generation: the two-tier orchestrator and its tiers.
//!
//! Generation runs as a small state machine: when an AI client is
//! configured, the AI tier is tried first; any AI failure is logged and the
//! deterministic rule-based tier takes over. Only the rule-based tier can
//! fail terminally, and only for math mode, which has a hard dependency on
//! the AI tier.
//!
//! The outcome carries an explicit [`GenerationTier`] tag so callers (and
//! tests) can see which tier produced the package without inspecting error
//! objects.

pub mod gemini;
pub mod rule_based;
mod validate;

pub use gemini::AiBackedGenerator;

use rand::Rng;
use serde::Serialize;
use std::sync::Arc;

use crate::ai::{AiError, GeminiClient};
use crate::models::{SourceDocument, StudyPackage, StudyRequest};
use crate::utils::force_sentence_case;

/// Errors that can terminate a generation request
#[derive(Debug, thiserror::Error)]
pub enum GenerationError {
    /// Math mode was requested without AI capability
    #[error("Math mode requires the AI tier; configure an API key to enable quantitative generation")]
    MathModeRequiresAi,

    /// An AI-tier failure (only surfaced when no fallback applies)
    #[error(transparent)]
    Ai(#[from] AiError),
}

/// Which tier produced a package
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GenerationTier {
    /// The AI-backed generator
    Ai,
    /// The deterministic rule-based fallback
    RuleBased,
}

/// A generated package together with the tier that produced it
#[derive(Debug, Clone)]
pub struct Generated {
    pub package: StudyPackage,
    pub tier: GenerationTier,
}

/// Two-tier generation orchestrator
///
/// Holds the optional AI tier; the rule-based tier is always available.
#[derive(Debug)]
pub struct StudyGenerator {
    ai: Option<AiBackedGenerator>,
}

impl StudyGenerator {
    /// Create an orchestrator. Passing `None` disables the AI tier.
    pub fn new(ai_client: Option<Arc<GeminiClient>>) -> Self {
        Self {
            ai: ai_client.map(AiBackedGenerator::new),
        }
    }

    /// Whether the AI tier is configured
    pub fn has_ai_tier(&self) -> bool {
        self.ai.is_some()
    }

    /// Generate a study package for the request.
    ///
    /// The AI attempt is awaited fully before falling back; the AI call is
    /// never retried.
    pub async fn generate<R: Rng>(
        &self,
        request: &StudyRequest,
        source: &SourceDocument,
        rng: &mut R,
    ) -> Result<Generated, GenerationError> {
        if let Some(ai) = &self.ai {
            match ai.generate(request, source).await {
                Ok(package) => {
                    tracing::info!(
                        topic = %request.topic,
                        mode = %request.mode,
                        "generated study package with the AI tier"
                    );
                    return Ok(Generated {
                        package,
                        tier: GenerationTier::Ai,
                    });
                }
                Err(error) => {
                    tracing::warn!(
                        %error,
                        topic = %request.topic,
                        "AI generation failed, falling back to the rule-based generator"
                    );
                }
            }
        }

        let package = rule_based::generate(request, source, rng)?;
        tracing::info!(
            topic = %request.topic,
            mode = %request.mode,
            "generated study package with the rule-based generator"
        );
        Ok(Generated {
            package,
            tier: GenerationTier::RuleBased,
        })
    }
}

/// Sentence-cased display name for the topic: the source title when present,
/// the raw request topic otherwise.
pub(crate) fn display_topic(source: &SourceDocument, raw_topic: &str) -> String {
    let title = source.title.trim();
    if title.is_empty() {
        force_sentence_case(raw_topic)
    } else {
        force_sentence_case(title)
    }
}
