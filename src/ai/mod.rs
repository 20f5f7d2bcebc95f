//! Generative-model client and response handling.
//!
//! The [`GeminiClient`] is an explicit, injected collaborator: callers
//! construct one (or obtain the process-wide handle from [`shared_client`])
//! and pass it into the AI-backed generator. [`extract`] holds the ordered
//! extraction strategies that pull plain text out of the variably-shaped
//! model response, and the JSON-repair logic applied to that text.

mod client;
pub mod extract;

pub use client::{GeminiClient, DEFAULT_MODEL};

use std::sync::{Arc, Mutex};

use crate::config::AiConfig;

/// Errors that can occur when interacting with the generative model
#[derive(Debug, thiserror::Error)]
pub enum AiError {
    /// No credential is configured for the AI tier
    #[error("No AI credential is configured")]
    Unavailable,

    /// Network or HTTP transport error
    #[error("Network error: {0}")]
    Network(String),

    /// API error from the model service
    #[error("API error: {0}")]
    Api(String),

    /// The model's output could not be coerced into the required schema
    #[error("Invalid model response: {0}")]
    InvalidResponse(String),
}

/// Process-wide client handle, keyed by the credential it was built with.
static SHARED_CLIENT: Mutex<Option<(String, Arc<GeminiClient>)>> = Mutex::new(None);

/// Return the shared Gemini client for the given configuration, or `None`
/// when no credential is configured.
///
/// The handle is rebuilt only when the credential value changes; construction
/// is idempotent on the credential.
pub fn shared_client(config: &AiConfig) -> Option<Arc<GeminiClient>> {
    let api_key = config.api_key.clone()?;

    let mut guard = SHARED_CLIENT.lock().unwrap();
    if let Some((cached_key, client)) = guard.as_ref() {
        if *cached_key == api_key {
            return Some(Arc::clone(client));
        }
    }

    match GeminiClient::new(&api_key, &config.model) {
        Ok(client) => {
            let client = Arc::new(client);
            *guard = Some((api_key, Arc::clone(&client)));
            Some(client)
        }
        Err(error) => {
            tracing::warn!(%error, "Failed to construct Gemini client");
            None
        }
    }
}
