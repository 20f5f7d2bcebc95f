//! Reference material sources with a trait-based seam.
//!
//! This module defines the [`ReferenceSource`] trait implemented by
//! [`WikipediaSource`], the production fetcher. [`MockReferenceSource`]
//! returns canned documents so the orchestrator and boundary layer can be
//! tested without network access.
//!
//! A topic with no usable reference material (missing page, disambiguation
//! page, empty extract) is an expected outcome, not an error: `fetch_summary`
//! returns `Ok(None)` for it. Only transport and upstream failures surface as
//! [`ReferenceError`].

pub mod mock;
mod wikipedia;

pub use mock::MockReferenceSource;
pub use wikipedia::WikipediaSource;

use async_trait::async_trait;

use crate::models::SourceDocument;

/// A provider of normalized reference material for a topic
#[async_trait]
pub trait ReferenceSource: Send + Sync + std::fmt::Debug {
    /// Unique identifier for this source (e.g. "wikipedia")
    fn id(&self) -> &str;

    /// Human-readable name of this source
    fn name(&self) -> &str;

    /// Fetch the summary document for a topic.
    ///
    /// Returns `Ok(None)` when the topic has no usable reference material.
    async fn fetch_summary(&self, topic: &str)
        -> Result<Option<SourceDocument>, ReferenceError>;
}

/// Errors that can occur when fetching reference material
#[derive(Debug, thiserror::Error)]
pub enum ReferenceError {
    /// Network or HTTP transport error
    #[error("Network error: {0}")]
    Network(String),

    /// The upstream response could not be parsed
    #[error("Parse error: {0}")]
    Parse(String),

    /// The upstream returned a non-success status other than 404
    #[error("Upstream request failed with status {status}")]
    Upstream { status: u16 },
}

impl From<reqwest::Error> for ReferenceError {
    fn from(err: reqwest::Error) -> Self {
        ReferenceError::Network(err.to_string())
    }
}
