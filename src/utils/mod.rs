//! Utility modules supporting study-package generation.
//!
//! - [`HttpClient`]: shared HTTP client with timeouts and a descriptive user agent
//! - [`split_sentences`]: heuristic sentence splitting used to derive
//!   [`SourceDocument::sentences`](crate::models::SourceDocument)
//! - [`force_sentence_case`]: topic display-name casing
//! - [`truncate`]: character-budget truncation with an ellipsis marker

mod http;
pub mod text;

pub use http::HttpClient;
pub use text::{force_sentence_case, split_sentences, truncate};
