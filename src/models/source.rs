//! Source document model: normalized reference material for a topic.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::utils::split_sentences;

/// Where reference material was retrieved from, for display alongside results
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Attribution {
    /// Human-readable source name (e.g. "Wikipedia")
    pub source: String,

    /// Page URL for the material
    pub url: String,

    /// License URL covering the material
    pub license: String,

    /// When the material was fetched
    pub retrieved_at: DateTime<Utc>,
}

/// Normalized reference material for a topic
///
/// Produced by a [`ReferenceSource`](crate::reference::ReferenceSource) and
/// consumed by both generators. Immutable once returned; `sentences` is always
/// derived from `extract`, never hand-authored.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceDocument {
    /// Canonical page title
    pub title: String,

    /// Short description line
    pub description: String,

    /// Raw summary text
    pub extract: String,

    /// Sentences derived from `extract`
    pub sentences: Vec<String>,

    /// Canonical page URL, when the upstream provides one
    pub content_url: Option<String>,

    /// Attribution block for the material
    pub attribution: Attribution,
}

impl SourceDocument {
    /// Build a document from raw upstream fields, deriving `sentences` from
    /// the extract.
    pub fn new(
        title: String,
        description: String,
        extract: String,
        content_url: Option<String>,
        attribution: Attribution,
    ) -> Self {
        let sentences = split_sentences(&extract);
        Self {
            title,
            description,
            extract,
            sentences,
            content_url,
            attribution,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn attribution() -> Attribution {
        Attribution {
            source: "Wikipedia".to_string(),
            url: "https://en.wikipedia.org/wiki/Photosynthesis".to_string(),
            license: "https://creativecommons.org/licenses/by-sa/3.0/".to_string(),
            retrieved_at: Utc::now(),
        }
    }

    #[test]
    fn test_sentences_derived_from_extract() {
        let doc = SourceDocument::new(
            "Photosynthesis".to_string(),
            "Biological process".to_string(),
            "Plants convert light. Energy is stored. Oxygen is released.".to_string(),
            None,
            attribution(),
        );
        assert_eq!(doc.sentences.len(), 3);
        assert_eq!(doc.sentences[0], "Plants convert light.");
    }

    #[test]
    fn test_empty_extract_gives_no_sentences() {
        let doc = SourceDocument::new(
            "Photosynthesis".to_string(),
            String::new(),
            String::new(),
            None,
            attribution(),
        );
        assert!(doc.sentences.is_empty());
    }
}
