//! Mock reference source for testing purposes.

use async_trait::async_trait;
use chrono::Utc;
use std::sync::Mutex;

use crate::models::{Attribution, SourceDocument};
use crate::reference::{ReferenceError, ReferenceSource};

/// A mock reference source that returns a predefined document.
#[derive(Debug, Default)]
pub struct MockReferenceSource {
    document: Mutex<Option<SourceDocument>>,
}

impl MockReferenceSource {
    /// Create a new mock source with no document configured.
    pub fn new() -> Self {
        Self {
            document: Mutex::new(None),
        }
    }

    /// Set the document to return.
    pub fn set_document(&self, document: SourceDocument) {
        let mut guard = self.document.lock().unwrap();
        *guard = Some(document);
    }

    /// Clear the configured document so lookups report "not found".
    pub fn clear_document(&self) {
        let mut guard = self.document.lock().unwrap();
        *guard = None;
    }
}

#[async_trait]
impl ReferenceSource for MockReferenceSource {
    fn id(&self) -> &str {
        "mock"
    }

    fn name(&self) -> &str {
        "Mock Source"
    }

    async fn fetch_summary(
        &self,
        _topic: &str,
    ) -> Result<Option<SourceDocument>, ReferenceError> {
        let guard = self.document.lock().unwrap();
        Ok(guard.clone())
    }
}

/// Helper to build a document for testing.
pub fn make_document(title: &str, extract: &str) -> SourceDocument {
    SourceDocument::new(
        title.to_string(),
        format!("{} (test description)", title),
        extract.to_string(),
        Some(format!("https://en.wikipedia.org/wiki/{}", title)),
        Attribution {
            source: "Wikipedia".to_string(),
            url: format!("https://en.wikipedia.org/wiki/{}", title),
            license: "https://creativecommons.org/licenses/by-sa/3.0/".to_string(),
            retrieved_at: Utc::now(),
        },
    )
}
