//! Wikipedia reference source implementation.
//!
//! Uses the Wikipedia REST summary endpoint:
//! https://en.wikipedia.org/api/rest_v1/page/summary/{title}
//!
//! A 404 and a disambiguation-typed page are both treated as "no content"
//! rather than failures.

use async_trait::async_trait;
use chrono::Utc;
use serde::Deserialize;

use crate::models::{Attribution, SourceDocument};
use crate::reference::{ReferenceError, ReferenceSource};
use crate::utils::HttpClient;

const WIKIPEDIA_API_BASE: &str = "https://en.wikipedia.org/api/rest_v1";
const DEFAULT_LICENSE_URL: &str = "https://creativecommons.org/licenses/by-sa/3.0/";

/// Wikipedia reference source
///
/// Fetches topic summaries and normalizes them into [`SourceDocument`]s with
/// derived sentences and an attribution block.
#[derive(Debug, Clone)]
pub struct WikipediaSource {
    client: HttpClient,
    base_url: String,
}

impl WikipediaSource {
    pub fn new() -> Result<Self, ReferenceError> {
        Self::with_base_url(WIKIPEDIA_API_BASE)
    }

    /// Create a source against a custom API base (used by tests)
    pub fn with_base_url(base_url: &str) -> Result<Self, ReferenceError> {
        let user_agent = format!(
            "{}/{} (study assistant; see repository for contact)",
            env!("CARGO_PKG_NAME"),
            env!("CARGO_PKG_VERSION")
        );
        Ok(Self {
            client: HttpClient::with_user_agent(&user_agent)?,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait]
impl ReferenceSource for WikipediaSource {
    fn id(&self) -> &str {
        "wikipedia"
    }

    fn name(&self) -> &str {
        "Wikipedia"
    }

    async fn fetch_summary(
        &self,
        topic: &str,
    ) -> Result<Option<SourceDocument>, ReferenceError> {
        let encoded = urlencoding::encode(topic.trim()).into_owned();
        let url = format!("{}/page/summary/{}", self.base_url, encoded);

        let response = self
            .client
            .get(&url)
            .header("accept", "application/json")
            .send()
            .await
            .map_err(|e| ReferenceError::Network(format!("Failed to reach Wikipedia: {}", e)))?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Ok(None);
        }

        if !response.status().is_success() {
            return Err(ReferenceError::Upstream {
                status: response.status().as_u16(),
            });
        }

        let summary: PageSummary = response.json().await.map_err(|e| {
            ReferenceError::Parse(format!("Failed to parse Wikipedia response: {}", e))
        })?;

        // Ambiguous topics are treated identically to missing ones
        if summary.page_type.as_deref() == Some("disambiguation") {
            return Ok(None);
        }

        let extract = summary.extract.unwrap_or_default();
        if extract.trim().is_empty() {
            return Ok(None);
        }

        let content_url = summary
            .content_urls
            .and_then(|urls| urls.desktop)
            .map(|desktop| desktop.page);

        let attribution = Attribution {
            source: self.name().to_string(),
            url: content_url
                .clone()
                .unwrap_or_else(|| format!("https://en.wikipedia.org/wiki/{}", encoded)),
            license: summary
                .license
                .and_then(|license| license.url)
                .unwrap_or_else(|| DEFAULT_LICENSE_URL.to_string()),
            retrieved_at: Utc::now(),
        };

        Ok(Some(SourceDocument::new(
            summary.title.unwrap_or_else(|| topic.to_string()),
            summary.description.unwrap_or_default(),
            extract,
            content_url,
            attribution,
        )))
    }
}

/// Wikipedia REST summary response
#[derive(Debug, Deserialize)]
struct PageSummary {
    title: Option<String>,
    description: Option<String>,
    extract: Option<String>,
    #[serde(rename = "type")]
    page_type: Option<String>,
    content_urls: Option<ContentUrls>,
    license: Option<License>,
}

#[derive(Debug, Deserialize)]
struct ContentUrls {
    desktop: Option<DesktopUrls>,
}

#[derive(Debug, Deserialize)]
struct DesktopUrls {
    page: String,
}

#[derive(Debug, Deserialize)]
struct License {
    url: Option<String>,
}
