//! Wikipedia deep-link helper
//!
//! Resolves a landmark name to its Wikipedia page URL via the MediaWiki
//! search API. Failure is non-fatal for identification; callers fall back to
//! a web-search URL.

use landmarker_common::{Error, Result};
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// MediaWiki search client
pub struct WikipediaClient {
    http_client: Client,
    endpoint: String,
}

impl WikipediaClient {
    pub fn new(endpoint: String, user_agent: &str) -> Result<Self> {
        let http_client = Client::builder()
            .user_agent(user_agent.to_string())
            .timeout(DEFAULT_TIMEOUT)
            .build()
            .map_err(|e| Error::MapRender(format!("failed to build HTTP client: {}", e)))?;
        Ok(Self {
            http_client,
            endpoint,
        })
    }

    /// URL of the best-matching Wikipedia page, if any
    pub async fn page_url(&self, landmark: &str) -> Result<Option<String>> {
        debug!(landmark, "Searching Wikipedia");

        let response = self
            .http_client
            .get(&self.endpoint)
            .query(&[
                ("action", "query"),
                ("format", "json"),
                ("list", "search"),
                ("srsearch", landmark),
            ])
            .send()
            .await
            .map_err(|e| Error::MapRender(format!("wikipedia request failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(Error::MapRender(format!(
                "wikipedia API returned {}",
                response.status()
            )));
        }

        let search: SearchResponse = response
            .json()
            .await
            .map_err(|e| Error::MapRender(format!("failed to parse wikipedia response: {}", e)))?;

        Ok(search
            .query
            .search
            .into_iter()
            .next()
            .map(|hit| page_url_for_title(&hit.title)))
    }
}

fn page_url_for_title(title: &str) -> String {
    format!("https://www.wikipedia.org/wiki/{}", title.replace(' ', "_"))
}

/// Web-search fallback when no Wikipedia page was found
pub fn fallback_search_url(landmark: &str) -> String {
    format!(
        "https://www.google.com/search?q={}+wikipedia&btnI",
        landmark.replace(' ', "+")
    )
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    query: SearchQuery,
}

#[derive(Debug, Default, Deserialize)]
struct SearchQuery {
    #[serde(default)]
    search: Vec<SearchHit>,
}

#[derive(Debug, Deserialize)]
struct SearchHit {
    title: String,
}
