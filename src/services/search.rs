//! Anime search against the Jikan API
//!
//! The parser builds the full lookup URL; this client only fetches it and
//! flattens the response into `SearchResult`s.

use anyhow::{Result, anyhow};
use async_trait::async_trait;
use reqwest::Client as HttpClient;
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

/// One hit from a search
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchResult {
    pub title: String,
    pub description: String,
    pub url: String,
    pub image_url: String,
    pub external_id: u64,
}

/// Looks up shows by a pre-built query URL
#[async_trait]
pub trait SearchService: Send + Sync {
    async fn search(&self, url: &str) -> Result<Vec<SearchResult>>;
}

#[derive(Debug, Deserialize)]
struct JikanResponse {
    data: Vec<JikanAnime>,
}

#[derive(Debug, Deserialize)]
struct JikanAnime {
    mal_id: u64,
    url: String,
    title: String,
    synopsis: Option<String>,
    images: JikanImages,
}

#[derive(Debug, Deserialize)]
struct JikanImages {
    jpg: JikanImage,
}

#[derive(Debug, Deserialize)]
struct JikanImage {
    image_url: Option<String>,
}

impl From<JikanAnime> for SearchResult {
    fn from(anime: JikanAnime) -> Self {
        SearchResult {
            title: anime.title,
            description: anime.synopsis.unwrap_or_default(),
            url: anime.url,
            image_url: anime.images.jpg.image_url.unwrap_or_default(),
            external_id: anime.mal_id,
        }
    }
}

/// HTTP client for the Jikan v4 anime search
pub struct JikanClient {
    http_client: HttpClient,
}

impl JikanClient {
    /// Create a new Jikan client
    ///
    /// # Arguments
    /// * `timeout` - Per-request timeout
    pub fn new(timeout: Duration) -> Result<Self> {
        let http_client = HttpClient::builder().timeout(timeout).build()?;
        Ok(JikanClient { http_client })
    }
}

#[async_trait]
impl SearchService for JikanClient {
    async fn search(&self, url: &str) -> Result<Vec<SearchResult>> {
        let response = self.http_client.get(url).send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await?;
            return Err(anyhow!("Search failed with {}: {}", status, error_text));
        }

        let body: JikanResponse = response.json().await?;
        debug!("Search returned {} results", body.data.len());

        Ok(body.data.into_iter().map(SearchResult::from).collect())
    }
}
