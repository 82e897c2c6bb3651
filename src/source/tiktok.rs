//! Search client for the TikTok video search API (RapidAPI-hosted).
//!
//! `GET https://{host}/feed/search?keywords={term}&count={n}` authenticated
//! with `x-rapidapi-key` / `x-rapidapi-host` headers.

use crate::config::ApiConfig;
use crate::core::{decode_records, VideoRecord};
use crate::source::{SourceError, VideoSource};
use serde_json::Value;

/// Extract the video sample from a search response body.
///
/// Only `code == 0` with a non-empty `data.videos` array yields records; any
/// other well-formed body means the search matched nothing.
pub fn parse_search_response(body: &Value) -> Vec<VideoRecord> {
    let ok = body.get("code").and_then(Value::as_i64) == Some(0);
    let has_videos = body
        .get("data")
        .and_then(|data| data.get("videos"))
        .and_then(Value::as_array)
        .is_some_and(|videos| !videos.is_empty());

    if ok && has_videos {
        decode_records(body)
    } else {
        Vec::new()
    }
}

/// Async client for the video search API.
#[derive(Debug, Clone)]
pub struct TikTokClient {
    config: ApiConfig,
    base_url: String,
    client: reqwest::Client,
}

impl TikTokClient {
    /// Create a new client. Fails on missing or placeholder credentials.
    pub fn new(config: ApiConfig) -> Result<Self, SourceError> {
        if !config.has_credentials() {
            return Err(SourceError::Config(
                "Search API key/host not configured".to_string(),
            ));
        }

        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| SourceError::Config(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            base_url: format!("https://{}", config.host.trim()),
            config,
            client,
        })
    }

    /// Point the client at a different base URL (e.g. a local mock).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Get the search endpoint URL.
    pub fn search_url(&self) -> String {
        format!("{}/feed/search", self.base_url)
    }

    /// Search videos matching `term`.
    pub async fn search(&self, term: &str) -> Result<Vec<VideoRecord>, SourceError> {
        let count = self.config.result_count.to_string();

        tracing::debug!(term, url = %self.search_url(), "Searching videos");

        let response = self
            .client
            .get(self.search_url())
            .query(&[("keywords", term), ("count", count.as_str())])
            .header("x-rapidapi-key", self.config.key.trim())
            .header("x-rapidapi-host", self.config.host.trim())
            .send()
            .await
            .map_err(|e| SourceError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let message = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(SourceError::Server {
                status: status.as_u16(),
                message,
            });
        }

        let body: Value = response
            .json()
            .await
            .map_err(|e| SourceError::Serialization(e.to_string()))?;

        Ok(parse_search_response(&body))
    }
}

/// Blocking search client for use in synchronous contexts.
pub struct BlockingTikTokClient {
    inner: TikTokClient,
    runtime: tokio::runtime::Runtime,
}

impl BlockingTikTokClient {
    /// Create a new blocking client.
    pub fn new(config: ApiConfig) -> Result<Self, SourceError> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|e| SourceError::Config(format!("Failed to create runtime: {e}")))?;

        Ok(Self {
            inner: TikTokClient::new(config)?,
            runtime,
        })
    }

    /// Search videos matching `term`.
    pub fn search(&self, term: &str) -> Result<Vec<VideoRecord>, SourceError> {
        self.runtime.block_on(self.inner.search(term))
    }
}

impl VideoSource for BlockingTikTokClient {
    fn fetch(&self, term: &str) -> Result<Vec<VideoRecord>, SourceError> {
        self.search(term)
    }

    fn name(&self) -> &str {
        "tiktok"
    }
}
