//! Data sources supplying video samples for a search term.
//!
//! The engine only sees `Option<Vec<VideoRecord>>`: a source error becomes
//! `None` ("fetch failed") at this boundary, while an empty vector means the
//! source answered but matched nothing.

pub mod file;

#[cfg(feature = "fetch")]
pub mod tiktok;

use crate::core::VideoRecord;

pub use file::FileSource;

#[cfg(feature = "fetch")]
pub use tiktok::{parse_search_response, BlockingTikTokClient, TikTokClient};

/// Anything that can return a video sample for a search term.
pub trait VideoSource {
    /// Fetch the sample for `term`.
    fn fetch(&self, term: &str) -> Result<Vec<VideoRecord>, SourceError>;

    /// Short name used in logs.
    fn name(&self) -> &str;
}

/// Fetch from a source, logging failures and mapping them to `None`.
pub fn fetch_sample(source: &dyn VideoSource, term: &str) -> Option<Vec<VideoRecord>> {
    match source.fetch(term) {
        Ok(records) => {
            tracing::info!(source = source.name(), term, count = records.len(), "Fetched videos");
            Some(records)
        }
        Err(e) => {
            tracing::warn!(source = source.name(), term, "Fetch failed: {}", e);
            None
        }
    }
}

/// Data source error types.
#[derive(Debug)]
pub enum SourceError {
    /// Missing or placeholder configuration
    Config(String),
    /// Local file could not be read
    Io(String),
    /// Network/HTTP error
    Network(String),
    /// Server returned an error response
    Server { status: u16, message: String },
    /// Response body could not be decoded
    Serialization(String),
}

impl std::fmt::Display for SourceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SourceError::Config(msg) => write!(f, "Source config error: {msg}"),
            SourceError::Io(msg) => write!(f, "Source IO error: {msg}"),
            SourceError::Network(msg) => write!(f, "Source network error: {msg}"),
            SourceError::Server { status, message } => {
                write!(f, "Source server error ({status}): {message}")
            }
            SourceError::Serialization(msg) => write!(f, "Source serialization error: {msg}"),
        }
    }
}

impl std::error::Error for SourceError {}
