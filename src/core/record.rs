//! Video records as consumed by the metrics engine.
//!
//! Search APIs are loose about field names and types, so records are decoded
//! field by field: a malformed field falls back to its default instead of
//! rejecting the whole record.

use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One short-video sample.
///
/// Missing counts are zero. A missing `creation_time` keeps the record out of
/// every windowed sum, and a missing `author_id` keeps it out of creator counts.
/// The display fields (`video_id`, `play_url`, `cover_url`, `description`) only
/// feed the top-videos listing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "Value")]
pub struct VideoRecord {
    /// When the video was published
    pub creation_time: Option<DateTime<Utc>>,
    /// Play count
    pub view_count: u64,
    /// Like ("digg") count
    pub like_count: u64,
    /// Comment count
    pub comment_count: u64,
    /// Share count
    pub share_count: u64,
    /// Opaque creator identifier
    pub author_id: Option<String>,
    /// Platform video identifier
    #[serde(skip_serializing_if = "Option::is_none")]
    pub video_id: Option<String>,
    /// Direct playback URL
    #[serde(skip_serializing_if = "Option::is_none")]
    pub play_url: Option<String>,
    /// Cover image URL
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cover_url: Option<String>,
    /// Caption text
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Public page of a video when no playback URL is available.
pub const VIDEO_PAGE_BASE: &str = "https://www.tiktok.com/video/";

impl VideoRecord {
    /// Create a record published at the given time with zero engagement.
    pub fn new(creation_time: DateTime<Utc>) -> Self {
        Self {
            creation_time: Some(creation_time),
            ..Self::default()
        }
    }

    /// Set the creator identifier.
    pub fn with_author(mut self, author_id: impl Into<String>) -> Self {
        self.author_id = Some(author_id.into());
        self
    }

    /// Set all four engagement counts.
    pub fn with_counts(mut self, views: u64, likes: u64, comments: u64, shares: u64) -> Self {
        self.view_count = views;
        self.like_count = likes;
        self.comment_count = comments;
        self.share_count = shares;
        self
    }

    /// Set the platform video identifier.
    pub fn with_video_id(mut self, video_id: impl Into<String>) -> Self {
        self.video_id = Some(video_id.into());
        self
    }

    /// The creator identifier, if present and non-empty.
    pub fn author(&self) -> Option<&str> {
        self.author_id.as_deref().filter(|id| !id.is_empty())
    }

    /// Where to watch the video: the playback URL, else the public page for its id.
    pub fn link(&self) -> Option<String> {
        match self.play_url.as_deref().filter(|url| !url.is_empty()) {
            Some(url) => Some(url.to_string()),
            None => self
                .video_id
                .as_deref()
                .filter(|id| !id.is_empty())
                .map(|id| format!("{VIDEO_PAGE_BASE}{id}")),
        }
    }
}

impl From<Value> for VideoRecord {
    fn from(value: Value) -> Self {
        match value {
            Value::Object(fields) => Self::from_fields(&fields),
            _ => Self::default(),
        }
    }
}

impl VideoRecord {
    fn from_fields(fields: &Map<String, Value>) -> Self {
        let author_id = first_present(fields, &["author_user_id", "author_id"])
            .or_else(|| {
                fields
                    .get("author")
                    .and_then(|author| author.get("id"))
                    .filter(|id| !id.is_null())
            })
            .and_then(parse_identifier);

        Self {
            creation_time: first_present(fields, &["create_time", "creation_time"])
                .and_then(parse_timestamp),
            view_count: parse_count(first_present(fields, &["play_count", "view_count"])),
            like_count: parse_count(first_present(fields, &["digg_count", "like_count"])),
            comment_count: parse_count(first_present(fields, &["comment_count"])),
            share_count: parse_count(first_present(fields, &["share_count"])),
            author_id,
            video_id: first_present(fields, &["id", "video_id"]).and_then(parse_identifier),
            play_url: first_present(fields, &["play", "play_url"]).and_then(parse_text),
            cover_url: first_present(fields, &["cover", "cover_url"]).and_then(parse_text),
            description: first_present(fields, &["desc", "description"]).and_then(parse_text),
        }
    }
}

/// Decode records from either a bare JSON array or the search API envelope
/// (`{"code": 0, "data": {"videos": [...]}}`).
///
/// Anything else decodes to an empty sample.
pub fn decode_records(value: &Value) -> Vec<VideoRecord> {
    let videos = match value {
        Value::Array(items) => Some(items),
        Value::Object(fields) => fields
            .get("data")
            .and_then(|data| data.get("videos"))
            .or_else(|| fields.get("videos"))
            .and_then(Value::as_array),
        _ => None,
    };

    videos
        .map(|items| items.iter().cloned().map(VideoRecord::from).collect())
        .unwrap_or_default()
}

/// Parse a JSON document into records.
pub fn parse_records(json: &str) -> Result<Vec<VideoRecord>, serde_json::Error> {
    let value: Value = serde_json::from_str(json)?;
    Ok(decode_records(&value))
}

/// First of `keys` that is present and not null.
fn first_present<'a>(fields: &'a Map<String, Value>, keys: &[&str]) -> Option<&'a Value> {
    keys.iter()
        .filter_map(|key| fields.get(*key))
        .find(|value| !value.is_null())
}

/// Unix seconds (number or digit string) or RFC 3339.
fn parse_timestamp(value: &Value) -> Option<DateTime<Utc>> {
    match value {
        Value::Number(n) => match n.as_i64() {
            Some(secs) => from_unix_secs(secs),
            None => n
                .as_f64()
                .filter(|secs| secs.is_finite() && *secs >= 0.0)
                .and_then(|secs| Utc.timestamp_millis_opt((secs * 1000.0) as i64).single()),
        },
        Value::String(s) => {
            let s = s.trim();
            if let Ok(secs) = s.parse::<i64>() {
                return from_unix_secs(secs);
            }
            DateTime::parse_from_rfc3339(s)
                .ok()
                .map(|dt| dt.with_timezone(&Utc))
        }
        _ => None,
    }
}

fn from_unix_secs(secs: i64) -> Option<DateTime<Utc>> {
    if secs < 0 {
        return None;
    }
    Utc.timestamp_opt(secs, 0).single()
}

fn parse_count(value: Option<&Value>) -> u64 {
    match value {
        Some(Value::Number(n)) => n
            .as_u64()
            .or_else(|| {
                n.as_f64()
                    .filter(|count| count.is_finite() && *count >= 0.0)
                    .map(|count| count as u64)
            })
            .unwrap_or(0),
        Some(Value::String(s)) => s.trim().parse().unwrap_or(0),
        _ => 0,
    }
}

fn parse_identifier(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn parse_text(value: &Value) -> Option<String> {
    value
        .as_str()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}
