//! Whole-sample engagement summaries shown next to the index: totals, a
//! daily views series and the most-watched videos.

use crate::core::record::VideoRecord;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// How many videos the top-videos listing keeps.
pub const TOP_VIDEOS_LIMIT: usize = 12;

/// Engagement summed over every record in the sample.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngagementTotals {
    pub views: u64,
    pub likes: u64,
    pub comments: u64,
    pub shares: u64,
}

/// Views published on one UTC calendar day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyViews {
    pub date: NaiveDate,
    pub views: u64,
}

/// One entry of the top-videos listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopVideo {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub video_id: Option<String>,
    /// Playback URL, or the public page when the sample has none
    #[serde(skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cover_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub views: u64,
    pub likes: u64,
}

impl From<&VideoRecord> for TopVideo {
    fn from(record: &VideoRecord) -> Self {
        Self {
            video_id: record.video_id.clone(),
            link: record.link(),
            cover_url: record.cover_url.clone(),
            description: record.description.clone(),
            views: record.view_count,
            likes: record.like_count,
        }
    }
}

/// Sum engagement over the whole sample, dated or not.
pub fn engagement_totals(records: &[VideoRecord]) -> EngagementTotals {
    records
        .iter()
        .fold(EngagementTotals::default(), |totals, record| EngagementTotals {
            views: totals.views.saturating_add(record.view_count),
            likes: totals.likes.saturating_add(record.like_count),
            comments: totals.comments.saturating_add(record.comment_count),
            shares: totals.shares.saturating_add(record.share_count),
        })
}

/// Views grouped by publication day, oldest first. Undated records are skipped.
pub fn daily_views(records: &[VideoRecord]) -> Vec<DailyViews> {
    let mut by_day: BTreeMap<NaiveDate, u64> = BTreeMap::new();
    for record in records {
        if let Some(created) = record.creation_time {
            let views = by_day.entry(created.date_naive()).or_insert(0);
            *views = views.saturating_add(record.view_count);
        }
    }

    by_day
        .into_iter()
        .map(|(date, views)| DailyViews { date, views })
        .collect()
}

/// The `limit` most-viewed videos, highest first. Ties keep sample order.
pub fn top_videos(records: &[VideoRecord], limit: usize) -> Vec<TopVideo> {
    let mut ranked: Vec<&VideoRecord> = records.iter().collect();
    ranked.sort_by(|a, b| b.view_count.cmp(&a.view_count));
    ranked.into_iter().take(limit).map(TopVideo::from).collect()
}
