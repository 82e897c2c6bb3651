//! Per-query hype reports.
//!
//! A report wraps the outcome of the fetch, the windowed aggregate, the
//! hype index and the whole-sample highlights for one search term, stamped
//! with the single reference time used for the windows.

use crate::core::highlights::{
    daily_views, engagement_totals, top_videos, DailyViews, EngagementTotals, TopVideo,
    TOP_VIDEOS_LIMIT,
};
use crate::core::index::{compute_index, HypeResult};
use crate::core::record::VideoRecord;
use crate::core::windowing::{aggregate, Dimension, WindowAggregate};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The name of this producer.
pub const PRODUCER_NAME: &str = "hype-detector";

/// What the data source returned for the query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FetchStatus {
    /// Records were returned
    Ok,
    /// The source answered but matched nothing
    NoMatches,
    /// The source could not be queried; aggregation was skipped
    FetchFailed,
}

/// Producer metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Producer {
    /// Name of the producing software
    pub name: String,
    /// Version of the producing software
    pub version: String,
    /// Unique instance identifier (UUID)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instance_id: Option<String>,
}

/// Hype report for one search term.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HypeReport {
    pub report_id: String,
    /// Search term as queried
    pub term: String,
    /// Reference time for both windows (RFC3339)
    pub computed_at_utc: String,
    pub fetch_status: FetchStatus,
    /// Number of records received from the source
    pub sample_size: usize,
    /// Windowed averages, absent when there was nothing to aggregate
    #[serde(skip_serializing_if = "Option::is_none")]
    pub aggregate: Option<WindowAggregate>,
    pub result: HypeResult,
    /// Engagement summed over the whole sample
    pub totals: EngagementTotals,
    /// Views per publication day, oldest first
    pub daily_views: Vec<DailyViews>,
    /// Most-viewed videos, highest first
    pub top_videos: Vec<TopVideo>,
    pub producer: Producer,
}

impl HypeReport {
    /// Multi-line text rendering for terminals.
    pub fn summary(&self) -> String {
        let mut out = String::new();
        out.push_str(&format!("Hype report for \"{}\"\n", self.term));
        out.push_str(&format!("  Computed at: {}\n", self.computed_at_utc));
        out.push_str(&format!(
            "  Sample: {} videos ({})\n",
            self.sample_size,
            match self.fetch_status {
                FetchStatus::Ok => "ok",
                FetchStatus::NoMatches => "no matches",
                FetchStatus::FetchFailed => "fetch failed",
            }
        ));
        out.push('\n');
        out.push_str(&format!(
            "  Hype index: {:.1} / 200\n",
            self.result.composite_score
        ));
        out.push_str(&format!("  {}\n", self.result.interpretation));
        out.push('\n');
        out.push_str(&format!(
            "  Engagement momentum: {:.1}\n",
            self.result.engagement_momentum
        ));
        out.push_str(&format!(
            "  Distribution score:  {:.1}\n",
            self.result.distribution_score
        ));

        if self.sample_size > 0 {
            out.push_str(&format!(
                "\n  Total engagement: {} views, {} likes, {} comments, {} shares\n",
                format_count(self.totals.views as f64),
                format_count(self.totals.likes as f64),
                format_count(self.totals.comments as f64),
                format_count(self.totals.shares as f64)
            ));
        }

        match self.aggregate {
            Some(ref agg) => {
                out.push('\n');
                out.push_str(&format!(
                    "  {:<10} {:>12} {:>12} {:>10}\n",
                    "per day", "last 14d", "last 60d", "momentum"
                ));
                for dimension in Dimension::ALL {
                    out.push_str(&format!(
                        "  {:<10} {:>12} {:>12} {:>10.1}\n",
                        dimension.name(),
                        format_count(agg.recent(dimension)),
                        format_count(agg.baseline(dimension)),
                        self.result.momentum.get(dimension)
                    ));
                }
                out.push_str(&format!(
                    "\n  Unique creators: {} of {} videos\n",
                    agg.total_unique_creators, agg.total_record_count
                ));
            }
            None => {
                out.push_str("\n  No dated videos to aggregate.\n");
            }
        }

        if !self.daily_views.is_empty() {
            out.push_str("\n  Views by day:\n");
            for day in &self.daily_views {
                out.push_str(&format!(
                    "    {}  {:>8}\n",
                    day.date,
                    format_count(day.views as f64)
                ));
            }
        }

        if !self.top_videos.is_empty() {
            out.push_str("\n  Top videos:\n");
            for (rank, video) in self.top_videos.iter().enumerate() {
                out.push_str(&format!(
                    "  {:>3}. {:>8} views {:>8} likes  {}\n",
                    rank + 1,
                    format_count(video.views as f64),
                    format_count(video.likes as f64),
                    video.link.as_deref().unwrap_or("-")
                ));
            }
        }

        out
    }
}

/// Builder for hype reports.
pub struct ReportBuilder {
    instance_id: Uuid,
}

impl ReportBuilder {
    /// Create a new report builder with a unique instance ID.
    pub fn new() -> Self {
        Self {
            instance_id: Uuid::new_v4(),
        }
    }

    /// Build a report, reading the clock once for this query.
    ///
    /// `records` is `None` when the fetch failed.
    pub fn build(&self, term: &str, records: Option<&[VideoRecord]>) -> HypeReport {
        self.build_at(term, records, Utc::now())
    }

    /// Build a report against an explicit reference time.
    pub fn build_at(
        &self,
        term: &str,
        records: Option<&[VideoRecord]>,
        now: DateTime<Utc>,
    ) -> HypeReport {
        let (fetch_status, sample_size, aggregate) = match records {
            None => (FetchStatus::FetchFailed, 0, None),
            Some([]) => (FetchStatus::NoMatches, 0, None),
            Some(records) => (FetchStatus::Ok, records.len(), aggregate(records, now)),
        };
        let records = records.unwrap_or_default();

        let result = compute_index(aggregate.as_ref());

        tracing::debug!(
            term,
            ?fetch_status,
            sample_size,
            composite = result.composite_score,
            "Built hype report"
        );

        HypeReport {
            report_id: Uuid::new_v4().to_string(),
            term: term.to_string(),
            computed_at_utc: now.to_rfc3339(),
            fetch_status,
            sample_size,
            aggregate,
            result,
            totals: engagement_totals(records),
            daily_views: daily_views(records),
            top_videos: top_videos(records, TOP_VIDEOS_LIMIT),
            producer: Producer {
                name: PRODUCER_NAME.to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
                instance_id: Some(self.instance_id.to_string()),
            },
        }
    }
}

impl Default for ReportBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Compact rendering of large counts: `1.2K`, `3M`, `4.5B`.
///
/// Values below 1000 are rounded to the nearest integer.
pub fn format_count(value: f64) -> String {
    const UNITS: [(f64, &str); 3] = [
        (1_000_000_000.0, "B"),
        (1_000_000.0, "M"),
        (1_000.0, "K"),
    ];

    for (scale, suffix) in UNITS {
        if value >= scale {
            let scaled = format!("{:.1}", value / scale);
            let trimmed = scaled.strip_suffix(".0").unwrap_or(&scaled);
            return format!("{trimmed}{suffix}");
        }
    }
    format!("{value:.0}")
}
