//! Core metrics engine.
//!
//! This module contains:
//! - Video record decoding
//! - Windowed aggregation into per-day averages
//! - Momentum, distribution and composite index computation
//! - Whole-sample totals, daily views and top videos
//! - Report building for export

pub mod highlights;
pub mod index;
pub mod record;
pub mod report;
pub mod windowing;

// Re-export commonly used types
pub use highlights::{
    daily_views, engagement_totals, top_videos, DailyViews, EngagementTotals, TopVideo,
    TOP_VIDEOS_LIMIT,
};
pub use index::{
    composite_score, compute_index, distribution_score, momentum, HypeResult, Interpretation,
    MomentumScores,
};
pub use record::{decode_records, parse_records, VideoRecord};
pub use report::{format_count, FetchStatus, HypeReport, ReportBuilder, PRODUCER_NAME};
pub use windowing::{
    aggregate, Dimension, TimeWindow, WindowAggregate, BASELINE_WINDOW_DAYS, RECENT_WINDOW_DAYS,
};
