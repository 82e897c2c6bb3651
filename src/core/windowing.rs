//! Windowed aggregation of video samples.
//!
//! A sample is reduced into per-day averages over two trailing windows that
//! share one reference time: a recent window (14 days) and a baseline window
//! (60 days). Averages divide by the span of data actually present in the
//! window rather than the nominal window length.

use crate::core::record::VideoRecord;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::fmt;

/// Length of the recent window in days.
pub const RECENT_WINDOW_DAYS: i64 = 14;

/// Length of the baseline window in days.
pub const BASELINE_WINDOW_DAYS: i64 = 60;

const MILLIS_PER_DAY: f64 = 24.0 * 3600.0 * 1000.0;

/// Engagement dimension tracked per window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Dimension {
    Views,
    Likes,
    Comments,
    Shares,
    /// Distinct creators publishing in the window
    Creators,
}

impl Dimension {
    /// All dimensions in display order.
    pub const ALL: [Dimension; 5] = [
        Dimension::Views,
        Dimension::Likes,
        Dimension::Comments,
        Dimension::Shares,
        Dimension::Creators,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Dimension::Views => "views",
            Dimension::Likes => "likes",
            Dimension::Comments => "comments",
            Dimension::Shares => "shares",
            Dimension::Creators => "creators",
        }
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A trailing time window ending at the reference time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimeWindow {
    Recent,
    Baseline,
}

impl TimeWindow {
    /// Nominal window length in days.
    pub fn days(&self) -> i64 {
        match self {
            TimeWindow::Recent => RECENT_WINDOW_DAYS,
            TimeWindow::Baseline => BASELINE_WINDOW_DAYS,
        }
    }

    /// Earliest timestamp still inside the window.
    pub fn start(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        now - Duration::days(self.days())
    }

    /// Check if a timestamp falls within this window. The start bound is inclusive.
    pub fn contains(&self, timestamp: DateTime<Utc>, now: DateTime<Utc>) -> bool {
        timestamp >= self.start(now)
    }

    /// Averaging divisor for this window.
    ///
    /// The age of the earliest record found in the window, in fractional days,
    /// clamped to `[1, days()]`. An empty window uses the nominal length.
    pub fn effective_days(&self, earliest: Option<DateTime<Utc>>, now: DateTime<Utc>) -> f64 {
        let nominal = self.days() as f64;
        match earliest {
            Some(earliest) => {
                let age_days = (now - earliest).num_milliseconds() as f64 / MILLIS_PER_DAY;
                age_days.clamp(1.0, nominal)
            }
            None => nominal,
        }
    }
}

/// Per-day averages for both windows plus whole-sample totals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WindowAggregate {
    /// Per-day averages over the recent window
    pub recent_avg: BTreeMap<Dimension, f64>,
    /// Per-day averages over the baseline window
    pub baseline_avg: BTreeMap<Dimension, f64>,
    /// Divisor used for the recent window
    pub recent_days: f64,
    /// Divisor used for the baseline window
    pub baseline_days: f64,
    /// Records inside the recent window
    pub recent_record_count: usize,
    /// Records inside the baseline window
    pub baseline_record_count: usize,
    /// Distinct creators across the whole sample, ignoring windows
    pub total_unique_creators: usize,
    /// Size of the whole sample, including records without a timestamp
    pub total_record_count: usize,
}

impl WindowAggregate {
    /// Recent per-day average for a dimension (0 when absent).
    pub fn recent(&self, dimension: Dimension) -> f64 {
        self.recent_avg.get(&dimension).copied().unwrap_or(0.0)
    }

    /// Baseline per-day average for a dimension (0 when absent).
    pub fn baseline(&self, dimension: Dimension) -> f64 {
        self.baseline_avg.get(&dimension).copied().unwrap_or(0.0)
    }
}

/// Running sums for one window.
#[derive(Debug, Default)]
struct WindowAccumulator<'a> {
    sums: BTreeMap<Dimension, u64>,
    creators: HashSet<&'a str>,
    earliest: Option<DateTime<Utc>>,
    record_count: usize,
}

impl<'a> WindowAccumulator<'a> {
    fn add(&mut self, record: &'a VideoRecord, created: DateTime<Utc>) {
        let counts = [
            (Dimension::Views, record.view_count),
            (Dimension::Likes, record.like_count),
            (Dimension::Comments, record.comment_count),
            (Dimension::Shares, record.share_count),
        ];
        for (dimension, count) in counts {
            let sum = self.sums.entry(dimension).or_insert(0);
            *sum = sum.saturating_add(count);
        }

        if let Some(author) = record.author() {
            self.creators.insert(author);
        }

        self.earliest = Some(match self.earliest {
            Some(earliest) => earliest.min(created),
            None => created,
        });
        self.record_count += 1;
    }

    fn total(&self, dimension: Dimension) -> f64 {
        match dimension {
            Dimension::Creators => self.creators.len() as f64,
            _ => self.sums.get(&dimension).copied().unwrap_or(0) as f64,
        }
    }

    fn averages(&self, days: f64) -> BTreeMap<Dimension, f64> {
        Dimension::ALL
            .iter()
            .map(|&dimension| (dimension, self.total(dimension) / days))
            .collect()
    }
}

/// Reduce a sample into windowed per-day averages.
///
/// Returns `None` when the sample is empty or no record carries a usable
/// creation time. Records without a creation time still count toward
/// `total_record_count` and `total_unique_creators`.
pub fn aggregate(records: &[VideoRecord], now: DateTime<Utc>) -> Option<WindowAggregate> {
    if records.iter().all(|record| record.creation_time.is_none()) {
        return None;
    }

    let mut recent = WindowAccumulator::default();
    let mut baseline = WindowAccumulator::default();
    let mut all_creators: HashSet<&str> = HashSet::new();

    for record in records {
        if let Some(author) = record.author() {
            all_creators.insert(author);
        }

        let Some(created) = record.creation_time else {
            continue;
        };

        if TimeWindow::Baseline.contains(created, now) {
            baseline.add(record, created);
        }
        if TimeWindow::Recent.contains(created, now) {
            recent.add(record, created);
        }
    }

    let recent_days = TimeWindow::Recent.effective_days(recent.earliest, now);
    let baseline_days = TimeWindow::Baseline.effective_days(baseline.earliest, now);

    Some(WindowAggregate {
        recent_avg: recent.averages(recent_days),
        baseline_avg: baseline.averages(baseline_days),
        recent_days,
        baseline_days,
        recent_record_count: recent.record_count,
        baseline_record_count: baseline.record_count,
        total_unique_creators: all_creators.len(),
        total_record_count: records.len(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn reference_time() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 30, 12, 0, 0).unwrap()
    }

    fn days_ago(days: i64) -> DateTime<Utc> {
        reference_time() - Duration::days(days)
    }

    #[test]
    fn test_window_contains_is_inclusive() {
        let now = reference_time();

        assert!(TimeWindow::Recent.contains(days_ago(14), now));
        assert!(!TimeWindow::Recent.contains(days_ago(14) - Duration::seconds(1), now));
        assert!(TimeWindow::Baseline.contains(days_ago(60), now));
        assert!(!TimeWindow::Baseline.contains(days_ago(61), now));
    }

    #[test]
    fn test_effective_days_clamped() {
        let now = reference_time();

        assert_eq!(TimeWindow::Recent.effective_days(None, now), 14.0);
        assert_eq!(TimeWindow::Baseline.effective_days(None, now), 60.0);

        // Very recent data never divides by less than one day
        let just_now = now - Duration::minutes(5);
        assert_eq!(TimeWindow::Recent.effective_days(Some(just_now), now), 1.0);

        // Records from the future clamp to the floor as well
        let future = now + Duration::days(2);
        assert_eq!(TimeWindow::Baseline.effective_days(Some(future), now), 1.0);

        assert_eq!(TimeWindow::Recent.effective_days(Some(days_ago(7)), now), 7.0);
        assert_eq!(TimeWindow::Recent.effective_days(Some(days_ago(14)), now), 14.0);

        let half = TimeWindow::Baseline.effective_days(Some(now - Duration::hours(36)), now);
        assert!((half - 1.5).abs() < 1e-9);
    }

    #[test]
    fn test_empty_sample_is_none() {
        assert!(aggregate(&[], reference_time()).is_none());
    }

    #[test]
    fn test_sample_without_timestamps_is_none() {
        let records = vec![VideoRecord::default().with_author("a"); 3];
        assert!(aggregate(&records, reference_time()).is_none());
    }

    #[test]
    fn test_averages_use_actual_span() {
        let now = reference_time();
        let records = vec![
            VideoRecord::new(days_ago(2)).with_counts(100, 10, 4, 2).with_author("a"),
            VideoRecord::new(days_ago(4)).with_counts(300, 30, 8, 6).with_author("b"),
            VideoRecord::new(days_ago(40)).with_counts(600, 60, 12, 12).with_author("a"),
        ];

        let agg = aggregate(&records, now).unwrap();

        // Recent window spans 4 days, baseline spans 40
        assert_eq!(agg.recent_days, 4.0);
        assert_eq!(agg.baseline_days, 40.0);
        assert_eq!(agg.recent_record_count, 2);
        assert_eq!(agg.baseline_record_count, 3);

        assert_eq!(agg.recent(Dimension::Views), 100.0);
        assert_eq!(agg.recent(Dimension::Likes), 10.0);
        assert_eq!(agg.recent(Dimension::Comments), 3.0);
        assert_eq!(agg.recent(Dimension::Shares), 2.0);
        assert_eq!(agg.recent(Dimension::Creators), 0.5);

        assert_eq!(agg.baseline(Dimension::Views), 25.0);
        assert_eq!(agg.baseline(Dimension::Comments), 0.6);
        assert_eq!(agg.baseline(Dimension::Creators), 0.05);

        assert_eq!(agg.total_unique_creators, 2);
        assert_eq!(agg.total_record_count, 3);
    }

    #[test]
    fn test_empty_recent_window_averages_zero() {
        let now = reference_time();
        let records = vec![VideoRecord::new(days_ago(30)).with_counts(90, 0, 0, 0)];

        let agg = aggregate(&records, now).unwrap();
        assert_eq!(agg.recent_days, 14.0);
        assert_eq!(agg.recent(Dimension::Views), 0.0);
        assert_eq!(agg.baseline(Dimension::Views), 3.0);
    }

    #[test]
    fn test_untimed_and_old_records_count_toward_totals_only() {
        let now = reference_time();
        let records = vec![
            VideoRecord::new(days_ago(1)).with_counts(10, 0, 0, 0).with_author("a"),
            VideoRecord::default().with_counts(1_000, 0, 0, 0).with_author("b"),
            VideoRecord::new(days_ago(90)).with_counts(5_000, 0, 0, 0).with_author("c"),
            VideoRecord::new(days_ago(1)),
        ];

        let agg = aggregate(&records, now).unwrap();
        assert_eq!(agg.recent(Dimension::Views), 10.0);
        assert_eq!(agg.baseline(Dimension::Views), 10.0);
        assert_eq!(agg.recent(Dimension::Creators), 1.0);
        assert_eq!(agg.total_unique_creators, 3);
        assert_eq!(agg.total_record_count, 4);
    }

    #[test]
    fn test_recent_is_subset_of_baseline() {
        let now = reference_time();
        let records: Vec<VideoRecord> = (0..70)
            .map(|day| {
                VideoRecord::new(days_ago(day))
                    .with_counts(day as u64 * 10, 1, 1, 1)
                    .with_author(format!("creator-{}", day % 7))
            })
            .collect();

        let agg = aggregate(&records, now).unwrap();
        assert!(agg.recent_record_count <= agg.baseline_record_count);
        assert_eq!(agg.recent_record_count, 15);
        assert_eq!(agg.baseline_record_count, 61);
        for dimension in Dimension::ALL {
            assert!(agg.recent(dimension).is_finite());
            assert!(agg.baseline(dimension) >= 0.0);
        }
    }

    #[test]
    fn test_aggregate_is_deterministic() {
        let now = reference_time();
        let records = vec![
            VideoRecord::new(days_ago(3)).with_counts(7, 3, 1, 0).with_author("x"),
            VideoRecord::new(days_ago(20)).with_counts(9, 1, 0, 2).with_author("y"),
        ];

        assert_eq!(aggregate(&records, now), aggregate(&records, now));
    }
}
