//! Cumulative usage statistics.
//!
//! Counts queries and their outcomes. Search terms and results are never
//! recorded here.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use crate::core::{FetchStatus, HypeReport};

/// Query counters for the current process, optionally merged with persisted totals.
#[derive(Debug)]
pub struct QueryStats {
    /// Number of queries run
    queries: AtomicU64,
    /// Queries whose fetch failed
    fetch_failures: AtomicU64,
    /// Queries whose source matched nothing
    empty_results: AtomicU64,
    /// Queries that produced an aggregate
    reports_scored: AtomicU64,
    /// Reports written to disk
    reports_exported: AtomicU64,
    /// Session start time
    session_start: DateTime<Utc>,
    /// Path for persisting stats
    persist_path: Option<PathBuf>,
}

impl QueryStats {
    /// Create a new, empty stats tracker.
    pub fn new() -> Self {
        Self {
            queries: AtomicU64::new(0),
            fetch_failures: AtomicU64::new(0),
            empty_results: AtomicU64::new(0),
            reports_scored: AtomicU64::new(0),
            reports_exported: AtomicU64::new(0),
            session_start: Utc::now(),
            persist_path: None,
        }
    }

    /// Create a stats tracker backed by a JSON file.
    pub fn with_persistence(path: PathBuf) -> Self {
        let mut stats = Self::new();
        stats.persist_path = Some(path);

        if let Err(e) = stats.load() {
            tracing::warn!("Could not load previous usage stats: {}", e);
        }

        stats
    }

    /// Record the outcome of one query.
    pub fn record_report(&self, report: &HypeReport) {
        self.queries.fetch_add(1, Ordering::Relaxed);
        match report.fetch_status {
            FetchStatus::FetchFailed => {
                self.fetch_failures.fetch_add(1, Ordering::Relaxed);
            }
            FetchStatus::NoMatches => {
                self.empty_results.fetch_add(1, Ordering::Relaxed);
            }
            FetchStatus::Ok => {}
        }
        if report.aggregate.is_some() {
            self.reports_scored.fetch_add(1, Ordering::Relaxed);
        }
    }

    /// Record an exported report.
    pub fn record_report_exported(&self) {
        self.reports_exported.fetch_add(1, Ordering::Relaxed);
    }

    /// Get the current statistics.
    pub fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            queries: self.queries.load(Ordering::Relaxed),
            fetch_failures: self.fetch_failures.load(Ordering::Relaxed),
            empty_results: self.empty_results.load(Ordering::Relaxed),
            reports_scored: self.reports_scored.load(Ordering::Relaxed),
            reports_exported: self.reports_exported.load(Ordering::Relaxed),
            session_start: self.session_start,
            session_duration_secs: (Utc::now() - self.session_start).num_seconds().max(0) as u64,
        }
    }

    /// Get a summary string for display.
    pub fn summary(&self) -> String {
        let stats = self.snapshot();
        format!(
            "Usage Statistics:\n\
             - Queries run: {}\n\
             - Fetch failures: {}\n\
             - Searches with no matches: {}\n\
             - Reports scored: {}\n\
             - Reports exported: {}",
            stats.queries,
            stats.fetch_failures,
            stats.empty_results,
            stats.reports_scored,
            stats.reports_exported
        )
    }

    /// Save stats to disk.
    pub fn save(&self) -> Result<(), StatsError> {
        if let Some(ref path) = self.persist_path {
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent).map_err(|e| StatsError::Io(e.to_string()))?;
            }

            let stats = self.snapshot();
            let persisted = PersistedStats {
                queries: stats.queries,
                fetch_failures: stats.fetch_failures,
                empty_results: stats.empty_results,
                reports_scored: stats.reports_scored,
                reports_exported: stats.reports_exported,
                last_updated: Utc::now(),
            };

            let json = serde_json::to_string_pretty(&persisted)
                .map_err(|e| StatsError::Serialization(e.to_string()))?;

            std::fs::write(path, json).map_err(|e| StatsError::Io(e.to_string()))?;
        }
        Ok(())
    }

    /// Load stats from disk.
    fn load(&mut self) -> Result<(), StatsError> {
        if let Some(ref path) = self.persist_path {
            if path.exists() {
                let content =
                    std::fs::read_to_string(path).map_err(|e| StatsError::Io(e.to_string()))?;
                let persisted: PersistedStats = serde_json::from_str(&content)
                    .map_err(|e| StatsError::Serialization(e.to_string()))?;

                self.queries.store(persisted.queries, Ordering::Relaxed);
                self.fetch_failures
                    .store(persisted.fetch_failures, Ordering::Relaxed);
                self.empty_results
                    .store(persisted.empty_results, Ordering::Relaxed);
                self.reports_scored
                    .store(persisted.reports_scored, Ordering::Relaxed);
                self.reports_exported
                    .store(persisted.reports_exported, Ordering::Relaxed);
            }
        }
        Ok(())
    }

    /// Reset all counters.
    pub fn reset(&self) {
        self.queries.store(0, Ordering::Relaxed);
        self.fetch_failures.store(0, Ordering::Relaxed);
        self.empty_results.store(0, Ordering::Relaxed);
        self.reports_scored.store(0, Ordering::Relaxed);
        self.reports_exported.store(0, Ordering::Relaxed);
    }
}

impl Default for QueryStats {
    fn default() -> Self {
        Self::new()
    }
}

/// Point-in-time copy of the counters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatsSnapshot {
    pub queries: u64,
    pub fetch_failures: u64,
    pub empty_results: u64,
    pub reports_scored: u64,
    pub reports_exported: u64,
    pub session_start: DateTime<Utc>,
    pub session_duration_secs: u64,
}

/// Stats format for persistence.
#[derive(Debug, Serialize, Deserialize)]
struct PersistedStats {
    queries: u64,
    fetch_failures: u64,
    empty_results: u64,
    reports_scored: u64,
    reports_exported: u64,
    last_updated: DateTime<Utc>,
}

/// Stats persistence errors.
#[derive(Debug)]
pub enum StatsError {
    Io(String),
    Serialization(String),
}

impl std::fmt::Display for StatsError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StatsError::Io(e) => write!(f, "IO error: {e}"),
            StatsError::Serialization(e) => write!(f, "Serialization error: {e}"),
        }
    }
}

impl std::error::Error for StatsError {}

/// Thread-safe shared stats.
pub type SharedQueryStats = Arc<QueryStats>;

/// Create shared stats backed by a JSON file.
pub fn create_shared_stats_with_persistence(path: PathBuf) -> SharedQueryStats {
    Arc::new(QueryStats::with_persistence(path))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{ReportBuilder, VideoRecord};
    use chrono::Duration;

    #[test]
    fn test_record_outcomes() {
        let stats = QueryStats::new();
        let builder = ReportBuilder::new();
        let records = vec![VideoRecord::new(Utc::now() - Duration::days(1)).with_author("a")];

        stats.record_report(&builder.build("a", None));
        stats.record_report(&builder.build("b", Some(&[] as &[VideoRecord])));
        stats.record_report(&builder.build("c", Some(records.as_slice())));

        let snapshot = stats.snapshot();
        assert_eq!(snapshot.queries, 3);
        assert_eq!(snapshot.fetch_failures, 1);
        assert_eq!(snapshot.empty_results, 1);
        assert_eq!(snapshot.reports_scored, 1);
    }

    #[test]
    fn test_reset() {
        let stats = QueryStats::new();
        stats.record_report_exported();
        stats.reset();
        assert_eq!(stats.snapshot().reports_exported, 0);
    }

    #[test]
    fn test_persistence_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("stats.json");

        let stats = QueryStats::with_persistence(path.clone());
        stats.record_report_exported();
        stats.record_report_exported();
        stats.save().unwrap();

        let reloaded = QueryStats::with_persistence(path);
        assert_eq!(reloaded.snapshot().reports_exported, 2);
    }

    #[test]
    fn test_reset_is_persisted() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("stats.json");

        let stats = QueryStats::with_persistence(path.clone());
        stats.record_report(&ReportBuilder::new().build("a", None));
        stats.save().unwrap();
        assert_eq!(QueryStats::with_persistence(path.clone()).snapshot().queries, 1);

        let stats = QueryStats::with_persistence(path.clone());
        stats.reset();
        stats.save().unwrap();

        let reloaded = QueryStats::with_persistence(path);
        assert_eq!(reloaded.snapshot().queries, 0);
        assert_eq!(reloaded.snapshot().fetch_failures, 0);
    }

    #[test]
    fn test_summary_format() {
        let summary = QueryStats::new().summary();
        assert!(summary.contains("Queries run"));
        assert!(summary.contains("Fetch failures"));
        assert!(summary.contains("Reports exported"));
    }
}
