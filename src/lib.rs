//! Hype Detector - composite hype index for search terms.
//!
//! This library scores how "hyped" a search term is from a sample of
//! short-video engagement records, comparing recent activity against a
//! longer baseline and checking how widely the activity is spread across
//! creators.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                        Hype Detector                        │
//! ├─────────────────────────────────────────────────────────────┤
//! │  ┌─────────────┐   ┌─────────────┐   ┌─────────────┐        │
//! │  │   Source    │──▶│  Windowing  │──▶│    Index    │        │
//! │  │ (API/file)  │   │ (14d / 60d) │   │ (momentum)  │        │
//! │  └─────────────┘   └─────────────┘   └─────────────┘        │
//! │         │                                    │              │
//! │         ▼                                    ▼              │
//! │  ┌─────────────┐                     ┌─────────────┐        │
//! │  │    Usage    │                     │    Hype     │        │
//! │  │    Stats    │                     │   Report    │        │
//! │  └─────────────┘                     └─────────────┘        │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Example
//!
//! ```
//! use chrono::{Duration, Utc};
//! use hype_detector::core::{aggregate, compute_index, VideoRecord};
//!
//! let now = Utc::now();
//! let records = vec![
//!     VideoRecord::new(now - Duration::days(2)).with_counts(900, 80, 12, 6).with_author("a"),
//!     VideoRecord::new(now - Duration::days(45)).with_counts(300, 20, 3, 1).with_author("b"),
//! ];
//!
//! let result = compute_index(aggregate(&records, now).as_ref());
//! assert!(result.composite_score <= 200.0);
//! ```

pub mod config;
pub mod core;
pub mod source;
pub mod stats;

#[cfg(feature = "server")]
pub mod server;

// Re-export key types at crate root for convenience
pub use crate::config::{ApiConfig, Config, ConfigError};
pub use crate::core::{
    aggregate, compute_index, EngagementTotals, HypeReport, HypeResult, Interpretation,
    ReportBuilder, TopVideo, VideoRecord, WindowAggregate,
};
pub use crate::source::{fetch_sample, FileSource, SourceError, VideoSource};
pub use crate::stats::{QueryStats, SharedQueryStats, StatsSnapshot};

// Network client re-exports (when enabled)
#[cfg(feature = "fetch")]
pub use crate::source::{BlockingTikTokClient, TikTokClient};

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Methodology statement that can be displayed to users.
pub const METHODOLOGY: &str = r#"
╔══════════════════════════════════════════════════════════════════╗
║                HYPE DETECTOR - INDEX METHODOLOGY                 ║
╠══════════════════════════════════════════════════════════════════╣
║                                                                  ║
║  WINDOWS                                                         ║
║    • Recent: videos published in the last 14 days               ║
║    • Baseline: videos published in the last 60 days             ║
║    • Per-day averages divide by the real span of data found,     ║
║      at least 1 day and at most the window length                ║
║                                                                  ║
║  MOMENTUM (0-200, per dimension)                                 ║
║    • Recent daily average / baseline daily average x 100         ║
║    • Capped at 2x growth; zero baseline with activity = 200      ║
║    • Weights: comments 35%, shares 25%, new creators 15%,        ║
║      likes 15%, views 10%                                        ║
║                                                                  ║
║  DISTRIBUTION (0-100)                                            ║
║    • Unique creators / videos in the sample x 100                ║
║    • Low values point to concentrated or paid activity           ║
║                                                                  ║
║  HYPE INDEX (0-200) = 70% momentum + 30% distribution            ║
║    • 150+     Viral: explosive, organic trend                    ║
║    • 100-150  Rising: hype growing with healthy distribution     ║
║    • 60-100   Stable: sustained attention                        ║
║    • <60      Declining or concentrated signal                   ║
║                                                                  ║
╚══════════════════════════════════════════════════════════════════╝
"#;
