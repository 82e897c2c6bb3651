//! Hype index computation from windowed aggregates.
//!
//! The index blends two signals:
//! - **Momentum**: recent per-day activity relative to the baseline, per dimension
//! - **Distribution**: how many distinct creators the sample spreads across
//!
//! Every score is bounded and every division is guarded, so any aggregate
//! (including none at all) yields a finite result.

use crate::core::windowing::{Dimension, WindowAggregate};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Upper bound of a momentum score.
pub const MAX_MOMENTUM: f64 = 200.0;

/// Growth ratio at which momentum saturates.
pub const MOMENTUM_RATIO_CAP: f64 = 2.0;

/// Upper bound of the distribution score.
pub const MAX_DISTRIBUTION: f64 = 100.0;

/// Upper bound of the composite score.
pub const MAX_COMPOSITE: f64 = 200.0;

/// Share of the composite taken by engagement momentum.
pub const MOMENTUM_WEIGHT: f64 = 0.70;

/// Share of the composite taken by the distribution score.
pub const DISTRIBUTION_WEIGHT: f64 = 0.30;

/// Per-dimension weights inside engagement momentum, in summation order.
pub const DIMENSION_WEIGHTS: [(Dimension, f64); 5] = [
    (Dimension::Comments, 0.35),
    (Dimension::Shares, 0.25),
    (Dimension::Creators, 0.15),
    (Dimension::Likes, 0.15),
    (Dimension::Views, 0.10),
];

/// Momentum score for each engagement dimension (each 0-200).
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct MomentumScores {
    pub views: f64,
    pub likes: f64,
    pub comments: f64,
    pub shares: f64,
    /// New-creator momentum
    pub creators: f64,
}

impl MomentumScores {
    /// Score every dimension of an aggregate.
    pub fn from_aggregate(aggregate: &WindowAggregate) -> Self {
        let score = |dimension| momentum(aggregate.recent(dimension), aggregate.baseline(dimension));
        Self {
            views: score(Dimension::Views),
            likes: score(Dimension::Likes),
            comments: score(Dimension::Comments),
            shares: score(Dimension::Shares),
            creators: score(Dimension::Creators),
        }
    }

    pub fn get(&self, dimension: Dimension) -> f64 {
        match dimension {
            Dimension::Views => self.views,
            Dimension::Likes => self.likes,
            Dimension::Comments => self.comments,
            Dimension::Shares => self.shares,
            Dimension::Creators => self.creators,
        }
    }

    /// Weighted blend of the five scores (0-200).
    pub fn engagement_momentum(&self) -> f64 {
        DIMENSION_WEIGHTS
            .iter()
            .map(|&(dimension, weight)| self.get(dimension) * weight)
            .sum()
    }
}

/// Ordinal reading of a composite score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Interpretation {
    /// Below 60
    Declining,
    /// 60 up to 100
    Stable,
    /// 100 up to 150
    Rising,
    /// 150 and above
    Viral,
}

impl Interpretation {
    /// Band for a composite score, evaluated from the highest threshold down.
    pub fn from_score(score: f64) -> Self {
        if score >= 150.0 {
            Interpretation::Viral
        } else if score >= 100.0 {
            Interpretation::Rising
        } else if score >= 60.0 {
            Interpretation::Stable
        } else {
            Interpretation::Declining
        }
    }

    /// Human-readable recommendation for this band.
    pub fn label(&self) -> &'static str {
        match self {
            Interpretation::Viral => "Viral: explosive, organic trend",
            Interpretation::Rising => "Rising: hype growing with healthy distribution",
            Interpretation::Stable => "Stable: sustained attention, monitor distribution",
            Interpretation::Declining => {
                "Declining interest: cooling off or concentrated/paid campaign"
            }
        }
    }
}

impl fmt::Display for Interpretation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Final index for one query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HypeResult {
    /// Composite hype index (0-200)
    pub composite_score: f64,
    /// Per-dimension momentum
    pub momentum: MomentumScores,
    /// Weighted momentum before blending with distribution (0-200)
    pub engagement_momentum: f64,
    /// Creator dispersion (0-100)
    pub distribution_score: f64,
    /// Band the composite falls into
    pub interpretation: Interpretation,
}

impl Default for HypeResult {
    fn default() -> Self {
        Self {
            composite_score: 0.0,
            momentum: MomentumScores::default(),
            engagement_momentum: 0.0,
            distribution_score: 0.0,
            interpretation: Interpretation::Declining,
        }
    }
}

/// Momentum of a recent per-day average against a baseline per-day average.
///
/// A zero or undefined (NaN) baseline scores 200 if there is any recent
/// activity and 0 otherwise. Otherwise the ratio is capped at 2x and scaled
/// to 0-200.
pub fn momentum(recent: f64, baseline: f64) -> f64 {
    if baseline == 0.0 || baseline.is_nan() {
        return if recent > 0.0 { MAX_MOMENTUM } else { 0.0 };
    }
    let recent = if recent.is_nan() { 0.0 } else { recent };

    let ratio = (recent / baseline).max(0.0);
    ratio.min(MOMENTUM_RATIO_CAP) * 100.0
}

/// Share of distinct creators in the sample, scaled to 0-100.
pub fn distribution_score(total_unique_creators: usize, total_record_count: usize) -> f64 {
    let ratio = total_unique_creators as f64 / total_record_count.max(1) as f64;
    (ratio * 100.0).min(MAX_DISTRIBUTION)
}

/// Blend engagement momentum with the distribution score, capped at 200.
pub fn composite_score(engagement_momentum: f64, distribution_score: f64) -> f64 {
    (engagement_momentum * MOMENTUM_WEIGHT + distribution_score * DISTRIBUTION_WEIGHT)
        .min(MAX_COMPOSITE)
}

/// Compute the hype index for an aggregate.
///
/// `None` is the "no data" case and yields an all-zero result in the lowest band.
pub fn compute_index(aggregate: Option<&WindowAggregate>) -> HypeResult {
    let Some(aggregate) = aggregate else {
        return HypeResult::default();
    };

    let momentum = MomentumScores::from_aggregate(aggregate);
    let engagement_momentum = momentum.engagement_momentum();
    let distribution =
        distribution_score(aggregate.total_unique_creators, aggregate.total_record_count);
    let composite = composite_score(engagement_momentum, distribution);

    HypeResult {
        composite_score: composite,
        momentum,
        engagement_momentum,
        distribution_score: distribution,
        interpretation: Interpretation::from_score(composite),
    }
}
