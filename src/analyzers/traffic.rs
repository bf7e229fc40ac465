//! Traffic estimation from a domain rank.
//!
//! Two models run off the same rank: a categorical range lookup over a
//! tier table, and a damped power-law curve for a concrete monthly-visit
//! figure. The constants below are the calibration; changing any of them
//! changes every estimate in the system.

use crate::analyzers::rank_resolver::RankResolution;
use crate::analyzers::report::{TrafficEstimate, TrafficRange};

/// Ascending tier table: the first entry with `rank <= max_rank` wins.
/// `(max_rank, low_label, high_label)`. Adjacent tiers share a boundary
/// label, so the covered ranges are contiguous with no overlap.
static TRAFFIC_TIERS: &[(u64, &str, &str)] = &[
    (1_000, "20M", "50M"),
    (2_500, "10M", "20M"),
    (5_000, "5M", "10M"),
    (10_000, "2M", "5M"),
    (20_000, "1M", "2M"),
    (50_000, "500K", "1M"),
    (100_000, "200K", "500K"),
    (250_000, "100K", "200K"),
    (500_000, "50K", "100K"),
    (1_000_000, "20K", "50K"),
    (1_500_000, "10K", "20K"),
    (2_000_000, "5K", "10K"),
    (5_000_000, "2K", "5K"),
    (10_000_000, "1K", "2K"),
];

/// Bucket for an unknown rank or one beyond the last tier.
static BOTTOM_TIER: (&str, &str) = ("0", "1K");

/// Base curve of the visit model: `BASE_TRAFFIC × rank^(-DECAY_EXPONENT)`.
const BASE_TRAFFIC: f64 = 7.881e11;
const DECAY_EXPONENT: f64 = 1.257;

/// Damping step function applied on top of the base curve; worse ranks
/// get damped harder. `(max_rank, factor)`.
static DAMPING_TIERS: &[(u64, f64)] = &[
    (10_000, 1.0),
    (100_000, 0.8),
    (1_000_000, 0.5),
    (10_000_000, 0.3),
];
const DAMPING_FLOOR: f64 = 0.15;

/// Confidence step function: better rank, higher confidence.
static CONFIDENCE_TIERS: &[(u64, f64)] = &[
    (1_000, 0.9),
    (10_000, 0.8),
    (100_000, 0.7),
    (1_000_000, 0.55),
    (10_000_000, 0.4),
];
const CONFIDENCE_FLOOR: f64 = 0.25;

/// Pure rank → traffic model. Stateless; safe to share.
pub struct RankEstimator;

impl RankEstimator {
    pub fn new() -> Self {
        Self
    }

    /// Categorical traffic range for a rank. Unknown or beyond-the-table
    /// ranks land in the bottom `("0", "1K")` bucket.
    pub fn estimate_range(&self, rank: Option<u64>) -> TrafficRange {
        let (low, high) = match rank {
            Some(r) if r > 0 => TRAFFIC_TIERS
                .iter()
                .find(|(max, _, _)| r <= *max)
                .map(|(_, low, high)| (*low, *high))
                .unwrap_or(BOTTOM_TIER),
            _ => BOTTOM_TIER,
        };
        TrafficRange {
            low: low.to_string(),
            high: high.to_string(),
        }
    }

    /// Modeled monthly visits. Fails closed: 0 for an unknown or
    /// non-positive rank; at least 1 for any valid rank.
    pub fn estimate_monthly_visits(&self, rank: Option<u64>) -> u64 {
        let Some(r) = rank.filter(|r| *r > 0) else {
            return 0;
        };
        let visits = damping_factor(r) * BASE_TRAFFIC * (r as f64).powf(-DECAY_EXPONENT);
        (visits.floor() as u64).max(1)
    }

    /// Confidence in the estimate, in `[0, 1]`, non-increasing as rank
    /// worsens. An unresolved rank carries no confidence at all.
    pub fn confidence(&self, rank: Option<u64>) -> f64 {
        let Some(r) = rank.filter(|r| *r > 0) else {
            return 0.0;
        };
        CONFIDENCE_TIERS
            .iter()
            .find(|(max, _)| r <= *max)
            .map(|(_, c)| *c)
            .unwrap_or(CONFIDENCE_FLOOR)
    }

    /// Full estimate for a resolved rank.
    pub fn estimate(&self, resolution: &RankResolution) -> TrafficEstimate {
        TrafficEstimate {
            rank: resolution.rank,
            source: resolution.source,
            range: self.estimate_range(resolution.rank),
            monthly_visits: self.estimate_monthly_visits(resolution.rank),
            confidence: self.confidence(resolution.rank),
            last_updated: resolution.last_updated.clone(),
        }
    }
}

impl Default for RankEstimator {
    fn default() -> Self {
        Self::new()
    }
}

fn damping_factor(rank: u64) -> f64 {
    DAMPING_TIERS
        .iter()
        .find(|(max, _)| rank <= *max)
        .map(|(_, f)| *f)
        .unwrap_or(DAMPING_FLOOR)
}
