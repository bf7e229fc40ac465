//! The unified per-URL report and its subsection types.
//!
//! A report is assembled once by the orchestrator and never mutated
//! afterwards. Absent subsections mean the corresponding provider had no
//! data or failed; callers must read absence as "unknown", not as an
//! error.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::analyzers::fingerprint::TechnicalProfile;
use crate::analyzers::metrics::NormalizedMetrics;
use crate::analyzers::rank_resolver::RankSource;
use crate::services::providers::{Firmographics, LabPerformance};

/// Human-readable monthly-visit bucket, e.g. `"20K"`–`"50K"`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrafficRange {
    pub low: String,
    pub high: String,
}

/// Traffic estimate for a resolved (or unresolved) rank.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrafficEstimate {
    pub rank: Option<u64>,
    pub source: RankSource,
    pub range: TrafficRange,
    pub monthly_visits: u64,
    pub confidence: f64,
    pub last_updated: Option<String>,
}

/// One site, one report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SiteReport {
    /// The URL exactly as the caller submitted it.
    pub url: String,
    /// Normalized bare domain used for rank lookups.
    pub domain: String,
    pub generated_at: DateTime<Utc>,

    pub real_user_metrics: Option<NormalizedMetrics>,
    pub lab_performance: Option<LabPerformance>,
    pub technical: Option<TechnicalProfile>,
    pub traffic: TrafficEstimate,
    pub firmographics: Option<Firmographics>,
}
