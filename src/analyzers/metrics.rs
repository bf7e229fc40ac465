//! Real-user metric normalization and rating.
//!
//! Converts a raw CrUX-style payload into per-metric samples with a
//! categorical rating and a percentage distribution. Metrics the provider
//! did not report are omitted, never zero-filled.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::services::decode::numeric_like;

/// Per-metric rating thresholds: `(metric, good_ceiling,
/// needs_improvement_ceiling)`. A p75 at or below the good ceiling rates
/// `Good`; at or below the second ceiling, `NeedsImprovement`; above it,
/// `Poor`.
static THRESHOLDS: &[(&str, f64, f64)] = &[
    ("largest_contentful_paint", 2500.0, 4000.0),
    ("first_contentful_paint", 1800.0, 3000.0),
    ("interaction_to_next_paint", 200.0, 500.0),
    ("experimental_time_to_first_byte", 800.0, 1800.0),
    ("cumulative_layout_shift", 0.1, 0.25),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Rating {
    Good,
    #[serde(rename = "Needs Improvement")]
    NeedsImprovement,
    Poor,
    #[serde(rename = "N/A")]
    NotApplicable,
}

/// One normalized metric.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricSample {
    pub p75: f64,
    pub rating: Rating,
    pub distribution: Distribution,
    pub histogram: Vec<HistogramBin>,
}

/// Percentage of page loads per experience bucket.
///
/// The provider contract puts the histogram buckets in the fixed order
/// `[good, needs-improvement, poor]`; positions are trusted, bucket
/// boundaries are not inspected.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Distribution {
    pub good: f64,
    pub needs_improvement: f64,
    pub poor: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistogramBin {
    pub start: Option<f64>,
    pub end: Option<f64>,
    /// Density as a percentage (provider densities sum to ~1.0 and are
    /// scaled by 100 here).
    pub density: f64,
}

/// Everything normalized out of one raw metrics payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NormalizedMetrics {
    pub collection_period: Option<Value>,
    pub metrics: BTreeMap<String, MetricSample>,
}

/// Stateless normalizer over the static threshold table.
pub struct MetricsNormalizer;

impl MetricsNormalizer {
    pub fn new() -> Self {
        Self
    }

    /// Rates a p75 value for a metric. Unknown metric names rate
    /// `NotApplicable`.
    pub fn rating(&self, metric: &str, p75: f64) -> Rating {
        let Some((_, good, needs_improvement)) =
            THRESHOLDS.iter().find(|(name, _, _)| *name == metric)
        else {
            return Rating::NotApplicable;
        };
        if p75 <= *good {
            Rating::Good
        } else if p75 <= *needs_improvement {
            Rating::NeedsImprovement
        } else {
            Rating::Poor
        }
    }

    /// Normalizes a raw provider payload. Metrics without both a p75
    /// percentile and a histogram are dropped from the output.
    pub fn normalize(&self, raw: &Value) -> NormalizedMetrics {
        let record = &raw["record"];
        let collection_period = record.get("collectionPeriod").cloned();

        let mut metrics = BTreeMap::new();
        if let Some(raw_metrics) = record["metrics"].as_object() {
            for (name, data) in raw_metrics {
                let Some(p75) = data.get("percentiles").map(|p| &p["p75"]).and_then(numeric_like)
                else {
                    continue;
                };
                let Some(bins) = data["histogram"].as_array() else {
                    continue;
                };

                let histogram: Vec<HistogramBin> = bins
                    .iter()
                    .map(|bin| HistogramBin {
                        start: numeric_like(&bin["start"]),
                        end: numeric_like(&bin["end"]),
                        density: bin["density"].as_f64().unwrap_or(0.0) * 100.0,
                    })
                    .collect();

                let density_pct =
                    |idx: usize| bins.get(idx).and_then(|b| b["density"].as_f64()).unwrap_or(0.0) * 100.0;

                metrics.insert(
                    name.clone(),
                    MetricSample {
                        p75,
                        rating: self.rating(name, p75),
                        distribution: Distribution {
                            good: density_pct(0),
                            needs_improvement: density_pct(1),
                            poor: density_pct(2),
                        },
                        histogram,
                    },
                );
            }
        }

        NormalizedMetrics {
            collection_period,
            metrics,
        }
    }
}

impl Default for MetricsNormalizer {
    fn default() -> Self {
        Self::new()
    }
}
