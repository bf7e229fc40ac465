//! Trait contracts for every external collaborator the core fans out to.
//!
//! Each trait is one independently-failing data source. The orchestrator
//! and fingerprinter depend only on these traits; the concrete clients
//! live in the sibling modules and mocks live in the test suites.

use std::collections::BTreeMap;
use std::net::IpAddr;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::ProviderError;

/// A fetched page: response headers (lowercased keys) plus the raw HTML
/// body. DOM queries are derived from `body` by the fingerprinter's pure
/// extraction functions.
#[derive(Debug, Clone)]
pub struct FetchedPage {
    pub headers: BTreeMap<String, String>,
    pub body: String,
}

/// Synthetic lab performance for a page.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LabPerformance {
    /// Lighthouse-style performance score, 0–100.
    pub score: Option<u64>,
    pub metrics: LabMetrics,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LabMetrics {
    pub first_contentful_paint: Option<f64>,
    pub speed_index: Option<f64>,
    pub largest_contentful_paint: Option<f64>,
    pub time_to_interactive: Option<f64>,
}

/// A live rank lookup result. `rank` may be absent even on success when
/// the provider has never seen the domain.
#[derive(Debug, Clone, Default)]
pub struct LiveRank {
    pub rank: Option<u64>,
    pub last_updated: Option<String>,
}

/// Company/organization metadata for a domain.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Firmographics {
    pub name: Option<String>,
    pub description: Option<String>,
    pub employee_count: Option<u64>,
    pub revenue: Option<String>,
    pub industry: Option<String>,
    pub location: Option<Location>,
    pub founded_year: Option<i32>,
    pub social_profiles: SocialProfiles,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Location {
    pub city: Option<String>,
    pub country: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SocialProfiles {
    pub linkedin: Option<String>,
    pub twitter: Option<String>,
}

/// Geolocation/ASN enrichment for a resolved IP address.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GeoInfo {
    pub country: Option<String>,
    pub region: Option<String>,
    pub city: Option<String>,
    pub isp: Option<String>,
    pub org: Option<String>,
    pub asn: Option<String>,
}

/// Real-user performance metrics source (CrUX-style). Returns the raw
/// provider payload; normalization happens in the core.
#[async_trait]
pub trait MetricsProvider: Send + Sync {
    async fn fetch_real_user_metrics(&self, url: &str) -> Result<Value, ProviderError>;
}

/// Synthetic lab performance source (PageSpeed-style).
#[async_trait]
pub trait LabProvider: Send + Sync {
    async fn fetch_lab_performance(&self, url: &str) -> Result<LabPerformance, ProviderError>;
}

/// Page fetching and lightweight endpoint probing.
#[async_trait]
pub trait PageProvider: Send + Sync {
    async fn fetch_page(&self, url: &str) -> Result<FetchedPage, ProviderError>;

    /// HEAD-style existence check. Returns the HTTP status for any
    /// response the server gives; errors only on transport failure.
    async fn probe_endpoint(&self, url: &str) -> Result<u16, ProviderError>;
}

/// Live traffic-rank source (SimilarWeb-style).
#[async_trait]
pub trait RankProvider: Send + Sync {
    async fn lookup_live_rank(&self, domain: &str) -> Result<LiveRank, ProviderError>;
}

/// Company firmographics source (Diffbot-style).
#[async_trait]
pub trait FirmographicsProvider: Send + Sync {
    async fn lookup_firmographics(&self, url: &str)
    -> Result<Option<Firmographics>, ProviderError>;
}

/// Hostname → IP resolution.
#[async_trait]
pub trait HostResolver: Send + Sync {
    async fn resolve_host_address(&self, hostname: &str) -> Result<IpAddr, ProviderError>;
}

/// IP → geolocation/ASN enrichment.
#[async_trait]
pub trait GeoProvider: Send + Sync {
    async fn lookup_geo(&self, ip: IpAddr) -> Result<GeoInfo, ProviderError>;
}
