//! End-to-end orchestrator tests against mock collaborators.
//!
//! These pin the two load-bearing contracts: a single failing provider
//! never fails an analysis, and batch output order is input order no
//! matter how completion order falls.

use std::io::Write;
use std::net::IpAddr;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde_json::{Value, json};

use sitepulse::analyzers::fingerprint::Fingerprinter;
use sitepulse::analyzers::metrics::Rating;
use sitepulse::analyzers::orchestrator::{Dependencies, Orchestrator};
use sitepulse::analyzers::rank_resolver::{DomainRankResolver, RankSource};
use sitepulse::analyzers::rank_table::RankTable;
use sitepulse::error::ProviderError;
use sitepulse::services::providers::{
    FetchedPage, Firmographics, FirmographicsProvider, GeoInfo, GeoProvider, HostResolver,
    LabMetrics, LabPerformance, LabProvider, LiveRank, MetricsProvider, PageProvider,
    RankProvider,
};

// ---------------------------------------------------------------------------
// Mock collaborators
// ---------------------------------------------------------------------------

/// Healthy metrics provider with an optional per-URL artificial delay,
/// used to invert completion order in the batch test.
struct OkMetrics {
    delays_ms: Vec<(&'static str, u64)>,
}

impl OkMetrics {
    fn instant() -> Self {
        Self { delays_ms: vec![] }
    }
}

#[async_trait]
impl MetricsProvider for OkMetrics {
    async fn fetch_real_user_metrics(&self, url: &str) -> Result<Value, ProviderError> {
        for (needle, delay) in &self.delays_ms {
            if url.contains(needle) {
                tokio::time::sleep(Duration::from_millis(*delay)).await;
            }
        }
        Ok(json!({
            "record": {
                "metrics": {
                    "largest_contentful_paint": {
                        "percentiles": {"p75": "2200"},
                        "histogram": [
                            {"start": 0, "end": 2500, "density": 0.8},
                            {"start": 2500, "end": 4000, "density": 0.15},
                            {"start": 4000, "density": 0.05}
                        ]
                    }
                }
            }
        }))
    }
}

struct FailMetrics;

#[async_trait]
impl MetricsProvider for FailMetrics {
    async fn fetch_real_user_metrics(&self, _url: &str) -> Result<Value, ProviderError> {
        Err(ProviderError::Unavailable("crux down".to_string()))
    }
}

struct SlowMetrics;

#[async_trait]
impl MetricsProvider for SlowMetrics {
    async fn fetch_real_user_metrics(&self, _url: &str) -> Result<Value, ProviderError> {
        tokio::time::sleep(Duration::from_secs(30)).await;
        Ok(json!({}))
    }
}

struct OkLab;

#[async_trait]
impl LabProvider for OkLab {
    async fn fetch_lab_performance(&self, _url: &str) -> Result<LabPerformance, ProviderError> {
        Ok(LabPerformance {
            score: Some(91),
            metrics: LabMetrics {
                first_contentful_paint: Some(1200.0),
                ..LabMetrics::default()
            },
        })
    }
}

struct FailLab;

#[async_trait]
impl LabProvider for FailLab {
    async fn fetch_lab_performance(&self, _url: &str) -> Result<LabPerformance, ProviderError> {
        Err(ProviderError::Unavailable("psi down".to_string()))
    }
}

struct OkPage;

#[async_trait]
impl PageProvider for OkPage {
    async fn fetch_page(&self, _url: &str) -> Result<FetchedPage, ProviderError> {
        Ok(FetchedPage {
            headers: [("cf-ray".to_string(), "abc".to_string())].into_iter().collect(),
            body: r#"<html><head><meta name="generator" content="WordPress 6.1"></head><body></body></html>"#
                .to_string(),
        })
    }

    async fn probe_endpoint(&self, _url: &str) -> Result<u16, ProviderError> {
        Ok(200)
    }
}

struct DownPage;

#[async_trait]
impl PageProvider for DownPage {
    async fn fetch_page(&self, url: &str) -> Result<FetchedPage, ProviderError> {
        Err(ProviderError::Unreachable(url.to_string()))
    }

    async fn probe_endpoint(&self, url: &str) -> Result<u16, ProviderError> {
        Err(ProviderError::Unreachable(url.to_string()))
    }
}

struct OkRank(Option<u64>);

#[async_trait]
impl RankProvider for OkRank {
    async fn lookup_live_rank(&self, _domain: &str) -> Result<LiveRank, ProviderError> {
        Ok(LiveRank {
            rank: self.0,
            last_updated: Some("2025-07-01".to_string()),
        })
    }
}

struct FailRank;

#[async_trait]
impl RankProvider for FailRank {
    async fn lookup_live_rank(&self, _domain: &str) -> Result<LiveRank, ProviderError> {
        Err(ProviderError::Unavailable("similarweb down".to_string()))
    }
}

struct OkFirmographics;

#[async_trait]
impl FirmographicsProvider for OkFirmographics {
    async fn lookup_firmographics(
        &self,
        _url: &str,
    ) -> Result<Option<Firmographics>, ProviderError> {
        Ok(Some(Firmographics {
            name: Some("Example Org".to_string()),
            ..Firmographics::default()
        }))
    }
}

struct FailFirmographics;

#[async_trait]
impl FirmographicsProvider for FailFirmographics {
    async fn lookup_firmographics(
        &self,
        _url: &str,
    ) -> Result<Option<Firmographics>, ProviderError> {
        Err(ProviderError::RateLimited("diffbot".to_string()))
    }
}

struct OkResolver;

#[async_trait]
impl HostResolver for OkResolver {
    async fn resolve_host_address(&self, _hostname: &str) -> Result<IpAddr, ProviderError> {
        Ok("93.184.216.34".parse().unwrap())
    }
}

struct OkGeo;

#[async_trait]
impl GeoProvider for OkGeo {
    async fn lookup_geo(&self, _ip: IpAddr) -> Result<GeoInfo, ProviderError> {
        Ok(GeoInfo {
            country: Some("United States".to_string()),
            ..GeoInfo::default()
        })
    }
}

// ---------------------------------------------------------------------------
// Harness
// ---------------------------------------------------------------------------

struct Mocks {
    metrics: Arc<dyn MetricsProvider>,
    lab: Arc<dyn LabProvider>,
    firmographics: Arc<dyn FirmographicsProvider>,
    page: Arc<dyn PageProvider>,
    rank: Arc<dyn RankProvider>,
    call_timeout: Duration,
}

impl Default for Mocks {
    fn default() -> Self {
        Self {
            metrics: Arc::new(OkMetrics::instant()),
            lab: Arc::new(OkLab),
            firmographics: Arc::new(OkFirmographics),
            page: Arc::new(OkPage),
            rank: Arc::new(OkRank(Some(123))),
            call_timeout: Duration::from_secs(5),
        }
    }
}

/// Static table holding `42,example.com`, the fallback used by the
/// degradation tests.
fn static_table() -> Arc<RankTable> {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(b"42,example.com\n").unwrap();
    Arc::new(RankTable::load(file.path()).unwrap())
}

fn orchestrator(mocks: Mocks) -> Arc<Orchestrator> {
    let fingerprinter = Arc::new(Fingerprinter::new(
        mocks.page,
        Arc::new(OkResolver),
        Arc::new(OkGeo),
    ));
    let rank_resolver = Arc::new(DomainRankResolver::new(mocks.rank, static_table()));

    Arc::new(Orchestrator::new(
        Dependencies {
            metrics: mocks.metrics,
            lab: mocks.lab,
            firmographics: mocks.firmographics,
            fingerprinter,
            rank_resolver,
        },
        2,
        mocks.call_timeout,
    ))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_full_report_when_every_provider_is_healthy() {
    let orchestrator = orchestrator(Mocks::default());
    let report = orchestrator.analyze("https://www.example.com/pricing").await.unwrap();

    assert_eq!(report.url, "https://www.example.com/pricing");
    assert_eq!(report.domain, "example.com");

    let metrics = report.real_user_metrics.unwrap();
    let lcp = &metrics.metrics["largest_contentful_paint"];
    assert_eq!(lcp.rating, Rating::Good);
    assert!((lcp.distribution.good - 80.0).abs() < 1e-9);

    assert_eq!(report.lab_performance.unwrap().score, Some(91));

    let technical = report.technical.unwrap();
    assert!(technical.platform.detected);
    assert!(technical.infrastructure.cdns.contains("cloudflare"));

    assert_eq!(report.traffic.rank, Some(123));
    assert_eq!(report.traffic.source, RankSource::Live);
    assert_eq!(report.traffic.range.low, "20M");
    assert!(report.traffic.monthly_visits > 0);
    assert_eq!(report.traffic.last_updated.as_deref(), Some("2025-07-01"));

    assert_eq!(report.firmographics.unwrap().name.as_deref(), Some("Example Org"));
}

#[tokio::test]
async fn test_metrics_outage_degrades_only_metrics() {
    let orchestrator = orchestrator(Mocks {
        metrics: Arc::new(FailMetrics),
        ..Mocks::default()
    });
    let report = orchestrator.analyze("example.com").await.unwrap();

    assert!(report.real_user_metrics.is_none());
    assert!(report.lab_performance.is_some());
    assert!(report.technical.is_some());
    assert!(report.firmographics.is_some());
    assert_eq!(report.traffic.rank, Some(123));
}

#[tokio::test]
async fn test_lab_outage_degrades_only_lab() {
    let orchestrator = orchestrator(Mocks {
        lab: Arc::new(FailLab),
        ..Mocks::default()
    });
    let report = orchestrator.analyze("example.com").await.unwrap();

    assert!(report.lab_performance.is_none());
    assert!(report.real_user_metrics.is_some());
    assert!(report.technical.is_some());
}

#[tokio::test]
async fn test_unreachable_site_degrades_only_fingerprint() {
    let orchestrator = orchestrator(Mocks {
        page: Arc::new(DownPage),
        ..Mocks::default()
    });
    let report = orchestrator.analyze("example.com").await.unwrap();

    assert!(report.technical.is_none());
    assert!(report.real_user_metrics.is_some());
    assert!(report.lab_performance.is_some());
}

#[tokio::test]
async fn test_firmographics_rate_limit_degrades_only_firmographics() {
    let orchestrator = orchestrator(Mocks {
        firmographics: Arc::new(FailFirmographics),
        ..Mocks::default()
    });
    let report = orchestrator.analyze("example.com").await.unwrap();

    assert!(report.firmographics.is_none());
    assert!(report.real_user_metrics.is_some());
}

#[tokio::test]
async fn test_rank_outage_falls_back_to_static_table() {
    let orchestrator = orchestrator(Mocks {
        rank: Arc::new(FailRank),
        ..Mocks::default()
    });
    let report = orchestrator.analyze("https://example.com").await.unwrap();

    assert_eq!(report.traffic.rank, Some(42));
    assert_eq!(report.traffic.source, RankSource::Static);
    assert_eq!(report.traffic.range.low, "20M");
}

#[tokio::test]
async fn test_unknown_domain_yields_empty_estimate_not_error() {
    let orchestrator = orchestrator(Mocks {
        rank: Arc::new(FailRank),
        ..Mocks::default()
    });
    // Not in the static table either.
    let report = orchestrator.analyze("https://unranked.example").await.unwrap();

    assert_eq!(report.traffic.rank, None);
    assert_eq!(report.traffic.source, RankSource::None);
    assert_eq!(report.traffic.monthly_visits, 0);
    assert_eq!(report.traffic.confidence, 0.0);
    assert_eq!(report.traffic.range.low, "0");
    assert_eq!(report.traffic.range.high, "1K");
}

#[tokio::test]
async fn test_provider_timeout_degrades_like_failure() {
    let orchestrator = orchestrator(Mocks {
        metrics: Arc::new(SlowMetrics),
        call_timeout: Duration::from_millis(50),
        ..Mocks::default()
    });
    let report = orchestrator.analyze("example.com").await.unwrap();

    assert!(report.real_user_metrics.is_none());
    assert!(report.lab_performance.is_some());
}

#[tokio::test]
async fn test_empty_url_is_a_validation_error() {
    let orchestrator = orchestrator(Mocks::default());
    assert!(orchestrator.analyze("").await.is_err());
    assert!(orchestrator.analyze("   ").await.is_err());
}

#[tokio::test]
async fn test_batch_preserves_input_order_under_inverted_latency() {
    // Chunk size is 2, so a.com and b.com run concurrently and a.com
    // finishes last; the output must still lead with it.
    let orchestrator = orchestrator(Mocks {
        metrics: Arc::new(OkMetrics {
            delays_ms: vec![("a.example", 200), ("b.example", 20)],
        }),
        ..Mocks::default()
    });

    let urls: Vec<String> = ["a.example.com", "b.example.com", "c.example.com"]
        .iter()
        .map(|s| s.to_string())
        .collect();
    let reports = orchestrator.analyze_batch(urls).await.unwrap();

    let domains: Vec<&str> = reports.iter().map(|r| r.domain.as_str()).collect();
    assert_eq!(domains, vec!["a.example.com", "b.example.com", "c.example.com"]);
}

#[tokio::test]
async fn test_batch_spans_multiple_chunks_in_order() {
    let orchestrator = orchestrator(Mocks::default());

    let urls: Vec<String> = (1..=5).map(|i| format!("site{i}.example.com")).collect();
    let reports = orchestrator.analyze_batch(urls.clone()).await.unwrap();

    assert_eq!(reports.len(), 5);
    for (report, url) in reports.iter().zip(&urls) {
        assert_eq!(&report.domain, url);
    }
}

#[tokio::test]
async fn test_batch_rejects_invalid_entries() {
    let orchestrator = orchestrator(Mocks::default());
    let urls = vec!["example.com".to_string(), "".to_string()];
    assert!(orchestrator.analyze_batch(urls).await.is_err());
}
