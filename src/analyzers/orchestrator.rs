//! Per-URL fan-out and batch orchestration.
//!
//! One analysis issues every provider call concurrently and waits for all
//! of them to settle, so whole-analysis latency is the slowest provider,
//! not the sum. Each provider degrades independently: no single outage
//! fails the aggregate request. Batches run in fixed-size chunks to bound
//! peak outbound concurrency; output order always matches input order.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use chrono::Utc;
use tracing::{info, warn};

use crate::analyzers::fingerprint::Fingerprinter;
use crate::analyzers::metrics::MetricsNormalizer;
use crate::analyzers::rank_resolver::DomainRankResolver;
use crate::analyzers::report::SiteReport;
use crate::analyzers::traffic::RankEstimator;
use crate::domain::normalize_domain;
use crate::error::ProviderError;
use crate::services::providers::{FirmographicsProvider, LabProvider, MetricsProvider};

/// Everything the orchestrator fans out to, constructed once at startup.
pub struct Dependencies {
    pub metrics: Arc<dyn MetricsProvider>,
    pub lab: Arc<dyn LabProvider>,
    pub firmographics: Arc<dyn FirmographicsProvider>,
    pub fingerprinter: Arc<Fingerprinter>,
    pub rank_resolver: Arc<DomainRankResolver>,
}

pub struct Orchestrator {
    deps: Dependencies,
    estimator: RankEstimator,
    normalizer: MetricsNormalizer,
    chunk_size: usize,
    call_timeout: Duration,
}

impl Orchestrator {
    pub fn new(deps: Dependencies, chunk_size: usize, call_timeout: Duration) -> Self {
        Self {
            deps,
            estimator: RankEstimator::new(),
            normalizer: MetricsNormalizer::new(),
            chunk_size: chunk_size.max(1),
            call_timeout,
        }
    }

    /// Analyzes one URL. Only request validation can fail; provider
    /// failures show up as absent report sections.
    #[tracing::instrument(skip(self))]
    pub async fn analyze(&self, url: &str) -> Result<SiteReport> {
        let domain = normalize_domain(url).context("invalid analysis request")?;

        info!(url, domain, "Starting site analysis");

        let (raw_metrics, lab, technical, traffic, firmographics) = tokio::join!(
            self.settle(
                "real_user_metrics",
                url,
                self.deps.metrics.fetch_real_user_metrics(url),
            ),
            self.settle(
                "lab_performance",
                url,
                self.deps.lab.fetch_lab_performance(url),
            ),
            self.settle("fingerprint", url, self.deps.fingerprinter.fingerprint(url)),
            async {
                let resolution = self.deps.rank_resolver.resolve(&domain).await;
                self.estimator.estimate(&resolution)
            },
            self.settle(
                "firmographics",
                url,
                self.deps.firmographics.lookup_firmographics(url),
            ),
        );

        info!(url, "Completed site analysis");

        Ok(SiteReport {
            url: url.to_string(),
            domain,
            generated_at: Utc::now(),
            real_user_metrics: raw_metrics.map(|raw| self.normalizer.normalize(&raw)),
            lab_performance: lab,
            technical,
            traffic,
            firmographics: firmographics.flatten(),
        })
    }

    /// Analyzes many URLs in input order: sequential chunks, concurrent
    /// within a chunk.
    #[tracing::instrument(skip(self, urls), fields(url_count = urls.len()))]
    pub async fn analyze_batch(self: Arc<Self>, urls: Vec<String>) -> Result<Vec<SiteReport>> {
        info!(url_count = urls.len(), "Starting batch analysis");

        let mut reports = Vec::with_capacity(urls.len());
        for chunk in urls.chunks(self.chunk_size) {
            let mut tasks = Vec::with_capacity(chunk.len());
            for url in chunk {
                let orchestrator = Arc::clone(&self);
                let url = url.clone();
                tasks.push(tokio::spawn(
                    async move { orchestrator.analyze(&url).await },
                ));
            }
            // Awaiting in spawn order keeps output order equal to input
            // order no matter which analysis finishes first.
            for task in tasks {
                reports.push(task.await.context("analysis task panicked")??);
            }
        }

        info!(url_count = reports.len(), "Completed batch analysis");
        Ok(reports)
    }

    /// Runs one provider call under the shared timeout and converts any
    /// failure into `None`.
    async fn settle<T, F>(&self, source: &str, url: &str, call: F) -> Option<T>
    where
        F: Future<Output = Result<T, ProviderError>>,
    {
        match tokio::time::timeout(self.call_timeout, call).await {
            Ok(Ok(value)) => Some(value),
            Ok(Err(e)) => {
                warn!(url, source, error = %e, "Provider degraded");
                None
            }
            Err(_) => {
                warn!(url, source, timeout_secs = self.call_timeout.as_secs(), "Provider timed out");
                None
            }
        }
    }
}
