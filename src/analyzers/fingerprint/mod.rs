//! Technical fingerprinting: platform, infrastructure, and network facts
//! inferred from one passive page fetch plus a handful of probes.
//!
//! The whole fingerprint fails only when the page cannot be fetched or the
//! host does not resolve; every heuristic beyond that degrades on its own.

pub mod headers;
pub mod network;
pub mod platform;
pub mod probes;

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::domain::normalize_domain;
use crate::error::ProviderError;
use crate::services::providers::{GeoProvider, HostResolver, PageProvider};

pub use headers::HeaderClassification;
pub use network::NetworkInfo;
pub use platform::PlatformDetection;
pub use probes::ProbeResult;

/// Script/stylesheet/image URLs referenced by the page.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SourceFiles {
    pub scripts: Vec<String>,
    pub styles: Vec<String>,
    pub images: Vec<String>,
}

/// Infrastructure facts derived from headers and the network layer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Infrastructure {
    pub headers: HeaderClassification,
    pub cdns: BTreeSet<String>,
    pub network: NetworkInfo,
    pub source_files: SourceFiles,
}

/// The complete technical picture of one site. Sparse: absent signals
/// leave fields at their empty defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TechnicalProfile {
    pub platform: PlatformDetection,
    pub admin_endpoints: BTreeMap<String, ProbeResult>,
    pub infrastructure: Infrastructure,
}

pub struct Fingerprinter {
    page: Arc<dyn PageProvider>,
    resolver: Arc<dyn HostResolver>,
    geo: Arc<dyn GeoProvider>,
}

impl Fingerprinter {
    pub fn new(
        page: Arc<dyn PageProvider>,
        resolver: Arc<dyn HostResolver>,
        geo: Arc<dyn GeoProvider>,
    ) -> Self {
        Self {
            page,
            resolver,
            geo,
        }
    }

    /// Fetches the page and derives the full technical profile.
    #[tracing::instrument(skip(self))]
    pub async fn fingerprint(&self, url: &str) -> Result<TechnicalProfile, ProviderError> {
        let host = normalize_domain(url)
            .map_err(|e| ProviderError::Unreachable(format!("{url}: {e}")))?;

        let page = self.page.fetch_page(url).await?;

        // One synchronous DOM pass; nothing DOM-related crosses an await.
        let signals = platform::extract_signals(&page.body);
        let platform = platform::detect_platform(&signals, &page.body);

        let base_url = format!("https://{host}");
        let (network, admin_endpoints) = tokio::join!(
            network::resolve_network(&self.resolver, &self.geo, &host),
            probes::probe_admin_endpoints(self.page.clone(), &base_url),
        );
        let network = network?;

        Ok(TechnicalProfile {
            platform,
            admin_endpoints,
            infrastructure: Infrastructure {
                headers: headers::classify_headers(&page.headers),
                cdns: headers::detect_cdns(&page.headers),
                network,
                source_files: SourceFiles {
                    scripts: signals.script_urls,
                    styles: signals.style_urls,
                    images: signals.image_urls,
                },
            },
        })
    }
}
