//! Host resolution and geolocation enrichment for a fingerprinted site.

use std::net::IpAddr;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::ProviderError;
use crate::services::providers::{GeoInfo, GeoProvider, HostResolver};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NetworkInfo {
    pub host: String,
    pub ip_address: IpAddr,
    pub geo: Option<GeoInfo>,
}

/// Resolves the host and optionally enriches with geolocation data.
///
/// Resolution failure is an error (a site without an address cannot be
/// fingerprinted); enrichment failure only drops the `geo` section.
pub async fn resolve_network(
    resolver: &Arc<dyn HostResolver>,
    geo_provider: &Arc<dyn GeoProvider>,
    host: &str,
) -> Result<NetworkInfo, ProviderError> {
    let ip_address = resolver.resolve_host_address(host).await?;

    let geo = match geo_provider.lookup_geo(ip_address).await {
        Ok(info) => Some(info),
        Err(e) => {
            warn!(host, ip = %ip_address, error = %e, "Geo enrichment failed");
            None
        }
    };

    Ok(NetworkInfo {
        host: host.to_string(),
        ip_address,
        geo,
    })
}
