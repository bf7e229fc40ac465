//! Host resolution and IP geolocation enrichment.

use std::net::IpAddr;

use async_trait::async_trait;
use tokio::net::lookup_host;

use crate::error::ProviderError;
use crate::fetch::{BasicClient, HttpClient, fetch_json};
use crate::services::providers::{GeoInfo, GeoProvider, HostResolver};

/// [`HostResolver`] backed by the runtime's name resolution.
pub struct DnsResolver;

#[async_trait]
impl HostResolver for DnsResolver {
    async fn resolve_host_address(&self, hostname: &str) -> Result<IpAddr, ProviderError> {
        let mut addrs = lookup_host((hostname, 443))
            .await
            .map_err(|e| ProviderError::Resolution(format!("{hostname}: {e}")))?;

        addrs
            .next()
            .map(|sock| sock.ip())
            .ok_or_else(|| ProviderError::Resolution(format!("{hostname}: no addresses")))
    }
}

const ENDPOINT: &str = "http://ip-api.com/json";

/// Free-tier IP geolocation lookup (ip-api.com style JSON).
pub struct IpApiClient<C = BasicClient> {
    endpoint: String,
    client: C,
}

impl<C: HttpClient> IpApiClient<C> {
    pub fn new(client: C) -> Self {
        Self {
            endpoint: ENDPOINT.to_string(),
            client,
        }
    }
}

#[async_trait]
impl<C: HttpClient> GeoProvider for IpApiClient<C> {
    async fn lookup_geo(&self, ip: IpAddr) -> Result<GeoInfo, ProviderError> {
        let url = format!(
            "{}/{ip}?fields=status,country,regionName,city,isp,org,as",
            self.endpoint
        );
        let data = fetch_json(&self.client, &url, "geo").await?;

        if data["status"].as_str() != Some("success") {
            return Err(ProviderError::Unavailable(format!("geo: no data for {ip}")));
        }

        let field = |name: &str| data[name].as_str().map(str::to_string);
        Ok(GeoInfo {
            country: field("country"),
            region: field("regionName"),
            city: field("city"),
            isp: field("isp"),
            org: field("org"),
            asn: field("as"),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::Mutex;

    struct CannedJson(Mutex<Option<String>>);

    #[async_trait]
    impl HttpClient for CannedJson {
        async fn execute(&self, _req: reqwest::Request) -> reqwest::Result<reqwest::Response> {
            let body = self.0.lock().unwrap().take().unwrap_or_default();
            Ok(http::Response::new(body).into())
        }
    }

    #[tokio::test]
    async fn test_geo_success_payload() {
        let client = IpApiClient::new(CannedJson(Mutex::new(Some(
            r#"{"status":"success","country":"Germany","regionName":"Berlin",
                "city":"Berlin","isp":"Hetzner","org":"Hetzner Online",
                "as":"AS24940"}"#
                .to_string(),
        ))));
        let geo = client.lookup_geo("1.2.3.4".parse().unwrap()).await.unwrap();
        assert_eq!(geo.country.as_deref(), Some("Germany"));
        assert_eq!(geo.asn.as_deref(), Some("AS24940"));
    }

    #[tokio::test]
    async fn test_geo_failure_status_is_error() {
        let client = IpApiClient::new(CannedJson(Mutex::new(Some(
            r#"{"status":"fail","message":"private range"}"#.to_string(),
        ))));
        let result = client.lookup_geo("10.0.0.1".parse().unwrap()).await;
        assert!(matches!(result, Err(ProviderError::Unavailable(_))));
    }
}
