//! Chrome-UX-Report-style real-user metrics client.
//!
//! The record API is strict about URL identity, so a lookup walks every
//! scheme/`www.` variation of the page URL before falling back to an
//! origin-level query. A 404 means "this variation has no data, try the
//! next one"; any other failure aborts the walk.

use async_trait::async_trait;
use serde_json::{Value, json};
use url::Url;

use crate::domain::ensure_scheme;
use crate::error::ProviderError;
use crate::fetch::auth::UrlParam;
use crate::fetch::{BasicClient, HttpClient, post_json};
use crate::services::providers::MetricsProvider;

const ENDPOINT: &str = "https://chromeuxreport.googleapis.com/v1/records:queryRecord";

const METRICS: [&str; 5] = [
    "largest_contentful_paint",
    "first_contentful_paint",
    "interaction_to_next_paint",
    "experimental_time_to_first_byte",
    "cumulative_layout_shift",
];

pub struct CruxClient<C = BasicClient> {
    endpoint: String,
    client: UrlParam<C>,
}

impl<C: HttpClient> CruxClient<C> {
    pub fn new(api_key: String, inner: C) -> Self {
        Self {
            endpoint: ENDPOINT.to_string(),
            client: UrlParam {
                inner,
                param_name: "key".to_string(),
                key: api_key,
            },
        }
    }

    async fn query(&self, body: Value) -> Result<Value, ProviderError> {
        post_json(&self.client, &self.endpoint, &body, "crux").await
    }
}

#[async_trait]
impl<C: HttpClient> MetricsProvider for CruxClient<C> {
    async fn fetch_real_user_metrics(&self, url: &str) -> Result<Value, ProviderError> {
        for variation in url_variations(url) {
            let body = json!({
                "url": variation,
                "formFactor": "DESKTOP",
                "metrics": METRICS,
            });
            match self.query(body).await {
                Ok(data) => return Ok(data),
                Err(ProviderError::NotFound(_)) => continue,
                Err(e) => return Err(e),
            }
        }

        // No page-level record under any variation: ask for origin data.
        let origin = origin_of(url)
            .ok_or_else(|| ProviderError::NotFound(format!("crux: no origin for {url}")))?;
        let body = json!({
            "origin": origin,
            "formFactor": "DESKTOP",
            "metrics": METRICS,
        });
        self.query(body).await
    }
}

/// All scheme × `www.` combinations of a URL, page path preserved.
fn url_variations(url: &str) -> Vec<String> {
    let Ok(parsed) = Url::parse(&ensure_scheme(url)) else {
        return vec![url.to_string()];
    };
    let Some(host) = parsed.host_str().map(str::to_string) else {
        return vec![url.to_string()];
    };

    let toggled = match host.strip_prefix("www.") {
        Some(bare) => bare.to_string(),
        None => format!("www.{host}"),
    };

    let mut variations = Vec::new();
    for scheme in ["https", "http"] {
        for domain in [&host, &toggled] {
            let mut candidate = parsed.clone();
            if candidate.set_scheme(scheme).is_ok()
                && candidate.set_host(Some(domain.as_str())).is_ok()
            {
                variations.push(candidate.to_string());
            }
        }
    }
    variations
}

fn origin_of(url: &str) -> Option<String> {
    let parsed = Url::parse(&ensure_scheme(url)).ok()?;
    let host = parsed.host_str()?;
    Some(format!("{}://{host}", parsed.scheme()))
}
