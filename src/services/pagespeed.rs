//! PageSpeed-style synthetic lab performance client.
//!
//! The API is slow and flaky under load, so each analysis retries up to
//! [`MAX_RETRIES`] times with a fixed delay before giving up.

use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;
use tracing::warn;

use crate::error::ProviderError;
use crate::fetch::auth::UrlParam;
use crate::fetch::{BasicClient, HttpClient, fetch_json};
use crate::services::providers::{LabMetrics, LabPerformance, LabProvider};

const ENDPOINT: &str = "https://www.googleapis.com/pagespeedonline/v5/runPagespeed";
const MAX_RETRIES: u32 = 3;
const RETRY_DELAY: Duration = Duration::from_secs(1);

pub struct PageSpeedClient<C = BasicClient> {
    endpoint: String,
    client: UrlParam<C>,
}

impl<C: HttpClient> PageSpeedClient<C> {
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
}

#[async_trait]
impl<C: HttpClient> LabProvider for PageSpeedClient<C> {
    async fn fetch_lab_performance(&self, url: &str) -> Result<LabPerformance, ProviderError> {
        let request_url = format!(
            "{}?url={}&strategy=desktop&category=performance",
            self.endpoint,
            urlencode(url)
        );

        let mut attempt = 0;
        loop {
            match fetch_json(&self.client, &request_url, "pagespeed").await {
                Ok(data) => return Ok(process_results(&data)),
                Err(e) => {
                    attempt += 1;
                    if attempt >= MAX_RETRIES {
                        return Err(e);
                    }
                    warn!(url, attempt, error = %e, "PageSpeed attempt failed, retrying");
                    tokio::time::sleep(RETRY_DELAY).await;
                }
            }
        }
    }
}

fn process_results(data: &Value) -> LabPerformance {
    let lighthouse = &data["lighthouseResult"];

    let score = lighthouse["categories"]["performance"]["score"]
        .as_f64()
        .map(|s| (s * 100.0).round() as u64);

    let audit = |name: &str| lighthouse["audits"][name]["numericValue"].as_f64();

    LabPerformance {
        score,
        metrics: LabMetrics {
            first_contentful_paint: audit("first-contentful-paint"),
            speed_index: audit("speed-index"),
            largest_contentful_paint: audit("largest-contentful-paint"),
            time_to_interactive: audit("interactive"),
        },
    }
}

fn urlencode(s: &str) -> String {
    // Conservative percent-encoding for a URL carried in a query value.
    let mut out = String::with_capacity(s.len());
    for byte in s.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                out.push(byte as char)
            }
            _ => out.push_str(&format!("%{byte:02X}")),
        }
    }
    out
}
