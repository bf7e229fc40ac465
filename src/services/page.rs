//! Target-site page fetching and endpoint probing.
//!
//! Unlike the other services this one talks to the site under analysis,
//! not to a data provider, so failures map to `Unreachable`.

use std::collections::BTreeMap;

use async_trait::async_trait;
use reqwest::{Method, Request};

use crate::domain::ensure_scheme;
use crate::error::ProviderError;
use crate::fetch::{BasicClient, HttpClient};
use crate::services::providers::{FetchedPage, PageProvider};

pub struct HttpPageProvider<C = BasicClient> {
    client: C,
    /// Separate client for probes, which carry a much shorter timeout
    /// than a full page fetch.
    probe_client: C,
}

impl<C: HttpClient> HttpPageProvider<C> {
    pub fn new(client: C, probe_client: C) -> Self {
        Self {
            client,
            probe_client,
        }
    }
}

#[async_trait]
impl<C: HttpClient> PageProvider for HttpPageProvider<C> {
    async fn fetch_page(&self, url: &str) -> Result<FetchedPage, ProviderError> {
        let target = ensure_scheme(url);
        let parsed = target
            .parse()
            .map_err(|e| ProviderError::Unreachable(format!("{target}: {e}")))?;

        let resp = self
            .client
            .execute(Request::new(Method::GET, parsed))
            .await
            .map_err(|e| ProviderError::Unreachable(format!("{target}: {e}")))?;

        if !resp.status().is_success() {
            return Err(ProviderError::Unreachable(format!(
                "{target}: HTTP {}",
                resp.status()
            )));
        }

        let headers = header_map(resp.headers());
        let body = resp
            .text()
            .await
            .map_err(|e| ProviderError::Unreachable(format!("{target}: body: {e}")))?;

        Ok(FetchedPage { headers, body })
    }

    async fn probe_endpoint(&self, url: &str) -> Result<u16, ProviderError> {
        let parsed = url
            .parse()
            .map_err(|e| ProviderError::Unreachable(format!("{url}: {e}")))?;

        let resp = self
            .probe_client
            .execute(Request::new(Method::HEAD, parsed))
            .await
            .map_err(|e| ProviderError::Unreachable(format!("{url}: {e}")))?;

        // Any HTTP answer is a signal, including 403/404.
        Ok(resp.status().as_u16())
    }
}

fn header_map(headers: &reqwest::header::HeaderMap) -> BTreeMap<String, String> {
    headers
        .iter()
        .map(|(name, value)| {
            (
                name.as_str().to_ascii_lowercase(),
                value.to_str().unwrap_or_default().to_string(),
            )
        })
        .collect()
}
