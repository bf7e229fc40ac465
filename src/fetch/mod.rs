//! HTTP client seam for all outbound provider traffic.
//!
//! [`HttpClient`] is the single abstraction the service clients talk
//! through; [`BasicClient`] is the production implementation, and the
//! wrappers in [`auth`] layer API-key injection on top of any inner client.

mod basic;
mod client;

pub mod auth;

pub use basic::BasicClient;
pub use client::HttpClient;

use reqwest::{Method, Request};
use serde_json::Value;

use crate::error::ProviderError;

/// Issues a GET and decodes the response body as JSON.
///
/// HTTP statuses are mapped onto the provider failure taxonomy: 404 →
/// `NotFound`, 429 → `RateLimited`, anything else non-2xx → `Unavailable`.
pub async fn fetch_json<C: HttpClient>(
    client: &C,
    url: &str,
    context: &str,
) -> Result<Value, ProviderError> {
    let parsed = url
        .parse()
        .map_err(|e| ProviderError::Unavailable(format!("{context}: bad URL: {e}")))?;
    let req = Request::new(Method::GET, parsed);
    execute_json(client, req, context).await
}

/// Issues a POST with a JSON body and decodes the response body as JSON.
pub async fn post_json<C: HttpClient>(
    client: &C,
    url: &str,
    body: &Value,
    context: &str,
) -> Result<Value, ProviderError> {
    let parsed = url
        .parse()
        .map_err(|e| ProviderError::Unavailable(format!("{context}: bad URL: {e}")))?;
    let mut req = Request::new(Method::POST, parsed);
    req.headers_mut().insert(
        reqwest::header::CONTENT_TYPE,
        reqwest::header::HeaderValue::from_static("application/json"),
    );
    *req.body_mut() = Some(body.to_string().into());
    execute_json(client, req, context).await
}

async fn execute_json<C: HttpClient>(
    client: &C,
    req: Request,
    context: &str,
) -> Result<Value, ProviderError> {
    let resp = client
        .execute(req)
        .await
        .map_err(|e| ProviderError::Unavailable(format!("{context}: {e}")))?;

    let status = resp.status();
    if !status.is_success() {
        return Err(ProviderError::from_status(status, context));
    }

    resp.json()
        .await
        .map_err(|e| ProviderError::Unavailable(format!("{context}: invalid JSON: {e}")))
}
