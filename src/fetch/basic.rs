use std::time::Duration;

use super::client::HttpClient;
use async_trait::async_trait;

/// Production [`HttpClient`] backed by a shared [`reqwest::Client`] with
/// request and connect timeouts, so no outbound provider call can wait
/// unboundedly.
pub struct BasicClient(reqwest::Client);

impl BasicClient {
    pub fn new(request_timeout: Duration, connect_timeout: Duration) -> Self {
        let client = reqwest::Client::builder()
            .timeout(request_timeout)
            .connect_timeout(connect_timeout)
            .build()
            .unwrap_or_default();
        Self(client)
    }
}

impl Default for BasicClient {
    fn default() -> Self {
        Self::new(Duration::from_secs(30), Duration::from_secs(10))
    }
}

#[async_trait]
impl HttpClient for BasicClient {
    async fn execute(&self, req: reqwest::Request) -> reqwest::Result<reqwest::Response> {
        self.0.execute(req).await
    }
}
