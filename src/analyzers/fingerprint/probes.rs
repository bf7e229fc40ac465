//! Concurrent existence probes against well-known administrative paths.

use std::collections::BTreeMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::services::providers::PageProvider;

/// Paths probed on every fingerprint run.
pub const ADMIN_PATHS: [&str; 4] = ["/wp-admin/", "/wp-login.php", "/wp-json/", "/xmlrpc.php"];

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ProbeResult {
    pub accessible: bool,
    pub status: u16,
}

/// Probes every admin path concurrently and keys the results by path, so
/// completion order never shows in the output. A failed probe reports
/// `{accessible: false, status: 0}` instead of aborting the batch.
pub async fn probe_admin_endpoints(
    provider: Arc<dyn PageProvider>,
    base_url: &str,
) -> BTreeMap<String, ProbeResult> {
    let base = base_url.trim_end_matches('/').to_string();

    let mut tasks = Vec::new();
    for path in ADMIN_PATHS {
        let provider = provider.clone();
        let target = format!("{base}{path}");
        tasks.push((
            path,
            tokio::spawn(async move { provider.probe_endpoint(&target).await }),
        ));
    }

    let mut results = BTreeMap::new();
    for (path, task) in tasks {
        let result = match task.await {
            Ok(Ok(status)) => ProbeResult {
                accessible: (200..400).contains(&status),
                status,
            },
            Ok(Err(e)) => {
                debug!(path, error = %e, "Endpoint probe failed");
                ProbeResult {
                    accessible: false,
                    status: 0,
                }
            }
            Err(_) => ProbeResult {
                accessible: false,
                status: 0,
            },
        };
        results.insert(path.to_string(), result);
    }
    results
}
