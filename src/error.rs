//! Failure taxonomy for external data providers.
//!
//! Every collaborator call resolves to either a value or a [`ProviderError`].
//! Provider failures never cross the orchestrator boundary: each owning
//! component converts them into its documented empty value. Request-level
//! validation and startup failures travel as `anyhow` errors instead.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ProviderError {
    /// The provider has no data for this URL or domain.
    #[error("no data found: {0}")]
    NotFound(String),

    /// The provider rejected the request due to rate limiting.
    #[error("rate limited: {0}")]
    RateLimited(String),

    /// The provider is reachable but returned an error or garbage.
    #[error("provider unavailable: {0}")]
    Unavailable(String),

    /// The target site itself could not be fetched.
    #[error("target unreachable: {0}")]
    Unreachable(String),

    /// Hostname did not resolve to an address.
    #[error("name resolution failed: {0}")]
    Resolution(String),
}

impl ProviderError {
    /// Maps an HTTP status from a provider API to the matching variant.
    pub fn from_status(status: reqwest::StatusCode, context: &str) -> Self {
        match status.as_u16() {
            404 => ProviderError::NotFound(format!("{context}: 404")),
            429 => ProviderError::RateLimited(format!("{context}: 429")),
            code => ProviderError::Unavailable(format!("{context}: HTTP {code}")),
        }
    }
}
