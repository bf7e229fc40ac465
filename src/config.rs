//! Environment-driven configuration.
//!
//! Loaded once at startup (after `dotenvy::dotenv()`), then passed by value
//! into component constructors. Components never read the environment
//! themselves.

/// Runtime configuration for the analysis service.
#[derive(Debug, Clone)]
pub struct Config {
    pub crux_api_key: String,
    pub psi_api_key: String,
    pub diffbot_token: String,
    pub similarweb_api_key: String,

    /// Path to the static ranked-domain CSV (`rank,domain` rows).
    pub rank_table_path: String,

    /// Number of URLs analyzed concurrently per batch chunk.
    pub chunk_size: usize,

    /// Per-request timeout for provider calls, seconds.
    pub request_timeout_secs: u64,

    /// Connect timeout for provider calls, seconds.
    pub connect_timeout_secs: u64,

    /// Timeout for lightweight endpoint probes, seconds.
    pub probe_timeout_secs: u64,
}

impl Config {
    /// Reads configuration from the process environment, applying defaults
    /// for everything except API keys (absent keys stay empty and the
    /// corresponding provider degrades at call time).
    pub fn from_env() -> Self {
        Self {
            crux_api_key: env_or("CRUX_API_KEY", ""),
            psi_api_key: env_or("PSI_API_KEY", ""),
            diffbot_token: env_or("DIFFBOT_TOKEN", ""),
            similarweb_api_key: env_or("SIMILARWEB_API_KEY", ""),
            rank_table_path: env_or("RANK_TABLE_PATH", "data/top_domains.csv"),
            chunk_size: env_parse("BATCH_CHUNK_SIZE", 5),
            request_timeout_secs: env_parse("REQUEST_TIMEOUT_SECS", 30),
            connect_timeout_secs: env_parse("CONNECT_TIMEOUT_SECS", 10),
            probe_timeout_secs: env_parse("PROBE_TIMEOUT_SECS", 5),
        }
    }
}

fn env_or(name: &str, default: &str) -> String {
    std::env::var(name).unwrap_or_else(|_| default.to_string())
}

fn env_parse<T: std::str::FromStr + Copy>(name: &str, default: T) -> T {
    std::env::var(name)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}
