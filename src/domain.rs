//! URL and domain normalization.
//!
//! Every domain-keyed lookup (rank table, live rank API) goes through
//! [`normalize_domain`] exactly once per request; the original URL string is
//! kept for display in the report.

use anyhow::{Result, anyhow};
use url::Url;

/// Reduces a raw URL string to a bare domain: scheme, `www.` prefix, path,
/// query, and fragment are all stripped. Idempotent.
///
/// # Errors
///
/// Returns an error for empty input or a string that does not parse as a
/// URL even with an assumed `https://` scheme.
pub fn normalize_domain(raw: &str) -> Result<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(anyhow!("URL is required"));
    }

    let parsed = Url::parse(&ensure_scheme(trimmed))
        .map_err(|e| anyhow!("invalid URL {trimmed:?}: {e}"))?;

    let host = parsed
        .host_str()
        .ok_or_else(|| anyhow!("URL {trimmed:?} has no host"))?;

    let host = host.strip_prefix("www.").unwrap_or(host);
    Ok(host.to_ascii_lowercase())
}

/// Prefixes `https://` when the input lacks a scheme, so it can be parsed
/// and fetched. Already-schemed input is returned unchanged.
pub fn ensure_scheme(raw: &str) -> String {
    if raw.starts_with("http://") || raw.starts_with("https://") {
        raw.to_string()
    } else {
        format!("https://{raw}")
    }
}
