//! Response-header classification and CDN signature matching.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

const CACHING_HEADERS: [&str; 3] = ["cache-control", "expires", "etag"];

const SECURITY_HEADERS: [&str; 4] = [
    "strict-transport-security",
    "x-xss-protection",
    "content-security-policy",
    "x-frame-options",
];

/// CDN signature table: a CDN is reported when ANY of its signature
/// headers is present. Several CDNs can match at once (stacked edges are
/// real), so the result is a set, not a single winner.
static CDN_SIGNATURES: &[(&str, &[&str])] = &[
    ("cloudflare", &["cf-ray", "cf-cache-status"]),
    ("fastly", &["x-fastly-request-id", "fastly-io-info"]),
    ("akamai", &["x-akamai-transformed", "akamai-grn"]),
    ("cloudfront", &["x-amz-cf-id", "x-amz-cf-pop"]),
    ("vercel", &["x-vercel-id", "x-vercel-cache"]),
    ("netlify", &["x-nf-request-id"]),
    ("sucuri", &["x-sucuri-id", "x-sucuri-cache"]),
];

/// Headers partitioned by concern. Keys are lowercased; absent concerns
/// stay empty/`None`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HeaderClassification {
    pub caching: BTreeMap<String, String>,
    pub security: BTreeMap<String, String>,
    pub compression: Option<String>,
    pub server: Option<String>,
    pub powered_by: Option<String>,
}

/// Partitions response headers into caching, security, compression, and
/// server-identity groups.
pub fn classify_headers(headers: &BTreeMap<String, String>) -> HeaderClassification {
    let pick = |names: &[&str]| -> BTreeMap<String, String> {
        names
            .iter()
            .filter_map(|name| headers.get(*name).map(|v| (name.to_string(), v.clone())))
            .collect()
    };

    HeaderClassification {
        caching: pick(&CACHING_HEADERS),
        security: pick(&SECURITY_HEADERS),
        compression: headers.get("content-encoding").cloned(),
        server: headers.get("server").cloned(),
        powered_by: headers.get("x-powered-by").cloned(),
    }
}

/// All CDNs whose signature headers appear in the response.
pub fn detect_cdns(headers: &BTreeMap<String, String>) -> BTreeSet<String> {
    CDN_SIGNATURES
        .iter()
        .filter(|(_, signatures)| signatures.iter().any(|key| headers.contains_key(*key)))
        .map(|(name, _)| name.to_string())
        .collect()
}
