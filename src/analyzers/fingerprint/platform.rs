//! CMS/platform detection heuristics.
//!
//! Everything here is a pure function over a fetched page body, so the
//! heuristics are unit-testable without a live fetch. DOM work happens
//! inside [`extract_signals`] and never escapes it; the platform logic
//! itself only sees owned strings.

use std::collections::BTreeSet;

use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{Html, Selector};
use serde::{Deserialize, Serialize};

/// Generator prefix that marks the platform and carries its version.
const GENERATOR_PREFIX: &str = "WordPress";

/// Plugin identifiers worth calling out even when only an inlined or
/// minified reference survives in the HTML.
static WELL_KNOWN_PLUGINS: &[&str] = &[
    "woocommerce",
    "elementor",
    "jetpack",
    "akismet",
    "wordfence",
    "contact-form-7",
    "wpforms",
    "wp-rocket",
    "yoast",
    "all-in-one-seo",
];

static THEME_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"/wp-content/themes/([A-Za-z0-9_-]+)/").unwrap());
static PLUGIN_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"/wp-content/plugins/([A-Za-z0-9_-]+)/").unwrap());
static POST_TYPE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"post_type=([A-Za-z0-9_-]+)").unwrap());
static SHORTCODE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\[([a-z][a-z0-9_-]{2,})(?:\s[^\[\]]*)?\]").unwrap());

/// Built-in post types that do not count as customization.
const BUILTIN_POST_TYPES: [&str; 2] = ["post", "page"];

/// Signals pulled out of the DOM in one pass.
#[derive(Debug, Clone, Default)]
pub struct PageSignals {
    pub generator: Option<String>,
    pub admin_link_count: usize,
    pub script_urls: Vec<String>,
    pub style_urls: Vec<String>,
    pub image_urls: Vec<String>,
    pub has_custom_css: bool,
    pub has_widget_area: bool,
}

/// Platform detection result; every field stays at its empty default when
/// the corresponding signal was not found.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PlatformDetection {
    pub detected: bool,
    pub name: Option<String>,
    pub version: Option<String>,
    pub themes: BTreeSet<String>,
    pub plugins: BTreeSet<String>,
    pub well_known_plugins: Vec<String>,
    pub custom_post_types: BTreeSet<String>,
    pub shortcodes: BTreeSet<String>,
    pub has_customizer: bool,
    pub has_widget_areas: bool,
}

/// Parses the body once and collects every DOM-derived signal.
pub fn extract_signals(body: &str) -> PageSignals {
    let document = Html::parse_document(body);

    let select_attr = |css: &str, attr: &str| -> Vec<String> {
        let Ok(selector) = Selector::parse(css) else {
            return Vec::new();
        };
        document
            .select(&selector)
            .filter_map(|el| el.value().attr(attr))
            .map(str::to_string)
            .collect()
    };

    let exists = |css: &str| -> bool {
        Selector::parse(css)
            .map(|selector| document.select(&selector).next().is_some())
            .unwrap_or(false)
    };

    let generator = select_attr(r#"meta[name="generator"]"#, "content")
        .into_iter()
        .next();

    let admin_link_count = select_attr(r#"a[href*="wp-admin"]"#, "href").len()
        + select_attr(r#"a[href*="wp-login"]"#, "href").len();

    PageSignals {
        generator,
        admin_link_count,
        script_urls: select_attr("script[src]", "src"),
        style_urls: select_attr(r#"link[rel="stylesheet"]"#, "href"),
        image_urls: select_attr("img[src]", "src"),
        has_custom_css: exists("style#wp-custom-css"),
        has_widget_area: exists(".widget-area") || exists(".widget"),
    }
}

/// Derives the full platform picture from the extracted signals plus the
/// raw body (regex heuristics catch what the DOM scan misses).
pub fn detect_platform(signals: &PageSignals, body: &str) -> PlatformDetection {
    let generator_hit = signals
        .generator
        .as_deref()
        .is_some_and(|g| g.starts_with(GENERATOR_PREFIX));

    let detected = generator_hit || signals.admin_link_count > 0;

    let version = signals.generator.as_deref().and_then(|g| {
        g.strip_prefix(GENERATOR_PREFIX)
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .map(str::to_string)
    });

    let asset_urls = signals
        .script_urls
        .iter()
        .chain(signals.style_urls.iter());
    let mut themes = BTreeSet::new();
    let mut plugins = BTreeSet::new();
    for url in asset_urls {
        if let Some(cap) = THEME_RE.captures(url) {
            themes.insert(cap[1].to_string());
        }
        if let Some(cap) = PLUGIN_RE.captures(url) {
            plugins.insert(cap[1].to_string());
        }
    }

    let well_known_plugins = WELL_KNOWN_PLUGINS
        .iter()
        .filter(|candidate| plugins.contains(**candidate) || body.contains(**candidate))
        .map(|candidate| candidate.to_string())
        .collect();

    PlatformDetection {
        detected,
        name: detected.then(|| GENERATOR_PREFIX.to_string()),
        version,
        themes,
        plugins,
        well_known_plugins,
        custom_post_types: extract_post_types(body),
        shortcodes: extract_shortcodes(body),
        has_customizer: signals.has_custom_css,
        has_widget_areas: signals.has_widget_area,
    }
}

/// Non-built-in `post_type=` query values found anywhere in the body.
pub fn extract_post_types(body: &str) -> BTreeSet<String> {
    POST_TYPE_RE
        .captures_iter(body)
        .map(|cap| cap[1].to_string())
        .filter(|t| !BUILTIN_POST_TYPES.contains(&t.as_str()))
        .collect()
}

/// Bracket-delimited tokens that look like shortcode markup.
pub fn extract_shortcodes(body: &str) -> BTreeSet<String> {
    SHORTCODE_RE
        .captures_iter(body)
        .map(|cap| cap[1].to_string())
        .collect()
}
