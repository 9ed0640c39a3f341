/// URL helpers: base URL normalization and target URL checks
use crate::error::{Result, ShortenError};
use regex::Regex;
use std::sync::LazyLock;
use url::Url;

pub const DEFAULT_BASE_URL: &str = "https://kutt.it";
pub const API_PATH: &str = "/api/v2";

static HTTP_SCHEME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^https?://").expect("static regex"));

/// Normalize a user supplied base URL into `scheme://host[:port][/path]`
///
/// Algorithm:
/// 1. Empty or whitespace-only input → default base URL
/// 2. Prepend `https://` when the input has no http(s) scheme
/// 3. Parse, drop query and fragment
/// 4. Drop trailing slashes; a bare "/" path disappears entirely
///
/// Examples:
/// - `example.com/a/?x=1#y` → `https://example.com/a`
/// - `http://Kutt.it/` → `http://kutt.it`
pub fn try_normalize_base_url(value: &str) -> Result<String> {
    let candidate = value.trim();
    if candidate.is_empty() {
        return Ok(DEFAULT_BASE_URL.to_string());
    }

    let candidate = if HTTP_SCHEME.is_match(candidate) {
        candidate.to_string()
    } else {
        format!("https://{}", candidate)
    };

    let url = Url::parse(&candidate).map_err(|_| {
        ShortenError::validation("Enter a valid URL, including the protocol (http or https).")
    })?;

    let path = url.path().trim_end_matches('/');
    Ok(format!("{}{}", url.origin().ascii_serialization(), path))
}

/// Lenient variant used wherever the base URL is only read, never typed in
pub fn normalize_base_url(value: &str) -> String {
    try_normalize_base_url(value).unwrap_or_else(|_| {
        log::error!("Invalid base URL {:?}, falling back to {}", value, DEFAULT_BASE_URL);
        DEFAULT_BASE_URL.to_string()
    })
}

/// `<base>/api/v2`
pub fn api_root(base_url: &str) -> String {
    format!("{}{}", base_url, API_PATH)
}

/// Stats page for a link on the configured instance
pub fn stats_url(base_url: &str, link_id: &str) -> String {
    let encoded: String = url::form_urlencoded::byte_serialize(link_id.as_bytes()).collect();
    format!("{}/stats?id={}", base_url, encoded)
}

/// The API may return short links without a scheme (e.g. "kutt.it/abc")
pub fn link_href(link: &str) -> String {
    if link.starts_with("http") {
        link.to_string()
    } else {
        format!("https://{}", link)
    }
}

/// Only absolute http/https URLs can be shortened
pub fn is_valid_http_url(value: &str) -> bool {
    if value.is_empty() {
        return false;
    }

    Url::parse(value)
        .map(|url| matches!(url.scheme(), "http" | "https"))
        .unwrap_or(false)
}

/// Remove `?query` and `#fragment`; unparseable input is returned untouched
pub fn strip_query_and_fragment(raw: &str) -> String {
    match Url::parse(raw) {
        Ok(mut url) => {
            url.set_query(None);
            url.set_fragment(None);
            url.to_string()
        }
        Err(e) => {
            log::warn!("Could not parse {:?}, keeping it as is: {}", raw, e);
            raw.to_string()
        }
    }
}
