//! Utility functions and helpers.

pub mod fs;
pub mod text;

use url::Url;

/// Parse `link` as an absolute http(s) URL.
pub fn parse_http_url(link: &str) -> Option<Url> {
    Url::parse(link)
        .ok()
        .filter(|url| matches!(url.scheme(), "http" | "https") && url.has_host())
}

/// Extract the domain from a URL string.
pub fn get_domain(url_str: &str) -> Option<String> {
    Url::parse(url_str)
        .ok()
        .and_then(|u| u.host_str().map(|s| s.to_string()))
}
