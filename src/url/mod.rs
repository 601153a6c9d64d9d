//! URL handling module for Cursor-Crawl
//!
//! This module provides link normalization, host extraction and the
//! same-site admission rule that bounds a crawl.

mod normalize;

use url::Url;

// Re-export main functions
pub use normalize::{normalize_url, resolve_link};

/// Extracts the lowercase host from a URL
///
/// # Examples
///
/// ```
/// use url::Url;
/// use cursor_crawl::url::extract_domain;
///
/// let url = Url::parse("https://WWW.Example.com:8443/path").unwrap();
/// assert_eq!(extract_domain(&url), Some("www.example.com".to_string()));
/// ```
pub fn extract_domain(url: &Url) -> Option<String> {
    url.host_str().map(|h| h.to_lowercase())
}

/// Returns true if `candidate` stays on the same site as `base_url`
///
/// A candidate without a host (a relative reference such as `/b` or
/// `apply.html`) is always admissible. Otherwise its host must equal the
/// base URL's host, compared case-insensitively. Subdomains count as
/// different sites.
pub fn is_admissible(candidate: &str, base_url: &Url) -> bool {
    let candidate = candidate.trim();

    match Url::parse(candidate) {
        Ok(url) => match url.host_str() {
            None => true,
            Some(host) => base_url
                .host_str()
                .is_some_and(|base| base.eq_ignore_ascii_case(host)),
        },
        Err(url::ParseError::RelativeUrlWithoutBase) => true,
        Err(_) => false,
    }
}
