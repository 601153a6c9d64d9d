use crate::UrlError;
use url::Url;

/// Normalizes a URL into its link identity
///
/// # Normalization Steps
///
/// 1. Trim surrounding whitespace and parse; reject if malformed
/// 2. Reject schemes other than HTTP and HTTPS
/// 3. Reject URLs without a host
/// 4. Remove fragment (everything after #)
///
/// Host case folding and default-port removal come from the `url` crate's
/// own serialization. Paths and query strings are kept as written, so two
/// links that differ only there are distinct pages.
///
/// # Examples
///
/// ```
/// use cursor_crawl::url::normalize_url;
///
/// let url = normalize_url("https://EXAMPLE.com/programs#apply").unwrap();
/// assert_eq!(url.as_str(), "https://example.com/programs");
/// ```
pub fn normalize_url(url_str: &str) -> Result<Url, UrlError> {
    let mut url = Url::parse(url_str.trim()).map_err(|e| UrlError::Parse(e.to_string()))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(UrlError::InvalidScheme(url.scheme().to_string()));
    }

    if url.host_str().is_none() {
        return Err(UrlError::MissingHost);
    }

    url.set_fragment(None);

    Ok(url)
}

/// Resolves an href against the page it appeared on and normalizes it
///
/// Returns None for hrefs that can never be crawled: `javascript:`,
/// `mailto:`, `tel:` and `data:` links, fragment-only anchors, and anything
/// that does not resolve to an HTTP(S) URL.
pub fn resolve_link(href: &str, base_url: &Url) -> Option<Url> {
    let href = href.trim();

    if href.is_empty() || href.starts_with('#') {
        return None;
    }

    let lowered = href.to_ascii_lowercase();
    if lowered.starts_with("javascript:")
        || lowered.starts_with("mailto:")
        || lowered.starts_with("tel:")
        || lowered.starts_with("data:")
    {
        return None;
    }

    let joined = base_url.join(href).ok()?;
    normalize_url(joined.as_str()).ok()
}
