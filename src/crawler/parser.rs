//! HTML link extraction
//!
//! This module pulls the crawlable hyperlinks out of a fetched page:
//! - `<a href="...">` targets resolved against the page URL
//! - fragments stripped so anchors on one page collapse to one link
//! - non-HTTP schemes and fragment-only anchors dropped

use crate::url::resolve_link;
use scraper::{Html, Selector};
use url::Url;

/// Extracts every followable link from a parsed document, in document order
///
/// Duplicates are kept; deduplication belongs to the frontier.
pub fn extract_links(document: &Html, base_url: &Url) -> Vec<Url> {
    let mut links = Vec::new();

    if let Ok(a_selector) = Selector::parse("a[href]") {
        for element in document.select(&a_selector) {
            if let Some(href) = element.value().attr("href") {
                if let Some(absolute_url) = resolve_link(href, base_url) {
                    links.push(absolute_url);
                }
            }
        }
    }

    links
}

/// Parses raw HTML and extracts its links
///
/// # Example
///
/// ```
/// use cursor_crawl::crawler::extract_links_from_html;
/// use url::Url;
///
/// let html = r#"<html><body><a href="/page#top">Link</a></body></html>"#;
/// let base_url = Url::parse("https://example.com/").unwrap();
/// let links = extract_links_from_html(html, &base_url);
/// assert_eq!(links[0].as_str(), "https://example.com/page");
/// ```
pub fn extract_links_from_html(html: &str, base_url: &Url) -> Vec<Url> {
    let document = Html::parse_document(html);
    extract_links(&document, base_url)
}
