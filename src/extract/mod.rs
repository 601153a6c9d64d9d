//! Content extraction for scraped pages
//!
//! Turns a parsed HTML document into the text fields written to the results
//! file. Nothing here fails: every field ends up with a value, falling back
//! to a sentinel when the page has no matching structure.

pub mod strategies;

use scraper::{ElementRef, Html, Selector};
use serde::Serialize;

pub use strategies::{TopicStrategy, DEFAULT_STRATEGIES, TOPIC_KEYWORD};

/// Title value for pages without a usable `<title>`
pub const NO_TITLE: &str = "No title found";

/// Topic value when no strategy found a program section
pub const NO_TOPIC: &str = "No program info found";

/// Text fields extracted from a single page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageContent {
    pub title: String,
    pub headings: String,
    pub body: String,
    pub topic: String,
}

/// One row of the results file
///
/// Field order matches the column order of the results file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExtractedRecord {
    #[serde(rename = "URL")]
    pub url: String,
    #[serde(rename = "Domain")]
    pub domain: String,
    #[serde(rename = "Title")]
    pub title: String,
    #[serde(rename = "Headings")]
    pub headings: String,
    #[serde(rename = "Content")]
    pub body: String,
    #[serde(rename = "Program Info")]
    pub topic: String,
}

impl ExtractedRecord {
    /// Column names in write order
    pub const HEADERS: [&'static str; 6] =
        ["URL", "Domain", "Title", "Headings", "Content", "Program Info"];

    pub fn new(url: impl Into<String>, domain: impl Into<String>, content: PageContent) -> Self {
        Self {
            url: url.into(),
            domain: domain.into(),
            title: content.title,
            headings: content.headings,
            body: content.body,
            topic: content.topic,
        }
    }
}

/// Extracts page content using an ordered chain of topic strategies
#[derive(Debug, Clone)]
pub struct ContentExtractor {
    strategies: Vec<TopicStrategy>,
}

impl Default for ContentExtractor {
    fn default() -> Self {
        Self::new(DEFAULT_STRATEGIES.to_vec())
    }
}

impl ContentExtractor {
    pub fn new(strategies: Vec<TopicStrategy>) -> Self {
        Self { strategies }
    }

    /// Extracts all text fields from a parsed document
    pub fn extract(&self, document: &Html) -> PageContent {
        PageContent {
            title: extract_title(document),
            headings: join_texts(select_all(document, "h1, h2, h3")),
            body: join_texts(select_all(document, "p")),
            topic: self.extract_topic(document),
        }
    }

    /// Runs the strategies in order; the first non-empty result wins
    pub fn extract_topic(&self, document: &Html) -> String {
        for strategy in &self.strategies {
            if let Some(text) = (strategy.run)(document).filter(|t| !t.is_empty()) {
                tracing::debug!("Topic section found by {} strategy", strategy.name);
                return text;
            }
        }
        tracing::debug!("No topic strategy matched");
        NO_TOPIC.to_string()
    }
}

/// Parses raw HTML and extracts its content with the default strategies
///
/// # Example
///
/// ```
/// use cursor_crawl::extract_page;
///
/// let html = r#"<html><head><title> MSBA </title></head>
///   <body><h1>Business Analytics</h1><p>STEM designated.</p></body></html>"#;
/// let content = extract_page(html);
/// assert_eq!(content.title, "MSBA");
/// assert_eq!(content.headings, "Business Analytics");
/// assert_eq!(content.topic, "No program info found");
/// ```
pub fn extract_page(html: &str) -> PageContent {
    let document = Html::parse_document(html);
    ContentExtractor::default().extract(&document)
}

fn extract_title(document: &Html) -> String {
    select_all(document, "title")
        .first()
        .map(element_text)
        .filter(|title| !title.is_empty())
        .unwrap_or_else(|| NO_TITLE.to_string())
}

/// Selects every element matching a CSS selector, in document order
pub(crate) fn select_all<'a>(document: &'a Html, css: &str) -> Vec<ElementRef<'a>> {
    match Selector::parse(css) {
        Ok(selector) => document.select(&selector).collect(),
        Err(e) => {
            tracing::warn!("Invalid selector {:?}: {:?}", css, e);
            Vec::new()
        }
    }
}

/// Whitespace-normalized text content of an element and its descendants
pub(crate) fn element_text(element: &ElementRef) -> String {
    element
        .text()
        .flat_map(str::split_whitespace)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Space-joined text of several elements, skipping those without text
pub(crate) fn join_texts<'a, I>(elements: I) -> String
where
    I: IntoIterator<Item = ElementRef<'a>>,
{
    elements
        .into_iter()
        .map(|el| element_text(&el))
        .filter(|text| !text.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}
