use serde::Deserialize;

/// Browser-like identity sent with every request unless overridden
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
     AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0.0.0 Safari/537.36";

/// Main configuration structure for Cursor-Crawl
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub crawler: CrawlerConfig,
    pub politeness: PolitenessConfig,
    pub output: OutputConfig,
}

/// Crawl mode configuration
#[derive(Debug, Clone, Deserialize)]
pub struct CrawlerConfig {
    /// URL the crawl starts from; its host bounds the traversal
    #[serde(rename = "seed-url")]
    pub seed_url: String,

    /// Maximum link depth from the seed URL
    #[serde(rename = "max-depth")]
    pub max_depth: u32,
}

/// Request pacing and client identity
#[derive(Debug, Clone, Deserialize)]
pub struct PolitenessConfig {
    /// Lower bound of the randomized delay before each request (seconds)
    #[serde(rename = "min-delay")]
    pub min_delay: f64,

    /// Upper bound of the randomized delay before each request (seconds)
    #[serde(rename = "max-delay")]
    pub max_delay: f64,

    /// Whole-request timeout (seconds)
    #[serde(rename = "request-timeout")]
    pub request_timeout: u64,

    /// User-Agent header value
    #[serde(rename = "user-agent", default = "default_user_agent")]
    pub user_agent: String,
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    /// CSV file the crawl writes and the scraper reads
    #[serde(rename = "links-path")]
    pub links_path: String,

    /// SQLite database holding the scrape checkpoint
    #[serde(rename = "progress-path")]
    pub progress_path: String,

    /// CSV file receiving one row per scraped page
    #[serde(rename = "results-path")]
    pub results_path: String,
}

fn default_user_agent() -> String {
    DEFAULT_USER_AGENT.to_string()
}
