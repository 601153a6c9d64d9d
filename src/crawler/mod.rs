//! Crawler module for page fetching and processing
//!
//! This module contains the crawl and scrape logic, including:
//! - HTTP fetching
//! - HTML link extraction
//! - Randomized request pacing
//! - Same-site frontier management
//! - Depth-bounded crawling and resumable batch scraping

mod batch;
mod engine;
mod fetcher;
mod frontier;
mod parser;
mod rate_limit;
mod shutdown;

pub use batch::BatchScraper;
pub use engine::{CrawlEngine, CrawlReport};
pub use fetcher::{build_http_client, fetch_url, FetchResult, Fetcher, HttpFetcher};
pub use frontier::{FrontierEntry, LinkFrontier};
pub use parser::{extract_links, extract_links_from_html};
pub use rate_limit::RateLimiter;
pub use shutdown::Shutdown;

pub use crate::output::RunStats;

use crate::config::Config;
use crate::output::{read_links, write_links, CsvResultSink};
use crate::storage::{FrontierStore, ProgressStore, SqliteProgressStore};
use crate::CrawlError;
use std::path::Path;

/// Runs a complete crawl operation
///
/// This is the entry point for crawl mode. It will:
/// 1. Build the HTTP client and open the progress database
/// 2. Walk the seed URL's site up to `max-depth`, resuming a saved crawl
///    unless `fresh` is set
/// 3. Write the collected links to `links-path`
///
/// The links gathered so far are written even when the crawl is interrupted;
/// the next run continues the same crawl and rewrites the full list.
///
/// # Example
///
/// ```no_run
/// use cursor_crawl::config::load_config;
/// use cursor_crawl::crawler::{run_crawl, Shutdown};
/// use std::path::Path;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let config = load_config(Path::new("config.toml"))?;
/// let report = run_crawl(&config, false, Shutdown::new()).await?;
/// println!("{} links collected", report.collected.len());
/// # Ok(())
/// # }
/// ```
pub async fn run_crawl(
    config: &Config,
    fresh: bool,
    shutdown: Shutdown,
) -> Result<CrawlReport, CrawlError> {
    let fetcher = HttpFetcher::from_config(&config.politeness)?;
    let limiter = RateLimiter::from_config(&config.politeness)?;

    let mut store = SqliteProgressStore::open(Path::new(&config.output.progress_path));
    tracing::info!("Crawl progress saved to {}", store.path().display());
    if fresh {
        tracing::info!("Starting fresh crawl (clearing saved frontier)");
        if let Err(e) = store.reset_frontier() {
            tracing::error!("Failed to clear saved crawl: {}", e);
        }
    }

    let mut engine = CrawlEngine::new(fetcher, store, limiter, config.crawler.max_depth)
        .with_shutdown(shutdown);

    let report = engine.crawl(&config.crawler.seed_url).await?;

    let links_path = Path::new(&config.output.links_path);
    write_links(links_path, &report.collected)?;
    tracing::info!(
        "Total links collected: {} (saved to {})",
        report.collected.len(),
        links_path.display()
    );

    Ok(report)
}

/// Runs a resumable batch scrape over the configured link list
///
/// Fails only if the link list cannot be loaded, the delay bounds are
/// unusable, or the HTTP client cannot be built; all happen before any page
/// is touched. With `fresh`, the saved
/// checkpoint is cleared first.
pub async fn run_scrape(
    config: &Config,
    fresh: bool,
    shutdown: Shutdown,
) -> Result<RunStats, CrawlError> {
    let links_path = Path::new(&config.output.links_path);
    let links = read_links(links_path).map_err(|e| CrawlError::InputLoad {
        path: links_path.display().to_string(),
        message: e.to_string(),
    })?;
    tracing::info!("Loaded {} links from {}", links.len(), links_path.display());

    let fetcher = HttpFetcher::from_config(&config.politeness)?;
    let limiter = RateLimiter::from_config(&config.politeness)?;
    let mut progress = SqliteProgressStore::open(Path::new(&config.output.progress_path));
    tracing::info!("Scrape progress saved to {}", progress.path().display());
    if fresh {
        tracing::info!("Starting fresh scrape (clearing saved progress)");
        if let Err(e) = progress.reset() {
            tracing::error!("Failed to clear saved progress: {}", e);
        }
    }
    let sink = CsvResultSink::new(Path::new(&config.output.results_path));
    tracing::info!("Appending results to {}", sink.path().display());

    let mut scraper = BatchScraper::new(fetcher, progress, sink, limiter).with_shutdown(shutdown);

    // A panic inside the run ends it here; every checkpoint saved so far stays valid
    let handle = tokio::spawn(async move { scraper.run(&links).await });
    match handle.await {
        Ok(stats) => {
            stats.log_summary();
            Ok(stats)
        }
        Err(e) => {
            tracing::error!("Scrape run aborted: {}", e);
            Err(CrawlError::Aborted(e.to_string()))
        }
    }
}

/// Reads the saved checkpoint and the link list size
///
/// A link list that cannot be read counts as empty.
pub fn load_status(config: &Config) -> (usize, usize) {
    let mut progress = SqliteProgressStore::open(Path::new(&config.output.progress_path));
    let cursor = progress.load();

    let total = match read_links(Path::new(&config.output.links_path)) {
        Ok(links) => links.len(),
        Err(e) => {
            tracing::warn!("Could not read link list: {}", e);
            0
        }
    };

    (cursor, total)
}
