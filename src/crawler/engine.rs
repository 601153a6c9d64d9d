//! Same-site crawl engine
//!
//! Walks a site breadth-first from a seed URL using an explicit work-list,
//! pausing before every request, and returns the pages it could fetch.
//! Every visit is recorded in a frontier store, so an interrupted crawl
//! resumes with the pages it never fetched.

use crate::crawler::fetcher::{FetchResult, Fetcher};
use crate::crawler::frontier::{FrontierEntry, LinkFrontier};
use crate::crawler::parser::extract_links_from_html;
use crate::crawler::rate_limit::RateLimiter;
use crate::crawler::shutdown::Shutdown;
use crate::storage::{FrontierSnapshot, FrontierStore, PageStatus};
use crate::url::normalize_url;
use crate::CrawlError;
use url::Url;

/// Outcome of one crawl run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CrawlReport {
    /// Successfully fetched pages, in visit order
    pub collected: Vec<String>,

    /// Pages whose fetch failed
    pub failed: usize,

    /// URLs admitted to the frontier, fetched or not
    pub visited: usize,

    /// True if the crawl stopped before the frontier drained
    pub interrupted: bool,
}

/// Depth-bounded crawler over a single host
pub struct CrawlEngine<F: Fetcher, S: FrontierStore> {
    fetcher: F,
    store: S,
    limiter: RateLimiter,
    max_depth: u32,
    shutdown: Shutdown,
}

impl<F: Fetcher, S: FrontierStore> CrawlEngine<F, S> {
    pub fn new(fetcher: F, store: S, limiter: RateLimiter, max_depth: u32) -> Self {
        Self {
            fetcher,
            store,
            limiter,
            max_depth,
            shutdown: Shutdown::new(),
        }
    }

    /// Uses `shutdown` as the interruption signal
    pub fn with_shutdown(mut self, shutdown: Shutdown) -> Self {
        self.shutdown = shutdown;
        self
    }

    /// Consumes the engine, returning its fetcher and store
    pub fn into_parts(self) -> (F, S) {
        (self.fetcher, self.store)
    }

    /// Crawls every same-site page reachable from `seed` within `max_depth`
    ///
    /// A saved crawl for the same seed and depth bound is resumed; pages it
    /// already visited are neither fetched again nor lost from the report.
    /// Only an invalid seed URL is an error. Failed pages are counted and
    /// contribute no links.
    pub async fn crawl(&mut self, seed: &str) -> Result<CrawlReport, CrawlError> {
        let seed = normalize_url(seed)?;
        let (mut frontier, mut report) = self.resume_or_start(&seed);

        while let Some(entry) = frontier.pop() {
            if self.shutdown.is_triggered() {
                report.interrupted = true;
                break;
            }

            self.limiter.delay().await;
            if self.shutdown.is_triggered() {
                report.interrupted = true;
                break;
            }

            self.visit(entry, &mut frontier, &mut report).await;
        }

        report.visited = frontier.visited_count();

        tracing::info!(
            "Crawl finished: {} pages collected, {} failed, {} links admitted{}",
            report.collected.len(),
            report.failed,
            report.visited,
            if report.interrupted { " (interrupted)" } else { "" }
        );

        Ok(report)
    }

    fn resume_or_start(&mut self, seed: &Url) -> (LinkFrontier, CrawlReport) {
        if let Some(snapshot) = self.store.load_frontier(seed.as_str(), self.max_depth) {
            let FrontierSnapshot {
                pending,
                visited,
                collected,
                failed,
            } = snapshot;
            tracing::info!(
                "Resuming crawl: {} pages collected, {} failed, {} pending",
                collected.len(),
                failed,
                pending.len()
            );

            let pending = pending
                .into_iter()
                .filter_map(|(url, depth)| {
                    Url::parse(&url).ok().map(|url| FrontierEntry { url, depth })
                })
                .collect();
            let frontier = LinkFrontier::restore(seed.clone(), self.max_depth, visited, pending);
            let report = CrawlReport {
                collected,
                failed,
                ..CrawlReport::default()
            };
            return (frontier, report);
        }

        let mut frontier = LinkFrontier::new(seed.clone(), self.max_depth);
        frontier.admit(seed, 0);
        if let Err(e) =
            self.store
                .begin_frontier(seed.as_str(), self.max_depth, &[(seed.to_string(), 0)])
        {
            tracing::error!("Failed to save crawl start: {}", e);
        }

        (frontier, CrawlReport::default())
    }

    async fn visit(
        &mut self,
        entry: FrontierEntry,
        frontier: &mut LinkFrontier,
        report: &mut CrawlReport,
    ) {
        let FrontierEntry { url, depth } = entry;
        tracing::info!("Crawling: {} (depth {})", url, depth);

        let mut admitted = Vec::new();
        let status = match self.fetcher.fetch(url.as_str()).await {
            FetchResult::Success {
                final_url, body, ..
            } => {
                report.collected.push(url.to_string());

                if depth < frontier.max_depth() {
                    let page_url = Url::parse(&final_url).unwrap_or_else(|_| url.clone());
                    let links = extract_links_from_html(&body, &page_url);
                    let found = links.len();
                    admitted = frontier.admit_all(links, depth + 1);
                    tracing::debug!(
                        "{}: {} links found, {} admitted, {} pending",
                        url,
                        found,
                        admitted.len(),
                        frontier.pending()
                    );
                }
                PageStatus::Collected
            }
            FetchResult::HttpError { status_code } => {
                tracing::warn!("Failed: {} (status {})", url, status_code);
                report.failed += 1;
                PageStatus::Failed
            }
            FetchResult::NetworkError { error } => {
                tracing::warn!("Error on {}: {}", url, error);
                report.failed += 1;
                PageStatus::Failed
            }
        };

        let admitted: Vec<(String, u32)> = admitted
            .into_iter()
            .map(|entry| (entry.url.to_string(), entry.depth))
            .collect();
        if let Err(e) = self.store.record_visit(url.as_str(), status, &admitted) {
            tracing::error!("Failed to save crawl progress for {}: {}", url, e);
        }
    }
}
