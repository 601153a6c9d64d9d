//! Resumable batch scraper
//!
//! This module walks a fixed, ordered link list starting at the saved
//! checkpoint. For every index it:
//! - skips blank entries without fetching
//! - waits for the rate limiter, then fetches the page
//! - extracts the page content and appends one row to the result sink
//! - saves `index + 1` as the new checkpoint, whatever the outcome
//!
//! A restart therefore resumes at the first link that was never attempted.

use crate::crawler::fetcher::{FetchResult, Fetcher};
use crate::crawler::rate_limit::RateLimiter;
use crate::crawler::shutdown::Shutdown;
use crate::extract::{ContentExtractor, ExtractedRecord};
use crate::output::{ItemOutcome, ResultSink, RunStats};
use crate::storage::{fingerprint_links, ProgressStore};
use crate::url::extract_domain;
use scraper::Html;
use url::Url;

/// Scrapes a link list into a result sink with a persisted cursor
pub struct BatchScraper<F, P, S>
where
    F: Fetcher,
    P: ProgressStore,
    S: ResultSink,
{
    fetcher: F,
    progress: P,
    sink: S,
    limiter: RateLimiter,
    extractor: ContentExtractor,
    shutdown: Shutdown,
}

impl<F, P, S> BatchScraper<F, P, S>
where
    F: Fetcher,
    P: ProgressStore,
    S: ResultSink,
{
    pub fn new(fetcher: F, progress: P, sink: S, limiter: RateLimiter) -> Self {
        Self {
            fetcher,
            progress,
            sink,
            limiter,
            extractor: ContentExtractor::default(),
            shutdown: Shutdown::new(),
        }
    }

    /// Uses `shutdown` as the interruption signal
    pub fn with_shutdown(mut self, shutdown: Shutdown) -> Self {
        self.shutdown = shutdown;
        self
    }

    pub fn fetcher(&self) -> &F {
        &self.fetcher
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn progress_mut(&mut self) -> &mut P {
        &mut self.progress
    }

    /// Consumes the scraper, returning its collaborators
    pub fn into_parts(self) -> (F, P, S) {
        (self.fetcher, self.progress, self.sink)
    }

    /// Processes `links` from the saved checkpoint to the end
    ///
    /// Never fails: per-item problems are logged and counted, and an
    /// interruption ends the run early with `interrupted` set.
    pub async fn run(&mut self, links: &[String]) -> RunStats {
        let total = links.len();
        let start = self.resume_point(links);
        let mut stats = RunStats::new(total, start);

        if start >= total {
            tracing::info!("All {} links already processed", total);
            return stats;
        }
        tracing::info!("Starting from index {} of {}", start, total);

        for (index, link) in links.iter().enumerate().skip(start) {
            if self.shutdown.is_triggered() {
                stats.interrupted = true;
                break;
            }

            let link = link.trim();
            let outcome = if link.is_empty() {
                tracing::info!("[{}/{}] Skipping blank link", index + 1, total);
                ItemOutcome::Skipped
            } else {
                self.limiter.delay().await;
                if self.shutdown.is_triggered() {
                    stats.interrupted = true;
                    break;
                }
                tracing::info!("[{}/{}] Scraping {}", index + 1, total, link);
                self.scrape_one(link, &mut stats).await
            };

            stats.record(index, outcome);
            self.checkpoint(index + 1);
        }

        if stats.interrupted {
            tracing::info!("Interrupted; progress saved at index {}", stats.next_index);
        }

        stats
    }

    /// Loads the checkpoint and checks it still belongs to `links`
    fn resume_point(&mut self, links: &[String]) -> usize {
        let saved = self.progress.load();
        let fingerprint = fingerprint_links(links);

        if let Some(previous) = self.progress.load_fingerprint() {
            if previous != fingerprint && saved > 0 {
                tracing::warn!(
                    "Link list changed since the last checkpoint; resuming at index {} anyway",
                    saved
                );
            }
        }
        if let Err(e) = self.progress.save_fingerprint(&fingerprint) {
            tracing::error!("Failed to record link list fingerprint: {}", e);
        }

        if saved > links.len() {
            tracing::warn!(
                "Saved index {} is past the end of a {}-link list",
                saved,
                links.len()
            );
        }
        saved.min(links.len())
    }

    async fn scrape_one(&mut self, link: &str, stats: &mut RunStats) -> ItemOutcome {
        match self.fetcher.fetch(link).await {
            FetchResult::Success { body, .. } => {
                let record = self.build_record(link, &body);
                if let Err(e) = self.sink.append(&record) {
                    tracing::error!("Failed to write result for {}: {}", link, e);
                    stats.sink_errors += 1;
                }
                ItemOutcome::Scraped
            }
            FetchResult::HttpError { status_code } => {
                tracing::warn!("Failed to fetch {}: HTTP {}", link, status_code);
                ItemOutcome::Failed
            }
            FetchResult::NetworkError { error } => {
                tracing::warn!("Failed to fetch {}: {}", link, error);
                ItemOutcome::Failed
            }
        }
    }

    fn build_record(&self, link: &str, body: &str) -> ExtractedRecord {
        let domain = Url::parse(link)
            .ok()
            .and_then(|url| extract_domain(&url))
            .unwrap_or_default();
        let document = Html::parse_document(body);
        ExtractedRecord::new(link, domain, self.extractor.extract(&document))
    }

    fn checkpoint(&mut self, next_index: usize) {
        if let Err(e) = self.progress.save(next_index) {
            tracing::error!("Failed to save progress at index {}: {}", next_index, e);
        }
    }
}
