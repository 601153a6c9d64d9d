//! Per-run statistics for batch scrapes
//!
//! This module tallies item outcomes during a run and formats the summary
//! shown when the run ends or when `status` is requested.

/// Classification of one processed link
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ItemOutcome {
    /// Fetched, extracted and handed to the result sink
    Scraped,
    /// Fetch failed (transport error or non-2xx status)
    Failed,
    /// Blank entry, not fetched
    Skipped,
}

/// Counters for a single batch run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunStats {
    /// Number of links in the input list
    pub total: usize,

    /// Cursor the run started from
    pub start_index: usize,

    /// Cursor after the last processed item
    pub next_index: usize,

    pub scraped: usize,
    pub failed: usize,
    pub skipped: usize,

    /// Scraped pages whose row could not be written
    pub sink_errors: usize,

    /// True if the run stopped early because of an interruption
    pub interrupted: bool,
}

impl RunStats {
    pub fn new(total: usize, start_index: usize) -> Self {
        Self {
            total,
            start_index,
            next_index: start_index,
            ..Self::default()
        }
    }

    /// Records the outcome of the item at `index`
    pub fn record(&mut self, index: usize, outcome: ItemOutcome) {
        match outcome {
            ItemOutcome::Scraped => self.scraped += 1,
            ItemOutcome::Failed => self.failed += 1,
            ItemOutcome::Skipped => self.skipped += 1,
        }
        self.next_index = index + 1;
    }

    /// Items attempted during this run
    pub fn processed(&self) -> usize {
        self.scraped + self.failed + self.skipped
    }

    /// Items still left after this run
    pub fn remaining(&self) -> usize {
        self.total.saturating_sub(self.next_index)
    }

    pub fn is_complete(&self) -> bool {
        self.remaining() == 0
    }

    /// Logs a one-line summary of the run
    pub fn log_summary(&self) {
        tracing::info!(
            "Processed {} links ({} scraped, {} failed, {} skipped, {} write errors); next index {} of {}{}",
            self.processed(),
            self.scraped,
            self.failed,
            self.skipped,
            self.sink_errors,
            self.next_index,
            self.total,
            if self.interrupted { " (interrupted)" } else { "" }
        );
    }
}

/// Prints the saved checkpoint against the link list to stdout
pub fn print_status(cursor: usize, total: usize) {
    println!("=== Scrape Progress ===\n");
    let done = cursor.min(total);
    let percentage = if total > 0 {
        (done as f64 / total as f64) * 100.0
    } else {
        0.0
    };
    println!("  Links in list: {}", total);
    println!("  Next index: {}", cursor);
    println!("  Attempted: {} ({:.1}%)", done, percentage);
    println!("  Remaining: {}", total.saturating_sub(cursor));
}
