//! Storage traits and error types
//!
//! This module defines the trait interface for progress checkpoint backends
//! and associated error types.

use thiserror::Error;

/// Errors that can occur during storage operations
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Corrupt checkpoint value {value:?} under key {key}")]
    Corrupt { key: &'static str, value: String },

    #[error("Progress database is unavailable: {0}")]
    Unavailable(String),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Durable home of the batch progress cursor
///
/// The cursor is the index of the next link that has never been attempted.
/// `load` never fails: missing or unreadable state means "start from 0".
/// `save` replaces the previous value as one unit, so a crash mid-save leaves
/// either the old or the new value readable.
pub trait ProgressStore {
    /// Returns the stored cursor, or 0 when there is none
    fn load(&mut self) -> usize;

    /// Overwrites the stored cursor
    fn save(&mut self, cursor: usize) -> StorageResult<()>;

    /// Removes the stored cursor and fingerprint
    fn reset(&mut self) -> StorageResult<()>;

    /// Returns the fingerprint of the link list the cursor refers to
    fn load_fingerprint(&mut self) -> Option<String>;

    /// Records the fingerprint of the link list being processed
    fn save_fingerprint(&mut self, fingerprint: &str) -> StorageResult<()>;
}

/// State of one URL in a saved crawl
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageStatus {
    /// Admitted, not yet fetched
    Pending,
    /// Fetched successfully
    Collected,
    /// Fetch failed
    Failed,
}

impl PageStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PageStatus::Pending => "pending",
            PageStatus::Collected => "collected",
            PageStatus::Failed => "failed",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "pending" => Some(PageStatus::Pending),
            "collected" => Some(PageStatus::Collected),
            "failed" => Some(PageStatus::Failed),
            _ => None,
        }
    }
}

/// Crawl traversal state restored from a previous run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FrontierSnapshot {
    /// URLs still to visit with their depth, in visit order
    pub pending: Vec<(String, u32)>,

    /// Every URL admitted so far, pending ones included
    pub visited: Vec<String>,

    /// Successfully fetched pages, in visit order
    pub collected: Vec<String>,

    /// Number of pages whose fetch failed
    pub failed: usize,
}

impl FrontierSnapshot {
    /// Builds a snapshot from saved pages listed in admission order
    pub fn from_pages<I>(pages: I) -> Self
    where
        I: IntoIterator<Item = (String, u32, PageStatus)>,
    {
        let mut snapshot = Self::default();
        for (url, depth, status) in pages {
            match status {
                PageStatus::Pending => snapshot.pending.push((url.clone(), depth)),
                PageStatus::Collected => snapshot.collected.push(url.clone()),
                PageStatus::Failed => snapshot.failed += 1,
            }
            snapshot.visited.push(url);
        }
        snapshot
    }
}

/// Durable home of an in-progress crawl frontier
///
/// A saved crawl belongs to one seed URL and depth bound. Each visit is
/// recorded together with the links it admitted, so a restart resumes with
/// exactly the pages that were never fetched.
pub trait FrontierStore {
    /// Returns the saved crawl for `seed` and `max_depth`, if there is one
    fn load_frontier(&mut self, seed: &str, max_depth: u32) -> Option<FrontierSnapshot>;

    /// Discards any saved crawl and starts a new one with `admitted` pending
    fn begin_frontier(
        &mut self,
        seed: &str,
        max_depth: u32,
        admitted: &[(String, u32)],
    ) -> StorageResult<()>;

    /// Marks `url` as visited and adds the links it admitted as pending
    fn record_visit(
        &mut self,
        url: &str,
        status: PageStatus,
        admitted: &[(String, u32)],
    ) -> StorageResult<()>;

    /// Removes the saved crawl
    fn reset_frontier(&mut self) -> StorageResult<()>;
}

/// Frontier store that keeps the crawl in memory
#[derive(Debug, Default)]
pub struct MemoryFrontierStore {
    key: Option<(String, u32)>,
    pages: Vec<(String, u32, PageStatus)>,
}

impl MemoryFrontierStore {
    fn add_pending(&mut self, admitted: &[(String, u32)]) {
        for (url, depth) in admitted {
            if !self.pages.iter().any(|(known, _, _)| known == url) {
                self.pages.push((url.clone(), *depth, PageStatus::Pending));
            }
        }
    }
}

impl FrontierStore for MemoryFrontierStore {
    fn load_frontier(&mut self, seed: &str, max_depth: u32) -> Option<FrontierSnapshot> {
        match &self.key {
            Some((saved_seed, saved_depth)) if saved_seed == seed && *saved_depth == max_depth => {
                Some(FrontierSnapshot::from_pages(self.pages.iter().cloned()))
            }
            _ => None,
        }
    }

    fn begin_frontier(
        &mut self,
        seed: &str,
        max_depth: u32,
        admitted: &[(String, u32)],
    ) -> StorageResult<()> {
        self.key = Some((seed.to_string(), max_depth));
        self.pages.clear();
        self.add_pending(admitted);
        Ok(())
    }

    fn record_visit(
        &mut self,
        url: &str,
        status: PageStatus,
        admitted: &[(String, u32)],
    ) -> StorageResult<()> {
        if let Some(page) = self.pages.iter_mut().find(|(known, _, _)| known == url) {
            page.2 = status;
        }
        self.add_pending(admitted);
        Ok(())
    }

    fn reset_frontier(&mut self) -> StorageResult<()> {
        self.key = None;
        self.pages.clear();
        Ok(())
    }
}
