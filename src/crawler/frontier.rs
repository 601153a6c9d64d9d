//! Crawl frontier with same-site admission and deduplication.

use crate::url::is_admissible;
use std::collections::{HashSet, VecDeque};
use url::Url;

/// A URL waiting to be fetched, with its distance from the seed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrontierEntry {
    pub url: Url,
    pub depth: u32,
}

/// Per-run traversal state: pending work plus every URL ever admitted
///
/// A URL is marked visited when it is admitted, not when it is fetched, so
/// it can sit in the work-list at most once and is fetched at most once per
/// run. Entries are popped first-in first-out, so every URL is first reached
/// along a shortest path and admitted at its minimum depth.
#[derive(Debug)]
pub struct LinkFrontier {
    base: Url,
    max_depth: u32,
    visited: HashSet<String>,
    queue: VecDeque<FrontierEntry>,
}

impl LinkFrontier {
    /// Creates an empty frontier bounded to `base`'s host and `max_depth`
    pub fn new(base: Url, max_depth: u32) -> Self {
        Self {
            base,
            max_depth,
            visited: HashSet::new(),
            queue: VecDeque::new(),
        }
    }

    /// Rebuilds a frontier from saved traversal state
    ///
    /// `visited` holds every URL admitted so far, including the pending ones.
    pub fn restore<I>(base: Url, max_depth: u32, visited: I, pending: Vec<FrontierEntry>) -> Self
    where
        I: IntoIterator<Item = String>,
    {
        let mut visited: HashSet<String> = visited.into_iter().collect();
        visited.extend(pending.iter().map(|entry| entry.url.to_string()));

        Self {
            base,
            max_depth,
            visited,
            queue: pending.into(),
        }
    }

    pub fn max_depth(&self) -> u32 {
        self.max_depth
    }

    /// Same-site check against this frontier's base URL
    pub fn is_admissible(&self, candidate: &str) -> bool {
        is_admissible(candidate, &self.base)
    }

    /// Admits `url` at `depth`, returning true if it was enqueued
    ///
    /// Rejected when it is deeper than `max_depth`, leaves the site, or was
    /// admitted before. The fragment is stripped before comparison.
    pub fn admit(&mut self, url: &Url, depth: u32) -> bool {
        match self.prepare(url, depth) {
            Some(url) => {
                self.queue.push_back(FrontierEntry { url, depth });
                true
            }
            None => false,
        }
    }

    /// Admits the links of one page so they are popped in the given order
    ///
    /// Returns the entries that were enqueued.
    pub fn admit_all<I>(&mut self, urls: I, depth: u32) -> Vec<FrontierEntry>
    where
        I: IntoIterator<Item = Url>,
    {
        let admitted: Vec<FrontierEntry> = urls
            .into_iter()
            .filter_map(|url| self.prepare(&url, depth))
            .map(|url| FrontierEntry { url, depth })
            .collect();

        self.queue.extend(admitted.iter().cloned());
        admitted
    }

    /// Takes the next entry to visit
    pub fn pop(&mut self) -> Option<FrontierEntry> {
        self.queue.pop_front()
    }

    /// Number of entries waiting to be visited
    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    /// Number of URLs admitted so far
    pub fn visited_count(&self) -> usize {
        self.visited.len()
    }

    pub fn is_visited(&self, url: &Url) -> bool {
        let mut key = url.clone();
        key.set_fragment(None);
        self.visited.contains(key.as_str())
    }

    fn prepare(&mut self, url: &Url, depth: u32) -> Option<Url> {
        if depth > self.max_depth {
            return None;
        }

        let mut url = url.clone();
        url.set_fragment(None);

        if !self.is_admissible(url.as_str()) {
            tracing::trace!("Rejecting off-site link {}", url);
            return None;
        }

        if !self.visited.insert(url.to_string()) {
            return None;
        }

        Some(url)
    }
}
