//! Storage module for persisting scrape progress
//!
//! This module handles the checkpoint that lets a batch scrape resume:
//! - SQLite database initialization and schema management
//! - Saving and restoring the progress cursor
//! - Fingerprinting the link list the cursor refers to
//! - Saving and restoring an in-progress crawl frontier

mod schema;
mod sqlite;
mod traits;

pub use sqlite::SqliteProgressStore;
pub use traits::{
    FrontierSnapshot, FrontierStore, MemoryFrontierStore, PageStatus, ProgressStore,
    StorageError, StorageResult,
};

use sha2::{Digest, Sha256};

/// Computes a SHA-256 fingerprint of an ordered link list
///
/// Used to notice that the list changed between a checkpoint and a resume.
pub fn fingerprint_links(links: &[String]) -> String {
    let mut hasher = Sha256::new();
    for link in links {
        hasher.update(link.as_bytes());
        hasher.update(b"\n");
    }
    hex::encode(hasher.finalize())
}
