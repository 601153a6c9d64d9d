//! Cursor-Crawl: a resumable same-site crawler and page scraper
//!
//! This crate discovers links on a single site, then scrapes a fixed list of
//! pages into a CSV file, checkpointing its position after every page so an
//! interrupted run resumes exactly where it stopped.

pub mod config;
pub mod crawler;
pub mod extract;
pub mod output;
pub mod storage;
pub mod url;

use thiserror::Error;

/// Main error type for Cursor-Crawl operations
#[derive(Debug, Error)]
pub enum CrawlError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("Storage error: {0}")]
    Storage(#[from] storage::StorageError),

    #[error("Output error: {0}")]
    Output(#[from] output::OutputError),

    #[error("URL error: {0}")]
    Url(#[from] UrlError),

    #[error("Failed to load link list from {path}: {message}")]
    InputLoad { path: String, message: String },

    #[error("Run aborted: {0}")]
    Aborted(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// URL-specific errors
#[derive(Debug, Error)]
pub enum UrlError {
    #[error("Failed to parse URL: {0}")]
    Parse(String),

    #[error("Invalid URL scheme: {0}")]
    InvalidScheme(String),

    #[error("Missing host in URL")]
    MissingHost,
}

/// Result type alias for Cursor-Crawl operations
pub type Result<T> = std::result::Result<T, CrawlError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result type alias for URL operations
pub type UrlResult<T> = std::result::Result<T, UrlError>;

// Re-export commonly used types
pub use config::Config;
pub use crawler::{BatchScraper, CrawlEngine, CrawlReport, RunStats};
pub use extract::{extract_page, ExtractedRecord};
pub use crate::url::{extract_domain, is_admissible, normalize_url};
