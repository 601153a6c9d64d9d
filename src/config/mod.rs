//! Configuration module for Cursor-Crawl
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//!
//! # Example
//!
//! ```no_run
//! use cursor_crawl::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("config.toml")).unwrap();
//! println!("Crawler will use max depth: {}", config.crawler.max_depth);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{Config, CrawlerConfig, OutputConfig, PolitenessConfig, DEFAULT_USER_AGENT};

pub use validation::MAX_DELAY_SECS;

// Re-export parser functions
pub use parser::{load_config, parse_config};
