//! Output handler traits and types
//!
//! This module defines the trait interface for result sinks and the
//! associated error types.

use crate::extract::ExtractedRecord;
use thiserror::Error;

/// Errors that can occur during output operations
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("Failed to write output: {0}")]
    Write(String),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for output operations
pub type OutputResult<T> = Result<T, OutputError>;

/// Destination for extracted records
///
/// Implementations append one record per call and never rewrite earlier
/// rows. A single writer per store is assumed.
pub trait ResultSink {
    /// Appends one record
    fn append(&mut self, record: &ExtractedRecord) -> OutputResult<()>;
}

/// Collects records in memory
#[derive(Debug, Default)]
pub struct MemorySink {
    pub records: Vec<ExtractedRecord>,
}

impl ResultSink for MemorySink {
    fn append(&mut self, record: &ExtractedRecord) -> OutputResult<()> {
        self.records.push(record.clone());
        Ok(())
    }
}
