//! Output module for scrape results and link lists
//!
//! This module handles:
//! - Appending extracted records to the results CSV
//! - Reading and writing the ordered link list
//! - Recording per-run statistics

mod csv_sink;
mod links;
pub mod stats;
mod traits;

pub use csv_sink::CsvResultSink;
pub use links::{read_links, write_links};
pub use stats::{print_status, ItemOutcome, RunStats};
pub use traits::{MemorySink, OutputError, OutputResult, ResultSink};
