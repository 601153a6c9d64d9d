//! CSV result sink
//!
//! Appends one row per scraped page. The header row is written only when the
//! file is new or empty, so resumed runs keep extending the same table.

use crate::extract::ExtractedRecord;
use crate::output::traits::{OutputError, OutputResult, ResultSink};
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Result sink writing to an append-only CSV file
#[derive(Debug, Clone)]
pub struct CsvResultSink {
    path: PathBuf,
}

impl CsvResultSink {
    /// Creates a sink for `path`; the file is created on first append
    pub fn new(path: &Path) -> Self {
        Self {
            path: path.to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn open_file(&self) -> OutputResult<File> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        Ok(file)
    }
}

/// Serializes a record (and optionally the header) into one buffer
fn encode_rows(record: &ExtractedRecord, with_header: bool) -> OutputResult<Vec<u8>> {
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(Vec::new());

    if with_header {
        writer.write_record(ExtractedRecord::HEADERS)?;
    }
    writer.serialize(record)?;

    writer
        .into_inner()
        .map_err(|e| OutputError::Write(e.to_string()))
}

impl ResultSink for CsvResultSink {
    fn append(&mut self, record: &ExtractedRecord) -> OutputResult<()> {
        let mut file = self.open_file()?;
        let needs_header = file.metadata()?.len() == 0;

        // Header and row go out in a single write
        let buffer = encode_rows(record, needs_header)?;
        file.write_all(&buffer)?;
        file.flush()?;
        file.sync_data()?;

        Ok(())
    }
}
