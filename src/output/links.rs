//! Link list files
//!
//! The crawl writes the links it collected into a one-column CSV file; the
//! batch scraper reads the same format. Any CSV whose first column holds URLs
//! works as input, with or without a `URL` header.

use crate::output::traits::{OutputError, OutputResult};
use std::io::Write;
use std::path::Path;

/// Reads an ordered link list
///
/// Every line of the file is one entry, so indices match line numbers. A
/// line contributes its first CSV cell, trimmed; empty lines and blank cells
/// stay in the list as empty strings. A first line reading `url` (any case)
/// is treated as a header and dropped.
pub fn read_links(path: &Path) -> OutputResult<Vec<String>> {
    let content = std::fs::read_to_string(path)?;

    let mut links = Vec::new();
    for (row, line) in content.lines().enumerate() {
        let cell = first_cell(line)?;

        if row == 0 && cell.eq_ignore_ascii_case("url") {
            continue;
        }
        links.push(cell);
    }

    Ok(links)
}

fn first_cell(line: &str) -> OutputResult<String> {
    if line.trim().is_empty() {
        return Ok(String::new());
    }

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(line.as_bytes());
    let mut record = csv::StringRecord::new();
    reader.read_record(&mut record)?;

    Ok(record.get(0).unwrap_or("").trim().to_string())
}

/// Writes a link list, one URL per row, without a header
///
/// The list is written to a sibling temporary file and renamed into place.
pub fn write_links(path: &Path, links: &[String]) -> OutputResult<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }

    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(Vec::new());
    for link in links {
        writer.write_record([link])?;
    }
    let buffer = writer
        .into_inner()
        .map_err(|e| OutputError::Write(e.to_string()))?;

    let mut tmp_name = path.as_os_str().to_owned();
    tmp_name.push(".tmp");
    let tmp_path = Path::new(&tmp_name);

    let mut file = std::fs::File::create(tmp_path)?;
    file.write_all(&buffer)?;
    file.sync_all()?;
    drop(file);

    std::fs::rename(tmp_path, path)?;
    Ok(())
}
