//! CSV input source.
//!
//! The input is an ordered list of articles to crawl, one per row, with
//! `Title` and `Link` headers. The whole file is read up front; a missing
//! file or a malformed row is fatal, since there is nothing sensible to
//! crawl without a complete input list.

use csv::ReaderBuilder;
use serde::Deserialize;
use std::error::Error;
use std::path::Path;
use tracing::info;

/// One input row: the article title and the page to crawl.
#[derive(Debug, Clone, Deserialize)]
pub struct InputRow {
    /// The article title as listed in the input.
    #[serde(rename = "Title")]
    pub title: String,
    /// The article page URL.
    #[serde(rename = "Link")]
    pub link: String,
}

/// Read every row of the input CSV, in file order.
///
/// # Errors
///
/// Any I/O or parse failure is returned as-is; the caller treats it as a
/// startup failure for the whole run.
pub fn load_input_rows(path: &Path) -> Result<Vec<InputRow>, Box<dyn Error>> {
    let mut reader = ReaderBuilder::new().from_path(path)?;
    let mut rows = Vec::new();
    for record in reader.deserialize() {
        let row: InputRow = record?;
        rows.push(row);
    }
    info!(count = rows.len(), path = %path.display(), "Loaded input rows");
    Ok(rows)
}
