//! JSON document export.
//!
//! Serializes the whole crawl result list to a single pretty-printed
//! file. Full records and failure records sit side by side in input
//! order, so the document mirrors the input sheet row for row and a
//! rerun over the same input produces the same bytes.

use crate::models::ArticleRecord;
use std::error::Error;
use std::path::Path;
use tokio::fs;
use tracing::{error, info, instrument};

/// Write the crawl records to `path` as a pretty-printed JSON array.
///
/// Parent directories are created as needed.
///
/// # Arguments
///
/// * `records` - The crawl results to serialize, in input order
/// * `path` - Destination file; overwritten if it exists
///
/// # Returns
///
/// `Ok(())` on success, or an error if serialization, directory creation,
/// or file writing fails.
#[instrument(level = "info", skip_all, fields(path = %path.display()))]
pub async fn write_records(records: &[ArticleRecord], path: &Path) -> Result<(), Box<dyn Error>> {
    let json = serde_json::to_string_pretty(records)?;

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            if let Err(e) = fs::create_dir_all(parent).await {
                error!(dir = %parent.display(), error = %e, "Failed to create JSON output dir");
                return Err(e.into());
            }
        }
    }

    fs::write(path, json).await?;
    info!(count = records.len(), "Wrote JSON document");

    Ok(())
}
