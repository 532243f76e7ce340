//! CSV table export.
//!
//! Writes the flattened rows with one header line derived from the
//! [`FlatRow`] column names. Every export carries the same 21 columns in
//! the same order, `Error` last, regardless of which rows failed.

use crate::models::FlatRow;
use std::error::Error;
use std::path::Path;
use tracing::{error, info, instrument};

/// Write the flat rows to `path` as CSV.
///
/// The header line comes from the [`FlatRow`] column names, emitted ahead
/// of the first row. Parent directories are created as needed.
///
/// # Arguments
///
/// * `rows` - The flattened crawl results, in input order
/// * `path` - Destination file; overwritten if it exists
///
/// # Returns
///
/// `Ok(())` on success, or an error if directory creation or CSV writing
/// fails.
#[instrument(level = "info", skip_all, fields(path = %path.display()))]
pub fn write_flat_rows(rows: &[FlatRow], path: &Path) -> Result<(), Box<dyn Error>> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            if let Err(e) = std::fs::create_dir_all(parent) {
                error!(dir = %parent.display(), error = %e, "Failed to create table output dir");
                return Err(e.into());
            }
        }
    }

    let mut writer = csv::Writer::from_path(path)?;
    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush()?;
    info!(count = rows.len(), "Wrote CSV table");

    Ok(())
}
