//! Output generation modules for the JSON document and the CSV table.
//!
//! This module contains submodules responsible for writing crawl results
//! to the two export formats:
//!
//! - [`json`]: the structured document, a pretty-printed array holding
//!   full records and failure records side by side
//! - [`table`]: the flattened spreadsheet view, one row per record with a
//!   fixed column set

pub mod json;
pub mod table;
