//! Command-line interface definitions for the PMC metadata crawler.
//!
//! This module defines the CLI arguments and options using the `clap` crate.

use clap::Parser;
use std::path::PathBuf;

/// Command-line arguments for the crawler.
///
/// This struct defines all configuration options that can be passed to the
/// application at runtime. Options include the input sheet, output paths,
/// and crawl pacing.
///
/// # Examples
///
/// ```sh
/// # Basic usage with the input sheet
/// pmc_metadata_crawler -i publications.csv
///
/// # Limit the run and slow it down
/// pmc_metadata_crawler -i publications.csv --max-rows 10 --delay-secs 3
///
/// # Watch the browser work
/// pmc_metadata_crawler -i publications.csv --headed
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// CSV file holding the article list (`Title` and `Link` columns)
    #[arg(short, long)]
    pub input: PathBuf,

    /// Output path for the JSON document
    #[arg(long, default_value = "article_metadata.json")]
    pub json_output: PathBuf,

    /// Output path for the CSV table
    #[arg(long, default_value = "article_metadata.csv")]
    pub table_output: PathBuf,

    /// Process only the first N input rows
    #[arg(long)]
    pub max_rows: Option<usize>,

    /// Seconds to pause after each article page
    #[arg(long, default_value_t = 1)]
    pub delay_secs: u64,

    /// Run the browser with a visible window instead of headless
    #[arg(long)]
    pub headed: bool,
}
