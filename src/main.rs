//! # PMC Metadata Crawler
//!
//! A browser-driven crawler that walks a list of PubMed Central article
//! pages, extracts the bibliographic metadata from each, enriches records
//! that carry a PMID with details from PubMed, and exports the results as
//! a JSON document and a CSV table.
//!
//! ## Features
//!
//! - Reads the article list (`Title`, `Link`) from a CSV sheet
//! - Extracts identifiers, the citation line, DOI, publisher, authors,
//!   editors, and section labels from each PMC article page
//! - Parses the citation line into date and volume/issue/page fields
//! - Fetches citation count, MeSH terms, abstract, and figure count from
//!   PubMed for records with a PMID
//! - Outputs one JSON document and one CSV table covering every input row
//!
//! ## Usage
//!
//! ```sh
//! pmc_metadata_crawler -i publications.csv
//! ```
//!
//! ## Architecture
//!
//! The application follows a pipeline architecture:
//! 1. **Input**: Load the article list from the input sheet
//! 2. **Crawling**: Visit each article page in a single browser session
//! 3. **Extraction**: Pull metadata off the page, then enrich via PubMed
//! 4. **Output**: Write the JSON document and the CSV table

use clap::Parser;
use std::error::Error;
use std::time::Duration;
use tracing::{debug, error, info, instrument};
use tracing_subscriber::{fmt as tfmt, EnvFilter};

mod cli;
mod crawl;
mod extract;
mod fetch;
mod inputs;
mod models;
mod outputs;

use cli::Cli;
use crawl::{CrawlOptions, crawl_articles};
use fetch::chrome::ChromeSession;
use inputs::load_input_rows;
use outputs::{json, table};

#[tokio::main]
#[instrument]
async fn main() -> Result<(), Box<dyn Error>> {
    // --- Tracing init ---
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();

    let start_time = std::time::Instant::now();
    info!("pmc_metadata_crawler starting up");

    // Parse CLI
    let args = Cli::parse();
    debug!(?args.input, ?args.json_output, ?args.table_output, "Parsed CLI arguments");

    // ---- Load the article list ----
    let rows = match load_input_rows(&args.input) {
        Ok(rows) => rows,
        Err(e) => {
            error!(path = %args.input.display(), error = %e, "Failed to read the input sheet");
            return Err(e);
        }
    };

    // ---- Launch the browser ----
    let session = match ChromeSession::launch(args.headed).await {
        Ok(session) => session,
        Err(e) => {
            error!(error = %e, "Failed to launch the browser");
            return Err(Box::new(e));
        }
    };

    // ---- Crawl every article page ----
    let options = CrawlOptions {
        max_rows: args.max_rows,
        delay: Duration::from_secs(args.delay_secs),
    };
    let outcome = crawl_articles(&session, &rows, &options).await;

    // ---- Shut down the browser ----
    session.shutdown().await;

    // ---- Write outputs ----
    if let Err(e) = json::write_records(&outcome.records, &args.json_output).await {
        error!(path = %args.json_output.display(), error = %e, "Failed to write the JSON document");
    }
    if let Err(e) = table::write_flat_rows(&outcome.flat_rows, &args.table_output) {
        error!(path = %args.table_output.display(), error = %e, "Failed to write the CSV table");
    }

    let elapsed = start_time.elapsed();
    info!(
        ?elapsed,
        secs = elapsed.as_secs(),
        millis = elapsed.subsec_millis(),
        processed = outcome.processed,
        total = outcome.total,
        json_output = %args.json_output.display(),
        table_output = %args.table_output.display(),
        "Crawl complete"
    );

    Ok(())
}
