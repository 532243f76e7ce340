//! Batch crawl over the input rows.
//!
//! Rows are processed strictly in order on one shared fetch session; each
//! row yields exactly one record (full or failed) and one flat row for the
//! tabular export, built in the same pass. A failed record never stops
//! the batch. Between rows the crawl pauses briefly to stay polite to the
//! remote service; the delay is pacing, not correctness.

use std::time::Duration;

use tokio::time::sleep;
use tracing::info;

use crate::extract::pmc::extract_article;
use crate::fetch::PageFetcher;
use crate::inputs::InputRow;
use crate::models::{ArticleRecord, FlatRow};

/// Knobs for one crawl run.
#[derive(Debug, Clone)]
pub struct CrawlOptions {
    /// Process at most this many rows; `None` processes everything.
    pub max_rows: Option<usize>,
    /// Pause inserted after each row.
    pub delay: Duration,
}

/// Everything one crawl run produced.
#[derive(Debug)]
pub struct CrawlOutcome {
    /// One record per processed row, in input order.
    pub records: Vec<ArticleRecord>,
    /// The tabular projection of `records`, same order and length.
    pub flat_rows: Vec<FlatRow>,
    /// Rows actually processed (after the cap).
    pub processed: usize,
    /// Rows available in the input (before the cap).
    pub total: usize,
}

/// Crawl every input row in order and collect the results.
///
/// Sequence ids are 1-based row positions. The progress line for each row
/// is emitted before its extraction starts, against the uncapped total so
/// a capped run is visible as such.
pub async fn crawl_articles<F: PageFetcher>(
    fetcher: &F,
    rows: &[InputRow],
    options: &CrawlOptions,
) -> CrawlOutcome {
    let total = rows.len();
    let capped = match options.max_rows {
        Some(max) => &rows[..max.min(total)],
        None => rows,
    };

    let mut records = Vec::with_capacity(capped.len());
    let mut flat_rows = Vec::with_capacity(capped.len());

    for (position, row) in capped.iter().enumerate() {
        let id = position + 1;
        info!("[{}/{}] {}", id, total, row.link);

        let record = extract_article(fetcher, &row.link, id, &row.title).await;
        flat_rows.push(FlatRow::from_record(&record, &row.title));
        records.push(record);

        sleep(options.delay).await;
    }

    CrawlOutcome {
        records,
        flat_rows,
        processed: capped.len(),
        total,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::pmc::{CITATION_BLOCK, FRONT_MATTER, TOC_LANDMARK};
    use crate::fetch::fake::FakeFetcher;

    fn input_row(title: &str, link: &str) -> InputRow {
        InputRow {
            title: title.to_string(),
            link: link.to_string(),
        }
    }

    /// Script `count` crawlable article pages and return matching rows.
    fn scripted_rows(fetcher: &mut FakeFetcher, count: usize) -> Vec<InputRow> {
        (1..=count)
            .map(|n| {
                let url = format!("https://www.ncbi.nlm.nih.gov/pmc/articles/PMC{n}/");
                fetcher
                    .page(&url)
                    .landmark(&TOC_LANDMARK)
                    .text(&CITATION_BLOCK, "PLoS One. 2014 Aug 18; 9(8):e104830.")
                    .text(&FRONT_MATTER, "PMCID: PMC4136787");
                input_row(&format!("Article {n}"), &url)
            })
            .collect()
    }

    fn no_delay() -> CrawlOptions {
        CrawlOptions {
            max_rows: None,
            delay: Duration::ZERO,
        }
    }

    #[tokio::test]
    async fn test_outputs_match_input_order_and_length() {
        let mut fetcher = FakeFetcher::new();
        let mut rows = scripted_rows(&mut fetcher, 2);
        // Middle row points nowhere and must fail without stopping the batch.
        rows.insert(1, input_row("Broken", "https://example.com/broken"));

        let outcome = crawl_articles(&fetcher, &rows, &no_delay()).await;

        assert_eq!(outcome.records.len(), 3);
        assert_eq!(outcome.flat_rows.len(), 3);
        assert_eq!(outcome.processed, 3);
        assert_eq!(outcome.total, 3);

        assert!(matches!(&outcome.records[0], ArticleRecord::Full(m) if m.id == 1));
        assert!(matches!(&outcome.records[1], ArticleRecord::Failed(f) if f.id == 2));
        assert!(matches!(&outcome.records[2], ArticleRecord::Full(m) if m.id == 3));
        assert_eq!(outcome.flat_rows[1].original_title, "Broken");
        assert_eq!(outcome.flat_rows[2].original_title, "Article 2");
    }

    #[tokio::test]
    async fn test_max_rows_caps_processing() {
        let mut fetcher = FakeFetcher::new();
        let rows = scripted_rows(&mut fetcher, 10);
        let options = CrawlOptions {
            max_rows: Some(3),
            delay: Duration::ZERO,
        };

        let outcome = crawl_articles(&fetcher, &rows, &options).await;

        assert_eq!(outcome.records.len(), 3);
        assert_eq!(outcome.processed, 3);
        assert_eq!(outcome.total, 10);
        assert!(matches!(&outcome.records[2], ArticleRecord::Full(m) if m.id == 3));
    }

    #[tokio::test]
    async fn test_cap_larger_than_input_processes_everything() {
        let mut fetcher = FakeFetcher::new();
        let rows = scripted_rows(&mut fetcher, 2);
        let options = CrawlOptions {
            max_rows: Some(50),
            delay: Duration::ZERO,
        };

        let outcome = crawl_articles(&fetcher, &rows, &options).await;

        assert_eq!(outcome.processed, 2);
        assert_eq!(outcome.total, 2);
    }

    #[tokio::test]
    async fn test_failed_rows_fill_exactly_four_columns() {
        let fetcher = FakeFetcher::new();
        let rows = vec![input_row("Row Title", "https://example.com/missing")];

        let outcome = crawl_articles(&fetcher, &rows, &no_delay()).await;

        let row = &outcome.flat_rows[0];
        assert_eq!(row.id, 1);
        assert_eq!(row.original_title, "Row Title");
        assert_eq!(row.link, "https://example.com/missing");
        assert!(!row.error.is_empty());
        assert_eq!(row.pmcid, "");
        assert_eq!(row.publisher, "");
        assert_eq!(row.published_date, "");
        assert_eq!(row.figure_count, "");
    }

    #[tokio::test]
    async fn test_repeat_crawls_are_byte_identical() {
        let mut fetcher = FakeFetcher::new();
        let mut rows = scripted_rows(&mut fetcher, 3);
        rows.push(input_row("Broken", "https://example.com/broken"));

        let first = crawl_articles(&fetcher, &rows, &no_delay()).await;
        let second = crawl_articles(&fetcher, &rows, &no_delay()).await;

        let first_json = serde_json::to_string_pretty(&first.records).unwrap();
        let second_json = serde_json::to_string_pretty(&second.records).unwrap();
        assert_eq!(first_json, second_json);
    }

    #[tokio::test]
    async fn test_empty_input_yields_empty_outputs() {
        let fetcher = FakeFetcher::new();

        let outcome = crawl_articles(&fetcher, &[], &no_delay()).await;

        assert!(outcome.records.is_empty());
        assert!(outcome.flat_rows.is_empty());
        assert_eq!(outcome.processed, 0);
        assert_eq!(outcome.total, 0);
    }
}
