//! PMC article page extraction.
//!
//! One call to [`extract_article`] turns one input row into one record.
//! The page's table-of-contents rail is the render landmark: until it
//! appears the article shell is still loading, and if it never appears the
//! whole record is abandoned. Past that point every field is read through
//! the best-effort accessors, so a drifted page shape produces empty
//! fields, not failures.
//!
//! The front-matter block carries the PMCID and PMID as embedded tokens;
//! each is pulled out by its own pattern so one being absent never costs
//! the other. A non-empty PMID triggers the PubMed enrichment flow, which
//! navigates the shared session away from the article page, so all article
//! fields are read before it runs.

use std::time::Duration;

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::warn;

use crate::extract::citation::parse_citation;
use crate::extract::pubmed::fetch_pubmed_details;
use crate::fetch::{FetchError, Locator, PageElement, PageFetcher};
use crate::models::{ArticleMetadata, ArticleRecord, ExtractionFailure};

/// Wait budget for the table-of-contents landmark; running out abandons
/// the record.
pub const TOC_TIMEOUT: Duration = Duration::from_secs(10);

/// Positional root of the article front-matter block.
const FRONT_MATTER_PATH: &str =
    "/html/body/div[3]/div[2]/div/div[1]/div/div[2]/main/article/section[1]";

/// Table-of-contents rail; doubles as the page-rendered landmark.
pub static TOC_LANDMARK: Lazy<Locator> =
    Lazy::new(|| Locator::css("ul[class*='usa-in-page-nav__list']"));
/// Labelled section links inside the table of contents.
pub static TOC_LABELS: Lazy<Locator> =
    Lazy::new(|| Locator::css("ul[class*='usa-in-page-nav__list'] a[data-ga-label]"));
/// The whole front-matter block, searched for identifier tokens.
pub static FRONT_MATTER: Lazy<Locator> = Lazy::new(|| Locator::xpath(FRONT_MATTER_PATH));
/// The citation line.
pub static CITATION_BLOCK: Lazy<Locator> =
    Lazy::new(|| Locator::xpath(format!("{FRONT_MATTER_PATH}/section[1]/div")));
/// DOI anchor nested inside the citation line.
pub static DOI_ANCHOR: Lazy<Locator> =
    Lazy::new(|| Locator::xpath(format!("{FRONT_MATTER_PATH}/section[1]/div/a")));
/// Publisher button in the citation header.
pub static PUBLISHER_BUTTON: Lazy<Locator> =
    Lazy::new(|| Locator::xpath(format!("{FRONT_MATTER_PATH}/section[1]/div/div/button")));
/// Rendered article title heading.
pub static LINK_TITLE: Lazy<Locator> =
    Lazy::new(|| Locator::xpath(format!("{FRONT_MATTER_PATH}/section[2]/div/hgroup/h1")));
/// Author name spans, in page order.
pub static AUTHOR_NAMES: Lazy<Locator> = Lazy::new(|| {
    Locator::xpath(format!(
        "{FRONT_MATTER_PATH}/section[2]/div/div[1]//span[@class='name western']"
    ))
});
/// Editor name spans, in page order.
pub static EDITOR_NAMES: Lazy<Locator> = Lazy::new(|| {
    Locator::xpath(format!(
        "{FRONT_MATTER_PATH}/section[2]/div/div[2]//span[@class='name western']"
    ))
});

static PMCID_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"PMCID:\s*(PMC\d+)").unwrap());
static PMID_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"PMID:\s*(\d+)").unwrap());

/// Extract one article record.
///
/// Always returns a record: either the full metadata or, when navigation
/// or the landmark wait fails, the minimal failure record carrying the
/// error text. The batch never stops on either outcome.
///
/// # Arguments
///
/// * `fetcher` - The shared fetch session
/// * `url` - The article page to crawl
/// * `id` - 1-based sequence number assigned by the caller
/// * `original_title` - The title as given by the input row
pub async fn extract_article<F: PageFetcher>(
    fetcher: &F,
    url: &str,
    id: usize,
    original_title: &str,
) -> ArticleRecord {
    match extract_metadata(fetcher, url, id, original_title).await {
        Ok(metadata) => ArticleRecord::Full(Box::new(metadata)),
        Err(e) => {
            warn!(id, url, error = %e, "Article extraction failed");
            ArticleRecord::Failed(ExtractionFailure {
                id,
                url: url.to_string(),
                error: e.to_string(),
            })
        }
    }
}

async fn extract_metadata<F: PageFetcher>(
    fetcher: &F,
    url: &str,
    id: usize,
    original_title: &str,
) -> Result<ArticleMetadata, FetchError> {
    fetcher.navigate(url).await?;
    fetcher.wait_for(&TOC_LANDMARK, TOC_TIMEOUT).await?;

    let mut on_this_page = Vec::new();
    for entry in fetcher.find_all(&TOC_LABELS).await {
        // Entries without the label attribute are dropped, not kept as
        // empty strings.
        if let Some(label) = entry.attribute("data-ga-label").await {
            let label = label.trim();
            if !label.is_empty() {
                on_this_page.push(label.to_string());
            }
        }
    }

    let citation_string = fetcher.text_at(&CITATION_BLOCK).await;
    let citation_parsed = parse_citation(&citation_string);
    let doi = fetcher.text_at(&DOI_ANCHOR).await;
    let doi_link = if doi.is_empty() {
        String::new()
    } else {
        format!("https://doi.org/{doi}")
    };

    let front_matter = fetcher.text_at(&FRONT_MATTER).await;
    let pmcid = first_capture(&PMCID_RE, &front_matter);
    let pmid = first_capture(&PMID_RE, &front_matter);

    let publisher = fetcher.text_at(&PUBLISHER_BUTTON).await;
    let link_title = fetcher.text_at(&LINK_TITLE).await;
    let authors = fetcher.texts_at(&AUTHOR_NAMES).await;
    let editors = fetcher.texts_at(&EDITOR_NAMES).await;

    // Enrichment navigates away from the article page, so it runs last.
    let enrichment = if pmid.is_empty() {
        None
    } else {
        Some(fetch_pubmed_details(fetcher, &pmid).await)
    };

    Ok(ArticleMetadata {
        id,
        original_title: original_title.to_string(),
        url: url.to_string(),
        pmcid,
        pmid,
        publisher,
        citation_string,
        citation_parsed,
        doi,
        doi_link,
        link_title,
        authors,
        editors,
        on_this_page,
        enrichment,
    })
}

/// First capture group of `re` in `text`, or `""` when absent.
fn first_capture(re: &Regex, text: &str) -> String {
    re.captures(text)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
        .unwrap_or_default()
}
