//! PubMed enrichment for records that carry a PMID.
//!
//! Two follow-up navigations augment an article record: the cited-in
//! listing (citation count) and the canonical PubMed page (abstract, MeSH
//! terms, figure count). The whole flow is best-effort: any failure is
//! logged with the PMID and the record keeps zero-valued enrichment
//! fields; it never turns the parent record into a failure.

use std::time::Duration;

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::{debug, warn};

use crate::fetch::{Locator, PageFetcher};
use crate::models::PubmedEnrichment;

/// Wait budget for the cited-in count block.
pub const CITED_IN_TIMEOUT: Duration = Duration::from_secs(5);
/// Wait budget for the abstract container on the article page.
pub const ABSTRACT_TIMEOUT: Duration = Duration::from_secs(5);
/// Wait budget for the figures block; running out is tolerated.
pub const FIGURES_TIMEOUT: Duration = Duration::from_secs(10);

/// Count block on the cited-in listing page.
pub static CITED_IN_COUNT: Lazy<Locator> =
    Lazy::new(|| Locator::xpath("/html/body/main/div[9]/div[2]/div[2]/div[1]"));
/// Abstract container that signals the article page has rendered.
pub static ABSTRACT_CONTAINER: Lazy<Locator> =
    Lazy::new(|| Locator::css("div[class*='abstract']"));
/// Paragraphs inside the abstract container.
pub static ABSTRACT_PARAGRAPHS: Lazy<Locator> =
    Lazy::new(|| Locator::css("div[class*='abstract'] p"));
/// MeSH term buttons in the subject-terms section.
pub static MESH_TERM_BUTTONS: Lazy<Locator> =
    Lazy::new(|| Locator::css("#mesh-terms ul > li > div > button[data-pinger-ignore]"));
/// Figure elements in the article body.
pub static FIGURES: Lazy<Locator> = Lazy::new(|| Locator::xpath("//main/div[4]/div[1]//figure"));

static DIGITS_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\d+").unwrap());

/// The cited-in listing for `pmid`.
pub fn cited_in_url(pmid: &str) -> String {
    format!("https://pubmed.ncbi.nlm.nih.gov/?linkname=pubmed_pubmed_citedin&from_uid={pmid}")
}

/// The canonical PubMed article page for `pmid`.
pub fn article_url(pmid: &str) -> String {
    format!("https://pubmed.ncbi.nlm.nih.gov/{pmid}/")
}

/// Fetch citation count, MeSH terms, abstract, and figure count for `pmid`.
///
/// On any failure the enrichment comes back entirely zero-valued; partial
/// results collected before the failure are discarded.
pub async fn fetch_pubmed_details<F: PageFetcher>(fetcher: &F, pmid: &str) -> PubmedEnrichment {
    match try_fetch(fetcher, pmid).await {
        Ok(enrichment) => enrichment,
        Err(e) => {
            warn!(pmid, error = %e, "PubMed enrichment failed; keeping zero values");
            PubmedEnrichment::default()
        }
    }
}

async fn try_fetch<F: PageFetcher>(
    fetcher: &F,
    pmid: &str,
) -> Result<PubmedEnrichment, crate::fetch::FetchError> {
    fetcher.navigate(&cited_in_url(pmid)).await?;
    fetcher.wait_for(&CITED_IN_COUNT, CITED_IN_TIMEOUT).await?;

    // A count block with no digits means the listing is empty: a real
    // zero. A block that never appeared already failed the wait above.
    let count_block = fetcher.text_at(&CITED_IN_COUNT).await;
    let citation_count = DIGITS_RE
        .find(&count_block)
        .map(|m| m.as_str().to_string())
        .unwrap_or_else(|| "0".to_string());

    fetcher.navigate(&article_url(pmid)).await?;
    fetcher.wait_for(&ABSTRACT_CONTAINER, ABSTRACT_TIMEOUT).await?;

    let abstract_text = fetcher.texts_at(&ABSTRACT_PARAGRAPHS).await.join("\n");
    let mesh_terms = fetcher.texts_at(&MESH_TERM_BUTTONS).await.join("; ");

    // Figures render late or not at all; count whatever is there once the
    // wait resolves either way.
    if let Err(e) = fetcher.wait_for(&FIGURES, FIGURES_TIMEOUT).await {
        debug!(pmid, error = %e, "Figures never appeared; counting anyway");
    }
    let figure_count = fetcher.find_all(&FIGURES).await.len();

    Ok(PubmedEnrichment {
        citation_count,
        mesh_terms,
        abstract_text,
        figure_count,
    })
}
