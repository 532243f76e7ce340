//! Data models for crawled article metadata.
//!
//! This module defines the core data structures used throughout the application:
//! - [`ArticleRecord`]: One output record per input row, full or failed
//! - [`ArticleMetadata`]: The fully extracted bibliographic record
//! - [`CitationFields`]: Structured fields parsed out of the citation string
//! - [`PubmedEnrichment`]: PMID-keyed fields from the PubMed pages
//! - [`ExtractionFailure`]: The minimal record emitted when extraction aborts
//! - [`FlatRow`]: One spreadsheet row, projected from an [`ArticleRecord`]
//!
//! Struct fields are declared in the order the JSON export presents them, so
//! the serialized documents stay stable across runs.

use serde::{Deserialize, Serialize};

/// One crawl result: either the full metadata record or the minimal
/// failure record. Never a partial mix of the two.
///
/// Serialized untagged, so the JSON array holds plain objects of either
/// shape, distinguishable by the presence of the `error` key.
#[derive(Debug, Deserialize, Serialize)]
#[serde(untagged)]
pub enum ArticleRecord {
    /// Extraction reached the end; every field below is populated
    /// (possibly with empty strings where the page lacked the element).
    Full(Box<ArticleMetadata>),
    /// Extraction aborted before any field was captured.
    Failed(ExtractionFailure),
}

/// A fully extracted bibliographic record for one article page.
///
/// # Field groups
///
/// * identity (`id`, `original_title`, `url`): carried over from the input row
/// * identifiers (`pmcid`, `pmid`): pattern-matched out of the front matter
/// * bibliographic (`publisher` through `on_this_page`): read off the page
/// * `enrichment`: present exactly when `pmid` was non-empty; its fields
///   flatten into this record's JSON object rather than nesting
#[derive(Debug, Deserialize, Serialize)]
pub struct ArticleMetadata {
    /// 1-based sequence number assigned in input order.
    pub id: usize,
    /// The article title as given by the input row.
    pub original_title: String,
    /// The crawled article URL.
    pub url: String,
    /// PMC identifier (`PMC` followed by digits), or `""` if not found.
    pub pmcid: String,
    /// PubMed identifier (digits), or `""` if not found.
    pub pmid: String,
    /// Publisher button label from the front matter.
    pub publisher: String,
    /// The raw citation line as displayed on the page.
    pub citation_string: String,
    /// Structured fields parsed from `citation_string`.
    pub citation_parsed: CitationFields,
    /// DOI as displayed, or `""`.
    pub doi: String,
    /// `https://doi.org/<doi>`, or `""` when `doi` is empty.
    pub doi_link: String,
    /// The `<h1>` article title as rendered on the page.
    pub link_title: String,
    /// Author names in page order.
    pub authors: Vec<String>,
    /// Editor names in page order.
    pub editors: Vec<String>,
    /// Table-of-contents section labels in page order.
    pub on_this_page: Vec<String>,
    /// PMID-keyed fields; `None` when the record has no `pmid`, in which
    /// case none of the enrichment keys appear in the JSON object.
    #[serde(flatten)]
    pub enrichment: Option<PubmedEnrichment>,
}

/// Structured fields parsed out of a free-text citation string.
///
/// The date triplet and the volume triplet come from two independent
/// patterns: each is populated as a unit or left empty as a unit, and
/// either can succeed without the other.
#[derive(Debug, Default, Deserialize, Serialize)]
pub struct CitationFields {
    /// 4-digit year, or `""`.
    pub published_year: String,
    /// Alphabetic month token as printed (e.g. `"Mar"`), or `""`.
    pub published_month: String,
    /// 1–2 digit day, or `""`.
    pub published_day: String,
    /// Volume number, or `""`.
    pub volume: String,
    /// Issue number, or `""`.
    pub issue: String,
    /// Page number or article id, one trailing `.` stripped, or `""`.
    pub page_or_article_id: String,
    /// Set only when the matching step itself fails. The precompiled
    /// patterns cannot fail on a string input, so this stays `None`.
    #[serde(rename = "error", skip_serializing_if = "Option::is_none")]
    pub parse_error: Option<String>,
}

/// Fields gathered from the PubMed pages for a record's `pmid`.
///
/// The zero-value (`Default`) form is what a record keeps when the
/// enrichment fetch fails partway through.
#[derive(Debug, Default, Deserialize, Serialize)]
pub struct PubmedEnrichment {
    /// First digit run from the cited-by count element, `"0"` when the
    /// element exists but holds no digits, `""` when the fetch failed.
    pub citation_count: String,
    /// MeSH term labels joined with `"; "`, in page order.
    pub mesh_terms: String,
    /// Abstract paragraphs joined with `"\n"`, in page order.
    #[serde(rename = "abstract")]
    pub abstract_text: String,
    /// Number of figure elements on the article page.
    pub figure_count: usize,
}

/// The minimal record emitted when article extraction aborts, keeping
/// just enough to identify the row and explain the failure.
#[derive(Debug, Deserialize, Serialize)]
pub struct ExtractionFailure {
    /// 1-based sequence number assigned in input order.
    pub id: usize,
    /// The URL whose extraction failed.
    pub url: String,
    /// Message of the failure that aborted extraction.
    pub error: String,
}

/// One row of the tabular export, with the spreadsheet column headers
/// spelled out as serde renames. Every column is present on every row;
/// columns that do not apply hold `""`.
#[derive(Debug, Serialize)]
pub struct FlatRow {
    #[serde(rename = "ID")]
    pub id: usize,
    #[serde(rename = "Original Title")]
    pub original_title: String,
    #[serde(rename = "Link")]
    pub link: String,
    pub pmcid: String,
    pub pmid: String,
    #[serde(rename = "Publisher")]
    pub publisher: String,
    #[serde(rename = "Published Date")]
    pub published_date: String,
    #[serde(rename = "Volume")]
    pub volume: String,
    #[serde(rename = "Issue")]
    pub issue: String,
    #[serde(rename = "Page/Article ID")]
    pub page_or_article_id: String,
    #[serde(rename = "DOI")]
    pub doi: String,
    #[serde(rename = "DOI Link")]
    pub doi_link: String,
    #[serde(rename = "Link Title")]
    pub link_title: String,
    #[serde(rename = "Authors")]
    pub authors: String,
    #[serde(rename = "Editors")]
    pub editors: String,
    #[serde(rename = "Sections (On This Page)")]
    pub sections: String,
    #[serde(rename = "Citation Count")]
    pub citation_count: String,
    #[serde(rename = "MeSH Terms")]
    pub mesh_terms: String,
    #[serde(rename = "Abstract")]
    pub abstract_text: String,
    #[serde(rename = "Figure Count")]
    pub figure_count: String,
    #[serde(rename = "Error")]
    pub error: String,
}

impl FlatRow {
    /// Project one record onto the flat column set.
    ///
    /// Failure records carry no title of their own, so the title from the
    /// input row is passed in separately; full records already hold it.
    ///
    /// # Arguments
    ///
    /// * `record` - The record to flatten
    /// * `input_title` - The `Title` cell of the input row that produced it
    ///
    /// # Returns
    ///
    /// A row with either the full column set populated and `Error` empty,
    /// or only id/title/link/`Error` populated.
    pub fn from_record(record: &ArticleRecord, input_title: &str) -> FlatRow {
        match record {
            ArticleRecord::Full(meta) => {
                let citation = &meta.citation_parsed;
                FlatRow {
                    id: meta.id,
                    original_title: meta.original_title.clone(),
                    link: meta.url.clone(),
                    pmcid: meta.pmcid.clone(),
                    pmid: meta.pmid.clone(),
                    publisher: meta.publisher.clone(),
                    published_date: format!(
                        "{},{},{}",
                        citation.published_year, citation.published_month, citation.published_day
                    ),
                    volume: citation.volume.clone(),
                    issue: citation.issue.clone(),
                    page_or_article_id: citation.page_or_article_id.clone(),
                    doi: meta.doi.clone(),
                    doi_link: meta.doi_link.clone(),
                    link_title: meta.link_title.clone(),
                    authors: meta.authors.join(", "),
                    editors: meta.editors.join(", "),
                    sections: meta.on_this_page.join(", "),
                    citation_count: meta
                        .enrichment
                        .as_ref()
                        .map(|e| e.citation_count.clone())
                        .unwrap_or_default(),
                    mesh_terms: meta
                        .enrichment
                        .as_ref()
                        .map(|e| e.mesh_terms.clone())
                        .unwrap_or_default(),
                    abstract_text: meta
                        .enrichment
                        .as_ref()
                        .map(|e| e.abstract_text.clone())
                        .unwrap_or_default(),
                    figure_count: meta
                        .enrichment
                        .as_ref()
                        .map(|e| e.figure_count.to_string())
                        .unwrap_or_default(),
                    error: String::new(),
                }
            }
            ArticleRecord::Failed(failure) => FlatRow {
                id: failure.id,
                original_title: input_title.to_string(),
                link: failure.url.clone(),
                pmcid: String::new(),
                pmid: String::new(),
                publisher: String::new(),
                published_date: String::new(),
                volume: String::new(),
                issue: String::new(),
                page_or_article_id: String::new(),
                doi: String::new(),
                doi_link: String::new(),
                link_title: String::new(),
                authors: String::new(),
                editors: String::new(),
                sections: String::new(),
                citation_count: String::new(),
                mesh_terms: String::new(),
                abstract_text: String::new(),
                figure_count: String::new(),
                error: failure.error.clone(),
            },
        }
    }
}
