//! Per-page metadata extraction.
//!
//! Each submodule owns one page family and its locators:
//!
//! - [`pmc`]: the primary article page; one call produces one full record
//!   or its minimal failure record
//! - [`pubmed`]: the PMID-keyed follow-up pages that add citation count,
//!   MeSH terms, abstract, and figure count
//! - [`citation`]: pattern matching over the free-text citation line
//!
//! All element access goes through the fetch accessors, so a page whose
//! shape has drifted yields empty fields rather than failures; only the
//! landmark waits and navigations in [`pmc`] can abort a record.

pub mod citation;
pub mod pmc;
pub mod pubmed;
