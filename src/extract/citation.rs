//! Citation string parsing.
//!
//! A PMC citation line mixes journal, date, and volume information in one
//! run of text, e.g. `PLoS One. 2014 Aug 18; 9(8):e104830.` Two patterns
//! pull structured fields out of it:
//!
//! - `YYYY Mon D` → published year / month / day
//! - `N(N):token` → volume / issue / page-or-article id
//!
//! The patterns are matched independently: either can hit without the
//! other, and each populates its three fields as a unit or not at all.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::models::CitationFields;

static DATE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(\d{4})\s+([A-Za-z]+)\s+(\d{1,2})").unwrap());
static VOLUME_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(\d+)\((\d+)\):(\S+)").unwrap());

/// Parse a free-text citation line into structured fields.
///
/// Unmatched units come back as empty strings, never as an error; a
/// citation with only a date, only a volume block, or neither is an
/// ordinary input. The page id keeps exactly what the pattern captured
/// minus one trailing `.`; the capture stops at whitespace, so a page
/// range with embedded spaces is truncated to its first token.
pub fn parse_citation(citation: &str) -> CitationFields {
    let mut fields = CitationFields::default();

    if let Some(caps) = DATE_RE.captures(citation) {
        fields.published_year = caps[1].to_string();
        fields.published_month = caps[2].to_string();
        fields.published_day = caps[3].to_string();
    }

    if let Some(caps) = VOLUME_RE.captures(citation) {
        fields.volume = caps[1].to_string();
        fields.issue = caps[2].to_string();
        let token = &caps[3];
        fields.page_or_article_id = token.strip_suffix('.').unwrap_or(token).to_string();
    }

    fields
}
