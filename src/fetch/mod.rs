//! Browser-facing page access: locators, the fetch session contract, and
//! the never-failing field accessors built on top of it.
//!
//! Extraction code talks to the rendered page exclusively through
//! [`PageFetcher`]. The required primitives (`navigate`, `wait_for`,
//! `find_one`, `find_all`) surface absence and timeouts; the provided
//! accessors [`PageFetcher::text_at`] and [`PageFetcher::texts_at`] convert
//! every lookup failure into an empty value, so a missing element degrades
//! a single field instead of aborting the record.
//!
//! [`chrome`] is the production implementation over a Chrome DevTools
//! session; `fake` (test builds only) is a scripted stand-in.

use std::fmt;
use std::time::Duration;
use thiserror::Error;

pub mod chrome;
#[cfg(test)]
pub mod fake;

/// A structural query identifying elements on a rendered page.
///
/// Semantic lookups (class or id predicates) are CSS selectors; positional
/// lookups (absolute paths into the document) are XPath expressions. The
/// two kinds dispatch to different DevTools calls but are otherwise
/// interchangeable wherever a locator is accepted.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Locator {
    /// A CSS selector, e.g. `div[class*='abstract'] p`.
    Css(String),
    /// An XPath expression, e.g. `//main//figure`.
    XPath(String),
}

impl Locator {
    /// Build a CSS selector locator.
    pub fn css(expr: impl Into<String>) -> Self {
        Self::Css(expr.into())
    }

    /// Build an XPath locator.
    pub fn xpath(expr: impl Into<String>) -> Self {
        Self::XPath(expr.into())
    }
}

impl fmt::Display for Locator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Css(expr) => write!(f, "css {expr}"),
            Self::XPath(expr) => write!(f, "xpath {expr}"),
        }
    }
}

/// Failure modes of the fetch session that extraction code may observe.
///
/// Everything the never-failing accessors absorb (absent elements, stale
/// handles) never surfaces here; what remains is navigation, landmark
/// waits, and session plumbing. The `Display` text of these variants is
/// what ends up in a failed record's `error` field.
#[derive(Debug, Error)]
pub enum FetchError {
    /// The page never produced a usable navigation to `url`.
    #[error("navigation to {url} failed: {message}")]
    Navigation { url: String, message: String },

    /// A landmark wait ran out of time.
    #[error("timed out after {timeout_secs}s waiting for {locator}")]
    WaitTimeout { locator: String, timeout_secs: u64 },

    /// Launching or driving the browser session itself failed.
    #[error("browser session error: {0}")]
    Session(String),
}

/// One element handle returned by a fetcher lookup.
///
/// Both accessors return `None` rather than an error when the underlying
/// call fails; the distinction between "no such attribute" and "lookup
/// broke" is deliberately not observable.
pub trait PageElement {
    /// The element's rendered text, if it could be read.
    async fn text(&self) -> Option<String>;

    /// The value of attribute `name`, if present and readable.
    async fn attribute(&self, name: &str) -> Option<String>;
}

/// The fetch session contract: navigation, bounded landmark waits, and
/// element lookup against whatever page is currently loaded.
///
/// One session is reused across every page the crawl touches, so
/// implementations hold the current-page state internally. The provided
/// accessors are the only way extraction code reads scalar fields; their
/// no-error contract is what keeps field-level misses from growing into
/// record-level failures.
pub trait PageFetcher {
    /// The element handle type produced by lookups.
    type Element: PageElement;

    /// Load `url` in the session's page and wait for the navigation to
    /// settle.
    async fn navigate(&self, url: &str) -> Result<(), FetchError>;

    /// Block until `locator` matches something or `timeout` elapses.
    ///
    /// A timeout is an ordinary [`FetchError::WaitTimeout`], not a hang;
    /// callers decide whether it aborts the record or is tolerated.
    async fn wait_for(&self, locator: &Locator, timeout: Duration) -> Result<(), FetchError>;

    /// First element matching `locator`, or `None` on zero matches or any
    /// lookup failure.
    async fn find_one(&self, locator: &Locator) -> Option<Self::Element>;

    /// Every element matching `locator` in document order; empty on zero
    /// matches or any lookup failure.
    async fn find_all(&self, locator: &Locator) -> Vec<Self::Element>;

    /// Trimmed text of the first match, or `""` when nothing matched or
    /// the lookup failed. Never fails.
    async fn text_at(&self, locator: &Locator) -> String {
        match self.find_one(locator).await {
            Some(element) => element
                .text()
                .await
                .map(|text| text.trim().to_string())
                .unwrap_or_default(),
            None => String::new(),
        }
    }

    /// Trimmed, non-empty text of every match in document order; empty on
    /// zero matches or any lookup failure. Never fails.
    async fn texts_at(&self, locator: &Locator) -> Vec<String> {
        let mut texts = Vec::new();
        for element in self.find_all(locator).await {
            if let Some(text) = element.text().await {
                let trimmed = text.trim();
                if !trimmed.is_empty() {
                    texts.push(trimmed.to_string());
                }
            }
        }
        texts
    }
}
