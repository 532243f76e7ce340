//! Scripted in-memory page fetcher for tests.
//!
//! Pages are keyed by URL and scripted up front: which landmarks are
//! present, and which elements (with text and attributes) each locator
//! resolves to. Landmarks are tracked separately from elements so a test
//! can express "the wait times out but the elements exist anyway", the
//! shape the figure-count flow tolerates on real pages.
//!
//! Navigating to an unscripted URL fails like a dead link; waits resolve
//! instantly instead of sleeping.

use std::collections::{HashMap, HashSet};
use std::sync::Mutex;
use std::time::Duration;

use super::{FetchError, Locator, PageElement, PageFetcher};

/// A scripted fetch session. Pages are keyed by URL, their contents by
/// [`Locator`].
pub struct FakeFetcher {
    pages: HashMap<String, FakePage>,
    current: Mutex<Option<String>>,
}

impl FakeFetcher {
    pub fn new() -> Self {
        Self {
            pages: HashMap::new(),
            current: Mutex::new(None),
        }
    }

    /// The page served for `url`, created empty on first use.
    pub fn page(&mut self, url: &str) -> &mut FakePage {
        self.pages.entry(url.to_string()).or_default()
    }

    fn current_page(&self) -> Option<&FakePage> {
        let current = self.current.lock().unwrap().clone();
        current.and_then(|url| self.pages.get(&url))
    }
}

impl PageFetcher for FakeFetcher {
    type Element = FakeElement;

    async fn navigate(&self, url: &str) -> Result<(), FetchError> {
        if self.pages.contains_key(url) {
            *self.current.lock().unwrap() = Some(url.to_string());
            Ok(())
        } else {
            Err(FetchError::Navigation {
                url: url.to_string(),
                message: "no scripted page for this url".to_string(),
            })
        }
    }

    async fn wait_for(&self, locator: &Locator, timeout: Duration) -> Result<(), FetchError> {
        let present = self
            .current_page()
            .is_some_and(|page| page.landmarks.contains(locator));
        if present {
            Ok(())
        } else {
            Err(FetchError::WaitTimeout {
                locator: locator.to_string(),
                timeout_secs: timeout.as_secs(),
            })
        }
    }

    async fn find_one(&self, locator: &Locator) -> Option<FakeElement> {
        self.current_page()
            .and_then(|page| page.elements.get(locator))
            .and_then(|elements| elements.first())
            .cloned()
    }

    async fn find_all(&self, locator: &Locator) -> Vec<FakeElement> {
        self.current_page()
            .and_then(|page| page.elements.get(locator))
            .cloned()
            .unwrap_or_default()
    }
}

/// One scripted page: its landmarks and its locator-to-elements table.
#[derive(Default)]
pub struct FakePage {
    landmarks: HashSet<Locator>,
    elements: HashMap<Locator, Vec<FakeElement>>,
}

impl FakePage {
    /// Declare that waiting on `locator` succeeds on this page.
    pub fn landmark(&mut self, locator: &Locator) -> &mut Self {
        self.landmarks.insert(locator.clone());
        self
    }

    /// Append one element with the given text under `locator`.
    pub fn text(&mut self, locator: &Locator, text: &str) -> &mut Self {
        self.element(locator, FakeElement::with_text(text))
    }

    /// Append one text element per entry under `locator`, in order.
    pub fn texts(&mut self, locator: &Locator, texts: &[&str]) -> &mut Self {
        for text in texts {
            self.text(locator, text);
        }
        self
    }

    /// Append a fully scripted element under `locator`.
    pub fn element(&mut self, locator: &Locator, element: FakeElement) -> &mut Self {
        self.elements
            .entry(locator.clone())
            .or_default()
            .push(element);
        self
    }
}

/// One scripted element handle.
#[derive(Clone, Default)]
pub struct FakeElement {
    text: Option<String>,
    attributes: HashMap<String, String>,
}

impl FakeElement {
    /// An element whose rendered text is `text`.
    pub fn with_text(text: &str) -> Self {
        Self {
            text: Some(text.to_string()),
            ..Self::default()
        }
    }

    /// Add an attribute, consuming and returning the element for chaining.
    pub fn with_attribute(mut self, name: &str, value: &str) -> Self {
        self.attributes.insert(name.to_string(), value.to_string());
        self
    }
}

impl PageElement for FakeElement {
    async fn text(&self) -> Option<String> {
        self.text.clone()
    }

    async fn attribute(&self, name: &str) -> Option<String> {
        self.attributes.get(name).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_navigate_to_unscripted_url_fails() {
        let fetcher = FakeFetcher::new();
        let err = fetcher.navigate("https://example.com/nope").await;
        assert!(matches!(err, Err(FetchError::Navigation { .. })));
    }

    #[tokio::test]
    async fn test_wait_for_requires_scripted_landmark() {
        let mut fetcher = FakeFetcher::new();
        let landmark = Locator::css("main");
        fetcher.page("https://example.com").landmark(&landmark);
        fetcher.navigate("https://example.com").await.unwrap();

        assert!(fetcher.wait_for(&landmark, Duration::from_secs(5)).await.is_ok());
        let err = fetcher
            .wait_for(&Locator::css("aside"), Duration::from_secs(5))
            .await;
        assert!(matches!(err, Err(FetchError::WaitTimeout { .. })));
    }

    #[tokio::test]
    async fn test_elements_found_without_landmark() {
        // Element presence and landmark presence are independent.
        let mut fetcher = FakeFetcher::new();
        let figures = Locator::xpath("//figure");
        fetcher
            .page("https://example.com")
            .texts(&figures, &["Fig 1", "Fig 2"]);
        fetcher.navigate("https://example.com").await.unwrap();

        assert!(fetcher
            .wait_for(&figures, Duration::from_secs(10))
            .await
            .is_err());
        assert_eq!(fetcher.find_all(&figures).await.len(), 2);
    }

    #[tokio::test]
    async fn test_navigation_switches_current_page() {
        let mut fetcher = FakeFetcher::new();
        let heading = Locator::css("h1");
        fetcher.page("https://a.example").text(&heading, "A");
        fetcher.page("https://b.example").text(&heading, "B");

        fetcher.navigate("https://a.example").await.unwrap();
        assert_eq!(fetcher.text_at(&heading).await, "A");
        fetcher.navigate("https://b.example").await.unwrap();
        assert_eq!(fetcher.text_at(&heading).await, "B");
    }

    #[tokio::test]
    async fn test_attributes_resolve_per_element() {
        let mut fetcher = FakeFetcher::new();
        let anchors = Locator::css("a[data-ga-label]");
        fetcher.page("https://example.com").element(
            &anchors,
            FakeElement::with_text("Abstract").with_attribute("data-ga-label", "Abstract"),
        );
        fetcher.navigate("https://example.com").await.unwrap();

        let element = fetcher.find_one(&anchors).await.unwrap();
        assert_eq!(
            element.attribute("data-ga-label").await.as_deref(),
            Some("Abstract")
        );
        assert_eq!(element.attribute("href").await, None);
    }
}
