//! Production page fetcher over a Chrome DevTools session.
//!
//! One browser process, one tab, reused for every navigation of the crawl.
//! [`ChromeSession::launch`] starts Chrome and spawns the CDP event loop;
//! [`ChromeSession::shutdown`] closes the browser and reaps both the
//! process and the event task. Everything in between goes through the
//! [`PageFetcher`] impl.
//!
//! # Locator dispatch
//!
//! CSS locators go through the DevTools `querySelector` path
//! (`find_element`/`find_elements`); XPath locators go through the search
//! API (`find_xpath`/`find_xpaths`). Both collapse lookup errors into
//! absence, which is what the accessor contract requires.

use std::time::{Duration, Instant};

use chromiumoxide::browser::{Browser, BrowserConfig};
use chromiumoxide::element::Element;
use chromiumoxide::page::Page;
use futures::StreamExt;
use tokio::task::JoinHandle;
use tokio::time::{sleep, timeout};
use tracing::{debug, info, warn};

use super::{FetchError, Locator, PageElement, PageFetcher};

/// Upper bound on a single page load before navigation is called failed.
const NAVIGATION_TIMEOUT: Duration = Duration::from_secs(30);

/// A launched Chrome process with a single tab and its CDP event task.
pub struct ChromeSession {
    browser: Browser,
    page: Page,
    handler_task: JoinHandle<()>,
}

impl ChromeSession {
    /// Launch Chrome and open the tab the whole crawl will reuse.
    ///
    /// The browser runs headless unless `headed` is set. `--no-sandbox`
    /// and `--disable-gpu` keep the launch working inside containers and
    /// on hosts without GPU acceleration.
    ///
    /// # Errors
    ///
    /// [`FetchError::Session`] if the browser cannot be launched or the
    /// initial tab cannot be opened.
    pub async fn launch(headed: bool) -> Result<Self, FetchError> {
        let mut builder = BrowserConfig::builder()
            .arg("--no-sandbox")
            .arg("--disable-gpu");
        if headed {
            builder = builder.with_head();
        }
        let config = builder.build().map_err(FetchError::Session)?;

        let (browser, mut handler) = Browser::launch(config)
            .await
            .map_err(|e| FetchError::Session(e.to_string()))?;

        // The CDP websocket must be pumped for the lifetime of the
        // session; events we don't consume are dropped here.
        let handler_task = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if let Err(e) = event {
                    debug!(error = %e, "CDP handler event error");
                }
            }
        });

        let page = browser
            .new_page("about:blank")
            .await
            .map_err(|e| FetchError::Session(e.to_string()))?;

        info!(headed, "Browser session launched");
        Ok(Self {
            browser,
            page,
            handler_task,
        })
    }

    /// Close the browser, wait for the process to exit, and stop the CDP
    /// event task. Failures are logged and otherwise ignored; there is
    /// nothing useful to do with them at the end of a run.
    pub async fn shutdown(mut self) {
        if let Err(e) = self.browser.close().await {
            warn!(error = %e, "Failed to close browser cleanly");
        }
        if let Err(e) = self.browser.wait().await {
            warn!(error = %e, "Failed to wait for browser exit");
        }
        self.handler_task.abort();
        info!("Browser session shut down");
    }
}

impl PageFetcher for ChromeSession {
    type Element = ChromeElement;

    async fn navigate(&self, url: &str) -> Result<(), FetchError> {
        match timeout(NAVIGATION_TIMEOUT, self.page.goto(url)).await {
            Ok(Ok(_)) => {}
            Ok(Err(e)) => {
                return Err(FetchError::Navigation {
                    url: url.to_string(),
                    message: e.to_string(),
                });
            }
            Err(_) => {
                return Err(FetchError::Navigation {
                    url: url.to_string(),
                    message: format!("no response within {}s", NAVIGATION_TIMEOUT.as_secs()),
                });
            }
        }
        self.page
            .wait_for_navigation()
            .await
            .map_err(|e| FetchError::Navigation {
                url: url.to_string(),
                message: e.to_string(),
            })?;
        Ok(())
    }

    async fn wait_for(&self, locator: &Locator, timeout: Duration) -> Result<(), FetchError> {
        // Poll with exponential backoff: 100ms doubling, capped at 1s.
        let start = Instant::now();
        let mut poll_interval = Duration::from_millis(100);
        let max_interval = Duration::from_secs(1);

        loop {
            if self.find_one(locator).await.is_some() {
                return Ok(());
            }
            if start.elapsed() >= timeout {
                return Err(FetchError::WaitTimeout {
                    locator: locator.to_string(),
                    timeout_secs: timeout.as_secs(),
                });
            }
            sleep(poll_interval).await;
            poll_interval = (poll_interval * 2).min(max_interval);
        }
    }

    async fn find_one(&self, locator: &Locator) -> Option<ChromeElement> {
        match locator {
            Locator::Css(expr) => self.page.find_element(expr.as_str()).await.ok(),
            Locator::XPath(expr) => self.page.find_xpath(expr.as_str()).await.ok(),
        }
        .map(ChromeElement)
    }

    async fn find_all(&self, locator: &Locator) -> Vec<ChromeElement> {
        match locator {
            Locator::Css(expr) => self.page.find_elements(expr.as_str()).await,
            Locator::XPath(expr) => self.page.find_xpaths(expr.as_str()).await,
        }
        .unwrap_or_default()
        .into_iter()
        .map(ChromeElement)
        .collect()
    }
}

/// A DevTools element handle.
pub struct ChromeElement(Element);

impl PageElement for ChromeElement {
    async fn text(&self) -> Option<String> {
        self.0.inner_text().await.ok().flatten()
    }

    async fn attribute(&self, name: &str) -> Option<String> {
        self.0.attribute(name).await.ok().flatten()
    }
}
