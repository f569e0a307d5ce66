//! Browser session driving the listing page

use anyhow::Context;
use async_trait::async_trait;
use chromiumoxide::browser::Browser;
use chromiumoxide::page::Page;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

use super::parser::LISTING_CONTAINER_SELECTOR;
use crate::browser_setup::apply_stealth_measures;
use crate::errors::{ScrapeError, ScrapeResult};

/// Script scrolling the window to the bottom of the document
const SCROLL_TO_BOTTOM_JS: &str = "window.scrollTo(0, document.body.scrollHeight);";

/// Poll interval while waiting for the listing container
const CONTAINER_POLL_INTERVAL: Duration = Duration::from_millis(200);

/// What the collection loop needs from a rendered listing
#[async_trait]
pub trait ListingSession: Send {
    /// Whether the listing container has rendered yet
    async fn has_container(&mut self) -> anyhow::Result<bool>;

    /// Current rendered HTML of the page
    async fn page_html(&mut self) -> anyhow::Result<String>;

    /// Scroll to the bottom so the page loads more items
    async fn scroll_to_bottom(&mut self) -> anyhow::Result<()>;
}

/// Listing session backed by a chromiumoxide page
pub struct BrowserListingSession {
    page: Page,
}

impl BrowserListingSession {
    /// Open `url` in a new page and wait for the listing container
    ///
    /// # Errors
    ///
    /// `ScrapeError::LoadTimeout` if the container does not show up within
    /// `load_timeout`; `ScrapeError::Browser` for CDP failures.
    pub async fn open(
        browser: &Browser,
        url: &str,
        load_timeout: Duration,
        stealth: bool,
    ) -> ScrapeResult<Self> {
        // Stealth scripts must be registered on a blank page before navigation
        let page = browser
            .new_page("about:blank")
            .await
            .context("Failed to create blank page")?;

        if stealth {
            if let Err(e) = apply_stealth_measures(&page).await {
                warn!("Stealth injection failed, continuing without it: {e:#}");
            }
        }

        info!("Navigating to listing: {url}");
        page.goto(url)
            .await
            .with_context(|| format!("Failed to navigate to {url}"))?;

        let mut session = Self { page };
        if let Err(e) =
            wait_for_container(&mut session, url, load_timeout, CONTAINER_POLL_INTERVAL).await
        {
            session.close().await;
            return Err(e);
        }
        Ok(session)
    }

    /// Close the page; errors are logged, not returned
    pub async fn close(self) {
        if let Err(e) = self.page.close().await {
            debug!("Failed to close listing page: {e}");
        }
    }
}

#[async_trait]
impl ListingSession for BrowserListingSession {
    async fn has_container(&mut self) -> anyhow::Result<bool> {
        Ok(self.page.find_element(LISTING_CONTAINER_SELECTOR).await.is_ok())
    }

    async fn page_html(&mut self) -> anyhow::Result<String> {
        self.page
            .content()
            .await
            .context("Failed to read rendered listing HTML")
    }

    async fn scroll_to_bottom(&mut self) -> anyhow::Result<()> {
        self.page
            .evaluate(SCROLL_TO_BOTTOM_JS)
            .await
            .context("Failed to scroll listing")?;
        Ok(())
    }
}

/// Poll `session` for the listing container until it appears or `timeout` elapses
///
/// A failed check counts as "not there yet".
///
/// # Errors
///
/// `ScrapeError::LoadTimeout` once `timeout` has passed without the container.
pub async fn wait_for_container<S>(
    session: &mut S,
    url: &str,
    timeout: Duration,
    poll_interval: Duration,
) -> ScrapeResult<()>
where
    S: ListingSession + ?Sized,
{
    let start = Instant::now();

    loop {
        match session.has_container().await {
            Ok(true) => {
                debug!(
                    "Listing container rendered after {:.2}s",
                    start.elapsed().as_secs_f64()
                );
                return Ok(());
            }
            Ok(false) => {}
            Err(e) => debug!("Container check failed: {e:#}"),
        }

        if start.elapsed() >= timeout {
            return Err(ScrapeError::LoadTimeout {
                url: url.to_string(),
                timeout_secs: timeout.as_secs(),
            });
        }

        tokio::time::sleep(poll_interval).await;
    }
}
