//! Browser lifecycle for listing collection

use chromiumoxide::browser::Browser;
use std::path::PathBuf;
use tokio::task::JoinHandle;
use tracing::{info, warn};

use crate::browser_setup::launch_browser;
use crate::errors::{ScrapeError, ScrapeResult};

/// Owns a launched browser, its CDP handler task and its temp profile
///
/// The handler must be aborted once the browser is gone or it keeps
/// running; `Drop` does that as a fallback when `shutdown()` was skipped.
pub struct BrowserWrapper {
    browser: Browser,
    handler: JoinHandle<()>,
    /// Only set for profiles this wrapper created and must remove
    temp_profile_dir: Option<PathBuf>,
}

impl BrowserWrapper {
    /// Launch a browser; a temp profile is created unless `chrome_data_dir` is given
    pub async fn launch(headless: bool, chrome_data_dir: Option<PathBuf>) -> ScrapeResult<Self> {
        let owns_profile = chrome_data_dir.is_none();
        let (browser, handler, user_data_dir) = launch_browser(headless, chrome_data_dir)
            .await
            .map_err(|e| ScrapeError::Browser(format!("{e:#}")))?;

        Ok(Self {
            browser,
            handler,
            temp_profile_dir: owns_profile.then_some(user_data_dir),
        })
    }

    #[must_use]
    pub fn browser(&self) -> &Browser {
        &self.browser
    }

    /// Close the browser, wait for the process to exit and remove the temp profile
    pub async fn shutdown(mut self) {
        info!("Shutting down listing browser");

        if let Err(e) = self.browser.close().await {
            warn!("Failed to close browser cleanly: {e}");
        }
        if let Err(e) = self.browser.wait().await {
            warn!("Failed to wait for browser exit: {e}");
        }

        // Chrome must have released its file handles before this runs
        self.cleanup_temp_dir();
    }

    fn cleanup_temp_dir(&mut self) {
        if let Some(path) = self.temp_profile_dir.take() {
            info!("Cleaning up temp directory: {}", path.display());
            if let Err(e) = std::fs::remove_dir_all(&path) {
                warn!(
                    "Failed to clean up temp directory {}: {e}. Manual cleanup may be required.",
                    path.display()
                );
            }
        }
    }
}

impl Drop for BrowserWrapper {
    fn drop(&mut self) {
        self.handler.abort();

        if self.temp_profile_dir.is_some() {
            warn!("BrowserWrapper dropped without shutdown - removing temp dir in Drop");
            self.cleanup_temp_dir();
        }
    }
}
