//! Builder methods available for all states
//!
//! Optional settings can be applied before or after the required fields.

use std::path::PathBuf;

use super::builder::{DownloadConfigBuilder, ScrapeConfigBuilder};

impl<State> ScrapeConfigBuilder<State> {
    /// Site root the search and pin URLs are resolved against
    ///
    /// Mostly useful for pointing the scraper at a local mirror in tests.
    #[must_use]
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    #[must_use]
    pub fn target_count(mut self, count: usize) -> Self {
        self.target_count = count;
        self
    }

    /// Consecutive scroll rounds without new items before collection stops
    #[must_use]
    pub fn max_stall_rounds(mut self, rounds: u32) -> Self {
        self.max_stall_rounds = rounds;
        self
    }

    #[must_use]
    pub fn output_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.output_file = path.into();
        self
    }

    #[must_use]
    pub fn detail_workers(mut self, workers: usize) -> Self {
        self.detail_workers = workers;
        self
    }

    /// Set browser headless mode
    ///
    /// Headed mode needs a display server and is only meant for watching the
    /// scroll loop while debugging selectors.
    #[must_use]
    pub fn headless(mut self, headless: bool) -> Self {
        self.headless = headless;
        self
    }

    #[must_use]
    pub fn stealth_mode(mut self, enabled: bool) -> Self {
        self.stealth_mode = enabled;
        self
    }

    #[must_use]
    pub fn load_timeout_secs(mut self, secs: u64) -> Self {
        self.load_timeout_secs = secs;
        self
    }

    #[must_use]
    pub fn scroll_pause_ms(mut self, ms: u64) -> Self {
        self.scroll_pause_ms = ms;
        self
    }

    #[must_use]
    pub fn request_timeout_secs(mut self, secs: u64) -> Self {
        self.request_timeout_secs = secs;
        self
    }

    /// Attempts per detail page, first try included (default: 8)
    #[must_use]
    pub fn max_attempts(mut self, attempts: u32) -> Self {
        self.max_attempts = attempts;
        self
    }

    /// Backoff window for detail retries
    ///
    /// The delay starts at `base_ms`, doubles per retry and never exceeds
    /// `max_ms`. A little random jitter is added on top.
    #[must_use]
    pub fn retry_delays_ms(mut self, base_ms: u64, max_ms: u64) -> Self {
        self.retry_base_delay_ms = base_ms;
        self.retry_max_delay_ms = max_ms;
        self
    }

    #[must_use]
    pub fn chrome_data_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.chrome_data_dir = Some(dir.into());
        self
    }
}

impl<State> DownloadConfigBuilder<State> {
    /// Download only the first `limit` records of the metadata file
    ///
    /// `Some(0)` is treated like `None`.
    #[must_use]
    pub fn limit(mut self, limit: Option<usize>) -> Self {
        self.limit = limit;
        self
    }

    #[must_use]
    pub fn workers(mut self, workers: usize) -> Self {
        self.workers = workers;
        self
    }

    /// Caption file extension; a leading dot is stripped
    #[must_use]
    pub fn caption_ext(mut self, ext: impl Into<String>) -> Self {
        self.caption_ext = ext.into();
        self
    }

    #[must_use]
    pub fn request_timeout_secs(mut self, secs: u64) -> Self {
        self.request_timeout_secs = secs;
        self
    }

    /// Reject media bodies larger than `bytes`; the item is then caption-only
    #[must_use]
    pub fn max_media_bytes(mut self, bytes: usize) -> Self {
        self.max_media_bytes = bytes;
        self
    }
}
