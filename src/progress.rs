//! Progress reporting for scrape and download runs
//!
//! Defines the `ProgressReporter` trait for per-round and per-item events,
//! a logging implementation for the CLI and a no-op one for library use.

use tracing::{info, warn};

/// Trait for reporting progress at key points of a run
///
/// Implementations can log, update a UI, count events, etc.
pub trait ProgressReporter: Send + Sync {
    /// The browser is up and the listing page is loading
    fn report_browser_launched(&self);

    /// A scroll-and-parse round of the listing finished
    fn report_listing_round(&self, round: u32, collected: usize, new_items: usize);

    /// Tags and media URL were fetched for a detail page
    fn report_detail_fetched(&self, page_url: &str);

    /// A media file and its caption were written
    fn report_downloaded(&self, file_name: &str);

    /// Media fetch failed; only the caption file was written
    fn report_degraded(&self, file_name: &str);

    /// An item could not be processed at all
    fn report_item_failed(&self, item: &str, error: &str);
}

/// Progress reporter that does nothing
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOpProgress;

impl ProgressReporter for NoOpProgress {
    #[inline(always)]
    fn report_browser_launched(&self) {}

    #[inline(always)]
    fn report_listing_round(&self, _round: u32, _collected: usize, _new_items: usize) {}

    #[inline(always)]
    fn report_detail_fetched(&self, _page_url: &str) {}

    #[inline(always)]
    fn report_downloaded(&self, _file_name: &str) {}

    #[inline(always)]
    fn report_degraded(&self, _file_name: &str) {}

    #[inline(always)]
    fn report_item_failed(&self, _item: &str, _error: &str) {}
}

/// Progress reporter that writes one log line per event
#[derive(Debug, Clone, Copy, Default)]
pub struct LogProgress;

impl ProgressReporter for LogProgress {
    fn report_browser_launched(&self) {
        info!("Browser launched, loading listing");
    }

    fn report_listing_round(&self, round: u32, collected: usize, new_items: usize) {
        info!("Round {round}: collected {collected} items (+{new_items})");
    }

    fn report_detail_fetched(&self, page_url: &str) {
        info!("Detail data fetched: {page_url}");
    }

    fn report_downloaded(&self, file_name: &str) {
        info!("Downloaded: {file_name}");
    }

    fn report_degraded(&self, file_name: &str) {
        warn!("Media unavailable, wrote caption only: {file_name}");
    }

    fn report_item_failed(&self, item: &str, error: &str) {
        warn!("Failed: {item}: {error}");
    }
}
