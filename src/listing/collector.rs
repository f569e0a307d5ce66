//! The scroll-and-collect loop

use ahash::AHashSet;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

use super::browser::BrowserWrapper;
use super::parser::parse_listing;
use super::session::{BrowserListingSession, ListingSession};
use crate::config::ScrapeConfig;
use crate::errors::ScrapeResult;
use crate::metadata::ItemRecord;
use crate::progress::ProgressReporter;

/// Termination bounds of the collection loop
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CollectLimits {
    /// Stop once this many unique items are known; also the output cap
    pub target_count: usize,
    /// Stop after this many consecutive rounds without a new item
    pub max_stall_rounds: u32,
    /// Fixed pause after each scroll
    pub scroll_pause: Duration,
}

impl CollectLimits {
    #[must_use]
    pub fn from_config(config: &ScrapeConfig) -> Self {
        Self {
            target_count: config.target_count(),
            max_stall_rounds: config.max_stall_rounds(),
            scroll_pause: config.scroll_pause(),
        }
    }
}

/// Why the loop ended; neither case is an error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    TargetReached,
    Stalled,
}

/// Result of a collection run
#[derive(Debug, Clone)]
pub struct Collection {
    /// Unique records in discovery order, at most `target_count`
    pub records: Vec<ItemRecord>,
    pub rounds: u32,
    pub stop_reason: StopReason,
}

/// Loop state owned by a single collection run
#[derive(Default)]
struct CollectState {
    seen: AHashSet<String>,
    records: Vec<ItemRecord>,
    stall_rounds: u32,
    rounds: u32,
}

impl CollectState {
    /// Append unseen records in order, returning how many were new
    fn absorb(&mut self, batch: Vec<ItemRecord>) -> usize {
        let before = self.records.len();
        for record in batch {
            if self.seen.insert(record.item_url().to_string()) {
                self.records.push(record);
            }
        }
        self.records.len() - before
    }
}

/// Run the collection loop against an already loaded listing
///
/// Each round parses the rendered page, keeps unseen items, then either
/// stops (target reached / stall limit hit) or scrolls and pauses. The
/// stall counter resets whenever a round finds something new. A failed page
/// read after the first round counts as an unproductive round.
///
/// # Errors
///
/// Only a failed page read in the very first round is returned.
pub async fn collect_from<S>(
    session: &mut S,
    base_url: &str,
    limits: CollectLimits,
    progress: &dyn ProgressReporter,
) -> ScrapeResult<Collection>
where
    S: ListingSession + ?Sized,
{
    let mut state = CollectState::default();

    let stop_reason = loop {
        let new_items = match session.page_html().await {
            Ok(html) => state.absorb(parse_listing(&html, base_url)),
            // Nothing collected yet, so there is nothing worth keeping
            Err(e) if state.rounds == 0 => return Err(e.into()),
            Err(e) => {
                warn!("Reading the listing failed in round {}: {e:#}", state.rounds + 1);
                0
            }
        };
        state.rounds += 1;
        progress.report_listing_round(state.rounds, state.records.len(), new_items);

        if state.records.len() >= limits.target_count {
            break StopReason::TargetReached;
        }

        if new_items == 0 {
            state.stall_rounds += 1;
            if state.stall_rounds >= limits.max_stall_rounds {
                break StopReason::Stalled;
            }
        } else {
            state.stall_rounds = 0;
        }

        // A failed scroll just makes the next round unproductive
        if let Err(e) = session.scroll_to_bottom().await {
            warn!("Scroll failed in round {}: {e:#}", state.rounds);
        }
        tokio::time::sleep(limits.scroll_pause).await;
    };

    state.records.truncate(limits.target_count);
    info!(
        "Listing collection finished after {} rounds ({stop_reason:?}): {} items",
        state.rounds,
        state.records.len()
    );

    Ok(Collection {
        records: state.records,
        rounds: state.rounds,
        stop_reason,
    })
}

/// Collects item records from a search listing in a headless browser
///
/// Owns nothing across runs: every `collect` launches its own browser and
/// tears it down afterwards.
pub struct ListingCollector {
    config: ScrapeConfig,
    progress: Arc<dyn ProgressReporter>,
}

impl ListingCollector {
    #[must_use]
    pub fn new(config: ScrapeConfig, progress: Arc<dyn ProgressReporter>) -> Self {
        Self { config, progress }
    }

    /// Load `search_url` and collect up to the configured target count
    ///
    /// # Errors
    ///
    /// `ScrapeError::LoadTimeout` when the listing never renders,
    /// `ScrapeError::Browser` for launch or CDP failures.
    pub async fn collect(&self, search_url: &str) -> ScrapeResult<Vec<ItemRecord>> {
        let wrapper = BrowserWrapper::launch(
            self.config.headless(),
            self.config.chrome_data_dir().cloned(),
        )
        .await?;
        self.progress.report_browser_launched();

        let outcome = self.collect_in(&wrapper, search_url).await;
        wrapper.shutdown().await;

        outcome.map(|collection| collection.records)
    }

    async fn collect_in(
        &self,
        wrapper: &BrowserWrapper,
        search_url: &str,
    ) -> ScrapeResult<Collection> {
        let mut session = BrowserListingSession::open(
            wrapper.browser(),
            search_url,
            self.config.load_timeout(),
            self.config.stealth_mode(),
        )
        .await?;

        let outcome = collect_from(
            &mut session,
            self.config.base_url(),
            CollectLimits::from_config(&self.config),
            self.progress.as_ref(),
        )
        .await;

        session.close().await;
        outcome
    }
}
