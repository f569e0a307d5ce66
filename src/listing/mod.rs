//! Listing collection
//!
//! Loads the search listing in a headless browser, scrolls it to trigger
//! lazy loading and collects deduplicated item records until enough items
//! were found or the listing stops growing.

mod browser;
mod collector;
mod parser;
mod session;

pub use browser::BrowserWrapper;
pub use collector::{
    CollectLimits, Collection, ListingCollector, StopReason, collect_from,
};
pub use parser::{LISTING_CONTAINER_SELECTOR, parse_listing};
pub use session::{BrowserListingSession, ListingSession, wait_for_container};
