//! Detail page fetching
//!
//! Visits each item's own page to pick up its tags and, when available, a
//! better media URL than the listing thumbnail.

mod fetcher;
mod retry;
pub mod strategies;

pub use fetcher::{DetailFetcher, DetailSource, HttpDetailSource, enrich_records};
pub use retry::{RetryExhausted, RetryPolicy, retry_with_backoff};
pub use strategies::{
    CloseupLayout, DetailStrategy, PageContainerLayout, default_strategies, extract_detail,
};

/// What a detail page contributes to an item record
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DetailData {
    /// Tags in page order
    pub tags: Vec<String>,
    /// Video poster or full-size image URL, if the page exposes one
    pub media_src: Option<String>,
}
