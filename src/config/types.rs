//! Core configuration types
//!
//! `ScrapeConfig` drives the listing + detail phases, `DownloadConfig` the
//! media download phase. Both are built through their typestate builders.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Configuration for the scrape command (listing collection + detail fetch)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScrapeConfig {
    /// Search query, already trimmed and non-empty
    pub(crate) query: String,
    /// Site root; search and pin URLs are resolved against it
    pub(crate) base_url: String,
    /// Maximum number of items returned by the collector
    pub(crate) target_count: usize,
    /// Consecutive rounds without new items before the collector stops
    pub(crate) max_stall_rounds: u32,
    /// Metadata file the scrape command writes
    pub(crate) output_file: PathBuf,
    /// Worker count for the detail-fetch pool
    pub(crate) detail_workers: usize,
    pub(crate) headless: bool,
    pub(crate) stealth_mode: bool,
    /// Bound on waiting for the listing container, in seconds
    pub(crate) load_timeout_secs: u64,
    /// Fixed pause after each scroll, in milliseconds
    pub(crate) scroll_pause_ms: u64,
    /// Per-request timeout for detail pages, in seconds
    pub(crate) request_timeout_secs: u64,
    /// Attempts per detail page (first try included)
    pub(crate) max_attempts: u32,
    /// Initial backoff between detail attempts; doubles each retry
    pub(crate) retry_base_delay_ms: u64,
    /// Ceiling for a single backoff delay
    pub(crate) retry_max_delay_ms: u64,
    /// Optional Chrome profile directory; a temp dir is used otherwise
    pub(crate) chrome_data_dir: Option<PathBuf>,
}

/// Configuration for the download command
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DownloadConfig {
    /// Metadata file produced by the scrape command
    pub(crate) input_file: PathBuf,
    /// Directory receiving media and caption files
    pub(crate) output_dir: PathBuf,
    /// Only the first `limit` records are downloaded when set
    pub(crate) limit: Option<usize>,
    /// Worker count for the download pool
    pub(crate) workers: usize,
    /// Extension of the sidecar caption file, without the dot
    pub(crate) caption_ext: String,
    /// Per-request timeout for media fetches, in seconds
    pub(crate) request_timeout_secs: u64,
    /// Media bodies larger than this are rejected
    pub(crate) max_media_bytes: usize,
}
