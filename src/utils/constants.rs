//! Shared configuration constants for pinscrape
//!
//! Default values and scraping-adapter constants used throughout the
//! codebase. DOM selectors live next to the code that uses them; the values
//! here are the ones that cross module boundaries.

/// Site root used to build search URLs and absolute pin URLs
pub const BASE_URL: &str = "https://www.pinterest.com";

/// Path of the pin search listing, relative to [`BASE_URL`]
pub const SEARCH_PATH: &str = "/search/pins/";

/// Default number of items collected from the listing
pub const DEFAULT_TARGET_COUNT: usize = 30;

/// Default number of consecutive unproductive scroll rounds before giving up
pub const DEFAULT_MAX_STALL_ROUNDS: u32 = 10;

/// Default worker count for the detail-fetch phase
pub const DEFAULT_DETAIL_WORKERS: usize = 100;

/// Default worker count for the download phase
pub const DEFAULT_DOWNLOAD_WORKERS: usize = 10;

/// Default extension of the sidecar caption file
pub const DEFAULT_CAPTION_EXT: &str = "caption";

/// Default metadata file written by the scrape command
pub const DEFAULT_OUTPUT_FILE: &str = "output.json";

/// Seconds to wait for the listing container to render
pub const LISTING_LOAD_TIMEOUT_SECS: u64 = 10;

/// Pause after each scroll so lazy-loaded items can render
pub const SCROLL_PAUSE_MS: u64 = 1000;

/// Per-request timeout for detail page fetches
pub const DETAIL_REQUEST_TIMEOUT_SECS: u64 = 30;

/// Per-request timeout for media downloads
pub const MEDIA_REQUEST_TIMEOUT_SECS: u64 = 60;

/// Largest media body accepted by the downloader (64 MiB)
pub const DEFAULT_MAX_MEDIA_BYTES: usize = 64 * 1024 * 1024;

/// Attempts made per detail page before the item is given up on
pub const DETAIL_MAX_ATTEMPTS: u32 = 8;

/// First backoff delay between detail attempts; doubles per attempt
pub const RETRY_BASE_DELAY_MS: u64 = 500;

/// Ceiling for a single backoff delay
pub const RETRY_MAX_DELAY_MS: u64 = 30_000;

/// Resolution segment of listing thumbnails
pub const THUMBNAIL_SEGMENT: &str = "236x";

/// Resolution segment of full-size originals
pub const ORIGINALS_SEGMENT: &str = "originals";

/// High-resolution path segment that has a medium-resolution fallback
pub const HIGH_RES_PATH: &str = "/originals/";

/// Medium-resolution path segment used when the original is unavailable
pub const MEDIUM_RES_PATH: &str = "/736x/";

/// Chrome user agent string for stealth mode
///
/// Updated: 2025-01-29 to Chrome 132 (current stable)
pub const CHROME_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/132.0.6834.160 Safari/537.36";

/// Language pinned for the browser and HTTP requests so tag text is English
pub const ACCEPT_LANGUAGE: &str = "en-US,en;q=0.9";
