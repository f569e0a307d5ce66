//! Error types for scraping and downloading
//!
//! One taxonomy for the whole crate. Stall and count-reached are normal
//! terminations of the listing loop and never show up here; a degraded
//! download is an outcome, not an error.

use thiserror::Error;

/// Result type alias for scrape operations
pub type ScrapeResult<T> = Result<T, ScrapeError>;

/// Error types for scrape and download operations
#[derive(Debug, Error)]
pub enum ScrapeError {
    /// The listing container never rendered within the wait bound
    #[error("Listing page {url} did not render its container within {timeout_secs}s")]
    LoadTimeout { url: String, timeout_secs: u64 },

    /// A detail page could not be fetched or parsed after all attempts
    #[error("Detail fetch for {url} failed after {attempts} attempts: {message}")]
    DetailFetch {
        url: String,
        attempts: u32,
        message: String,
    },

    /// A media URL has no extractable filename and extension
    #[error("Media URL has no filename with an extension: {0}")]
    MalformedUrl(String),

    /// Browser launch or CDP failure
    #[error("Browser error: {0}")]
    Browser(String),

    /// Invalid configuration value
    #[error("Configuration error: {0}")]
    Config(String),

    /// A pool worker task failed to complete
    #[error("Worker pool error: {0}")]
    Pool(String),

    /// HTTP client error
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Metadata (de)serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl From<anyhow::Error> for ScrapeError {
    fn from(err: anyhow::Error) -> Self {
        // {:#} keeps the context chain
        Self::Browser(format!("{err:#}"))
    }
}

