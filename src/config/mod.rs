//! Configuration module for scraping and downloading
//!
//! Provides `ScrapeConfig` and `DownloadConfig` with type-safe builders that
//! enforce required fields at compile time and fill in sensible defaults.

// Sub-modules
pub mod builder;
pub mod getters;
pub mod methods;
pub mod types;

// Re-exports for public API
pub use builder::{
    DownloadConfigBuilder, ScrapeConfigBuilder, WithInput, WithOutputDir, WithQuery,
};
pub use types::{DownloadConfig, ScrapeConfig};
