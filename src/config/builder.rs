//! Type-safe builders using the typestate pattern
//!
//! Required fields move the builder into a new state; `build()` only exists
//! once every required field has been provided.

use anyhow::{Result, anyhow};
use std::marker::PhantomData;
use std::path::PathBuf;

use super::types::{DownloadConfig, ScrapeConfig};
use crate::utils::{
    BASE_URL, DEFAULT_CAPTION_EXT, DEFAULT_DETAIL_WORKERS, DEFAULT_DOWNLOAD_WORKERS,
    DEFAULT_MAX_MEDIA_BYTES, DEFAULT_MAX_STALL_ROUNDS, DEFAULT_OUTPUT_FILE, DEFAULT_TARGET_COUNT,
    DETAIL_MAX_ATTEMPTS, DETAIL_REQUEST_TIMEOUT_SECS, LISTING_LOAD_TIMEOUT_SECS,
    MEDIA_REQUEST_TIMEOUT_SECS, RETRY_BASE_DELAY_MS, RETRY_MAX_DELAY_MS, SCROLL_PAUSE_MS,
};

// Type states for the builders
pub struct WithQuery;
pub struct WithInput;
pub struct WithOutputDir;

pub struct ScrapeConfigBuilder<State = ()> {
    pub(crate) query: Option<String>,
    pub(crate) base_url: String,
    pub(crate) target_count: usize,
    pub(crate) max_stall_rounds: u32,
    pub(crate) output_file: PathBuf,
    pub(crate) detail_workers: usize,
    pub(crate) headless: bool,
    pub(crate) stealth_mode: bool,
    pub(crate) load_timeout_secs: u64,
    pub(crate) scroll_pause_ms: u64,
    pub(crate) request_timeout_secs: u64,
    pub(crate) max_attempts: u32,
    pub(crate) retry_base_delay_ms: u64,
    pub(crate) retry_max_delay_ms: u64,
    pub(crate) chrome_data_dir: Option<PathBuf>,
    pub(crate) _phantom: PhantomData<State>,
}

impl Default for ScrapeConfigBuilder<()> {
    fn default() -> Self {
        Self {
            query: None,
            base_url: BASE_URL.to_string(),
            target_count: DEFAULT_TARGET_COUNT,
            max_stall_rounds: DEFAULT_MAX_STALL_ROUNDS,
            output_file: PathBuf::from(DEFAULT_OUTPUT_FILE),
            detail_workers: DEFAULT_DETAIL_WORKERS,
            headless: true,
            stealth_mode: true,
            load_timeout_secs: LISTING_LOAD_TIMEOUT_SECS,
            scroll_pause_ms: SCROLL_PAUSE_MS,
            request_timeout_secs: DETAIL_REQUEST_TIMEOUT_SECS,
            max_attempts: DETAIL_MAX_ATTEMPTS,
            retry_base_delay_ms: RETRY_BASE_DELAY_MS,
            retry_max_delay_ms: RETRY_MAX_DELAY_MS,
            chrome_data_dir: None,
            _phantom: PhantomData,
        }
    }
}

impl ScrapeConfig {
    /// Create a builder for configuring a `ScrapeConfig` with a fluent interface
    #[must_use]
    pub fn builder() -> ScrapeConfigBuilder<()> {
        ScrapeConfigBuilder::default()
    }
}

impl<State> ScrapeConfigBuilder<State> {
    fn into_state<Next>(self) -> ScrapeConfigBuilder<Next> {
        ScrapeConfigBuilder {
            query: self.query,
            base_url: self.base_url,
            target_count: self.target_count,
            max_stall_rounds: self.max_stall_rounds,
            output_file: self.output_file,
            detail_workers: self.detail_workers,
            headless: self.headless,
            stealth_mode: self.stealth_mode,
            load_timeout_secs: self.load_timeout_secs,
            scroll_pause_ms: self.scroll_pause_ms,
            request_timeout_secs: self.request_timeout_secs,
            max_attempts: self.max_attempts,
            retry_base_delay_ms: self.retry_base_delay_ms,
            retry_max_delay_ms: self.retry_max_delay_ms,
            chrome_data_dir: self.chrome_data_dir,
            _phantom: PhantomData,
        }
    }
}

impl ScrapeConfigBuilder<()> {
    pub fn query(mut self, query: impl Into<String>) -> ScrapeConfigBuilder<WithQuery> {
        self.query = Some(query.into());
        self.into_state()
    }
}

// Build method only available when the query is set
impl ScrapeConfigBuilder<WithQuery> {
    pub fn build(self) -> Result<ScrapeConfig> {
        let query = self
            .query
            .map(|q| q.trim().to_string())
            .filter(|q| !q.is_empty())
            .ok_or_else(|| anyhow!("query must not be empty"))?;

        if self.detail_workers == 0 {
            return Err(anyhow!("detail_workers must be at least 1"));
        }
        if self.max_attempts == 0 {
            return Err(anyhow!("max_attempts must be at least 1"));
        }
        url::Url::parse(&self.base_url)
            .map_err(|e| anyhow!("Invalid base URL '{}': {e}", self.base_url))?;

        Ok(ScrapeConfig {
            query,
            base_url: self.base_url,
            target_count: self.target_count,
            max_stall_rounds: self.max_stall_rounds,
            output_file: self.output_file,
            detail_workers: self.detail_workers,
            headless: self.headless,
            stealth_mode: self.stealth_mode,
            load_timeout_secs: self.load_timeout_secs,
            scroll_pause_ms: self.scroll_pause_ms,
            request_timeout_secs: self.request_timeout_secs,
            max_attempts: self.max_attempts,
            retry_base_delay_ms: self.retry_base_delay_ms,
            retry_max_delay_ms: self.retry_max_delay_ms.max(self.retry_base_delay_ms),
            chrome_data_dir: self.chrome_data_dir,
        })
    }
}

pub struct DownloadConfigBuilder<State = ()> {
    pub(crate) input_file: Option<PathBuf>,
    pub(crate) output_dir: Option<PathBuf>,
    pub(crate) limit: Option<usize>,
    pub(crate) workers: usize,
    pub(crate) caption_ext: String,
    pub(crate) request_timeout_secs: u64,
    pub(crate) max_media_bytes: usize,
    pub(crate) _phantom: PhantomData<State>,
}

impl Default for DownloadConfigBuilder<()> {
    fn default() -> Self {
        Self {
            input_file: None,
            output_dir: None,
            limit: None,
            workers: DEFAULT_DOWNLOAD_WORKERS,
            caption_ext: DEFAULT_CAPTION_EXT.to_string(),
            request_timeout_secs: MEDIA_REQUEST_TIMEOUT_SECS,
            max_media_bytes: DEFAULT_MAX_MEDIA_BYTES,
            _phantom: PhantomData,
        }
    }
}

impl DownloadConfig {
    /// Create a builder for configuring a `DownloadConfig` with a fluent interface
    #[must_use]
    pub fn builder() -> DownloadConfigBuilder<()> {
        DownloadConfigBuilder::default()
    }
}

impl<State> DownloadConfigBuilder<State> {
    fn into_state<Next>(self) -> DownloadConfigBuilder<Next> {
        DownloadConfigBuilder {
            input_file: self.input_file,
            output_dir: self.output_dir,
            limit: self.limit,
            workers: self.workers,
            caption_ext: self.caption_ext,
            request_timeout_secs: self.request_timeout_secs,
            max_media_bytes: self.max_media_bytes,
            _phantom: PhantomData,
        }
    }
}

impl DownloadConfigBuilder<()> {
    pub fn input_file(mut self, path: impl Into<PathBuf>) -> DownloadConfigBuilder<WithInput> {
        self.input_file = Some(path.into());
        self.into_state()
    }
}

impl DownloadConfigBuilder<WithInput> {
    pub fn output_dir(mut self, dir: impl Into<PathBuf>) -> DownloadConfigBuilder<WithOutputDir> {
        self.output_dir = Some(dir.into());
        self.into_state()
    }
}

// Build method only available when input and output are set
impl DownloadConfigBuilder<WithOutputDir> {
    pub fn build(self) -> Result<DownloadConfig> {
        if self.workers == 0 {
            return Err(anyhow!("workers must be at least 1"));
        }
        if self.max_media_bytes == 0 {
            return Err(anyhow!("max_media_bytes must be at least 1"));
        }

        let caption_ext = self.caption_ext.trim_start_matches('.').to_string();
        if caption_ext.is_empty() {
            return Err(anyhow!("caption_ext must not be empty"));
        }

        Ok(DownloadConfig {
            input_file: self
                .input_file
                .ok_or_else(|| anyhow!("input_file is required"))?,
            output_dir: self
                .output_dir
                .ok_or_else(|| anyhow!("output_dir is required"))?,
            // 0 means "everything", as on the command line
            limit: self.limit.filter(|&n| n > 0),
            workers: self.workers,
            caption_ext,
            request_timeout_secs: self.request_timeout_secs,
            max_media_bytes: self.max_media_bytes,
        })
    }
}
