//! Media and caption download
//!
//! Each item yields up to two files in the output directory, both named
//! after the last path segment of its media URL:
//! - `stem.ext` with the media bytes
//! - `stem.<caption_ext>` with the comma-joined tags
//!
//! When the media fetch fails for a high-resolution URL, the medium
//! resolution variant is tried once. If that fails too the item is
//! degraded: the caption is still written, the media file is not.

use anyhow::{Context, anyhow};
use futures::StreamExt;
use log::{debug, info, warn};
use reqwest::Client;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use crate::config::DownloadConfig;
use crate::errors::ScrapeResult;
use crate::metadata::ItemRecord;
use crate::pool::run_pool;
use crate::progress::ProgressReporter;
use crate::utils::constants::{CHROME_USER_AGENT, DEFAULT_MAX_MEDIA_BYTES};
use crate::utils::{medium_resolution_fallback, split_media_filename};

/// What `download_item` managed to write
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DownloadOutcome {
    Downloaded {
        media_path: PathBuf,
        caption_path: PathBuf,
    },
    /// Media fetch failed on every candidate URL; caption only
    Degraded { caption_path: PathBuf },
}

/// Counts for a finished download batch
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DownloadSummary {
    pub downloaded: usize,
    pub degraded: usize,
    pub failed: usize,
}

impl DownloadSummary {
    #[must_use]
    pub fn total(&self) -> usize {
        self.downloaded + self.degraded + self.failed
    }
}

/// Fetches media files and writes sidecar captions
#[derive(Debug, Clone)]
pub struct MediaDownloader {
    client: Client,
    caption_ext: String,
    /// Bodies larger than this are rejected, by header and while streaming
    max_media_bytes: usize,
}

impl MediaDownloader {
    /// Build a downloader with a per-request timeout
    pub fn new(request_timeout: Duration, caption_ext: impl Into<String>) -> ScrapeResult<Self> {
        let client = Client::builder()
            .timeout(request_timeout)
            .user_agent(CHROME_USER_AGENT)
            .build()?;

        Ok(Self::with_client(client, caption_ext))
    }

    #[must_use]
    pub fn with_client(client: Client, caption_ext: impl Into<String>) -> Self {
        Self {
            client,
            caption_ext: caption_ext.into(),
            max_media_bytes: DEFAULT_MAX_MEDIA_BYTES,
        }
    }

    #[must_use]
    pub fn with_max_media_bytes(mut self, bytes: usize) -> Self {
        self.max_media_bytes = bytes;
        self
    }

    pub fn from_config(config: &DownloadConfig) -> ScrapeResult<Self> {
        Ok(Self::new(config.request_timeout(), config.caption_ext())?
            .with_max_media_bytes(config.max_media_bytes()))
    }

    /// Download one item's media and write its caption
    ///
    /// # Errors
    ///
    /// `ScrapeError::MalformedUrl` if no file name can be derived from the
    /// media URL, `ScrapeError::Io` if a file cannot be written. A failed
    /// media fetch is not an error, see [`DownloadOutcome::Degraded`].
    pub async fn download_item(
        &self,
        item: &ItemRecord,
        output_dir: &Path,
    ) -> ScrapeResult<DownloadOutcome> {
        let (stem, ext) = split_media_filename(&item.media_src)?;
        let media_path = output_dir.join(format!("{stem}.{ext}"));
        let caption_path = output_dir.join(format!("{stem}.{}", self.caption_ext));

        let media = self.fetch_with_fallback(&item.media_src).await;

        tokio::fs::write(&caption_path, item.tags.join(", ")).await?;

        match media {
            Some(bytes) => {
                tokio::fs::write(&media_path, bytes).await?;
                Ok(DownloadOutcome::Downloaded {
                    media_path,
                    caption_path,
                })
            }
            None => Ok(DownloadOutcome::Degraded { caption_path }),
        }
    }

    /// Fetch `src`, then its medium-resolution variant once if that exists
    async fn fetch_with_fallback(&self, src: &str) -> Option<Vec<u8>> {
        let first_error = match self.fetch_bytes(src).await {
            Ok(bytes) => return Some(bytes),
            Err(e) => e,
        };

        let Some(fallback) = medium_resolution_fallback(src) else {
            warn!("Media fetch failed for {src}: {first_error:#}");
            return None;
        };

        debug!("Media fetch failed for {src} ({first_error:#}), trying {fallback}");
        match self.fetch_bytes(&fallback).await {
            Ok(bytes) => Some(bytes),
            Err(e) => {
                warn!("Media fetch failed for {src} and fallback {fallback}: {e:#}");
                None
            }
        }
    }

    async fn fetch_bytes(&self, url: &str) -> anyhow::Result<Vec<u8>> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .context("Failed to request media")?;

        let status = response.status();
        if !status.is_success() {
            return Err(anyhow!("Media download failed with status: {status}"));
        }

        // Enforce the limit before allocating anything for the body
        let expected_size = response.content_length().unwrap_or(0);
        if expected_size > self.max_media_bytes as u64 {
            return Err(anyhow!(
                "Media too large: {expected_size} bytes exceeds limit of {} bytes",
                self.max_media_bytes
            ));
        }

        let mut buffer = Vec::with_capacity(usize::try_from(expected_size).unwrap_or(0));
        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.context("Failed to read media body")?;

            // The header may be missing or wrong
            let new_total = buffer.len() + chunk.len();
            if new_total > self.max_media_bytes {
                return Err(anyhow!(
                    "Media exceeded size limit during download: {new_total} bytes (max: {})",
                    self.max_media_bytes
                ));
            }
            buffer.extend_from_slice(&chunk);
        }

        Ok(buffer)
    }
}

/// Download every record with a bounded worker pool
///
/// The output directory is created once up front. Per-item failures are
/// logged and counted; they never stop the batch.
///
/// # Errors
///
/// Only batch-level failures: the output directory cannot be created, the
/// HTTP client cannot be built, or a pool worker panicked.
pub async fn download_all(
    mut records: Vec<ItemRecord>,
    config: &DownloadConfig,
    progress: Arc<dyn ProgressReporter>,
) -> ScrapeResult<DownloadSummary> {
    if let Some(limit) = config.limit() {
        records.truncate(limit);
    }

    let output_dir = config.output_dir().to_path_buf();
    tokio::fs::create_dir_all(&output_dir).await?;
    info!(
        "Downloading {} items into {} with {} workers",
        records.len(),
        output_dir.display(),
        config.workers()
    );

    let downloader = Arc::new(MediaDownloader::from_config(config)?);
    let output_dir = Arc::new(output_dir);

    let outcomes = run_pool(records, config.workers(), move |record: ItemRecord| {
        let downloader = Arc::clone(&downloader);
        let output_dir = Arc::clone(&output_dir);
        let progress = Arc::clone(&progress);
        async move {
            let outcome = downloader.download_item(&record, &output_dir).await;
            match &outcome {
                Ok(DownloadOutcome::Downloaded { media_path, .. }) => {
                    progress.report_downloaded(&file_name(media_path));
                }
                Ok(DownloadOutcome::Degraded { caption_path }) => {
                    progress.report_degraded(&file_name(caption_path));
                }
                Err(e) => progress.report_item_failed(&record.media_src, &e.to_string()),
            }
            outcome
        }
    })
    .await?;

    let summary = outcomes
        .iter()
        .fold(DownloadSummary::default(), |mut acc, outcome| {
            match outcome {
                Ok(DownloadOutcome::Downloaded { .. }) => acc.downloaded += 1,
                Ok(DownloadOutcome::Degraded { .. }) => acc.degraded += 1,
                Err(_) => acc.failed += 1,
            }
            acc
        });

    Ok(summary)
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default()
}
