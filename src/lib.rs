pub mod browser_setup;
pub mod config;
pub mod detail;
pub mod download;
pub mod errors;
pub mod listing;
pub mod metadata;
pub mod pool;
pub mod progress;
pub mod utils;

use std::sync::Arc;

pub use browser_setup::{
    apply_stealth_measures, download_managed_browser, find_browser_executable, launch_browser,
};
pub use config::{DownloadConfig, ScrapeConfig};
pub use detail::{DetailData, DetailFetcher, DetailSource, HttpDetailSource, RetryPolicy};
pub use download::{DownloadOutcome, DownloadSummary, MediaDownloader, download_all};
pub use errors::{ScrapeError, ScrapeResult};
pub use listing::{ListingCollector, ListingSession};
pub use metadata::{ItemRecord, load_records, save_records};
pub use pool::run_pool;
pub use progress::{LogProgress, NoOpProgress, ProgressReporter};

/// Collect listing items for the configured query, enrich them from their
/// detail pages and write the metadata file
///
/// Returns the records that were written.
pub async fn scrape(
    config: ScrapeConfig,
    progress: Arc<dyn ProgressReporter>,
) -> ScrapeResult<Vec<ItemRecord>> {
    let search_url = utils::search_url(config.base_url(), config.query())?;

    let collector = ListingCollector::new(config.clone(), Arc::clone(&progress));
    let records = collector.collect(&search_url).await?;

    let fetcher = Arc::new(DetailFetcher::new(
        HttpDetailSource::new(config.request_timeout())?,
        RetryPolicy::from_config(&config),
    ));
    let records =
        detail::enrich_records(records, config.detail_workers(), fetcher, progress).await?;

    save_records(records.clone(), config.output_file()).await?;
    Ok(records)
}

/// Read the metadata file named in `config` and download every record
pub async fn download(
    config: DownloadConfig,
    progress: Arc<dyn ProgressReporter>,
) -> ScrapeResult<DownloadSummary> {
    let records = load_records(config.input_file()).await?;
    download_all(records, &config, progress).await
}
