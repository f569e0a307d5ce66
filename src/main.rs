//! pinscrape command line: `scrape` writes a metadata file, `download`
//! fetches the media it lists.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use pinscrape::utils::constants::{
    DEFAULT_CAPTION_EXT, DEFAULT_DETAIL_WORKERS, DEFAULT_DOWNLOAD_WORKERS,
    DEFAULT_MAX_STALL_ROUNDS, DEFAULT_OUTPUT_FILE, DEFAULT_TARGET_COUNT, DETAIL_MAX_ATTEMPTS,
    LISTING_LOAD_TIMEOUT_SECS, SCROLL_PAUSE_MS,
};
use pinscrape::{DownloadConfig, LogProgress, ProgressReporter, ScrapeConfig};

#[derive(Parser)]
#[command(
    name = "pinscrape",
    about = "Scrape image search results with tags, then download the media and captions",
    version
)]
struct Cli {
    /// Log at debug level (RUST_LOG takes precedence when set)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Collect items for a search query and write them to a metadata file
    Scrape {
        /// Search query
        query: String,

        /// Maximum number of items to collect
        #[arg(short, long, default_value_t = DEFAULT_TARGET_COUNT)]
        limit: usize,

        /// Metadata file to write
        #[arg(short, long, default_value = DEFAULT_OUTPUT_FILE)]
        output: PathBuf,

        /// Scroll rounds without new items before giving up
        #[arg(long, default_value_t = DEFAULT_MAX_STALL_ROUNDS)]
        trial: u32,

        /// Concurrent detail page fetches
        #[arg(long, default_value_t = DEFAULT_DETAIL_WORKERS)]
        batch_size: usize,

        /// Show the browser window
        #[arg(long)]
        headed: bool,

        /// Pause after each scroll, in milliseconds
        #[arg(long, default_value_t = SCROLL_PAUSE_MS)]
        scroll_pause_ms: u64,

        /// How long to wait for the listing to render, in seconds
        #[arg(long, default_value_t = LISTING_LOAD_TIMEOUT_SECS)]
        load_timeout_secs: u64,

        /// Attempts per detail page
        #[arg(long, default_value_t = DETAIL_MAX_ATTEMPTS)]
        max_attempts: u32,
    },

    /// Download media and caption files listed in a metadata file
    Download {
        /// Metadata file written by `scrape`
        input: PathBuf,

        /// Directory for media and caption files
        #[arg(short, long)]
        output: PathBuf,

        /// Only download the first N items
        #[arg(short, long)]
        limit: Option<usize>,

        /// Concurrent downloads
        #[arg(long, default_value_t = DEFAULT_DOWNLOAD_WORKERS)]
        batch_size: usize,

        /// Caption file extension
        #[arg(long, default_value = DEFAULT_CAPTION_EXT)]
        caption_ext: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose)?;

    let progress: Arc<dyn ProgressReporter> = Arc::new(LogProgress);

    match cli.command {
        Commands::Scrape {
            query,
            limit,
            output,
            trial,
            batch_size,
            headed,
            scroll_pause_ms,
            load_timeout_secs,
            max_attempts,
        } => {
            let config = ScrapeConfig::builder()
                .query(query)
                .target_count(limit)
                .output_file(&output)
                .max_stall_rounds(trial)
                .detail_workers(batch_size)
                .headless(!headed)
                .scroll_pause_ms(scroll_pause_ms)
                .load_timeout_secs(load_timeout_secs)
                .max_attempts(max_attempts)
                .build()
                .context("Invalid scrape options")?;

            let records = pinscrape::scrape(config, progress)
                .await
                .context("Scrape failed")?;
            let tagged = records.iter().filter(|r| !r.tags.is_empty()).count();

            println!(
                "Scraped {} items ({tagged} with tags) into {}",
                records.len(),
                output.display()
            );
        }
        Commands::Download {
            input,
            output,
            limit,
            batch_size,
            caption_ext,
        } => {
            let config = DownloadConfig::builder()
                .input_file(&input)
                .output_dir(&output)
                .limit(limit)
                .workers(batch_size)
                .caption_ext(caption_ext)
                .build()
                .context("Invalid download options")?;

            let summary = pinscrape::download(config, progress)
                .await
                .with_context(|| format!("Download from {} failed", input.display()))?;

            println!(
                "Downloaded {} of {} items into {} ({} caption only, {} failed)",
                summary.downloaded,
                summary.total(),
                output.display(),
                summary.degraded,
                summary.failed
            );
        }
    }

    Ok(())
}

fn init_logging(verbose: bool) -> Result<()> {
    let default_level = if verbose { "debug" } else { "info" };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level))
        // CDP chatter about events chromiumoxide cannot deserialize
        .add_directive("chromiumoxide::handler=off".parse()?)
        .add_directive("chromiumoxide::conn=off".parse()?);

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .try_init()
        .context("Failed to install log subscriber")?;

    Ok(())
}
