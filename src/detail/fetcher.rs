use anyhow::{Context, anyhow};
use async_trait::async_trait;
use reqwest::Client;
use reqwest::header::{ACCEPT_LANGUAGE, HeaderMap, HeaderValue};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

use super::retry::{RetryPolicy, retry_with_backoff};
use super::strategies::{DetailStrategy, default_strategies, extract_detail};
use super::DetailData;
use crate::errors::{ScrapeError, ScrapeResult};
use crate::metadata::ItemRecord;
use crate::pool::run_pool;
use crate::progress::ProgressReporter;
use crate::utils::constants::{ACCEPT_LANGUAGE as LANGUAGES, CHROME_USER_AGENT};

/// Transport that returns the HTML of a detail page
#[async_trait]
pub trait DetailSource: Send + Sync {
    async fn fetch_page(&self, url: &str) -> anyhow::Result<String>;
}

/// Plain HTTP transport; detail pages are server-rendered
#[derive(Debug, Clone)]
pub struct HttpDetailSource {
    client: Client,
}

impl HttpDetailSource {
    /// Build a client with a per-request timeout and English page language
    pub fn new(request_timeout: Duration) -> ScrapeResult<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static(LANGUAGES));

        let client = Client::builder()
            .timeout(request_timeout)
            .user_agent(CHROME_USER_AGENT)
            .default_headers(headers)
            .build()?;

        Ok(Self { client })
    }

    #[must_use]
    pub fn with_client(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl DetailSource for HttpDetailSource {
    async fn fetch_page(&self, url: &str) -> anyhow::Result<String> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .context("Failed to request detail page")?;

        let status = response.status();
        if !status.is_success() {
            return Err(anyhow!("Detail page returned status {status}"));
        }

        response
            .text()
            .await
            .context("Failed to read detail page body")
    }
}

/// Fetches and parses detail pages with bounded retries
pub struct DetailFetcher<S = HttpDetailSource> {
    source: S,
    policy: RetryPolicy,
    strategies: Vec<Box<dyn DetailStrategy>>,
}

impl<S: DetailSource> DetailFetcher<S> {
    #[must_use]
    pub fn new(source: S, policy: RetryPolicy) -> Self {
        Self::with_strategies(source, policy, default_strategies())
    }

    /// Use a custom strategy list, tried in the given order
    #[must_use]
    pub fn with_strategies(
        source: S,
        policy: RetryPolicy,
        strategies: Vec<Box<dyn DetailStrategy>>,
    ) -> Self {
        Self {
            source,
            policy,
            strategies,
        }
    }

    /// Fetch tags and media URL for one detail page
    ///
    /// Network failures, non-2xx statuses and pages in no known layout are
    /// all retried with backoff until the policy's attempts run out.
    pub async fn fetch_detail(&self, page_url: &str) -> ScrapeResult<DetailData> {
        let this = self;
        retry_with_backoff(&self.policy, page_url, move || async move {
            let html = this.source.fetch_page(page_url).await?;
            let (layout, data) = extract_detail(&html, &this.strategies)
                .ok_or_else(|| anyhow!("No known detail layout on page ({} bytes)", html.len()))?;
            debug!(layout, tags = data.tags.len(), "Parsed detail page {page_url}");
            Ok(data)
        })
        .await
        .map_err(|exhausted| ScrapeError::DetailFetch {
            url: page_url.to_string(),
            attempts: exhausted.attempts,
            message: format!("{:#}", exhausted.last_error),
        })
    }
}

/// Run the detail fetcher over `records` with `workers` concurrent workers
///
/// Records come back in input order. A record whose detail page could not be
/// fetched keeps its listing data and the failure is logged.
pub async fn enrich_records<S>(
    records: Vec<ItemRecord>,
    workers: usize,
    fetcher: Arc<DetailFetcher<S>>,
    progress: Arc<dyn ProgressReporter>,
) -> ScrapeResult<Vec<ItemRecord>>
where
    S: DetailSource + 'static,
{
    run_pool(records, workers, move |mut record: ItemRecord| {
        let fetcher = Arc::clone(&fetcher);
        let progress = Arc::clone(&progress);
        async move {
            match fetcher.fetch_detail(&record.page_url).await {
                Ok(detail) => {
                    record.apply_detail(detail);
                    progress.report_detail_fetched(&record.page_url);
                }
                Err(e) => {
                    warn!("Keeping listing data for {}: {e}", record.page_url);
                    progress.report_item_failed(&record.page_url, &e.to_string());
                }
            }
            record
        }
    })
    .await
}
