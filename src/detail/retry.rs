//! Bounded retry with exponential backoff
//!
//! Detail pages fail transiently all the time (half-rendered markup,
//! throttling, resets). Every failure is retried, but only up to a fixed
//! number of attempts with a growing, jittered delay in between.

use rand::Rng;
use std::future::Future;
use std::time::Duration;
use tracing::{debug, warn};

use crate::config::ScrapeConfig;

/// How often and how patiently an operation is retried
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts, first try included; at least 1
    pub max_attempts: u32,
    pub base_delay: Duration,
    pub max_delay: Duration,
}

impl RetryPolicy {
    #[must_use]
    pub fn new(max_attempts: u32, base_delay: Duration, max_delay: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            base_delay,
            max_delay: max_delay.max(base_delay),
        }
    }

    #[must_use]
    pub fn from_config(config: &ScrapeConfig) -> Self {
        Self::new(
            config.max_attempts(),
            config.retry_base_delay(),
            config.retry_max_delay(),
        )
    }

    /// Delay before retry number `retry` (0-based), before jitter
    #[must_use]
    pub fn backoff(&self, retry: u32) -> Duration {
        let factor = 1u32.checked_shl(retry).unwrap_or(u32::MAX);
        self.base_delay.saturating_mul(factor).min(self.max_delay)
    }

    /// Backoff plus up to 25% random jitter, still capped at `max_delay`
    fn jittered_backoff(&self, retry: u32) -> Duration {
        let delay = self.backoff(retry);
        let jitter_ms = u64::try_from(delay.as_millis() / 4).unwrap_or(u64::MAX);
        let jitter = if jitter_ms == 0 {
            0
        } else {
            rand::rng().random_range(0..=jitter_ms)
        };
        (delay + Duration::from_millis(jitter)).min(self.max_delay)
    }
}

/// The last error once every attempt has failed
#[derive(Debug)]
pub struct RetryExhausted {
    pub attempts: u32,
    pub last_error: anyhow::Error,
}

/// Retry `f` until it succeeds or `policy.max_attempts` is reached
pub async fn retry_with_backoff<F, Fut, T>(
    policy: &RetryPolicy,
    label: &str,
    f: F,
) -> Result<T, RetryExhausted>
where
    F: Fn() -> Fut,
    Fut: Future<Output = anyhow::Result<T>>,
{
    let mut attempt = 1;
    loop {
        match f().await {
            Ok(value) => {
                if attempt > 1 {
                    debug!("{label} succeeded on attempt {attempt}");
                }
                return Ok(value);
            }
            Err(e) if attempt >= policy.max_attempts => {
                warn!("{label}: giving up after {attempt} attempts: {e:#}");
                return Err(RetryExhausted {
                    attempts: attempt,
                    last_error: e,
                });
            }
            Err(e) => {
                let delay = policy.jittered_backoff(attempt - 1);
                debug!(
                    "{label}: attempt {attempt}/{} failed, retrying in {}ms: {e:#}",
                    policy.max_attempts,
                    delay.as_millis()
                );
                tokio::time::sleep(delay).await;
                attempt += 1;
            }
        }
    }
}
