//! Bounded retries for transient upstream failures.

use std::future::Future;
use std::time::Duration;

use marquee_core::{AppConfig, SourceError};

/// Retry transient errors with exponential backoff.
///
/// Only errors for which [`SourceError::is_transient`] holds are retried:
/// timeouts, rate limiting, unreachable hosts and 5xx responses. Anything else
/// is returned on the first attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Attempts after the first one.
    pub max_retries: u32,
    /// Delay before the first retry, doubled on each following one.
    pub base_backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self { max_retries: 2, base_backoff: Duration::from_millis(250) }
    }
}

impl From<&AppConfig> for RetryPolicy {
    fn from(config: &AppConfig) -> Self {
        Self { max_retries: config.retry_count, base_backoff: config.retry_backoff() }
    }
}

impl RetryPolicy {
    /// No retries at all.
    pub fn none() -> Self {
        Self { max_retries: 0, base_backoff: Duration::ZERO }
    }

    /// Delay before retry number `attempt` (zero-based).
    pub fn backoff(&self, attempt: u32) -> Duration {
        self.base_backoff.saturating_mul(2u32.saturating_pow(attempt))
    }

    /// Run `op`, retrying transient failures.
    pub async fn run<T, F, Fut>(&self, what: &str, mut op: F) -> Result<T, SourceError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, SourceError>>,
    {
        let mut attempt = 0;
        loop {
            match op().await {
                Ok(value) => return Ok(value),
                Err(e) if e.is_transient() && attempt < self.max_retries => {
                    let delay = self.backoff(attempt);
                    tracing::warn!(what, attempt = attempt + 1, error = %e, "transient upstream error, retrying in {:?}", delay);
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }
}
