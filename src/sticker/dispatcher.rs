//! Retry loop with exponential backoff
//!
//! Attempts are strictly sequential. Retryable outcomes wait `base * 2^attempt`
//! before the next attempt (1s, 2s, 4s with the default policy); there is no
//! wait after the last attempt.

use super::source::StickerSource;
use super::{FetchOutcome, RetryDecision};
use crate::config::{STICKER_API_BASE_BACKOFF_MS, STICKER_API_MAX_RETRIES};
use std::time::Duration;
use tracing::{debug, info, warn};

/// Retry budget for one invocation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Maximum number of attempts, including the first one
    pub max_retries: u32,
    /// Delay after the first failed attempt
    pub base_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: STICKER_API_MAX_RETRIES,
            base_delay: Duration::from_millis(STICKER_API_BASE_BACKOFF_MS),
        }
    }
}

impl RetryPolicy {
    /// Delay before the attempt following the 0-based `attempt`.
    #[must_use]
    pub fn backoff(&self, attempt: u32) -> Duration {
        self.base_delay.saturating_mul(2u32.saturating_pow(attempt))
    }
}

/// Fetches from `source` until a terminal outcome or the retry budget runs out.
///
/// Returns the terminal outcome, or the last retryable failure once all
/// attempts are spent. A zero budget still performs one attempt.
pub async fn dispatch_with_retry(
    source: &dyn StickerSource,
    policy: &RetryPolicy,
    command: &str,
) -> FetchOutcome {
    let max_attempts = policy.max_retries.max(1);
    let mut attempt = 0;

    loop {
        let start = std::time::Instant::now();
        let outcome = source.fetch().await;
        let duration = start.elapsed();

        if outcome.retry_decision() == RetryDecision::Terminal {
            if attempt > 0 && outcome.is_success() {
                info!(
                    command,
                    attempt = attempt + 1,
                    duration_ms = duration.as_millis(),
                    "Sticker API retry succeeded"
                );
            }
            debug!(
                command,
                attempt = attempt + 1,
                outcome = outcome.kind(),
                "Sticker fetch finished"
            );
            return outcome;
        }

        if attempt + 1 >= max_attempts {
            return outcome;
        }

        let backoff = policy.backoff(attempt);
        warn!(
            command,
            attempt = attempt + 1,
            max_attempts,
            duration_ms = duration.as_millis(),
            backoff_ms = backoff.as_millis(),
            outcome = ?outcome,
            "Sticker API request failed, retrying"
        );
        tokio::time::sleep(backoff).await;
        attempt += 1;
    }
}
