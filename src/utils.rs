//! Utility functions shared by the Telegram layer.

use anyhow::Result;
use std::time::Duration;
use tokio_retry::strategy::{jitter, ExponentialBackoff};
use tokio_retry::Retry;
use tracing::warn;

/// Executes a Telegram API operation with automatic retries on failure.
///
/// The retry strategy uses exponential backoff with jitter to avoid thundering herd:
/// - Initial delay: 500ms
/// - Max delay: 4s
/// - Max attempts: 4, the first try plus `TELEGRAM_API_MAX_RETRIES` retries
///
/// This is only used for delivering replies; sticker API calls have their own
/// jitter-free schedule in [`crate::sticker::dispatcher`].
///
/// # Examples
///
/// ```no_run
/// use doro_sticker_bot::utils::retry_telegram_operation;
/// use anyhow::Result;
///
/// async fn send_reply() -> Result<()> {
///     Ok(())
/// }
///
/// # async fn example() -> Result<()> {
/// retry_telegram_operation(|| async { send_reply().await }).await?;
/// # Ok(())
/// # }
/// ```
///
/// # Errors
///
/// Returns the last error if all attempts fail.
pub async fn retry_telegram_operation<F, Fut, T>(operation: F) -> Result<T>
where
    F: FnMut() -> Fut,
    Fut: std::future::Future<Output = Result<T>>,
{
    use crate::config::{
        TELEGRAM_API_INITIAL_BACKOFF_MS, TELEGRAM_API_MAX_BACKOFF_MS, TELEGRAM_API_MAX_RETRIES,
    };

    let retry_strategy = ExponentialBackoff::from_millis(TELEGRAM_API_INITIAL_BACKOFF_MS)
        .max_delay(Duration::from_millis(TELEGRAM_API_MAX_BACKOFF_MS))
        .map(jitter) // Add jitter to prevent thundering herd
        .take(TELEGRAM_API_MAX_RETRIES);

    Retry::start(retry_strategy, operation).await.map_err(|e| {
        warn!(
            "Telegram API operation failed after {} attempts: {}",
            TELEGRAM_API_MAX_RETRIES + 1,
            e
        );
        e
    })
}

/// Returns `true` if `url` points at an animated GIF.
///
/// Telegram renders GIFs only when sent as animations, not as photos.
#[must_use]
pub fn is_gif_url(url: &str) -> bool {
    let path = url.split(['?', '#']).next().unwrap_or(url);
    path.to_ascii_lowercase().ends_with(".gif")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[tokio::test(start_paused = true)]
    async fn test_retry_recovers_after_failure() -> Result<()> {
        let calls = AtomicUsize::new(0);
        let counter = &calls;
        let value = retry_telegram_operation(move || async move {
            if counter.fetch_add(1, Ordering::SeqCst) == 0 {
                anyhow::bail!("Telegram send error: network")
            }
            Ok(7)
        })
        .await?;

        assert_eq!(value, 7);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
        Ok(())
    }

    #[tokio::test(start_paused = true)]
    async fn test_retry_gives_up() {
        let calls = AtomicUsize::new(0);
        let counter = &calls;
        let result: Result<()> = retry_telegram_operation(move || async move {
            counter.fetch_add(1, Ordering::SeqCst);
            anyhow::bail!("Telegram send error: network")
        })
        .await;

        assert!(result.is_err());
        // First try plus TELEGRAM_API_MAX_RETRIES retries
        assert_eq!(
            calls.load(Ordering::SeqCst),
            crate::config::TELEGRAM_API_MAX_RETRIES + 1
        );
    }

    #[test]
    fn test_is_gif_url() {
        assert!(is_gif_url("https://cdn.example/a.gif"));
        assert!(is_gif_url("https://cdn.example/A.GIF?size=large"));
        assert!(!is_gif_url("https://x/y.png"));
        assert!(!is_gif_url("https://cdn.example/gif/a.webp#frag"));
    }
}
