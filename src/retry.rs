//! Bounded retry with exponential backoff for transient failures

use std::future::Future;
use std::time::Duration;

use crate::error::Result;

/// Base delay before the first retry
const BASE_DELAY: Duration = Duration::from_millis(250);

/// Run `operation` with up to `max_retries` retries for transient errors.
/// Permanent errors (configuration, malformed responses) return immediately.
/// Backoff doubles per attempt: 250ms, 500ms, 1s, ...
pub async fn with_retry<T, F, Fut>(max_retries: u32, mut operation: F) -> Result<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T>>,
{
    let mut attempt: u32 = 0;
    loop {
        match operation().await {
            Ok(value) => return Ok(value),
            Err(err) if err.is_transient() && attempt < max_retries => {
                let delay = BASE_DELAY * 2u32.saturating_pow(attempt);
                tracing::warn!(
                    "transient failure (attempt {}/{}), retrying in {:?}: {}",
                    attempt + 1,
                    max_retries,
                    delay,
                    err
                );
                tokio::time::sleep(delay).await;
                attempt += 1;
            }
            Err(err) => return Err(err),
        }
    }
}
