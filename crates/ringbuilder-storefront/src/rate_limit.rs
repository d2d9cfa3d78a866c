//! Retry with exponential backoff for storefront requests.
//!
//! Only throttling (429) and network failures are retried. A missing product
//! or a rejected cart is a definite answer and is returned at once.

use std::future::Future;
use std::time::Duration;

use crate::error::StorefrontError;

/// Upper bound on any single wait, whatever the server asks for.
const MAX_DELAY_SECS: u64 = 30;

fn is_retriable(err: &StorefrontError) -> bool {
    matches!(
        err,
        StorefrontError::RateLimited { .. } | StorefrontError::Http(_)
    )
}

/// Wait before retry number `attempt + 1`: `base * 2^attempt`, raised to the
/// server's `Retry-After` when throttled, capped at [`MAX_DELAY_SECS`].
fn delay_secs(err: &StorefrontError, attempt: u32, backoff_base_secs: u64) -> u64 {
    let backoff = backoff_base_secs.saturating_mul(1u64 << attempt.min(62));
    let requested = match err {
        StorefrontError::RateLimited {
            retry_after_secs, ..
        } => *retry_after_secs,
        _ => 0,
    };
    backoff.max(requested).min(MAX_DELAY_SECS)
}

/// Runs `operation`, retrying transient failures up to `max_retries` extra
/// times. The last error is returned once retries run out.
pub(crate) async fn retry_with_backoff<T, F, Fut>(
    max_retries: u32,
    backoff_base_secs: u64,
    mut operation: F,
) -> Result<T, StorefrontError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, StorefrontError>>,
{
    let mut attempt = 0u32;
    loop {
        let err = match operation().await {
            Ok(value) => return Ok(value),
            Err(err) if !is_retriable(&err) || attempt >= max_retries => return Err(err),
            Err(err) => err,
        };

        let delay = delay_secs(&err, attempt, backoff_base_secs);
        tracing::warn!(
            attempt,
            max_retries,
            delay_secs = delay,
            error = %err,
            "transient storefront error, retrying"
        );
        tokio::time::sleep(Duration::from_secs(delay)).await;
        attempt += 1;
    }
}
