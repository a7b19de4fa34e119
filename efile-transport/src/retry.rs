//! Bounded retry with exponential backoff for transport-level failures.

use std::future::Future;
use std::time::Duration;

use crate::error::TransportError;

/// Retries allowed after the initial attempt.
pub const MAX_RETRIES: u32 = 3;

const BASE_DELAY_MS: u64 = 200;

/// Delay before retry `n` (1-based): 200ms, 400ms, 800ms.
pub fn backoff_delay(retry: u32) -> Duration {
    Duration::from_millis(BASE_DELAY_MS << (retry - 1))
}

/// Runs `op` up to `1 + MAX_RETRIES` times, sleeping between attempts.
///
/// Only transport-level failures are retried. Answers from the gateway,
/// faults and refusals included, pass straight through: the request was
/// received, so repeating it cannot change the verdict.
pub(crate) async fn with_retries<T, F, Fut>(endpoint: &str, mut op: F) -> Result<T, TransportError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, TransportError>>,
{
    let mut retry = 0;
    loop {
        match op().await {
            Ok(value) => return Ok(value),
            Err(err) if err.is_retryable() && retry < MAX_RETRIES => {
                retry += 1;
                let delay = backoff_delay(retry);
                tracing::warn!(
                    endpoint,
                    retry,
                    delay_ms = delay.as_millis() as u64,
                    error = %err,
                    "transport failure, will retry"
                );
                tokio::time::sleep(delay).await;
            }
            Err(err) => return Err(err),
        }
    }
}
