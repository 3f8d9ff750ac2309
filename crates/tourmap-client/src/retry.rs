//! Retry with a fixed back-off table for transient transport failures.
//!
//! [`retry_with_backoff`] wraps any fallible async operation. Network-level
//! failures and HTTP 5xx are retried after the tabled delays; application
//! errors, 4xx, and malformed responses are returned immediately (retrying a
//! business error burns quota without changing the outcome).

use std::future::Future;
use std::time::Duration;

use crate::error::ClientError;

/// Fixed delay table: the n-th retry sleeps `BACKOFF_SCHEDULE[n]` first.
/// Three retries, four attempts total.
pub(crate) const BACKOFF_SCHEDULE: [Duration; 3] = [
    Duration::from_secs(1),
    Duration::from_secs(2),
    Duration::from_secs(4),
];

/// Returns `true` for errors worth retrying after a back-off delay.
///
/// Retriable: timeouts, connection failures, HTTP 5xx. Everything else is a
/// hard stop.
pub(crate) fn is_retriable(err: &ClientError) -> bool {
    match err {
        ClientError::Transport(e) => {
            e.is_timeout() || e.is_connect() || e.status().is_some_and(|s| s.is_server_error())
        }
        ClientError::Api { .. }
        | ClientError::Deserialize { .. }
        | ClientError::InvalidBaseUrl { .. } => false,
    }
}

/// Runs `operation`, sleeping through `schedule` between transient failures.
///
/// The operation is attempted at most `schedule.len() + 1` times; the last
/// error is returned once the table is exhausted.
pub(crate) async fn retry_with_backoff<T, F, Fut>(
    schedule: &[Duration],
    mut operation: F,
) -> Result<T, ClientError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, ClientError>>,
{
    let mut attempt = 0usize;
    loop {
        match operation().await {
            Ok(value) => return Ok(value),
            Err(err) => {
                if !is_retriable(&err) {
                    return Err(err);
                }
                let Some(delay) = schedule.get(attempt).copied() else {
                    return Err(err);
                };
                tracing::warn!(
                    attempt = attempt + 1,
                    retries = schedule.len(),
                    delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
                    error = %err,
                    "transient upstream failure; retrying after back-off"
                );
                tokio::time::sleep(delay).await;
                attempt += 1;
            }
        }
    }
}
