use std::{future::Future, pin::Pin, time::Duration};

use tokio::time::sleep;

pub type RetryFuture<T, E> = Pin<Box<dyn Future<Output = Result<T, E>> + Send>>;

/// Runs `operation` up to `max_retries + 1` times, doubling the delay after
/// each failure. The last error is returned untouched.
pub async fn retry_with_backoff<F, T, E>(
    mut operation: F,
    max_retries: usize,
    initial_delay: Duration,
) -> Result<T, E>
where
    F: FnMut() -> RetryFuture<T, E>,
    E: std::fmt::Display,
{
    let mut delay = initial_delay;
    let mut attempt = 0;

    loop {
        match operation().await {
            Ok(result) => return Ok(result),
            Err(e) if attempt < max_retries => {
                attempt += 1;
                tracing::warn!("Attempt {} failed: {}. Retrying in {:?}...", attempt, e, delay);
                sleep(delay).await;
                delay *= 2;
            }
            Err(e) => return Err(e),
        }
    }
}
