//! fetch_with_retry - nuovi tentativi con backoff esponenziale

use crate::core::ClientError;
use std::future::Future;
use std::time::Duration;
use tokio::time::sleep;
use tracing::warn;

/// Esegue `op` fino a `attempts` volte. Si ritenta solo sugli errori di rete e
/// sui 5xx; l'attesa parte da `base_delay` e raddoppia ad ogni tentativo.
pub async fn with_backoff<T, F, Fut>(
    attempts: u32,
    base_delay: Duration,
    mut op: F,
) -> Result<T, ClientError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, ClientError>>,
{
    let attempts = attempts.max(1);
    let mut delay = base_delay;
    let mut attempt = 1;

    loop {
        match op().await {
            Ok(value) => return Ok(value),
            Err(e) if e.is_retryable() && attempt < attempts => {
                warn!(attempt, attempts, delay_ms = delay.as_millis() as u64, "Request failed, retrying: {}", e);
                sleep(delay).await;
                delay = delay.saturating_mul(2);
                attempt += 1;
            }
            Err(e) => return Err(e),
        }
    }
}
