use anyhow::Error;
use std::future::Future;
use std::time::Duration;
use tracing::debug;

/// Retries a request-sending operation on transport errors.
///
/// # Parameters
/// - `operation`: Closure returning the request future
/// - `retries`: Number of retry attempts (total runs = 1 initial + retries)
/// - `delay_ms`: Milliseconds between attempts
///
/// HTTP error statuses are not retried here; only failures to get a response.
pub async fn with_retry<F, Fut, T>(
    mut operation: F,
    retries: usize,
    delay_ms: u64,
) -> Result<T, Error>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, reqwest::Error>>,
{
    let mut attempt = 1;
    loop {
        match operation().await {
            Ok(val) => return Ok(val),
            Err(err) if attempt > retries => return Err(err.into()),
            Err(err) => {
                debug!("Attempt {}/{} failed: {}. Retrying...", attempt, retries, err);
                attempt += 1;
                tokio::time::sleep(Duration::from_millis(delay_ms)).await;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::time::Instant;

    // An unparseable URL fails inside `send` without touching the network.
    async fn failing_request(
        client: &reqwest::Client,
    ) -> Result<reqwest::Response, reqwest::Error> {
        client.get("not a url").send().await
    }

    #[tokio::test(start_paused = true)]
    async fn test_retries_until_attempts_run_out() {
        let client = reqwest::Client::new();
        let mut calls = 0;
        let started = Instant::now();

        let result = with_retry(
            || {
                calls += 1;
                failing_request(&client)
            },
            2,
            500,
        )
        .await;

        assert!(result.is_err());
        assert_eq!(calls, 3);
        assert!(started.elapsed() >= Duration::from_millis(1000));
    }

    #[tokio::test(start_paused = true)]
    async fn test_no_retry_after_success() {
        let mut calls = 0;
        let started = Instant::now();

        let result: Result<u32, Error> = with_retry(
            || {
                calls += 1;
                async { Ok::<_, reqwest::Error>(7) }
            },
            3,
            500,
        )
        .await;

        assert_eq!(result.unwrap(), 7);
        assert_eq!(calls, 1);
        assert_eq!(started.elapsed(), Duration::ZERO);
    }
}
