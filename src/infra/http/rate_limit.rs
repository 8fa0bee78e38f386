// Retry-on-429 for the remote APIs.
//
// Only "Too Many Requests" is retried. Every other status, success or not, is
// handed back to the caller on the first attempt.

use reqwest::{RequestBuilder, Response, StatusCode};
use std::time::Duration;

#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    pub max_retries: u32,
    pub base_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 3,
            base_delay: Duration::from_secs(2),
        }
    }
}

impl RetryPolicy {
    pub fn new(max_retries: u32) -> Self {
        Self {
            max_retries,
            ..Default::default()
        }
    }

    /// Delay before retry number `attempt` (0-based). A server-provided
    /// `Retry-After` wins over the exponential schedule.
    pub fn delay_for(&self, attempt: u32, retry_after: Option<Duration>) -> Duration {
        retry_after.unwrap_or_else(|| self.base_delay.saturating_mul(1u32 << attempt.min(16)))
    }
}

#[derive(Debug, thiserror::Error)]
pub enum SendError {
    #[error("still rate limited after {attempts} attempt(s)")]
    RateLimited { attempts: u32 },
    #[error(transparent)]
    Http(#[from] reqwest::Error),
}

fn retry_after(response: &Response) -> Option<Duration> {
    response
        .headers()
        .get(reqwest::header::RETRY_AFTER)?
        .to_str()
        .ok()?
        .trim()
        .parse::<u64>()
        .ok()
        .map(Duration::from_secs)
}

/// Send the request built by `build`, rebuilding it for every retry.
pub async fn send_with_backoff<F>(policy: RetryPolicy, build: F) -> Result<Response, SendError>
where
    F: Fn() -> RequestBuilder,
{
    let mut attempt = 0;
    loop {
        let response = build().send().await?;
        if response.status() != StatusCode::TOO_MANY_REQUESTS {
            return Ok(response);
        }

        if attempt >= policy.max_retries {
            return Err(SendError::RateLimited {
                attempts: attempt + 1,
            });
        }

        let delay = policy.delay_for(attempt, retry_after(&response));
        tracing::warn!(
            "Rate limited by {}, retrying in {:?} ({}/{})",
            response.url().host_str().unwrap_or("remote"),
            delay,
            attempt + 1,
            policy.max_retries
        );
        tokio::time::sleep(delay).await;
        attempt += 1;
    }
}
