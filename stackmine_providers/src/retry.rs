use std::fmt::Display;
use std::future::Future;
use std::time::Duration;
use tokio::time::sleep;
use tracing::warn;

/// Waits between attempts; `delays.len() + 1` attempts in total.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    pub delays: Vec<Duration>,
}

impl RetryPolicy {
    #[must_use]
    pub const fn none() -> Self {
        Self { delays: Vec::new() }
    }

    #[must_use]
    pub fn from_secs(delays: &[u64]) -> Self {
        Self {
            delays: delays.iter().copied().map(Duration::from_secs).collect(),
        }
    }

    #[must_use]
    pub fn attempts(&self) -> usize {
        self.delays.len() + 1
    }
}

impl Default for RetryPolicy {
    /// 3s, then 6s.
    fn default() -> Self {
        Self::from_secs(&[3, 6])
    }
}

/// Retry an async operation while `should_retry` accepts its error.
///
/// # Returns
/// The first success, or the error that ended the attempts: either one
/// `should_retry` rejected or the last one once the policy is exhausted.
pub async fn retry_with_backoff<F, Fut, T, E, R>(
    mut operation: F,
    policy: &RetryPolicy,
    should_retry: R,
) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: Display,
    R: Fn(&E) -> bool,
{
    let total = policy.attempts();
    let mut attempt = 1;
    loop {
        match operation().await {
            Ok(result) => return Ok(result),
            Err(e) => {
                let Some(delay) = policy.delays.get(attempt - 1) else {
                    return Err(e);
                };
                if !should_retry(&e) {
                    return Err(e);
                }
                warn!(
                    "Request failed (attempt {attempt}/{total}): {e}. Retrying after {}s...",
                    delay.as_secs_f32()
                );
                sleep(*delay).await;
                attempt += 1;
            }
        }
    }
}

/// Whether an error from an HTTP call is worth retrying: rate limiting,
/// server errors, timeouts and connection failures.
#[must_use]
pub fn is_transient(error: &anyhow::Error) -> bool {
    error.chain().any(|cause| {
        cause.downcast_ref::<reqwest::Error>().is_some_and(|e| {
            e.is_timeout()
                || e.is_connect()
                || e.status().is_some_and(|status| {
                    status == reqwest::StatusCode::TOO_MANY_REQUESTS || status.is_server_error()
                })
        })
    })
}
