//! Backoff policy for commit races and transient gateway failures.
//!
//! Two things retry in this engine: versioned commits that lose a
//! compare-and-swap race (re-derived from a fresh load, never replayed
//! blindly) and gateway calls that fail with a retryable transport error.
//! Both share one exponential-backoff policy.

use std::time::Duration;
use tokio::time::sleep;

/// Exponential backoff configuration.
///
/// Defaults are tuned for document-level commit races: short initial delay,
/// tight cap, a handful of attempts.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Maximum number of retry attempts after the first try
    pub max_retries: usize,
    /// Delay before the first retry
    pub initial_delay: Duration,
    /// Cap for the exponential backoff
    pub max_delay: Duration,
    /// Multiplier applied per attempt
    pub multiplier: f64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 5,
            initial_delay: Duration::from_millis(25),
            max_delay: Duration::from_secs(1),
            multiplier: 2.0,
        }
    }
}

impl RetryPolicy {
    /// Creates a policy with an explicit retry budget, keeping default delays
    #[must_use]
    pub fn with_max_retries(max_retries: usize) -> Self {
        Self {
            max_retries,
            ..Self::default()
        }
    }

    /// Delay before retry number `attempt` (zero-based).
    ///
    /// `initial_delay * multiplier^attempt`, capped at `max_delay`.
    #[must_use]
    #[allow(
        clippy::cast_possible_truncation,
        clippy::cast_precision_loss,
        clippy::cast_sign_loss,
        clippy::cast_possible_wrap
    )]
    pub fn delay_for_attempt(&self, attempt: usize) -> Duration {
        if attempt == 0 {
            return self.initial_delay;
        }
        let delay_ms = self.initial_delay.as_millis() as f64 * self.multiplier.powi(attempt as i32);
        let delay = Duration::from_millis(delay_ms as u64);
        delay.min(self.max_delay)
    }

    /// Sleeps for the delay assigned to retry number `attempt`
    pub async fn wait(&self, attempt: usize) {
        sleep(self.delay_for_attempt(attempt)).await;
    }
}

/// Retries an async operation with exponential backoff while `retryable`
/// says the error is transient. Returns the last error once the budget is
/// spent or a non-retryable error appears.
pub async fn retry_transient<F, Fut, T, E, R>(
    policy: &RetryPolicy,
    mut operation: F,
    retryable: R,
) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: std::future::Future<Output = Result<T, E>>,
    E: std::fmt::Display,
    R: Fn(&E) -> bool,
{
    let mut attempt = 0;
    loop {
        match operation().await {
            Ok(result) => {
                if attempt > 0 {
                    tracing::info!(attempt, "operation succeeded after retry");
                }
                return Ok(result);
            }
            Err(error) => {
                if attempt >= policy.max_retries || !retryable(&error) {
                    return Err(error);
                }
                tracing::warn!(
                    attempt,
                    error = %error,
                    delay_ms = policy.delay_for_attempt(attempt).as_millis() as u64,
                    "transient failure, backing off"
                );
                policy.wait(attempt).await;
                attempt += 1;
            }
        }
    }
}
