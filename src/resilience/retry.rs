//! # Retry With Exponential Backoff
//!
//! Re-invokes a fallible async operation until it succeeds or the attempt budget
//! is spent. The wait before retry `i` (counting from 0) is
//! `initial_delay * 2^i`; there is no wait after the final attempt. Waiting goes
//! through `tokio::time::sleep`, so other tasks keep running and tests can drive
//! the schedule with paused time.

use crate::config::RetryConfig;
use crate::constants::retry::{DEFAULT_INITIAL_DELAY_MS, DEFAULT_MAX_RETRIES};
use std::fmt::Display;
use std::future::Future;
use std::time::Duration;
use tracing::{debug, warn};

/// Attempt budget and base delay for [`run_with_retry`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts, including the first. Zero behaves like one: the
    /// operation still runs once instead of failing without being tried.
    pub max_retries: u32,
    pub initial_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: DEFAULT_MAX_RETRIES,
            initial_delay: Duration::from_millis(DEFAULT_INITIAL_DELAY_MS),
        }
    }
}

impl From<&RetryConfig> for RetryPolicy {
    fn from(config: &RetryConfig) -> Self {
        Self {
            max_retries: config.max_retries,
            initial_delay: config.initial_delay(),
        }
    }
}

impl RetryPolicy {
    pub fn new(max_retries: u32, initial_delay: Duration) -> Self {
        Self {
            max_retries,
            initial_delay,
        }
    }

    fn attempts(&self) -> u32 {
        self.max_retries.max(1)
    }

    /// Wait before retry `attempt_index` (the first retry has index 0)
    pub fn delay_for(&self, attempt_index: u32) -> Duration {
        let factor = 2u32.checked_pow(attempt_index).unwrap_or(u32::MAX);
        self.initial_delay.saturating_mul(factor)
    }

    /// Run `operation` under this policy
    pub async fn run<F, Fut, T, E>(&self, operation: F) -> Result<T, E>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: Display,
    {
        run_with_retry(*self, operation).await
    }
}

/// Invoke `operation` until it succeeds, re-raising the last failure once
/// `policy.max_retries` attempts have failed
pub async fn run_with_retry<F, Fut, T, E>(policy: RetryPolicy, mut operation: F) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: Display,
{
    let attempts = policy.attempts();
    let mut attempt = 0;

    loop {
        match operation().await {
            Ok(value) => {
                if attempt > 0 {
                    debug!(attempt = attempt + 1, "Operation succeeded after retry");
                }
                return Ok(value);
            }
            Err(error) if attempt + 1 >= attempts => {
                warn!(
                    attempts,
                    error = %error,
                    "Retry budget exhausted, surfacing last failure"
                );
                return Err(error);
            }
            Err(error) => {
                let delay = policy.delay_for(attempt);
                warn!(
                    attempt = attempt + 1,
                    max_attempts = attempts,
                    delay_ms = delay.as_millis() as u64,
                    error = %error,
                    "Operation failed, retrying"
                );
                tokio::time::sleep(delay).await;
                attempt += 1;
            }
        }
    }
}
