// src/error_recovery/mod.rs
//! Retry with exponential backoff for API operations.
//!
//! [`with_retry`] is the single choke point every remote call passes
//! through. It decides on the [`ErrorClass`](crate::error::ErrorClass)
//! alone: permanent failures come back untouched on the first attempt,
//! everything else is retried until the policy runs out.

mod backoff;

pub use backoff::{compute_delay, compute_delay_with_ceiling};

use crate::constants::{DEFAULT_INITIAL_DELAY, DEFAULT_MAX_RETRIES, MAX_BACKOFF_DELAY};
use crate::error::{AppError, ErrorClass};
use std::future::Future;
use std::time::Duration;

/// How persistently a remote call is retried.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Retries after the first attempt.
    pub max_retries: u32,
    pub initial_delay: Duration,
    pub max_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: DEFAULT_MAX_RETRIES,
            initial_delay: DEFAULT_INITIAL_DELAY,
            max_delay: MAX_BACKOFF_DELAY,
        }
    }
}

impl RetryPolicy {
    pub fn new(max_retries: u32, initial_delay: Duration, max_delay: Duration) -> Self {
        Self {
            max_retries,
            initial_delay,
            max_delay: max_delay.min(MAX_BACKOFF_DELAY),
        }
    }

    /// Fails on the first error. Useful in tests and for dry runs.
    pub fn no_retries() -> Self {
        Self {
            max_retries: 0,
            ..Self::default()
        }
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_retries.saturating_add(1)
    }

    pub fn delay_for(&self, attempt: u32) -> Duration {
        compute_delay_with_ceiling(attempt, self.initial_delay, self.max_delay)
    }
}

/// Runs `operation` until it succeeds, fails permanently, or the policy's
/// retries are used up.
///
/// `context` names the call in retry notices and in the
/// [`AppError::RetriesExhausted`] error returned on exhaustion.
pub async fn with_retry<F, Fut, T>(
    mut operation: F,
    policy: &RetryPolicy,
    context: &str,
) -> Result<T, AppError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, AppError>>,
{
    let max_attempts = policy.max_attempts();
    let mut attempt: u32 = 0;

    loop {
        let error = match operation().await {
            Ok(value) => {
                if attempt > 0 {
                    log::debug!("{} succeeded after {} retries", context, attempt);
                }
                return Ok(value);
            }
            Err(error) => error,
        };
        attempt += 1;

        let class = error.class();
        if !class.is_retryable() {
            log::debug!("{}: {} ({}), not retrying", context, class, error);
            return Err(error);
        }

        if attempt >= max_attempts {
            log::warn!(
                "{}: {} after {} attempts, giving up: {}",
                context,
                class,
                attempt,
                error
            );
            return Err(AppError::RetriesExhausted {
                context: context.to_string(),
                attempts: attempt,
                source: Box::new(error),
            });
        }

        let delay = policy.delay_for(attempt - 1);
        log_retry_notice(context, class, delay, attempt, policy.max_retries, &error);
        tokio::time::sleep(delay).await;
    }
}

fn log_retry_notice(
    context: &str,
    class: ErrorClass,
    delay: Duration,
    retry: u32,
    max_retries: u32,
    error: &AppError,
) {
    let wait = format!("{:.1}s", delay.as_secs_f64());
    match class {
        ErrorClass::RateLimited => log::warn!(
            "Rate limited on {}. Waiting {} before retry {}/{}",
            context,
            wait,
            retry,
            max_retries
        ),
        _ => log::warn!(
            "{} on {}: {}. Waiting {} before retry {}/{}",
            class,
            context,
            error,
            wait,
            retry,
            max_retries
        ),
    }
}
