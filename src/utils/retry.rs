//! Retry utilities for citation lookups.
//!
//! The policy is deliberately flat: a fixed attempt budget and a fixed pause
//! between a failed attempt and the next one. Only errors for which
//! [`SourceError::is_transient`] holds are retried.

use std::time::Duration;
use tokio::time::sleep;

use crate::sources::SourceError;

/// Attempts made per package unless configured otherwise (one try plus six retries)
pub const DEFAULT_MAX_ATTEMPTS: u32 = 7;

/// Pause between attempts unless configured otherwise
pub const DEFAULT_RETRY_DELAY: Duration = Duration::from_secs(1);

/// Configuration for retry behavior
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryConfig {
    /// Maximum number of attempts, including the first
    pub max_attempts: u32,
    /// Delay between a failed attempt and the next
    pub delay: Duration,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            delay: DEFAULT_RETRY_DELAY,
        }
    }
}

impl RetryConfig {
    pub fn max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts;
        self
    }

    pub fn delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// No pause between attempts
    pub fn immediate(max_attempts: u32) -> Self {
        Self {
            max_attempts,
            delay: Duration::ZERO,
        }
    }
}

/// Result of a retry operation
#[derive(Debug)]
pub enum RetryResult<T> {
    /// Operation succeeded on the given attempt
    Success(T, u32),
    /// Operation failed with a transient error after all attempts
    TransientFailure(SourceError, u32),
    /// Operation failed with a permanent error on the given attempt
    PermanentFailure(SourceError, u32),
}

impl<T> RetryResult<T> {
    /// Number of attempts that were made
    pub fn attempts(&self) -> u32 {
        match self {
            RetryResult::Success(_, n)
            | RetryResult::TransientFailure(_, n)
            | RetryResult::PermanentFailure(_, n) => *n,
        }
    }
}

/// Execute an async operation with retry logic
///
/// # Arguments
///
/// * `config` - Retry configuration
/// * `operation` - The async operation to execute
///
/// # Returns
///
/// The outcome together with how many attempts it took
pub async fn with_retry<T, F, Fut>(config: RetryConfig, operation: F) -> RetryResult<T>
where
    F: FnMut() -> Fut,
    Fut: std::future::Future<Output = Result<T, SourceError>>,
{
    let max_attempts = config.max_attempts.max(1);
    let mut attempts = 0;
    let mut operation = operation;

    loop {
        attempts += 1;

        match operation().await {
            Ok(result) => {
                if attempts > 1 {
                    tracing::info!(
                        "Operation succeeded on attempt {} after {} transient failures",
                        attempts,
                        attempts - 1
                    );
                }
                return RetryResult::Success(result, attempts);
            }
            Err(error) if error.is_transient() => {
                if attempts >= max_attempts {
                    tracing::warn!("Operation failed after {} attempts: {}", attempts, error);
                    return RetryResult::TransientFailure(error, attempts);
                }

                tracing::debug!(
                    "Transient error on attempt {}/{}: {}, retrying in {:?}",
                    attempts,
                    max_attempts,
                    error,
                    config.delay
                );

                if !config.delay.is_zero() {
                    sleep(config.delay).await;
                }
            }
            Err(error) => return RetryResult::PermanentFailure(error, attempts),
        }
    }
}
