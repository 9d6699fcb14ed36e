//! Bounded retry for the login call.

use super::ApiResult;
use std::future::Future;
use std::time::Duration;
use tracing::warn;

/// Fixed-delay retry policy.
///
/// Only transient failures (no response, or a 5xx) are retried; every other
/// error is returned immediately.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    attempts: u32,
    delay: Duration,
}

impl RetryPolicy {
    /// Attempts made by the login call unless configured otherwise.
    pub const DEFAULT_LOGIN_ATTEMPTS: u32 = 5;
    /// Delay between login attempts unless configured otherwise.
    pub const DEFAULT_LOGIN_DELAY: Duration = Duration::from_secs(2);

    /// Creates a policy. Zero attempts is treated as one.
    #[must_use]
    pub const fn new(attempts: u32, delay: Duration) -> Self {
        Self {
            attempts: if attempts == 0 { 1 } else { attempts },
            delay,
        }
    }

    /// A policy that never retries.
    #[must_use]
    pub const fn none() -> Self {
        Self::new(1, Duration::ZERO)
    }

    /// Returns the maximum number of attempts.
    #[must_use]
    pub const fn attempts(&self) -> u32 {
        self.attempts
    }

    /// Returns the delay between attempts.
    #[must_use]
    pub const fn delay(&self) -> Duration {
        self.delay
    }

    /// Runs `operation` until it succeeds, fails permanently, or the attempts
    /// run out. The last error is returned.
    ///
    /// # Errors
    ///
    /// Returns the error of the final attempt.
    pub async fn run<T, F, Fut>(&self, label: &str, mut operation: F) -> ApiResult<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = ApiResult<T>>,
    {
        let mut attempt = 1;
        loop {
            match operation().await {
                Err(error) if error.is_transient() && attempt < self.attempts => {
                    warn!(
                        %error,
                        attempt,
                        max_attempts = self.attempts,
                        "{label} failed; retrying"
                    );
                    tokio::time::sleep(self.delay).await;
                    attempt += 1;
                }
                result => return result,
            }
        }
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(Self::DEFAULT_LOGIN_ATTEMPTS, Self::DEFAULT_LOGIN_DELAY)
    }
}
