//! Bounded retry with linear backoff for broker API calls.
//!
//! A classifier turns every attempt into an [`AttemptOutcome`]; one generic
//! loop consumes it. Waits grow linearly (`attempt * base`) and are
//! interruptible through a [`CancellationToken`].
//!
//! # Retryable Errors
//!
//! | Retryable | Fatal |
//! |-----------|-------|
//! | HTTP 429 (Rate Limited) | HTTP 400 (Bad Request) |
//! | HTTP 502/503/504 (Gateway) | HTTP 401/403 (Auth Errors) |
//! | Network timeouts | HTTP 422 (Validation Error) |
//! | Connection reset | Order rejected by exchange |
//! | Exchange unavailable | Insufficient margin |
//!
//! # Example
//!
//! ```rust,ignore
//! use perp_engine::broker::{RetryPolicy, run_with_retry};
//!
//! let policy = RetryPolicy::default();
//! let ack = run_with_retry(&policy, &cancel, "submit_order", |attempt| async move {
//!     AttemptOutcome::from_result(broker.submit_order(&symbol, &order).await)
//! })
//! .await?;
//! ```

use std::future::Future;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio_util::sync::CancellationToken;

/// Retry policy for broker calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetryPolicy {
    /// Maximum number of attempts, including the first (default: 3).
    pub max_attempts: u32,
    /// Backoff unit; the wait after attempt `n` is `n * backoff_base` (default: 1s).
    pub backoff_base: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            backoff_base: Duration::from_secs(1),
        }
    }
}

impl RetryPolicy {
    /// Create a new retry policy. At least one attempt is always made.
    #[must_use]
    pub fn new(max_attempts: u32, backoff_base: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            backoff_base,
        }
    }

    /// Wait after a failed attempt (1-based).
    #[must_use]
    pub fn backoff_for(&self, attempt: u32) -> Duration {
        self.backoff_base.saturating_mul(attempt)
    }
}

/// Whether an error is worth retrying.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorClass {
    /// Transient failure (network, timeout, rate limit, unavailable).
    Retryable,
    /// Permanent failure; retrying cannot help.
    Fatal,
}

/// Errors that know their own retry class.
pub trait Classify {
    /// Retry class of this error.
    fn class(&self) -> ErrorClass;
}

/// Tagged result of a single attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttemptOutcome<T, E> {
    /// The attempt succeeded.
    Ok(T),
    /// The attempt failed transiently.
    Retryable(E),
    /// The attempt failed permanently.
    Fatal(E),
}

impl<T, E: Classify> AttemptOutcome<T, E> {
    /// Classify a plain result.
    pub fn from_result(result: Result<T, E>) -> Self {
        match result {
            Ok(value) => Self::Ok(value),
            Err(error) => match error.class() {
                ErrorClass::Retryable => Self::Retryable(error),
                ErrorClass::Fatal => Self::Fatal(error),
            },
        }
    }
}

/// Why a retried operation gave up.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RetryError<E: std::fmt::Display> {
    /// The cancellation token fired before the operation succeeded.
    #[error("operation cancelled")]
    Cancelled,

    /// Every attempt failed transiently.
    #[error("gave up after {attempts} attempts: {last}")]
    Exhausted {
        /// Attempts made.
        attempts: u32,
        /// Error of the final attempt.
        last: E,
    },

    /// An attempt failed permanently.
    #[error("fatal error on attempt {attempt}: {error}")]
    Fatal {
        /// Attempt that failed.
        attempt: u32,
        /// The error.
        error: E,
    },
}

/// Run `op` until it succeeds, fails fatally, runs out of attempts, or is cancelled.
///
/// `op` receives the 1-based attempt number. No wait follows the final attempt.
pub async fn run_with_retry<T, E, F, Fut>(
    policy: &RetryPolicy,
    cancel: &CancellationToken,
    operation: &str,
    mut op: F,
) -> Result<T, RetryError<E>>
where
    E: std::fmt::Display,
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = AttemptOutcome<T, E>>,
{
    let max_attempts = policy.max_attempts.max(1);
    let mut attempt = 0;

    loop {
        attempt += 1;
        if cancel.is_cancelled() {
            return Err(RetryError::Cancelled);
        }

        let error = match op(attempt).await {
            AttemptOutcome::Ok(value) => return Ok(value),
            AttemptOutcome::Fatal(error) => {
                return Err(RetryError::Fatal { attempt, error });
            }
            AttemptOutcome::Retryable(error) => error,
        };

        if attempt >= max_attempts {
            return Err(RetryError::Exhausted {
                attempts: attempt,
                last: error,
            });
        }

        let wait = policy.backoff_for(attempt);
        tracing::warn!(
            operation,
            attempt,
            max_attempts,
            wait_ms = wait.as_millis() as u64,
            error = %error,
            "Retryable failure, backing off"
        );

        tokio::select! {
            biased;
            () = cancel.cancelled() => return Err(RetryError::Cancelled),
            () = tokio::time::sleep(wait) => {}
        }
    }
}

/// HTTP status codes that are retryable.
const RETRYABLE_STATUS_CODES: &[u16] = &[
    429, // Too Many Requests (Rate Limited)
    408, // Request Timeout
];

/// Check if an HTTP status code is retryable.
#[must_use]
pub fn is_retryable_status(status_code: u16) -> bool {
    // 5xx server errors are generally retryable
    if (500..600).contains(&status_code) {
        return true;
    }
    RETRYABLE_STATUS_CODES.contains(&status_code)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicU32, Ordering};

    #[derive(Debug, Clone, PartialEq, Eq)]
    struct TestError(ErrorClass);

    impl std::fmt::Display for TestError {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            write!(f, "{:?}", self.0)
        }
    }

    impl Classify for TestError {
        fn class(&self) -> ErrorClass {
            self.0
        }
    }

    fn fast_policy() -> RetryPolicy {
        RetryPolicy::new(3, Duration::from_millis(1))
    }

    #[test]
    fn backoff_is_linear() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.backoff_for(1), Duration::from_secs(1));
        assert_eq!(policy.backoff_for(2), Duration::from_secs(2));
        assert_eq!(policy.backoff_for(3), Duration::from_secs(3));
    }

    #[test]
    fn policy_always_allows_one_attempt() {
        assert_eq!(RetryPolicy::new(0, Duration::ZERO).max_attempts, 1);
    }

    #[test]
    fn outcome_from_result_uses_class() {
        let ok: AttemptOutcome<u8, TestError> = AttemptOutcome::from_result(Ok(1));
        assert_eq!(ok, AttemptOutcome::Ok(1));

        let retry: AttemptOutcome<u8, TestError> =
            AttemptOutcome::from_result(Err(TestError(ErrorClass::Retryable)));
        assert!(matches!(retry, AttemptOutcome::Retryable(_)));

        let fatal: AttemptOutcome<u8, TestError> =
            AttemptOutcome::from_result(Err(TestError(ErrorClass::Fatal)));
        assert!(matches!(fatal, AttemptOutcome::Fatal(_)));
    }

    #[tokio::test]
    async fn succeeds_after_transient_failures() {
        let calls = Arc::new(AtomicU32::new(0));
        let counter = Arc::clone(&calls);

        let result = run_with_retry(&fast_policy(), &CancellationToken::new(), "test", |attempt| {
            let counter = Arc::clone(&counter);
            async move {
                counter.fetch_add(1, Ordering::SeqCst);
                if attempt < 3 {
                    AttemptOutcome::Retryable(TestError(ErrorClass::Retryable))
                } else {
                    AttemptOutcome::Ok(attempt)
                }
            }
        })
        .await;

        assert_eq!(result, Ok(3));
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn gives_up_after_max_attempts() {
        let calls = Arc::new(AtomicU32::new(0));
        let counter = Arc::clone(&calls);

        let result: Result<(), _> =
            run_with_retry(&fast_policy(), &CancellationToken::new(), "test", |_| {
                let counter = Arc::clone(&counter);
                async move {
                    counter.fetch_add(1, Ordering::SeqCst);
                    AttemptOutcome::Retryable(TestError(ErrorClass::Retryable))
                }
            })
            .await;

        assert!(matches!(result, Err(RetryError::Exhausted { attempts: 3, .. })));
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn fatal_error_stops_immediately() {
        let calls = Arc::new(AtomicU32::new(0));
        let counter = Arc::clone(&calls);

        let result: Result<(), _> =
            run_with_retry(&fast_policy(), &CancellationToken::new(), "test", |_| {
                let counter = Arc::clone(&counter);
                async move {
                    counter.fetch_add(1, Ordering::SeqCst);
                    AttemptOutcome::Fatal(TestError(ErrorClass::Fatal))
                }
            })
            .await;

        assert!(matches!(result, Err(RetryError::Fatal { attempt: 1, .. })));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn cancellation_interrupts_backoff() {
        let policy = RetryPolicy::new(3, Duration::from_secs(60));
        let cancel = CancellationToken::new();
        let trigger = cancel.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(20)).await;
            trigger.cancel();
        });

        let started = std::time::Instant::now();
        let result: Result<(), _> = run_with_retry(&policy, &cancel, "test", |_| async {
            AttemptOutcome::Retryable(TestError(ErrorClass::Retryable))
        })
        .await;

        assert_eq!(result, Err(RetryError::Cancelled));
        assert!(started.elapsed() < Duration::from_secs(5));
    }

    #[tokio::test]
    async fn cancelled_token_skips_the_call() {
        let cancel = CancellationToken::new();
        cancel.cancel();

        let calls = Arc::new(AtomicU32::new(0));
        let counter = Arc::clone(&calls);

        let result: Result<(), RetryError<TestError>> =
            run_with_retry(&fast_policy(), &cancel, "test", |_| {
                let counter = Arc::clone(&counter);
                async move {
                    counter.fetch_add(1, Ordering::SeqCst);
                    AttemptOutcome::Ok(())
                }
            })
            .await;

        assert_eq!(result, Err(RetryError::Cancelled));
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn retryable_status_codes() {
        assert!(is_retryable_status(429));
        assert!(is_retryable_status(408));
        assert!(is_retryable_status(503));
        assert!(!is_retryable_status(400));
        assert!(!is_retryable_status(422));
    }
}
