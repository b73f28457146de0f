//! # Retry With Backoff
//!
//! Runs an API call with a per-attempt timeout and exponential backoff
//! between retryable failures.
//!
//! ## Attempt Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │   attempt ──► timeout(op) ──┬── Ok ─────────────────────► return Ok     │
//! │      ▲                      │                                           │
//! │      │                      ├── Err, not retryable ─────► return Err    │
//! │      │                      │                                           │
//! │      │                      └── Err/timeout, retryable                  │
//! │      │                               │                                  │
//! │      │                  retries left? ──── no ──────────► return Err    │
//! │      │                               │                                  │
//! │      └──────── sleep(next backoff) ◄─┘ yes                              │
//! │                                                                         │
//! │  BACKOFF (Exponential with Jitter): 500ms, 1s, 2s, ... capped           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use backoff::backoff::Backoff;
use backoff::ExponentialBackoff;
use std::future::Future;
use std::time::Duration;
use tokio::time::timeout;
use tracing::{debug, warn};

use crate::error::{CheckoutError, CheckoutResult};

/// How an API call is retried.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Retries after the first attempt.
    pub max_retries: u32,

    /// Upper bound on a single attempt.
    pub attempt_timeout: Duration,

    /// First backoff interval.
    pub initial_backoff: Duration,

    /// Longest backoff interval.
    pub max_backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        RetryPolicy {
            max_retries: 3,
            attempt_timeout: Duration::from_secs(15),
            initial_backoff: Duration::from_millis(500),
            max_backoff: Duration::from_secs(10),
        }
    }
}

impl RetryPolicy {
    fn create_backoff(&self) -> ExponentialBackoff {
        ExponentialBackoff {
            initial_interval: self.initial_backoff,
            max_interval: self.max_backoff,
            multiplier: 2.0,
            max_elapsed_time: None,
            ..Default::default()
        }
    }
}

/// Runs `op` until it succeeds, fails with a non-retryable error, or the
/// policy's retries are used up. Returns the last error.
pub async fn with_retry<T, F, Fut>(policy: &RetryPolicy, operation: &str, mut op: F) -> CheckoutResult<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = CheckoutResult<T>>,
{
    let mut backoff = policy.create_backoff();
    let mut attempt = 0u32;

    loop {
        attempt += 1;

        let result = match timeout(policy.attempt_timeout, op()).await {
            Ok(result) => result,
            Err(_) => Err(CheckoutError::Timeout(policy.attempt_timeout.as_secs())),
        };

        let err = match result {
            Ok(value) => {
                if attempt > 1 {
                    debug!(operation, attempt, "Request succeeded after retry");
                }
                return Ok(value);
            }
            Err(err) => err,
        };

        if !err.is_retryable() {
            return Err(err);
        }

        if attempt > policy.max_retries {
            warn!(operation, attempts = attempt, error = %err, "Giving up after retries");
            return Err(err);
        }

        let Some(delay) = backoff.next_backoff() else {
            return Err(err);
        };

        warn!(operation, attempt, ?delay, error = %err, "Request failed, retrying");
        tokio::time::sleep(delay).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;

    fn fast_policy(max_retries: u32) -> RetryPolicy {
        RetryPolicy {
            max_retries,
            attempt_timeout: Duration::from_secs(1),
            initial_backoff: Duration::from_millis(1),
            max_backoff: Duration::from_millis(5),
        }
    }

    #[tokio::test]
    async fn test_succeeds_after_transient_failures() {
        let calls = Arc::new(AtomicU32::new(0));
        let counter = calls.clone();

        let result = with_retry(&fast_policy(3), "test", || {
            let counter = counter.clone();
            async move {
                let n = counter.fetch_add(1, Ordering::SeqCst) + 1;
                if n < 3 {
                    Err(CheckoutError::ConnectionFailed("reset".into()))
                } else {
                    Ok(n)
                }
            }
        })
        .await;

        assert_eq!(result.unwrap(), 3);
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_stops_on_non_retryable_error() {
        let calls = Arc::new(AtomicU32::new(0));
        let counter = calls.clone();

        let result: CheckoutResult<()> = with_retry(&fast_policy(5), "test", || {
            let counter = counter.clone();
            async move {
                counter.fetch_add(1, Ordering::SeqCst);
                Err(CheckoutError::HttpStatus {
                    status: 400,
                    message: "bad request".into(),
                })
            }
        })
        .await;

        assert!(matches!(result, Err(CheckoutError::HttpStatus { status: 400, .. })));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_gives_up_after_max_retries() {
        let calls = Arc::new(AtomicU32::new(0));
        let counter = calls.clone();

        let result: CheckoutResult<()> = with_retry(&fast_policy(2), "test", || {
            let counter = counter.clone();
            async move {
                counter.fetch_add(1, Ordering::SeqCst);
                Err(CheckoutError::HttpStatus {
                    status: 503,
                    message: "unavailable".into(),
                })
            }
        })
        .await;

        assert!(result.is_err());
        // First attempt plus two retries
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_attempt_timeout_is_retryable() {
        let calls = Arc::new(AtomicU32::new(0));
        let counter = calls.clone();

        let result: CheckoutResult<()> = with_retry(&fast_policy(1), "test", || {
            let counter = counter.clone();
            async move {
                counter.fetch_add(1, Ordering::SeqCst);
                tokio::time::sleep(Duration::from_secs(60)).await;
                Ok(())
            }
        })
        .await;

        assert!(matches!(result, Err(CheckoutError::Timeout(1))));
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }
}
