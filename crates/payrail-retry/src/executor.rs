//! Bounded exponential-backoff retry executor.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::classify::{ClassifyError, ErrorKind};

/// Retry policy: attempt bound and backoff shape. Immutable once built.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetryPolicy {
    /// Maximum retries after the first attempt. Default: 3 (up to 4 tries).
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
    /// Delay before the first retry (ms). Default: 500.
    #[serde(default = "default_initial_delay_ms")]
    pub initial_delay_ms: u64,
    /// Backoff multiplier per attempt. Default: 2 (pure exponential).
    #[serde(default = "default_backoff_multiplier")]
    pub backoff_multiplier: u32,
}

fn default_max_attempts() -> u32 {
    3
}

fn default_initial_delay_ms() -> u64 {
    500
}

fn default_backoff_multiplier() -> u32 {
    2
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            initial_delay_ms: default_initial_delay_ms(),
            backoff_multiplier: default_backoff_multiplier(),
        }
    }
}

impl RetryPolicy {
    /// Delay before the retry following failure number `attempt` (0-based).
    pub fn delay_for(&self, attempt: u32) -> Duration {
        let factor = u64::from(self.backoff_multiplier).saturating_pow(attempt);
        Duration::from_millis(self.initial_delay_ms.saturating_mul(factor))
    }
}

/// Observes retry attempts; implemented by the telemetry sink.
pub trait RetryObserver: Send + Sync {
    fn on_retry(&self, operation: &str, kind: ErrorKind, attempt: u32);
}

/// Runs operations under a retry policy.
///
/// Failures are classified through [`ClassifyError`]; only retryable kinds
/// are retried, and the final failure propagates unchanged. The backoff
/// sleep suspends only the calling task.
#[derive(Clone, Default)]
pub struct RetryExecutor {
    observer: Option<Arc<dyn RetryObserver>>,
}

impl RetryExecutor {
    pub fn new() -> Self {
        Self { observer: None }
    }

    /// Attach an observer notified on every retry.
    pub fn with_observer(observer: Arc<dyn RetryObserver>) -> Self {
        Self {
            observer: Some(observer),
        }
    }

    /// Run `operation`, retrying per `policy`.
    ///
    /// `operation` is re-invoked for each attempt. The error of the last
    /// attempt is returned unchanged when retries are exhausted or the
    /// failure is classified non-retryable.
    pub async fn execute<T, E, F, Fut>(
        &self,
        operation_name: &str,
        policy: &RetryPolicy,
        mut operation: F,
    ) -> Result<T, E>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: ClassifyError + std::fmt::Display,
    {
        let mut attempt: u32 = 0;
        loop {
            match operation().await {
                Ok(value) => {
                    if attempt > 0 {
                        debug!(
                            operation = operation_name,
                            attempt, "Operation succeeded after retry"
                        );
                    }
                    return Ok(value);
                }
                Err(err) => {
                    let classification = err.classification();
                    if !classification.retryable || attempt >= policy.max_attempts {
                        return Err(err);
                    }
                    let delay = policy.delay_for(attempt);
                    warn!(
                        operation = operation_name,
                        kind = classification.kind.as_str(),
                        attempt = attempt + 1,
                        max_attempts = policy.max_attempts,
                        delay_ms = delay.as_millis() as u64,
                        error = %err,
                        "Retryable gateway failure, backing off"
                    );
                    if let Some(observer) = &self.observer {
                        observer.on_retry(operation_name, classification.kind, attempt + 1);
                    }
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
            }
        }
    }
}

impl std::fmt::Debug for RetryExecutor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RetryExecutor")
            .field("has_observer", &self.observer.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::{classify_status, Classification};
    use std::sync::atomic::{AtomicU32, Ordering};
    use tokio::time::Instant;

    #[derive(Debug)]
    struct FakeHttpError(u16);

    impl std::fmt::Display for FakeHttpError {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            write!(f, "HTTP {}", self.0)
        }
    }

    impl ClassifyError for FakeHttpError {
        fn classification(&self) -> Classification {
            classify_status(self.0)
        }
    }

    fn flaky(
        failures: u32,
        status: u16,
        calls: Arc<AtomicU32>,
    ) -> impl FnMut() -> std::future::Ready<Result<&'static str, FakeHttpError>> {
        move || {
            let n = calls.fetch_add(1, Ordering::SeqCst);
            if n < failures {
                std::future::ready(Err(FakeHttpError(status)))
            } else {
                std::future::ready(Ok("ok"))
            }
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_two_rate_limits_then_success_is_three_attempts() {
        let calls = Arc::new(AtomicU32::new(0));
        let result = RetryExecutor::new()
            .execute("charge", &RetryPolicy::default(), flaky(2, 429, calls.clone()))
            .await;
        assert_eq!(result.unwrap(), "ok");
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_validation_error_fails_after_one_attempt() {
        let calls = Arc::new(AtomicU32::new(0));
        let result = RetryExecutor::new()
            .execute("charge", &RetryPolicy::default(), flaky(10, 400, calls.clone()))
            .await;
        assert_eq!(result.unwrap_err().0, 400);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_exhaustion_returns_last_error() {
        let calls = Arc::new(AtomicU32::new(0));
        let policy = RetryPolicy {
            max_attempts: 2,
            ..RetryPolicy::default()
        };
        let result = RetryExecutor::new()
            .execute("charge", &policy, flaky(10, 503, calls.clone()))
            .await;
        assert_eq!(result.unwrap_err().0, 503);
        // 1 initial try + 2 retries
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_backoff_is_exponential() {
        let calls = Arc::new(AtomicU32::new(0));
        let policy = RetryPolicy {
            max_attempts: 2,
            initial_delay_ms: 500,
            backoff_multiplier: 2,
        };
        let start = Instant::now();
        let _ = RetryExecutor::new()
            .execute("charge", &policy, flaky(10, 500, calls.clone()))
            .await;
        // 500ms + 1000ms of (paused) sleep
        let elapsed = start.elapsed();
        assert!(elapsed >= Duration::from_millis(1500), "elapsed {elapsed:?}");
        assert!(elapsed < Duration::from_millis(2000), "elapsed {elapsed:?}");
    }

    #[tokio::test(start_paused = true)]
    async fn test_observer_sees_each_retry() {
        struct Counting(AtomicU32);
        impl RetryObserver for Counting {
            fn on_retry(&self, _operation: &str, kind: ErrorKind, _attempt: u32) {
                assert_eq!(kind, ErrorKind::RateLimited);
                self.0.fetch_add(1, Ordering::SeqCst);
            }
        }
        let observer = Arc::new(Counting(AtomicU32::new(0)));
        let calls = Arc::new(AtomicU32::new(0));
        let result = RetryExecutor::with_observer(observer.clone())
            .execute("charge", &RetryPolicy::default(), flaky(2, 429, calls))
            .await;
        assert!(result.is_ok());
        assert_eq!(observer.0.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_delay_for() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.delay_for(0), Duration::from_millis(500));
        assert_eq!(policy.delay_for(1), Duration::from_millis(1000));
        assert_eq!(policy.delay_for(2), Duration::from_millis(2000));
    }
}
