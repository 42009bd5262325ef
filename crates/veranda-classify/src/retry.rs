//! Exponential-backoff retry wrapper

use std::fmt;
use std::future::Future;
use std::time::Duration;
use tokio::time::sleep;
use tracing::debug;

/// Stateless retry configuration, shared across calls.
///
/// The policy only decides *when* to retry; what happens after the final
/// failure (fallback, propagation) is the caller's responsibility, which
/// keeps it reusable for any upstream operation.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Total attempts including the first one, at least 1
    pub max_attempts: u32,
    /// Delay before the first retry
    pub base_delay: Duration,
    /// Factor applied to the delay after every failed attempt
    pub backoff_multiplier: f64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay: Duration::from_millis(200),
            backoff_multiplier: 2.0,
        }
    }
}

impl RetryPolicy {
    /// Create a policy, clamping `max_attempts` to at least 1.
    pub fn new(max_attempts: u32, base_delay: Duration, backoff_multiplier: f64) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            base_delay,
            backoff_multiplier,
        }
    }

    /// Run `op` until it succeeds or the attempt budget is exhausted.
    ///
    /// Each failure sleeps for the current delay and multiplies it by
    /// `backoff_multiplier`. The sleep only suspends this call's task, never
    /// other concurrent callers. The last error is propagated unchanged.
    pub async fn invoke<T, E, F, Fut>(&self, mut op: F) -> Result<T, E>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: fmt::Display,
    {
        let max_attempts = self.max_attempts.max(1);
        let mut delay = self.base_delay;

        for attempt in 1..=max_attempts {
            match op().await {
                Ok(value) => return Ok(value),
                Err(e) if attempt < max_attempts => {
                    debug!(
                        "Attempt {}/{} failed: {}, retrying in {:?}",
                        attempt, max_attempts, e, delay
                    );
                    sleep(delay).await;
                    delay = delay.mul_f64(self.backoff_multiplier);
                }
                Err(e) => {
                    debug!("Attempt {}/{} failed: {}, giving up", attempt, max_attempts, e);
                    return Err(e);
                }
            }
        }

        unreachable!("retry loop always returns within the attempt budget")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicU32, Ordering};
    use tokio::time::Instant;

    #[tokio::test(start_paused = true)]
    async fn test_success_passthrough() {
        let policy = RetryPolicy::default();
        let calls = Arc::new(AtomicU32::new(0));

        let counter = calls.clone();
        let result: Result<u32, String> = policy
            .invoke(|| {
                let counter = counter.clone();
                async move {
                    counter.fetch_add(1, Ordering::SeqCst);
                    Ok(42)
                }
            })
            .await;

        assert_eq!(result.unwrap(), 42);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_backoff_growth() {
        let policy = RetryPolicy::new(3, Duration::from_millis(100), 2.0);
        let calls = Arc::new(AtomicU32::new(0));

        let counter = calls.clone();
        let start = Instant::now();
        let result: Result<u32, String> = policy
            .invoke(|| {
                let counter = counter.clone();
                async move {
                    let attempt = counter.fetch_add(1, Ordering::SeqCst) + 1;
                    if attempt <= 2 {
                        Err(format!("boom {}", attempt))
                    } else {
                        Ok(7)
                    }
                }
            })
            .await;

        // Two failures: 100ms then 200ms of backoff before success.
        assert_eq!(result.unwrap(), 7);
        assert_eq!(calls.load(Ordering::SeqCst), 3);
        assert_eq!(start.elapsed(), Duration::from_millis(300));
    }

    #[tokio::test(start_paused = true)]
    async fn test_exhaustion_propagates_last_error() {
        let policy = RetryPolicy::new(3, Duration::from_millis(50), 2.0);
        let calls = Arc::new(AtomicU32::new(0));

        let counter = calls.clone();
        let result: Result<u32, String> = policy
            .invoke(|| {
                let counter = counter.clone();
                async move {
                    let attempt = counter.fetch_add(1, Ordering::SeqCst) + 1;
                    Err(format!("boom {}", attempt))
                }
            })
            .await;

        assert_eq!(result.unwrap_err(), "boom 3");
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_single_attempt_never_sleeps() {
        let policy = RetryPolicy::new(0, Duration::from_millis(100), 2.0);

        let start = Instant::now();
        let result: Result<u32, String> = policy.invoke(|| async { Err("boom".to_string()) }).await;

        assert!(result.is_err());
        assert_eq!(start.elapsed(), Duration::ZERO);
    }
}
