use crate::utils::error::Result;
use std::future::Future;
use std::time::Duration;

/// Exponential backoff: the wait after failed attempt `n` is
/// `multiplier * 2^(n-1)`, clamped to `[min_delay, max_delay]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub multiplier: Duration,
    pub min_delay: Duration,
    pub max_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            multiplier: Duration::from_secs(1),
            min_delay: Duration::from_secs(4),
            max_delay: Duration::from_secs(10),
        }
    }
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, min_delay: Duration, max_delay: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            min_delay,
            max_delay,
            ..Self::default()
        }
    }

    /// Single attempt, no waiting.
    pub fn none() -> Self {
        Self::new(1, Duration::ZERO, Duration::ZERO)
    }

    pub fn delay_for(&self, failed_attempt: u32) -> Duration {
        let exponent = failed_attempt.saturating_sub(1);
        let base = 2u32
            .checked_pow(exponent)
            .and_then(|factor| self.multiplier.checked_mul(factor))
            .unwrap_or(self.max_delay);
        base.clamp(self.min_delay, self.max_delay.max(self.min_delay))
    }

    /// Runs `op` until it succeeds or `max_attempts` is reached; the last
    /// error is returned.
    pub async fn run<T, F, Fut>(&self, operation: &str, mut op: F) -> Result<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        let mut attempt = 1;
        loop {
            match op().await {
                Ok(value) => {
                    if attempt > 1 {
                        tracing::debug!("{} succeeded on attempt {}", operation, attempt);
                    }
                    return Ok(value);
                }
                Err(e) if attempt >= self.max_attempts => {
                    tracing::error!(
                        "❌ {} failed after {} attempt(s): {}",
                        operation,
                        attempt,
                        e
                    );
                    return Err(e);
                }
                Err(e) => {
                    let delay = self.delay_for(attempt);
                    tracing::warn!(
                        "⚠️ {} attempt {}/{} failed: {} (retrying in {:?})",
                        operation,
                        attempt,
                        self.max_attempts,
                        e,
                        delay
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::error::BotError;
    use std::sync::atomic::{AtomicU32, Ordering};

    fn db_error() -> BotError {
        BotError::DatabaseError {
            status: 503,
            message: "unavailable".to_string(),
        }
    }

    #[test]
    fn test_default_delays_follow_min_and_max() {
        let policy = RetryPolicy::default();

        // 1s and 2s are raised to the 4s floor, 16s is capped at 10s
        assert_eq!(policy.delay_for(1), Duration::from_secs(4));
        assert_eq!(policy.delay_for(2), Duration::from_secs(4));
        assert_eq!(policy.delay_for(3), Duration::from_secs(4));
        assert_eq!(policy.delay_for(4), Duration::from_secs(8));
        assert_eq!(policy.delay_for(5), Duration::from_secs(10));
        assert_eq!(policy.delay_for(60), Duration::from_secs(10));
    }

    #[test]
    fn test_zero_attempts_means_one() {
        let policy = RetryPolicy::new(0, Duration::ZERO, Duration::ZERO);
        assert_eq!(policy.max_attempts, 1);
    }

    #[tokio::test]
    async fn test_run_retries_until_success() {
        let calls = AtomicU32::new(0);
        let policy = RetryPolicy::new(3, Duration::ZERO, Duration::ZERO);

        let result = policy
            .run("flaky", || async {
                let n = calls.fetch_add(1, Ordering::SeqCst) + 1;
                if n < 3 {
                    Err(db_error())
                } else {
                    Ok(n)
                }
            })
            .await
            .unwrap();

        assert_eq!(result, 3);
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_run_returns_last_error() {
        let calls = AtomicU32::new(0);
        let policy = RetryPolicy::new(3, Duration::ZERO, Duration::ZERO);

        let result: Result<()> = policy
            .run("always failing", || async {
                calls.fetch_add(1, Ordering::SeqCst);
                Err(db_error())
            })
            .await;

        assert!(matches!(result, Err(BotError::DatabaseError { status: 503, .. })));
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_single_attempt_policy() {
        let calls = AtomicU32::new(0);

        let result: Result<()> = RetryPolicy::none()
            .run("once", || async {
                calls.fetch_add(1, Ordering::SeqCst);
                Err(db_error())
            })
            .await;

        assert!(result.is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
