//! Exponential backoff with jitter
//!
//! [`RetryExecutor`] knows nothing about payouts: it repeats an async
//! operation while it fails with a retryable error, sleeping between
//! attempts, and stops early when its cancellation token fires.

use crate::{Error, Result};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

/// Backoff policy
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryPolicy {
    /// Retries after the first failed attempt
    pub max_retries: u32,

    /// Delay before the first retry
    pub initial_delay_ms: u64,

    /// Upper bound on any delay
    pub max_delay_ms: u64,

    /// Growth factor per retry
    pub backoff_multiplier: f64,

    /// Random spread as a fraction of the delay (0 = deterministic)
    pub jitter_factor: f64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 3,
            initial_delay_ms: 2000,
            max_delay_ms: 30000,
            backoff_multiplier: 2.0,
            jitter_factor: 0.1,
        }
    }
}

impl RetryPolicy {
    /// Check the policy can produce sane delays
    pub fn validate(&self) -> Result<()> {
        if self.backoff_multiplier.is_nan() || self.backoff_multiplier < 1.0 {
            return Err(Error::Config(format!(
                "backoff_multiplier must be >= 1, got {}",
                self.backoff_multiplier
            )));
        }
        if !(0.0..=1.0).contains(&self.jitter_factor) {
            return Err(Error::Config(format!(
                "jitter_factor must be in [0, 1], got {}",
                self.jitter_factor
            )));
        }
        if self.initial_delay_ms > self.max_delay_ms {
            return Err(Error::Config(
                "initial_delay_ms exceeds max_delay_ms".to_string(),
            ));
        }
        Ok(())
    }

    /// Delay before retry number `retry` (0-based), capped and jittered
    pub fn delay_for(&self, retry: u32) -> Duration {
        let exponent = i32::try_from(retry).unwrap_or(i32::MAX);
        let base_delay = self.initial_delay_ms as f64 * self.backoff_multiplier.powi(exponent);
        let capped_delay = base_delay.min(self.max_delay_ms as f64);

        let jitter = if self.jitter_factor > 0.0 {
            let range = capped_delay * self.jitter_factor;
            rand::thread_rng().gen_range(-range..=range)
        } else {
            0.0
        };

        Duration::from_millis((capped_delay + jitter).max(0.0) as u64)
    }
}

/// Runs an operation under a [`RetryPolicy`]
#[derive(Debug, Clone, Default)]
pub struct RetryExecutor {
    policy: RetryPolicy,
}

impl RetryExecutor {
    /// Create new executor
    pub fn new(policy: RetryPolicy) -> Self {
        Self { policy }
    }

    /// Backoff policy
    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    /// Retry `operation` until it succeeds, fails permanently or the budget
    /// runs out.
    ///
    /// `retries_used` counts retries already spent on this work item in
    /// earlier calls, so the budget holds across runs. Each attempt is
    /// preceded by its backoff delay. Cancellation is checked between
    /// attempts only; an attempt that has started always runs to completion.
    pub async fn execute<F, Fut, T>(
        &self,
        operation_name: &str,
        retries_used: u32,
        cancel: &CancellationToken,
        mut operation: F,
    ) -> Result<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        let mut last_error: Option<Error> = None;

        for retry in retries_used..self.policy.max_retries {
            let delay = self.policy.delay_for(retry);
            warn!(
                operation = operation_name,
                attempt = retry + 1,
                max_retries = self.policy.max_retries,
                delay_ms = delay.as_millis() as u64,
                "Retrying after backoff"
            );

            tokio::select! {
                biased;
                _ = cancel.cancelled() => {
                    info!(operation = operation_name, "Retry cancelled");
                    return Err(Error::Cancelled(format!("{} cancelled before retry {}", operation_name, retry + 1)));
                }
                _ = tokio::time::sleep(delay) => {}
            }

            match operation().await {
                Ok(value) => {
                    info!(operation = operation_name, attempt = retry + 1, "Retry succeeded");
                    return Ok(value);
                }
                Err(e) if e.is_retryable() => {
                    warn!(operation = operation_name, attempt = retry + 1, error = %e, "Retry failed");
                    last_error = Some(e);
                }
                Err(e) => {
                    warn!(operation = operation_name, error = %e, "Non-retryable error, giving up");
                    return Err(e);
                }
            }
        }

        Err(Error::RetriesExhausted {
            attempts: self.policy.max_retries,
            last_error: last_error
                .map(|e| e.to_string())
                .unwrap_or_else(|| "retry budget already spent".to_string()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;

    fn policy() -> RetryPolicy {
        RetryPolicy {
            max_retries: 3,
            initial_delay_ms: 1000,
            max_delay_ms: 10000,
            backoff_multiplier: 2.0,
            jitter_factor: 0.0,
        }
    }

    #[test]
    fn test_exponential_backoff() {
        let policy = policy();
        assert_eq!(policy.delay_for(0).as_millis(), 1000);
        assert_eq!(policy.delay_for(1).as_millis(), 2000);
        assert_eq!(policy.delay_for(2).as_millis(), 4000);
    }

    #[test]
    fn test_max_delay_cap() {
        let policy = RetryPolicy {
            max_delay_ms: 5000,
            ..policy()
        };
        assert_eq!(policy.delay_for(10).as_millis(), 5000);
        assert_eq!(policy.delay_for(u32::MAX).as_millis(), 5000);
    }

    #[test]
    fn test_jitter_stays_in_range() {
        let policy = RetryPolicy {
            jitter_factor: 0.1,
            ..policy()
        };
        for _ in 0..100 {
            let delay = policy.delay_for(0).as_millis();
            assert!((900..=1100).contains(&delay), "delay {} out of range", delay);
        }
    }

    #[test]
    fn test_policy_validation() {
        assert!(RetryPolicy::default().validate().is_ok());
        assert!(RetryPolicy { backoff_multiplier: 0.5, ..policy() }.validate().is_err());
        assert!(RetryPolicy { jitter_factor: 2.0, ..policy() }.validate().is_err());
        assert!(RetryPolicy { initial_delay_ms: 20000, ..policy() }.validate().is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn test_succeeds_after_transient_failures() {
        let executor = RetryExecutor::new(policy());
        let calls = Arc::new(AtomicU32::new(0));
        let started = tokio::time::Instant::now();

        let counter = calls.clone();
        let result = executor
            .execute("payout", 0, &CancellationToken::new(), || {
                let counter = counter.clone();
                async move {
                    if counter.fetch_add(1, Ordering::SeqCst) < 2 {
                        Err(Error::TransientFailure("bank timeout".to_string()))
                    } else {
                        Ok("done")
                    }
                }
            })
            .await;

        assert_eq!(result.unwrap(), "done");
        assert_eq!(calls.load(Ordering::SeqCst), 3);
        // 1s + 2s + 4s of backoff
        let elapsed = started.elapsed();
        assert!(elapsed >= Duration::from_millis(7000) && elapsed < Duration::from_millis(7100));
    }

    #[tokio::test(start_paused = true)]
    async fn test_exhaustion() {
        let executor = RetryExecutor::new(policy());
        let calls = AtomicU32::new(0);

        let result: Result<()> = executor
            .execute("payout", 1, &CancellationToken::new(), || {
                calls.fetch_add(1, Ordering::SeqCst);
                async { Err(Error::TransientFailure("bank timeout".to_string())) }
            })
            .await;

        // One retry already spent elsewhere
        assert_eq!(calls.load(Ordering::SeqCst), 2);
        assert!(matches!(
            result,
            Err(Error::RetriesExhausted { attempts: 3, ref last_error }) if last_error.contains("bank timeout")
        ));
    }

    #[tokio::test(start_paused = true)]
    async fn test_non_retryable_stops_immediately() {
        let executor = RetryExecutor::new(policy());
        let calls = AtomicU32::new(0);

        let result: Result<()> = executor
            .execute("payout", 0, &CancellationToken::new(), || {
                calls.fetch_add(1, Ordering::SeqCst);
                async { Err(Error::InvalidInput("closed account".to_string())) }
            })
            .await;

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(matches!(result, Err(Error::InvalidInput(_))));
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancelled_before_attempt() {
        let executor = RetryExecutor::new(policy());
        let cancel = CancellationToken::new();
        cancel.cancel();
        let calls = AtomicU32::new(0);

        let result: Result<()> = executor
            .execute("payout", 0, &cancel, || {
                calls.fetch_add(1, Ordering::SeqCst);
                async { Ok(()) }
            })
            .await;

        assert_eq!(calls.load(Ordering::SeqCst), 0);
        assert!(matches!(result, Err(Error::Cancelled(_))));
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_during_backoff() {
        let executor = RetryExecutor::new(policy());
        let cancel = CancellationToken::new();
        let calls = AtomicU32::new(0);

        let trigger = cancel.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(1500)).await;
            trigger.cancel();
        });

        let result: Result<()> = executor
            .execute("payout", 0, &cancel, || {
                calls.fetch_add(1, Ordering::SeqCst);
                async { Err(Error::TransientFailure("bank timeout".to_string())) }
            })
            .await;

        // First retry ran at 1s; cancelled while waiting 2s for the second
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(matches!(result, Err(Error::Cancelled(_))));
    }
}
