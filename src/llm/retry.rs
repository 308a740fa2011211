use std::future::Future;
use std::time::Duration;

use tracing::{info, warn};

use super::backend::{BackendError, RetryClass};
use crate::error::LexError;

/// Bounded retry with a fixed delay between attempts
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Total attempts, including the first one
    pub max_attempts: u32,
    /// Pause between attempts
    pub delay: Duration,
    /// Decides whether an error deserves another attempt
    pub classify: fn(&BackendError) -> RetryClass,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            delay: Duration::from_secs(1),
            classify: BackendError::classify,
        }
    }
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, delay: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            delay,
            ..Default::default()
        }
    }

    /// Run `call` until it succeeds, fails terminally, or attempts run out.
    ///
    /// The last error is wrapped in `LexError::GenerationFailed` for `stage`.
    pub async fn run<F, Fut>(&self, stage: &str, mut call: F) -> Result<String, LexError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<String, BackendError>>,
    {
        let max_attempts = self.max_attempts.max(1);
        let mut attempt = 0;

        loop {
            attempt += 1;
            if attempt > 1 {
                info!("Stage {}: retry {} of {}", stage, attempt - 1, max_attempts - 1);
            }

            let error = match call().await {
                Ok(text) if !text.trim().is_empty() => return Ok(text),
                Ok(_) => BackendError::EmptyResponse,
                Err(e) => e,
            };

            let class = (self.classify)(&error);
            if class == RetryClass::Terminal || attempt >= max_attempts {
                warn!(
                    "Stage {} failed after {} attempt(s): {}",
                    stage, attempt, error
                );
                return Err(LexError::GenerationFailed {
                    stage: stage.to_string(),
                    attempts: attempt,
                    source: error,
                });
            }

            warn!("Stage {} attempt {} failed: {}", stage, attempt, error);
            if !self.delay.is_zero() {
                tokio::time::sleep(self.delay).await;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicU32, Ordering};

    use super::*;

    fn instant(max_attempts: u32) -> RetryPolicy {
        RetryPolicy::new(max_attempts, Duration::ZERO)
    }

    #[test]
    fn test_retry_policy_default() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.max_attempts, 3);
        assert_eq!(policy.delay, Duration::from_secs(1));
    }

    #[tokio::test]
    async fn test_succeeds_after_transient_failures() {
        let calls = AtomicU32::new(0);
        let result = instant(3)
            .run("drafting", || {
                let n = calls.fetch_add(1, Ordering::SeqCst);
                async move {
                    if n < 2 {
                        Err(BackendError::EmptyResponse)
                    } else {
                        Ok("documento".to_string())
                    }
                }
            })
            .await;

        assert_eq!(result.unwrap(), "documento");
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_exhaustion_reports_attempts() {
        let calls = AtomicU32::new(0);
        let result = instant(3)
            .run("analysis", || {
                calls.fetch_add(1, Ordering::SeqCst);
                async { Ok::<_, BackendError>("   ".to_string()) }
            })
            .await;

        match result {
            Err(LexError::GenerationFailed {
                stage,
                attempts,
                source,
            }) => {
                assert_eq!(stage, "analysis");
                assert_eq!(attempts, 3);
                assert!(matches!(source, BackendError::EmptyResponse));
            }
            other => panic!("unexpected result: {:?}", other),
        }
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_terminal_error_is_not_retried() {
        let calls = AtomicU32::new(0);
        let result = instant(5)
            .run("review", || {
                calls.fetch_add(1, Ordering::SeqCst);
                async {
                    Err::<String, _>(BackendError::Api {
                        status: 401,
                        body: "unauthorized".to_string(),
                    })
                }
            })
            .await;

        assert!(matches!(
            result,
            Err(LexError::GenerationFailed { attempts: 1, .. })
        ));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
