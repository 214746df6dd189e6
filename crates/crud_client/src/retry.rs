use std::future::Future;
use std::time::Duration;

use crate::client::ApiClient;
use crate::errors::ApiError;

/// Bounded retry with a fixed delay: a definite success/exhausted result
/// instead of an open-ended polling loop.
#[derive(Debug, Clone, Copy)]
pub struct BoundedRetry {
    pub max_attempts: u32,
    pub delay: Duration,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryOutcome {
    /// Succeeded on the given 1-based attempt.
    Success { attempts: u32 },
    Exhausted { attempts: u32 },
}

impl Default for BoundedRetry {
    fn default() -> Self {
        // matches the provisioning wait: 24 attempts x 500 ms = 12 s ceiling
        BoundedRetry {
            max_attempts: 24,
            delay: Duration::from_millis(500),
        }
    }
}

impl BoundedRetry {
    /// Run `op` until it reports success or attempts run out. No delay after
    /// the final attempt.
    pub async fn run<F, Fut>(&self, mut op: F) -> RetryOutcome
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = bool>,
    {
        for attempt in 1..=self.max_attempts {
            if op().await {
                return RetryOutcome::Success { attempts: attempt };
            }
            if attempt < self.max_attempts {
                tokio::time::sleep(self.delay).await;
            }
        }
        RetryOutcome::Exhausted {
            attempts: self.max_attempts,
        }
    }
}

impl ApiClient {
    /// Wait for the identity provider to reflect freshly provisioned tenant
    /// metadata (`GET /internal/wait_for_metadata?sub=..&org_id=..`).
    /// Transport errors count as a failed attempt, not a hard failure.
    pub async fn wait_for_provisioning(
        &self,
        sub: &str,
        org_id: &str,
        retry: BoundedRetry,
    ) -> Result<RetryOutcome, ApiError> {
        let mut url = self.base_url().clone();
        url.path_segments_mut()
            .map_err(|_| url::ParseError::RelativeUrlWithCannotBeABaseBase)?
            .extend(["internal", "wait_for_metadata"]);
        url.query_pairs_mut()
            .append_pair("sub", sub)
            .append_pair("org_id", org_id);

        let outcome = retry
            .run(|| {
                let request = self.http.get(url.clone());
                async move {
                    match request.send().await {
                        Ok(response) => response.status().is_success(),
                        Err(err) => {
                            tracing::debug!(error = %err, "provisioning probe failed");
                            false
                        }
                    }
                }
            })
            .await;
        Ok(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    fn fast_retry(max_attempts: u32) -> BoundedRetry {
        BoundedRetry {
            max_attempts,
            delay: Duration::from_millis(1),
        }
    }

    #[tokio::test]
    async fn succeeds_on_later_attempt() {
        let calls = Cell::new(0u32);
        let outcome = fast_retry(5)
            .run(|| {
                calls.set(calls.get() + 1);
                let done = calls.get() == 3;
                async move { done }
            })
            .await;

        assert_eq!(outcome, RetryOutcome::Success { attempts: 3 });
        assert_eq!(calls.get(), 3);
    }

    #[tokio::test]
    async fn exhausts_after_max_attempts() {
        let calls = Cell::new(0u32);
        let outcome = fast_retry(4)
            .run(|| {
                calls.set(calls.get() + 1);
                async { false }
            })
            .await;

        assert_eq!(outcome, RetryOutcome::Exhausted { attempts: 4 });
        assert_eq!(calls.get(), 4);
    }

    #[tokio::test]
    async fn first_attempt_success_never_sleeps() {
        let outcome = fast_retry(1).run(|| async { true }).await;
        assert_eq!(outcome, RetryOutcome::Success { attempts: 1 });
    }
}
