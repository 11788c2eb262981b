// Bounded retry for endpoints that answer 400 while the controller is still
// running its asynchronous consistency checks (BGP peers, static routes).

use std::future::Future;
use std::time::Duration;

use tracing::warn;

use crate::error::Error;

/// Retry policy applied to `BadRequest` responses only.
///
/// Any other error, and the final `BadRequest` once retries run out, is
/// returned unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Extra attempts after the first one.
    pub retries: u32,
    /// Fixed pause before each extra attempt.
    pub delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            retries: 1,
            delay: Duration::from_secs(60),
        }
    }
}

impl RetryPolicy {
    pub const fn new(retries: u32, delay: Duration) -> Self {
        Self { retries, delay }
    }

    /// Single attempt, no retry.
    pub const fn none() -> Self {
        Self {
            retries: 0,
            delay: Duration::ZERO,
        }
    }

    /// Run `op`, re-running it after `delay` while it fails with `BadRequest`.
    pub async fn run<T, F, Fut>(&self, what: &str, mut op: F) -> Result<T, Error>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, Error>>,
    {
        let mut attempt = 0;
        loop {
            match op().await {
                Err(e) if e.is_bad_request() && attempt < self.retries => {
                    attempt += 1;
                    warn!(
                        what,
                        attempt,
                        delay_secs = self.delay.as_secs(),
                        error = %e,
                        "controller rejected request, retrying after delay"
                    );
                    tokio::time::sleep(self.delay).await;
                }
                other => return other,
            }
        }
    }
}
