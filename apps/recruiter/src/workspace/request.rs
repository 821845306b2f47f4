use std::future::Future;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use tokio_util::sync::CancellationToken;

use crate::config::Config;
use crate::errors::RecruiterError;

/// Per-request deadlines applied by the coordinators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestPolicy {
    pub request_timeout: Duration,
    pub analysis_timeout: Duration,
    pub batch_timeout: Duration,
}

impl Default for RequestPolicy {
    fn default() -> Self {
        RequestPolicy::from(&Config::default())
    }
}

impl From<&Config> for RequestPolicy {
    fn from(config: &Config) -> Self {
        Self {
            request_timeout: config.request_timeout,
            analysis_timeout: config.analysis_timeout,
            batch_timeout: config.batch_timeout,
        }
    }
}

/// Runs remote calls under a deadline and a cancellation token.
///
/// `cancel_outstanding` cancels every call started so far and lets later calls
/// proceed; cancelling the root token (e.g. on shutdown) stops everything.
#[derive(Debug)]
pub(crate) struct Requests {
    policy: RequestPolicy,
    root: CancellationToken,
    current: Mutex<CancellationToken>,
}

impl Requests {
    pub fn new(policy: RequestPolicy, root: CancellationToken) -> Self {
        let current = root.child_token();
        Self {
            policy,
            root,
            current: Mutex::new(current),
        }
    }

    pub fn policy(&self) -> RequestPolicy {
        self.policy
    }

    fn token(&self) -> CancellationToken {
        self.current
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    pub fn cancel_outstanding(&self) {
        let mut current = self
            .current
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        let previous = std::mem::replace(&mut *current, self.root.child_token());
        previous.cancel();
    }

    pub async fn run<T, F>(&self, limit: Duration, fut: F) -> Result<T, RecruiterError>
    where
        F: Future<Output = Result<T, RecruiterError>>,
    {
        let token = self.token();
        tokio::select! {
            _ = token.cancelled() => Err(RecruiterError::Cancelled),
            outcome = tokio::time::timeout(limit, fut) => match outcome {
                Ok(result) => result,
                Err(_) => {
                    tracing::warn!("remote call exceeded {limit:?}");
                    Err(RecruiterError::Timeout(limit))
                }
            },
        }
    }
}

/// Count of loads in progress. Each load holds a `PendingLoad` for its whole
/// lifetime, so a load whose future is dropped still stops counting.
#[derive(Debug, Default)]
pub(crate) struct PendingLoads(AtomicUsize);

impl PendingLoads {
    pub fn begin(&self) -> PendingLoad<'_> {
        self.0.fetch_add(1, Ordering::SeqCst);
        PendingLoad(&self.0)
    }

    pub fn active(&self) -> bool {
        self.0.load(Ordering::SeqCst) > 0
    }
}

pub(crate) struct PendingLoad<'a>(&'a AtomicUsize);

impl Drop for PendingLoad<'_> {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}
