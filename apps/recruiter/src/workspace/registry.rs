use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use tokio_util::sync::CancellationToken;
use tracing::info;

use super::request::RequestPolicy;
use super::JobWorkspace;
use crate::gateway::RemoteGateway;
use crate::models::JobId;

/// The workspaces open per job. Shared by `JobBoard` and `AppState`, so a job
/// deletion reaches whatever view is held for that job.
#[derive(Clone)]
pub struct WorkspaceRegistry {
    gateway: Arc<dyn RemoteGateway>,
    policy: RequestPolicy,
    root: CancellationToken,
    open: Arc<Mutex<HashMap<JobId, JobWorkspace>>>,
}

impl WorkspaceRegistry {
    pub fn new(
        gateway: Arc<dyn RemoteGateway>,
        policy: RequestPolicy,
        root: CancellationToken,
    ) -> Self {
        Self {
            gateway,
            policy,
            root,
            open: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    pub fn gateway(&self) -> Arc<dyn RemoteGateway> {
        Arc::clone(&self.gateway)
    }

    pub fn policy(&self) -> RequestPolicy {
        self.policy
    }

    pub fn root(&self) -> &CancellationToken {
        &self.root
    }

    /// The workspace for `job_id`, opened on first use.
    pub fn open(&self, job_id: JobId) -> JobWorkspace {
        self.lock()
            .entry(job_id)
            .or_insert_with(|| {
                JobWorkspace::with_cancellation(
                    Arc::clone(&self.gateway),
                    job_id,
                    self.policy,
                    self.root.child_token(),
                )
            })
            .clone()
    }

    /// Forgets the workspace for `job_id`, cancelling its outstanding requests
    /// and dropping everything it held.
    pub async fn close(&self, job_id: JobId) {
        let removed = self.lock().remove(&job_id);
        if let Some(workspace) = removed {
            info!("Closing workspace for job {}", workspace.job_id());
            workspace.cancel();
            workspace.invalidate().await;
        }
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<JobId, JobWorkspace>> {
        self.open.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
