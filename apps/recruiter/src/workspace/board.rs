use std::sync::Arc;

use serde::Serialize;
use tokio::sync::RwLock;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use super::registry::WorkspaceRegistry;
use super::request::{PendingLoads, RequestPolicy, Requests};
use super::JobWorkspace;
use crate::errors::RecruiterError;
use crate::gateway::RemoteGateway;
use crate::models::{Job, JobId, NewJob};

/// Snapshot of the job list.
#[derive(Debug, Clone, Default, Serialize)]
pub struct BoardView {
    pub jobs: Vec<Job>,
    pub loading: bool,
    pub load_error: Option<String>,
    pub notice: Option<String>,
}

#[derive(Debug, Default)]
struct BoardState {
    jobs: Vec<Job>,
    load_error: Option<String>,
    notice: Option<String>,
}

struct Inner {
    gateway: Arc<dyn RemoteGateway>,
    requests: Requests,
    workspaces: WorkspaceRegistry,
    loads: PendingLoads,
    state: RwLock<BoardState>,
}

/// Coordinator for the job list: loading, creating and deleting jobs.
#[derive(Clone)]
pub struct JobBoard {
    inner: Arc<Inner>,
}

impl JobBoard {
    pub fn new(gateway: Arc<dyn RemoteGateway>, policy: RequestPolicy) -> Self {
        Self::with_registry(WorkspaceRegistry::new(
            gateway,
            policy,
            CancellationToken::new(),
        ))
    }

    /// A board whose job deletions close the workspaces open in `workspaces`.
    pub fn with_registry(workspaces: WorkspaceRegistry) -> Self {
        Self {
            inner: Arc::new(Inner {
                gateway: workspaces.gateway(),
                requests: Requests::new(workspaces.policy(), workspaces.root().clone()),
                workspaces,
                loads: PendingLoads::default(),
                state: RwLock::new(BoardState::default()),
            }),
        }
    }

    /// The workspace for `job_id`, shared with every other caller of this board.
    pub fn workspace(&self, job_id: JobId) -> JobWorkspace {
        self.inner.workspaces.open(job_id)
    }

    pub async fn view(&self) -> BoardView {
        let state = self.inner.state.read().await;
        BoardView {
            jobs: state.jobs.clone(),
            loading: self.inner.loads.active(),
            load_error: state.load_error.clone(),
            notice: state.notice.clone(),
        }
    }

    pub async fn load(&self) -> Result<(), RecruiterError> {
        let _pending = self.inner.loads.begin();

        let limit = self.inner.requests.policy().request_timeout;
        let result = self
            .inner
            .requests
            .run(limit, async {
                self.inner
                    .gateway
                    .list_jobs()
                    .await
                    .map_err(RecruiterError::remote)
            })
            .await;

        let mut state = self.inner.state.write().await;
        match result {
            Ok(jobs) => {
                info!("Loaded {} jobs", jobs.len());
                state.jobs = jobs;
                state.load_error = None;
                Ok(())
            }
            Err(e) => {
                warn!("Failed to load jobs: {e}");
                state.jobs.clear();
                state.load_error = Some(format!("Failed to load jobs: {e}"));
                Err(e)
            }
        }
    }

    /// Validates and submits a job, then reloads the list.
    pub async fn create_job(&self, job: NewJob) -> Result<Job, RecruiterError> {
        let result = self.submit(job).await;
        let created = match result {
            Ok(created) => created,
            Err(e) => {
                self.inner.state.write().await.notice = Some(e.notice());
                return Err(e);
            }
        };
        info!("Created job {} ({})", created.id, created.title);
        self.load().await?;
        Ok(created)
    }

    async fn submit(&self, job: NewJob) -> Result<Job, RecruiterError> {
        let job = job.normalized()?;
        let limit = self.inner.requests.policy().request_timeout;
        self.inner
            .requests
            .run(limit, async {
                self.inner
                    .gateway
                    .create_job(&job)
                    .await
                    .map_err(RecruiterError::remote)
            })
            .await
    }

    /// Deletes a job remotely (candidates cascade), then drops it from the
    /// held list and closes the workspace open on it.
    pub async fn delete_job(&self, job_id: JobId) -> Result<(), RecruiterError> {
        let limit = self.inner.requests.policy().request_timeout;
        let result = self
            .inner
            .requests
            .run(limit, async {
                self.inner
                    .gateway
                    .delete_job(job_id)
                    .await
                    .map_err(RecruiterError::remote)
            })
            .await;

        if let Err(e) = result {
            self.inner.state.write().await.notice = Some(e.notice());
            return Err(e);
        }

        self.inner
            .state
            .write()
            .await
            .jobs
            .retain(|job| job.id != job_id);
        self.inner.workspaces.close(job_id).await;
        info!("Deleted job {job_id}");
        Ok(())
    }

    pub async fn dismiss_notice(&self) {
        self.inner.state.write().await.notice = None;
    }

    pub fn cancel(&self) {
        self.inner.requests.cancel_outstanding();
    }
}
