use std::sync::Arc;

use anyhow::{Context, Result};
use tokio_util::sync::CancellationToken;

use crate::config::Config;
use crate::gateway::{HttpGateway, RemoteGateway};
use crate::models::JobId;
use crate::workspace::{JobBoard, JobWorkspace, RequestPolicy, WorkspaceRegistry};

/// Shared application state handed to every view.
/// Coordinators built from it share one gateway and stop on `shutdown`;
/// there is at most one workspace per job.
#[derive(Clone)]
pub struct AppState {
    pub gateway: Arc<dyn RemoteGateway>,
    pub config: Config,
    pub shutdown: CancellationToken,
    workspaces: WorkspaceRegistry,
}

impl AppState {
    /// Builds state backed by the HTTP gateway at `config.api_url`.
    pub fn new(config: Config) -> Result<Self> {
        let gateway = HttpGateway::new(&config).context("Failed to build HTTP client")?;
        Ok(Self::with_gateway(Arc::new(gateway), config))
    }

    pub fn with_gateway(gateway: Arc<dyn RemoteGateway>, config: Config) -> Self {
        let shutdown = CancellationToken::new();
        let workspaces = WorkspaceRegistry::new(
            Arc::clone(&gateway),
            RequestPolicy::from(&config),
            shutdown.clone(),
        );
        Self {
            gateway,
            config,
            shutdown,
            workspaces,
        }
    }

    /// A job board whose deletions close the workspaces handed out here.
    pub fn job_board(&self) -> JobBoard {
        JobBoard::with_registry(self.workspaces.clone())
    }

    pub fn workspace(&self, job_id: JobId) -> JobWorkspace {
        self.workspaces.open(job_id)
    }
}
