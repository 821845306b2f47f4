//! Remote data gateway: typed access to the jobs, candidates and analysis
//! resources of the remote store. No business logic lives here: records come
//! back exactly as the store sent them and are validated by the caller.
//!
//! Callers hold an `Arc<dyn RemoteGateway>`; `HttpGateway` is the production
//! implementation, tests substitute an in-memory store.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::{
    CandidateId, CandidateQuery, CandidateRecord, CandidateUpdate, Job, JobId, NewCandidate,
    NewJob,
};

pub mod http;

pub use http::HttpGateway;

#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("{0} not found")]
    NotFound(String),

    #[error("Gave up after {retries} attempts")]
    RetriesExhausted { retries: u32 },
}

/// Outcome of a batch analysis call. Only the aggregate count is kept;
/// per-candidate results are read back through a candidate listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchReport {
    pub job_id: JobId,
    pub total_analyzed: usize,
}

#[async_trait]
pub trait RemoteGateway: Send + Sync {
    async fn list_jobs(&self) -> Result<Vec<Job>, GatewayError>;

    async fn get_job(&self, job_id: JobId) -> Result<Job, GatewayError>;

    async fn create_job(&self, job: &NewJob) -> Result<Job, GatewayError>;

    /// Cascades to the job's candidates on the remote side.
    async fn delete_job(&self, job_id: JobId) -> Result<(), GatewayError>;

    async fn create_candidate(
        &self,
        candidate: &NewCandidate,
    ) -> Result<CandidateRecord, GatewayError>;

    async fn list_candidates(
        &self,
        job_id: JobId,
        query: &CandidateQuery,
    ) -> Result<Vec<CandidateRecord>, GatewayError>;

    async fn get_candidate(
        &self,
        candidate_id: CandidateId,
    ) -> Result<CandidateRecord, GatewayError>;

    async fn update_candidate(
        &self,
        candidate_id: CandidateId,
        update: &CandidateUpdate,
    ) -> Result<CandidateRecord, GatewayError>;

    async fn delete_candidate(&self, candidate_id: CandidateId) -> Result<(), GatewayError>;

    /// Runs analysis for one candidate. The new score and analysis are read
    /// back with `get_candidate` or `list_candidates`.
    async fn analyze(&self, candidate_id: CandidateId) -> Result<(), GatewayError>;

    /// Runs analysis for every candidate of the job that is unscored at call time.
    async fn batch_analyze(&self, job_id: JobId) -> Result<BatchReport, GatewayError>;
}
