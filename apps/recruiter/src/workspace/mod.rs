//! Workspace coordinators. They own the local view state that presentation reads.
//!
//! `JobWorkspace` holds one job and its candidates under the active filter;
//! `JobBoard` holds the job list. Both are cheap to clone and every operation
//! takes `&self`, so a view can keep reading state while an operation awaits.
//!
//! Invalidation contract: every mutation of a `JobWorkspace` other than
//! `delete_candidate` ends by reloading the job and its candidates under the
//! current filter. Deletions remove the item locally once the remote delete has
//! succeeded.

mod board;
mod registry;
mod request;

use std::collections::HashSet;
use std::sync::Arc;

use serde::Serialize;
use tokio::sync::RwLock;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::analysis::{Flight, InFlight};
use crate::errors::RecruiterError;
use crate::filter::{CandidateFilter, CandidateStats};
use crate::gateway::{BatchReport, RemoteGateway};
use crate::intake::CandidateForm;
use crate::lifecycle::{validate_record, validate_records};
use crate::models::{Candidate, CandidateId, CandidateStatus, CandidateUpdate, Job, JobId};

pub use board::{BoardView, JobBoard};
pub use registry::WorkspaceRegistry;
pub use request::RequestPolicy;

use request::{PendingLoads, Requests};

/// Snapshot of a job workspace as presentation sees it.
#[derive(Debug, Clone, Default, Serialize)]
pub struct WorkspaceView {
    pub job: Option<Job>,
    /// Candidates passing the filter, best score first.
    pub candidates: Vec<Candidate>,
    pub stats: CandidateStats,
    pub filter: CandidateFilter,
    pub loading: bool,
    /// Blocking error from the last load; no job or candidates are shown with it.
    pub load_error: Option<String>,
    /// Transient, dismissible message from the last failed mutation.
    pub notice: Option<String>,
    pub in_flight: HashSet<Flight>,
}

impl WorkspaceView {
    pub fn is_in_flight(&self, flight: &Flight) -> bool {
        self.in_flight.contains(flight)
    }
}

/// Result of adding a candidate. Creation succeeded; analysis may not have.
#[derive(Debug)]
pub struct CandidateAdded {
    /// Read back after analysis, so it carries the score when analysis succeeded.
    pub candidate: Candidate,
    pub analysis_error: Option<RecruiterError>,
}

#[derive(Debug, Default)]
struct WorkspaceState {
    job: Option<Job>,
    candidates: Vec<Candidate>,
    stats: CandidateStats,
    filter: CandidateFilter,
    load_error: Option<String>,
    notice: Option<String>,
}

impl WorkspaceState {
    fn set_candidates(&mut self, loaded: &[Candidate]) {
        self.candidates = self.filter.apply(loaded);
        self.stats = CandidateStats::compute(&self.candidates);
    }

    fn clear(&mut self) {
        self.job = None;
        self.candidates.clear();
        self.stats = CandidateStats::default();
    }
}

struct Inner {
    job_id: JobId,
    gateway: Arc<dyn RemoteGateway>,
    requests: Requests,
    flights: InFlight,
    loads: PendingLoads,
    state: RwLock<WorkspaceState>,
}

#[derive(Clone)]
pub struct JobWorkspace {
    inner: Arc<Inner>,
}

impl JobWorkspace {
    pub fn new(gateway: Arc<dyn RemoteGateway>, job_id: JobId, policy: RequestPolicy) -> Self {
        Self::with_cancellation(gateway, job_id, policy, CancellationToken::new())
    }

    /// Like `new`, but every request also stops when `root` is cancelled.
    pub fn with_cancellation(
        gateway: Arc<dyn RemoteGateway>,
        job_id: JobId,
        policy: RequestPolicy,
        root: CancellationToken,
    ) -> Self {
        Self {
            inner: Arc::new(Inner {
                job_id,
                gateway,
                requests: Requests::new(policy, root),
                flights: InFlight::new(),
                loads: PendingLoads::default(),
                state: RwLock::new(WorkspaceState::default()),
            }),
        }
    }

    pub fn job_id(&self) -> JobId {
        self.inner.job_id
    }

    pub async fn view(&self) -> WorkspaceView {
        let state = self.inner.state.read().await;
        WorkspaceView {
            job: state.job.clone(),
            candidates: state.candidates.clone(),
            stats: state.stats.clone(),
            filter: state.filter,
            loading: self.inner.loads.active(),
            load_error: state.load_error.clone(),
            notice: state.notice.clone(),
            in_flight: self.inner.flights.snapshot(),
        }
    }

    pub async fn filter(&self) -> CandidateFilter {
        self.inner.state.read().await.filter
    }

    // ────────────────────────────────────────────────────────────────────────
    // Loading
    // ────────────────────────────────────────────────────────────────────────

    /// Fetches the job and its candidates under `filter` concurrently. Both
    /// must succeed; on failure the view holds neither and carries `load_error`.
    ///
    /// Overlapping loads are not serialized: whichever completes last decides
    /// the data, and the visible list is always re-derived with the filter
    /// that is current at completion.
    pub async fn load(&self, filter: CandidateFilter) -> Result<(), RecruiterError> {
        let _pending = self.inner.loads.begin();
        self.inner.state.write().await.filter = filter;

        let result = self.fetch(filter).await;

        let mut state = self.inner.state.write().await;
        match result {
            Ok((job, candidates)) => {
                info!(
                    "Loaded job {} with {} candidates",
                    self.inner.job_id,
                    candidates.len()
                );
                state.job = Some(job);
                state.set_candidates(&candidates);
                state.load_error = None;
                Ok(())
            }
            Err(e) => {
                warn!("Failed to load job {}: {e}", self.inner.job_id);
                state.clear();
                state.load_error = Some(format!("Failed to load job details: {e}"));
                Err(e)
            }
        }
    }

    /// Reloads under the last-used filter.
    pub async fn refresh(&self) -> Result<(), RecruiterError> {
        let filter = self.filter().await;
        self.load(filter).await
    }

    /// Replaces the filter and reloads.
    pub async fn set_filter(&self, filter: CandidateFilter) -> Result<(), RecruiterError> {
        self.load(filter).await
    }

    async fn fetch(&self, filter: CandidateFilter) -> Result<(Job, Vec<Candidate>), RecruiterError> {
        let job_id = self.inner.job_id;
        let gateway = &self.inner.gateway;
        let requests = &self.inner.requests;
        let limit = requests.policy().request_timeout;
        let query = filter.query();

        let job = requests.run(limit, async {
            gateway.get_job(job_id).await.map_err(RecruiterError::remote)
        });
        let candidates = requests.run(limit, async {
            let records = gateway
                .list_candidates(job_id, &query)
                .await
                .map_err(RecruiterError::remote)?;
            validate_records(records)
        });

        tokio::try_join!(job, candidates)
    }

    /// Reads one candidate fresh from the remote store, e.g. to observe the
    /// result of an analysis. Does not touch the workspace state.
    pub async fn candidate(&self, candidate_id: CandidateId) -> Result<Candidate, RecruiterError> {
        let limit = self.inner.requests.policy().request_timeout;
        let record = self
            .inner
            .requests
            .run(limit, async {
                self.inner
                    .gateway
                    .get_candidate(candidate_id)
                    .await
                    .map_err(RecruiterError::remote)
            })
            .await?;
        validate_record(record)
    }

    /// Drops everything held for this job, e.g. after the job was deleted.
    pub async fn invalidate(&self) {
        let mut state = self.inner.state.write().await;
        state.clear();
        state.notice = None;
        state.load_error = None;
    }

    // ────────────────────────────────────────────────────────────────────────
    // Mutations
    // ────────────────────────────────────────────────────────────────────────

    /// Creates a candidate from form input, analyzes it, then refreshes.
    ///
    /// A failed analysis does not fail the add: the candidate exists remotely
    /// and the error is returned in `CandidateAdded::analysis_error`.
    pub async fn add_candidate(&self, form: CandidateForm) -> Result<CandidateAdded, RecruiterError> {
        let job_id = self.inner.job_id;
        let _guard = self.inner.flights.acquire(Flight::AddCandidate(job_id))?;

        let created = self.create_candidate(form).await;
        let candidate = match created {
            Ok(candidate) => candidate,
            Err(e) => {
                self.record_failure(&e).await;
                return Err(e);
            }
        };
        info!("Created candidate {} for job {job_id}", candidate.id);

        let analysis_error = match self.run_analysis(candidate.id).await {
            Ok(()) => None,
            Err(e) => {
                warn!("Analysis after creating candidate {} failed: {e}", candidate.id);
                self.record_failure(&e).await;
                Some(e)
            }
        };

        let candidate = if analysis_error.is_none() {
            match self.candidate(candidate.id).await {
                Ok(analyzed) => analyzed,
                Err(e) => {
                    warn!("Reading back candidate {} failed: {e}", candidate.id);
                    candidate
                }
            }
        } else {
            candidate
        };

        if let Err(e) = self.refresh().await {
            warn!("Refresh after adding candidate {} failed: {e}", candidate.id);
        }

        Ok(CandidateAdded {
            candidate,
            analysis_error,
        })
    }

    async fn create_candidate(&self, form: CandidateForm) -> Result<Candidate, RecruiterError> {
        let new = form.into_new_candidate(self.inner.job_id)?;
        let limit = self.inner.requests.policy().request_timeout;
        let record = self
            .inner
            .requests
            .run(limit, async {
                self.inner
                    .gateway
                    .create_candidate(&new)
                    .await
                    .map_err(RecruiterError::remote)
            })
            .await?;
        validate_record(record)
    }

    /// Sets a candidate's status remotely, then refreshes. No local change is
    /// made before the remote update succeeds.
    pub async fn change_status(
        &self,
        candidate_id: CandidateId,
        status: CandidateStatus,
    ) -> Result<(), RecruiterError> {
        let _guard = self.inner.flights.acquire(Flight::StatusUpdate(candidate_id))?;
        let update = CandidateUpdate {
            status: Some(status),
            notes: None,
        };
        let limit = self.inner.requests.policy().request_timeout;
        let result = self
            .inner
            .requests
            .run(limit, async {
                self.inner
                    .gateway
                    .update_candidate(candidate_id, &update)
                    .await
                    .map(|_| ())
                    .map_err(RecruiterError::update)
            })
            .await;

        if let Err(e) = result {
            self.record_failure(&e).await;
            return Err(e);
        }
        info!("Candidate {candidate_id} marked {status}");
        self.refresh().await
    }

    /// Analyzes (or re-analyzes) one candidate, then refreshes.
    pub async fn analyze_one(&self, candidate_id: CandidateId) -> Result<(), RecruiterError> {
        if let Err(e) = self.run_analysis(candidate_id).await {
            self.record_failure(&e).await;
            return Err(e);
        }
        self.refresh().await
    }

    async fn run_analysis(&self, candidate_id: CandidateId) -> Result<(), RecruiterError> {
        let _guard = self.inner.flights.acquire(Flight::Analyze(candidate_id))?;
        let limit = self.inner.requests.policy().analysis_timeout;
        self.inner
            .requests
            .run(limit, async {
                self.inner
                    .gateway
                    .analyze(candidate_id)
                    .await
                    .map_err(RecruiterError::analysis)
            })
            .await?;
        info!("Analyzed candidate {candidate_id}");
        Ok(())
    }

    /// Analyzes every candidate of the job that is unscored at call time in a
    /// single remote call, then refreshes. Already-scored candidates are left
    /// alone; use `analyze_one` to re-analyze them.
    pub async fn analyze_all_unscored(&self) -> Result<BatchReport, RecruiterError> {
        let job_id = self.inner.job_id;
        let _guard = self.inner.flights.acquire(Flight::BatchAnalyze(job_id))?;
        let limit = self.inner.requests.policy().batch_timeout;
        let result = self
            .inner
            .requests
            .run(limit, async {
                self.inner
                    .gateway
                    .batch_analyze(job_id)
                    .await
                    .map_err(RecruiterError::analysis)
            })
            .await;

        let report = match result {
            Ok(report) => report,
            Err(e) => {
                self.record_failure(&e).await;
                return Err(e);
            }
        };
        info!(
            "Batch analysis of job {job_id} covered {} candidates",
            report.total_analyzed
        );
        self.refresh().await?;
        Ok(report)
    }

    /// Deletes a candidate remotely; on success removes it from the held list
    /// without reloading. On failure the list is left as it was.
    pub async fn delete_candidate(&self, candidate_id: CandidateId) -> Result<(), RecruiterError> {
        let limit = self.inner.requests.policy().request_timeout;
        let result = self
            .inner
            .requests
            .run(limit, async {
                self.inner
                    .gateway
                    .delete_candidate(candidate_id)
                    .await
                    .map_err(RecruiterError::remote)
            })
            .await;

        if let Err(e) = result {
            self.record_failure(&e).await;
            return Err(e);
        }

        let mut state = self.inner.state.write().await;
        let remaining: Vec<Candidate> = state
            .candidates
            .iter()
            .filter(|c| c.id != candidate_id)
            .cloned()
            .collect();
        state.set_candidates(&remaining);
        info!("Deleted candidate {candidate_id}");
        Ok(())
    }

    pub async fn dismiss_notice(&self) {
        self.inner.state.write().await.notice = None;
    }

    /// Cancels every request this workspace has outstanding. Operations
    /// started afterwards run normally.
    pub fn cancel(&self) {
        info!("Cancelling outstanding requests for job {}", self.inner.job_id);
        self.inner.requests.cancel_outstanding();
    }

    async fn record_failure(&self, err: &RecruiterError) {
        if matches!(err, RecruiterError::AlreadyInFlight(_)) {
            return;
        }
        self.inner.state.write().await.notice = Some(err.notice());
    }
}
