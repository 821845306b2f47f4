//! Shared test harness: an in-memory remote store behind `RemoteGateway`.
//!
//! Analysis is deterministic: a candidate scores whatever was registered for
//! its name with `score_for`, or `50 + 10 * skills` capped at 100.

#![allow(dead_code)]

use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;

use recruiter::gateway::{BatchReport, GatewayError, RemoteGateway};
use recruiter::models::{
    AnalysisRecord, CandidateId, CandidateQuery, CandidateRecord, CandidateSource,
    CandidateStatus, CandidateUpdate, Job, JobId, JobType, NewCandidate, NewJob, Recommendation,
};
use recruiter::workspace::{JobBoard, JobWorkspace, RequestPolicy};

#[derive(Default)]
struct Store {
    next_id: i64,
    jobs: BTreeMap<JobId, Job>,
    candidates: BTreeMap<CandidateId, CandidateRecord>,
    scores: HashMap<String, f64>,
}

impl Store {
    fn next_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }
}

#[derive(Default)]
pub struct FakeGateway {
    store: Mutex<Store>,
    failing: Mutex<HashSet<&'static str>>,
    delays: Mutex<HashMap<&'static str, Duration>>,
    calls: Mutex<Vec<&'static str>>,
}

impl FakeGateway {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Every later call to `op` fails with a 500.
    pub fn fail(&self, op: &'static str) {
        self.failing.lock().unwrap().insert(op);
    }

    pub fn recover(&self, op: &'static str) {
        self.failing.lock().unwrap().remove(op);
    }

    /// Every later call to `op` sleeps for `delay` before touching the store.
    pub fn delay(&self, op: &'static str, delay: Duration) {
        self.delays.lock().unwrap().insert(op, delay);
    }

    pub fn clear_delay(&self, op: &'static str) {
        self.delays.lock().unwrap().remove(op);
    }

    pub fn score_for(&self, name: &str, score: f64) {
        self.store
            .lock()
            .unwrap()
            .scores
            .insert(name.to_string(), score);
    }

    pub fn calls(&self, op: &str) -> usize {
        self.calls.lock().unwrap().iter().filter(|c| **c == op).count()
    }

    pub fn seed_job(&self, title: &str) -> JobId {
        let mut store = self.store.lock().unwrap();
        let id = store.next_id();
        store.jobs.insert(
            id,
            job(id, &NewJob {
                title: title.to_string(),
                company: "Acme".to_string(),
                description: "Build things".to_string(),
                ..Default::default()
            }),
        );
        id
    }

    /// Inserts a candidate, already analyzed when `score` is given.
    pub fn seed_candidate(&self, job_id: JobId, name: &str, score: Option<f64>) -> CandidateId {
        let mut store = self.store.lock().unwrap();
        let id = store.next_id();
        let mut record = record(id, job_id, name);
        if let Some(score) = score {
            assess(&mut record, score);
        }
        store.candidates.insert(id, record);
        id
    }

    /// Stores a record as-is, bypassing every consistency rule.
    pub fn insert_raw(&self, record: CandidateRecord) {
        self.store
            .lock()
            .unwrap()
            .candidates
            .insert(record.id, record);
    }

    pub fn stored(&self, id: CandidateId) -> Option<CandidateRecord> {
        self.store.lock().unwrap().candidates.get(&id).cloned()
    }

    pub fn job_count(&self) -> usize {
        self.store.lock().unwrap().jobs.len()
    }

    async fn enter(&self, op: &'static str) -> Result<(), GatewayError> {
        self.calls.lock().unwrap().push(op);
        let delay = self.delays.lock().unwrap().get(op).copied();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        if self.failing.lock().unwrap().contains(op) {
            return Err(GatewayError::Api {
                status: 500,
                message: format!("{op} exploded"),
            });
        }
        Ok(())
    }

    fn analyze_in(store: &mut Store, id: CandidateId) -> Result<(), GatewayError> {
        let record = store
            .candidates
            .get(&id)
            .ok_or_else(|| GatewayError::NotFound(format!("Candidate {id}")))?;
        let score = store.scores.get(&record.name).copied().unwrap_or_else(|| {
            let skills = record.skills.as_ref().map_or(0, Vec::len);
            (50.0 + 10.0 * skills as f64).min(100.0)
        });
        if let Some(record) = store.candidates.get_mut(&id) {
            assess(record, score);
        }
        Ok(())
    }
}

pub fn record(id: CandidateId, job_id: JobId, name: &str) -> CandidateRecord {
    CandidateRecord {
        id,
        job_id,
        name: name.to_string(),
        email: None,
        linkedin_url: None,
        current_title: None,
        current_company: None,
        location: None,
        skills: Some(vec![]),
        experience: Some(vec![]),
        source: Some(CandidateSource::Manual),
        status: "new".to_string(),
        match_score: None,
        analysis: None,
        strengths: None,
        concerns: None,
        notes: None,
        created_at: Some(Utc::now()),
        updated_at: None,
    }
}

fn assess(record: &mut CandidateRecord, score: f64) {
    let strengths = vec!["Relevant skills".to_string()];
    let concerns = if score < 60.0 {
        vec!["Limited experience".to_string()]
    } else {
        vec![]
    };
    let recommendation = if score >= 80.0 {
        Recommendation::StrongFit
    } else if score >= 60.0 {
        Recommendation::ModerateFit
    } else {
        Recommendation::WeakFit
    };
    record.match_score = Some(score);
    record.analysis = Some(AnalysisRecord {
        summary: Some(format!("{} scored {score}", record.name)),
        strengths: Some(strengths.clone()),
        concerns: Some(concerns.clone()),
        recommendation: Some(recommendation),
        next_steps: Some("Schedule a screen".to_string()),
        skill_match: Some(score),
        experience_match: Some(score),
    });
    record.strengths = Some(strengths);
    record.concerns = Some(concerns);
    record.updated_at = Some(Utc::now());
}

fn job(id: JobId, new: &NewJob) -> Job {
    Job {
        id,
        title: new.title.clone(),
        company: new.company.clone(),
        description: new.description.clone(),
        location: new.location.clone(),
        job_type: new.job_type.or(Some(JobType::FullTime)),
        salary_range: new.salary_range.clone(),
        requirements: None,
        created_at: Some(Utc::now()),
        updated_at: None,
    }
}

#[async_trait]
impl RemoteGateway for FakeGateway {
    async fn list_jobs(&self) -> Result<Vec<Job>, GatewayError> {
        self.enter("list_jobs").await?;
        Ok(self.store.lock().unwrap().jobs.values().cloned().collect())
    }

    async fn get_job(&self, job_id: JobId) -> Result<Job, GatewayError> {
        self.enter("get_job").await?;
        self.store
            .lock()
            .unwrap()
            .jobs
            .get(&job_id)
            .cloned()
            .ok_or_else(|| GatewayError::NotFound(format!("Job {job_id}")))
    }

    async fn create_job(&self, new: &NewJob) -> Result<Job, GatewayError> {
        self.enter("create_job").await?;
        let mut store = self.store.lock().unwrap();
        let id = store.next_id();
        let created = job(id, new);
        store.jobs.insert(id, created.clone());
        Ok(created)
    }

    async fn delete_job(&self, job_id: JobId) -> Result<(), GatewayError> {
        self.enter("delete_job").await?;
        let mut store = self.store.lock().unwrap();
        store.jobs.remove(&job_id);
        store.candidates.retain(|_, c| c.job_id != job_id);
        Ok(())
    }

    async fn create_candidate(
        &self,
        new: &NewCandidate,
    ) -> Result<CandidateRecord, GatewayError> {
        self.enter("create_candidate").await?;
        let mut store = self.store.lock().unwrap();
        if !store.jobs.contains_key(&new.job_id) {
            return Err(GatewayError::NotFound(format!("Job {}", new.job_id)));
        }
        let id = store.next_id();
        let mut created = record(id, new.job_id, &new.name);
        created.email = new.email.clone();
        created.linkedin_url = new.linkedin_url.clone();
        created.current_title = new.current_title.clone();
        created.current_company = new.current_company.clone();
        created.location = new.location.clone();
        created.skills = Some(new.skills.clone());
        created.experience = Some(new.experience.clone());
        created.source = Some(new.source);
        store.candidates.insert(id, created.clone());
        Ok(created)
    }

    async fn list_candidates(
        &self,
        job_id: JobId,
        query: &CandidateQuery,
    ) -> Result<Vec<CandidateRecord>, GatewayError> {
        self.enter("list_candidates").await?;
        let store = self.store.lock().unwrap();
        Ok(store
            .candidates
            .values()
            .filter(|c| c.job_id == job_id)
            .filter(|c| query.status.map_or(true, |s| c.status == s.as_str()))
            .filter(|c| {
                query.min_score.map_or(true, |min| {
                    c.match_score.is_some_and(|score| score >= f64::from(min))
                })
            })
            .cloned()
            .collect())
    }

    async fn get_candidate(
        &self,
        candidate_id: CandidateId,
    ) -> Result<CandidateRecord, GatewayError> {
        self.enter("get_candidate").await?;
        self.stored(candidate_id)
            .ok_or_else(|| GatewayError::NotFound(format!("Candidate {candidate_id}")))
    }

    async fn update_candidate(
        &self,
        candidate_id: CandidateId,
        update: &CandidateUpdate,
    ) -> Result<CandidateRecord, GatewayError> {
        self.enter("update_candidate").await?;
        let mut store = self.store.lock().unwrap();
        let record = store
            .candidates
            .get_mut(&candidate_id)
            .ok_or_else(|| GatewayError::NotFound(format!("Candidate {candidate_id}")))?;
        if let Some(status) = update.status {
            record.status = status.as_str().to_string();
        }
        if let Some(notes) = &update.notes {
            record.notes = Some(notes.clone());
        }
        record.updated_at = Some(Utc::now());
        Ok(record.clone())
    }

    async fn delete_candidate(&self, candidate_id: CandidateId) -> Result<(), GatewayError> {
        self.enter("delete_candidate").await?;
        self.store.lock().unwrap().candidates.remove(&candidate_id);
        Ok(())
    }

    async fn analyze(&self, candidate_id: CandidateId) -> Result<(), GatewayError> {
        self.enter("analyze").await?;
        let mut store = self.store.lock().unwrap();
        Self::analyze_in(&mut store, candidate_id)
    }

    async fn batch_analyze(&self, job_id: JobId) -> Result<BatchReport, GatewayError> {
        self.enter("batch_analyze").await?;
        let mut store = self.store.lock().unwrap();
        let unscored: Vec<CandidateId> = store
            .candidates
            .values()
            .filter(|c| c.job_id == job_id && c.match_score.is_none())
            .map(|c| c.id)
            .collect();
        for id in &unscored {
            Self::analyze_in(&mut store, *id)?;
        }
        Ok(BatchReport {
            job_id,
            total_analyzed: unscored.len(),
        })
    }
}

pub fn policy() -> RequestPolicy {
    RequestPolicy {
        request_timeout: Duration::from_secs(5),
        analysis_timeout: Duration::from_secs(10),
        batch_timeout: Duration::from_secs(30),
    }
}

pub fn workspace(gateway: &Arc<FakeGateway>, job_id: JobId) -> JobWorkspace {
    JobWorkspace::new(gateway.clone(), job_id, policy())
}

pub fn board(gateway: &Arc<FakeGateway>) -> JobBoard {
    JobBoard::new(gateway.clone(), policy())
}

pub fn status_of(record: &CandidateRecord) -> CandidateStatus {
    record.status.parse().unwrap()
}
