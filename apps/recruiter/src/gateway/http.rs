//! HTTP implementation of the gateway against the recruiting REST service.
//!
//! Reads (GET) are retried on connection errors, 429 and 5xx with exponential
//! backoff. Writes and analysis calls are sent exactly once.
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::{BatchReport, GatewayError, RemoteGateway};
use crate::config::Config;
use crate::models::{
    CandidateId, CandidateQuery, CandidateRecord, CandidateUpdate, Job, JobId, NewCandidate,
    NewJob,
};

const BASE_BACKOFF_MS: u64 = 1000;
const MAX_ATTEMPTS: u32 = 10;

#[derive(Debug, Serialize)]
struct AnalyzeRequest {
    candidate_id: CandidateId,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    detail: serde_json::Value,
}

#[derive(Clone)]
pub struct HttpGateway {
    client: Client,
    base_url: String,
    max_retries: u32,
    backoff: Duration,
}

impl HttpGateway {
    pub fn new(config: &Config) -> Result<Self, GatewayError> {
        let client = Client::builder()
            .timeout(config.batch_timeout.max(config.request_timeout))
            .build()?;
        Ok(Self {
            client,
            base_url: config.api_url.trim_end_matches('/').to_string(),
            max_retries: config.max_retries.clamp(1, MAX_ATTEMPTS),
            backoff: Duration::from_millis(BASE_BACKOFF_MS),
        })
    }

    /// Overrides the first retry delay; later delays double from it.
    pub fn with_backoff(mut self, backoff: Duration) -> Self {
        self.backoff = backoff;
        self
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        self.client
            .request(method, self.url(path))
            .header("content-type", "application/json")
    }

    /// GET with retry on transient failures.
    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        subject: &str,
        query: Option<&CandidateQuery>,
    ) -> Result<T, GatewayError> {
        let mut last_error: Option<GatewayError> = None;

        for attempt in 0..self.max_retries {
            if attempt > 0 {
                // Exponential backoff: base, 2x base, 4x base ...
                let delay = self.backoff * (1 << (attempt - 1));
                warn!(
                    "GET {} attempt {} failed, retrying after {}ms...",
                    path,
                    attempt,
                    delay.as_millis()
                );
                tokio::time::sleep(delay).await;
            }

            let mut builder = self.request(Method::GET, path);
            if let Some(query) = query {
                builder = builder.query(query);
            }

            let response = match builder.send().await {
                Ok(r) => r,
                Err(e) => {
                    last_error = Some(GatewayError::Http(e));
                    continue;
                }
            };

            let status = response.status();
            if status.as_u16() == 429 || status.is_server_error() {
                let body = response.text().await.unwrap_or_default();
                warn!("GET {} returned {}: {}", path, status, body);
                last_error = Some(GatewayError::Api {
                    status: status.as_u16(),
                    message: body,
                });
                continue;
            }

            let response = check_status(response, subject).await?;
            let body = response.bytes().await?;
            debug!("GET {} succeeded ({} bytes)", path, body.len());
            return serde_json::from_slice(&body).map_err(GatewayError::Parse);
        }

        Err(last_error.unwrap_or(GatewayError::RetriesExhausted {
            retries: self.max_retries,
        }))
    }

    /// Single-shot write returning a JSON body.
    async fn send_json<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        subject: &str,
        body: Option<&B>,
    ) -> Result<T, GatewayError> {
        let mut builder = self.request(method.clone(), path);
        if let Some(body) = body {
            builder = builder.json(body);
        }
        let response = check_status(builder.send().await?, subject).await?;
        let bytes = response.bytes().await?;
        debug!("{} {} succeeded", method, path);
        serde_json::from_slice(&bytes).map_err(GatewayError::Parse)
    }

    /// Single-shot DELETE. Absence after delete is success.
    async fn delete(&self, path: &str, subject: &str) -> Result<(), GatewayError> {
        let response = self.request(Method::DELETE, path).send().await?;
        match check_status(response, subject).await {
            Ok(_) => Ok(()),
            Err(GatewayError::NotFound(what)) => {
                debug!("{what} already gone, treating delete as done");
                Ok(())
            }
            Err(e) => Err(e),
        }
    }
}

/// Maps non-success statuses to errors, using the body's `detail` field when present.
async fn check_status(response: Response, subject: &str) -> Result<Response, GatewayError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    if status.as_u16() == 404 {
        return Err(GatewayError::NotFound(subject.to_string()));
    }
    let body = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<ApiErrorBody>(&body)
        .map(|e| match e.detail {
            serde_json::Value::String(s) => s,
            other => other.to_string(),
        })
        .unwrap_or(body);
    Err(GatewayError::Api {
        status: status.as_u16(),
        message,
    })
}

#[async_trait]
impl RemoteGateway for HttpGateway {
    async fn list_jobs(&self) -> Result<Vec<Job>, GatewayError> {
        self.get_json("/api/jobs", "Jobs", None).await
    }

    async fn get_job(&self, job_id: JobId) -> Result<Job, GatewayError> {
        self.get_json(&format!("/api/jobs/{job_id}"), &format!("Job {job_id}"), None)
            .await
    }

    async fn create_job(&self, job: &NewJob) -> Result<Job, GatewayError> {
        self.send_json(Method::POST, "/api/jobs", "Jobs", Some(job))
            .await
    }

    async fn delete_job(&self, job_id: JobId) -> Result<(), GatewayError> {
        self.delete(&format!("/api/jobs/{job_id}"), &format!("Job {job_id}"))
            .await
    }

    async fn create_candidate(
        &self,
        candidate: &NewCandidate,
    ) -> Result<CandidateRecord, GatewayError> {
        self.send_json(
            Method::POST,
            "/api/candidates",
            &format!("Job {}", candidate.job_id),
            Some(candidate),
        )
        .await
    }

    async fn list_candidates(
        &self,
        job_id: JobId,
        query: &CandidateQuery,
    ) -> Result<Vec<CandidateRecord>, GatewayError> {
        self.get_json(
            &format!("/api/candidates/job/{job_id}"),
            &format!("Job {job_id}"),
            Some(query),
        )
        .await
    }

    async fn get_candidate(
        &self,
        candidate_id: CandidateId,
    ) -> Result<CandidateRecord, GatewayError> {
        self.get_json(
            &format!("/api/candidates/{candidate_id}"),
            &format!("Candidate {candidate_id}"),
            None,
        )
        .await
    }

    async fn update_candidate(
        &self,
        candidate_id: CandidateId,
        update: &CandidateUpdate,
    ) -> Result<CandidateRecord, GatewayError> {
        self.send_json(
            Method::PATCH,
            &format!("/api/candidates/{candidate_id}"),
            &format!("Candidate {candidate_id}"),
            Some(update),
        )
        .await
    }

    async fn delete_candidate(&self, candidate_id: CandidateId) -> Result<(), GatewayError> {
        self.delete(
            &format!("/api/candidates/{candidate_id}"),
            &format!("Candidate {candidate_id}"),
        )
        .await
    }

    async fn analyze(&self, candidate_id: CandidateId) -> Result<(), GatewayError> {
        let _: serde_json::Value = self
            .send_json(
                Method::POST,
                "/api/analysis/analyze",
                &format!("Candidate {candidate_id}"),
                Some(&AnalyzeRequest { candidate_id }),
            )
            .await?;
        Ok(())
    }

    async fn batch_analyze(&self, job_id: JobId) -> Result<BatchReport, GatewayError> {
        self.send_json::<(), _>(
            Method::POST,
            &format!("/api/analysis/batch-analyze/{job_id}"),
            &format!("Job {job_id}"),
            None,
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        let config = Config {
            api_url: "http://recruit.local:8000/".to_string(),
            ..Config::default()
        };
        let gateway = HttpGateway::new(&config).unwrap();
        assert_eq!(gateway.url("/api/jobs"), "http://recruit.local:8000/api/jobs");
    }

    #[test]
    fn test_zero_retries_still_makes_one_attempt() {
        let config = Config {
            max_retries: 0,
            ..Config::default()
        };
        assert_eq!(HttpGateway::new(&config).unwrap().max_retries, 1);
    }

    #[test]
    fn test_huge_retry_count_is_capped() {
        let config = Config {
            max_retries: 64,
            ..Config::default()
        };
        assert_eq!(HttpGateway::new(&config).unwrap().max_retries, MAX_ATTEMPTS);
    }
}
