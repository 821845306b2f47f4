use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::errors::RecruiterError;

pub type JobId = i64;

/// Remote store column limit for short text fields.
pub const MAX_SHORT_FIELD: usize = 255;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum JobType {
    #[serde(rename = "Full-time")]
    FullTime,
    #[serde(rename = "Part-time")]
    PartTime,
    #[serde(rename = "Contract")]
    Contract,
    #[serde(rename = "Internship")]
    Internship,
}

impl JobType {
    pub const ALL: [JobType; 4] = [
        JobType::FullTime,
        JobType::PartTime,
        JobType::Contract,
        JobType::Internship,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            JobType::FullTime => "Full-time",
            JobType::PartTime => "Part-time",
            JobType::Contract => "Contract",
            JobType::Internship => "Internship",
        }
    }
}

impl fmt::Display for JobType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for JobType {
    type Err = String;

    /// Case-insensitive; also accepts `full_time` / `fulltime` style spellings.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        fn key(s: &str) -> String {
            s.chars()
                .filter(|c| c.is_ascii_alphanumeric())
                .collect::<String>()
                .to_lowercase()
        }

        let wanted = key(s);
        JobType::ALL
            .into_iter()
            .find(|job_type| key(job_type.as_str()) == wanted)
            .ok_or_else(|| {
                let expected: Vec<&str> = JobType::ALL.iter().map(JobType::as_str).collect();
                format!(
                    "unknown job type '{s}' (expected one of: {})",
                    expected.join(", ")
                )
            })
    }
}

/// A job posting as held by the remote store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Job {
    pub id: JobId,
    pub title: String,
    pub company: String,
    pub description: String,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub job_type: Option<JobType>,
    #[serde(default)]
    pub salary_range: Option<String>,
    /// Structured requirements extracted by the remote store at creation time.
    #[serde(default)]
    pub requirements: Option<Value>,
    #[serde(default, deserialize_with = "super::wire::timestamp")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "super::wire::timestamp")]
    pub updated_at: Option<DateTime<Utc>>,
}

/// Submission payload for `POST /api/jobs`.
#[derive(Debug, Clone, Default, Serialize)]
pub struct NewJob {
    pub title: String,
    pub company: String,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub job_type: Option<JobType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub salary_range: Option<String>,
}

impl NewJob {
    /// Trims every field, drops blank optionals, and rejects what the remote
    /// store would reject so the error surfaces before submission.
    pub fn normalized(self) -> Result<Self, RecruiterError> {
        let job = NewJob {
            title: self.title.trim().to_string(),
            company: self.company.trim().to_string(),
            description: self.description.trim().to_string(),
            location: non_blank(self.location),
            job_type: self.job_type,
            salary_range: non_blank(self.salary_range),
        };

        require("title", &job.title)?;
        require("company", &job.company)?;
        require("description", &job.description)?;
        max_len("title", &job.title, MAX_SHORT_FIELD)?;
        max_len("company", &job.company, MAX_SHORT_FIELD)?;
        if let Some(location) = &job.location {
            max_len("location", location, MAX_SHORT_FIELD)?;
        }
        if let Some(salary) = &job.salary_range {
            max_len("salary_range", salary, 100)?;
        }
        Ok(job)
    }
}

pub(crate) fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

pub(crate) fn require(field: &str, value: &str) -> Result<(), RecruiterError> {
    if value.trim().is_empty() {
        return Err(RecruiterError::Validation(format!("{field} is required")));
    }
    Ok(())
}

pub(crate) fn max_len(field: &str, value: &str, limit: usize) -> Result<(), RecruiterError> {
    if value.chars().count() > limit {
        return Err(RecruiterError::Validation(format!(
            "{field} must be at most {limit} characters"
        )));
    }
    Ok(())
}
