pub mod candidate;
pub mod job;

pub use candidate::{
    Analysis, AnalysisRecord, Assessment, Candidate, CandidateId, CandidateQuery, CandidateRecord,
    CandidateSource, CandidateStatus, CandidateUpdate, ExperienceEntry, NewCandidate,
    Recommendation,
};
pub use job::{Job, JobId, JobType, NewJob};

/// Serde helpers for the remote store's wire quirks.
pub(crate) mod wire {
    use chrono::{DateTime, NaiveDateTime, Utc};
    use serde::{Deserialize, Deserializer};
    use serde_json::Value;

    /// Accepts RFC 3339 timestamps as well as naive ones (read as UTC).
    /// Unparseable or missing timestamps become `None`; they are display-only.
    pub fn timestamp<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw: Option<String> = Option::deserialize(deserializer)?;
        Ok(raw.as_deref().and_then(parse_timestamp))
    }

    pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
        if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
            return Some(ts.with_timezone(&Utc));
        }
        ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"]
            .iter()
            .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
            .map(|naive| naive.and_utc())
    }

    /// Imported experience records are not always string-typed
    /// (`"duration": 3`); anything scalar is kept as its text form.
    pub fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value: Option<Value> = Option::deserialize(deserializer)?;
        Ok(match value {
            None | Some(Value::Null) => None,
            Some(Value::String(s)) => Some(s),
            Some(Value::Number(n)) => Some(n.to_string()),
            Some(Value::Bool(b)) => Some(b.to_string()),
            Some(other) => Some(other.to_string()),
        })
    }

}
