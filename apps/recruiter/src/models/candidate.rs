use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::job::JobId;

pub type CandidateId = i64;

// ────────────────────────────────────────────────────────────────────────────
// Enumerations
// ────────────────────────────────────────────────────────────────────────────

/// Review status. A label, not a progression: any status may follow any other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum CandidateStatus {
    #[default]
    New,
    Reviewed,
    Contacted,
    Rejected,
}

impl CandidateStatus {
    pub const ALL: [CandidateStatus; 4] = [
        CandidateStatus::New,
        CandidateStatus::Reviewed,
        CandidateStatus::Contacted,
        CandidateStatus::Rejected,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            CandidateStatus::New => "new",
            CandidateStatus::Reviewed => "reviewed",
            CandidateStatus::Contacted => "contacted",
            CandidateStatus::Rejected => "rejected",
        }
    }
}

impl fmt::Display for CandidateStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CandidateStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CandidateStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| format!("unknown candidate status '{s}'"))
    }
}

/// Where a candidate came from. Anything other than `manual` on the wire
/// (`linkedin`, `csv`, ...) is an import.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case", from = "String")]
pub enum CandidateSource {
    #[default]
    Manual,
    Imported,
}

impl From<String> for CandidateSource {
    fn from(raw: String) -> Self {
        if raw.eq_ignore_ascii_case("manual") {
            CandidateSource::Manual
        } else {
            CandidateSource::Imported
        }
    }
}

/// Hiring recommendation produced by the analysis. Unknown values are kept verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Recommendation {
    StrongFit,
    ModerateFit,
    WeakFit,
    PoorFit,
    Other(String),
}

impl Recommendation {
    pub fn as_str(&self) -> &str {
        match self {
            Recommendation::StrongFit => "strong_fit",
            Recommendation::ModerateFit => "moderate_fit",
            Recommendation::WeakFit => "weak_fit",
            Recommendation::PoorFit => "poor_fit",
            Recommendation::Other(raw) => raw,
        }
    }

    /// Human-readable form: `strong_fit` → `strong fit`.
    pub fn label(&self) -> String {
        self.as_str().replace('_', " ")
    }
}

impl From<String> for Recommendation {
    fn from(raw: String) -> Self {
        match raw.as_str() {
            "strong_fit" => Recommendation::StrongFit,
            "moderate_fit" => Recommendation::ModerateFit,
            "weak_fit" => Recommendation::WeakFit,
            "poor_fit" => Recommendation::PoorFit,
            _ => Recommendation::Other(raw),
        }
    }
}

impl From<Recommendation> for String {
    fn from(rec: Recommendation) -> Self {
        rec.as_str().to_string()
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Structured profile pieces
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExperienceEntry {
    #[serde(
        default,
        deserialize_with = "super::wire::lenient_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub title: Option<String>,
    #[serde(
        default,
        deserialize_with = "super::wire::lenient_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub company: Option<String>,
    #[serde(
        default,
        deserialize_with = "super::wire::lenient_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub duration: Option<String>,
    #[serde(
        default,
        deserialize_with = "super::wire::lenient_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub description: Option<String>,
}

/// The AI-derived assessment of one candidate against one job.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Analysis {
    pub summary: String,
    pub strengths: Vec<String>,
    pub concerns: Vec<String>,
    pub recommendation: Option<Recommendation>,
    pub next_steps: String,
    /// Share of required skills covered, 0–100.
    pub skill_match: Option<f64>,
    /// Alignment of past experience, 0–100.
    pub experience_match: Option<f64>,
}

/// Score and analysis travel together; a candidate has both or neither.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Assessment {
    pub match_score: f64,
    pub analysis: Analysis,
}

// ────────────────────────────────────────────────────────────────────────────
// Candidate
// ────────────────────────────────────────────────────────────────────────────

/// A validated candidate. Only constructed by `lifecycle::validate_record`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Candidate {
    pub id: CandidateId,
    pub job_id: JobId,
    pub name: String,
    pub email: Option<String>,
    pub linkedin_url: Option<String>,
    pub current_title: Option<String>,
    pub current_company: Option<String>,
    pub location: Option<String>,
    pub skills: Vec<String>,
    pub experience: Vec<ExperienceEntry>,
    pub source: CandidateSource,
    pub status: CandidateStatus,
    pub assessment: Option<Assessment>,
    pub notes: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl Candidate {
    pub fn match_score(&self) -> Option<f64> {
        self.assessment.as_ref().map(|a| a.match_score)
    }

    pub fn analysis(&self) -> Option<&Analysis> {
        self.assessment.as_ref().map(|a| &a.analysis)
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Wire shapes
// ────────────────────────────────────────────────────────────────────────────

/// Candidate exactly as the remote store returns it, before validation.
#[derive(Debug, Clone, Deserialize)]
pub struct CandidateRecord {
    pub id: CandidateId,
    pub job_id: JobId,
    pub name: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub linkedin_url: Option<String>,
    #[serde(default)]
    pub current_title: Option<String>,
    #[serde(default)]
    pub current_company: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub skills: Option<Vec<String>>,
    #[serde(default)]
    pub experience: Option<Vec<ExperienceEntry>>,
    #[serde(default)]
    pub source: Option<CandidateSource>,
    pub status: String,
    #[serde(default)]
    pub match_score: Option<f64>,
    #[serde(default)]
    pub analysis: Option<AnalysisRecord>,
    #[serde(default)]
    pub strengths: Option<Vec<String>>,
    #[serde(default)]
    pub concerns: Option<Vec<String>>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default, deserialize_with = "super::wire::timestamp")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "super::wire::timestamp")]
    pub updated_at: Option<DateTime<Utc>>,
}

/// The analysis object as stored remotely. Extra keys are ignored.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AnalysisRecord {
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default)]
    pub strengths: Option<Vec<String>>,
    #[serde(default)]
    pub concerns: Option<Vec<String>>,
    #[serde(default)]
    pub recommendation: Option<Recommendation>,
    #[serde(default)]
    pub next_steps: Option<String>,
    #[serde(default)]
    pub skill_match: Option<f64>,
    #[serde(default)]
    pub experience_match: Option<f64>,
}

/// Submission payload for `POST /api/candidates`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewCandidate {
    pub job_id: JobId,
    pub name: String,
    pub email: Option<String>,
    pub linkedin_url: Option<String>,
    pub current_title: Option<String>,
    pub current_company: Option<String>,
    pub location: Option<String>,
    pub skills: Vec<String>,
    pub experience: Vec<ExperienceEntry>,
    pub source: CandidateSource,
}

/// Partial update for `PATCH /api/candidates/{id}`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CandidateUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<CandidateStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// Query string for `GET /api/candidates/job/{id}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CandidateQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<CandidateStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_score: Option<u8>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_round_trips_through_str() {
        for status in CandidateStatus::ALL {
            assert_eq!(status.as_str().parse::<CandidateStatus>().unwrap(), status);
        }
        assert!("archived".parse::<CandidateStatus>().is_err());
    }

    #[test]
    fn test_source_treats_non_manual_as_import() {
        let src: CandidateSource = serde_json::from_str("\"linkedin\"").unwrap();
        assert_eq!(src, CandidateSource::Imported);
        let src: CandidateSource = serde_json::from_str("\"manual\"").unwrap();
        assert_eq!(src, CandidateSource::Manual);
        assert_eq!(serde_json::to_string(&CandidateSource::Manual).unwrap(), "\"manual\"");
    }

    #[test]
    fn test_recommendation_keeps_unknown_values() {
        let rec: Recommendation = serde_json::from_str("\"hold_for_later\"").unwrap();
        assert_eq!(rec, Recommendation::Other("hold_for_later".to_string()));
        assert_eq!(rec.label(), "hold for later");
        assert_eq!(Recommendation::StrongFit.label(), "strong fit");
    }

    #[test]
    fn test_experience_entry_accepts_numeric_duration() {
        let entry: ExperienceEntry =
            serde_json::from_str(r#"{"title": "Engineer", "duration": 3}"#).unwrap();
        assert_eq!(entry.duration.as_deref(), Some("3"));
        assert!(entry.company.is_none());
    }

    #[test]
    fn test_query_omits_unset_params() {
        let query = CandidateQuery {
            status: None,
            min_score: Some(70),
        };
        assert_eq!(
            serde_json::to_value(&query).unwrap(),
            serde_json::json!({"min_score": 70})
        );
    }
}
