//! Candidate lifecycle: score tiers, the scored/unscored distinction and the
//! validation that turns a remote `CandidateRecord` into a `Candidate`.
//!
//! Pure data contract: nothing here performs I/O.

use std::fmt;

use serde::Serialize;

use crate::errors::RecruiterError;
use crate::models::{Analysis, Assessment, Candidate, CandidateRecord, CandidateStatus};

pub const HIGH_TIER_MIN: f64 = 80.0;
pub const MEDIUM_TIER_MIN: f64 = 60.0;
pub const MAX_SCORE: f64 = 100.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreTier {
    High,
    Medium,
    Low,
}

impl fmt::Display for ScoreTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ScoreTier::High => "high",
            ScoreTier::Medium => "medium",
            ScoreTier::Low => "low",
        })
    }
}

/// High ≥ 80, Medium ≥ 60, Low otherwise.
/// Display and aggregation both go through this function.
pub fn score_tier(score: f64) -> ScoreTier {
    if score >= HIGH_TIER_MIN {
        ScoreTier::High
    } else if score >= MEDIUM_TIER_MIN {
        ScoreTier::Medium
    } else {
        ScoreTier::Low
    }
}

pub fn is_scored(candidate: &Candidate) -> bool {
    candidate.match_score().is_some()
}

/// Tier of a candidate, `None` while unscored.
pub fn candidate_tier(candidate: &Candidate) -> Option<ScoreTier> {
    candidate.match_score().map(score_tier)
}

/// Validates a remote record against the lifecycle invariants:
/// - status is one of the closed set
/// - `match_score` is present iff `analysis` is present
/// - `match_score` lies in 0–100
///
/// Top-level `strengths`/`concerns` take precedence over the copies nested in
/// the analysis object; the remote store writes both from the same result.
pub fn validate_record(record: CandidateRecord) -> Result<Candidate, RecruiterError> {
    let status: CandidateStatus = record.status.parse().map_err(|e| {
        RecruiterError::Integrity(format!("candidate {}: {e}", record.id))
    })?;

    let assessment = match (record.match_score, record.analysis) {
        (None, None) => None,
        (Some(score), Some(raw)) => {
            if !score.is_finite() || !(0.0..=MAX_SCORE).contains(&score) {
                return Err(RecruiterError::Integrity(format!(
                    "candidate {}: match_score {score} outside 0-100",
                    record.id
                )));
            }
            let analysis = Analysis {
                summary: raw.summary.unwrap_or_default(),
                strengths: record.strengths.or(raw.strengths).unwrap_or_default(),
                concerns: record.concerns.or(raw.concerns).unwrap_or_default(),
                recommendation: raw.recommendation,
                next_steps: raw.next_steps.unwrap_or_default(),
                skill_match: raw.skill_match,
                experience_match: raw.experience_match,
            };
            Some(Assessment {
                match_score: score,
                analysis,
            })
        }
        (Some(_), None) => {
            return Err(RecruiterError::Integrity(format!(
                "candidate {}: match_score present without analysis",
                record.id
            )))
        }
        (None, Some(_)) => {
            return Err(RecruiterError::Integrity(format!(
                "candidate {}: analysis present without match_score",
                record.id
            )))
        }
    };

    Ok(Candidate {
        id: record.id,
        job_id: record.job_id,
        name: record.name,
        email: record.email,
        linkedin_url: record.linkedin_url,
        current_title: record.current_title,
        current_company: record.current_company,
        location: record.location,
        skills: record.skills.unwrap_or_default(),
        experience: record.experience.unwrap_or_default(),
        source: record.source.unwrap_or_default(),
        status,
        assessment,
        notes: record.notes,
        created_at: record.created_at,
        updated_at: record.updated_at,
    })
}

/// Validates a whole listing; one bad record fails the listing.
pub fn validate_records(records: Vec<CandidateRecord>) -> Result<Vec<Candidate>, RecruiterError> {
    records.into_iter().map(validate_record).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CandidateSource, Recommendation};
    use serde_json::json;

    fn record(value: serde_json::Value) -> CandidateRecord {
        serde_json::from_value(value).unwrap()
    }

    fn base() -> serde_json::Value {
        json!({
            "id": 7,
            "job_id": 2,
            "name": "Ada Lovelace",
            "status": "new",
            "source": "manual",
            "created_at": "2024-01-01T00:00:00"
        })
    }

    #[test]
    fn test_tier_boundaries() {
        assert_eq!(score_tier(79.0), ScoreTier::Medium);
        assert_eq!(score_tier(80.0), ScoreTier::High);
        assert_eq!(score_tier(59.0), ScoreTier::Low);
        assert_eq!(score_tier(60.0), ScoreTier::Medium);
        assert_eq!(score_tier(100.0), ScoreTier::High);
        assert_eq!(score_tier(0.0), ScoreTier::Low);
    }

    #[test]
    fn test_fractional_scores_below_boundary() {
        assert_eq!(score_tier(79.99), ScoreTier::Medium);
        assert_eq!(score_tier(59.5), ScoreTier::Low);
    }

    #[test]
    fn test_unscored_record_validates() {
        let candidate = validate_record(record(base())).unwrap();
        assert!(!is_scored(&candidate));
        assert!(candidate.analysis().is_none());
        assert!(candidate_tier(&candidate).is_none());
        assert_eq!(candidate.source, CandidateSource::Manual);
        assert!(candidate.skills.is_empty());
    }

    #[test]
    fn test_scored_record_merges_top_level_lists() {
        let mut value = base();
        value["match_score"] = json!(84.0);
        value["strengths"] = json!(["Rust", "Distributed systems"]);
        value["concerns"] = json!([]);
        value["analysis"] = json!({
            "match_score": 84,
            "summary": "Strong systems background.",
            "strengths": ["ignored"],
            "recommendation": "strong_fit",
            "next_steps": "Schedule interview",
            "skill_match": 90
        });

        let candidate = validate_record(record(value)).unwrap();
        assert!(is_scored(&candidate));
        assert_eq!(candidate_tier(&candidate), Some(ScoreTier::High));
        let analysis = candidate.analysis().unwrap();
        assert_eq!(analysis.strengths, vec!["Rust", "Distributed systems"]);
        assert!(analysis.concerns.is_empty());
        assert_eq!(analysis.recommendation, Some(Recommendation::StrongFit));
        assert_eq!(analysis.skill_match, Some(90.0));
    }

    #[test]
    fn test_score_without_analysis_is_integrity_error() {
        let mut value = base();
        value["match_score"] = json!(50.0);
        let err = validate_record(record(value)).unwrap_err();
        assert!(matches!(err, RecruiterError::Integrity(_)));
    }

    #[test]
    fn test_analysis_without_score_is_integrity_error() {
        let mut value = base();
        value["analysis"] = json!({"summary": "?"});
        assert!(matches!(
            validate_record(record(value)),
            Err(RecruiterError::Integrity(_))
        ));
    }

    #[test]
    fn test_unknown_status_is_integrity_error() {
        let mut value = base();
        value["status"] = json!("archived");
        let err = validate_record(record(value)).unwrap_err();
        assert!(err.to_string().contains("archived"));
    }

    #[test]
    fn test_out_of_range_score_is_integrity_error() {
        let mut value = base();
        value["match_score"] = json!(140.0);
        value["analysis"] = json!({"summary": "too good"});
        assert!(matches!(
            validate_record(record(value)),
            Err(RecruiterError::Integrity(_))
        ));
    }

    #[test]
    fn test_one_bad_record_fails_listing() {
        let mut bad = base();
        bad["status"] = json!("maybe");
        let result = validate_records(vec![record(base()), record(bad)]);
        assert!(result.is_err());
    }
}
