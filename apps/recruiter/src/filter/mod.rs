//! Filter and aggregation: derives the visible candidate subset from the
//! active filter and computes summary statistics over what is loaded.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::lifecycle::{candidate_tier, ScoreTier};
use crate::models::{Candidate, CandidateQuery, CandidateStatus};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum StatusFilter {
    #[default]
    All,
    Only(CandidateStatus),
}

impl StatusFilter {
    pub fn matches(&self, status: CandidateStatus) -> bool {
        match self {
            StatusFilter::All => true,
            StatusFilter::Only(wanted) => *wanted == status,
        }
    }
}

impl fmt::Display for StatusFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StatusFilter::All => f.write_str("all"),
            StatusFilter::Only(status) => write!(f, "{status}"),
        }
    }
}

impl FromStr for StatusFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == "all" {
            Ok(StatusFilter::All)
        } else {
            s.parse().map(StatusFilter::Only)
        }
    }
}

/// Active filter of a job workspace. `min_score == 0` disables score filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct CandidateFilter {
    pub status: StatusFilter,
    pub min_score: u8,
}

impl CandidateFilter {
    pub fn new(status: StatusFilter, min_score: u8) -> Self {
        Self {
            status,
            min_score: min_score.min(100),
        }
    }

    /// Unscored candidates pass only when the threshold is 0.
    pub fn matches(&self, candidate: &Candidate) -> bool {
        if !self.status.matches(candidate.status) {
            return false;
        }
        if self.min_score == 0 {
            return true;
        }
        candidate
            .match_score()
            .is_some_and(|score| score >= f64::from(self.min_score))
    }

    /// The filter as remote query parameters.
    pub fn query(&self) -> CandidateQuery {
        CandidateQuery {
            status: match self.status {
                StatusFilter::All => None,
                StatusFilter::Only(status) => Some(status),
            },
            min_score: (self.min_score > 0).then_some(self.min_score),
        }
    }

    /// Visible subset: matching candidates, best score first, unscored last.
    /// The sort is stable so equal scores keep their loaded order.
    pub fn apply(&self, candidates: &[Candidate]) -> Vec<Candidate> {
        let mut visible: Vec<Candidate> = candidates
            .iter()
            .filter(|c| self.matches(c))
            .cloned()
            .collect();
        visible.sort_by(|a, b| by_score_desc(a.match_score(), b.match_score()));
        visible
    }
}

fn by_score_desc(a: Option<f64>, b: Option<f64>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => b.partial_cmp(&a).unwrap_or(Ordering::Equal),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct TierCounts {
    pub high: usize,
    pub medium: usize,
    pub low: usize,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct CandidateStats {
    pub count: usize,
    pub unscored: usize,
    /// Mean over scored candidates; `None` when nothing is scored.
    pub average_score: Option<f64>,
    pub tiers: TierCounts,
}

impl CandidateStats {
    pub fn compute(candidates: &[Candidate]) -> Self {
        let mut stats = CandidateStats {
            count: candidates.len(),
            ..Default::default()
        };
        let mut total = 0.0_f64;
        let mut scored = 0_usize;

        for candidate in candidates {
            match candidate.match_score() {
                Some(score) => {
                    total += score;
                    scored += 1;
                }
                None => stats.unscored += 1,
            }
            match candidate_tier(candidate) {
                Some(ScoreTier::High) => stats.tiers.high += 1,
                Some(ScoreTier::Medium) => stats.tiers.medium += 1,
                Some(ScoreTier::Low) => stats.tiers.low += 1,
                None => {}
            }
        }

        stats.average_score = (scored > 0).then(|| total / scored as f64);
        stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Analysis, Assessment, CandidateSource};

    fn candidate(id: i64, status: CandidateStatus, score: Option<f64>) -> Candidate {
        Candidate {
            id,
            job_id: 1,
            name: format!("Candidate {id}"),
            email: None,
            linkedin_url: None,
            current_title: None,
            current_company: None,
            location: None,
            skills: vec![],
            experience: vec![],
            source: CandidateSource::Manual,
            status,
            assessment: score.map(|s| Assessment {
                match_score: s,
                analysis: Analysis {
                    summary: String::new(),
                    strengths: vec![],
                    concerns: vec![],
                    recommendation: None,
                    next_steps: String::new(),
                    skill_match: None,
                    experience_match: None,
                },
            }),
            notes: None,
            created_at: None,
            updated_at: None,
        }
    }

    fn ids(candidates: &[Candidate]) -> Vec<i64> {
        candidates.iter().map(|c| c.id).collect()
    }

    #[test]
    fn test_zero_threshold_includes_unscored() {
        let set = vec![
            candidate(1, CandidateStatus::New, None),
            candidate(2, CandidateStatus::New, Some(40.0)),
        ];
        let visible = CandidateFilter::default().apply(&set);
        assert_eq!(ids(&visible), vec![2, 1]);
    }

    #[test]
    fn test_threshold_excludes_low_and_unscored() {
        let set = vec![
            candidate(1, CandidateStatus::New, None),
            candidate(2, CandidateStatus::New, Some(69.9)),
            candidate(3, CandidateStatus::New, Some(70.0)),
            candidate(4, CandidateStatus::Reviewed, Some(95.0)),
        ];
        let visible = CandidateFilter::new(StatusFilter::All, 70).apply(&set);
        assert_eq!(ids(&visible), vec![4, 3]);
    }

    #[test]
    fn test_status_filter_is_exact_match() {
        let set = vec![
            candidate(1, CandidateStatus::New, Some(90.0)),
            candidate(2, CandidateStatus::Rejected, Some(91.0)),
        ];
        let filter = CandidateFilter::new(StatusFilter::Only(CandidateStatus::Rejected), 0);
        assert_eq!(ids(&filter.apply(&set)), vec![2]);
    }

    #[test]
    fn test_apply_is_stable_for_equal_scores() {
        let set = vec![
            candidate(5, CandidateStatus::New, Some(80.0)),
            candidate(3, CandidateStatus::New, None),
            candidate(9, CandidateStatus::New, Some(80.0)),
            candidate(1, CandidateStatus::New, None),
        ];
        assert_eq!(ids(&CandidateFilter::default().apply(&set)), vec![5, 9, 3, 1]);
    }

    #[test]
    fn test_average_over_scored_only() {
        let set = vec![
            candidate(1, CandidateStatus::New, Some(90.0)),
            candidate(2, CandidateStatus::New, Some(70.0)),
            candidate(3, CandidateStatus::New, None),
        ];
        let stats = CandidateStats::compute(&set);
        assert_eq!(stats.count, 3);
        assert_eq!(stats.unscored, 1);
        assert_eq!(stats.average_score, Some(80.0));
        assert_eq!(
            stats.tiers,
            TierCounts {
                high: 1,
                medium: 1,
                low: 0
            }
        );
    }

    #[test]
    fn test_all_unscored_has_no_average() {
        let set = vec![
            candidate(1, CandidateStatus::New, None),
            candidate(2, CandidateStatus::Contacted, None),
        ];
        let stats = CandidateStats::compute(&set);
        assert_eq!(stats.average_score, None);
        assert_eq!(stats.unscored, 2);
    }

    #[test]
    fn test_empty_set_stats() {
        let stats = CandidateStats::compute(&[]);
        assert_eq!(stats, CandidateStats::default());
    }

    #[test]
    fn test_query_params() {
        assert_eq!(CandidateFilter::default().query(), CandidateQuery::default());
        let query = CandidateFilter::new(StatusFilter::Only(CandidateStatus::Reviewed), 80).query();
        assert_eq!(query.status, Some(CandidateStatus::Reviewed));
        assert_eq!(query.min_score, Some(80));
    }

    #[test]
    fn test_status_filter_from_str() {
        assert_eq!("all".parse::<StatusFilter>().unwrap(), StatusFilter::All);
        assert_eq!(
            "contacted".parse::<StatusFilter>().unwrap(),
            StatusFilter::Only(CandidateStatus::Contacted)
        );
        assert!("pending".parse::<StatusFilter>().is_err());
    }

    #[test]
    fn test_threshold_clamped_to_hundred() {
        assert_eq!(CandidateFilter::new(StatusFilter::All, 250).min_score, 100);
    }
}
