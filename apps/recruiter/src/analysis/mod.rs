//! Single-flight guards for user-triggered operations.
//!
//! At most one request per (operation, subject) pair may be outstanding. A
//! trigger that finds its flag already set is rejected before any remote call
//! is made. Flags are released by dropping the guard, so completion, failure,
//! timeout and cancellation all reset them.

use std::collections::HashSet;
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard};

use serde::Serialize;

use crate::errors::RecruiterError;
use crate::models::{CandidateId, JobId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "operation", content = "subject", rename_all = "snake_case")]
pub enum Flight {
    /// Single-candidate analysis (including the one that follows creation).
    Analyze(CandidateId),
    /// Analysis of every unscored candidate of a job.
    BatchAnalyze(JobId),
    StatusUpdate(CandidateId),
    AddCandidate(JobId),
}

impl fmt::Display for Flight {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Flight::Analyze(id) => write!(f, "Analysis of candidate {id}"),
            Flight::BatchAnalyze(id) => write!(f, "Batch analysis of job {id}"),
            Flight::StatusUpdate(id) => write!(f, "Status update of candidate {id}"),
            Flight::AddCandidate(id) => write!(f, "Adding a candidate to job {id}"),
        }
    }
}

/// Shared set of in-flight operations.
#[derive(Debug, Clone, Default)]
pub struct InFlight {
    active: Arc<Mutex<HashSet<Flight>>>,
}

impl InFlight {
    pub fn new() -> Self {
        Self::default()
    }

    /// Marks `flight` as outstanding, or fails if it already is.
    pub fn acquire(&self, flight: Flight) -> Result<FlightGuard, RecruiterError> {
        if !self.lock().insert(flight) {
            tracing::debug!("{flight} rejected: already in flight");
            return Err(RecruiterError::AlreadyInFlight(flight.to_string()));
        }
        Ok(FlightGuard {
            flight,
            active: Arc::clone(&self.active),
        })
    }

    pub fn contains(&self, flight: &Flight) -> bool {
        self.lock().contains(flight)
    }

    pub fn snapshot(&self) -> HashSet<Flight> {
        self.lock().clone()
    }

    fn lock(&self) -> MutexGuard<'_, HashSet<Flight>> {
        // A poisoned set is still a valid set of flags.
        self.active.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

/// Releases its flight when dropped.
#[derive(Debug)]
pub struct FlightGuard {
    flight: Flight,
    active: Arc<Mutex<HashSet<Flight>>>,
}

impl Drop for FlightGuard {
    fn drop(&mut self) {
        let mut active = self
            .active
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        active.remove(&self.flight);
    }
}
