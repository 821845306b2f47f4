use thiserror::Error;

use crate::gateway::GatewayError;

/// Application-level error type.
/// Every coordinator operation returns `Result<T, RecruiterError>`.
#[derive(Debug, Error)]
pub enum RecruiterError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Remote call failed: {0}")]
    Remote(#[source] GatewayError),

    #[error("Analysis failed: {0}")]
    Analysis(#[source] GatewayError),

    #[error("Update failed: {0}")]
    Update(#[source] GatewayError),

    #[error("Data integrity error: {0}")]
    Integrity(String),

    #[error("Already in flight: {0}")]
    AlreadyInFlight(String),

    #[error("Request timed out after {0:?}")]
    Timeout(std::time::Duration),

    #[error("Request cancelled")]
    Cancelled,

    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl RecruiterError {
    /// Maps a gateway failure on a read or a generic write.
    /// A remote 404 becomes `NotFound` so callers can tell absence apart from outages.
    pub fn remote(err: GatewayError) -> Self {
        match err {
            GatewayError::NotFound(what) => RecruiterError::NotFound(what),
            other => RecruiterError::Remote(other),
        }
    }

    /// Maps a failure of the analysis endpoints. A vanished candidate is still an
    /// analysis failure from the caller's point of view.
    pub fn analysis(err: GatewayError) -> Self {
        RecruiterError::Analysis(err)
    }

    pub fn update(err: GatewayError) -> Self {
        match err {
            GatewayError::NotFound(what) => RecruiterError::NotFound(what),
            other => RecruiterError::Update(other),
        }
    }

    /// Short user-facing text for the transient notice shown after a failed mutation.
    pub fn notice(&self) -> String {
        match self {
            RecruiterError::NotFound(what) => format!("{what} no longer exists"),
            RecruiterError::Validation(msg) => msg.clone(),
            RecruiterError::Remote(_) => "The server could not be reached".to_string(),
            RecruiterError::Analysis(_) => "Failed to analyze candidate".to_string(),
            RecruiterError::Update(_) => "Failed to update status".to_string(),
            RecruiterError::Integrity(_) => "The server returned invalid data".to_string(),
            RecruiterError::AlreadyInFlight(what) => format!("{what} is already in progress"),
            RecruiterError::Timeout(_) => "The request timed out".to_string(),
            RecruiterError::Cancelled => "The request was cancelled".to_string(),
            RecruiterError::Internal(_) => "An internal error occurred".to_string(),
        }
    }
}
