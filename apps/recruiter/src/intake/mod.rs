// Candidate intake: turns the loosely-structured "add candidate" form into the
// canonical submission payload. Creation itself (and the analysis that follows
// it) is orchestrated by the workspace coordinator.

pub mod normalize;

use crate::errors::RecruiterError;
use crate::models::job::{max_len, non_blank, require, MAX_SHORT_FIELD};
use crate::models::{CandidateSource, JobId, NewCandidate};

pub use normalize::{parse_experience, parse_skills, ExperienceInput};

const MAX_LINKEDIN_URL: usize = 500;

/// Raw form input, one string per field as typed or pasted by the recruiter.
#[derive(Debug, Clone, Default)]
pub struct CandidateForm {
    pub name: String,
    pub email: String,
    pub linkedin_url: String,
    pub current_title: String,
    pub current_company: String,
    pub location: String,
    /// Comma-separated.
    pub skills: String,
    /// JSON array of work history, or any free text.
    pub experience: String,
}

impl CandidateForm {
    /// Validates and normalizes the form for submission under `job_id`.
    pub fn into_new_candidate(self, job_id: JobId) -> Result<NewCandidate, RecruiterError> {
        let name = self.name.trim().to_string();
        require("name", &name)?;
        max_len("name", &name, MAX_SHORT_FIELD)?;

        let email = non_blank(Some(self.email));
        let linkedin_url = non_blank(Some(self.linkedin_url));
        let current_title = non_blank(Some(self.current_title));
        let current_company = non_blank(Some(self.current_company));
        let location = non_blank(Some(self.location));

        for (field, value, limit) in [
            ("email", &email, MAX_SHORT_FIELD),
            ("linkedin_url", &linkedin_url, MAX_LINKEDIN_URL),
            ("current_title", &current_title, MAX_SHORT_FIELD),
            ("current_company", &current_company, MAX_SHORT_FIELD),
            ("location", &location, MAX_SHORT_FIELD),
        ] {
            if let Some(value) = value {
                max_len(field, value, limit)?;
            }
        }

        let experience = parse_experience(
            &self.experience,
            current_title.as_deref(),
            current_company.as_deref(),
        );
        if let ExperienceInput::Freeform(_) = &experience {
            tracing::debug!("experience for '{name}' kept as free text");
        }

        Ok(NewCandidate {
            job_id,
            name,
            email,
            linkedin_url,
            current_title,
            current_company,
            location,
            skills: parse_skills(&self.skills),
            experience: experience.into_entries(),
            source: CandidateSource::Manual,
        })
    }
}
