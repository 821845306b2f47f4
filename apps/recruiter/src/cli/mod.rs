pub mod render;

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use recruiter::filter::{CandidateFilter, StatusFilter};
use recruiter::intake::CandidateForm;
use recruiter::models::{CandidateId, CandidateStatus, JobId, JobType, NewJob};

#[derive(Parser)]
#[command(name = "recruiter")]
#[command(about = "Job postings, candidates and AI fit analysis")]
pub struct Cli {
    /// Print views as JSON instead of text
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List job postings
    Jobs,

    /// Create a job posting
    CreateJob(CreateJobArgs),

    /// Delete a job posting and all of its candidates
    DeleteJob {
        /// Job ID
        job_id: JobId,
    },

    /// Show a job with its candidates
    Show {
        /// Job ID
        job_id: JobId,

        #[command(flatten)]
        filter: FilterArgs,

        /// Show full candidate details
        #[arg(short, long)]
        detailed: bool,
    },

    /// Add a candidate to a job and analyze it
    Add(AddCandidateArgs),

    /// Analyze (or re-analyze) one candidate
    Analyze {
        /// Job ID
        job_id: JobId,
        /// Candidate ID
        candidate_id: CandidateId,
    },

    /// Analyze every unscored candidate of a job
    AnalyzeAll {
        /// Job ID
        job_id: JobId,
    },

    /// Change a candidate's status
    Status {
        /// Job ID
        job_id: JobId,
        /// Candidate ID
        candidate_id: CandidateId,
        /// New status (new, reviewed, contacted, rejected)
        status: CandidateStatus,
    },

    /// Delete a candidate
    Remove {
        /// Job ID
        job_id: JobId,
        /// Candidate ID
        candidate_id: CandidateId,
    },
}

#[derive(Args, Clone, Copy)]
pub struct FilterArgs {
    /// Filter by status (all, new, reviewed, contacted, rejected)
    #[arg(short, long, default_value = "all")]
    pub status: StatusFilter,

    /// Only candidates scoring at least this much (0 shows everyone, unscored included)
    #[arg(short, long, default_value = "0", value_parser = clap::value_parser!(u8).range(0..=100))]
    pub min_score: u8,
}

impl From<FilterArgs> for CandidateFilter {
    fn from(args: FilterArgs) -> Self {
        CandidateFilter::new(args.status, args.min_score)
    }
}

#[derive(Args)]
pub struct CreateJobArgs {
    #[arg(long)]
    pub title: String,
    #[arg(long)]
    pub company: String,
    #[arg(long)]
    pub description: String,
    #[arg(long)]
    pub location: Option<String>,
    /// Full-time, Part-time, Contract or Internship
    #[arg(long)]
    pub job_type: Option<JobType>,
    #[arg(long)]
    pub salary_range: Option<String>,
}

impl From<CreateJobArgs> for NewJob {
    fn from(args: CreateJobArgs) -> Self {
        NewJob {
            title: args.title,
            company: args.company,
            description: args.description,
            location: args.location,
            job_type: args.job_type,
            salary_range: args.salary_range,
        }
    }
}

#[derive(Args)]
pub struct AddCandidateArgs {
    /// Job ID
    pub job_id: JobId,
    #[arg(long)]
    pub name: String,
    #[arg(long, default_value = "")]
    pub email: String,
    #[arg(long, default_value = "")]
    pub linkedin_url: String,
    #[arg(long, default_value = "")]
    pub current_title: String,
    #[arg(long, default_value = "")]
    pub current_company: String,
    #[arg(long, default_value = "")]
    pub location: String,
    /// Comma-separated skills
    #[arg(long, default_value = "")]
    pub skills: String,
    /// Experience summary, or a JSON array of {title, company, duration, description}
    #[arg(long, default_value = "", conflicts_with = "experience_file")]
    pub experience: String,
    /// Read the experience text from a file
    #[arg(long)]
    pub experience_file: Option<PathBuf>,
}

impl AddCandidateArgs {
    pub fn into_form(self) -> anyhow::Result<CandidateForm> {
        let experience = match &self.experience_file {
            Some(path) => std::fs::read_to_string(path).map_err(|e| {
                anyhow::anyhow!("Failed to read experience file {}: {e}", path.display())
            })?,
            None => self.experience,
        };
        Ok(CandidateForm {
            name: self.name,
            email: self.email,
            linkedin_url: self.linkedin_url,
            current_title: self.current_title,
            current_company: self.current_company,
            location: self.location,
            skills: self.skills,
            experience,
        })
    }
}
