//! Recruiting workspace client: jobs, candidates and AI fit analysis against a
//! remote recruiting service.

pub mod analysis;
pub mod config;
pub mod errors;
pub mod filter;
pub mod gateway;
pub mod intake;
pub mod lifecycle;
pub mod models;
pub mod state;
pub mod workspace;

pub use errors::RecruiterError;
