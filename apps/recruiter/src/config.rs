use std::time::Duration;

use anyhow::{Context, Result};

/// Client configuration loaded from environment variables.
/// Every variable has a default; malformed values are startup errors.
#[derive(Debug, Clone)]
pub struct Config {
    pub api_url: String,
    pub request_timeout: Duration,
    pub analysis_timeout: Duration,
    pub batch_timeout: Duration,
    pub max_retries: u32,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            api_url: std::env::var("RECRUITER_API_URL")
                .unwrap_or_else(|_| "http://localhost:8000".to_string())
                .trim_end_matches('/')
                .to_string(),
            request_timeout: Duration::from_secs(parse_env("REQUEST_TIMEOUT_SECS", 30)?),
            analysis_timeout: Duration::from_secs(parse_env("ANALYSIS_TIMEOUT_SECS", 120)?),
            batch_timeout: Duration::from_secs(parse_env("BATCH_TIMEOUT_SECS", 300)?),
            max_retries: parse_env("MAX_RETRIES", 3)?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: "http://localhost:8000".to_string(),
            request_timeout: Duration::from_secs(30),
            analysis_timeout: Duration::from_secs(120),
            batch_timeout: Duration::from_secs(300),
            max_retries: 3,
            rust_log: "info".to_string(),
        }
    }
}

fn parse_env<T>(key: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .with_context(|| format!("{key} must be a valid number, got '{raw}'")),
        Err(_) => Ok(default),
    }
}
