//! Normalization of free-form recruiter input into structured profile fields.

use serde::Deserialize;

use crate::models::ExperienceEntry;

/// Splits a comma-delimited skills string. Order is kept; duplicates are kept.
pub fn parse_skills(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Outcome of reading the experience field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExperienceInput {
    /// Nothing was entered.
    Empty,
    /// The text was a JSON array of records (or a single record).
    Structured(Vec<ExperienceEntry>),
    /// The text was not structured; it became the description of one entry.
    Freeform(ExperienceEntry),
}

impl ExperienceInput {
    pub fn into_entries(self) -> Vec<ExperienceEntry> {
        match self {
            ExperienceInput::Empty => Vec::new(),
            ExperienceInput::Structured(entries) => entries,
            ExperienceInput::Freeform(entry) => vec![entry],
        }
    }

    pub fn is_structured(&self) -> bool {
        matches!(self, ExperienceInput::Structured(_))
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum StructuredExperience {
    Many(Vec<ExperienceEntry>),
    One(ExperienceEntry),
}

/// Reads pasted experience text. Never fails: input that does not parse as
/// structured records falls back to a single entry whose description is the
/// raw text, paired with the separately entered title and company.
pub fn parse_experience(
    raw: &str,
    current_title: Option<&str>,
    current_company: Option<&str>,
) -> ExperienceInput {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return ExperienceInput::Empty;
    }

    let candidate_json = strip_json_fences(trimmed);
    if candidate_json.starts_with('[') || candidate_json.starts_with('{') {
        match serde_json::from_str::<StructuredExperience>(candidate_json) {
            Ok(StructuredExperience::Many(entries)) => {
                return ExperienceInput::Structured(entries)
            }
            Ok(StructuredExperience::One(entry)) => {
                return ExperienceInput::Structured(vec![entry])
            }
            Err(e) => {
                tracing::debug!("experience is not structured JSON, keeping as text: {e}");
            }
        }
    }

    ExperienceInput::Freeform(ExperienceEntry {
        title: current_title.map(str::to_string),
        company: current_company.map(str::to_string),
        duration: None,
        description: Some(trimmed.to_string()),
    })
}

/// Strips ```json ... ``` or ``` ... ``` code fences from pasted text.
fn strip_json_fences(text: &str) -> &str {
    let text = text.trim();
    if let Some(stripped) = text.strip_prefix("```json") {
        stripped
            .trim_start()
            .strip_suffix("```")
            .map(|s| s.trim())
            .unwrap_or(stripped.trim_start())
    } else if let Some(stripped) = text.strip_prefix("```") {
        stripped
            .trim_start()
            .strip_suffix("```")
            .map(|s| s.trim())
            .unwrap_or(stripped.trim_start())
    } else {
        text
    }
}
