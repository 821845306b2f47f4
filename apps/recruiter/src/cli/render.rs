//! Plain-text rendering of coordinator views.

use std::fmt::Write;

use recruiter::analysis::Flight;
use recruiter::filter::CandidateStats;
use recruiter::lifecycle::score_tier;
use recruiter::models::{Candidate, Job};
use recruiter::workspace::{BoardView, WorkspaceView};

pub fn board(view: &BoardView) -> String {
    let mut out = String::new();
    if let Some(error) = &view.load_error {
        let _ = writeln!(out, "error: {error}");
        return out;
    }
    if let Some(notice) = &view.notice {
        let _ = writeln!(out, "! {notice}");
    }
    if view.jobs.is_empty() {
        let _ = writeln!(out, "No jobs yet. Create one with `recruiter create-job`.");
        return out;
    }
    for job in &view.jobs {
        let _ = writeln!(out, "{:>4}  {}", job.id, job_line(job));
    }
    out
}

pub fn workspace(view: &WorkspaceView, detailed: bool) -> String {
    let mut out = String::new();
    if let Some(error) = &view.load_error {
        let _ = writeln!(out, "error: {error}");
        return out;
    }
    let Some(job) = &view.job else {
        let _ = writeln!(out, "Job not loaded");
        return out;
    };

    let _ = writeln!(out, "{}", job_line(job));
    let _ = writeln!(out, "{}", stats_line(&view.stats));
    let _ = writeln!(
        out,
        "filter: status={} min_score={}",
        view.filter.status, view.filter.min_score
    );
    if let Some(notice) = &view.notice {
        let _ = writeln!(out, "! {notice}");
    }
    let _ = writeln!(out);

    if view.candidates.is_empty() {
        let _ = writeln!(out, "No candidates match.");
        return out;
    }
    for candidate in &view.candidates {
        let analyzing = view.is_in_flight(&Flight::Analyze(candidate.id));
        out.push_str(&candidate_block(candidate, detailed, analyzing));
    }
    out
}

fn job_line(job: &Job) -> String {
    let mut line = format!("{} @ {}", job.title, job.company);
    for part in [
        job.location.clone(),
        job.job_type.map(|t| t.to_string()),
        job.salary_range.clone(),
    ]
    .into_iter()
    .flatten()
    {
        line.push_str(" | ");
        line.push_str(&part);
    }
    line
}

fn stats_line(stats: &CandidateStats) -> String {
    let average = stats
        .average_score
        .map(|avg| format!("{avg:.0}%"))
        .unwrap_or_else(|| "n/a".to_string());
    format!(
        "{} candidates | avg score {} | {} unscored | tiers: {} high, {} medium, {} low",
        stats.count, average, stats.unscored, stats.tiers.high, stats.tiers.medium, stats.tiers.low
    )
}

/// Score to one decimal next to its tier. Rounding never carries a score
/// into the next tier: 79.96 shows as 79.9, not 80.0.
pub fn score_badge(candidate: &Candidate) -> String {
    let Some(score) = candidate.match_score() else {
        return "unscored".to_string();
    };
    let tier = score_tier(score);
    let mut shown = (score * 10.0).round() / 10.0;
    if score_tier(shown) != tier {
        shown -= 0.1;
    }
    if shown.fract() == 0.0 {
        format!("{shown:.0}% {tier}")
    } else {
        format!("{shown:.1}% {tier}")
    }
}

fn candidate_block(candidate: &Candidate, detailed: bool, analyzing: bool) -> String {
    let mut out = String::new();
    let mut headline = format!(
        "{:>4}  {}  [{}] ({})",
        candidate.id,
        candidate.name,
        score_badge(candidate),
        candidate.status
    );
    if analyzing {
        headline.push_str(" analyzing...");
    }
    let _ = writeln!(out, "{headline}");

    match (&candidate.current_title, &candidate.current_company) {
        (Some(title), Some(company)) => {
            let _ = writeln!(out, "      {title} at {company}");
        }
        (Some(title), None) => {
            let _ = writeln!(out, "      {title}");
        }
        (None, Some(company)) => {
            let _ = writeln!(out, "      at {company}");
        }
        (None, None) => {}
    }

    if !detailed {
        return out;
    }

    if let Some(location) = &candidate.location {
        let _ = writeln!(out, "      location: {location}");
    }
    if let Some(email) = &candidate.email {
        let _ = writeln!(out, "      email: {email}");
    }
    if let Some(url) = &candidate.linkedin_url {
        let _ = writeln!(out, "      linkedin: {url}");
    }
    if !candidate.skills.is_empty() {
        let _ = writeln!(out, "      skills: {}", candidate.skills.join(", "));
    }
    if let Some(analysis) = candidate.analysis() {
        if !analysis.summary.is_empty() {
            let _ = writeln!(out, "      summary: {}", analysis.summary);
        }
        for strength in &analysis.strengths {
            let _ = writeln!(out, "      + {strength}");
        }
        for concern in &analysis.concerns {
            let _ = writeln!(out, "      - {concern}");
        }
        if let Some(rec) = &analysis.recommendation {
            let _ = writeln!(out, "      recommendation: {}", rec.label());
        }
        if !analysis.next_steps.is_empty() {
            let _ = writeln!(out, "      next steps: {}", analysis.next_steps);
        }
    }
    for exp in &candidate.experience {
        let mut line = exp.title.clone().unwrap_or_default();
        if let Some(company) = &exp.company {
            line.push_str(&format!(" at {company}"));
        }
        if let Some(duration) = &exp.duration {
            line.push_str(&format!(" ({duration})"));
        }
        let _ = writeln!(out, "      * {}", line.trim());
        if let Some(description) = &exp.description {
            let _ = writeln!(out, "        {description}");
        }
    }
    out
}
