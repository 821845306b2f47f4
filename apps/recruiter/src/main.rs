mod cli;

use anyhow::Result;
use clap::Parser;
use serde::Serialize;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use recruiter::config::Config;
use recruiter::state::AppState;
use recruiter::workspace::JobWorkspace;

use crate::cli::{render, Cli, Commands};

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;

    // Initialize structured logging; stdout is reserved for views
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    info!(
        "Recruiter v{} using {}",
        env!("CARGO_PKG_VERSION"),
        config.api_url
    );

    let cli = Cli::parse();
    let state = AppState::new(config)?;

    // Ctrl-C cancels whatever request is outstanding
    let shutdown = state.shutdown.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Interrupted, cancelling outstanding requests");
            shutdown.cancel();
        }
    });

    run(cli, &state).await
}

async fn run(cli: Cli, state: &AppState) -> Result<()> {
    let json = cli.json;

    match cli.command {
        Commands::Jobs => {
            let board = state.job_board();
            let loaded = board.load().await;
            let view = board.view().await;
            emit(json, &view, || render::board(&view))?;
            loaded?;
        }

        Commands::CreateJob(args) => {
            let board = state.job_board();
            let job = board.create_job(args.into()).await?;
            println!("Created job {} ({} @ {})", job.id, job.title, job.company);
        }

        Commands::DeleteJob { job_id } => {
            let board = state.job_board();
            board.delete_job(job_id).await?;
            println!("Deleted job {job_id}");
        }

        Commands::Show {
            job_id,
            filter,
            detailed,
        } => {
            let workspace = state.workspace(job_id);
            let loaded = workspace.load(filter.into()).await;
            show(json, &workspace, detailed).await?;
            loaded?;
        }

        Commands::Add(args) => {
            let workspace = state.workspace(args.job_id);
            workspace.load(Default::default()).await?;
            let added = workspace.add_candidate(args.into_form()?).await?;
            println!(
                "Added candidate {} ({}) to job {}",
                added.candidate.id,
                added.candidate.name,
                workspace.job_id()
            );
            if let Some(e) = &added.analysis_error {
                println!("Analysis did not complete: {e}");
            }
            show(json, &workspace, false).await?;
        }

        Commands::Analyze {
            job_id,
            candidate_id,
        } => {
            let workspace = state.workspace(job_id);
            workspace.analyze_one(candidate_id).await?;
            let candidate = workspace.candidate(candidate_id).await?;
            println!(
                "Candidate {} is now {}",
                candidate.id,
                render::score_badge(&candidate)
            );
            show(json, &workspace, false).await?;
        }

        Commands::AnalyzeAll { job_id } => {
            let workspace = state.workspace(job_id);
            let report = workspace.analyze_all_unscored().await?;
            println!("Analysis complete: {} candidates analyzed", report.total_analyzed);
            show(json, &workspace, false).await?;
        }

        Commands::Status {
            job_id,
            candidate_id,
            status,
        } => {
            let workspace = state.workspace(job_id);
            workspace.change_status(candidate_id, status).await?;
            show(json, &workspace, false).await?;
        }

        Commands::Remove {
            job_id,
            candidate_id,
        } => {
            let workspace = state.workspace(job_id);
            workspace.load(Default::default()).await?;
            workspace.delete_candidate(candidate_id).await?;
            println!("Deleted candidate {candidate_id}");
            show(json, &workspace, false).await?;
        }
    }

    Ok(())
}

async fn show(json: bool, workspace: &JobWorkspace, detailed: bool) -> Result<()> {
    let view = workspace.view().await;
    emit(json, &view, || render::workspace(&view, detailed))
}

fn emit<T: Serialize>(json: bool, value: &T, text: impl FnOnce() -> String) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(value)?);
    } else {
        print!("{}", text());
    }
    Ok(())
}
