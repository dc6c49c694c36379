mod book;
mod cli;
mod config;
mod error;
mod jobs;
mod orchestrator;
mod prompt;
mod providers;
mod render;
mod server;
mod telemetry;
mod ui;

use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use tokio::net::TcpListener;

use crate::book::BookRequest;
use crate::cli::{Cli, Command};
use crate::config::LivroConfig;
use crate::error::LivroError;
use crate::jobs::{JobStatus, JobStore, MemoryJobStore};
use crate::orchestrator::BookOrchestrator;
use crate::ui::JobProgress;

#[tokio::main]
async fn main() {
    if let Err(err) = run().await {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}

async fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => LivroConfig::load_from(path)?,
        None => LivroConfig::load()?,
    };
    telemetry::init(config.log_format, cli.verbose)?;

    let jobs: Arc<dyn JobStore> = Arc::new(MemoryJobStore::new());
    let orchestrator =
        Arc::new(BookOrchestrator::from_config(&config, Arc::clone(&jobs)).map_err(LivroError::from)?);

    match cli.command {
        Command::Serve { bind } => {
            let addr = bind.unwrap_or_else(|| config.bind.clone());
            let listener = TcpListener::bind(&addr)
                .await
                .with_context(|| format!("failed to bind {addr}"))?;
            server::serve(listener, server::router(orchestrator)).await?;
        }
        Command::Generate(args) => {
            let request = BookRequest::from(args);
            let progress = JobProgress::start(&format!("{} ({} pages)", request.name, request.pages));
            let id = orchestrator.submit(request).map_err(LivroError::from)?;

            let job = loop {
                let job = jobs
                    .get(&id)
                    .with_context(|| format!("job {id} missing from store"))?;
                progress.update(&job);
                if job.status.is_terminal() {
                    break job;
                }
                tokio::time::sleep(Duration::from_millis(200)).await;
            };
            progress.complete(&job);

            if job.status == JobStatus::Error {
                anyhow::bail!("book generation failed");
            }
        }
    }
    Ok(())
}
