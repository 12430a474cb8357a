mod admission;
mod api;
mod cli;
mod config;
mod demo;
mod error;
mod job;
mod keys;
mod orchestrator;
mod poller;
mod status;
mod store;
mod transcribe;
mod ui;
mod worker;

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Result, bail};
use clap::Parser;

use api::{ApiClient, ApiError};
use cli::{Cli, Command};
use config::ScrivanoConfig;
use error::ScrivanoError;
use orchestrator::Orchestrator;
use poller::{PollOutcome, Poller};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = ScrivanoConfig::load()?;
    if let Some(base) = cli.api_base {
        config.api_base = base;
    }
    if let Some(attempts) = cli.max_attempts {
        config.max_poll_attempts = attempts;
    }
    if let Some(secs) = cli.interval_secs {
        config.poll_interval_secs = secs;
    }

    match cli.command {
        Command::Run { audio_file } => {
            let orchestrator = Orchestrator::new(
                api_client(&config)?,
                Poller::new(
                    Duration::from_secs(config.poll_interval_secs),
                    config.max_poll_attempts,
                )
                .with_verbose(cli.verbose),
                PathBuf::from("downloads"),
                cli.verbose,
            );
            let report = orchestrator.run(&audio_file).await?;
            match report.outcome {
                PollOutcome::Completed { .. } => Ok(()),
                other => bail!("job {} did not complete: {other:?}", report.job_id),
            }
        }
        Command::Status { job_id } => {
            show_status(&api_client(&config)?, &job_id, cli.verbose).await
        }
        Command::Demo => demo::run(config.job_ttl_secs, config.url_ttl_secs).await,
    }
}

fn api_client(config: &ScrivanoConfig) -> Result<ApiClient, ScrivanoError> {
    if config.api_base.is_empty() {
        return Err(ScrivanoError::Config(
            "no API base URL; set api_base in scrivano.toml, SCRIVANO_API_BASE, or --api-base"
                .into(),
        ));
    }
    ApiClient::new(config.api_base.clone()).map_err(ScrivanoError::from)
}

async fn show_status(api: &ApiClient, job_id: &str, verbose: bool) -> Result<()> {
    if verbose {
        ui::log(&format!("querying status of {job_id}"));
    }
    match api.status(job_id).await {
        Ok(body) => {
            ui::log(&format!("job {job_id}: {}", body.status));
            if let Some(url) = body.download_url {
                ui::log(&format!("download URL: {url}"));
            }
            if let Some(error) = body.error {
                ui::log(&format!("failure detail: {error}"));
            }
            Ok(())
        }
        Err(ApiError::NotFound) => bail!("job {job_id} not found"),
        Err(err) => Err(err.into()),
    }
}
