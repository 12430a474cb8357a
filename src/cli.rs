//! Command-line interface, clap derive.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// scrivano — asynchronous audio transcription client.
#[derive(Debug, Parser)]
#[command(name = "scrivano", version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Base URL of the job API. Overrides scrivano.toml and the
    /// SCRIVANO_API_BASE environment variable.
    #[arg(long, global = true)]
    pub api_base: Option<String>,

    /// Polling attempt budget.
    #[arg(long, global = true)]
    pub max_attempts: Option<u32>,

    /// Seconds between status polls.
    #[arg(long, global = true)]
    pub interval_secs: Option<u64>,

    /// Print timestamped progress lines for every pipeline step and poll
    /// attempt.
    #[arg(long, short, global = true, default_value_t = false)]
    pub verbose: bool,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Transcribe an audio file: admit, upload, poll, download.
    Run {
        /// Path to the audio file to submit.
        audio_file: PathBuf,
    },

    /// Check the status of an existing job once.
    Status {
        /// Job id returned at admission time.
        job_id: String,
    },

    /// Run the whole pipeline in-process against in-memory backends.
    Demo,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_parses_run_subcommand() {
        let cli = Cli::parse_from(["scrivano", "run", "sample.wav"]);
        match cli.command {
            Command::Run { audio_file } => {
                assert_eq!(audio_file, PathBuf::from("sample.wav"));
            }
            _ => panic!("expected Run command"),
        }
    }

    #[test]
    fn cli_parses_status_subcommand() {
        let cli = Cli::parse_from(["scrivano", "status", "j-123"]);
        match cli.command {
            Command::Status { job_id } => assert_eq!(job_id, "j-123"),
            _ => panic!("expected Status command"),
        }
    }

    #[test]
    fn cli_parses_global_flags() {
        let cli = Cli::parse_from([
            "scrivano",
            "--api-base",
            "https://api.example.com/dev",
            "--max-attempts",
            "5",
            "--interval-secs",
            "1",
            "--verbose",
            "demo",
        ]);
        assert_eq!(cli.api_base.as_deref(), Some("https://api.example.com/dev"));
        assert_eq!(cli.max_attempts, Some(5));
        assert_eq!(cli.interval_secs, Some(1));
        assert!(cli.verbose);
        assert!(matches!(cli.command, Command::Demo));
    }

    #[test]
    fn cli_verbose_defaults_off() {
        let cli = Cli::parse_from(["scrivano", "status", "j-1"]);
        assert!(!cli.verbose);
    }

    #[test]
    fn cli_verify() {
        Cli::command().debug_assert();
    }
}
