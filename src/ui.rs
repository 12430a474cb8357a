//! Terminal output — spinner and colored status lines.
//!
//! Uses `indicatif` for the progress spinner and `console` for styling.
//! [`JobProgress`] tracks one transcription round trip visually.

use chrono::Local;
use console::Style;
use indicatif::{ProgressBar, ProgressStyle};

use crate::poller::PollOutcome;

/// Print a log line prefixed with a `HH:MM:SS` timestamp.
pub fn log(message: &str) {
    let timestamp = Local::now().format("%H:%M:%S");
    println!("[{timestamp}] {message}");
}

/// Visual progress for one job: an animated spinner while the pipeline
/// runs, colored lines for the terminal outcome.
pub struct JobProgress {
    pb: ProgressBar,
    green: Style,
    red: Style,
    yellow: Style,
}

impl JobProgress {
    /// Start the spinner for the named artifact.
    pub fn start(name: &str) -> Self {
        let pb = ProgressBar::new_spinner();
        pb.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.cyan} {msg}")
                .expect("invalid template"),
        );
        pb.set_message(format!("admitting {name}"));
        pb.enable_steady_tick(std::time::Duration::from_millis(100));

        Self {
            pb,
            green: Style::new().green().bold(),
            red: Style::new().red().bold(),
            yellow: Style::new().yellow(),
        }
    }

    /// Update the spinner message to the current pipeline step.
    pub fn step(&self, message: &str) {
        self.pb.set_message(message.to_string());
    }

    /// Finish the spinner and print the terminal outcome.
    pub fn complete(&self, outcome: &PollOutcome) {
        self.pb.finish_and_clear();
        match outcome {
            PollOutcome::Completed { .. } => {
                println!(
                    "  {} Transcription completed",
                    self.green.apply_to("✓")
                );
            }
            PollOutcome::Failed { reason } => {
                println!(
                    "  {} Transcription failed: {reason}",
                    self.red.apply_to("✗")
                );
            }
            PollOutcome::NotFound => {
                println!("  {} Job not found", self.red.apply_to("✗"));
            }
            PollOutcome::TimedOut { attempts } => {
                println!(
                    "  {} No result after {attempts} attempts",
                    self.yellow.apply_to("⏱")
                );
            }
        }
    }
}
