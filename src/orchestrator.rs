//! The full client round trip: admit, upload, poll, download.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use chrono::Local;

use crate::api::ApiClient;
use crate::poller::{PollOutcome, Poller, TokioWaiter};
use crate::ui::{self, JobProgress};

/// What a finished run looks like to the caller.
#[derive(Debug)]
pub struct RunReport {
    pub job_id: String,
    pub outcome: PollOutcome,
    /// Where the transcript was saved, when the run completed.
    pub transcript_path: Option<PathBuf>,
}

/// Drives one artifact through the whole pipeline against a deployed API.
pub struct Orchestrator {
    api: ApiClient,
    /// Plain client for the capability-URL requests. Those URLs are
    /// signature-bound to an exact request shape, so no extra headers may
    /// be attached.
    http: reqwest::Client,
    poller: Poller,
    downloads_dir: PathBuf,
    verbose: bool,
}

impl Orchestrator {
    pub fn new(
        api: ApiClient,
        poller: Poller,
        downloads_dir: PathBuf,
        verbose: bool,
    ) -> Self {
        Self {
            api,
            http: reqwest::Client::new(),
            poller,
            downloads_dir,
            verbose,
        }
    }

    fn log(&self, message: &str) {
        if self.verbose {
            ui::log(message);
        }
    }

    /// Run the full round trip for the audio file at `audio_path`.
    pub async fn run(&self, audio_path: &Path) -> Result<RunReport> {
        let name = audio_path
            .file_name()
            .and_then(|n| n.to_str())
            .with_context(|| format!("invalid audio path: {}", audio_path.display()))?;
        let bytes = tokio::fs::read(audio_path)
            .await
            .with_context(|| format!("failed to read {}", audio_path.display()))?;

        let progress = JobProgress::start(name);

        // Step 1: admission.
        let admission = self.api.admit(name).await?;
        self.log(&format!("job created: {}", admission.job_id));

        // Step 2: direct upload via the capability URL.
        progress.step(&format!("uploading {name}"));
        self.upload(&admission.upload_url, bytes).await?;
        self.log("artifact uploaded");

        // Step 3: poll until a terminal outcome.
        progress.step(&format!("waiting for transcription of {name}"));
        let outcome = self
            .poller
            .poll(&self.api, &TokioWaiter, &admission.job_id)
            .await;
        progress.complete(&outcome);

        // Step 4: retrieve the transcript when there is one.
        let transcript_path = match &outcome {
            PollOutcome::Completed {
                download_url: Some(url),
            } => Some(self.download(url).await?),
            _ => None,
        };

        Ok(RunReport {
            job_id: admission.job_id,
            outcome,
            transcript_path,
        })
    }

    async fn upload(&self, upload_url: &str, bytes: Vec<u8>) -> Result<()> {
        let response = self.http.put(upload_url).body(bytes).send().await?;
        if !response.status().is_success() {
            bail!("upload rejected with status {}", response.status());
        }
        Ok(())
    }

    /// Fetch the transcript and save it under the downloads directory with
    /// a timestamped name.
    async fn download(&self, download_url: &str) -> Result<PathBuf> {
        let response = self.http.get(download_url).send().await?;
        if !response.status().is_success() {
            bail!("download rejected with status {}", response.status());
        }
        let text = response.text().await?;

        tokio::fs::create_dir_all(&self.downloads_dir).await?;
        let stamp = Local::now().format("%Y%m%d_%H%M%S");
        let path = self.downloads_dir.join(format!("transcription_{stamp}.txt"));
        tokio::fs::write(&path, &text).await?;

        self.log(&format!("transcript saved to {}", path.display()));
        Ok(path)
    }
}
