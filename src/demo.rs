//! In-process demonstration of the full job lifecycle.
//!
//! Wires the admission service, the storage trigger worker and the status
//! service over the in-memory backends, then walks one job from admission
//! to transcript retrieval — no network, no real transcription engine.

use anyhow::{Result, bail};

use crate::admission::AdmissionService;
use crate::api::{ErrorBody, StatusBody};
use crate::status::StatusService;
use crate::store::CapabilityStore;
use crate::store::memory::{MemoryCapabilityStore, MemoryLedger};
use crate::transcribe::EchoTranscriber;
use crate::ui;
use crate::worker::{EventBatch, ObjectRecord, Worker};

pub async fn run(job_ttl_secs: i64, url_ttl_secs: i64) -> Result<()> {
    let ledger = MemoryLedger::new();
    let store = MemoryCapabilityStore::new("demo-bucket", url_ttl_secs);
    let transcriber = EchoTranscriber;

    let admission_svc = AdmissionService::new(&ledger, &store, job_ttl_secs);
    let status_svc = StatusService::new(&ledger, &store);
    let worker = Worker::new(&ledger, &store, &transcriber);

    // A query for a job that was never issued maps to the structured 404.
    if let Err(err) = status_svc.status("never-issued").await {
        let (code, body) = ErrorBody::from_service(&err);
        ui::log(&format!("probe for unknown job: {code} {}", body.error));
    }

    // Admission.
    let admission = admission_svc.admit("sample.wav").await?;
    ui::log(&format!("admitted job {}", admission.job_id));
    let report = status_svc.status(&admission.job_id).await?;
    ui::log(&format!("status after admission: {}", report.status));

    // Direct upload through the capability URL.
    let key = store
        .accept_upload(&admission.upload_url, b"demo audio bytes".to_vec())
        .map_err(|err| anyhow::anyhow!("upload failed: {err}"))?;
    ui::log(&format!("uploaded {key}"));

    // The object-creation event triggers the worker.
    let outcomes = worker
        .handle_batch(&EventBatch {
            records: vec![ObjectRecord {
                bucket: store.bucket().to_string(),
                key,
                size: Some(16),
            }],
        })
        .await;
    ui::log(&format!("worker outcomes: {outcomes:?}"));

    // Polling side: the terminal status carries the transcript capability.
    let report = status_svc.status(&admission.job_id).await?;
    if !report.status.is_terminal() {
        bail!("demo job stuck in {}", report.status);
    }
    let wire = serde_json::to_string(&StatusBody::from(report.clone()))?;
    ui::log(&format!("status response: {wire}"));
    let Some(url) = report.result_url else {
        bail!("demo job did not complete: {:?}", report.error);
    };
    ui::log(&format!("result capability: {url}"));

    let transcript = store.get("transcripts/sample.wav.txt").await?;
    ui::log(&format!(
        "transcript: {}",
        String::from_utf8_lossy(&transcript)
    ));
    Ok(())
}
