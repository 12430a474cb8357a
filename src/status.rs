//! Status Query Service: resolves job status from the ledger and lazily
//! mints the transcript capability on first sight of a completed job.

use crate::error::ServiceError;
use crate::job::JobStatus;
use crate::keys::{audio_key, transcript_key};
use crate::store::{CapabilityStore, JobLedger, StoreError};

/// What a caller learns about a job.
#[derive(Debug, Clone)]
pub struct StatusReport {
    pub status: JobStatus,
    /// Present exactly when `status` is `Completed`.
    pub result_url: Option<String>,
    /// Failure detail recorded by the worker, when `status` is `Failed`.
    pub error: Option<String>,
}

pub struct StatusService<'a, L, C> {
    ledger: &'a L,
    store: &'a C,
}

impl<'a, L: JobLedger, C: CapabilityStore> StatusService<'a, L, C> {
    pub fn new(ledger: &'a L, store: &'a C) -> Self {
        Self { ledger, store }
    }

    /// Resolve the current status of `job_id`.
    ///
    /// On the first query that observes `Completed`, a read capability for
    /// the derived transcript key is minted and cached into the record.
    /// The cache write is best-effort: minting is idempotent and
    /// side-effect-free on the object, so a lost update only costs one
    /// extra mint on a later call.
    pub async fn status(&self, job_id: &str) -> Result<StatusReport, ServiceError> {
        let record = self.ledger.get(job_id).await.map_err(|err| match err {
            StoreError::NotFound(_) => ServiceError::NotFound(job_id.to_string()),
            other => ServiceError::Dependency(other.to_string()),
        })?;

        let report = match record.status {
            JobStatus::Completed => {
                let result_url = match record.result_url {
                    Some(url) => url,
                    None => {
                        let key = transcript_key(&audio_key(&record.source_name));
                        let url = self
                            .store
                            .sign_get(&key)
                            .await
                            .map_err(|err| ServiceError::Dependency(err.to_string()))?;
                        let _ = self.ledger.record_result_url(job_id, &url).await;
                        url
                    }
                };
                StatusReport {
                    status: record.status,
                    result_url: Some(result_url),
                    error: None,
                }
            }
            JobStatus::Failed => StatusReport {
                status: record.status,
                result_url: None,
                error: record.error,
            },
            _ => StatusReport {
                status: record.status,
                result_url: None,
                error: None,
            },
        };

        Ok(report)
    }
}
