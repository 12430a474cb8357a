//! Job Admission Service: mints a job, records it, and hands back a
//! write-scoped capability URL for the direct upload.

use crate::error::ServiceError;
use crate::job::JobRecord;
use crate::keys::audio_key;
use crate::store::{CapabilityStore, JobLedger, StoreError};

/// Successful admission: the caller uploads directly to `upload_url` and
/// polls with `job_id`.
#[derive(Debug, Clone)]
pub struct Admission {
    pub job_id: String,
    pub upload_url: String,
}

pub struct AdmissionService<'a, L, C> {
    ledger: &'a L,
    store: &'a C,
    job_ttl_secs: i64,
}

impl<'a, L: JobLedger, C: CapabilityStore> AdmissionService<'a, L, C> {
    pub fn new(ledger: &'a L, store: &'a C, job_ttl_secs: i64) -> Self {
        Self {
            ledger,
            store,
            job_ttl_secs,
        }
    }

    /// Admit a job for the named artifact.
    ///
    /// Writes the initial `UPLOADING` ledger record with an expiry, then
    /// mints a PUT capability scoped to `audio/{name}` and tagged with the
    /// new job id. Dependency failures propagate without internal retry.
    pub async fn admit(&self, name: &str) -> Result<Admission, ServiceError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(ServiceError::Validation(
                "artifact name must not be empty".into(),
            ));
        }

        let record = JobRecord::new(name.to_string(), self.job_ttl_secs);
        let job_id = record.job_id.clone();

        self.ledger.create(record).await.map_err(dependency)?;
        let upload_url = self
            .store
            .sign_put(&audio_key(name), &job_id)
            .await
            .map_err(dependency)?;

        Ok(Admission { job_id, upload_url })
    }
}

fn dependency(err: StoreError) -> ServiceError {
    ServiceError::Dependency(err.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::job::JobStatus;
    use crate::store::memory::{MemoryCapabilityStore, MemoryLedger};

    fn backends() -> (MemoryLedger, MemoryCapabilityStore) {
        (MemoryLedger::new(), MemoryCapabilityStore::new("audio-bucket", 3600))
    }

    #[tokio::test]
    async fn admit_creates_uploading_record() {
        let (ledger, store) = backends();
        let service = AdmissionService::new(&ledger, &store, 3600);

        let admission = service.admit("sample.wav").await.unwrap();
        let record = ledger.get(&admission.job_id).await.unwrap();
        assert_eq!(record.status, JobStatus::Uploading);
        assert_eq!(record.source_name, "sample.wav");
        assert!(admission.upload_url.contains("audio/sample.wav"));
        assert!(admission.upload_url.contains(&admission.job_id));
    }

    #[tokio::test]
    async fn admit_issues_fresh_job_ids() {
        let (ledger, store) = backends();
        let service = AdmissionService::new(&ledger, &store, 3600);

        let a = service.admit("sample.wav").await.unwrap();
        let b = service.admit("sample.wav").await.unwrap();
        assert_ne!(a.job_id, b.job_id);
    }

    #[tokio::test]
    async fn admit_rejects_empty_name() {
        let (ledger, store) = backends();
        let service = AdmissionService::new(&ledger, &store, 3600);

        let err = service.admit("   ").await.unwrap_err();
        assert!(matches!(err, ServiceError::Validation(_)));
        assert_eq!(err.status_code(), 400);
    }
}
