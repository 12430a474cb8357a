//! In-memory capability store and job ledger.
//!
//! Single-process backends used by the test suite and the `demo` command.
//! Capability URLs are fake (`memory://` scheme) but carry the same
//! information a signed URL would: operation, key, job tag and expiry.

use std::collections::HashMap;
use std::sync::RwLock;

use chrono::{Duration, Utc};

use super::{AdvanceOutcome, CapabilityStore, JobLedger, StoreError};
use crate::job::{JobRecord, JobStatus};
use crate::keys::JOB_ID_TAG;

#[derive(Debug, Clone)]
struct StoredObject {
    bytes: Vec<u8>,
    content_type: String,
    tags: HashMap<String, String>,
}

/// In-memory object store with tag metadata and `memory://` capability URLs.
#[derive(Debug)]
pub struct MemoryCapabilityStore {
    bucket: String,
    url_ttl_secs: i64,
    objects: RwLock<HashMap<String, StoredObject>>,
}

impl MemoryCapabilityStore {
    pub fn new(bucket: &str, url_ttl_secs: i64) -> Self {
        Self {
            bucket: bucket.to_string(),
            url_ttl_secs,
            objects: RwLock::new(HashMap::new()),
        }
    }

    pub fn bucket(&self) -> &str {
        &self.bucket
    }

    fn sign(&self, op: &str, key: &str, job_id: Option<&str>) -> String {
        let expires = (Utc::now() + Duration::seconds(self.url_ttl_secs)).timestamp();
        match job_id {
            Some(id) => format!(
                "memory://{}/{key}?op={op}&{JOB_ID_TAG}={id}&expires={expires}",
                self.bucket
            ),
            None => format!("memory://{}/{key}?op={op}&expires={expires}", self.bucket),
        }
    }

    /// Simulate a client PUT against a capability URL minted by
    /// [`CapabilityStore::sign_put`]: stores the bytes under the signed key
    /// and applies the job tag embedded in the URL. Returns the object key.
    pub fn accept_upload(&self, url: &str, bytes: Vec<u8>) -> Result<String, StoreError> {
        let stripped = url
            .strip_prefix(&format!("memory://{}/", self.bucket))
            .ok_or_else(|| StoreError::Unavailable(format!("foreign url: {url}")))?;
        let (key, query) = stripped
            .split_once('?')
            .ok_or_else(|| StoreError::Unavailable(format!("unsigned url: {url}")))?;

        let mut tags = HashMap::new();
        for pair in query.split('&') {
            if let Some((k, v)) = pair.split_once('=')
                && k == JOB_ID_TAG
            {
                tags.insert(JOB_ID_TAG.to_string(), v.to_string());
            }
        }

        let mut objects = self
            .objects
            .write()
            .map_err(|_| StoreError::Unavailable("object lock poisoned".into()))?;
        objects.insert(
            key.to_string(),
            StoredObject {
                bytes,
                content_type: "application/octet-stream".into(),
                tags,
            },
        );
        Ok(key.to_string())
    }
}

impl CapabilityStore for MemoryCapabilityStore {
    async fn put(
        &self,
        key: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<(), StoreError> {
        let mut objects = self
            .objects
            .write()
            .map_err(|_| StoreError::Unavailable("object lock poisoned".into()))?;
        objects.insert(
            key.to_string(),
            StoredObject {
                bytes,
                content_type: content_type.to_string(),
                tags: HashMap::new(),
            },
        );
        Ok(())
    }

    async fn get(&self, key: &str) -> Result<Vec<u8>, StoreError> {
        let objects = self
            .objects
            .read()
            .map_err(|_| StoreError::Unavailable("object lock poisoned".into()))?;
        objects
            .get(key)
            .map(|o| o.bytes.clone())
            .ok_or_else(|| StoreError::NotFound(key.to_string()))
    }

    async fn get_tags(&self, key: &str) -> Result<HashMap<String, String>, StoreError> {
        let objects = self
            .objects
            .read()
            .map_err(|_| StoreError::Unavailable("object lock poisoned".into()))?;
        objects
            .get(key)
            .map(|o| o.tags.clone())
            .ok_or_else(|| StoreError::NotFound(key.to_string()))
    }

    async fn sign_put(&self, key: &str, job_id: &str) -> Result<String, StoreError> {
        Ok(self.sign("put", key, Some(job_id)))
    }

    async fn sign_get(&self, key: &str) -> Result<String, StoreError> {
        Ok(self.sign("get", key, None))
    }
}

/// In-memory job ledger with atomic per-record updates.
#[derive(Debug, Default)]
pub struct MemoryLedger {
    records: RwLock<HashMap<String, JobRecord>>,
}

impl MemoryLedger {
    pub fn new() -> Self {
        Self::default()
    }
}

impl JobLedger for MemoryLedger {
    async fn create(&self, record: JobRecord) -> Result<(), StoreError> {
        let mut records = self
            .records
            .write()
            .map_err(|_| StoreError::Unavailable("ledger lock poisoned".into()))?;
        records.insert(record.job_id.clone(), record);
        Ok(())
    }

    async fn get(&self, job_id: &str) -> Result<JobRecord, StoreError> {
        let records = self
            .records
            .read()
            .map_err(|_| StoreError::Unavailable("ledger lock poisoned".into()))?;
        records
            .get(job_id)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(job_id.to_string()))
    }

    async fn advance(
        &self,
        job_id: &str,
        next: JobStatus,
    ) -> Result<AdvanceOutcome, StoreError> {
        let mut records = self
            .records
            .write()
            .map_err(|_| StoreError::Unavailable("ledger lock poisoned".into()))?;
        let record = records
            .get_mut(job_id)
            .ok_or_else(|| StoreError::NotFound(job_id.to_string()))?;

        if record.status == next && next != JobStatus::Processing {
            return Ok(AdvanceOutcome::AlreadyThere);
        }
        if record.status.accepts(next) {
            let repeat = record.status == next;
            record.status = next;
            Ok(if repeat {
                AdvanceOutcome::AlreadyThere
            } else {
                AdvanceOutcome::Advanced
            })
        } else {
            Ok(AdvanceOutcome::Refused {
                current: record.status,
            })
        }
    }

    async fn record_result_url(&self, job_id: &str, url: &str) -> Result<(), StoreError> {
        let mut records = self
            .records
            .write()
            .map_err(|_| StoreError::Unavailable("ledger lock poisoned".into()))?;
        let record = records
            .get_mut(job_id)
            .ok_or_else(|| StoreError::NotFound(job_id.to_string()))?;
        // First write wins; the URL is immutable for the life of the record.
        if record.result_url.is_none() {
            record.result_url = Some(url.to_string());
        }
        Ok(())
    }

    async fn record_error(&self, job_id: &str, message: &str) -> Result<(), StoreError> {
        let mut records = self
            .records
            .write()
            .map_err(|_| StoreError::Unavailable("ledger lock poisoned".into()))?;
        let record = records
            .get_mut(job_id)
            .ok_or_else(|| StoreError::NotFound(job_id.to_string()))?;
        record.error = Some(message.to_string());
        Ok(())
    }
}
