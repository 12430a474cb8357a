//! Storage abstractions the services are built against.
//!
//! The orchestration layer never talks to a concrete backend directly: it
//! receives a [`CapabilityStore`] and a [`JobLedger`] by reference, so tests
//! and the `demo` command can substitute the in-memory implementations from
//! [`memory`].

pub mod memory;

use std::collections::HashMap;

use thiserror::Error;

use crate::job::{JobRecord, JobStatus};

/// Failures surfaced by a storage backend.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The requested object or ledger record does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// The backend is unreachable or rejected the operation.
    #[error("unavailable: {0}")]
    Unavailable(String),
}

/// Durable object storage with tag metadata and capability-URL issuance.
///
/// Capability URLs are time-limited and signature-bound to a single
/// operation on a single key, so clients can upload and download without
/// routing bytes through the orchestrator.
pub trait CapabilityStore {
    async fn put(
        &self,
        key: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<(), StoreError>;

    async fn get(&self, key: &str) -> Result<Vec<u8>, StoreError>;

    /// Tag metadata attached to an object.
    async fn get_tags(&self, key: &str) -> Result<HashMap<String, String>, StoreError>;

    /// Mint a write-scoped capability URL for `key`. The uploaded object is
    /// tagged with `job_id` so the storage trigger can recover ownership.
    async fn sign_put(&self, key: &str, job_id: &str) -> Result<String, StoreError>;

    /// Mint a read-scoped capability URL for `key`.
    async fn sign_get(&self, key: &str) -> Result<String, StoreError>;
}

/// Result of a conditional status advance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdvanceOutcome {
    /// The transition was applied.
    Advanced,
    /// The record was already in the requested status; nothing changed.
    AlreadyThere,
    /// The transition relation forbids the move from the current status.
    /// Nothing changed.
    Refused { current: JobStatus },
}

/// Durable key-value record of job state, keyed by job id.
///
/// Per-job consistency relies on the ledger's atomic single-record update;
/// there is no cross-job locking anywhere in the system.
pub trait JobLedger {
    /// Persist a freshly admitted record.
    async fn create(&self, record: JobRecord) -> Result<(), StoreError>;

    /// Fetch a record. A missing record is `StoreError::NotFound`.
    async fn get(&self, job_id: &str) -> Result<JobRecord, StoreError>;

    /// Compare-and-set the status against the transition relation
    /// ([`JobStatus::accepts`]). Duplicate or out-of-order trigger delivery
    /// surfaces as `AlreadyThere` / `Refused` rather than corrupting state.
    async fn advance(
        &self,
        job_id: &str,
        next: JobStatus,
    ) -> Result<AdvanceOutcome, StoreError>;

    /// Cache the transcript capability URL on the record. Best-effort from
    /// the caller's point of view; the URL is immutable once written.
    async fn record_result_url(&self, job_id: &str, url: &str) -> Result<(), StoreError>;

    /// Record a failure summary produced by the worker.
    async fn record_error(&self, job_id: &str, message: &str) -> Result<(), StoreError>;
}
