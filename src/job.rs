use std::fmt;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Lifecycle status of a transcription job.
///
/// Every job flows through `UPLOADING → PROCESSING → COMPLETED` or
/// `UPLOADING → PROCESSING → FAILED`. The two terminal states admit no
/// further transitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum JobStatus {
    Uploading,
    Processing,
    Completed,
    Failed,
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            JobStatus::Uploading => write!(f, "UPLOADING"),
            JobStatus::Processing => write!(f, "PROCESSING"),
            JobStatus::Completed => write!(f, "COMPLETED"),
            JobStatus::Failed => write!(f, "FAILED"),
        }
    }
}

impl JobStatus {
    /// Whether no further transitions can occur from this status.
    pub fn is_terminal(self) -> bool {
        matches!(self, JobStatus::Completed | JobStatus::Failed)
    }

    /// The monotonic transition relation.
    ///
    /// `Processing → Processing` is allowed so that a redelivered storage
    /// trigger taking ownership a second time is not an error. Terminal
    /// states accept nothing.
    pub fn accepts(self, next: JobStatus) -> bool {
        match (self, next) {
            (JobStatus::Uploading, JobStatus::Processing) => true,
            (JobStatus::Processing, JobStatus::Processing) => true,
            (JobStatus::Processing, JobStatus::Completed) => true,
            (JobStatus::Processing, JobStatus::Failed) => true,
            _ => false,
        }
    }
}

/// The durable ledger record for a single job — the source of truth for
/// job state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobRecord {
    pub job_id: String,
    /// Logical name of the submitted artifact; storage keys derive from it.
    pub source_name: String,
    pub status: JobStatus,
    /// Cached read capability for the transcript. Written once, on the
    /// first status query that observes `Completed`.
    pub result_url: Option<String>,
    /// Failure summary recorded by the worker when the job fails.
    pub error: Option<String>,
    pub created_at: DateTime<Utc>,
    /// After this instant the store may garbage-collect the record.
    pub expires_at: DateTime<Utc>,
}

impl JobRecord {
    /// Create a fresh record in the initial `Uploading` state with a new
    /// unique job id.
    pub fn new(source_name: String, ttl_secs: i64) -> Self {
        let now = Utc::now();
        Self {
            job_id: Uuid::new_v4().to_string(),
            source_name,
            status: JobStatus::Uploading,
            result_url: None,
            error: None,
            created_at: now,
            expires_at: now + Duration::seconds(ttl_secs),
        }
    }
}
