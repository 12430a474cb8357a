//! Processing Trigger & Worker.
//!
//! Invoked once per storage notification batch. Each record is handled
//! independently: the owning job is recovered from the object's tags, the
//! ledger is advanced to `PROCESSING` before any work, and the transcript
//! is written before the terminal transition. Outcomes are explicit values,
//! never errors propagated past the worker boundary — redelivery policy
//! belongs to the invoking infrastructure.

use serde::{Deserialize, Serialize};

use crate::job::JobStatus;
use crate::keys::{JOB_ID_TAG, transcript_key};
use crate::store::{AdvanceOutcome, CapabilityStore, JobLedger};
use crate::transcribe::{ProcessingError, Transcriber};

/// A batch of object-creation notifications, as delivered by the store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventBatch {
    pub records: Vec<ObjectRecord>,
}

/// One object-creation notification.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObjectRecord {
    pub bucket: String,
    pub key: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,
}

/// Per-record result of a worker invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordOutcome {
    /// Transcript written and the job advanced to `COMPLETED`.
    Completed { job_id: String, output_key: String },
    /// Transformation failed; the job is `FAILED` with the reason recorded.
    Failed { job_id: String, reason: String },
    /// The object carries no job tag. No ledger record was touched.
    Untagged { key: String },
    /// Redelivered trigger for a job already in a terminal state. No-op.
    Duplicate { job_id: String, current: JobStatus },
    /// The record could not be processed and no failure could be recorded
    /// (tags unreadable, ledger record missing or unreachable).
    Skipped { key: String, reason: String },
}

pub struct Worker<'a, L, C, T> {
    ledger: &'a L,
    store: &'a C,
    transcriber: &'a T,
}

impl<'a, L, C, T> Worker<'a, L, C, T>
where
    L: JobLedger,
    C: CapabilityStore,
    T: Transcriber,
{
    pub fn new(ledger: &'a L, store: &'a C, transcriber: &'a T) -> Self {
        Self {
            ledger,
            store,
            transcriber,
        }
    }

    /// Process every record in the batch. One record's failure never blocks
    /// the others.
    pub async fn handle_batch(&self, batch: &EventBatch) -> Vec<RecordOutcome> {
        let mut outcomes = Vec::with_capacity(batch.records.len());
        for record in &batch.records {
            outcomes.push(self.handle_record(record).await);
        }
        outcomes
    }

    async fn handle_record(&self, record: &ObjectRecord) -> RecordOutcome {
        let tags = match self.store.get_tags(&record.key).await {
            Ok(tags) => tags,
            Err(err) => {
                return RecordOutcome::Skipped {
                    key: record.key.clone(),
                    reason: err.to_string(),
                };
            }
        };

        // Without the tag there is no job to update; fatal for this record
        // only.
        let Some(job_id) = tags.get(JOB_ID_TAG).cloned() else {
            return RecordOutcome::Untagged {
                key: record.key.clone(),
            };
        };

        // Take ownership before any potentially-long work, so a crash
        // mid-transcription is observably distinct from "never started".
        match self.ledger.advance(&job_id, JobStatus::Processing).await {
            Ok(AdvanceOutcome::Advanced | AdvanceOutcome::AlreadyThere) => {}
            Ok(AdvanceOutcome::Refused { current }) => {
                // At-least-once delivery: the job already ran to a terminal
                // state, so this redelivery must not re-process.
                return RecordOutcome::Duplicate { job_id, current };
            }
            Err(err) => {
                return RecordOutcome::Skipped {
                    key: record.key.clone(),
                    reason: err.to_string(),
                };
            }
        }

        match self.transcribe_object(record).await {
            Ok(output_key) => {
                match self.ledger.advance(&job_id, JobStatus::Completed).await {
                    Ok(AdvanceOutcome::Refused { current }) => {
                        RecordOutcome::Duplicate { job_id, current }
                    }
                    Ok(_) => RecordOutcome::Completed { job_id, output_key },
                    Err(err) => RecordOutcome::Skipped {
                        key: record.key.clone(),
                        reason: err.to_string(),
                    },
                }
            }
            Err(reason) => self.record_failure(&job_id, &record.key, reason).await,
        }
    }

    /// Fetch, transcribe and write the result object, returning the output
    /// key. Every step folds into one explicit failure value.
    async fn transcribe_object(
        &self,
        record: &ObjectRecord,
    ) -> Result<String, ProcessingError> {
        let audio = self
            .store
            .get(&record.key)
            .await
            .map_err(|err| ProcessingError(format!("fetch {}: {err}", record.key)))?;

        let text = self.transcriber.transcribe(&audio).await?;

        let output_key = transcript_key(&record.key);
        self.store
            .put(&output_key, text.into_bytes(), "text/plain")
            .await
            .map_err(|err| ProcessingError(format!("write {output_key}: {err}")))?;

        Ok(output_key)
    }

    /// Advance to `Failed` first, then record the summary: if the advance
    /// is refused the record is already terminal and must not be mutated.
    async fn record_failure(
        &self,
        job_id: &str,
        key: &str,
        reason: ProcessingError,
    ) -> RecordOutcome {
        match self.ledger.advance(job_id, JobStatus::Failed).await {
            Ok(AdvanceOutcome::Refused { current }) => RecordOutcome::Duplicate {
                job_id: job_id.to_string(),
                current,
            },
            Ok(_) => {
                if let Err(err) = self.ledger.record_error(job_id, &reason.0).await {
                    return RecordOutcome::Skipped {
                        key: key.to_string(),
                        reason: err.to_string(),
                    };
                }
                RecordOutcome::Failed {
                    job_id: job_id.to_string(),
                    reason: reason.0,
                }
            }
            Err(err) => RecordOutcome::Skipped {
                key: key.to_string(),
                reason: err.to_string(),
            },
        }
    }
}
