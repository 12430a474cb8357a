//! Object-key conventions shared by admission, status and the worker.
//!
//! The result key is derived deterministically from the source key so that
//! the status service can mint a read capability for the transcript without
//! the ledger having to record the output path.

/// Tag key carrying the owning job id on uploaded objects.
pub const JOB_ID_TAG: &str = "jobId";

/// Prefix under which clients upload audio artifacts.
pub const AUDIO_PREFIX: &str = "audio/";

/// Prefix under which the worker writes transcripts.
pub const TRANSCRIPT_PREFIX: &str = "transcripts/";

/// Storage key for an uploaded artifact with the given logical name.
pub fn audio_key(name: &str) -> String {
    format!("{AUDIO_PREFIX}{name}")
}

/// Storage key of the transcript produced for the given source key.
///
/// Same base name as the source object, fixed `.txt` suffix, under the
/// transcript prefix.
pub fn transcript_key(source_key: &str) -> String {
    let file_name = source_key.rsplit('/').next().unwrap_or(source_key);
    format!("{TRANSCRIPT_PREFIX}{file_name}.txt")
}
