//! The delegated transformation boundary.
//!
//! The actual speech-to-text engine lives outside this crate; the worker
//! only needs something that turns audio bytes into text or a failure
//! reason.

use thiserror::Error;

/// Failure during the delegated transformation. Recorded into the job as
/// `FAILED`; never raised past the worker boundary.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{0}")]
pub struct ProcessingError(pub String);

/// Turns an audio artifact into transcript text.
pub trait Transcriber {
    async fn transcribe(&self, audio: &[u8]) -> Result<String, ProcessingError>;
}

/// Deterministic stand-in engine used by tests and the `demo` command.
///
/// Produces a one-line summary of the input instead of real speech
/// recognition; rejects empty input so failure paths are exercisable.
#[derive(Debug, Default)]
pub struct EchoTranscriber;

impl Transcriber for EchoTranscriber {
    async fn transcribe(&self, audio: &[u8]) -> Result<String, ProcessingError> {
        if audio.is_empty() {
            return Err(ProcessingError("empty audio artifact".into()));
        }
        Ok(format!("[transcript of {} bytes of audio]", audio.len()))
    }
}
