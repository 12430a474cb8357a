//! Wire types for the HTTP front end.
//!
//! Field names are camelCase on the wire, matching the deployed gateway.
//! The same shapes are produced by the service layer and consumed by the
//! polling client.

use serde::{Deserialize, Serialize};

use crate::error::ServiceError;
use crate::job::JobStatus;
use crate::status::StatusReport;

/// Request body for `POST /upload`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadRequest {
    pub file_name: String,
}

/// Response body for a successful admission.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadResponse {
    pub job_id: String,
    pub upload_url: String,
}

/// Response body for `GET /status/{jobId}`.
///
/// `download_url` is present exactly when `status` is `COMPLETED`; `error`
/// carries the worker's failure summary when `status` is `FAILED`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusBody {
    pub status: JobStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub download_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl From<StatusReport> for StatusBody {
    fn from(report: StatusReport) -> Self {
        Self {
            status: report.status,
            download_url: report.result_url,
            error: report.error,
        }
    }
}

/// Structured error body returned with a 4xx/5xx status.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

impl ErrorBody {
    /// Convert a service-boundary error into its wire form plus the
    /// HTTP-style status code.
    pub fn from_service(err: &ServiceError) -> (u16, Self) {
        (
            err.status_code(),
            Self {
                error: err.to_string(),
            },
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn upload_request_uses_camel_case() {
        let req = UploadRequest {
            file_name: "sample.wav".into(),
        };
        let json = serde_json::to_string(&req).unwrap();
        assert_eq!(json, r#"{"fileName":"sample.wav"}"#);
    }

    #[test]
    fn upload_response_roundtrip() {
        let json = r#"{"jobId":"j-1","uploadUrl":"https://store/audio/sample.wav?sig=x"}"#;
        let resp: UploadResponse = serde_json::from_str(json).unwrap();
        assert_eq!(resp.job_id, "j-1");
        assert!(resp.upload_url.contains("audio/sample.wav"));
    }

    #[test]
    fn status_body_omits_absent_fields() {
        let body = StatusBody {
            status: JobStatus::Processing,
            download_url: None,
            error: None,
        };
        assert_eq!(
            serde_json::to_string(&body).unwrap(),
            r#"{"status":"PROCESSING"}"#
        );
    }

    #[test]
    fn completed_status_body_from_api_format() {
        let json = r#"{"status":"COMPLETED","downloadUrl":"https://store/transcripts/a.txt?sig=y"}"#;
        let body: StatusBody = serde_json::from_str(json).unwrap();
        assert_eq!(body.status, JobStatus::Completed);
        assert!(body.download_url.is_some());
        assert!(body.error.is_none());
    }

    #[test]
    fn status_body_from_report() {
        let report = StatusReport {
            status: JobStatus::Completed,
            result_url: Some("https://store/transcripts/a.txt?sig=y".into()),
            error: None,
        };
        let body = StatusBody::from(report);
        assert_eq!(body.status, JobStatus::Completed);
        assert_eq!(
            body.download_url.as_deref(),
            Some("https://store/transcripts/a.txt?sig=y")
        );
    }

    #[test]
    fn error_body_from_service_error() {
        let (code, body) = ErrorBody::from_service(&ServiceError::NotFound("j-9".into()));
        assert_eq!(code, 404);
        assert_eq!(body.error, "job not found: j-9");
    }
}
