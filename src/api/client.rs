use std::time::Duration;

use reqwest::Client;

use super::error::ApiError;
use super::types::{StatusBody, UploadRequest, UploadResponse};

pub struct ApiClient {
    client: Client,
    base_url: String,
}

impl ApiClient {
    /// Create a client pointing at the deployed API base URL
    /// (e.g. `https://.../dev`). Also used by tests against a mock server.
    pub fn new(base_url: String) -> Result<Self, ApiError> {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(10))
            .timeout(Duration::from_secs(30))
            .build()?;
        Ok(Self { client, base_url })
    }

    /// `POST /upload` — admit a job for the named artifact.
    pub async fn admit(&self, file_name: &str) -> Result<UploadResponse, ApiError> {
        let response = self
            .client
            .post(format!("{}/upload", self.base_url))
            .json(&UploadRequest {
                file_name: file_name.to_string(),
            })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(Self::error_from(status.as_u16(), response).await);
        }
        Ok(response.json::<UploadResponse>().await?)
    }

    /// `GET /status/{jobId}` — resolve the current job status.
    pub async fn status(&self, job_id: &str) -> Result<StatusBody, ApiError> {
        let response = self
            .client
            .get(format!("{}/status/{job_id}", self.base_url))
            .send()
            .await?;

        let status = response.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(ApiError::NotFound);
        }
        if !status.is_success() {
            return Err(Self::error_from(status.as_u16(), response).await);
        }
        Ok(response.json::<StatusBody>().await?)
    }

    async fn error_from(status: u16, response: reqwest::Response) -> ApiError {
        let message = response
            .text()
            .await
            .unwrap_or_else(|_| "unknown error".to_string());
        ApiError::Api { status, message }
    }
}
