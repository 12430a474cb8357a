use thiserror::Error;

use crate::api::ApiError;

/// Failures raised at the service boundary (admission, status query).
///
/// Each variant maps to a structured response with an HTTP-style status
/// code; no storage or ledger error crosses the boundary unconverted.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// Bad caller input. Never retried.
    #[error("validation error: {0}")]
    Validation(String),

    /// The job (or its ledger record) does not exist. Terminal for the
    /// caller — indistinguishable from "never existed".
    #[error("job not found: {0}")]
    NotFound(String),

    /// The ledger or capability store is unreachable. Surfaced to the
    /// caller; the service layer does not retry internally.
    #[error("dependency error: {0}")]
    Dependency(String),
}

impl ServiceError {
    /// HTTP-style status code used when converting the error to a wire
    /// response.
    pub fn status_code(&self) -> u16 {
        match self {
            ServiceError::Validation(_) => 400,
            ServiceError::NotFound(_) => 404,
            ServiceError::Dependency(_) => 502,
        }
    }
}

/// Top-level error for the binary surface.
#[derive(Debug, Error)]
pub enum ScrivanoError {
    #[error("Config error: {0}")]
    Config(String),

    #[error("API error: {0}")]
    Api(#[from] ApiError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
}
