use thiserror::Error;

/// Errors produced by the HTTP front end, as seen by the client.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The server does not know the job — it expired or never existed.
    #[error("job not found")]
    NotFound,

    /// Any other HTTP error (4xx/5xx) with the body's error message.
    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    /// Underlying network failure (DNS, refused connection, timeout).
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),
}

impl ApiError {
    /// Whether a single polling attempt may be retried after this error.
    ///
    /// `NotFound` is terminal for the caller; everything else is treated
    /// as transient within the attempt budget.
    pub fn is_transient(&self) -> bool {
        !matches!(self, ApiError::NotFound)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_error_display() {
        let err = ApiError::Api {
            status: 502,
            message: "dependency error".into(),
        };
        assert_eq!(err.to_string(), "API error (status 502): dependency error");
    }

    #[test]
    fn not_found_is_terminal() {
        assert!(!ApiError::NotFound.is_transient());
        assert!(
            ApiError::Api {
                status: 500,
                message: "boom".into()
            }
            .is_transient()
        );
    }

    #[test]
    fn error_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<ApiError>();
    }
}
