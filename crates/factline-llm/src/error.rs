//! Inference error types.
//!
//! All client operations return [`Result<T>`] with [`InferenceError`].
//! Callers match on the variant to decide the HTTP status they report.

use thiserror::Error;

/// Errors that can occur when calling the model endpoint.
#[derive(Error, Debug)]
pub enum InferenceError {
    /// The request exceeded the configured timeout.
    #[error("timeout")]
    Timeout,

    /// The endpoint could not be reached.
    #[error("connection refused: {0}")]
    ConnectionRefused(String),

    /// The endpoint is throttling (HTTP 429).
    #[error("rate limited: retry after {retry_after_ms}ms")]
    RateLimited {
        /// Suggested wait before retrying, in milliseconds.
        retry_after_ms: u64,
    },

    /// The requested model is not loaded on the endpoint (HTTP 404).
    #[error("model not found: {0}")]
    ModelNotFound(String),

    /// The reply body was not valid JSON.
    #[error("malformed response: {0}")]
    MalformedResponse(String),

    /// Any other non-2xx status.
    #[error("HTTP {status}: {body}")]
    Status {
        status: u16,
        body: String,
    },

    /// Client construction or another transport-level failure.
    #[error("inference failed: {0}")]
    Other(String),
}

impl From<reqwest::Error> for InferenceError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout
        } else if err.is_connect() {
            Self::ConnectionRefused(err.to_string())
        } else if err.is_decode() {
            Self::MalformedResponse(err.to_string())
        } else {
            Self::Other(err.to_string())
        }
    }
}

impl From<serde_json::Error> for InferenceError {
    fn from(err: serde_json::Error) -> Self {
        Self::MalformedResponse(err.to_string())
    }
}

/// A convenience type alias for inference operations.
pub type Result<T> = std::result::Result<T, InferenceError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_timeout() {
        assert_eq!(InferenceError::Timeout.to_string(), "timeout");
    }

    #[test]
    fn display_connection_refused() {
        let err = InferenceError::ConnectionRefused("tcp connect error".into());
        assert_eq!(err.to_string(), "connection refused: tcp connect error");
    }

    #[test]
    fn display_rate_limited() {
        let err = InferenceError::RateLimited {
            retry_after_ms: 2000,
        };
        assert_eq!(err.to_string(), "rate limited: retry after 2000ms");
    }

    #[test]
    fn display_status() {
        let err = InferenceError::Status {
            status: 500,
            body: "model requires more system memory".into(),
        };
        assert_eq!(err.to_string(), "HTTP 500: model requires more system memory");
    }

    #[test]
    fn json_error_is_malformed_response() {
        let serde_err = serde_json::from_str::<serde_json::Value>("not json").unwrap_err();
        let err: InferenceError = serde_err.into();
        assert!(matches!(err, InferenceError::MalformedResponse(_)));
    }
}
