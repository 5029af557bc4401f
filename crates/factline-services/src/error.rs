//! Stage error types and their HTTP mapping.
//!
//! Every failure a stage can reply with is a [`StageError`]. Its
//! [`IntoResponse`] impl picks the status code and [`ErrorKind`], logs the
//! internal detail under a fresh correlation id, and sends only the kind,
//! a fixed message and the id to the caller.

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;
use tracing::{error, warn};

use factline_core::ValidationError;
use factline_llm::InferenceError;
use factline_types::{ErrorBody, ErrorKind};

use crate::stage_client::StageClientError;

/// A failed call to something downstream of a stage.
#[derive(Error, Debug)]
pub enum UpstreamError {
    #[error("model: {0}")]
    Model(#[from] InferenceError),

    #[error("stage: {0}")]
    Stage(#[from] StageClientError),
}

impl UpstreamError {
    fn status(&self) -> StatusCode {
        match self {
            Self::Model(InferenceError::RateLimited { .. })
            | Self::Stage(StageClientError::Status { status: 429, .. }) => {
                StatusCode::TOO_MANY_REQUESTS
            }
            Self::Model(InferenceError::ConnectionRefused(_))
            | Self::Model(InferenceError::ModelNotFound(_))
            | Self::Stage(StageClientError::ConnectionRefused(_)) => {
                StatusCode::SERVICE_UNAVAILABLE
            }
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Errors a stage replies with.
#[derive(Error, Debug)]
pub enum StageError {
    /// The request body or one of its fields was rejected.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// The caller's request window is full.
    #[error("rate limit exceeded")]
    RateLimited,

    /// The model endpoint or the next stage failed.
    #[error("upstream failure: {0}")]
    Upstream(#[from] UpstreamError),

    /// The Classifier failed behind the Gateway. Always 500, whatever the
    /// cause.
    #[error("relay failure: {0}")]
    Relay(StageClientError),

    /// A fault inside the stage itself.
    #[error("internal error: {0}")]
    Internal(String),
}

impl StageError {
    /// HTTP status and wire kind for this error.
    pub fn classify(&self) -> (StatusCode, ErrorKind) {
        match self {
            Self::InvalidInput(_) => (StatusCode::BAD_REQUEST, ErrorKind::InvalidInput),
            Self::RateLimited => (StatusCode::TOO_MANY_REQUESTS, ErrorKind::RateLimited),
            Self::Upstream(upstream) => {
                let status = upstream.status();
                let kind = if status == StatusCode::TOO_MANY_REQUESTS {
                    ErrorKind::RateLimited
                } else {
                    ErrorKind::UpstreamUnavailable
                };
                (status, kind)
            }
            Self::Relay(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorKind::UpstreamUnavailable,
            ),
            Self::Internal(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorKind::InternalUnhandled,
            ),
        }
    }

    /// Message sent to the caller. Only validation messages carry detail.
    fn public_message(&self, kind: ErrorKind) -> String {
        match (self, kind) {
            (Self::InvalidInput(detail), _) => detail.clone(),
            (_, ErrorKind::RateLimited) => "too many requests, try again later".into(),
            (_, ErrorKind::UpstreamUnavailable) => "the request could not be processed".into(),
            _ => "something went wrong".into(),
        }
    }
}

impl From<ValidationError> for StageError {
    fn from(err: ValidationError) -> Self {
        Self::InvalidInput(err.to_string())
    }
}

impl From<JsonRejection> for StageError {
    fn from(rejection: JsonRejection) -> Self {
        Self::InvalidInput(rejection.body_text())
    }
}

impl From<InferenceError> for StageError {
    fn from(err: InferenceError) -> Self {
        Self::Upstream(err.into())
    }
}

impl From<StageClientError> for StageError {
    fn from(err: StageClientError) -> Self {
        Self::Upstream(err.into())
    }
}

impl IntoResponse for StageError {
    fn into_response(self) -> Response {
        let (status, kind) = self.classify();
        let mut body = ErrorBody::new(kind, self.public_message(kind));

        if status.is_server_error() {
            let id = uuid::Uuid::new_v4().to_string();
            error!(id = %id, status = status.as_u16(), kind = %kind, error = %self, "request failed");
            body = body.with_id(id);
        } else {
            warn!(status = status.as_u16(), kind = %kind, error = %self, "request rejected");
        }

        (status, Json(body)).into_response()
    }
}

/// Reply for a request that panicked inside a handler.
pub fn panic_response(panic: Box<dyn std::any::Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = panic.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "unknown panic".to_string()
    };
    StageError::Internal(detail).into_response()
}
