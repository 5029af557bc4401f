//! JSON client for calling the next stage in the pipeline.

use std::time::Duration;

use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::debug;

use factline_types::{ClassificationRequest, ErrorBody, PipelineResult, SummaryRequest};

/// Failure calling a downstream stage.
#[derive(Error, Debug)]
pub enum StageClientError {
    /// The stage did not answer within the configured timeout.
    #[error("stage request timed out")]
    Timeout,

    /// No connection could be established.
    #[error("stage unreachable: {0}")]
    ConnectionRefused(String),

    /// The stage answered with a non-2xx status. `error` holds its error
    /// body when it sent one.
    #[error("stage returned HTTP {status}")]
    Status {
        status: u16,
        error: Option<ErrorBody>,
    },

    /// The stage answered 2xx with a body that does not decode.
    #[error("malformed stage response: {0}")]
    MalformedResponse(String),

    #[error("{0}")]
    Other(String),
}

impl From<reqwest::Error> for StageClientError {
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

pub type Result<T> = std::result::Result<T, StageClientError>;

/// Client for one downstream stage, bound by the shared timeout.
#[derive(Debug, Clone)]
pub struct StageClient {
    base_url: String,
    http: reqwest::Client,
}

impl StageClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("factline/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| StageClientError::Other(format!("failed to build HTTP client: {e}")))?;
        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            http,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// POST `/classify` on a Classifier stage.
    pub async fn classify(&self, request: &ClassificationRequest) -> Result<PipelineResult> {
        self.post_json("/classify", request).await
    }

    /// POST `/summarize` on a Summarizer stage.
    pub async fn summarize(&self, request: &SummaryRequest) -> Result<PipelineResult> {
        self.post_json("/summarize", request).await
    }

    async fn post_json<B, R>(&self, path: &str, body: &B) -> Result<R>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let url = format!("{}{path}", self.base_url);
        debug!(endpoint = %url, "forwarding to stage");

        let response = self.http.post(&url).json(body).send().await?;
        let status = response.status();
        let bytes = response.bytes().await?;

        if !status.is_success() {
            return Err(StageClientError::Status {
                status: status.as_u16(),
                error: serde_json::from_slice(&bytes).ok(),
            });
        }

        serde_json::from_slice(&bytes)
            .map_err(|e| StageClientError::MalformedResponse(e.to_string()))
    }
}
