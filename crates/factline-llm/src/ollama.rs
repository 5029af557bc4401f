//! HTTP client for an Ollama-style `/api/chat` endpoint.

use std::time::Duration;

use async_trait::async_trait;
use tracing::{debug, warn};

use factline_types::config::ModelConfig;

use crate::error::{InferenceError, Result};
use crate::provider::InferenceProvider;
use crate::types::{ChatReply, ChatRequest};

/// Model endpoint client with a bounded per-request timeout.
///
/// ```rust,ignore
/// use factline_llm::OllamaClient;
/// use factline_types::config::ModelConfig;
///
/// let config = ModelConfig {
///     base_url: "http://ollama-fake-news:11434".into(),
///     model: "llama3.2:1b".into(),
/// };
/// let client = OllamaClient::new(config, Duration::from_secs(30))?;
/// ```
pub struct OllamaClient {
    config: ModelConfig,
    http: reqwest::Client,
    timeout: Duration,
}

impl OllamaClient {
    /// Create a client whose every request is bounded by `timeout`.
    pub fn new(config: ModelConfig, timeout: Duration) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("factline/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| InferenceError::Other(format!("failed to build HTTP client: {e}")))?;
        Ok(Self {
            config,
            http,
            timeout,
        })
    }

    pub fn config(&self) -> &ModelConfig {
        &self.config
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    fn chat_url(&self) -> String {
        let base = self.config.base_url.trim_end_matches('/');
        format!("{base}/api/chat")
    }
}

#[async_trait]
impl InferenceProvider for OllamaClient {
    fn name(&self) -> &str {
        &self.config.base_url
    }

    fn default_model(&self) -> &str {
        &self.config.model
    }

    async fn chat(&self, request: &ChatRequest) -> Result<ChatReply> {
        let url = self.chat_url();

        debug!(
            endpoint = %url,
            model = %request.model,
            prompt_len = request.messages.iter().map(|m| m.content.len()).sum::<usize>(),
            "sending chat request"
        );

        let response = self.http.post(&url).json(request).send().await?;
        let status = response.status();

        if !status.is_success() {
            if status.as_u16() == 429 {
                let retry_after_ms = parse_retry_after_header(&response).unwrap_or(1000);
                warn!(endpoint = %url, retry_after_ms, "model endpoint rate limited");
                return Err(InferenceError::RateLimited { retry_after_ms });
            }

            let body = response.text().await.unwrap_or_default();

            if status.as_u16() == 404 {
                return Err(InferenceError::ModelNotFound(format!(
                    "model '{}': {}",
                    request.model, body
                )));
            }

            return Err(InferenceError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let bytes = response.bytes().await?;
        let value: serde_json::Value = serde_json::from_slice(&bytes)?;
        let reply = ChatReply::from_json(value);

        debug!(
            endpoint = %url,
            model = reply.model.as_deref().unwrap_or(&request.model),
            has_content = reply.content().is_some(),
            "chat reply received"
        );

        Ok(reply)
    }
}

/// Read a numeric `Retry-After` header (seconds) as milliseconds.
fn parse_retry_after_header(response: &reqwest::Response) -> Option<u64> {
    let value = response
        .headers()
        .get("retry-after")
        .and_then(|v| v.to_str().ok())?;
    let secs = value.trim().parse::<f64>().ok()?;
    Some((secs * 1000.0).max(0.0) as u64)
}

impl std::fmt::Debug for OllamaClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OllamaClient")
            .field("base_url", &self.config.base_url)
            .field("model", &self.config.model)
            .field("timeout", &self.timeout)
            .finish()
    }
}
