//! Configuration schema types.
//!
//! Every field has a default, so an empty JSON object (`{}`) is a valid
//! configuration matching the conventional container deployment. Keys are
//! accepted in both `snake_case` and `camelCase`.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::verdict::LabelSet;

/// Errors raised by [`Config::validate`].
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    /// A field holds a value the pipeline cannot run with.
    #[error("invalid config: {field}: {reason}")]
    Invalid {
        /// Dotted path of the offending field.
        field: String,
        /// What is wrong with it.
        reason: String,
    },
}

fn invalid(field: &str, reason: &str) -> ConfigError {
    ConfigError::Invalid {
        field: field.into(),
        reason: reason.into(),
    }
}

// ── Root config ──────────────────────────────────────────────────────────

/// Root configuration shared by all three stages.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Timeout in seconds for one model call. Stage-to-stage calls get a
    /// multiple of it, see [`Config::hop_timeout`].
    #[serde(default = "default_timeout_secs", alias = "timeoutSecs")]
    pub timeout_secs: u64,

    #[serde(default)]
    pub gateway: GatewayConfig,

    #[serde(default)]
    pub classifier: ClassifierConfig,

    #[serde(default)]
    pub summarizer: SummarizerConfig,
}

fn default_timeout_secs() -> u64 {
    30
}

impl Default for Config {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout_secs(),
            gateway: GatewayConfig::default(),
            classifier: ClassifierConfig::default(),
            summarizer: SummarizerConfig::default(),
        }
    }
}

impl Config {
    /// The timeout for a single model call.
    pub fn timeout(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.timeout_secs)
    }

    /// Timeout for calling a stage that makes `model_calls_below` model
    /// calls before it answers: one [`Config::timeout`] per model call plus
    /// one for the hop itself.
    pub fn hop_timeout(&self, model_calls_below: u32) -> std::time::Duration {
        self.timeout().saturating_mul(model_calls_below.saturating_add(1))
    }

    /// Gateway to Classifier: covers the Classifier's model call and the
    /// Summarizer hop.
    pub fn classifier_hop_timeout(&self) -> std::time::Duration {
        self.hop_timeout(2)
    }

    /// Classifier to Summarizer: covers the Summarizer's model call.
    pub fn summarizer_hop_timeout(&self) -> std::time::Duration {
        self.hop_timeout(1)
    }

    /// Reject values no stage can run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.timeout_secs == 0 {
            return Err(invalid("timeout_secs", "must be greater than zero"));
        }
        if self.gateway.classifier_url.trim().is_empty() {
            return Err(invalid("gateway.classifier_url", "must not be empty"));
        }
        if self.gateway.rate_limit.max_requests == 0 {
            return Err(invalid("gateway.rate_limit.max_requests", "must be greater than zero"));
        }
        if self.gateway.rate_limit.max_tracked_clients == 0 {
            return Err(invalid(
                "gateway.rate_limit.max_tracked_clients",
                "must be greater than zero",
            ));
        }
        if self.gateway.rate_limit.window_secs == 0 {
            return Err(invalid("gateway.rate_limit.window_secs", "must be greater than zero"));
        }
        if self.classifier.summarizer_url.trim().is_empty() {
            return Err(invalid("classifier.summarizer_url", "must not be empty"));
        }
        let labels = &self.classifier.labels;
        if labels.true_label.is_empty() || labels.fake_label.is_empty() {
            return Err(invalid("classifier.labels", "labels must not be empty"));
        }
        if labels.true_label.eq_ignore_ascii_case(&labels.fake_label) {
            return Err(invalid("classifier.labels", "labels must differ"));
        }
        if labels.fake_marker.is_empty() {
            return Err(invalid("classifier.labels.fake_marker", "must not be empty"));
        }
        for (field, model) in [
            ("classifier.model", &self.classifier.model),
            ("summarizer.model", &self.summarizer.model),
        ] {
            if model.base_url.trim().is_empty() || model.model.trim().is_empty() {
                return Err(invalid(field, "base_url and model must be set"));
            }
        }
        Ok(())
    }
}

// ── Stage configs ────────────────────────────────────────────────────────

/// Public entry stage.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_gateway_port")]
    pub port: u16,

    /// Base URL of the Classifier stage.
    #[serde(default = "default_classifier_url", alias = "classifierUrl")]
    pub classifier_url: String,

    #[serde(default = "default_gateway_body_limit", alias = "bodyLimitBytes")]
    pub body_limit_bytes: usize,

    /// Use the first `X-Forwarded-For` hop as the client identity.
    #[serde(default, alias = "trustForwardedFor")]
    pub trust_forwarded_for: bool,

    #[serde(default, alias = "rateLimit")]
    pub rate_limit: RateLimitConfig,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_gateway_port(),
            classifier_url: default_classifier_url(),
            body_limit_bytes: default_gateway_body_limit(),
            trust_forwarded_for: false,
            rate_limit: RateLimitConfig::default(),
        }
    }
}

/// Sliding-window limits applied per client at the Gateway.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RateLimitConfig {
    #[serde(default = "default_window_secs", alias = "windowSecs")]
    pub window_secs: u64,

    #[serde(default = "default_max_requests", alias = "maxRequests")]
    pub max_requests: u32,

    /// Client table size above which the least recently seen client is
    /// evicted.
    #[serde(default = "default_max_tracked_clients", alias = "maxTrackedClients")]
    pub max_tracked_clients: usize,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            window_secs: default_window_secs(),
            max_requests: default_max_requests(),
            max_tracked_clients: default_max_tracked_clients(),
        }
    }
}

/// Classifier stage.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassifierConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_classifier_port")]
    pub port: u16,

    /// Base URL of the Summarizer stage.
    #[serde(default = "default_summarizer_url", alias = "summarizerUrl")]
    pub summarizer_url: String,

    #[serde(default = "default_stage_body_limit", alias = "bodyLimitBytes")]
    pub body_limit_bytes: usize,

    #[serde(default = "default_classifier_model")]
    pub model: ModelConfig,

    #[serde(default)]
    pub labels: LabelSet,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_classifier_port(),
            summarizer_url: default_summarizer_url(),
            body_limit_bytes: default_stage_body_limit(),
            model: default_classifier_model(),
            labels: LabelSet::default(),
        }
    }
}

/// Summarizer stage.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SummarizerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_summarizer_port")]
    pub port: u16,

    #[serde(default = "default_stage_body_limit", alias = "bodyLimitBytes")]
    pub body_limit_bytes: usize,

    #[serde(default = "default_summarizer_model")]
    pub model: ModelConfig,
}

impl Default for SummarizerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_summarizer_port(),
            body_limit_bytes: default_stage_body_limit(),
            model: default_summarizer_model(),
        }
    }
}

/// Location of a model inference endpoint and the model to request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelConfig {
    /// Base URL of the chat API (e.g. `http://ollama:11434`).
    #[serde(alias = "baseUrl")]
    pub base_url: String,

    /// Model id sent with every request.
    #[serde(default = "default_model_id")]
    pub model: String,
}

fn default_host() -> String {
    "0.0.0.0".into()
}
fn default_gateway_port() -> u16 {
    4000
}
fn default_classifier_port() -> u16 {
    3000
}
fn default_summarizer_port() -> u16 {
    3001
}
fn default_classifier_url() -> String {
    "http://fake-news-classifier:3000".into()
}
fn default_summarizer_url() -> String {
    "http://news-summarizer:3001".into()
}
fn default_gateway_body_limit() -> usize {
    50 * 1024 * 1024
}
fn default_stage_body_limit() -> usize {
    10 * 1024 * 1024
}
fn default_window_secs() -> u64 {
    15 * 60
}
fn default_max_requests() -> u32 {
    100
}
fn default_max_tracked_clients() -> usize {
    10_000
}
fn default_model_id() -> String {
    "llama3.2:1b".into()
}
fn default_classifier_model() -> ModelConfig {
    ModelConfig {
        base_url: "http://ollama-fake-news:11434".into(),
        model: default_model_id(),
    }
}
fn default_summarizer_model() -> ModelConfig {
    ModelConfig {
        base_url: "http://ollama-summarizer:11434".into(),
        model: default_model_id(),
    }
}
