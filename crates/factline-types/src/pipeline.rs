//! Bodies exchanged between the pipeline stages.
//!
//! Field names follow the JSON contract (`isFakeNews`, `processingTime`),
//! so every struct here is `rename_all = "camelCase"`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::verdict::Verdict;

/// Gateway -> Classifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassificationRequest {
    pub text: String,
}

/// Classifier -> Summarizer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryRequest {
    pub text: String,
    #[serde(default)]
    pub is_fake_news: bool,
}

/// Terminal artifact returned to the caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PipelineResult {
    /// Excerpt of the analysed text (first 200 characters, plus `...`
    /// when longer).
    pub text: String,

    /// Boolean verdict, as carried between stages.
    pub is_fake_news: bool,

    /// Tagged verdict. Distinguishes an unresolved label from a real one.
    pub verdict: Verdict,

    /// Model summary, verbatim.
    pub summary: String,

    pub metadata: ResultMetadata,
}

/// Provenance attached to a [`PipelineResult`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultMetadata {
    /// Model id used by the stage that produced the result.
    pub model: String,

    /// UTC time the result was composed.
    pub timestamp: DateTime<Utc>,

    /// Milliseconds between input validation and receipt of the
    /// downstream reply.
    pub processing_time: u64,
}

impl ResultMetadata {
    /// Metadata stamped with the current time.
    pub fn now(model: impl Into<String>, processing_time: u64) -> Self {
        Self {
            model: model.into(),
            timestamp: Utc::now(),
            processing_time,
        }
    }
}

/// Body of a `/health` probe.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthStatus {
    pub status: String,
    pub timestamp: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service: Option<String>,
    pub version: String,
}

impl HealthStatus {
    /// A healthy status stamped with the current time.
    pub fn healthy(service: Option<&str>, version: &str) -> Self {
        Self {
            status: "healthy".into(),
            timestamp: Utc::now(),
            service: service.map(String::from),
            version: version.into(),
        }
    }
}

/// Body of a `/stats` probe.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StageStatsSnapshot {
    pub service: String,
    /// Seconds since the stage started.
    pub uptime: u64,
    pub requests: u64,
    pub failures: u64,
    pub timestamp: DateTime<Utc>,
}
