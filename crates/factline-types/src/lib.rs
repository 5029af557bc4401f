//! Core types for the factline pipeline.
//!
//! Shared by every stage (Gateway, Classifier, Summarizer) and by the
//! binary. This crate holds no I/O:
//!
//! - [`pipeline`] -- request and response bodies exchanged between stages
//! - [`verdict`] -- the true/fake classification and its label set
//! - [`error`] -- the error-kind taxonomy and the JSON error body
//! - [`config`] -- the configuration schema with defaults

pub mod config;
pub mod error;
pub mod pipeline;
pub mod verdict;

pub use config::{Config, ConfigError};
pub use error::{ErrorBody, ErrorKind};
pub use pipeline::{
    ClassificationRequest, HealthStatus, PipelineResult, ResultMetadata, StageStatsSnapshot,
    SummaryRequest,
};
pub use verdict::{LabelSet, Verdict};
