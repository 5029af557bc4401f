//! HTTP stages for the factline pipeline.
//!
//! Each stage is an independent axum service:
//!
//! - [`api::gateway`] -- public entry point: rate limiting, sanitization,
//!   forwarding to the Classifier
//! - [`api::classifier`] -- classifies a text with the model, then asks the
//!   Summarizer for a summary
//! - [`api::summarizer`] -- summarizes a text with the model
//!
//! [`stage_client`] carries requests between stages and [`server`] binds a
//! stage router to a socket.

pub mod api;
pub mod error;
pub mod server;
pub mod stage_client;

pub use error::{StageError, UpstreamError};
pub use server::{Stage, serve, serve_on};
pub use stage_client::{StageClient, StageClientError};
