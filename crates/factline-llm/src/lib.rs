//! Model inference client for factline.
//!
//! Every stage that needs a language model goes through the
//! [`InferenceProvider`] trait. The production implementation,
//! [`OllamaClient`], speaks the `/api/chat` protocol (`stream: false`,
//! single user message) with a bounded request timeout.
//!
//! # Failure policy
//!
//! - Transport failures surface as a structured [`InferenceError`]
//!   variant (`Timeout`, `ConnectionRefused`, ...), never as bare text.
//! - A reply that is valid JSON but lacks `message.content` degrades to
//!   [`INVALID_REPLY_PLACEHOLDER`] instead of failing the request.
//! - Nothing is retried.
//!
//! ```rust,ignore
//! use factline_llm::{InferenceProvider, OllamaClient};
//!
//! let client = OllamaClient::new(config.classifier.model.clone(), config.timeout())?;
//! let answer = client.infer("Classifique ...", "llama3.2:1b").await?;
//! ```

pub mod error;
pub mod ollama;
pub mod provider;
pub mod types;

pub use error::{InferenceError, Result};
pub use ollama::OllamaClient;
pub use provider::InferenceProvider;
pub use types::{ChatMessage, ChatReply, ChatRequest, INVALID_REPLY_PLACEHOLDER};
