//! The [`InferenceProvider`] trait.

use async_trait::async_trait;

use crate::error::Result;
use crate::types::{ChatReply, ChatRequest};

/// A model endpoint that can answer a chat request.
///
/// Stages hold an `Arc<dyn InferenceProvider>` so tests can substitute an
/// in-process stub for the HTTP client.
#[async_trait]
pub trait InferenceProvider: Send + Sync {
    /// Human-readable endpoint name, used in logs.
    fn name(&self) -> &str;

    /// Model id requested when the caller does not choose one.
    fn default_model(&self) -> &str;

    /// Execute a chat request and return the parsed reply.
    ///
    /// # Errors
    ///
    /// Returns [`InferenceError`](crate::error::InferenceError) on transport
    /// failure, non-2xx status, or a body that is not JSON.
    async fn chat(&self, request: &ChatRequest) -> Result<ChatReply>;

    /// Send `prompt` to `model` and return the reply text, substituting
    /// the placeholder when the reply carries no content.
    async fn infer(&self, prompt: &str, model: &str) -> Result<String> {
        let reply = self.chat(&ChatRequest::single(model, prompt)).await?;
        if reply.content().is_none() {
            tracing::warn!(
                provider = %self.name(),
                model,
                "model reply has no content, using placeholder"
            );
        }
        Ok(reply.content_or_placeholder())
    }
}
