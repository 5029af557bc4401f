//! Request and reply types for the `/api/chat` endpoint.

use serde::{Deserialize, Serialize};

/// Content substituted when a reply carries no `message.content`.
pub const INVALID_REPLY_PLACEHOLDER: &str = "[Erro: resposta inválida do modelo]";

/// A message in a chat conversation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ChatMessage {
    /// Author role ("system", "user", "assistant").
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn new(role: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            role: role.into(),
            content: content.into(),
        }
    }

    /// Create a user message.
    pub fn user(content: impl Into<String>) -> Self {
        Self::new("user", content)
    }
}

/// A non-streaming chat request.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ChatRequest {
    pub model: String,
    /// Always `false`; partial results are never exposed.
    pub stream: bool,
    pub messages: Vec<ChatMessage>,
}

impl ChatRequest {
    /// A single-turn request carrying `prompt` as the user message.
    pub fn single(model: impl Into<String>, prompt: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            stream: false,
            messages: vec![ChatMessage::user(prompt)],
        }
    }
}

/// The assistant message inside a reply.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ReplyMessage {
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
}

/// A chat reply. Every field is optional; see [`ChatReply::from_json`].
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ChatReply {
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub message: Option<ReplyMessage>,
    #[serde(default)]
    pub done: Option<bool>,
}

impl ChatReply {
    /// Interpret any JSON value as a reply. Values that do not fit the
    /// expected shape yield an empty reply rather than an error.
    pub fn from_json(value: serde_json::Value) -> Self {
        serde_json::from_value(value).unwrap_or_default()
    }

    /// The model's text, if present and non-empty.
    pub fn content(&self) -> Option<&str> {
        self.message
            .as_ref()
            .and_then(|m| m.content.as_deref())
            .filter(|c| !c.is_empty())
    }

    /// The model's text, or [`INVALID_REPLY_PLACEHOLDER`].
    pub fn content_or_placeholder(&self) -> String {
        self.content()
            .unwrap_or(INVALID_REPLY_PLACEHOLDER)
            .to_string()
    }
}
