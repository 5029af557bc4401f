//! Error taxonomy shared by every stage.
//!
//! [`ErrorKind`] is the only failure information that crosses a network
//! boundary. Stages log the full internal detail and reply with an
//! [`ErrorBody`] carrying the kind, a fixed human-readable message, and an
//! optional opaque correlation id.

use serde::{Deserialize, Serialize};

/// Category of a failed request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// Missing, too short, too long, or wrongly typed input. Always a
    /// client error.
    InvalidInput,
    /// The caller exceeded its request window, or the model endpoint is
    /// throttling.
    RateLimited,
    /// A downstream stage or the model endpoint was unreachable, timed out,
    /// or replied with an unusable payload.
    UpstreamUnavailable,
    /// Any uncaught fault inside the stage itself.
    InternalUnhandled,
    /// No route matches the requested path.
    RouteNotFound,
}

impl ErrorKind {
    /// Stable wire name (`invalid_input`, `rate_limited`, ...).
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::InvalidInput => "invalid_input",
            Self::RateLimited => "rate_limited",
            Self::UpstreamUnavailable => "upstream_unavailable",
            Self::InternalUnhandled => "internal_unhandled",
            Self::RouteNotFound => "route_not_found",
        }
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// JSON body of every error response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorBody {
    /// Error category.
    pub error: ErrorKind,

    /// Caller-facing message. Never contains internal error text.
    pub message: String,

    /// Opaque correlation id matching the stage's internal log entry.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    /// Requested path, echoed for [`ErrorKind::RouteNotFound`].
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
}

impl ErrorBody {
    /// Create an error body with no correlation id.
    pub fn new(error: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            error,
            message: message.into(),
            id: None,
            path: None,
        }
    }

    /// Attach a correlation id.
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Attach the requested path.
    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_serializes_snake_case() {
        let json = serde_json::to_string(&ErrorKind::UpstreamUnavailable).unwrap();
        assert_eq!(json, "\"upstream_unavailable\"");
        assert_eq!(ErrorKind::RouteNotFound.to_string(), "route_not_found");
    }

    #[test]
    fn kind_as_str_matches_serde() {
        for kind in [
            ErrorKind::InvalidInput,
            ErrorKind::RateLimited,
            ErrorKind::UpstreamUnavailable,
            ErrorKind::InternalUnhandled,
            ErrorKind::RouteNotFound,
        ] {
            let json = serde_json::to_value(kind).unwrap();
            assert_eq!(json.as_str(), Some(kind.as_str()));
        }
    }

    #[test]
    fn body_omits_empty_optionals() {
        let body = ErrorBody::new(ErrorKind::InvalidInput, "text too short");
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["error"], "invalid_input");
        assert!(json.get("id").is_none());
        assert!(json.get("path").is_none());
    }

    #[test]
    fn body_with_id_and_path() {
        let body = ErrorBody::new(ErrorKind::RouteNotFound, "route not found")
            .with_id("abc")
            .with_path("/nope");
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["id"], "abc");
        assert_eq!(json["path"], "/nope");

        let parsed: ErrorBody = serde_json::from_value(json).unwrap();
        assert_eq!(parsed, body);
    }
}
