//! Public entry stage.
//!
//! `POST /analisar` runs: rate-limit check, sanitization of `noticia`,
//! minimum-length check, then forwards the sanitized text to the Classifier
//! and relays its result. Any Classifier failure becomes a 500 with an
//! opaque correlation id.

use std::sync::Arc;
use std::time::Duration;

use axum::extract::rejection::JsonRejection;
use axum::extract::{Request, State};
use axum::middleware::{self, Next};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use tracing::{info, warn};

use factline_core::validation::MIN_TEXT_CHARS;
use factline_core::{RateLimitable, RateLimiter, ValidationError};
use factline_security::sanitize_value;
use factline_types::{ClassificationRequest, Config, HealthStatus, PipelineResult};

use super::{SERVICE_VERSION, peer_addr, with_common_layers};
use crate::error::StageError;
use crate::stage_client::{StageClient, StageClientError};

/// Header carrying the original client address behind a proxy.
const FORWARDED_FOR: &str = "x-forwarded-for";

/// Shared state for the Gateway handlers.
#[derive(Clone)]
pub struct GatewayState {
    pub limiter: Arc<dyn RateLimitable>,
    pub classifier: StageClient,
    /// Use the first `X-Forwarded-For` hop as the client identity.
    pub trust_forwarded_for: bool,
}

impl GatewayState {
    pub fn from_config(config: &Config) -> Result<Self, StageClientError> {
        let gateway = &config.gateway;
        let limiter = RateLimiter::new(
            Duration::from_secs(gateway.rate_limit.window_secs),
            gateway.rate_limit.max_requests,
        )
        .with_max_tracked_clients(gateway.rate_limit.max_tracked_clients);

        Ok(Self {
            limiter: Arc::new(limiter),
            classifier: StageClient::new(
                &gateway.classifier_url,
                config.classifier_hop_timeout(),
            )?,
            trust_forwarded_for: gateway.trust_forwarded_for,
        })
    }
}

/// Build the Gateway router. Only `/analisar` is rate limited.
pub fn router(state: GatewayState, body_limit_bytes: usize) -> Router {
    let routes = Router::new()
        .route("/analisar", post(analyze))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            enforce_rate_limit,
        ))
        .route("/health", get(health))
        .with_state(state);

    with_common_layers(routes, body_limit_bytes)
}

/// Identity used for rate limiting: the peer IP, or the first
/// `X-Forwarded-For` hop when the proxy is trusted.
fn client_identity(request: &Request, trust_forwarded_for: bool) -> String {
    if trust_forwarded_for {
        let forwarded = request
            .headers()
            .get(FORWARDED_FOR)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.split(',').next())
            .map(str::trim)
            .filter(|hop| !hop.is_empty());
        if let Some(hop) = forwarded {
            return hop.to_string();
        }
    }
    peer_addr(request)
        .map(|addr| addr.ip().to_string())
        .unwrap_or_else(|| "unknown".into())
}

async fn enforce_rate_limit(
    State(state): State<GatewayState>,
    request: Request,
    next: Next,
) -> Response {
    let client = client_identity(&request, state.trust_forwarded_for);
    if !state.limiter.allow(&client) {
        warn!(client = %client, "rate limit exceeded");
        return StageError::RateLimited.into_response();
    }
    next.run(request).await
}

async fn analyze(
    State(state): State<GatewayState>,
    payload: Result<Json<serde_json::Value>, JsonRejection>,
) -> Result<Json<PipelineResult>, StageError> {
    let Json(body) = payload?;

    let raw = body
        .get("noticia")
        .filter(|v| is_present(v))
        .ok_or(ValidationError::Missing("noticia"))?;

    let text = sanitize_value(Some(raw));
    let len = text.char_len();
    if len < MIN_TEXT_CHARS {
        return Err(ValidationError::TooShort {
            len,
            min: MIN_TEXT_CHARS,
        }
        .into());
    }

    info!(text_len = len, "forwarding text to classifier");

    let result = state
        .classifier
        .classify(&ClassificationRequest {
            text: text.into_inner(),
        })
        .await
        .map_err(StageError::Relay)?;

    Ok(Json(result))
}

/// A `noticia` that is absent, null, an empty string or `false` counts as
/// not supplied.
fn is_present(value: &serde_json::Value) -> bool {
    match value {
        serde_json::Value::Null | serde_json::Value::Bool(false) => false,
        serde_json::Value::String(s) => !s.is_empty(),
        _ => true,
    }
}

async fn health() -> Json<HealthStatus> {
    Json(HealthStatus::healthy(None, SERVICE_VERSION))
}
