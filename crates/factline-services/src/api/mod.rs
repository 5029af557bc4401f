//! Stage routers and the middleware every stage shares.
//!
//! Each stage builds its own routes and passes them through
//! [`with_common_layers`], which adds the 404 fallback, body limit, panic
//! handler, security headers, CORS, tracing spans and request logging.

pub mod classifier;
pub mod gateway;
pub mod monitoring;
pub mod summarizer;

use std::net::SocketAddr;

use axum::Json;
use axum::Router;
use axum::extract::{ConnectInfo, DefaultBodyLimit, Request};
use axum::http::{HeaderValue, StatusCode, Uri, header};
use axum::middleware::{self, Next};
use axum::response::Response;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::CorsLayer;
use tower_http::set_header::SetResponseHeaderLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

use factline_types::{ErrorBody, ErrorKind};

use crate::error::panic_response;

/// Version reported by every `/health` endpoint.
pub const SERVICE_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Wrap a stage's routes in the middleware stack shared by all stages.
pub fn with_common_layers(router: Router, body_limit_bytes: usize) -> Router {
    router
        .fallback(route_not_found)
        .layer(DefaultBodyLimit::max(body_limit_bytes))
        .layer(CatchPanicLayer::custom(panic_response))
        .layer(SetResponseHeaderLayer::overriding(
            header::X_CONTENT_TYPE_OPTIONS,
            HeaderValue::from_static("nosniff"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::X_FRAME_OPTIONS,
            HeaderValue::from_static("DENY"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::X_XSS_PROTECTION,
            HeaderValue::from_static("1; mode=block"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::STRICT_TRANSPORT_SECURITY,
            HeaderValue::from_static("max-age=31536000; includeSubDomains"),
        ))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn(log_request))
}

/// Peer address recorded by `into_make_service_with_connect_info`, if any.
pub(crate) fn peer_addr(request: &Request) -> Option<SocketAddr> {
    request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| *addr)
}

async fn log_request(request: Request, next: Next) -> Response {
    let client = peer_addr(&request)
        .map(|addr| addr.ip().to_string())
        .unwrap_or_else(|| "unknown".into());
    let user_agent = request
        .headers()
        .get(header::USER_AGENT)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("-")
        .to_string();
    info!(
        method = %request.method(),
        path = %request.uri().path(),
        client = %client,
        user_agent = %user_agent,
        "request"
    );
    next.run(request).await
}

async fn route_not_found(uri: Uri) -> (StatusCode, Json<ErrorBody>) {
    let path = uri
        .path_and_query()
        .map(|pq| pq.as_str().to_string())
        .unwrap_or_else(|| uri.path().to_string());
    (
        StatusCode::NOT_FOUND,
        Json(ErrorBody::new(ErrorKind::RouteNotFound, "route not found").with_path(path)),
    )
}
