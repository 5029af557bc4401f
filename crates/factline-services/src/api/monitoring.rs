//! Health and request statistics for the inner stages.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;

use axum::extract::{FromRef, State};
use axum::routing::get;
use axum::{Json, Router};
use chrono::Utc;

use factline_types::{HealthStatus, StageStatsSnapshot};

use super::SERVICE_VERSION;

/// Process-local request counters for one stage.
#[derive(Debug)]
pub struct StageStats {
    service: &'static str,
    started: Instant,
    requests: AtomicU64,
    failures: AtomicU64,
}

impl StageStats {
    pub fn new(service: &'static str) -> Self {
        Self {
            service,
            started: Instant::now(),
            requests: AtomicU64::new(0),
            failures: AtomicU64::new(0),
        }
    }

    pub fn service(&self) -> &'static str {
        self.service
    }

    pub fn record_request(&self) {
        self.requests.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_failure(&self) {
        self.failures.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> StageStatsSnapshot {
        StageStatsSnapshot {
            service: self.service.to_string(),
            uptime: self.started.elapsed().as_secs(),
            requests: self.requests.load(Ordering::Relaxed),
            failures: self.failures.load(Ordering::Relaxed),
            timestamp: Utc::now(),
        }
    }
}

/// `/health` and `/stats` for any stage state that exposes its
/// [`StageStats`].
pub fn monitoring_routes<S>() -> Router<S>
where
    S: Clone + Send + Sync + 'static,
    Arc<StageStats>: FromRef<S>,
{
    Router::new()
        .route("/health", get(stage_health))
        .route("/stats", get(stage_stats))
}

async fn stage_health(State(stats): State<Arc<StageStats>>) -> Json<HealthStatus> {
    Json(HealthStatus::healthy(Some(stats.service()), SERVICE_VERSION))
}

async fn stage_stats(State(stats): State<Arc<StageStats>>) -> Json<StageStatsSnapshot> {
    Json(stats.snapshot())
}
