//! # Health Probes and Counters
//!
//! Liveness always answers while the process runs. Readiness depends on a
//! registry gateway being configured.

use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Extension, Json, Router};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::middleware::metrics::{ApiMetrics, MetricsSnapshot};
use crate::state::AppState;

/// Readiness probe body.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ReadinessResponse {
    /// `ready` or `degraded`.
    pub status: String,
    /// Name of the configured gateway, `null` when none is configured.
    pub gateway: Option<String>,
}

/// Build the health router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/health/liveness", get(liveness))
        .route("/health/readiness", get(readiness))
        .route("/metrics", get(metrics))
}

/// Liveness probe: always returns 200 if the process is running.
#[utoipa::path(
    get,
    path = "/health/liveness",
    responses((status = 200, description = "Process is running", body = String)),
    tag = "health"
)]
pub(crate) async fn liveness() -> &'static str {
    "ok"
}

/// Readiness probe: 200 with a gateway, 503 without one.
#[utoipa::path(
    get,
    path = "/health/readiness",
    responses(
        (status = 200, description = "Registry gateway configured", body = ReadinessResponse),
        (status = 503, description = "No registry gateway configured", body = ReadinessResponse),
    ),
    tag = "health"
)]
pub(crate) async fn readiness(
    State(state): State<AppState>,
) -> (StatusCode, Json<ReadinessResponse>) {
    match state.orchestrator.gateway_name() {
        Some(name) => (
            StatusCode::OK,
            Json(ReadinessResponse {
                status: "ready".to_string(),
                gateway: Some(name.to_string()),
            }),
        ),
        None => (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(ReadinessResponse {
                status: "degraded".to_string(),
                gateway: None,
            }),
        ),
    }
}

/// Request counters since startup.
#[utoipa::path(
    get,
    path = "/metrics",
    responses((status = 200, description = "Request counters", body = MetricsSnapshot)),
    tag = "health"
)]
pub(crate) async fn metrics(Extension(metrics): Extension<ApiMetrics>) -> Json<MetricsSnapshot> {
    Json(metrics.snapshot())
}
