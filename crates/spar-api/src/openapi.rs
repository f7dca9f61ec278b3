//! # OpenAPI Document
//!
//! Generated from the route annotations and served at `/openapi.json`.

use axum::routing::get;
use axum::{Json, Router};
use utoipa::OpenApi;

use crate::state::AppState;

/// OpenAPI document for the lookup service.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "SPAR Lookup API",
        version = "0.1.0",
        description = "Person and address lookups against the Swedish population register (SPAR)."
    ),
    paths(
        crate::routes::lookup::lookup_person,
        crate::routes::health::liveness,
        crate::routes::health::readiness,
        crate::routes::health::metrics,
    ),
    components(schemas(
        crate::routes::lookup::PersonResponse,
        crate::routes::lookup::AddressResponse,
        crate::routes::health::ReadinessResponse,
        crate::middleware::metrics::MetricsSnapshot,
        crate::error::ErrorBody,
    )),
    tags(
        (name = "lookup", description = "Person lookup by identity number"),
        (name = "health", description = "Probes and counters"),
    )
)]
pub struct ApiDoc;

/// Router serving the generated document.
pub fn router() -> Router<AppState> {
    Router::new().route("/openapi.json", get(openapi_json))
}

async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}
