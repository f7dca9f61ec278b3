//! # spar-api: HTTP Lookup Service
//!
//! Axum application that turns a raw Swedish identity number into a
//! normalized person record with one call to the SPAR registry.
//!
//! ## API Surface
//!
//! | Route                | Module               |
//! |----------------------|----------------------|
//! | `GET /lookup`        | [`routes::lookup`]   |
//! | `GET /health/*`      | [`routes::health`]   |
//! | `GET /metrics`       | [`routes::health`]   |
//! | `GET /openapi.json`  | [`openapi`]          |
//!
//! ## Middleware Stack (execution order)
//!
//! ```text
//! TraceLayer → MetricsMiddleware → Handler
//! ```

pub mod error;
pub mod middleware;
pub mod openapi;
pub mod orchestration;
pub mod routes;
pub mod state;

use axum::middleware::from_fn;
use axum::Router;

use crate::middleware::metrics::ApiMetrics;
use crate::state::AppState;

/// Assemble the full application router with all routes and middleware.
pub fn app(state: AppState) -> Router {
    let metrics = ApiMetrics::new();

    Router::new()
        .merge(routes::lookup::router())
        .merge(routes::health::router())
        .merge(openapi::router())
        .layer(from_fn(middleware::metrics::metrics_middleware))
        .layer(middleware::tracing_layer::layer())
        .layer(axum::Extension(metrics))
        .with_state(state)
}
