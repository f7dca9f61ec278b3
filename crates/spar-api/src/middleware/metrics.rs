//! # Request Metrics
//!
//! Lightweight request metrics using atomic counters.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use axum::extract::Request;
use axum::middleware::Next;
use axum::response::Response;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Shared metrics state.
#[derive(Debug, Clone)]
pub struct ApiMetrics {
    pub request_count: Arc<AtomicU64>,
    pub client_error_count: Arc<AtomicU64>,
    pub server_error_count: Arc<AtomicU64>,
}

/// Point-in-time copy of the counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MetricsSnapshot {
    /// Completed requests.
    pub requests: u64,
    /// Responses with a 4xx status.
    pub client_errors: u64,
    /// Responses with a 5xx status.
    pub server_errors: u64,
}

impl ApiMetrics {
    /// Create a new metrics instance.
    pub fn new() -> Self {
        Self {
            request_count: Arc::new(AtomicU64::new(0)),
            client_error_count: Arc::new(AtomicU64::new(0)),
            server_error_count: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Read all counters.
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            requests: self.request_count.load(Ordering::Relaxed),
            client_errors: self.client_error_count.load(Ordering::Relaxed),
            server_errors: self.server_error_count.load(Ordering::Relaxed),
        }
    }

    fn record(&self, response: &Response) {
        self.request_count.fetch_add(1, Ordering::Relaxed);
        let status = response.status();
        if status.is_client_error() {
            self.client_error_count.fetch_add(1, Ordering::Relaxed);
        } else if status.is_server_error() {
            self.server_error_count.fetch_add(1, Ordering::Relaxed);
        }
    }
}

impl Default for ApiMetrics {
    fn default() -> Self {
        Self::new()
    }
}

/// Middleware that counts each response by status class.
pub async fn metrics_middleware(request: Request, next: Next) -> Response {
    let metrics = request.extensions().get::<ApiMetrics>().cloned();

    let response = next.run(request).await;

    if let Some(m) = metrics {
        m.record(&response);
    }

    response
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;
    use axum::response::IntoResponse;

    #[test]
    fn counts_by_status_class() {
        let metrics = ApiMetrics::new();
        metrics.record(&StatusCode::OK.into_response());
        metrics.record(&StatusCode::BAD_REQUEST.into_response());
        metrics.record(&StatusCode::NOT_FOUND.into_response());
        metrics.record(&StatusCode::SERVICE_UNAVAILABLE.into_response());

        assert_eq!(
            metrics.snapshot(),
            MetricsSnapshot {
                requests: 4,
                client_errors: 2,
                server_errors: 1,
            }
        );
    }

    #[test]
    fn clones_share_counters() {
        let metrics = ApiMetrics::default();
        let clone = metrics.clone();
        clone.record(&StatusCode::OK.into_response());
        assert_eq!(metrics.snapshot().requests, 1);
    }
}
