//! # Middleware
//!
//! - `metrics`: in-process request counters exposed at `/metrics`.
//! - `tracing_layer`: per-request spans that never record the query string.

pub mod metrics;
pub mod tracing_layer;
