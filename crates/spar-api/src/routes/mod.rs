//! # API Route Modules
//!
//! - `lookup`: `GET /lookup?personnummer=...`, the single person lookup.
//! - `health`: liveness and readiness probes plus the `/metrics` counters.

pub mod health;
pub mod lookup;
