//! # Application State
//!
//! Shared state for the Axum application, passed to all route handlers via
//! the `State` extractor. Holds the server configuration and the lookup
//! orchestrator; the registry gateway lives inside the orchestrator.

use std::sync::Arc;

use spar_client::RegistryGateway;

use crate::orchestration::LookupOrchestrator;

/// Log output format for the server binary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// Human-readable lines.
    #[default]
    Text,
    /// One JSON object per event.
    Json,
}

impl LogFormat {
    /// `json` (any case) selects JSON; anything else is text.
    pub fn parse(raw: &str) -> Self {
        if raw.trim().eq_ignore_ascii_case("json") {
            Self::Json
        } else {
            Self::Text
        }
    }
}

/// Server configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// Port to bind the HTTP server to.
    pub port: u16,
    /// Deployment environment name (`APP_ENV`).
    pub environment: String,
    /// Log output format.
    pub log_format: LogFormat,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            port: 3000,
            environment: "development".to_string(),
            log_format: LogFormat::Text,
        }
    }
}

impl AppConfig {
    /// Load from `PORT`, `APP_ENV`, and `LOG_FORMAT`. Unset or unparseable
    /// values fall back to the defaults.
    pub fn from_env() -> Self {
        Self::from_vars(|var| std::env::var(var).ok())
    }

    /// Load through an arbitrary variable lookup.
    pub fn from_vars<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        Self {
            port: lookup("PORT")
                .and_then(|p| p.trim().parse().ok())
                .unwrap_or(defaults.port),
            environment: lookup("APP_ENV").unwrap_or(defaults.environment),
            log_format: lookup("LOG_FORMAT")
                .map(|raw| LogFormat::parse(&raw))
                .unwrap_or_default(),
        }
    }

    /// Whether this is a production deployment.
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }
}

/// Shared application state.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Server configuration.
    pub config: AppConfig,
    /// Lookup pipeline with the injected registry gateway.
    pub orchestrator: LookupOrchestrator,
}

impl AppState {
    /// Build state around an optional gateway. `None` means lookups answer
    /// 503 after validation and readiness reports degraded.
    pub fn new(config: AppConfig, gateway: Option<Arc<dyn RegistryGateway>>) -> Self {
        Self {
            config,
            orchestrator: LookupOrchestrator::new(gateway),
        }
    }
}
