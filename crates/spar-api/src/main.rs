//! # spar-api: Binary Entry Point
//!
//! Starts the Axum HTTP server for person lookups.
//! Binds to configurable port (default 3000).

use std::sync::Arc;

use spar_api::state::{AppConfig, AppState, LogFormat};
use spar_client::{RegistryGateway, SparConfig, SparHttpGateway};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::from_env();

    // Initialize structured tracing.
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    match config.log_format {
        LogFormat::Json => tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .init(),
        LogFormat::Text => tracing_subscriber::fmt().with_env_filter(filter).init(),
    }

    // Attempt to create the registry gateway from environment.
    let gateway: Option<Arc<dyn RegistryGateway>> = match SparConfig::from_env() {
        Ok(spar_config) => {
            tracing::info!(endpoint = %spar_config.endpoint, "SPAR gateway configured");
            match SparHttpGateway::new(spar_config) {
                Ok(gateway) => {
                    let gateway: Arc<dyn RegistryGateway> = Arc::new(gateway);
                    Some(gateway)
                }
                Err(e) => {
                    tracing::error!("Failed to create SPAR gateway: {e}");
                    return Err(e.into());
                }
            }
        }
        Err(e) => {
            tracing::warn!("SPAR gateway not configured: {e}. Lookups will return 503.");
            None
        }
    };

    let port = config.port;
    tracing::info!(environment = %config.environment, "starting SPAR lookup API");
    let app = spar_api::app(AppState::new(config, gateway));

    let addr = std::net::SocketAddr::from(([0, 0, 0, 0], port));
    tracing::info!("SPAR lookup API listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("failed to listen for shutdown signal: {e}");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutdown signal received");
}
