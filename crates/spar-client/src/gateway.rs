//! Registry gateway port.

use async_trait::async_trait;
use spar_core::{Personnummer, RawRegistryPayload};

use crate::error::GatewayError;

/// A source of raw registry responses for one identity number.
///
/// Implementations must be `Send + Sync` so they can be shared across
/// request handlers behind an `Arc`. The trait is object-safe to support
/// runtime selection (mock vs. live).
#[async_trait]
pub trait RegistryGateway: Send + Sync {
    /// Perform one person search. No retries.
    ///
    /// A response that arrives is returned as a payload even when it is a
    /// SOAP fault; only transport-level failures are errors.
    async fn lookup(&self, personnummer: &Personnummer) -> Result<RawRegistryPayload, GatewayError>;

    /// Human-readable name of this implementation, for logs and readiness.
    fn gateway_name(&self) -> &str;
}
