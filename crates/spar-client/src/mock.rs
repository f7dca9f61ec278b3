//! In-memory registry gateway for tests and local development.

use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use parking_lot::Mutex;
use spar_core::{Personnummer, RawRegistryPayload};

use crate::error::GatewayError;
use crate::gateway::RegistryGateway;

/// Returns one canned response for every lookup and records each call.
#[derive(Debug)]
pub struct MockRegistryGateway {
    response: Result<RawRegistryPayload, GatewayError>,
    calls: AtomicUsize,
    requested: Mutex<Vec<String>>,
}

impl MockRegistryGateway {
    /// Answer every lookup with `payload`.
    pub fn responding(payload: RawRegistryPayload) -> Self {
        Self::with_response(Ok(payload))
    }

    /// Fail every lookup with `error`.
    pub fn failing(error: GatewayError) -> Self {
        Self::with_response(Err(error))
    }

    fn with_response(response: Result<RawRegistryPayload, GatewayError>) -> Self {
        Self {
            response,
            calls: AtomicUsize::new(0),
            requested: Mutex::new(Vec::new()),
        }
    }

    /// Number of lookups performed so far.
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Canonical identity numbers requested so far, in call order.
    pub fn requested(&self) -> Vec<String> {
        self.requested.lock().clone()
    }
}

#[async_trait]
impl RegistryGateway for MockRegistryGateway {
    async fn lookup(&self, personnummer: &Personnummer) -> Result<RawRegistryPayload, GatewayError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.requested.lock().push(personnummer.as_str().to_string());
        self.response.clone()
    }

    fn gateway_name(&self) -> &str {
        "MockRegistryGateway"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::sync::Arc;

    fn pnr() -> Personnummer {
        Personnummer::parse("19900116-6959").expect("valid personnummer")
    }

    #[tokio::test]
    async fn counts_calls_and_records_canonical_ids() {
        let mock = MockRegistryGateway::responding(RawRegistryPayload::Json(json!({ "Status": "4" })));
        mock.lookup(&pnr()).await.expect("canned payload");
        mock.lookup(&pnr()).await.expect("canned payload");
        assert_eq!(mock.call_count(), 2);
        assert_eq!(mock.requested(), vec!["199001166959", "199001166959"]);
    }

    #[tokio::test]
    async fn failing_mock_returns_the_error() {
        let mock = MockRegistryGateway::failing(GatewayError::Timeout { timeout_ms: 30_000 });
        let err = mock.lookup(&pnr()).await.expect_err("configured failure");
        assert_eq!(err, GatewayError::Timeout { timeout_ms: 30_000 });
        assert_eq!(mock.call_count(), 1);
    }

    #[tokio::test]
    async fn usable_as_trait_object() {
        let gateway: Arc<dyn RegistryGateway> =
            Arc::new(MockRegistryGateway::responding(RawRegistryPayload::Xml("<a/>".into())));
        assert_eq!(gateway.gateway_name(), "MockRegistryGateway");
        let payload = gateway.lookup(&pnr()).await.expect("canned payload");
        assert_eq!(payload, RawRegistryPayload::Xml("<a/>".into()));
    }
}
