//! # Lookup Orchestration
//!
//! One lookup, end to end:
//!
//! ```text
//! raw input ──validate──▶ Personnummer ──gateway (once)──▶ payload ──normalize──▶ outcome
//!      │                                      │                        │
//!      └─ ValidationError (no call)           └─ ServiceUnavailable    └─ UpstreamContractViolation
//! ```
//!
//! Invalid input never reaches the gateway, and a missing gateway is only
//! reported after validation, so callers get the validation error first.
//!
//! Each lookup runs in a `registry_lookup` span carrying a fresh `lookup_id`
//! and the gateway name. The identity number is never recorded.

use std::fmt;
use std::sync::Arc;
use std::time::Instant;

use spar_client::RegistryGateway;
use spar_core::{registry, LookupError, PersonRecord, Personnummer};
use tracing::Instrument;
use uuid::Uuid;

/// Runs the validate → fetch → normalize pipeline.
#[derive(Clone)]
pub struct LookupOrchestrator {
    gateway: Option<Arc<dyn RegistryGateway>>,
}

impl fmt::Debug for LookupOrchestrator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LookupOrchestrator")
            .field("gateway", &self.gateway_name())
            .finish()
    }
}

impl LookupOrchestrator {
    /// Create an orchestrator around an optional gateway.
    pub fn new(gateway: Option<Arc<dyn RegistryGateway>>) -> Self {
        Self { gateway }
    }

    /// Name of the configured gateway, if any.
    pub fn gateway_name(&self) -> Option<&str> {
        self.gateway.as_deref().map(|gateway| gateway.gateway_name())
    }

    /// Look up one raw identity number.
    pub async fn lookup(&self, raw: &str) -> Result<PersonRecord, LookupError> {
        let span = tracing::info_span!(
            "registry_lookup",
            lookup_id = %Uuid::new_v4(),
            gateway = self.gateway_name().unwrap_or("none"),
        );
        self.run(raw).instrument(span).await
    }

    async fn run(&self, raw: &str) -> Result<PersonRecord, LookupError> {
        let personnummer = Personnummer::parse(raw).map_err(|err| {
            tracing::debug!(reason = err.code(), "identity number rejected");
            err
        })?;

        let Some(gateway) = self.gateway.as_deref() else {
            tracing::warn!("lookup rejected: no registry gateway configured");
            return Err(LookupError::ServiceUnavailable {
                reason: "registry gateway not configured".to_string(),
            });
        };

        fetch_and_normalize(gateway, &personnummer).await
    }
}

async fn fetch_and_normalize(
    gateway: &dyn RegistryGateway,
    personnummer: &Personnummer,
) -> Result<PersonRecord, LookupError> {
    let started = Instant::now();
    tracing::info!(
        coordination_number = personnummer.is_coordination_number(),
        "registry lookup started"
    );

    let payload = match gateway.lookup(personnummer).await {
        Ok(payload) => payload,
        Err(err) => {
            tracing::warn!(
                elapsed_ms = elapsed_ms(started),
                error = %err,
                "registry gateway call failed"
            );
            return Err(LookupError::ServiceUnavailable {
                reason: err.to_string(),
            });
        }
    };

    let elapsed = elapsed_ms(started);
    let outcome = registry::normalize(&payload).map_err(|err| {
        tracing::error!(elapsed_ms = elapsed, error = %err, "registry payload rejected");
        LookupError::from(err)
    })?;

    tracing::info!(
        elapsed_ms = elapsed,
        outcome = outcome.kind(),
        "registry lookup completed"
    );
    outcome.into_result()
}

fn elapsed_ms(started: Instant) -> u64 {
    u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use spar_client::{GatewayError, MockRegistryGateway};
    use spar_core::{RawRegistryPayload, ValidationError};

    fn orchestrator(mock: &Arc<MockRegistryGateway>) -> LookupOrchestrator {
        let gateway: Arc<dyn RegistryGateway> = mock.clone();
        LookupOrchestrator::new(Some(gateway))
    }

    fn payload(status: &str) -> RawRegistryPayload {
        RawRegistryPayload::Json(json!({
            "PersonsokningSvarspost": {
                "Status": status,
                "Namn": { "Fornamn": "Anna", "Efternamn": "Svensson" }
            }
        }))
    }

    #[tokio::test]
    async fn invalid_input_never_reaches_the_gateway() {
        let mock = Arc::new(MockRegistryGateway::responding(payload("1")));
        let orch = orchestrator(&mock);

        for (raw, expected) in [
            ("invalid", ValidationError::Format),
            ("901316-6954", ValidationError::Date),
            ("900116-6958", ValidationError::Checksum),
        ] {
            let err = orch.lookup(raw).await.expect_err("invalid input");
            assert_eq!(err, LookupError::Invalid(expected), "input: {raw}");
        }
        assert_eq!(mock.call_count(), 0);
    }

    #[tokio::test]
    async fn found_record_is_returned_after_one_call() {
        let mock = Arc::new(MockRegistryGateway::responding(payload("1")));
        let record = orchestrator(&mock)
            .lookup("900116-6959")
            .await
            .expect("found");
        assert_eq!(record.name, "Anna Svensson");
        assert_eq!(mock.call_count(), 1);
        assert_eq!(mock.requested(), vec!["199001166959"]);
    }

    #[tokio::test]
    async fn outcomes_map_to_lookup_errors() {
        for (status, expected) in [
            ("2", LookupError::Protected),
            ("3", LookupError::Deceased),
            ("4", LookupError::NotFound),
            ("7", LookupError::Malformed),
        ] {
            let mock = Arc::new(MockRegistryGateway::responding(payload(status)));
            let err = orchestrator(&mock)
                .lookup("9001166959")
                .await
                .expect_err("not found");
            assert_eq!(err, expected, "status: {status}");
        }
    }

    #[tokio::test]
    async fn gateway_failure_is_service_unavailable_without_retry() {
        let mock = Arc::new(MockRegistryGateway::failing(GatewayError::Timeout {
            timeout_ms: 30_000,
        }));
        let err = orchestrator(&mock)
            .lookup("199001166959")
            .await
            .expect_err("timeout");
        assert!(matches!(err, LookupError::ServiceUnavailable { .. }), "got: {err:?}");
        assert_eq!(mock.call_count(), 1);
    }

    #[tokio::test]
    async fn unparseable_payload_is_a_contract_violation() {
        let mock = Arc::new(MockRegistryGateway::responding(RawRegistryPayload::Xml(
            "<Envelope><Body>".to_string(),
        )));
        let err = orchestrator(&mock)
            .lookup("199001166959")
            .await
            .expect_err("bad xml");
        assert!(
            matches!(err, LookupError::UpstreamContractViolation { .. }),
            "got: {err:?}"
        );
    }

    #[tokio::test]
    async fn missing_gateway_is_reported_after_validation() {
        let orch = LookupOrchestrator::new(None);

        let err = orch.lookup("invalid").await.expect_err("invalid");
        assert_eq!(err, LookupError::Invalid(ValidationError::Format));

        let err = orch.lookup("900116-6959").await.expect_err("no gateway");
        assert!(matches!(err, LookupError::ServiceUnavailable { .. }), "got: {err:?}");
    }

    #[test]
    fn debug_shows_gateway_name_only() {
        let mock = Arc::new(MockRegistryGateway::responding(payload("1")));
        let debug = format!("{:?}", orchestrator(&mock));
        assert!(debug.contains("MockRegistryGateway"), "got: {debug}");
    }
}
