//! # HTTP Registry Gateway
//!
//! Production [`RegistryGateway`] backed by `reqwest` with rustls. One HTTPS
//! client is built at construction time and reused for every call.
//!
//! ## Status Mapping
//!
//! | Response | Result |
//! |---|---|
//! | 2xx | `Ok(Xml(body))` |
//! | 500 with a SOAP `Fault` body | `Ok(Xml(body))` (the fault is reported by normalization) |
//! | any other status | `Err(Unavailable)` |
//! | timeout | `Err(Timeout)` |
//! | connect / TLS / body read failure | `Err(Transport)` |

use std::path::Path;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::{Certificate, Client, Identity, StatusCode};
use spar_core::{Personnummer, RawRegistryPayload, RegistryNode};

use crate::config::{ClientTls, SparConfig};
use crate::envelope::{self, SOAP_ACTION};
use crate::error::GatewayError;
use crate::gateway::RegistryGateway;

const GATEWAY_NAME: &str = "SparHttpGateway";

/// Longest response body excerpt kept in an error.
const BODY_EXCERPT_CHARS: usize = 256;

/// SPAR person-search over SOAP/HTTPS.
#[derive(Debug)]
pub struct SparHttpGateway {
    client: Client,
    config: SparConfig,
}

impl SparHttpGateway {
    /// Build the HTTPS client from configuration.
    ///
    /// # Errors
    ///
    /// - `GatewayError::Certificate` if a PEM file cannot be read or parsed.
    /// - `GatewayError::Transport` if the client cannot be built.
    pub fn new(config: SparConfig) -> Result<Self, GatewayError> {
        let mut builder = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .danger_accept_invalid_certs(config.accept_invalid_certs);

        if let Some(tls) = &config.tls {
            let (identity, ca) = load_tls(tls)?;
            builder = builder.identity(identity).add_root_certificate(ca);
        }

        let client = builder.build().map_err(|e| GatewayError::Transport {
            reason: format!("failed to build HTTP client: {e}"),
        })?;

        tracing::debug!(
            endpoint = %config.endpoint,
            mutual_tls = config.tls.is_some(),
            accept_invalid_certs = config.accept_invalid_certs,
            timeout_secs = config.timeout_secs,
            "SPAR HTTP gateway constructed"
        );

        Ok(Self { client, config })
    }

    /// The configuration this gateway was built from.
    pub fn config(&self) -> &SparConfig {
        &self.config
    }

    fn timeout_ms(&self) -> u64 {
        self.config.timeout_secs.saturating_mul(1000)
    }
}

#[async_trait]
impl RegistryGateway for SparHttpGateway {
    async fn lookup(&self, personnummer: &Personnummer) -> Result<RawRegistryPayload, GatewayError> {
        let body = envelope::person_search(&self.config, personnummer)?;

        let response = self
            .client
            .post(self.config.endpoint.clone())
            .header(CONTENT_TYPE, "text/xml; charset=utf-8")
            .header("SOAPAction", SOAP_ACTION)
            .body(body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    GatewayError::Timeout {
                        timeout_ms: self.timeout_ms(),
                    }
                } else {
                    GatewayError::Transport {
                        reason: e.to_string(),
                    }
                }
            })?;

        let status = response.status();
        let text = response.text().await.map_err(|e| {
            if e.is_timeout() {
                GatewayError::Timeout {
                    timeout_ms: self.timeout_ms(),
                }
            } else {
                GatewayError::Transport {
                    reason: format!("failed to read response body: {e}"),
                }
            }
        })?;

        let soap_fault = status == StatusCode::INTERNAL_SERVER_ERROR && is_soap_fault(&text);
        if status.is_success() || soap_fault {
            return Ok(RawRegistryPayload::Xml(text));
        }

        Err(GatewayError::Unavailable {
            status: status.as_u16(),
            body: text.chars().take(BODY_EXCERPT_CHARS).collect(),
        })
    }

    fn gateway_name(&self) -> &str {
        GATEWAY_NAME
    }
}

/// SOAP 1.1 reports faults with HTTP 500 and a well-formed body holding a
/// `Fault` element.
fn is_soap_fault(body: &str) -> bool {
    RegistryNode::from_xml(body).is_ok_and(|document| document.find("Fault").is_some())
}

fn load_tls(tls: &ClientTls) -> Result<(Identity, Certificate), GatewayError> {
    let mut pem = read_pem(&tls.certificate)?;
    pem.push(b'\n');
    pem.extend_from_slice(&read_pem(&tls.private_key)?);
    let identity = Identity::from_pem(&pem).map_err(|e| certificate_error(&tls.certificate, e))?;

    let ca_pem = read_pem(&tls.ca_bundle)?;
    let ca = Certificate::from_pem(&ca_pem).map_err(|e| certificate_error(&tls.ca_bundle, e))?;

    Ok((identity, ca))
}

fn read_pem(path: &Path) -> Result<Vec<u8>, GatewayError> {
    std::fs::read(path).map_err(|e| certificate_error(path, e))
}

fn certificate_error(path: &Path, err: impl std::fmt::Display) -> GatewayError {
    GatewayError::Certificate {
        path: path.display().to_string(),
        reason: err.to_string(),
    }
}
