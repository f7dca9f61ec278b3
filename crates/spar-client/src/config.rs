//! SPAR gateway configuration.
//!
//! Loaded from environment variables at startup. Client certificates live in
//! a single directory under fixed file names. Override via explicit
//! construction for testing.

use std::path::{Path, PathBuf};

use url::Url;
use zeroize::Zeroizing;

/// Default directory holding the client certificate material.
pub const DEFAULT_CERT_DIR: &str = "./certs";

/// Default `SlutAnvandarId` sent with every request.
pub const DEFAULT_END_USER_ID: &str = "spar-lookup";

/// Default outbound request timeout.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

const CERT_FILE: &str = "bolag-a.crt";
const KEY_FILE: &str = "bolag-a.key";
const CA_FILE: &str = "bolag-a.pem";

/// Configuration for the SPAR registry gateway.
///
/// Custom `Debug` implementation redacts the `assignment_id` field, which
/// doubles as the WS-Security password.
#[derive(Clone)]
pub struct SparConfig {
    /// SOAP endpoint of the person-search service.
    pub endpoint: Url,
    /// Customer number (`KundNrLeveransMottagare` / `KundNrSlutkund`), also
    /// the WS-Security username.
    pub customer_number: String,
    /// Assignment id (`UppdragId`), also the WS-Security password.
    /// Zeroized on drop.
    pub assignment_id: Zeroizing<String>,
    /// End-user id (`SlutAnvandarId`).
    pub end_user_id: String,
    /// Client certificate material. `None` sends requests without a client
    /// identity (plain HTTP test servers).
    pub tls: Option<ClientTls>,
    /// Accept invalid server certificates. Only ever true outside production.
    pub accept_invalid_certs: bool,
    /// Request timeout in seconds.
    pub timeout_secs: u64,
}

impl std::fmt::Debug for SparConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SparConfig")
            .field("endpoint", &self.endpoint.as_str())
            .field("customer_number", &self.customer_number)
            .field("assignment_id", &"[REDACTED]")
            .field("end_user_id", &self.end_user_id)
            .field("tls", &self.tls)
            .field("accept_invalid_certs", &self.accept_invalid_certs)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

/// Paths to the PEM files used for mutual TLS.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientTls {
    /// Client certificate chain.
    pub certificate: PathBuf,
    /// Client private key.
    pub private_key: PathBuf,
    /// CA bundle trusted for the registry's server certificate.
    pub ca_bundle: PathBuf,
}

impl ClientTls {
    /// The fixed file layout inside a certificate directory.
    pub fn from_dir(dir: impl AsRef<Path>) -> Self {
        let dir = dir.as_ref();
        Self {
            certificate: dir.join(CERT_FILE),
            private_key: dir.join(KEY_FILE),
            ca_bundle: dir.join(CA_FILE),
        }
    }
}

impl SparConfig {
    /// Load configuration from environment variables.
    ///
    /// Variables:
    /// - `SPAR_ENDPOINT` (required)
    /// - `SPAR_CUSTOMER_NUMBER` (required)
    /// - `SPAR_ASSIGNMENT_ID` (required)
    /// - `SPAR_CERT_DIR` (default: `./certs`)
    /// - `SPAR_END_USER_ID` (default: `spar-lookup`)
    /// - `SPAR_TIMEOUT_SECS` (default: 30)
    /// - `APP_ENV` (default: `development`; invalid server certificates are
    ///   accepted unless this is `production`)
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_vars(|var| std::env::var(var).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    pub fn from_vars<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |var: &str| {
            lookup(var)
                .filter(|value| !value.trim().is_empty())
                .ok_or_else(|| ConfigError::Missing(var.to_string()))
        };

        let endpoint_raw = required("SPAR_ENDPOINT")?;
        let endpoint = Url::parse(&endpoint_raw)
            .map_err(|e| ConfigError::InvalidUrl("SPAR_ENDPOINT".to_string(), e.to_string()))?;

        let timeout_secs = match lookup("SPAR_TIMEOUT_SECS") {
            Some(raw) => raw
                .trim()
                .parse::<u64>()
                .ok()
                .filter(|secs| *secs > 0)
                .ok_or_else(|| {
                    ConfigError::InvalidNumber("SPAR_TIMEOUT_SECS".to_string(), raw.clone())
                })?,
            None => DEFAULT_TIMEOUT_SECS,
        };

        let cert_dir = lookup("SPAR_CERT_DIR").unwrap_or_else(|| DEFAULT_CERT_DIR.to_string());
        let environment = lookup("APP_ENV").unwrap_or_else(|| "development".to_string());

        Ok(Self {
            endpoint,
            customer_number: required("SPAR_CUSTOMER_NUMBER")?,
            assignment_id: Zeroizing::new(required("SPAR_ASSIGNMENT_ID")?),
            end_user_id: lookup("SPAR_END_USER_ID")
                .unwrap_or_else(|| DEFAULT_END_USER_ID.to_string()),
            tls: Some(ClientTls::from_dir(cert_dir)),
            accept_invalid_certs: environment != "production",
            timeout_secs,
        })
    }

    /// Create a configuration pointing at a local mock server (for testing).
    ///
    /// No client identity, no relaxed certificate checks, 5 second timeout.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidUrl` if `endpoint` cannot be parsed.
    pub fn local_mock(endpoint: &str) -> Result<Self, ConfigError> {
        Ok(Self {
            endpoint: Url::parse(endpoint)
                .map_err(|e| ConfigError::InvalidUrl(endpoint.to_string(), e.to_string()))?,
            customer_number: "500243".to_string(),
            assignment_id: Zeroizing::new("637".to_string()),
            end_user_id: DEFAULT_END_USER_ID.to_string(),
            tls: None,
            accept_invalid_certs: false,
            timeout_secs: 5,
        })
    }
}

/// Configuration errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    /// A required variable is unset or blank.
    #[error("{0} environment variable is required")]
    Missing(String),
    /// A URL variable does not parse.
    #[error("invalid URL for {0}: {1}")]
    InvalidUrl(String, String),
    /// A numeric variable does not parse or is out of range.
    #[error("invalid number for {0}: {1}")]
    InvalidNumber(String, String),
}
