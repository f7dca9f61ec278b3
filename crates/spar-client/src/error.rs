//! Registry gateway error types.

/// Errors from a registry gateway call.
///
/// Every variant is a transport-level failure. Payloads that arrive but
/// cannot be interpreted are not gateway errors; they surface from
/// normalization instead.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GatewayError {
    /// The gateway has no usable configuration.
    #[error("registry gateway not configured: {0}")]
    NotConfigured(#[from] super::config::ConfigError),

    /// A client certificate, key, or CA bundle could not be loaded.
    #[error("failed to load TLS material from {path}: {reason}")]
    Certificate {
        /// File that failed to load.
        path: String,
        /// Underlying I/O or PEM error.
        reason: String,
    },

    /// The request could not be sent or the response body could not be read.
    #[error("registry transport error: {reason}")]
    Transport {
        /// Underlying `reqwest` error text.
        reason: String,
    },

    /// The request exceeded the configured timeout.
    #[error("registry request exceeded the {timeout_ms}ms timeout")]
    Timeout {
        /// Configured timeout in milliseconds.
        timeout_ms: u64,
    },

    /// The registry answered with a non-success status and no SOAP body.
    #[error("registry returned HTTP {status}: {body}")]
    Unavailable {
        /// HTTP status code.
        status: u16,
        /// Response body excerpt.
        body: String,
    },

    /// The request envelope could not be serialized.
    #[error("failed to build request envelope: {reason}")]
    Envelope {
        /// Writer error text.
        reason: String,
    },
}
