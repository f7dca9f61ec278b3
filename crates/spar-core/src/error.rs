//! # Error Hierarchy
//!
//! Structured error types for the lookup pipeline, built with `thiserror`.
//!
//! - [`ValidationError`]: the caller supplied a bad identity number. Always a
//!   client fault, detected before any network traffic.
//! - [`PayloadError`]: the registry answered with something that could not
//!   be parsed into a tree at all.
//! - [`LookupError`]: every way a lookup can end without a person record.

use thiserror::Error;

/// Reasons a raw identity number is rejected.
///
/// The three kinds are distinct user-facing reasons and are never merged.
/// The `Display` text is the exact message returned to API callers.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValidationError {
    /// Not 10 or 12 digits after stripping separators.
    #[error("Invalid personnummer format")]
    Format,

    /// Month or (de-offset) day does not form a real calendar date.
    #[error("Invalid date components")]
    Date,

    /// Luhn check over the ten rightmost digits failed.
    #[error("Luhn checksum validation failed")]
    Checksum,
}

impl ValidationError {
    /// Stable machine-readable code for logs and tooling.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Format => "INVALID_FORMAT",
            Self::Date => "INVALID_DATE",
            Self::Checksum => "INVALID_CHECKSUM",
        }
    }
}

/// The registry payload could not be turned into a tree.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PayloadError {
    /// The payload carried no content.
    #[error("registry payload is empty")]
    Empty,

    /// The payload is not well-formed XML.
    #[error("registry payload is not well-formed XML: {reason}")]
    Xml {
        /// Parser diagnostic, including the byte position when known.
        reason: String,
    },

    /// The JSON payload does not have a usable shape.
    #[error("registry payload JSON is unusable: {reason}")]
    Json {
        /// Why the JSON tree was rejected.
        reason: String,
    },

    /// The registry answered with a SOAP fault instead of a search result.
    #[error("registry returned SOAP fault {code}: {message}")]
    SoapFault {
        /// The `faultcode` element, or `"unknown"`.
        code: String,
        /// The `faultstring` element, or `"unknown"`.
        message: String,
    },
}

/// Every way a lookup can end without a person record.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LookupError {
    /// The identity number was rejected before any registry call.
    #[error(transparent)]
    Invalid(#[from] ValidationError),

    /// The registry has no record for the identity number.
    #[error("Person not found")]
    NotFound,

    /// The person has a protected identity.
    #[error("Protected identity")]
    Protected,

    /// The person is registered as deceased.
    #[error("Person deceased")]
    Deceased,

    /// The registry gateway could not be reached or is not configured.
    #[error("registry service unavailable: {reason}")]
    ServiceUnavailable {
        /// Transport-level diagnostic. Logged, never returned to callers.
        reason: String,
    },

    /// The registry payload could not be parsed.
    #[error("upstream contract violation: {reason}")]
    UpstreamContractViolation {
        /// Parser diagnostic. Logged, never returned to callers.
        reason: String,
    },

    /// The registry payload parsed but carried no recognizable status.
    #[error("registry response carried no recognizable status")]
    Malformed,
}

impl LookupError {
    /// Stable machine-readable code.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Invalid(err) => err.code(),
            Self::NotFound => "PERSON_NOT_FOUND",
            Self::Protected => "PROTECTED",
            Self::Deceased => "PERSON_DECEASED",
            Self::ServiceUnavailable { .. } => "SERVICE_UNAVAILABLE",
            Self::UpstreamContractViolation { .. } | Self::Malformed => {
                "UPSTREAM_CONTRACT_VIOLATION"
            }
        }
    }
}

impl From<PayloadError> for LookupError {
    fn from(err: PayloadError) -> Self {
        Self::UpstreamContractViolation {
            reason: err.to_string(),
        }
    }
}
