//! # Registry Response Normalization
//!
//! Turns a raw registry payload (SOAP XML or a JSON rendition of it) into
//! exactly one [`LookupOutcome`].
//!
//! ## Pipeline
//!
//! 1. Parse the payload into a [`RegistryNode`] tree.
//! 2. A SOAP `Fault` anywhere in the tree is a [`PayloadError::SoapFault`].
//! 3. Locate the person record (`PersonsokningSvarspost`, first occurrence).
//!    Payloads without one are resolved against the document as a whole.
//! 4. Resolve the status with the ordered rule table in [`status`].
//! 5. For `Found`, map fields with placeholders for anything absent.
//!
//! No silent success: a payload with no recognizable status signal is
//! [`LookupOutcome::Malformed`].

pub mod mapping;
pub mod status;
pub mod tree;

use serde_json::Value;

use crate::error::PayloadError;
use crate::person::LookupOutcome;

pub use status::RegistryStatus;
pub use tree::RegistryNode;

/// Element wrapping one person record in a search response.
pub const RECORD_ELEMENT: &str = "PersonsokningSvarspost";

/// SOAP fault element.
const FAULT_ELEMENT: &str = "Fault";

/// A registry response as received from the gateway.
#[derive(Debug, Clone, PartialEq)]
pub enum RawRegistryPayload {
    /// SOAP envelope text.
    Xml(String),
    /// A JSON rendition of the same document.
    Json(Value),
}

impl RawRegistryPayload {
    /// Parse into the tolerant tree.
    pub fn parse(&self) -> Result<RegistryNode, PayloadError> {
        match self {
            Self::Xml(text) => RegistryNode::from_xml(text),
            Self::Json(value) => RegistryNode::from_json(value),
        }
    }
}

/// Normalize a raw payload into one outcome.
pub fn normalize(payload: &RawRegistryPayload) -> Result<LookupOutcome, PayloadError> {
    let document = payload.parse()?;
    if let Some(fault) = document.find(FAULT_ELEMENT) {
        return Err(soap_fault(fault));
    }
    Ok(normalize_document(&document))
}

/// Resolve an already parsed document.
pub fn normalize_document(document: &RegistryNode) -> LookupOutcome {
    let record = document.find(RECORD_ELEMENT).unwrap_or(document);
    match status::resolve(record) {
        Some(RegistryStatus::Found) => LookupOutcome::Found(mapping::person_record(record)),
        Some(RegistryStatus::Protected) => LookupOutcome::Protected,
        Some(RegistryStatus::Deceased) => LookupOutcome::Deceased,
        Some(RegistryStatus::NotFound) => LookupOutcome::NotFound,
        None => LookupOutcome::Malformed,
    }
}

fn soap_fault(fault: &RegistryNode) -> PayloadError {
    let field = |name: &str| {
        fault
            .find(name)
            .and_then(RegistryNode::text)
            .unwrap_or("unknown")
            .to_string()
    };
    PayloadError::SoapFault {
        code: field("faultcode"),
        message: field("faultstring"),
    }
}
