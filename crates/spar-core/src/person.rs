//! # Person Record and Lookup Outcome
//!
//! The flat, normalized shape every registry response is reduced to.
//! Missing fields are filled with fixed placeholders, never left empty.

use serde::{Deserialize, Serialize};

use crate::error::LookupError;

/// Placeholder when no name part is present.
pub const NAME_NOT_AVAILABLE: &str = "Name not available";

/// Placeholder for any other absent field.
pub const UNKNOWN: &str = "Unknown";

/// A normalized person record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonRecord {
    /// Given, middle, and family names joined by single spaces.
    pub name: String,
    /// Birth date as ISO `YYYY-MM-DD`, or [`UNKNOWN`] when absent or unparseable.
    pub birth_date: String,
    /// Registered (folkbokföring) address.
    pub address: Address,
    /// True only when the registry explicitly flagged the identity as protected.
    pub protected_identity: bool,
    /// Last-modified marker from the registry, or [`UNKNOWN`].
    pub last_updated: String,
}

/// A postal address. Every field falls back to [`UNKNOWN`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Address {
    /// Street line.
    pub street: String,
    /// Five-digit Swedish postal code.
    pub postal_code: String,
    /// Post town.
    pub city: String,
}

impl Default for Address {
    fn default() -> Self {
        Self {
            street: UNKNOWN.to_string(),
            postal_code: UNKNOWN.to_string(),
            city: UNKNOWN.to_string(),
        }
    }
}

/// Exactly one outcome per normalized registry response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", content = "record", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LookupOutcome {
    /// The registry returned a releasable record.
    Found(PersonRecord),
    /// The person has a protected identity.
    Protected,
    /// The registry has no record.
    NotFound,
    /// The person is registered as deceased.
    Deceased,
    /// No recognizable status signal in the response.
    Malformed,
}

impl LookupOutcome {
    /// Short label for logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Found(_) => "found",
            Self::Protected => "protected",
            Self::NotFound => "not_found",
            Self::Deceased => "deceased",
            Self::Malformed => "malformed",
        }
    }

    /// Collapse into a record or the matching [`LookupError`].
    pub fn into_result(self) -> Result<PersonRecord, LookupError> {
        match self {
            Self::Found(record) => Ok(record),
            Self::Protected => Err(LookupError::Protected),
            Self::NotFound => Err(LookupError::NotFound),
            Self::Deceased => Err(LookupError::Deceased),
            Self::Malformed => Err(LookupError::Malformed),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record() -> PersonRecord {
        PersonRecord {
            name: "Test User Testsson".into(),
            birth_date: "1990-01-16".into(),
            address: Address {
                street: "Testgatan 1".into(),
                postal_code: "12345".into(),
                city: "Stockholm".into(),
            },
            protected_identity: false,
            last_updated: "2024-01-01".into(),
        }
    }

    #[test]
    fn record_serializes_camel_case() {
        let json = serde_json::to_value(record()).expect("serialize");
        assert_eq!(json["birthDate"], "1990-01-16");
        assert_eq!(json["address"]["postalCode"], "12345");
        assert_eq!(json["protectedIdentity"], false);
        assert_eq!(json["lastUpdated"], "2024-01-01");
    }

    #[test]
    fn default_address_is_unknown() {
        let address = Address::default();
        assert_eq!(address.street, UNKNOWN);
        assert_eq!(address.postal_code, UNKNOWN);
        assert_eq!(address.city, UNKNOWN);
    }

    #[test]
    fn outcome_serialization_is_tagged() {
        let json = serde_json::to_value(LookupOutcome::Protected).expect("serialize");
        assert_eq!(json["outcome"], "PROTECTED");

        let json = serde_json::to_value(LookupOutcome::Found(record())).expect("serialize");
        assert_eq!(json["outcome"], "FOUND");
        assert_eq!(json["record"]["name"], "Test User Testsson");
    }

    #[test]
    fn into_result_maps_each_outcome() {
        assert_eq!(LookupOutcome::Found(record()).into_result(), Ok(record()));
        assert_eq!(
            LookupOutcome::Protected.into_result(),
            Err(LookupError::Protected)
        );
        assert_eq!(
            LookupOutcome::NotFound.into_result(),
            Err(LookupError::NotFound)
        );
        assert_eq!(
            LookupOutcome::Deceased.into_result(),
            Err(LookupError::Deceased)
        );
        assert_eq!(
            LookupOutcome::Malformed.into_result(),
            Err(LookupError::Malformed)
        );
    }
}
