//! # Person Lookup
//!
//! `GET /lookup?personnummer=<raw>` validates the identifier, performs one
//! registry call through the orchestrator and returns the normalized
//! person record. A missing parameter is treated as an empty identifier and
//! answered with the format error.

use axum::extract::rejection::QueryRejection;
use axum::extract::{Query, State};
use axum::routing::get;
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use spar_core::{Address, PersonRecord};
use utoipa::{IntoParams, ToSchema};

use crate::error::{AppError, ErrorBody};
use crate::state::AppState;

/// Query parameters for a lookup.
#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct LookupQuery {
    /// Identity number in any accepted spelling, e.g. `900116-6959`.
    pub personnummer: Option<String>,
}

/// Successful lookup response.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PersonResponse {
    /// Full name, or `Name not available`.
    pub name: String,
    /// Birth date as ISO `YYYY-MM-DD`, or `Unknown`.
    pub birth_date: String,
    /// Registered (folkbokföring) address.
    pub address: AddressResponse,
    /// True only when the registry explicitly flags the identity as protected.
    pub protected_identity: bool,
    /// Last-modified marker from the registry, or `Unknown`.
    pub last_updated: String,
}

/// Registered address.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AddressResponse {
    /// Street line, or `Unknown`.
    pub street: String,
    /// Five-digit postal code, or `Unknown`.
    pub postal_code: String,
    /// Post town, or `Unknown`.
    pub city: String,
}

impl From<Address> for AddressResponse {
    fn from(address: Address) -> Self {
        Self {
            street: address.street,
            postal_code: address.postal_code,
            city: address.city,
        }
    }
}

impl From<PersonRecord> for PersonResponse {
    fn from(record: PersonRecord) -> Self {
        Self {
            name: record.name,
            birth_date: record.birth_date,
            address: record.address.into(),
            protected_identity: record.protected_identity,
            last_updated: record.last_updated,
        }
    }
}

/// Build the lookup router.
pub fn router() -> Router<AppState> {
    Router::new().route("/lookup", get(lookup_person))
}

/// GET /lookup: Look up one person by identity number.
#[utoipa::path(
    get,
    path = "/lookup",
    params(LookupQuery),
    responses(
        (status = 200, description = "Person found", body = PersonResponse),
        (status = 400, description = "Identity number failed validation", body = ErrorBody),
        (status = 403, description = "Protected identity", body = ErrorBody),
        (status = 404, description = "Person not found", body = ErrorBody),
        (status = 410, description = "Person deceased", body = ErrorBody),
        (status = 500, description = "Registry response could not be interpreted", body = ErrorBody),
        (status = 503, description = "Registry service unavailable", body = ErrorBody),
    ),
    tag = "lookup"
)]
pub(crate) async fn lookup_person(
    State(state): State<AppState>,
    query: Result<Query<LookupQuery>, QueryRejection>,
) -> Result<Json<PersonResponse>, AppError> {
    let raw = query
        .ok()
        .and_then(|Query(q)| q.personnummer)
        .unwrap_or_default();

    let record = state.orchestrator.lookup(&raw).await?;
    Ok(Json(record.into()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn response_uses_camel_case_fields() {
        let record = PersonRecord {
            name: "Anna Svensson".to_string(),
            birth_date: "1990-01-16".to_string(),
            address: Address {
                street: "Storgatan 1".to_string(),
                postal_code: "11122".to_string(),
                city: "Stockholm".to_string(),
            },
            protected_identity: false,
            last_updated: "Unknown".to_string(),
        };
        let json = serde_json::to_value(PersonResponse::from(record)).unwrap();
        assert_eq!(json["birthDate"], "1990-01-16");
        assert_eq!(json["address"]["postalCode"], "11122");
        assert_eq!(json["protectedIdentity"], false);
        assert_eq!(json["lastUpdated"], "Unknown");
    }
}
