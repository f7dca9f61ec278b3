//! # API Error Types
//!
//! Maps lookup failures to HTTP status codes and the JSON error contract.
//!
//! | Condition | Status | `code` |
//! |---|---|---|
//! | Format / Date / Checksum | 400 | omitted (`validExamples` on Format) |
//! | Protected | 403 | `PROTECTED` |
//! | Not found | 404 | `PERSON_NOT_FOUND` |
//! | Deceased | 410 | `PERSON_DECEASED` |
//! | Gateway unavailable | 503 | `SERVICE_UNAVAILABLE` |
//! | Malformed / contract violation | 500 | `UPSTREAM_CONTRACT_VIOLATION` |
//!
//! Server-side failures are logged with their detail; the public message
//! stays generic.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use spar_core::{LookupError, ValidationError, VALID_EXAMPLES};
use thiserror::Error;
use utoipa::ToSchema;

/// JSON error response body.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ErrorBody {
    /// Human-readable message.
    pub error: String,
    /// Machine-readable code, omitted for validation errors.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    /// Accepted spellings, present only for format errors.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub valid_examples: Option<Vec<String>>,
}

/// Application-level error type that implements [`IntoResponse`] for Axum.
#[derive(Error, Debug)]
pub enum AppError {
    /// Client input failed validation (400).
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Identity is protected (403).
    #[error("Protected identity")]
    Protected,

    /// No matching record (404).
    #[error("Person not found")]
    NotFound,

    /// Person is registered as deceased (410).
    #[error("Person deceased")]
    Deceased,

    /// The registry could not be reached (503). Detail is logged only.
    #[error("registry service unavailable: {0}")]
    ServiceUnavailable(String),

    /// The registry answered with something uninterpretable (500). Detail is
    /// logged only.
    #[error("upstream contract violation: {0}")]
    UpstreamContractViolation(String),
}

impl AppError {
    /// Return the HTTP status code and machine-readable error code for this error.
    fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            Self::Validation(err) => (StatusCode::BAD_REQUEST, err.code()),
            Self::Protected => (StatusCode::FORBIDDEN, "PROTECTED"),
            Self::NotFound => (StatusCode::NOT_FOUND, "PERSON_NOT_FOUND"),
            Self::Deceased => (StatusCode::GONE, "PERSON_DECEASED"),
            Self::ServiceUnavailable(_) => (StatusCode::SERVICE_UNAVAILABLE, "SERVICE_UNAVAILABLE"),
            Self::UpstreamContractViolation(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "UPSTREAM_CONTRACT_VIOLATION",
            ),
        }
    }

    fn public_message(&self) -> String {
        match self {
            Self::ServiceUnavailable(_) => "Registry service unavailable".to_string(),
            Self::UpstreamContractViolation(_) => {
                "Registry response could not be interpreted".to_string()
            }
            other => other.to_string(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();

        if status.is_server_error() {
            tracing::error!(code, error = %self, "lookup failed");
        }

        let body = match &self {
            Self::Validation(err) => ErrorBody {
                error: err.to_string(),
                code: None,
                valid_examples: matches!(err, ValidationError::Format)
                    .then(|| VALID_EXAMPLES.iter().map(|s| s.to_string()).collect()),
            },
            other => ErrorBody {
                error: other.public_message(),
                code: Some(code.to_string()),
                valid_examples: None,
            },
        };

        (status, Json(body)).into_response()
    }
}

impl From<LookupError> for AppError {
    fn from(err: LookupError) -> Self {
        match err {
            LookupError::Invalid(e) => Self::Validation(e),
            LookupError::Protected => Self::Protected,
            LookupError::NotFound => Self::NotFound,
            LookupError::Deceased => Self::Deceased,
            LookupError::ServiceUnavailable { reason } => Self::ServiceUnavailable(reason),
            LookupError::UpstreamContractViolation { reason } => {
                Self::UpstreamContractViolation(reason)
            }
            LookupError::Malformed => {
                Self::UpstreamContractViolation(LookupError::Malformed.to_string())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;

    async fn render(err: AppError) -> (StatusCode, serde_json::Value) {
        let response = err.into_response();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn format_error_lists_valid_examples() {
        let (status, body) = render(ValidationError::Format.into()).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(
            body,
            serde_json::json!({
                "error": "Invalid personnummer format",
                "validExamples": ["900116-6959", "9001166959", "199001166959"]
            })
        );
    }

    #[tokio::test]
    async fn date_and_checksum_errors_carry_message_only() {
        let (status, body) = render(ValidationError::Date.into()).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, serde_json::json!({ "error": "Invalid date components" }));

        let (_, body) = render(ValidationError::Checksum.into()).await;
        assert_eq!(
            body,
            serde_json::json!({ "error": "Luhn checksum validation failed" })
        );
    }

    #[tokio::test]
    async fn lookup_outcomes_map_to_status_and_code() {
        let cases = [
            (LookupError::Protected, StatusCode::FORBIDDEN, "PROTECTED", "Protected identity"),
            (LookupError::NotFound, StatusCode::NOT_FOUND, "PERSON_NOT_FOUND", "Person not found"),
            (LookupError::Deceased, StatusCode::GONE, "PERSON_DECEASED", "Person deceased"),
        ];
        for (err, expected_status, expected_code, expected_message) in cases {
            let (status, body) = render(err.into()).await;
            assert_eq!(status, expected_status);
            assert_eq!(body["code"], expected_code);
            assert_eq!(body["error"], expected_message);
        }
    }

    #[tokio::test]
    async fn server_errors_hide_internal_detail() {
        let err = LookupError::ServiceUnavailable {
            reason: "connect error: 10.0.0.7:443 refused".to_string(),
        };
        let (status, body) = render(err.into()).await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(body["error"], "Registry service unavailable");
        assert_eq!(body["code"], "SERVICE_UNAVAILABLE");
        assert!(!body.to_string().contains("10.0.0.7"));

        let err = LookupError::UpstreamContractViolation {
            reason: "SOAP fault S:Server: internal".to_string(),
        };
        let (status, body) = render(err.into()).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["code"], "UPSTREAM_CONTRACT_VIOLATION");
        assert!(!body.to_string().contains("S:Server"));
    }

    #[tokio::test]
    async fn malformed_is_a_contract_violation() {
        let (status, body) = render(LookupError::Malformed.into()).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["code"], "UPSTREAM_CONTRACT_VIOLATION");
        assert!(body.get("validExamples").is_none());
    }
}
