//! Error types for the webhook service.
//!
//! Defines custom error types with client/server classification so that
//! handler failures map to the right HTTP status.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use thiserror::Error;
use tracing::error;

/// Error type for schema validation and response assembly
#[derive(Error, Debug)]
pub enum Error {
    /// Inbound payload failed schema checks
    #[error("validation error: {0}")]
    Validation(String),

    /// Required field of a response schema was never set before build
    #[error("missing required field {field} of {schema}")]
    MissingField {
        field: &'static str,
        schema: &'static str,
    },

    /// Attempt to set a field the target schema does not declare
    #[error("{field} is not a declared field of {schema}")]
    InvalidField {
        field: String,
        schema: &'static str,
    },

    /// Serialization error
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl Error {
    /// Check if this error was caused by the client's payload rather than
    /// a defect in handler code.
    ///
    /// `MissingField` and `InvalidField` can only be produced by handler
    /// code assembling a response, so they classify as server errors.
    pub fn is_client_error(&self) -> bool {
        matches!(self, Error::Validation(_))
    }

    /// HTTP status this error surfaces as
    pub fn status_code(&self) -> StatusCode {
        if self.is_client_error() {
            StatusCode::UNPROCESSABLE_ENTITY
        } else {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            // A server-side variant means a code defect, not bad input.
            error!(error = %self, "internal error while assembling response");
        }
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}

/// Result type alias for schema and builder operations
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_is_client_error() {
        let err = Error::Validation("spec.token: missing".to_string());
        assert!(err.is_client_error());
        assert_eq!(err.status_code(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[test]
    fn test_builder_errors_are_server_errors() {
        let missing = Error::MissingField {
            field: "status",
            schema: "TokenReviewResponse",
        };
        let invalid = Error::InvalidField {
            field: "nonsense".to_string(),
            schema: "TokenReviewResponse",
        };
        assert!(!missing.is_client_error());
        assert!(!invalid.is_client_error());
        assert_eq!(missing.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(invalid.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_error_messages_name_the_field() {
        let err = Error::InvalidField {
            field: "bogus".to_string(),
            schema: "TokenReviewResponse",
        };
        assert_eq!(
            err.to_string(),
            "bogus is not a declared field of TokenReviewResponse"
        );
    }
}
