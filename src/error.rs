use axum::http::StatusCode;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::envelope::Envelope;
use crate::models::FieldError;
use crate::store::StoreError;

/// Error response type
#[derive(Serialize, Deserialize, utoipa::ToSchema)]
pub struct ErrorResponse {
    pub error: String,
}

/// Response type for health check endpoint
#[derive(Serialize, Deserialize, utoipa::ToSchema)]
pub struct HealthResponse {
    pub status: String,
}

/// Response type for unhealthy status
#[derive(Serialize, Deserialize, utoipa::ToSchema)]
pub struct UnhealthyResponse {
    pub status: String,
    pub error: String,
}

/// Error type for item operations
///
/// Every variant maps to one HTTP status and renders as the uniform
/// `{"error": "<message>"}` envelope.
#[derive(Debug, Error)]
pub enum ApiError {
    /// No entry in the routing table matched
    #[error("Endpoint not found: {method} {path}")]
    RouteNotFound { method: String, path: String },
    /// Missing or mistyped item field
    #[error("{0}")]
    Validation(String),
    /// Body that is not a JSON object
    #[error("Invalid request body: {0}")]
    InvalidBody(String),
    /// Referenced item is absent
    #[error("Item not found")]
    ItemNotFound,
    /// Store call failed; `operation` prefixes the message
    #[error("{operation}: {source}")]
    Store {
        operation: &'static str,
        #[source]
        source: StoreError,
    },
    /// Failure escaping an operation
    #[error("Internal server error: {0}")]
    Internal(String),
}

impl ApiError {
    /// Wrap a store failure, turning a missing key into `ItemNotFound`
    pub fn from_store(operation: &'static str, err: StoreError) -> Self {
        match err {
            StoreError::NotFound { .. } => ApiError::ItemNotFound,
            source => ApiError::Store { operation, source },
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::RouteNotFound { .. } | ApiError::ItemNotFound => StatusCode::NOT_FOUND,
            ApiError::Validation(_) | ApiError::InvalidBody(_) => StatusCode::BAD_REQUEST,
            ApiError::Store { .. } | ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<FieldError> for ApiError {
    fn from(err: FieldError) -> Self {
        ApiError::Validation(err.to_string())
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        ApiError::InvalidBody(err.to_string())
    }
}

impl From<ApiError> for Envelope {
    fn from(err: ApiError) -> Self {
        Envelope::error(err.status(), &err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_route_not_found_names_method_and_path() {
        let err = ApiError::RouteNotFound {
            method: "PATCH".to_string(),
            path: "/items".to_string(),
        };
        assert_eq!(err.status(), StatusCode::NOT_FOUND);
        assert_eq!(err.to_string(), "Endpoint not found: PATCH /items");
    }

    #[test]
    fn test_store_not_found_becomes_item_not_found() {
        let err = ApiError::from_store(
            "Failed to update item",
            StoreError::NotFound { id: "x".to_string() },
        );
        assert!(matches!(err, ApiError::ItemNotFound));
        assert_eq!(err.to_string(), "Item not found");
    }

    #[test]
    fn test_store_failure_is_prefixed() {
        let err = ApiError::from_store(
            "Failed to retrieve items",
            StoreError::QueryFailed("throttled".to_string()),
        );
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.to_string(), "Failed to retrieve items: Query failed: throttled");
    }

    #[test]
    fn test_field_error_is_bad_request() {
        let err: ApiError = FieldError::NotAString("name").into();
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_error_envelope_body() {
        let envelope: Envelope = ApiError::ItemNotFound.into();
        assert_eq!(envelope.status_code, 404);
        let body: ErrorResponse = serde_json::from_str(&envelope.body).unwrap();
        assert_eq!(body.error, "Item not found");
    }
}
