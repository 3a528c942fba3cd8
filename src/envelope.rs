use std::collections::BTreeMap;

use axum::http::{HeaderName, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};

use crate::error::ApiError;

pub const CONTENT_TYPE_HEADER: &str = "Content-Type";
pub const CONTENT_TYPE_JSON: &str = "application/json";

/// A request as handed over by the hosting environment
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiRequest {
    pub method: String,
    pub raw_path: String,
    pub body: Option<String>,
}

impl ApiRequest {
    pub fn new(method: impl Into<String>, raw_path: impl Into<String>) -> Self {
        Self {
            method: method.into(),
            raw_path: raw_path.into(),
            body: None,
        }
    }

    pub fn with_body(mut self, body: impl Into<String>) -> Self {
        self.body = Some(body.into());
        self
    }
}

/// Uniform response shape: status code, headers and a JSON-encoded body
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Envelope {
    pub status_code: u16,
    pub headers: BTreeMap<String, String>,
    pub body: String,
}

impl Envelope {
    /// Serialize `body` as the envelope payload
    pub fn json<T: Serialize>(status: StatusCode, body: &T) -> Result<Self, ApiError> {
        let body = serde_json::to_string(body)
            .map_err(|e| ApiError::Internal(format!("Failed to serialize response: {}", e)))?;
        Ok(Self::with_body(status, body))
    }

    pub fn error(status: StatusCode, message: &str) -> Self {
        Self::with_body(status, serde_json::json!({ "error": message }).to_string())
    }

    pub fn status(&self) -> StatusCode {
        StatusCode::from_u16(self.status_code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }

    fn with_body(status: StatusCode, body: String) -> Self {
        let headers = BTreeMap::from([(
            CONTENT_TYPE_HEADER.to_string(),
            CONTENT_TYPE_JSON.to_string(),
        )]);
        Self {
            status_code: status.as_u16(),
            headers,
            body,
        }
    }
}

impl IntoResponse for Envelope {
    fn into_response(self) -> Response {
        let status = self.status();
        let mut response = (status, self.body).into_response();
        let headers = response.headers_mut();
        for (name, value) in self.headers {
            match (
                HeaderName::try_from(name.as_str()),
                HeaderValue::try_from(value.as_str()),
            ) {
                (Ok(name), Ok(value)) => {
                    headers.insert(name, value);
                }
                _ => tracing::warn!("Dropping invalid response header: {}", name),
            }
        }
        response
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::header;

    #[test]
    fn test_envelope_serializes_camel_case() {
        let envelope = Envelope::error(StatusCode::NOT_FOUND, "Item not found");
        let value = serde_json::to_value(&envelope).unwrap();

        assert_eq!(value["statusCode"], 404);
        assert_eq!(value["headers"]["Content-Type"], "application/json");
        assert_eq!(value["body"], r#"{"error":"Item not found"}"#);
    }

    #[tokio::test]
    async fn test_envelope_into_response() {
        let envelope =
            Envelope::json(StatusCode::CREATED, &serde_json::json!({"id": "1"})).unwrap();
        let response = envelope.into_response();

        assert_eq!(response.status(), StatusCode::CREATED);
        assert_eq!(
            response.headers().get(header::CONTENT_TYPE).unwrap(),
            CONTENT_TYPE_JSON
        );

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        assert_eq!(&body[..], br#"{"id":"1"}"#);
    }
}
