//! Managed function host: HTTP API (payload v2) events in, envelopes out.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use lambda_runtime::{Error, LambdaEvent, service_fn};
use serde::Deserialize;

use crate::dispatcher;
use crate::envelope::{ApiRequest, Envelope};
use crate::error::ApiError;
use crate::state::AppState;

/// The subset of an HTTP API event the dispatcher needs
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HttpApiEvent {
    pub request_context: RequestContext,
    pub raw_path: String,
    #[serde(default)]
    pub body: Option<String>,
    #[serde(default)]
    pub is_base64_encoded: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RequestContext {
    pub http: HttpDescription,
}

#[derive(Debug, Clone, Deserialize)]
pub struct HttpDescription {
    pub method: String,
}

impl HttpApiEvent {
    pub fn into_request(self) -> Result<ApiRequest, ApiError> {
        let body = match self.body {
            Some(encoded) if self.is_base64_encoded => {
                let bytes = STANDARD
                    .decode(encoded.as_bytes())
                    .map_err(|e| ApiError::InvalidBody(format!("invalid base64: {}", e)))?;
                Some(
                    String::from_utf8(bytes)
                        .map_err(|e| ApiError::InvalidBody(format!("invalid UTF-8: {}", e)))?,
                )
            }
            body => body,
        };

        Ok(ApiRequest {
            method: self.request_context.http.method,
            raw_path: self.raw_path,
            body,
        })
    }
}

pub async fn handle_event(
    state: AppState,
    event: LambdaEvent<HttpApiEvent>,
) -> Result<Envelope, Error> {
    let (payload, context) = event.into_parts();
    tracing::debug!("Handling request {}", context.request_id);

    let envelope = match payload.into_request() {
        Ok(request) => dispatcher::dispatch(state, request).await,
        Err(err) => err.into(),
    };
    Ok(envelope)
}

/// Serve invocations until the host shuts the process down
pub async fn run(state: AppState) -> Result<(), Error> {
    tracing::info!("Serving managed function invocations");
    lambda_runtime::run(service_fn(move |event: LambdaEvent<HttpApiEvent>| {
        handle_event(state.clone(), event)
    }))
    .await
}
