//! Request dispatch: path normalization, route matching and the outermost
//! failure boundary.
//!
//! Both hosting surfaces hand an [`ApiRequest`] to [`dispatch`] and get an
//! [`Envelope`] back. `dispatch` never fails: every error, including a panic
//! inside an operation, becomes an error envelope.

use std::any::Any;

use serde_json::{Map, Value as JsonValue};

use crate::envelope::{ApiRequest, Envelope};
use crate::error::ApiError;
use crate::handlers;
use crate::routes;
use crate::state::AppState;

/// One entry of the routing table
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    List,
    Create,
    Get(String),
    Update(String),
    Delete(String),
}

/// Canonicalize a raw path.
///
/// Leading and trailing slashes are dropped, a first segment naming a
/// deployment stage is removed, and the rest is rejoined under a single `/`.
pub fn normalize_path(raw_path: &str, stage_names: &[String]) -> String {
    let mut segments: Vec<&str> = raw_path.trim_matches('/').split('/').collect();
    if segments
        .first()
        .is_some_and(|first| stage_names.iter().any(|stage| stage == first))
    {
        segments.remove(0);
    }
    format!("/{}", segments.join("/"))
}

/// Match a method and canonical path against the routing table
pub fn match_route(method: &str, path: &str) -> Option<Route> {
    if path == routes::ITEMS {
        return match method {
            "GET" => Some(Route::List),
            "POST" => Some(Route::Create),
            _ => None,
        };
    }

    if !path.starts_with(routes::ITEM_PREFIX) {
        return None;
    }
    // the id is the last segment
    let id = path.rsplit('/').next().unwrap_or_default().to_string();
    match method {
        "GET" => Some(Route::Get(id)),
        "PUT" => Some(Route::Update(id)),
        "DELETE" => Some(Route::Delete(id)),
        _ => None,
    }
}

/// Parse a request body into a JSON object; an absent or blank body is `{}`
pub fn parse_body(body: Option<&str>) -> Result<Map<String, JsonValue>, ApiError> {
    let text = body.map(str::trim).unwrap_or_default();
    if text.is_empty() {
        return Ok(Map::new());
    }
    match serde_json::from_str::<JsonValue>(text)? {
        JsonValue::Object(map) => Ok(map),
        other => Err(ApiError::InvalidBody(format!(
            "expected a JSON object, got {}",
            json_kind(&other)
        ))),
    }
}

/// Handle one request end to end
pub async fn dispatch(state: AppState, request: ApiRequest) -> Envelope {
    let path = normalize_path(&request.raw_path, &state.config.stage_names);
    tracing::debug!(
        "Method={}, RawPath={}, CleanPath={}",
        request.method,
        request.raw_path,
        path
    );

    // A spawned task turns a panicking operation into a JoinError
    let outcome = tokio::spawn(route(state, request.method, path, request.body)).await;

    let result = match outcome {
        Ok(result) => result,
        Err(join_error) => Err(ApiError::Internal(join_error_message(join_error))),
    };

    match result {
        Ok(envelope) => envelope,
        Err(err) => {
            if err.status().is_server_error() {
                tracing::error!("Error: {}", err);
            }
            err.into()
        }
    }
}

async fn route(
    state: AppState,
    method: String,
    path: String,
    body: Option<String>,
) -> Result<Envelope, ApiError> {
    let store = state.store.as_ref();
    match match_route(&method, &path) {
        Some(Route::List) => handlers::list_items(store).await,
        Some(Route::Create) => handlers::create_item(store, parse_body(body.as_deref())?).await,
        Some(Route::Get(id)) => handlers::get_item(store, &id).await,
        Some(Route::Update(id)) => {
            handlers::update_item(store, &id, parse_body(body.as_deref())?).await
        }
        Some(Route::Delete(id)) => handlers::delete_item(store, &id).await,
        None => {
            tracing::info!("No matching route for {} {}", method, path);
            Err(ApiError::RouteNotFound { method, path })
        }
    }
}

fn join_error_message(join_error: tokio::task::JoinError) -> String {
    if !join_error.is_panic() {
        return join_error.to_string();
    }
    let payload: Box<dyn Any + Send> = join_error.into_panic();
    if let Some(message) = payload.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "operation panicked".to_string()
    }
}

fn json_kind(value: &JsonValue) -> &'static str {
    match value {
        JsonValue::Null => "null",
        JsonValue::Bool(_) => "a boolean",
        JsonValue::Number(_) => "a number",
        JsonValue::String(_) => "a string",
        JsonValue::Array(_) => "an array",
        JsonValue::Object(_) => "an object",
    }
}
