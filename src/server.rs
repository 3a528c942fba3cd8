//! Local HTTP server.
//!
//! Item traffic falls through to the dispatcher unchanged, so the server
//! behaves exactly like the managed host. Health and API docs are served
//! alongside.

use anyhow::Context;
use axum::{
    extract::State,
    http::{Method, Uri},
    routing::get,
    Router,
};
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::api_doc::ApiDoc;
use crate::dispatcher;
use crate::envelope::{ApiRequest, Envelope};
use crate::handlers::health_handler;
use crate::routes;
use crate::state::AppState;

pub fn create_app(state: AppState) -> Router {
    Router::new()
        .route(routes::HEALTH, get(health_handler))
        .merge(SwaggerUi::new(routes::SWAGGER_UI).url(routes::OPENAPI_JSON, ApiDoc::openapi()))
        .fallback(dispatch_handler)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn dispatch_handler(
    State(state): State<AppState>,
    method: Method,
    uri: Uri,
    body: String,
) -> Envelope {
    let mut request = ApiRequest::new(method.as_str(), uri.path());
    if !body.is_empty() {
        request = request.with_body(body);
    }
    dispatcher::dispatch(state, request).await
}

pub async fn serve(state: AppState) -> anyhow::Result<()> {
    let addr = format!("{}:{}", state.config.service_host, state.config.service_port);
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    tracing::info!("listening on {}", listener.local_addr()?);

    axum::serve(listener, create_app(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
    }
}
