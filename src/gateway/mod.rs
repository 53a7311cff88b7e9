//! HTTP gateway (Axum) for saving and viewing shaders.
//!
//! Routes:
//! - `POST /save` → `{"id": ..}`
//! - `GET /shader/{id}` → `{"source": .., "created": ..}`
//! - `GET /healthz`, `GET /ready` → liveness / readiness probes

#![allow(missing_docs)]

pub mod error;
pub mod handler;
pub mod payload;
pub mod state;


use axum::{
    Json, Router,
    extract::{DefaultBodyLimit, State},
    http::{HeaderMap, StatusCode, header::HeaderValue},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub use error::GatewayError;
pub use handler::{save_handler, shader_handler};
pub use state::HandlerState;

use crate::cache::{
    CacheTier, SHADER_STATUS_ERROR, SHADER_STATUS_HEADER, SHADER_STATUS_HEALTHY,
    SHADER_STATUS_NOT_READY, SHADER_STATUS_READY,
};
use crate::constants::MAX_BODY_BYTES;

pub fn create_router_with_state<C>(state: HandlerState<C>) -> Router
where
    C: CacheTier + 'static,
{
    Router::new()
        .route("/healthz", get(health_handler))
        .route("/ready", get(ready_handler))
        .route("/save", post(save_handler))
        .route("/shader/{id}", get(shader_handler))
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[derive(serde::Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

#[derive(serde::Serialize)]
pub struct ReadyResponse {
    pub status: &'static str,
    pub components: ComponentStatus,
}

#[derive(serde::Serialize)]
pub struct ComponentStatus {
    pub http: &'static str,
    pub cache: &'static str,
    pub storage: &'static str,
}

#[tracing::instrument]
pub async fn health_handler() -> Response {
    let mut headers = HeaderMap::new();
    headers.insert(
        SHADER_STATUS_HEADER,
        HeaderValue::from_static(SHADER_STATUS_HEALTHY),
    );

    (
        StatusCode::OK,
        headers,
        Json(HealthResponse { status: "ok" }),
    )
        .into_response()
}

#[tracing::instrument(skip(state))]
pub async fn ready_handler<C>(State(state): State<HandlerState<C>>) -> Response
where
    C: CacheTier + 'static,
{
    let cache_status = if state.store.is_ready().await {
        SHADER_STATUS_READY
    } else {
        SHADER_STATUS_NOT_READY
    };

    let storage_status = if state.store.durable().path().is_file() {
        SHADER_STATUS_READY
    } else {
        SHADER_STATUS_ERROR
    };

    let components = ComponentStatus {
        http: SHADER_STATUS_READY,
        cache: cache_status,
        storage: storage_status,
    };

    let is_ready =
        components.cache == SHADER_STATUS_READY && components.storage == SHADER_STATUS_READY;

    let status_code = if is_ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };
    let status_msg = if is_ready { "ok" } else { "pending" };

    let mut headers = HeaderMap::new();
    headers.insert(SHADER_STATUS_HEADER, HeaderValue::from_static(status_msg));

    (
        status_code,
        headers,
        Json(ReadyResponse {
            status: status_msg,
            components,
        }),
    )
        .into_response()
}
