//! API module
//!
//! Contains HTTP request handlers for the file and user endpoints and the
//! router wiring them together.

pub mod extract;
pub mod files;
pub mod headers;
pub mod users;

use crate::state::SharedState;
use axum::{
    extract::{DefaultBodyLimit, Request},
    middleware::Next,
    response::Response,
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use std::time::Instant;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, info_span, Instrument};
use uuid::Uuid;

#[derive(Serialize)]
struct HealthResponse {
    status: String,
    version: String,
}

/// Request ID middleware - adds unique ID to each request for tracing
async fn request_id_middleware(request: Request, next: Next) -> Response {
    let request_id = Uuid::new_v4().to_string();
    let method = request.method().clone();
    let uri = request.uri().clone();
    let start = Instant::now();

    let span = info_span!(
        "request",
        request_id = %request_id,
        method = %method,
        uri = %uri,
    );

    let response = next.run(request).instrument(span).await;

    let duration = start.elapsed();
    info!(
        request_id = %request_id,
        method = %method,
        uri = %uri,
        status = %response.status().as_u16(),
        duration_ms = duration.as_millis(),
        "Request completed"
    );

    response
}

async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// Build the application router over shared state
pub fn router(state: SharedState) -> Router {
    let max_upload_bytes = state.config.uploads.max_upload_bytes;

    Router::new()
        .route("/api/health", get(health_check))
        // File resource
        .route(
            "/api/files",
            get(files::list_files).put(files::update_file),
        )
        .route("/api/files/single-file", post(files::create_file))
        .route("/api/files/multiple-files", post(files::create_files))
        .route("/api/files/download/:id", get(files::download_file))
        .route(
            "/api/files/:id",
            get(files::get_file).delete(files::delete_file),
        )
        // User lookup for the owner field
        .route("/api/users", get(users::list_users))
        .layer(DefaultBodyLimit::max(max_upload_bytes))
        // Middleware (order matters - request_id should be first)
        .layer(axum::middleware::from_fn(request_id_middleware))
        .layer(
            TraceLayer::new_for_http().make_span_with(|request: &axum::http::Request<_>| {
                tracing::info_span!(
                    "http_request",
                    method = %request.method(),
                    uri = %request.uri(),
                )
            }),
        )
        .layer(CorsLayer::permissive()) // Allow CORS for development
        .with_state(state)
}
