//! API Routes
//!
//! - `POST /upload` - multipart PDF upload
//! - `GET /files/{id}` - fetch an uploaded PDF's bytes
//! - `GET /ws` - realtime session channel
//! - `GET /health` - liveness check

pub mod files;
pub mod health;
pub mod upload;
pub mod ws;

use crate::models::AppState;
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

/// Create the main application router
pub fn create_router(state: AppState) -> Router {
    info!("Creating application router");

    Router::new()
        .merge(upload::router(state.clone()))
        .merge(files::router(state.clone()))
        .merge(ws::router(state))
        .merge(health::router())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
}
