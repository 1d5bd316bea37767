// askpdf - upload a PDF, ask questions about its content over a realtime channel

pub mod config;
pub mod db;
pub mod extract;
pub mod llm;
pub mod models;
pub mod pipeline;
pub mod qa;
pub mod routes;
pub mod storage;
pub mod types;

// Re-exports for convenience
pub use config::Config;
pub use models::AppState;

pub fn create_router(state: AppState) -> axum::Router {
    routes::create_router(state)
}
