//! API Module
//!
//! HTTP API layer of the generation server.

pub mod error;
pub mod generate;
pub mod health;

use axum::{
    Router,
    routing::{get, post},
};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::config::StorageConfig;
use crate::service::GenerationService;

/// Create the main API router with all endpoints
///
/// Published videos are served from the artifact directory under the
/// configured public prefix.
pub fn create_router(service: Arc<GenerationService>, storage: &StorageConfig) -> Router {
    Router::new()
        // Health check
        .route("/health", get(health::health_check))
        // Step-by-step generation
        .route("/api/generate-video/prepare", post(generate::prepare))
        .route("/api/generate-video/storyboard", post(generate::storyboard))
        .route("/api/generate-video/code", post(generate::code))
        .route("/api/generate-video/render", post(generate::render))
        // One-shot generation
        .route("/api/generate-video", post(generate::generate))
        // Add state and middleware
        .with_state(service)
        .nest_service(
            &storage.public_prefix,
            ServeDir::new(&storage.artifact_dir),
        )
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}
