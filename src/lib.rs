pub mod handlers;
pub mod models;
pub mod services;

use std::sync::Arc;

use axum::Router;

use models::config::AppConfig;
use services::inference::InferenceEngine;
use services::provisioner::ModelState;

/// Shared per-process state. Constructed once in `main` after the
/// provisioner has run; read-only from then on.
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub model_state: ModelState,
    pub engine: Box<dyn InferenceEngine>,
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", axum::routing::get(handlers::health::health_check))
        .route("/api/v1/edit", axum::routing::post(handlers::edit::edit_image))
        .route("/api/v1/camera-edit", axum::routing::post(handlers::edit::camera_edit))
        .route("/api/v1/models", axum::routing::get(handlers::models::list_models))
        .with_state(state)
}
