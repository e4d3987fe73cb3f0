use axum::Json;
use serde::Serialize;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub service: String,
}

/// Liveness probe. Deliberately independent of model state: the service
/// is healthy even when provisioning left it with no model.
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        service: "qwen-api".to_string(),
    })
}
