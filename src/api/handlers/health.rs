use axum::Json;
use serde::Serialize;

/// Liveness payload
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub message: &'static str,
}

/// Health check endpoint
///
/// GET /health
/// GET /ping
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse { message: "ok" })
}
