use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde_json::json;

use crate::AppState;

/// Liveness probe. Reports 503 while the store cannot answer.
pub async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    match state.store_health.health_check().await {
        Ok(()) => {
            tracing::debug!("Health check passed");
            (
                StatusCode::OK,
                Json(json!({
                    "success": true,
                    "status": "ok",
                    "service": state.config.service_name,
                    "version": state.config.service_version
                })),
            )
        }
        Err(e) => {
            tracing::warn!(error = %e, "Health check failed - store unavailable");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({
                    "success": false,
                    "status": "unhealthy",
                    "service": state.config.service_name,
                    "version": state.config.service_version
                })),
            )
        }
    }
}

/// Readiness probe for orchestrators; status code only.
pub async fn readiness_check(State(state): State<AppState>) -> StatusCode {
    match state.store_health.health_check().await {
        Ok(()) => StatusCode::OK,
        Err(e) => {
            tracing::warn!(error = %e, "Readiness check failed");
            StatusCode::SERVICE_UNAVAILABLE
        }
    }
}
