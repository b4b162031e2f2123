use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde_json::json;

use crate::startup::AppState;

pub async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    if let Err(e) = state.db.health_check().await {
        return (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({
                "status": "unhealthy",
                "service": "ambient-service",
                "error": e.to_string()
            })),
        );
    }

    if let Err(e) = state.push_provider.health_check().await {
        return (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({
                "status": "unhealthy",
                "service": "ambient-service",
                "error": e.to_string()
            })),
        );
    }

    (
        StatusCode::OK,
        Json(json!({
            "status": "ok",
            "service": "ambient-service",
            "version": env!("CARGO_PKG_VERSION"),
            "push_enabled": state.push_provider.is_enabled()
        })),
    )
}
