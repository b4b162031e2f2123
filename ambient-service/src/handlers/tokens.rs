use axum::extract::{Query, State};
use axum::http::StatusCode;
use serde::Deserialize;

use crate::models::DeviceToken;
use crate::startup::AppState;
use service_core::error::AppError;

#[derive(Debug, Deserialize)]
pub struct RegisterTokenParams {
    #[serde(default)]
    token: String,
}

/// POST /registerToken?token=<push token>
#[tracing::instrument(skip(state, params))]
pub async fn register_token(
    State(state): State<AppState>,
    Query(params): Query<RegisterTokenParams>,
) -> Result<StatusCode, AppError> {
    if params.token.is_empty() {
        return Err(AppError::BadRequest(anyhow::anyhow!("Token not provided")));
    }

    let device = DeviceToken::new(params.token);
    state.db.insert_token(&device).await?;

    tracing::info!("Device token registered");
    Ok(StatusCode::OK)
}
