use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;

use crate::models::{AmbientReading, NotificationPayload};
use crate::startup::AppState;
use service_core::error::AppError;

/// POST /sendAll with an ambient reading body. Derives the alert and fans it
/// out to every registered device as one batch.
#[tracing::instrument(skip(state, body))]
pub async fn send_all(
    State(state): State<AppState>,
    body: Result<Json<AmbientReading>, JsonRejection>,
) -> Result<StatusCode, AppError> {
    let Json(reading) = body.map_err(|e| AppError::MalformedInput(anyhow::anyhow!("{}", e)))?;

    let tokens = state.db.list_tokens().await?;
    let payload = NotificationPayload::from_reading(&reading);

    // The batch goes out even with zero registered tokens.
    state
        .push_provider
        .send_batch(&tokens, &payload)
        .await
        .map_err(|e| AppError::PushError(e.to_string()))?;

    tracing::info!(
        recipients = tokens.len(),
        kind = ?payload.kind,
        "Ambient alert dispatched"
    );
    Ok(StatusCode::OK)
}
