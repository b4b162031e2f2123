use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use chrono::Utc;
use serde::Deserialize;

use crate::models::{local_hour, truncate_centi, TemperatureSlot};
use crate::startup::AppState;
use service_core::error::AppError;

#[derive(Debug, Clone, Copy, Default, Deserialize)]
#[serde(default)]
pub struct WriteTempRequest {
    pub avg_temperature: f64,
    pub adj_temperature: f64,
}

/// POST /writeTemp. Overwrites the log slot for the current site-local hour;
/// the other 23 slots are untouched.
#[tracing::instrument(skip(state, body))]
pub async fn write_temp(
    State(state): State<AppState>,
    body: Result<Json<WriteTempRequest>, JsonRejection>,
) -> Result<StatusCode, AppError> {
    let Json(reading) = body.map_err(|e| AppError::MalformedInput(anyhow::anyhow!("{}", e)))?;

    let hour = local_hour(Utc::now());
    let slot = TemperatureSlot {
        avg_temperature: truncate_centi(reading.avg_temperature),
        adj_temperature: truncate_centi(reading.adj_temperature),
    };
    state.db.write_hour_slot(hour, slot).await?;

    tracing::info!(
        hour,
        avg = slot.avg_temperature,
        adj = slot.adj_temperature,
        "Hourly temperature slot written"
    );
    Ok(StatusCode::OK)
}
