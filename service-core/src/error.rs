use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Invalid method")]
    MethodNotAllowed,

    #[error("Bad request: {0}")]
    BadRequest(anyhow::Error),

    #[error("Malformed input: {0}")]
    MalformedInput(anyhow::Error),

    #[error("Push error: {0}")]
    PushError(String),

    #[error("Database error: {0}")]
    DatabaseError(anyhow::Error),

    #[error("Configuration error: {0}")]
    ConfigError(anyhow::Error),

    #[error("Internal server error: {0}")]
    InternalError(#[from] anyhow::Error),
}

impl From<config::ConfigError> for AppError {
    fn from(err: config::ConfigError) -> Self {
        AppError::ConfigError(anyhow::Error::new(err))
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::InternalError(anyhow::Error::new(err))
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        #[derive(Serialize)]
        struct ErrorResponse {
            error: String,
        }

        // Upstream detail is logged server-side; response bodies stay minimal.
        let (status, error_message) = match self {
            AppError::MethodNotAllowed => {
                return (StatusCode::BAD_REQUEST, "Invalid Method").into_response();
            }
            AppError::BadRequest(err) => (StatusCode::BAD_REQUEST, err.to_string()),
            AppError::MalformedInput(err) => {
                tracing::error!("Malformed input: {}", err);
                (StatusCode::BAD_REQUEST, "Malformed input".to_string())
            }
            AppError::PushError(msg) => {
                tracing::error!("Push dispatch failed: {}", msg);
                (StatusCode::BAD_REQUEST, "Push dispatch failed".to_string())
            }
            AppError::DatabaseError(err) => {
                tracing::error!("Database error: {}", err);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Database error".to_string(),
                )
            }
            AppError::ConfigError(err) => {
                tracing::error!("Configuration error: {}", err);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Configuration error".to_string(),
                )
            }
            AppError::InternalError(err) => {
                tracing::error!("Internal server error: {:#}", err);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
        };

        (
            status,
            Json(ErrorResponse {
                error: error_message,
            }),
        )
            .into_response()
    }
}
