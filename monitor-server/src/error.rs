//! Error handling

use axum::{
    response::{IntoResponse, Response},
    http::StatusCode,
    Json,
};
use serde_json::json;

use bagwatch_core::EngineError;

pub type AppResult<T> = Result<T, AppError>;

#[derive(Debug)]
pub enum AppError {
    // Resource errors
    NotFound(String),

    // Model errors
    PredictorError(String),

    // Scoring errors (schema drift, ledger I/O)
    EngineError(String),

    // Generic errors
    InternalError(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match &self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg.as_str()),
            AppError::PredictorError(msg) => {
                tracing::error!("Predictor error: {}", msg);
                (StatusCode::BAD_GATEWAY, "Health model unavailable")
            }
            AppError::EngineError(msg) => {
                tracing::error!("Engine error: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, "Scoring failed")
            }
            AppError::InternalError(msg) => {
                tracing::error!("Internal error: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
            }
        };

        let body = Json(json!({
            "error": error_message,
            "status": status.as_u16()
        }));

        (status, body).into_response()
    }
}

impl From<EngineError> for AppError {
    fn from(err: EngineError) -> Self {
        match err {
            EngineError::Predictor { .. } => AppError::PredictorError(err.to_string()),
            EngineError::UnknownBag(bag_id) => AppError::NotFound(format!("Unknown bag {}", bag_id)),
            other => AppError::EngineError(other.to_string()),
        }
    }
}

impl From<tokio::task::JoinError> for AppError {
    fn from(err: tokio::task::JoinError) -> Self {
        AppError::InternalError(err.to_string())
    }
}
