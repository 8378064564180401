//! Error types for AlarmWatcher

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Result type alias
pub type Result<T> = std::result::Result<T, AlarmError>;

/// Crate-wide error type
#[derive(Debug, Error)]
pub enum AlarmError {
    /// Request validation failure (missing id, malformed class, ...)
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// A record with the same id, class and state is already present
    #[error("Alarm already raised with identical class and state: {0}")]
    DuplicateAlarm(String),

    /// Storage failure
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl IntoResponse for AlarmError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            AlarmError::InvalidInput(_) => (StatusCode::BAD_REQUEST, self.to_string()),
            AlarmError::DuplicateAlarm(_) => (StatusCode::CONFLICT, self.to_string()),
            AlarmError::Database(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Database error".to_string(),
            ),
            AlarmError::Config(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Configuration error".to_string(),
            ),
            AlarmError::Internal(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal server error".to_string(),
            ),
        };

        let body = Json(json!({
            "error": message,
            "status": status.as_u16()
        }));

        (status, body).into_response()
    }
}

/// Helper to create an invalid input error
pub fn invalid_input(msg: &str) -> AlarmError {
    AlarmError::InvalidInput(msg.to_string())
}
