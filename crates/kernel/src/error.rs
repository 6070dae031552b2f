//! Application error types.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use thiserror::Error;

/// Application errors.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("internal server error")]
    Internal(#[from] anyhow::Error),

    #[error("not found")]
    NotFound,

    #[error("{message}")]
    Validation {
        message: String,
        details: Vec<String>,
    },

    #[error("database error")]
    Database(#[from] sqlx::Error),
}

impl AppError {
    /// Build a validation error carrying the complete error list.
    pub fn validation(message: impl Into<String>, details: Vec<String>) -> Self {
        Self::Validation {
            message: message.into(),
            details,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            AppError::Internal(_) | AppError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::NotFound => StatusCode::NOT_FOUND,
            AppError::Validation { .. } => StatusCode::BAD_REQUEST,
        };

        // Server-side failures are logged in full and answered vaguely;
        // validation failures carry their details to the client.
        match self {
            AppError::Internal(e) => {
                tracing::error!(error = %e, "internal server error");
                (status, "internal server error".to_string()).into_response()
            }
            AppError::Database(e) => {
                tracing::error!(error = %e, "database error");
                (status, "internal server error".to_string()).into_response()
            }
            AppError::Validation { message, details } => (
                status,
                Json(json!({ "error": message, "details": details })),
            )
                .into_response(),
            AppError::NotFound => (status, "not found".to_string()).into_response(),
        }
    }
}

/// Result type alias using AppError.
pub type AppResult<T> = Result<T, AppError>;
