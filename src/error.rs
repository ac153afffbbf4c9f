use axum::{Json, http::StatusCode, response::IntoResponse};
use serde::Serialize;
use sqlx::Error as SqlxError;
use std::path::PathBuf;
use thiserror::Error as ThisError;

#[derive(Debug, ThisError)]
pub enum VaxError {
    #[error("username already exists")]
    DuplicateUsername,

    #[error("invalid username or password")]
    InvalidCredentials,

    #[error("password confirmation does not match")]
    PasswordMismatch,

    #[error("dataset source not found: {0}")]
    SourceNotFound(PathBuf),

    #[error("dataset schema mismatch: {0}")]
    SchemaMismatch(String),

    #[error("insufficient data: model order requires {required} points, series has {actual}")]
    InsufficientData { required: usize, actual: usize },

    #[error("model fit did not converge: {0}")]
    NonConvergence(String),

    #[error("Database error: {0}")]
    Database(#[from] SqlxError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl IntoResponse for VaxError {
    fn into_response(self) -> axum::response::Response {
        let (status, code) = match &self {
            VaxError::DuplicateUsername => (StatusCode::CONFLICT, "DUPLICATE_USERNAME"),
            VaxError::InvalidCredentials => (StatusCode::UNAUTHORIZED, "INVALID_CREDENTIALS"),
            VaxError::PasswordMismatch => (StatusCode::BAD_REQUEST, "PASSWORD_MISMATCH"),
            VaxError::SourceNotFound(_) => (StatusCode::NOT_FOUND, "SOURCE_NOT_FOUND"),
            VaxError::SchemaMismatch(_) => (StatusCode::UNPROCESSABLE_ENTITY, "SCHEMA_MISMATCH"),
            VaxError::InsufficientData { .. } => {
                (StatusCode::UNPROCESSABLE_ENTITY, "INSUFFICIENT_DATA")
            }
            VaxError::NonConvergence(_) => (StatusCode::UNPROCESSABLE_ENTITY, "NON_CONVERGENCE"),
            VaxError::Json(_) => (StatusCode::BAD_REQUEST, "BAD_REQUEST"),
            VaxError::Database(_) | VaxError::Io(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR")
            }
        };

        // Internal failures keep their detail out of the response body.
        let message = match &self {
            VaxError::Database(_) | VaxError::Io(_) => {
                "An internal server error occurred.".to_string()
            }
            other => other.to_string(),
        };

        let body = ApiErrorBody {
            code: code.to_string(),
            message,
        };
        (status, Json(ApiErrorResponse { error: body })).into_response()
    }
}

/// Standardized API error response body
#[derive(Serialize)]
pub struct ApiErrorBody {
    pub code: String,
    pub message: String,
}

#[derive(Serialize)]
pub struct ApiErrorResponse {
    pub error: ApiErrorBody,
}
