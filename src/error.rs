use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

/// Application-level errors
#[derive(thiserror::Error, Debug)]
pub enum AppError {
    #[error("HTTP client error: {0}")]
    HttpClient(#[from] reqwest::Error),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Upstream API error: {0}")]
    Upstream(String),

    #[error("Suggestion generation failed: {primary}. Fallback also failed: {fallback}")]
    GenerationFailed { primary: String, fallback: String },

    #[error("No usable suggestions: {0}")]
    EmptyResult(String),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error, message) = match self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "Not found", msg),
            AppError::InvalidInput(msg) => (StatusCode::BAD_REQUEST, "Invalid input", msg),
            AppError::Upstream(msg) => (StatusCode::BAD_GATEWAY, "Upstream API error", msg),
            AppError::HttpClient(_) => (
                StatusCode::BAD_GATEWAY,
                "Upstream API error",
                self.to_string(),
            ),
            AppError::GenerationFailed { .. } => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Suggestion generation failed",
                self.to_string(),
            ),
            AppError::EmptyResult(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "No suggestions found",
                msg,
            ),
            AppError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, "Server error", msg),
        };

        let body = Json(json!({
            "error": error,
            "message": message
        }));

        (status, body).into_response()
    }
}

pub type AppResult<T> = Result<T, AppError>;
