use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

/// Shown when submitting without a file
pub const NO_FILE_MESSAGE: &str = "Please select a file first.";

/// Shown when a failure carries nothing more specific
pub const FALLBACK_MESSAGE: &str = "Something went wrong";

/// Application-level errors
#[derive(thiserror::Error, Debug)]
pub enum AppError {
    #[error("Please select a file first.")]
    NoFileSelected,

    #[error("Recommendation service returned status {status}")]
    Service {
        status: u16,
        detail: Option<String>,
    },

    #[error("HTTP client error: {0}")]
    HttpClient(#[from] reqwest::Error),

    #[error("Failed to parse response: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl AppError {
    /// The message displayed inline on the form
    pub fn user_message(&self) -> String {
        match self {
            AppError::NoFileSelected => NO_FILE_MESSAGE.to_string(),
            AppError::Service {
                detail: Some(detail),
                ..
            } => detail.clone(),
            AppError::InvalidInput(msg) => msg.clone(),
            AppError::Service { detail: None, .. }
            | AppError::HttpClient(_)
            | AppError::Parse(_)
            | AppError::Internal(_) => FALLBACK_MESSAGE.to_string(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            AppError::NoFileSelected | AppError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            AppError::Service { .. } | AppError::HttpClient(_) | AppError::Parse(_) => {
                StatusCode::BAD_GATEWAY
            }
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = Json(json!({
            "error": self.user_message()
        }));

        (status, body).into_response()
    }
}

pub type AppResult<T> = Result<T, AppError>;
