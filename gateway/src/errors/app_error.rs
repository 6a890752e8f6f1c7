use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

use super::auth_error::AuthError;
use crate::auth::UserStoreError;
use crate::core::generation::GenerationError;
use crate::core::tts::TTSError;

pub type AppResult<T> = Result<T, AppError>;

/// Errors surfaced to API clients as `{"error": ...}` with a status code
#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    Validation(String),

    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error(transparent)]
    Users(#[from] UserStoreError),

    #[error(transparent)]
    Generation(#[from] GenerationError),

    #[error(transparent)]
    Tts(#[from] TTSError),

    #[error("{0}")]
    NotFound(String),
}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::Auth(e) => e.status_code(),
            AppError::Users(e) => match e {
                UserStoreError::InvalidUsername | UserStoreError::EmptyPassword => {
                    StatusCode::BAD_REQUEST
                }
                UserStoreError::AlreadyExists(_) => StatusCode::CONFLICT,
                UserStoreError::NotFound(_) => StatusCode::NOT_FOUND,
                UserStoreError::ProtectedAccount(_) => StatusCode::FORBIDDEN,
            },
            AppError::Generation(GenerationError::Tts(e)) | AppError::Tts(e) => tts_status(e),
            AppError::Generation(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
        }
    }
}

fn tts_status(error: &TTSError) -> StatusCode {
    match error {
        TTSError::MissingApiKey => StatusCode::SERVICE_UNAVAILABLE,
        TTSError::InvalidConfiguration(_) => StatusCode::BAD_REQUEST,
        TTSError::RequestFailed(_) | TTSError::ApiError { .. } | TTSError::InvalidResponse(_) => {
            StatusCode::BAD_GATEWAY
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(status = status.as_u16(), error = %self, "Request failed");
        }
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}
