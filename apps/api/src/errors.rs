use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

use crate::generation::GenerationError;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("No file was uploaded")]
    NoFileProvided,

    #[error("Payload too large: {0}")]
    PayloadTooLarge(String),

    #[error("{context} {source}")]
    Generation {
        context: &'static str,
        source: GenerationError,
    },

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    /// Wraps a generation failure with a caller-facing summary. Composer input
    /// errors become `InvalidInput` so they map to 400.
    pub fn generation(context: &'static str, error: GenerationError) -> Self {
        match error {
            GenerationError::InvalidInput(msg) => AppError::InvalidInput(msg),
            source => AppError::Generation { context, source },
        }
    }
}

impl From<GenerationError> for AppError {
    fn from(e: GenerationError) -> Self {
        AppError::generation("Generation failed.", e)
    }
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<String>,
    code: &'static str,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, error, details) = match &self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg.clone(), None),
            AppError::InvalidInput(msg) => {
                (StatusCode::BAD_REQUEST, "INVALID_INPUT", msg.clone(), None)
            }
            AppError::NoFileProvided => (
                StatusCode::BAD_REQUEST,
                "NO_FILE_PROVIDED",
                "No file uploaded. Attach the resume in the 'file' field.".to_string(),
                None,
            ),
            AppError::PayloadTooLarge(msg) => (
                StatusCode::PAYLOAD_TOO_LARGE,
                "PAYLOAD_TOO_LARGE",
                "The uploaded file exceeds the size limit.".to_string(),
                Some(msg.clone()),
            ),
            AppError::Generation { context, source } => {
                tracing::error!("{context} {source}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    source.code(),
                    context.to_string(),
                    Some(source.to_string()),
                )
            }
            AppError::Storage(msg) => {
                tracing::error!("Storage error: {msg}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "STORAGE_ERROR",
                    "A file storage error occurred".to_string(),
                    None,
                )
            }
            AppError::Database(e) => {
                tracing::error!("Database error: {e}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "DATABASE_ERROR",
                    "A database error occurred".to_string(),
                    None,
                )
            }
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal server error occurred".to_string(),
                    None,
                )
            }
        };

        let body = Json(ErrorBody {
            error,
            details,
            code,
        });

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_composer_input_errors_map_to_bad_request() {
        let err = AppError::generation(
            "Failed to analyze resume with Gemini.",
            GenerationError::InvalidInput("careerGoal is required".into()),
        );
        assert!(matches!(&err, AppError::InvalidInput(m) if m == "careerGoal is required"));
        assert_eq!(err.into_response().status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_upstream_errors_map_to_server_error() {
        for source in [
            GenerationError::UpstreamConfig("missing key".into()),
            GenerationError::EmptyResponse,
            GenerationError::MalformedResponse("bad json".into()),
        ] {
            let response = AppError::generation("Failed.", source).into_response();
            assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        }
    }

    #[test]
    fn test_missing_file_is_bad_request() {
        assert_eq!(
            AppError::NoFileProvided.into_response().status(),
            StatusCode::BAD_REQUEST
        );
    }
}
