//! Axum route handler for resume uploads.

use axum::{
    extract::{
        multipart::{MultipartError, MultipartRejection},
        Multipart, State,
    },
    http::StatusCode,
    Json,
};
use tracing::debug;

use crate::errors::AppError;
use crate::state::AppState;
use crate::upload::coordinator::{handle_upload, IncomingFile, UploadOutcome};

/// POST /api/upload-resume
///
/// Multipart body: `file` (required) and `careerGoal` (optional).
pub async fn handle_upload_resume(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<UploadOutcome>, AppError> {
    let mut multipart = multipart.map_err(|e| {
        debug!("Rejected non-multipart upload: {}", e.body_text());
        AppError::NoFileProvided
    })?;

    let mut file = None;
    let mut career_goal = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(field_error)?
    {
        let name = field.name().map(str::to_string);
        match name.as_deref() {
            Some("file") => {
                let original_name = field.file_name().unwrap_or("upload").to_string();
                let content_type = field.content_type().map(str::to_string);
                let data = field
                    .bytes()
                    .await
                    .map_err(field_error)?;
                file = Some(IncomingFile {
                    original_name,
                    content_type,
                    data,
                });
            }
            Some("careerGoal") => {
                career_goal = Some(
                    field
                        .text()
                        .await
                        .map_err(field_error)?,
                );
            }
            _ => {}
        }
    }

    let outcome = handle_upload(
        state.generator.as_ref(),
        &state.retry_policy,
        &state.config.upload_dir,
        file,
        career_goal.as_deref(),
    )
    .await?;

    Ok(Json(outcome))
}

/// Keeps the multipart error's own status: an oversized body is 413, anything
/// else is a malformed request.
fn field_error(e: MultipartError) -> AppError {
    match e.status() {
        StatusCode::PAYLOAD_TOO_LARGE => AppError::PayloadTooLarge(e.body_text()),
        _ => AppError::InvalidInput(e.body_text()),
    }
}
