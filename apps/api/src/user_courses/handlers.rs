//! Axum route handlers for the user course list.

use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, State,
    },
    http::StatusCode,
    Json,
};
use serde_json::{json, Value};
use uuid::Uuid;

use crate::errors::AppError;
use crate::state::AppState;
use crate::user_courses::models::{CourseDraft, UserCourse};

/// GET /api/user-courses
pub async fn handle_list_courses(
    State(state): State<AppState>,
) -> Result<Json<Vec<UserCourse>>, AppError> {
    Ok(Json(state.courses.list().await?))
}

/// POST /api/user-courses
pub async fn handle_create_course(
    State(state): State<AppState>,
    payload: Result<Json<CourseDraft>, JsonRejection>,
) -> Result<(StatusCode, Json<UserCourse>), AppError> {
    let Json(draft) = payload.map_err(|e| AppError::InvalidInput(e.body_text()))?;
    let course = state.courses.create(draft.validated()?).await?;
    Ok((StatusCode::CREATED, Json(course)))
}

/// PUT /api/user-courses/:id
pub async fn handle_update_course(
    State(state): State<AppState>,
    id: Result<Path<Uuid>, PathRejection>,
    payload: Result<Json<CourseDraft>, JsonRejection>,
) -> Result<Json<UserCourse>, AppError> {
    let id = course_id(id)?;
    let Json(draft) = payload.map_err(|e| AppError::InvalidInput(e.body_text()))?;

    state
        .courses
        .update(id, draft.validated()?)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("Course {id} not found")))
}

/// DELETE /api/user-courses/:id
pub async fn handle_delete_course(
    State(state): State<AppState>,
    id: Result<Path<Uuid>, PathRejection>,
) -> Result<Json<Value>, AppError> {
    let id = course_id(id)?;
    if !state.courses.delete(id).await? {
        return Err(AppError::NotFound(format!("Course {id} not found")));
    }
    Ok(Json(json!({ "id": id, "deleted": true })))
}

fn course_id(id: Result<Path<Uuid>, PathRejection>) -> Result<Uuid, AppError> {
    id.map(|Path(id)| id)
        .map_err(|e| AppError::InvalidInput(e.body_text()))
}
