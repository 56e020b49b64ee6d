//! Axum route handler for job matching.

use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use serde::Deserialize;

use crate::errors::AppError;
use crate::jobs::models::JobMatchesResult;
use crate::jobs::service::find_job_matches;
use crate::learning::handlers::SkillsInput;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobMatchRequest {
    #[serde(default)]
    pub job_title: String,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub skills: Option<SkillsInput>,
}

/// POST /api/job-matches
pub async fn handle_job_matches(
    State(state): State<AppState>,
    payload: Result<Json<JobMatchRequest>, JsonRejection>,
) -> Result<Json<JobMatchesResult>, AppError> {
    let Json(request) = payload.map_err(|e| AppError::InvalidInput(e.body_text()))?;
    let skills = SkillsInput::into_list(request.skills);

    let result = find_job_matches(
        state.generator.as_ref(),
        &request.job_title,
        request.location.as_deref().unwrap_or_default(),
        &skills,
    )
    .await
    .map_err(|e| AppError::generation("Failed to fetch job matches.", e))?;

    Ok(Json(result))
}
