//! Axum route handlers for the Analysis API.

use axum::{
    extract::{rejection::JsonRejection, Query, State},
    Json,
};
use serde::Deserialize;
use tracing::warn;

use crate::analysis::models::AnalysisResult;
use crate::analysis::service::analyze_resume;
use crate::errors::AppError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeRequest {
    #[serde(default)]
    pub resume_text: String,
    #[serde(default)]
    pub career_goal: String,
    /// When present, the result is appended to this user's history.
    #[serde(default)]
    pub user_id: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LatestQuery {
    #[serde(default)]
    pub user_id: String,
}

/// POST /api/analyze
pub async fn handle_analyze(
    State(state): State<AppState>,
    payload: Result<Json<AnalyzeRequest>, JsonRejection>,
) -> Result<Json<AnalysisResult>, AppError> {
    let Json(request) = payload.map_err(|e| AppError::InvalidInput(e.body_text()))?;

    let analysis = analyze_resume(
        state.generator.as_ref(),
        &state.retry_policy,
        &request.resume_text,
        &request.career_goal,
    )
    .await
    .map_err(|e| AppError::generation("Failed to analyze resume with Gemini.", e))?;

    if let Some(user_id) = request.user_id.as_deref().map(str::trim).filter(|u| !u.is_empty()) {
        // Best-effort: the analysis is returned even if persisting it fails.
        if let Err(e) = state.store.append(user_id, &analysis).await {
            warn!("Failed to persist analysis for user {user_id}: {e}");
        }
    }

    Ok(Json(analysis))
}

/// GET /api/analyses/latest?userId=
pub async fn handle_latest_analysis(
    State(state): State<AppState>,
    Query(query): Query<LatestQuery>,
) -> Result<Json<AnalysisResult>, AppError> {
    let user_id = query.user_id.trim();
    if user_id.is_empty() {
        return Err(AppError::InvalidInput("userId is required".to_string()));
    }

    state
        .store
        .latest(user_id)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("No analysis stored for user {user_id}")))
}
