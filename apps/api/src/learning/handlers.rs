//! Axum route handlers for learning resources and the static catalog.

use axum::{
    extract::{rejection::JsonRejection, Query, State},
    Json,
};
use serde::Deserialize;
use serde_json::Value;

use crate::errors::AppError;
use crate::learning::catalog::{catalog_slice, CatalogKind};
use crate::learning::discovery::discover_learning_resources;
use crate::learning::models::LearningResult;
use crate::state::AppState;

/// `skills` accepts either a JSON array or a single comma-separated string.
/// Wrapped in `Option` so an absent or `null` field reads as no skills.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum SkillsInput {
    List(Vec<String>),
    Text(String),
}

impl SkillsInput {
    pub fn into_list(skills: Option<SkillsInput>) -> Vec<String> {
        match skills {
            None => Vec::new(),
            Some(SkillsInput::List(list)) => list,
            Some(SkillsInput::Text(text)) => text
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct CoursesRequest {
    #[serde(default)]
    pub role: String,
    #[serde(default)]
    pub skills: Option<SkillsInput>,
}

#[derive(Debug, Deserialize)]
pub struct DetailsQuery {
    #[serde(rename = "type")]
    pub kind: Option<String>,
}

/// POST /api/courses
///
/// Always 200 once the request is well-formed; upstream failures are answered
/// with the static catalog flagged `fallback: true`.
pub async fn handle_courses(
    State(state): State<AppState>,
    payload: Result<Json<CoursesRequest>, JsonRejection>,
) -> Result<Json<LearningResult>, AppError> {
    let Json(request) = payload.map_err(|e| AppError::InvalidInput(e.body_text()))?;
    let skills = SkillsInput::into_list(request.skills);

    let result = discover_learning_resources(state.generator.as_ref(), &request.role, &skills)
        .await
        .map_err(|e| AppError::generation("Failed to fetch learning resources.", e))?;

    Ok(Json(result))
}

/// GET /api/recommendations/details?type=certifications|opportunities
pub async fn handle_recommendation_details(
    Query(query): Query<DetailsQuery>,
) -> Result<Json<Value>, AppError> {
    let kind: CatalogKind = query
        .kind
        .as_deref()
        .ok_or_else(|| AppError::InvalidInput("type query parameter is required".to_string()))?
        .parse()
        .map_err(AppError::InvalidInput)?;

    Ok(Json(catalog_slice(kind)))
}
