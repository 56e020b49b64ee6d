pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post, put},
    Router,
};

use crate::analysis::handlers::{handle_analyze, handle_latest_analysis};
use crate::jobs::handlers::handle_job_matches;
use crate::learning::handlers::{handle_courses, handle_recommendation_details};
use crate::state::AppState;
use crate::upload::handlers::handle_upload_resume;
use crate::user_courses::handlers::{
    handle_create_course, handle_delete_course, handle_list_courses, handle_update_course,
};

pub fn build_router(state: AppState) -> Router {
    let max_upload_bytes = state.config.max_upload_bytes;

    Router::new()
        .route("/", get(health::root_handler))
        .route("/health", get(health::health_handler))
        // Analysis
        .route("/api/analyze", post(handle_analyze))
        .route("/api/analyses/latest", get(handle_latest_analysis))
        .route(
            "/api/upload-resume",
            post(handle_upload_resume).layer(DefaultBodyLimit::max(max_upload_bytes)),
        )
        // Learning resources
        .route("/api/courses", post(handle_courses))
        .route(
            "/api/recommendations/details",
            get(handle_recommendation_details),
        )
        // Job matching
        .route("/api/job-matches", post(handle_job_matches))
        // User course list
        .route(
            "/api/user-courses",
            get(handle_list_courses).post(handle_create_course),
        )
        .route(
            "/api/user-courses/:id",
            put(handle_update_course).delete(handle_delete_course),
        )
        .with_state(state)
}
