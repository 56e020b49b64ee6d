use std::sync::Arc;

use crate::analysis::store::AnalysisStore;
use crate::config::Config;
use crate::generation::retry::RetryPolicy;
use crate::llm_client::GenerationService;
use crate::user_courses::store::CourseStore;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Generative service. Default: GeminiClient.
    pub generator: Arc<dyn GenerationService>,
    /// Completed analyses, Postgres-backed when DATABASE_URL is set.
    pub store: Arc<dyn AnalysisStore>,
    /// User course list, same backend choice as `store`.
    pub courses: Arc<dyn CourseStore>,
    /// Applied to ANALYZE calls only.
    pub retry_policy: RetryPolicy,
    pub config: Config,
}
