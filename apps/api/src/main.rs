mod analysis;
mod config;
mod db;
mod errors;
mod generation;
mod jobs;
mod learning;
mod llm_client;
mod routes;
mod state;
mod upload;
mod user_courses;

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::analysis::store::{AnalysisStore, MemoryAnalysisStore, PgAnalysisStore};
use crate::config::Config;
use crate::db::{create_pool, ensure_schema};
use crate::llm_client::GeminiClient;
use crate::routes::build_router;
use crate::state::AppState;
use crate::user_courses::store::{CourseStore, MemoryCourseStore, PgCourseStore};

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_CRATE_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting CareerLift API v{}", env!("CARGO_PKG_VERSION"));

    if config.gemini_api_key.is_none() {
        warn!("GEMINI_API_KEY is not set; generation requests will fail until it is configured");
    }

    let generator = GeminiClient::new(config.gemini_settings())?;
    info!("Gemini client initialized (model: {})", generator.model());

    let (store, courses): (Arc<dyn AnalysisStore>, Arc<dyn CourseStore>) =
        match &config.database_url {
            Some(url) => {
                let pool = create_pool(url).await?;
                ensure_schema(&pool).await?;
                (
                    Arc::new(PgAnalysisStore::new(pool.clone())),
                    Arc::new(PgCourseStore::new(pool)),
                )
            }
            None => {
                info!("DATABASE_URL not set; analyses and courses are kept in memory");
                (
                    Arc::new(MemoryAnalysisStore::default()),
                    Arc::new(MemoryCourseStore::default()),
                )
            }
        };

    let state = AppState {
        generator: Arc::new(generator),
        store,
        courses,
        retry_policy: config.analyze_retry_policy(),
        config: config.clone(),
    };

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
