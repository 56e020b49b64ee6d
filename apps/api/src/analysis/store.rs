//! Append-only sink for completed analyses, keyed by user.
//!
//! Results are stored opaquely; the only read is "most recent by timestamp".

use std::collections::HashMap;

use async_trait::async_trait;
use sqlx::types::Json;
use sqlx::PgPool;
use tokio::sync::RwLock;

use crate::analysis::models::AnalysisResult;
use crate::errors::AppError;

/// Carried in `AppState` as `Arc<dyn AnalysisStore>`.
#[async_trait]
pub trait AnalysisStore: Send + Sync {
    async fn append(&self, user_id: &str, result: &AnalysisResult) -> Result<(), AppError>;

    async fn latest(&self, user_id: &str) -> Result<Option<AnalysisResult>, AppError>;
}

// ────────────────────────────────────────────────────────────────────────────
// PostgreSQL
// ────────────────────────────────────────────────────────────────────────────

pub struct PgAnalysisStore {
    pool: PgPool,
}

impl PgAnalysisStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AnalysisStore for PgAnalysisStore {
    async fn append(&self, user_id: &str, result: &AnalysisResult) -> Result<(), AppError> {
        // Append-only: INSERT a new row per analysis, never UPDATE
        sqlx::query(
            "INSERT INTO analysis_results (id, user_id, timestamp, result) VALUES ($1, $2, $3, $4)",
        )
        .bind(uuid::Uuid::new_v4())
        .bind(user_id)
        .bind(result.timestamp)
        .bind(Json(result))
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn latest(&self, user_id: &str) -> Result<Option<AnalysisResult>, AppError> {
        let row: Option<(Json<AnalysisResult>,)> = sqlx::query_as(
            "SELECT result FROM analysis_results WHERE user_id = $1 ORDER BY timestamp DESC LIMIT 1",
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|(Json(result),)| result))
    }
}

// ────────────────────────────────────────────────────────────────────────────
// In-process
// ────────────────────────────────────────────────────────────────────────────

/// Used when no `DATABASE_URL` is configured. Holds only the newest result per
/// user. Contents are lost on restart.
#[derive(Default)]
pub struct MemoryAnalysisStore {
    newest: RwLock<HashMap<String, AnalysisResult>>,
}

#[async_trait]
impl AnalysisStore for MemoryAnalysisStore {
    async fn append(&self, user_id: &str, result: &AnalysisResult) -> Result<(), AppError> {
        let mut newest = self.newest.write().await;
        match newest.get(user_id) {
            Some(current) if current.timestamp > result.timestamp => {}
            _ => {
                newest.insert(user_id.to_string(), result.clone());
            }
        }
        Ok(())
    }

    async fn latest(&self, user_id: &str) -> Result<Option<AnalysisResult>, AppError> {
        Ok(self.newest.read().await.get(user_id).cloned())
    }
}
