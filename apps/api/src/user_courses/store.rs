//! Storage for the user course list.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use sqlx::PgPool;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::errors::AppError;
use crate::user_courses::models::{CourseDraft, UserCourse};

/// Carried in `AppState` as `Arc<dyn CourseStore>`. Drafts arrive validated.
#[async_trait]
pub trait CourseStore: Send + Sync {
    /// Newest first.
    async fn list(&self) -> Result<Vec<UserCourse>, AppError>;

    async fn create(&self, draft: CourseDraft) -> Result<UserCourse, AppError>;

    /// `None` when no course has this id. `createdBy` is never rewritten.
    async fn update(&self, id: Uuid, draft: CourseDraft) -> Result<Option<UserCourse>, AppError>;

    /// `false` when no course has this id.
    async fn delete(&self, id: Uuid) -> Result<bool, AppError>;
}

// ────────────────────────────────────────────────────────────────────────────
// PostgreSQL
// ────────────────────────────────────────────────────────────────────────────

pub struct PgCourseStore {
    pool: PgPool,
}

impl PgCourseStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CourseStore for PgCourseStore {
    async fn list(&self) -> Result<Vec<UserCourse>, AppError> {
        let courses =
            sqlx::query_as::<_, UserCourse>("SELECT * FROM user_courses ORDER BY created_at DESC")
                .fetch_all(&self.pool)
                .await?;
        Ok(courses)
    }

    async fn create(&self, draft: CourseDraft) -> Result<UserCourse, AppError> {
        let course = draft.into_course(Uuid::new_v4(), Utc::now());
        let created = sqlx::query_as::<_, UserCourse>(
            r#"
            INSERT INTO user_courses
                (id, title, category, level, description, url, created_by, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING *
            "#,
        )
        .bind(course.id)
        .bind(&course.title)
        .bind(&course.category)
        .bind(&course.level)
        .bind(&course.description)
        .bind(&course.url)
        .bind(&course.created_by)
        .bind(course.created_at)
        .bind(course.updated_at)
        .fetch_one(&self.pool)
        .await?;
        Ok(created)
    }

    async fn update(&self, id: Uuid, draft: CourseDraft) -> Result<Option<UserCourse>, AppError> {
        let updated = sqlx::query_as::<_, UserCourse>(
            r#"
            UPDATE user_courses
            SET title = $2, category = $3, level = $4, description = $5, url = $6, updated_at = $7
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(draft.title)
        .bind(draft.category)
        .bind(draft.level)
        .bind(draft.description.unwrap_or_default())
        .bind(draft.url.unwrap_or_default())
        .bind(Utc::now())
        .fetch_optional(&self.pool)
        .await?;
        Ok(updated)
    }

    async fn delete(&self, id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM user_courses WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

// ────────────────────────────────────────────────────────────────────────────
// In-process
// ────────────────────────────────────────────────────────────────────────────

#[derive(Default)]
pub struct MemoryCourseStore {
    courses: RwLock<HashMap<Uuid, UserCourse>>,
}

#[async_trait]
impl CourseStore for MemoryCourseStore {
    async fn list(&self) -> Result<Vec<UserCourse>, AppError> {
        let mut courses: Vec<UserCourse> = self.courses.read().await.values().cloned().collect();
        courses.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(courses)
    }

    async fn create(&self, draft: CourseDraft) -> Result<UserCourse, AppError> {
        let course = draft.into_course(Uuid::new_v4(), Utc::now());
        self.courses.write().await.insert(course.id, course.clone());
        Ok(course)
    }

    async fn update(&self, id: Uuid, draft: CourseDraft) -> Result<Option<UserCourse>, AppError> {
        let mut courses = self.courses.write().await;
        let Some(course) = courses.get_mut(&id) else {
            return Ok(None);
        };
        course.title = draft.title;
        course.category = draft.category;
        course.level = draft.level;
        course.description = draft.description.unwrap_or_default();
        course.url = draft.url.unwrap_or_default();
        course.updated_at = Utc::now();
        Ok(Some(course.clone()))
    }

    async fn delete(&self, id: Uuid) -> Result<bool, AppError> {
        Ok(self.courses.write().await.remove(&id).is_some())
    }
}
