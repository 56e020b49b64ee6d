use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::errors::AppError;

/// A course a user added to the shared list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct UserCourse {
    pub id: Uuid,
    pub title: String,
    pub category: String,
    pub level: String,
    pub description: String,
    pub url: String,
    pub created_by: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Create/update body. `title`, `category` and `level` are required.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CourseDraft {
    pub title: String,
    pub category: String,
    pub level: String,
    pub description: Option<String>,
    pub url: Option<String>,
    pub created_by: Option<String>,
}

impl CourseDraft {
    /// Trims every field and rejects drafts missing a required one.
    pub fn validated(self) -> Result<Self, AppError> {
        let draft = CourseDraft {
            title: self.title.trim().to_string(),
            category: self.category.trim().to_string(),
            level: self.level.trim().to_string(),
            description: trimmed(self.description),
            url: trimmed(self.url),
            created_by: trimmed(self.created_by),
        };

        let missing: Vec<&str> = [
            ("title", &draft.title),
            ("category", &draft.category),
            ("level", &draft.level),
        ]
        .into_iter()
        .filter(|(_, value)| value.is_empty())
        .map(|(field, _)| field)
        .collect();

        if !missing.is_empty() {
            return Err(AppError::InvalidInput(format!(
                "missing required fields: {}",
                missing.join(", ")
            )));
        }
        Ok(draft)
    }

    pub fn into_course(self, id: Uuid, now: DateTime<Utc>) -> UserCourse {
        UserCourse {
            id,
            title: self.title,
            category: self.category,
            level: self.level,
            description: self.description.unwrap_or_default(),
            url: self.url.unwrap_or_default(),
            created_by: self.created_by,
            created_at: now,
            updated_at: now,
        }
    }
}

fn trimmed(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
