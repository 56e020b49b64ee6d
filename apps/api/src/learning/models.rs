use serde::{Deserialize, Serialize};

use crate::generation::validator::GroundingSource;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Course {
    pub title: String,
    pub provider: String,
    pub link: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cost: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub level: Option<String>,
}

impl Course {
    pub fn is_complete(&self) -> bool {
        [&self.title, &self.provider, &self.link]
            .iter()
            .all(|f| !f.trim().is_empty())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Opportunity {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub link: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub difficulty: Option<String>,
}

impl Opportunity {
    pub fn is_complete(&self) -> bool {
        !self.name.trim().is_empty() && !self.link.trim().is_empty()
    }
}

/// Structured output of the STRUCTURE call, before provenance is attached.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LearningPayload {
    pub courses: Vec<Course>,
    pub opportunities: Vec<Opportunity>,
}

/// Learning resources returned by `/api/courses`, either live or from the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LearningResult {
    pub courses: Vec<Course>,
    pub opportunities: Vec<Opportunity>,
    #[serde(default)]
    pub sources: Vec<GroundingSource>,
    /// Set only when the static catalog was served instead of live results.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub fallback: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl LearningResult {
    pub fn live(payload: LearningPayload, sources: Vec<GroundingSource>) -> Self {
        Self {
            courses: payload.courses,
            opportunities: payload.opportunities,
            sources,
            fallback: false,
            message: None,
        }
    }
}
