//! Request composer: builds the instruction payload for each generation operation.
//!
//! Pure construction: no I/O, no clock, no randomness.

use serde::Serialize;
use serde_json::Value;

use crate::generation::prompts::{
    json_system, ANALYSIS_PROMPT_TEMPLATE, ANALYSIS_SYSTEM, DISCOVERY_PROMPT_TEMPLATE,
    DISCOVERY_SYSTEM, EXTRACT_PROMPT, EXTRACT_SYSTEM, JOB_MATCH_PROMPT_TEMPLATE, JOB_MATCH_SYSTEM,
    STRUCTURE_PROMPT_TEMPLATE, STRUCTURE_SYSTEM,
};
use crate::generation::schemas::{analysis_schema, job_matches_schema, learning_schema};
use crate::generation::validator::ExpectedShape;
use crate::generation::GenerationError;

/// Maximum number of resume characters embedded in an analysis request.
pub const MAX_RESUME_CHARS: usize = 5000;

// Caps for the short free-text fields embedded in prompts.
pub const MAX_CAREER_GOAL_CHARS: usize = 200;
pub const MAX_ROLE_CHARS: usize = 200;
pub const MAX_LOCATION_CHARS: usize = 200;
pub const MAX_SKILLS_CHARS: usize = 1000;

/// Upper bound on upstream research notes fed back for structuring.
pub const MAX_DISCOVERY_CHARS: usize = 20_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OperationKind {
    Analyze,
    Extract,
    Discover,
    Structure,
    MatchJobs,
}

impl OperationKind {
    /// The payload shape the validator must enforce for this operation.
    pub fn expected_shape(self) -> ExpectedShape {
        match self {
            OperationKind::Analyze => ExpectedShape::Analysis,
            OperationKind::Structure => ExpectedShape::Learning,
            OperationKind::MatchJobs => ExpectedShape::JobMatches,
            OperationKind::Extract | OperationKind::Discover => ExpectedShape::PlainText,
        }
    }

    /// Only the learning-resource path may degrade to the static catalog.
    pub fn allows_fallback(self) -> bool {
        matches!(self, OperationKind::Discover | OperationKind::Structure)
    }
}

/// Inline document bytes sent alongside an extraction request.
#[derive(Debug, Clone)]
pub struct Attachment {
    pub mime_type: String,
    pub data: Vec<u8>,
}

/// A fully composed call, ready for the executor. Built, sent once, dropped.
#[derive(Debug, Clone)]
pub struct GenerationRequest {
    pub operation_kind: OperationKind,
    /// System instruction.
    pub instruction: String,
    /// User query text.
    pub payload: String,
    /// `Some` constrains the output to JSON matching this schema.
    pub response_schema: Option<Value>,
    pub attachment: Option<Attachment>,
    /// Enables the search-grounding tool.
    pub grounded: bool,
}

/// Arguments for each operation kind.
#[derive(Debug, Clone, Copy)]
pub enum ComposeInput<'a> {
    Analyze {
        resume_text: &'a str,
        career_goal: &'a str,
    },
    Extract {
        data: &'a [u8],
        mime_type: &'a str,
    },
    Discover {
        role: &'a str,
        skills: &'a [String],
    },
    Structure {
        discovery_text: &'a str,
    },
    MatchJobs {
        job_title: &'a str,
        location: &'a str,
        skills: &'a [String],
    },
}

pub fn compose(input: ComposeInput<'_>) -> Result<GenerationRequest, GenerationError> {
    match input {
        ComposeInput::Analyze {
            resume_text,
            career_goal,
        } => compose_analysis(resume_text, career_goal),
        ComposeInput::Extract { data, mime_type } => compose_extraction(data, mime_type),
        ComposeInput::Discover { role, skills } => compose_discovery(role, skills),
        ComposeInput::Structure { discovery_text } => compose_structuring(discovery_text),
        ComposeInput::MatchJobs {
            job_title,
            location,
            skills,
        } => compose_job_match(job_title, location, skills),
    }
}

fn compose_analysis(
    resume_text: &str,
    career_goal: &str,
) -> Result<GenerationRequest, GenerationError> {
    let resume_text = require("resumeText", resume_text)?;
    let career_goal = require("careerGoal", career_goal)?;

    let payload = ANALYSIS_PROMPT_TEMPLATE
        .replace("{career_goal}", truncate_chars(career_goal, MAX_CAREER_GOAL_CHARS))
        .replace("{resume_text}", truncate_chars(resume_text, MAX_RESUME_CHARS));

    Ok(GenerationRequest {
        operation_kind: OperationKind::Analyze,
        instruction: json_system(ANALYSIS_SYSTEM),
        payload,
        response_schema: Some(analysis_schema()),
        attachment: None,
        grounded: true,
    })
}

fn compose_extraction(data: &[u8], mime_type: &str) -> Result<GenerationRequest, GenerationError> {
    if data.is_empty() {
        return Err(GenerationError::InvalidInput(
            "document is empty".to_string(),
        ));
    }
    let mime_type = match mime_type.trim() {
        "" => "application/octet-stream",
        m => m,
    };

    Ok(GenerationRequest {
        operation_kind: OperationKind::Extract,
        instruction: EXTRACT_SYSTEM.to_string(),
        payload: EXTRACT_PROMPT.to_string(),
        response_schema: None,
        attachment: Some(Attachment {
            mime_type: mime_type.to_string(),
            data: data.to_vec(),
        }),
        grounded: false,
    })
}

fn compose_discovery(role: &str, skills: &[String]) -> Result<GenerationRequest, GenerationError> {
    let role = require("role", role)?;
    let skills = skill_list(skills, "the core skills for this role");

    Ok(GenerationRequest {
        operation_kind: OperationKind::Discover,
        instruction: DISCOVERY_SYSTEM.to_string(),
        payload: DISCOVERY_PROMPT_TEMPLATE
            .replace("{role}", truncate_chars(role, MAX_ROLE_CHARS))
            .replace("{skills}", truncate_chars(&skills, MAX_SKILLS_CHARS)),
        response_schema: None,
        attachment: None,
        grounded: true,
    })
}

fn compose_structuring(discovery_text: &str) -> Result<GenerationRequest, GenerationError> {
    let discovery_text = require("discovery text", discovery_text)?;

    Ok(GenerationRequest {
        operation_kind: OperationKind::Structure,
        instruction: json_system(STRUCTURE_SYSTEM),
        payload: STRUCTURE_PROMPT_TEMPLATE.replace(
            "{discovery_text}",
            truncate_chars(discovery_text, MAX_DISCOVERY_CHARS),
        ),
        response_schema: Some(learning_schema()),
        attachment: None,
        grounded: false,
    })
}

fn compose_job_match(
    job_title: &str,
    location: &str,
    skills: &[String],
) -> Result<GenerationRequest, GenerationError> {
    let job_title = require("jobTitle", job_title)?;
    let location = match location.trim() {
        "" => "any location, including remote",
        l => truncate_chars(l, MAX_LOCATION_CHARS),
    };
    let skills = skill_list(skills, "the core skills for this role");

    Ok(GenerationRequest {
        operation_kind: OperationKind::MatchJobs,
        instruction: json_system(JOB_MATCH_SYSTEM),
        payload: JOB_MATCH_PROMPT_TEMPLATE
            .replace("{job_title}", truncate_chars(job_title, MAX_ROLE_CHARS))
            .replace("{location}", location)
            .replace("{skills}", truncate_chars(&skills, MAX_SKILLS_CHARS)),
        response_schema: Some(job_matches_schema()),
        attachment: None,
        grounded: true,
    })
}

/// Joins the non-blank skills, or returns `default` when there are none.
fn skill_list(skills: &[String], default: &str) -> String {
    let skills: Vec<&str> = skills
        .iter()
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .collect();
    if skills.is_empty() {
        default.to_string()
    } else {
        skills.join(", ")
    }
}

fn require<'a>(field: &str, value: &'a str) -> Result<&'a str, GenerationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(GenerationError::InvalidInput(format!(
            "{field} is required"
        )));
    }
    Ok(trimmed)
}

/// Returns at most `max` characters of `text`, cut on a char boundary.
pub fn truncate_chars(text: &str, max: usize) -> &str {
    match text.char_indices().nth(max) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}
