//! Response validator: turns a raw service envelope into a typed payload plus citations.
//!
//! Checks only what callers rely on: the text payload exists, parses as JSON for
//! structured shapes, and carries the required top-level keys. Optional sub-fields
//! default to empty.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::analysis::models::{AnalysisPayload, Recommendations};
use crate::generation::schemas::{ANALYSIS_REQUIRED, JOB_MATCHES_REQUIRED, LEARNING_REQUIRED};
use crate::generation::GenerationError;
use crate::jobs::models::{JobMatch, JobMatchesPayload};
use crate::learning::models::{Course, LearningPayload, Opportunity};
use crate::llm_client::RawServiceResponse;

/// A web citation the service attached while grounding its answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroundingSource {
    pub uri: String,
    pub title: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExpectedShape {
    Analysis,
    Learning,
    JobMatches,
    PlainText,
}

/// Output of a validated call, tagged by the shape that was enforced.
#[derive(Debug, Clone, PartialEq)]
pub enum ValidatedPayload {
    Analysis(AnalysisPayload),
    Learning(LearningPayload),
    JobMatches(JobMatchesPayload),
    PlainText(String),
}

impl ValidatedPayload {
    pub fn into_analysis(self) -> Result<AnalysisPayload, GenerationError> {
        match self {
            ValidatedPayload::Analysis(a) => Ok(a),
            _ => Err(unexpected_shape("analysis")),
        }
    }

    pub fn into_learning(self) -> Result<LearningPayload, GenerationError> {
        match self {
            ValidatedPayload::Learning(l) => Ok(l),
            _ => Err(unexpected_shape("learning")),
        }
    }

    pub fn into_job_matches(self) -> Result<JobMatchesPayload, GenerationError> {
        match self {
            ValidatedPayload::JobMatches(j) => Ok(j),
            _ => Err(unexpected_shape("job matches")),
        }
    }

    pub fn into_text(self) -> Result<String, GenerationError> {
        match self {
            ValidatedPayload::PlainText(t) => Ok(t),
            _ => Err(unexpected_shape("plain text")),
        }
    }
}

fn unexpected_shape(expected: &str) -> GenerationError {
    GenerationError::MalformedResponse(format!("expected {expected} payload"))
}

pub fn validate(
    raw: &RawServiceResponse,
    shape: ExpectedShape,
) -> Result<(ValidatedPayload, Vec<GroundingSource>), GenerationError> {
    let text = raw
        .text()
        .filter(|t| !t.trim().is_empty())
        .ok_or(GenerationError::EmptyResponse)?;

    let payload = match shape {
        ExpectedShape::PlainText => ValidatedPayload::PlainText(text.trim().to_string()),
        ExpectedShape::Analysis => {
            let value = parse_object(&text, ANALYSIS_REQUIRED)?;
            ValidatedPayload::Analysis(analysis_from_value(value)?)
        }
        ExpectedShape::Learning => {
            let value = parse_object(&text, LEARNING_REQUIRED)?;
            ValidatedPayload::Learning(learning_from_value(value)?)
        }
        ExpectedShape::JobMatches => {
            let value = parse_object(&text, JOB_MATCHES_REQUIRED)?;
            ValidatedPayload::JobMatches(job_matches_from_value(value)?)
        }
    };

    Ok((payload, extract_sources(raw)))
}

/// Parses `text` as a JSON object and checks the required top-level keys.
fn parse_object(text: &str, required: &[&str]) -> Result<Value, GenerationError> {
    let value: Value = serde_json::from_str(strip_json_fences(text))?;

    let object = value.as_object().ok_or_else(|| {
        GenerationError::MalformedResponse("top-level value is not a JSON object".to_string())
    })?;

    let missing: Vec<&str> = required
        .iter()
        .copied()
        .filter(|key| !object.contains_key(*key))
        .collect();
    if !missing.is_empty() {
        return Err(GenerationError::MalformedResponse(format!(
            "missing required keys: {}",
            missing.join(", ")
        )));
    }

    Ok(value)
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct RawAnalysis {
    resume_score: Value,
    missing_skills: Option<Vec<String>>,
    recommendations: Option<RawRecommendations>,
    summary: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawRecommendations {
    certifications: Option<Vec<String>>,
    opportunities: Option<Vec<String>>,
}

fn analysis_from_value(value: Value) -> Result<AnalysisPayload, GenerationError> {
    let raw: RawAnalysis = serde_json::from_value(value)?;

    let score = raw.resume_score.as_f64().ok_or_else(|| {
        GenerationError::MalformedResponse("resumeScore is not a number".to_string())
    })?;
    let recommendations = raw.recommendations.unwrap_or_default();

    let payload = AnalysisPayload {
        resume_score: score.round().clamp(0.0, 100.0) as u8,
        missing_skills: non_blank(raw.missing_skills.unwrap_or_default()),
        recommendations: Recommendations {
            certifications: non_blank(recommendations.certifications.unwrap_or_default()),
            opportunities: non_blank(recommendations.opportunities.unwrap_or_default()),
        },
        summary: raw.summary.unwrap_or_default().trim().to_string(),
    };

    for (field, empty) in [
        ("missingSkills", payload.missing_skills.is_empty()),
        (
            "recommendations.certifications",
            payload.recommendations.certifications.is_empty(),
        ),
        (
            "recommendations.opportunities",
            payload.recommendations.opportunities.is_empty(),
        ),
        ("summary", payload.summary.is_empty()),
    ] {
        if empty {
            return Err(GenerationError::MalformedResponse(format!(
                "{field} is empty"
            )));
        }
    }

    Ok(payload)
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawLearning {
    courses: Vec<Course>,
    opportunities: Vec<Opportunity>,
}

fn learning_from_value(value: Value) -> Result<LearningPayload, GenerationError> {
    let raw: RawLearning = serde_json::from_value(value)?;

    let payload = LearningPayload {
        courses: raw.courses.into_iter().filter(Course::is_complete).collect(),
        opportunities: raw
            .opportunities
            .into_iter()
            .filter(Opportunity::is_complete)
            .collect(),
    };

    if payload.courses.is_empty() && payload.opportunities.is_empty() {
        return Err(GenerationError::MalformedResponse(
            "no usable courses or opportunities".to_string(),
        ));
    }
    Ok(payload)
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawJobMatches {
    jobs: Vec<JobMatch>,
}

/// Openings without a title and company are dropped. Zero openings is allowed.
fn job_matches_from_value(value: Value) -> Result<JobMatchesPayload, GenerationError> {
    let raw: RawJobMatches = serde_json::from_value(value)?;
    Ok(JobMatchesPayload {
        jobs: raw.jobs.into_iter().filter(JobMatch::is_complete).collect(),
    })
}

fn non_blank(items: Vec<String>) -> Vec<String> {
    items
        .into_iter()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

/// Collects citations from the first candidate. Entries without both a URI and a
/// title are dropped; duplicates (by URI) keep their first occurrence.
pub fn extract_sources(raw: &RawServiceResponse) -> Vec<GroundingSource> {
    let Some(metadata) = raw
        .candidates
        .first()
        .and_then(|c| c.grounding_metadata.as_ref())
    else {
        return Vec::new();
    };

    let webs = metadata
        .grounding_attributions
        .iter()
        .filter_map(|a| a.web.as_ref())
        .chain(metadata.grounding_chunks.iter().filter_map(|c| c.web.as_ref()));

    let mut seen = HashSet::new();
    let mut sources = Vec::new();
    for web in webs {
        let (Some(uri), Some(title)) = (web.uri.as_deref(), web.title.as_deref()) else {
            continue;
        };
        let (uri, title) = (uri.trim(), title.trim());
        if uri.is_empty() || title.is_empty() || !seen.insert(uri.to_string()) {
            continue;
        }
        sources.push(GroundingSource {
            uri: uri.to_string(),
            title: title.to_string(),
        });
    }
    sources
}

/// Strips ```json ... ``` or ``` ... ``` code fences from model output.
fn strip_json_fences(text: &str) -> &str {
    let text = text.trim();
    let stripped = text
        .strip_prefix("```json")
        .or_else(|| text.strip_prefix("```"));
    match stripped {
        Some(inner) => inner
            .trim_start()
            .strip_suffix("```")
            .map(str::trim)
            .unwrap_or(inner.trim_start()),
        None => text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generation::testing::{grounded_response, text_response};
    use serde_json::json;

    const ANALYSIS_JSON: &str = r#"{
        "resumeScore": 72,
        "missingSkills": ["Statistics", "SQL", "Machine Learning"],
        "recommendations": {
            "certifications": ["Google Data Analytics", "IBM Data Science", "AWS ML Specialty"],
            "opportunities": ["Kaggle", "GSoC", "Data internship"]
        },
        "summary": "Solid engineering base. Limited statistics. Needs ML projects."
    }"#;

    #[test]
    fn test_strip_json_fences_with_json_tag() {
        let input = "```json\n{\"key\": \"value\"}\n```";
        assert_eq!(strip_json_fences(input), "{\"key\": \"value\"}");
    }

    #[test]
    fn test_strip_json_fences_no_fences() {
        let input = "{\"key\": \"value\"}";
        assert_eq!(strip_json_fences(input), input);
    }

    #[test]
    fn test_validates_analysis_payload() {
        let raw = text_response(ANALYSIS_JSON);
        let (payload, sources) = validate(&raw, ExpectedShape::Analysis).unwrap();
        let analysis = payload.into_analysis().unwrap();

        assert_eq!(analysis.resume_score, 72);
        assert_eq!(analysis.missing_skills.len(), 3);
        assert_eq!(analysis.recommendations.certifications.len(), 3);
        assert_eq!(analysis.recommendations.opportunities.len(), 3);
        assert!(sources.is_empty());
    }

    #[test]
    fn test_score_is_clamped() {
        let text = ANALYSIS_JSON.replace("72", "140");
        let (payload, _) = validate(&text_response(&text), ExpectedShape::Analysis).unwrap();
        assert_eq!(payload.into_analysis().unwrap().resume_score, 100);

        let text = ANALYSIS_JSON.replace("72", "-3");
        let (payload, _) = validate(&text_response(&text), ExpectedShape::Analysis).unwrap();
        assert_eq!(payload.into_analysis().unwrap().resume_score, 0);
    }

    #[test]
    fn test_missing_text_is_empty_response() {
        let raw: RawServiceResponse = serde_json::from_value(json!({ "candidates": [] })).unwrap();
        assert!(matches!(
            validate(&raw, ExpectedShape::Analysis),
            Err(GenerationError::EmptyResponse)
        ));

        let blank = text_response("   ");
        assert!(matches!(
            validate(&blank, ExpectedShape::PlainText),
            Err(GenerationError::EmptyResponse)
        ));
    }

    #[test]
    fn test_invalid_json_is_malformed() {
        let raw = text_response("Here is your analysis: great resume!");
        assert!(matches!(
            validate(&raw, ExpectedShape::Analysis),
            Err(GenerationError::MalformedResponse(_))
        ));
    }

    #[test]
    fn test_missing_required_key_is_malformed() {
        let raw = text_response(r#"{"resumeScore": 50, "missingSkills": ["a"], "summary": "s"}"#);
        match validate(&raw, ExpectedShape::Analysis) {
            Err(GenerationError::MalformedResponse(msg)) => assert!(msg.contains("recommendations")),
            other => panic!("expected malformed response, got {other:?}"),
        }
    }

    #[test]
    fn test_empty_skill_list_is_malformed() {
        let text = ANALYSIS_JSON.replace(r#"["Statistics", "SQL", "Machine Learning"]"#, "[]");
        assert!(matches!(
            validate(&text_response(&text), ExpectedShape::Analysis),
            Err(GenerationError::MalformedResponse(m)) if m.contains("missingSkills")
        ));
    }

    #[test]
    fn test_learning_payload_drops_incomplete_items() {
        let raw = text_response(
            r#"{
                "courses": [
                    {"title": "SQL Basics", "provider": "Coursera", "link": "https://c.example/sql"},
                    {"title": "No link", "provider": "Udemy"},
                    {"title": "", "provider": "edX", "link": "https://e.example"}
                ],
                "opportunities": [
                    {"name": "Kaggle", "link": "https://kaggle.com", "difficulty": "Beginner"},
                    {"name": "Nameless link only", "link": ""}
                ]
            }"#,
        );
        let (payload, _) = validate(&raw, ExpectedShape::Learning).unwrap();
        let learning = payload.into_learning().unwrap();
        assert_eq!(learning.courses.len(), 1);
        assert_eq!(learning.courses[0].title, "SQL Basics");
        assert_eq!(learning.courses[0].cost, None);
        assert_eq!(learning.opportunities.len(), 1);
        assert_eq!(learning.opportunities[0].difficulty.as_deref(), Some("Beginner"));
    }

    #[test]
    fn test_job_matches_keep_complete_openings() {
        let raw = text_response(
            r#"```json
            {"jobs": [
                {"job_title": "Data Engineer", "company": "Acme", "work_type": "Full-time, remote"},
                {"job_title": "Analyst"}
            ]}
            ```"#,
        );
        let (payload, _) = validate(&raw, ExpectedShape::JobMatches).unwrap();
        let jobs = payload.into_job_matches().unwrap().jobs;
        assert_eq!(jobs.len(), 1);
        assert_eq!(jobs[0].company, "Acme");
        assert_eq!(jobs[0].work_type.as_deref(), Some("Full-time, remote"));

        let (payload, _) = validate(&text_response(r#"{"jobs": []}"#), ExpectedShape::JobMatches).unwrap();
        assert!(payload.into_job_matches().unwrap().jobs.is_empty());

        assert!(matches!(
            validate(&text_response(r#"{"openings": []}"#), ExpectedShape::JobMatches),
            Err(GenerationError::MalformedResponse(m)) if m.contains("jobs")
        ));
    }

    #[test]
    fn test_sources_filtered_and_deduplicated() {
        let raw = grounded_response(
            ANALYSIS_JSON,
            json!({
                "groundingAttributions": [
                    { "web": { "uri": "https://a.example", "title": "A" } },
                    { "web": { "uri": "https://no-title.example" } },
                    { "segment": {} }
                ],
                "groundingChunks": [
                    { "web": { "uri": "https://a.example", "title": "A again" } },
                    { "web": { "uri": "https://b.example", "title": "B" } }
                ]
            }),
        );
        let (_, sources) = validate(&raw, ExpectedShape::Analysis).unwrap();
        assert_eq!(
            sources,
            vec![
                GroundingSource {
                    uri: "https://a.example".into(),
                    title: "A".into()
                },
                GroundingSource {
                    uri: "https://b.example".into(),
                    title: "B".into()
                },
            ]
        );
    }

    #[test]
    fn test_plain_text_is_trimmed() {
        let (payload, _) =
            validate(&text_response("\n  Jane Doe\nEngineer  \n"), ExpectedShape::PlainText).unwrap();
        assert_eq!(payload.into_text().unwrap(), "Jane Doe\nEngineer");
    }
}
