use chrono::{DateTime, SubsecRound, Utc};
use serde::{Deserialize, Serialize};

use crate::generation::validator::GroundingSource;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recommendations {
    pub certifications: Vec<String>,
    pub opportunities: Vec<String>,
}

/// The model-produced part of an assessment, after validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalysisPayload {
    pub resume_score: u8,
    pub missing_skills: Vec<String>,
    pub recommendations: Recommendations,
    pub summary: String,
}

/// A completed resume assessment as returned to callers and stored per user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    /// 0 – 100
    pub resume_score: u8,
    pub missing_skills: Vec<String>,
    pub recommendations: Recommendations,
    pub summary: String,
    pub timestamp: DateTime<Utc>,
    pub career_goal: String,
    #[serde(default)]
    pub sources: Vec<GroundingSource>,
}

impl AnalysisResult {
    pub fn new(payload: AnalysisPayload, career_goal: &str, sources: Vec<GroundingSource>) -> Self {
        Self {
            resume_score: payload.resume_score,
            missing_skills: payload.missing_skills,
            recommendations: payload.recommendations,
            summary: payload.summary,
            timestamp: Utc::now().trunc_subsecs(3),
            career_goal: career_goal.trim().to_string(),
            sources,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> AnalysisResult {
        AnalysisResult::new(
            AnalysisPayload {
                resume_score: 81,
                missing_skills: vec!["Kubernetes".into(), "Go".into(), "Terraform".into()],
                recommendations: Recommendations {
                    certifications: vec!["CKA".into(), "AWS SAA".into(), "HashiCorp TA".into()],
                    opportunities: vec!["CNCF mentorship".into(), "Hacktoberfest".into(), "SRE internship".into()],
                },
                summary: "Good Linux depth. Little cloud exposure. Needs IaC.".into(),
            },
            "  Platform Engineer ",
            vec![GroundingSource {
                uri: "https://kubernetes.io".into(),
                title: "Kubernetes".into(),
            }],
        )
    }

    #[test]
    fn test_serializes_with_camel_case_keys() {
        let value = serde_json::to_value(sample()).unwrap();
        assert_eq!(value["resumeScore"], 81);
        assert_eq!(value["careerGoal"], "Platform Engineer");
        assert_eq!(value["missingSkills"][0], "Kubernetes");
        assert_eq!(value["recommendations"]["certifications"][0], "CKA");
        assert_eq!(value["sources"][0]["uri"], "https://kubernetes.io");
        assert!(value["timestamp"].as_str().unwrap().ends_with('Z'));
    }

    #[test]
    fn test_json_round_trip_is_identical() {
        let original = sample();
        let json = serde_json::to_string(&original).unwrap();
        let parsed: AnalysisResult = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, original);
        assert_eq!(serde_json::to_string(&parsed).unwrap(), json);
    }
}
