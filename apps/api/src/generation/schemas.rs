//! Response-schema contracts sent with structured generation calls.
//!
//! Expressed in the service's OpenAPI-subset dialect (upper-case type names).

use serde_json::{json, Value};

/// Top-level keys that must be present in an analysis payload.
pub const ANALYSIS_REQUIRED: &[&str] = &["resumeScore", "missingSkills", "recommendations", "summary"];

/// Top-level keys that must be present in a learning-resource payload.
pub const LEARNING_REQUIRED: &[&str] = &["courses", "opportunities"];

/// Top-level keys that must be present in a job-match payload.
pub const JOB_MATCHES_REQUIRED: &[&str] = &["jobs"];

pub fn analysis_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "resumeScore": {
                "type": "INTEGER",
                "description": "The resume score out of 100, focusing on the career goal."
            },
            "missingSkills": {
                "type": "ARRAY",
                "items": { "type": "STRING" },
                "description": "3 crucial skills missing for the target role, grounded in current industry needs."
            },
            "recommendations": {
                "type": "OBJECT",
                "properties": {
                    "certifications": {
                        "type": "ARRAY",
                        "items": { "type": "STRING" },
                        "description": "3 highly relevant certifications or courses (e.g., Coursera, AWS, Google) to bridge the skill gap."
                    },
                    "opportunities": {
                        "type": "ARRAY",
                        "items": { "type": "STRING" },
                        "description": "3 real-world opportunities (e.g., hackathons, open-source projects, specialized internships) to gain experience."
                    }
                }
            },
            "summary": {
                "type": "STRING",
                "description": "A concise, 3-sentence summary of the resume's strengths and weaknesses against the career goal."
            }
        },
        "required": ANALYSIS_REQUIRED
    })
}

pub fn learning_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "courses": {
                "type": "ARRAY",
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "title": { "type": "STRING" },
                        "provider": { "type": "STRING" },
                        "link": { "type": "STRING" },
                        "cost": { "type": "STRING" },
                        "duration": { "type": "STRING" },
                        "level": { "type": "STRING" }
                    },
                    "required": ["title", "provider", "link"]
                }
            },
            "opportunities": {
                "type": "ARRAY",
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "name": { "type": "STRING" },
                        "description": { "type": "STRING" },
                        "link": { "type": "STRING" },
                        "difficulty": { "type": "STRING" }
                    },
                    "required": ["name", "link"]
                }
            }
        },
        "required": LEARNING_REQUIRED
    })
}

pub fn job_matches_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "jobs": {
                "type": "ARRAY",
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "job_title": { "type": "STRING" },
                        "company": { "type": "STRING" },
                        "location": { "type": "STRING" },
                        "skills": { "type": "STRING" },
                        "qualifications": { "type": "STRING" },
                        "salary_range": { "type": "STRING" },
                        "work_type": { "type": "STRING" }
                    },
                    "required": ["job_title", "company"]
                }
            }
        },
        "required": JOB_MATCHES_REQUIRED
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_analysis_schema_lists_required_keys() {
        let schema = analysis_schema();
        let required: Vec<&str> = schema["required"]
            .as_array()
            .unwrap()
            .iter()
            .map(|v| v.as_str().unwrap())
            .collect();
        assert_eq!(required, ANALYSIS_REQUIRED);
        assert_eq!(schema["properties"]["resumeScore"]["type"], "INTEGER");
    }

    #[test]
    fn test_learning_schema_item_requirements() {
        let schema = learning_schema();
        assert_eq!(
            schema["properties"]["courses"]["items"]["required"],
            json!(["title", "provider", "link"])
        );
        assert_eq!(
            schema["properties"]["opportunities"]["items"]["required"],
            json!(["name", "link"])
        );
    }
}
