use serde::{Deserialize, Serialize};

use crate::generation::validator::GroundingSource;

/// One job opening. Field names stay snake_case on the wire.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct JobMatch {
    pub job_title: String,
    pub company: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub skills: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub qualifications: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub salary_range: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub work_type: Option<String>,
}

impl JobMatch {
    pub fn is_complete(&self) -> bool {
        !self.job_title.trim().is_empty() && !self.company.trim().is_empty()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct JobMatchesPayload {
    pub jobs: Vec<JobMatch>,
}

/// Body of `POST /api/job-matches`. An empty `jobs` list is a valid answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobMatchesResult {
    pub jobs: Vec<JobMatch>,
    #[serde(default)]
    pub sources: Vec<GroundingSource>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_job_match_wire_names() {
        let job = JobMatch {
            job_title: "Data Engineer".into(),
            company: "Acme".into(),
            salary_range: Some("$90k-$120k".into()),
            ..JobMatch::default()
        };
        let value = serde_json::to_value(&job).unwrap();
        assert_eq!(value["job_title"], "Data Engineer");
        assert_eq!(value["salary_range"], "$90k-$120k");
        assert!(value.get("work_type").is_none());
        assert!(job.is_complete());

        let anonymous = JobMatch {
            company: " ".into(),
            ..job
        };
        assert!(!anonymous.is_complete());
    }
}
