//! Job matching: one grounded attempt, failures surface to the caller.

use tracing::info;

use crate::generation::composer::{compose, ComposeInput};
use crate::generation::retry::RetryPolicy;
use crate::generation::{run_generation, CallTracker, GenerationError};
use crate::jobs::models::JobMatchesResult;
use crate::llm_client::GenerationService;

pub async fn find_job_matches(
    generator: &dyn GenerationService,
    job_title: &str,
    location: &str,
    skills: &[String],
) -> Result<JobMatchesResult, GenerationError> {
    let request = compose(ComposeInput::MatchJobs {
        job_title,
        location,
        skills,
    })?;
    let mut call = CallTracker::new(request.operation_kind);

    let (payload, sources) =
        run_generation(generator, &RetryPolicy::none(), &request, &mut call).await?;
    let jobs = payload.into_job_matches()?.jobs;

    info!(
        "Found {} job matches for '{}' (sources={})",
        jobs.len(),
        job_title.trim(),
        sources.len()
    );
    Ok(JobMatchesResult { jobs, sources })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generation::composer::OperationKind;
    use crate::generation::testing::{grounded_response, text_response, unavailable, ScriptedService};
    use serde_json::json;

    const JOBS_JSON: &str = r#"{"jobs": [
        {"job_title": "Junior Data Scientist", "company": "Shopify", "location": "Toronto", "salary_range": "CA$85k-CA$105k"},
        {"job_title": "ML Intern", "company": "Cohere", "work_type": "Internship, hybrid"}
    ]}"#;

    #[tokio::test]
    async fn test_job_matches_carry_sources() {
        let service = ScriptedService::new(vec![Ok(grounded_response(
            JOBS_JSON,
            json!({ "groundingChunks": [
                { "web": { "uri": "https://careers.example/ds", "title": "Careers" } }
            ]}),
        ))]);
        let skills = vec!["Statistics".to_string()];

        let result = find_job_matches(&service, "Data Scientist", "Toronto", &skills)
            .await
            .unwrap();

        assert_eq!(result.jobs.len(), 2);
        assert_eq!(result.jobs[0].company, "Shopify");
        assert_eq!(result.sources.len(), 1);
        assert_eq!(service.calls(), vec![OperationKind::MatchJobs]);
        assert!(service.requests()[0].payload.contains("Statistics"));
    }

    #[tokio::test]
    async fn test_unavailable_is_not_retried() {
        let service = ScriptedService::new(vec![Err(unavailable())]);
        let err = find_job_matches(&service, "Data Scientist", "", &[])
            .await
            .unwrap_err();

        assert!(matches!(err, GenerationError::UpstreamUnavailable { .. }));
        assert_eq!(service.calls().len(), 1);
    }

    #[tokio::test]
    async fn test_blank_title_makes_no_call() {
        let service = ScriptedService::new(vec![Ok(text_response(JOBS_JSON))]);
        let err = find_job_matches(&service, "  ", "Remote", &[]).await.unwrap_err();

        assert!(matches!(err, GenerationError::InvalidInput(_)));
        assert!(service.calls().is_empty());
    }
}
