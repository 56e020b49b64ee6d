//! Resume analysis: the only retried generation path. No fallback: failures surface.

use tracing::info;

use crate::analysis::models::AnalysisResult;
use crate::generation::composer::{compose, ComposeInput};
use crate::generation::retry::RetryPolicy;
use crate::generation::{run_generation, CallTracker, GenerationError};
use crate::llm_client::GenerationService;

pub async fn analyze_resume(
    generator: &dyn GenerationService,
    policy: &RetryPolicy,
    resume_text: &str,
    career_goal: &str,
) -> Result<AnalysisResult, GenerationError> {
    let request = compose(ComposeInput::Analyze {
        resume_text,
        career_goal,
    })?;
    let mut call = CallTracker::new(request.operation_kind);

    let (payload, sources) = run_generation(generator, policy, &request, &mut call).await?;
    let result = AnalysisResult::new(payload.into_analysis()?, career_goal, sources);

    info!(
        "Resume analyzed for '{}': score={}, sources={}",
        result.career_goal,
        result.resume_score,
        result.sources.len()
    );
    Ok(result)
}
