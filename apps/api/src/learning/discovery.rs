//! Learning-resource discovery: a grounded DISCOVER call followed by a STRUCTURE
//! call over its output. Any failure on either step serves the static catalog.

use tracing::{info, warn};

use crate::generation::composer::{compose, ComposeInput, OperationKind};
use crate::generation::retry::RetryPolicy;
use crate::generation::{run_generation, CallState, CallTracker, GenerationError};
use crate::learning::catalog::static_learning_catalog;
use crate::learning::models::LearningResult;
use crate::llm_client::GenerationService;

/// Runs discovery for `role` and `skills`.
///
/// Request problems (blank role) are returned as errors since no upstream call is
/// made; everything after composition degrades to the catalog instead of failing.
pub async fn discover_learning_resources(
    generator: &dyn GenerationService,
    role: &str,
    skills: &[String],
) -> Result<LearningResult, GenerationError> {
    let request = compose(ComposeInput::Discover { role, skills })?;
    let mut discover = CallTracker::new(request.operation_kind);

    let discovered = run_generation(generator, &RetryPolicy::none(), &request, &mut discover)
        .await
        .and_then(|(payload, sources)| Ok((payload.into_text()?, sources)));
    let (notes, sources) = match discovered {
        Ok(found) => found,
        Err(e) => return Ok(serve_fallback(&mut discover, &e)),
    };

    let mut structure = CallTracker::new(OperationKind::Structure);
    let structured = match compose(ComposeInput::Structure {
        discovery_text: &notes,
    }) {
        Ok(request) => run_generation(generator, &RetryPolicy::none(), &request, &mut structure)
            .await
            .and_then(|(payload, _)| payload.into_learning()),
        Err(e) => {
            structure.advance(CallState::Failed);
            Err(e)
        }
    };

    match structured {
        Ok(payload) => {
            info!(
                "Live learning resources for '{}': {} courses, {} opportunities",
                role.trim(),
                payload.courses.len(),
                payload.opportunities.len()
            );
            Ok(LearningResult::live(payload, sources))
        }
        Err(e) => Ok(serve_fallback(&mut structure, &e)),
    }
}

fn serve_fallback(call: &mut CallTracker, cause: &GenerationError) -> LearningResult {
    warn!("Learning-resource discovery failed, serving static catalog: {cause}");
    call.advance(CallState::FallbackServed);
    static_learning_catalog()
}
