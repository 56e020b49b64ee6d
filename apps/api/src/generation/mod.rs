// Structured generation orchestration.
// Composes schema-constrained requests, validates the service output and retries
// transient failures. All network calls go through llm_client.

pub mod composer;
pub mod prompts;
pub mod retry;
pub mod schemas;
pub mod validator;

#[cfg(test)]
pub mod testing;

use serde::Serialize;
use thiserror::Error;
use tracing::{debug, warn};

use crate::generation::composer::{GenerationRequest, OperationKind};
use crate::generation::retry::RetryPolicy;
use crate::generation::validator::{validate, GroundingSource, ValidatedPayload};
use crate::llm_client::GenerationService;

/// Failures raised while composing, executing or validating a generation call.
#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Generation service is not configured: {0}")]
    UpstreamConfig(String),

    #[error("Generation service unavailable{}: {message}", status_suffix(.status))]
    UpstreamUnavailable { status: Option<u16>, message: String },

    #[error("Generation service returned an empty response")]
    EmptyResponse,

    #[error("Generation service returned malformed output: {0}")]
    MalformedResponse(String),

    #[error("Gave up after {attempts} attempts: {last}")]
    RetriesExhausted {
        attempts: u32,
        last: Box<GenerationError>,
    },
}

fn status_suffix(status: &Option<u16>) -> String {
    status.map(|s| format!(" (status {s})")).unwrap_or_default()
}

impl GenerationError {
    /// Only transport and status failures are worth another attempt. A response
    /// that arrived but could not be used is terminal for the call.
    pub fn is_transient(&self) -> bool {
        matches!(self, GenerationError::UpstreamUnavailable { .. })
    }

    /// Stable machine-readable code surfaced in error payloads.
    pub fn code(&self) -> &'static str {
        match self {
            GenerationError::InvalidInput(_) => "INVALID_INPUT",
            GenerationError::UpstreamConfig(_) => "UPSTREAM_CONFIG",
            GenerationError::UpstreamUnavailable { .. } => "UPSTREAM_UNAVAILABLE",
            GenerationError::EmptyResponse => "EMPTY_RESPONSE",
            GenerationError::MalformedResponse(_) => "MALFORMED_RESPONSE",
            GenerationError::RetriesExhausted { .. } => "UPSTREAM_UNAVAILABLE",
        }
    }
}

impl From<serde_json::Error> for GenerationError {
    fn from(e: serde_json::Error) -> Self {
        GenerationError::MalformedResponse(e.to_string())
    }
}

/// Lifecycle of a single generation call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CallState {
    Composed,
    Sent,
    Validated,
    Failed,
    FallbackServed,
}

impl CallState {
    pub fn can_transition_to(self, next: CallState) -> bool {
        use CallState::*;
        matches!(
            (self, next),
            (Composed, Sent)
                | (Composed, Failed)
                | (Sent, Validated)
                | (Sent, Failed)
                // retried attempts re-enter SENT
                | (Sent, Sent)
                | (Failed, FallbackServed)
        )
    }

    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            CallState::Validated | CallState::Failed | CallState::FallbackServed
        )
    }
}

/// Tracks the state of one call and logs every transition.
///
/// `FallbackServed` is only reachable for `Discover`/`Structure` calls; any other
/// illegal transition is logged and ignored so tracing never fails a request.
#[derive(Debug)]
pub struct CallTracker {
    kind: OperationKind,
    state: CallState,
}

impl CallTracker {
    pub fn new(kind: OperationKind) -> Self {
        debug!(operation = ?kind, state = ?CallState::Composed, "generation call composed");
        Self {
            kind,
            state: CallState::Composed,
        }
    }

    #[cfg(test)]
    pub fn state(&self) -> CallState {
        self.state
    }

    pub fn advance(&mut self, next: CallState) -> bool {
        let allowed = self.state.can_transition_to(next)
            && (next != CallState::FallbackServed || self.kind.allows_fallback());

        if allowed {
            debug!(
                operation = ?self.kind,
                from = ?self.state,
                to = ?next,
                terminal = next.is_terminal(),
                "generation call transition"
            );
            self.state = next;
        } else {
            warn!(operation = ?self.kind, from = ?self.state, to = ?next, "rejected generation call transition");
        }
        allowed
    }
}

/// Executes a composed request under `policy` and validates the result against the
/// operation's expected shape, recording each step on `call`.
pub async fn run_generation(
    generator: &dyn GenerationService,
    policy: &RetryPolicy,
    request: &GenerationRequest,
    call: &mut CallTracker,
) -> Result<(ValidatedPayload, Vec<GroundingSource>), GenerationError> {
    let outcome = {
        let tracker = &mut *call;
        policy
            .run(move |_| {
                tracker.advance(CallState::Sent);
                generator.execute(request)
            })
            .await
    };

    let validated = outcome.and_then(|raw| validate(&raw, request.operation_kind.expected_shape()));

    match validated {
        Ok(result) => {
            call.advance(CallState::Validated);
            Ok(result)
        }
        Err(e) => {
            call.advance(CallState::Failed);
            Err(e)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generation::composer::{compose, ComposeInput};
    use crate::generation::testing::{text_response, unavailable, ScriptedService, ANALYSIS_FIXTURE};

    #[test]
    fn test_only_unavailable_is_transient() {
        let unavailable = GenerationError::UpstreamUnavailable {
            status: Some(503),
            message: "overloaded".to_string(),
        };
        assert!(unavailable.is_transient());
        assert!(!GenerationError::EmptyResponse.is_transient());
        assert!(!GenerationError::MalformedResponse("x".into()).is_transient());
        assert!(!GenerationError::UpstreamConfig("no key".into()).is_transient());
        assert!(!GenerationError::InvalidInput("blank".into()).is_transient());
    }

    #[test]
    fn test_unavailable_message_includes_status() {
        let e = GenerationError::UpstreamUnavailable {
            status: Some(502),
            message: "bad gateway".to_string(),
        };
        assert_eq!(
            e.to_string(),
            "Generation service unavailable (status 502): bad gateway"
        );
    }

    #[test]
    fn test_happy_path_transitions() {
        let mut call = CallTracker::new(OperationKind::Analyze);
        assert!(call.advance(CallState::Sent));
        assert!(call.advance(CallState::Validated));
        assert!(call.state().is_terminal());
    }

    #[test]
    fn test_fallback_only_on_learning_path() {
        let mut analyze = CallTracker::new(OperationKind::Analyze);
        analyze.advance(CallState::Sent);
        analyze.advance(CallState::Failed);
        assert!(!analyze.advance(CallState::FallbackServed));
        assert_eq!(analyze.state(), CallState::Failed);

        let mut discover = CallTracker::new(OperationKind::Discover);
        discover.advance(CallState::Sent);
        discover.advance(CallState::Failed);
        assert!(discover.advance(CallState::FallbackServed));
    }

    #[test]
    fn test_validated_is_final() {
        assert!(!CallState::Validated.can_transition_to(CallState::Failed));
        assert!(!CallState::Validated.can_transition_to(CallState::FallbackServed));
        assert!(!CallState::Composed.can_transition_to(CallState::Validated));
    }

    #[tokio::test]
    async fn test_run_generation_validates_and_tracks() {
        let service = ScriptedService::new(vec![Ok(text_response(ANALYSIS_FIXTURE))]);
        let request = compose(ComposeInput::Analyze {
            resume_text: "Python, pandas",
            career_goal: "Data Scientist",
        })
        .unwrap();
        let mut call = CallTracker::new(request.operation_kind);

        let (payload, _) = run_generation(&service, &RetryPolicy::none(), &request, &mut call)
            .await
            .unwrap();

        assert!(matches!(payload, ValidatedPayload::Analysis(_)));
        assert_eq!(call.state(), CallState::Validated);
    }

    #[tokio::test]
    async fn test_run_generation_marks_failure() {
        let service = ScriptedService::new(vec![Err(unavailable())]);
        let request = compose(ComposeInput::Discover {
            role: "SRE",
            skills: &[],
        })
        .unwrap();
        let mut call = CallTracker::new(request.operation_kind);

        let result = run_generation(&service, &RetryPolicy::none(), &request, &mut call).await;

        assert!(result.is_err());
        assert_eq!(call.state(), CallState::Failed);
        assert_eq!(service.calls(), vec![OperationKind::Discover]);
    }
}
