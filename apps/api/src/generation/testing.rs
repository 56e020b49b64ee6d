//! Test doubles for the generation layer.

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::{json, Value};

use crate::generation::composer::{GenerationRequest, OperationKind};
use crate::generation::GenerationError;
use crate::llm_client::{GenerationService, RawServiceResponse};

pub const ANALYSIS_FIXTURE: &str = r#"{
    "resumeScore": 64,
    "missingSkills": ["Statistical modeling", "SQL", "Experiment design"],
    "recommendations": {
        "certifications": [
            "Google Data Analytics Professional Certificate",
            "IBM Data Science Professional Certificate",
            "AWS Certified Machine Learning - Specialty"
        ],
        "opportunities": ["Kaggle Competitions", "Google Summer of Code", "Data science internship"]
    },
    "summary": "Strong Python foundation. Little evidence of statistics. Add an end-to-end ML project."
}"#;

pub fn text_response(text: &str) -> RawServiceResponse {
    serde_json::from_value(json!({
        "candidates": [{ "content": { "parts": [{ "text": text }] } }]
    }))
    .unwrap()
}

pub fn grounded_response(text: &str, grounding_metadata: Value) -> RawServiceResponse {
    serde_json::from_value(json!({
        "candidates": [{
            "content": { "parts": [{ "text": text }] },
            "groundingMetadata": grounding_metadata
        }]
    }))
    .unwrap()
}

pub fn unavailable() -> GenerationError {
    GenerationError::UpstreamUnavailable {
        status: Some(503),
        message: "model overloaded".to_string(),
    }
}

/// Replays queued outcomes in order and records every request it receives.
/// Panics when called more often than scripted.
#[derive(Default)]
pub struct ScriptedService {
    outcomes: Mutex<VecDeque<Result<RawServiceResponse, GenerationError>>>,
    requests: Mutex<Vec<GenerationRequest>>,
}

impl ScriptedService {
    pub fn new(outcomes: Vec<Result<RawServiceResponse, GenerationError>>) -> Self {
        Self {
            outcomes: Mutex::new(outcomes.into()),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> Vec<OperationKind> {
        self.requests
            .lock()
            .unwrap()
            .iter()
            .map(|r| r.operation_kind)
            .collect()
    }

    pub fn requests(&self) -> Vec<GenerationRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl GenerationService for ScriptedService {
    async fn execute(
        &self,
        request: &GenerationRequest,
    ) -> Result<RawServiceResponse, GenerationError> {
        self.requests.lock().unwrap().push(request.clone());
        self.outcomes
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| panic!("unscripted {:?} call", request.operation_kind))
    }
}
