/// LLM Client: the single point of entry for all Gemini API calls.
///
/// ARCHITECTURAL RULE: No other module may call the generative service directly.
/// Every call goes through a `GenerationService`, and each `execute` is exactly
/// one HTTP attempt. Retrying is the caller's decision (see `generation::retry`).
use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::{debug, warn};

use crate::generation::composer::GenerationRequest;
use crate::generation::GenerationError;

pub mod prompts;

pub const DEFAULT_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash-preview-09-2025";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);
/// Upper bound on the upstream error body echoed into error details.
const ERROR_BODY_LIMIT: usize = 500;

// ────────────────────────────────────────────────────────────────────────────
// Response envelope
// ────────────────────────────────────────────────────────────────────────────

/// The `generateContent` response envelope, decoded leniently.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawServiceResponse {
    pub candidates: Vec<Candidate>,
    pub usage_metadata: Option<UsageMetadata>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Candidate {
    pub content: Option<Content>,
    pub grounding_metadata: Option<GroundingMetadata>,
    pub finish_reason: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Content {
    pub parts: Vec<Part>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Part {
    pub text: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GroundingMetadata {
    pub grounding_attributions: Vec<GroundingRef>,
    pub grounding_chunks: Vec<GroundingRef>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GroundingRef {
    pub web: Option<WebRef>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct WebRef {
    pub uri: Option<String>,
    pub title: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UsageMetadata {
    pub prompt_token_count: u32,
    pub candidates_token_count: u32,
}

impl RawServiceResponse {
    /// Concatenated text parts of the first candidate.
    pub fn text(&self) -> Option<String> {
        let parts = &self.candidates.first()?.content.as_ref()?.parts;
        let texts: Vec<&str> = parts.iter().filter_map(|p| p.text.as_deref()).collect();
        if texts.is_empty() {
            None
        } else {
            Some(texts.concat())
        }
    }
}

#[derive(Debug, Deserialize)]
struct ApiError {
    error: ApiErrorBody,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    message: String,
}

// ────────────────────────────────────────────────────────────────────────────
// Service trait
// ────────────────────────────────────────────────────────────────────────────

/// One call to the generative service. Carried in `AppState` as
/// `Arc<dyn GenerationService>` so tests can substitute a scripted double.
#[async_trait]
pub trait GenerationService: Send + Sync {
    async fn execute(
        &self,
        request: &GenerationRequest,
    ) -> Result<RawServiceResponse, GenerationError>;
}

// ────────────────────────────────────────────────────────────────────────────
// GeminiClient
// ────────────────────────────────────────────────────────────────────────────

/// Settings for the Gemini HTTP client.
#[derive(Debug, Clone)]
pub struct GeminiSettings {
    pub api_key: Option<String>,
    pub model: String,
    pub api_base: String,
    pub timeout: Duration,
}

#[derive(Clone)]
pub struct GeminiClient {
    client: Client,
    settings: GeminiSettings,
}

impl GeminiClient {
    pub fn new(settings: GeminiSettings) -> Result<Self> {
        let client = Client::builder()
            .timeout(settings.timeout)
            .build()
            .context("Failed to build HTTP client")?;
        Ok(Self { client, settings })
    }

    pub fn model(&self) -> &str {
        &self.settings.model
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.settings.api_base.trim_end_matches('/'),
            self.settings.model
        )
    }
}

#[async_trait]
impl GenerationService for GeminiClient {
    async fn execute(
        &self,
        request: &GenerationRequest,
    ) -> Result<RawServiceResponse, GenerationError> {
        let api_key = self
            .settings
            .api_key
            .as_deref()
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| {
                GenerationError::UpstreamConfig("GEMINI_API_KEY is not configured".to_string())
            })?;

        let body = build_request_body(request);

        let response = self
            .client
            .post(self.endpoint())
            .header("x-goog-api-key", api_key)
            .timeout(self.settings.timeout)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                warn!(operation = ?request.operation_kind, "Gemini request failed: {e}");
                GenerationError::UpstreamUnavailable {
                    status: None,
                    message: if e.is_timeout() {
                        format!("request timed out after {}s", self.settings.timeout.as_secs())
                    } else {
                        e.to_string()
                    },
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ApiError>(&body)
                .map(|e| e.error.message)
                .unwrap_or_else(|_| body.chars().take(ERROR_BODY_LIMIT).collect());
            warn!(operation = ?request.operation_kind, "Gemini API returned {}: {}", status, message);
            return Err(GenerationError::UpstreamUnavailable {
                status: Some(status.as_u16()),
                message,
            });
        }

        let raw: RawServiceResponse = response.json().await.map_err(|e| {
            GenerationError::MalformedResponse(format!("undecodable response envelope: {e}"))
        })?;

        if let Some(usage) = &raw.usage_metadata {
            debug!(
                operation = ?request.operation_kind,
                "Gemini call succeeded: prompt_tokens={}, candidate_tokens={}",
                usage.prompt_token_count, usage.candidates_token_count
            );
        }

        Ok(raw)
    }
}

/// Builds the `generateContent` JSON body for a composed request.
pub fn build_request_body(request: &GenerationRequest) -> Value {
    let mut parts = Vec::new();
    if let Some(attachment) = &request.attachment {
        parts.push(json!({
            "inlineData": {
                "mimeType": attachment.mime_type,
                "data": BASE64.encode(&attachment.data),
            }
        }));
    }
    parts.push(json!({ "text": request.payload }));

    let mut body = json!({
        "contents": [{ "parts": parts }],
        "systemInstruction": { "parts": [{ "text": request.instruction }] },
    });

    if request.grounded {
        body["tools"] = json!([{ "google_search": {} }]);
    }
    if let Some(schema) = &request.response_schema {
        body["generationConfig"] = json!({
            "responseMimeType": "application/json",
            "responseSchema": schema,
        });
    }

    body
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generation::composer::{compose, ComposeInput};

    fn settings(api_key: Option<&str>) -> GeminiSettings {
        GeminiSettings {
            api_key: api_key.map(String::from),
            model: DEFAULT_MODEL.to_string(),
            // Unroutable: any accidental network call fails instead of leaving the host.
            api_base: "http://127.0.0.1:9".to_string(),
            timeout: Duration::from_secs(1),
        }
    }

    #[test]
    fn test_analysis_body_has_schema_and_search_tool() {
        let request = compose(ComposeInput::Analyze {
            resume_text: "Python developer",
            career_goal: "ML Engineer",
        })
        .unwrap();
        let body = build_request_body(&request);

        assert_eq!(body["tools"][0], json!({ "google_search": {} }));
        assert_eq!(body["generationConfig"]["responseMimeType"], "application/json");
        assert_eq!(
            body["generationConfig"]["responseSchema"]["required"][0],
            "resumeScore"
        );
        assert!(body["contents"][0]["parts"][0]["text"]
            .as_str()
            .unwrap()
            .contains("ML Engineer"));
    }

    #[test]
    fn test_extraction_body_inlines_document() {
        let request = compose(ComposeInput::Extract {
            data: b"hello",
            mime_type: "text/plain",
        })
        .unwrap();
        let body = build_request_body(&request);

        assert_eq!(body["contents"][0]["parts"][0]["inlineData"]["data"], "aGVsbG8=");
        assert_eq!(
            body["contents"][0]["parts"][0]["inlineData"]["mimeType"],
            "text/plain"
        );
        assert!(body.get("tools").is_none());
        assert!(body.get("generationConfig").is_none());
    }

    #[test]
    fn test_endpoint_includes_model() {
        let client = GeminiClient::new(settings(Some("k"))).unwrap();
        assert_eq!(
            client.endpoint(),
            format!("http://127.0.0.1:9/models/{DEFAULT_MODEL}:generateContent")
        );
    }

    #[tokio::test]
    async fn test_missing_key_fails_before_network() {
        let client = GeminiClient::new(settings(None)).unwrap();
        let request = compose(ComposeInput::Discover {
            role: "Backend Engineer",
            skills: &[],
        })
        .unwrap();

        let result = client.execute(&request).await;
        assert!(matches!(result, Err(GenerationError::UpstreamConfig(_))));
    }

    #[test]
    fn test_response_text_concatenates_parts() {
        let raw: RawServiceResponse = serde_json::from_value(json!({
            "candidates": [{
                "content": { "parts": [{ "text": "{\"a\":" }, { "text": "1}" }] },
                "finishReason": "STOP"
            }]
        }))
        .unwrap();
        assert_eq!(raw.text().as_deref(), Some("{\"a\":1}"));
    }

    #[test]
    fn test_response_without_parts_has_no_text() {
        let raw: RawServiceResponse =
            serde_json::from_value(json!({ "candidates": [{ "finishReason": "SAFETY" }] })).unwrap();
        assert!(raw.text().is_none());
    }
}
