//! Upload coordinator: stores an uploaded resume just long enough to extract its
//! text (and optionally analyze it), then removes it.
//!
//! The stored file is owned by a `TempUpload` guard. Dropping the guard deletes the
//! file, so cleanup runs on success, on every `?` early return, and during unwinding.

use std::io::Write;
use std::path::{Path, PathBuf};

use bytes::Bytes;
use chrono::Utc;
use serde::Serialize;
use tempfile::NamedTempFile;
use tracing::{debug, info, warn};

use crate::analysis::models::AnalysisResult;
use crate::analysis::service::analyze_resume;
use crate::errors::AppError;
use crate::generation::composer::{compose, ComposeInput};
use crate::generation::retry::RetryPolicy;
use crate::generation::{run_generation, CallTracker};
use crate::llm_client::GenerationService;

/// A file as received from the multipart body, before it touches the disk.
#[derive(Debug, Clone)]
pub struct IncomingFile {
    pub original_name: String,
    pub content_type: Option<String>,
    pub data: Bytes,
}

#[derive(Debug, Clone)]
pub struct UploadedDocument {
    pub path: PathBuf,
    pub original_name: String,
    pub size_bytes: u64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadOutcome {
    pub extracted_text: String,
    pub character_count: usize,
    pub analysis: Option<AnalysisResult>,
}

/// Exclusive owner of one stored upload.
pub struct TempUpload {
    file: Option<NamedTempFile>,
    document: UploadedDocument,
}

impl TempUpload {
    /// Writes `incoming` under `dir` as `<unix-millis>-<random>[.ext]`.
    pub fn store(dir: &Path, incoming: &IncomingFile) -> Result<Self, AppError> {
        std::fs::create_dir_all(dir).map_err(|e| {
            AppError::Storage(format!("cannot create upload dir {}: {e}", dir.display()))
        })?;

        let prefix = format!("{}-", Utc::now().timestamp_millis());
        let suffix = extension(&incoming.original_name)
            .map(|ext| format!(".{ext}"))
            .unwrap_or_default();

        let mut file = tempfile::Builder::new()
            .prefix(&prefix)
            .suffix(&suffix)
            .rand_bytes(8)
            .tempfile_in(dir)
            .map_err(|e| AppError::Storage(format!("cannot create upload file: {e}")))?;
        file.write_all(&incoming.data)
            .and_then(|_| file.flush())
            .map_err(|e| AppError::Storage(format!("cannot write upload file: {e}")))?;

        let document = UploadedDocument {
            path: file.path().to_path_buf(),
            original_name: incoming.original_name.clone(),
            size_bytes: incoming.data.len() as u64,
        };
        debug!("Stored upload '{}' at {}", document.original_name, document.path.display());

        Ok(Self {
            file: Some(file),
            document,
        })
    }

    /// Runs `store` on the blocking pool so the disk write stays off the runtime threads.
    pub async fn store_blocking(dir: &Path, incoming: &IncomingFile) -> Result<Self, AppError> {
        let dir = dir.to_path_buf();
        let incoming = incoming.clone();
        tokio::task::spawn_blocking(move || Self::store(&dir, &incoming))
            .await
            .map_err(|e| AppError::Storage(format!("upload storage task failed: {e}")))?
    }

    pub fn document(&self) -> &UploadedDocument {
        &self.document
    }
}

impl Drop for TempUpload {
    fn drop(&mut self) {
        let Some(file) = self.file.take() else {
            return;
        };
        match file.close() {
            Ok(()) => debug!("Removed upload {}", self.document.path.display()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => warn!("Failed to remove upload {}: {e}", self.document.path.display()),
        }
    }
}

/// Extracts text from an uploaded resume and, when a career goal is given,
/// analyzes it through the retried analysis path.
pub async fn handle_upload(
    generator: &dyn GenerationService,
    policy: &RetryPolicy,
    upload_dir: &Path,
    file: Option<IncomingFile>,
    career_goal: Option<&str>,
) -> Result<UploadOutcome, AppError> {
    let incoming = file
        .filter(|f| !f.data.is_empty())
        .ok_or(AppError::NoFileProvided)?;

    let upload = TempUpload::store_blocking(upload_dir, &incoming).await?;
    let document = upload.document();
    info!(
        "Received upload '{}' ({} bytes)",
        document.original_name, document.size_bytes
    );

    let data = tokio::fs::read(&document.path)
        .await
        .map_err(|e| AppError::Storage(format!("cannot read upload file: {e}")))?;
    let mime_type = detect_mime_type(&document.original_name, incoming.content_type.as_deref());

    let extracted_text = extract_text(generator, &data, mime_type)
        .await
        .map_err(|e| AppError::generation("Failed to extract text from the uploaded file.", e))?;
    let character_count = extracted_text.chars().count();

    let analysis = match career_goal.map(str::trim).filter(|g| !g.is_empty()) {
        Some(goal) => Some(
            analyze_resume(generator, policy, &extracted_text, goal)
                .await
                .map_err(|e| AppError::generation("Failed to analyze resume with Gemini.", e))?,
        ),
        None => None,
    };

    drop(upload);

    Ok(UploadOutcome {
        extracted_text,
        character_count,
        analysis,
    })
}

async fn extract_text(
    generator: &dyn GenerationService,
    data: &[u8],
    mime_type: &str,
) -> Result<String, crate::generation::GenerationError> {
    let request = compose(ComposeInput::Extract { data, mime_type })?;
    let mut call = CallTracker::new(request.operation_kind);
    let (payload, _) = run_generation(generator, &RetryPolicy::none(), &request, &mut call).await?;
    payload.into_text()
}

fn extension(name: &str) -> Option<String> {
    Path::new(name)
        .extension()
        .and_then(|e| e.to_str())
        .filter(|e| !e.is_empty() && e.chars().all(|c| c.is_ascii_alphanumeric()))
        .map(|e| e.to_ascii_lowercase())
}

/// Picks the MIME type from the file extension, falling back to the declared type.
fn detect_mime_type<'a>(name: &str, declared: Option<&'a str>) -> &'a str {
    match extension(name).as_deref() {
        Some("pdf") => "application/pdf",
        Some("txt") => "text/plain",
        Some("md") => "text/markdown",
        Some("doc") => "application/msword",
        Some("docx") => "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
        Some("rtf") => "application/rtf",
        _ => declared
            .map(str::trim)
            .filter(|d| !d.is_empty())
            .unwrap_or("application/octet-stream"),
    }
}
