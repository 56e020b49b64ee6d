use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};

use crate::generation::retry::RetryPolicy;
use crate::llm_client::{GeminiSettings, DEFAULT_API_BASE, DEFAULT_MODEL, DEFAULT_TIMEOUT};

/// Application configuration loaded from environment variables.
/// Every variable has a default; a missing Gemini key is reported per call.
#[derive(Debug, Clone)]
pub struct Config {
    pub gemini_api_key: Option<String>,
    pub gemini_model: String,
    pub gemini_api_base: String,
    pub request_timeout: Duration,
    pub analyze_max_attempts: u32,
    pub analyze_base_delay: Duration,
    pub database_url: Option<String>,
    pub upload_dir: PathBuf,
    pub max_upload_bytes: usize,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            gemini_api_key: optional_env("GEMINI_API_KEY"),
            gemini_model: optional_env("GEMINI_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            gemini_api_base: optional_env("GEMINI_API_BASE")
                .unwrap_or_else(|| DEFAULT_API_BASE.to_string()),
            request_timeout: Duration::from_secs(parse_env(
                "REQUEST_TIMEOUT_SECS",
                DEFAULT_TIMEOUT.as_secs(),
            )?),
            analyze_max_attempts: parse_env("ANALYZE_MAX_ATTEMPTS", 5)?,
            analyze_base_delay: Duration::from_millis(parse_env("ANALYZE_BASE_DELAY_MS", 1000)?),
            database_url: optional_env("DATABASE_URL"),
            upload_dir: optional_env("UPLOAD_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("uploads")),
            max_upload_bytes: parse_env("MAX_UPLOAD_BYTES", 5 * 1024 * 1024)?,
            port: parse_env("PORT", 4000)?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }

    pub fn gemini_settings(&self) -> GeminiSettings {
        GeminiSettings {
            api_key: self.gemini_api_key.clone(),
            model: self.gemini_model.clone(),
            api_base: self.gemini_api_base.clone(),
            timeout: self.request_timeout,
        }
    }

    pub fn analyze_retry_policy(&self) -> RetryPolicy {
        RetryPolicy::new(self.analyze_max_attempts, self.analyze_base_delay)
    }
}

fn optional_env(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn parse_env<T>(key: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match optional_env(key) {
        Some(raw) => raw
            .parse::<T>()
            .with_context(|| format!("{key} must be a valid number, got '{raw}'")),
        None => Ok(default),
    }
}

#[cfg(test)]
impl Config {
    /// Configuration for router tests: no credentials, no database, no retry delay.
    pub fn for_tests(upload_dir: PathBuf) -> Self {
        Config {
            gemini_api_key: None,
            gemini_model: DEFAULT_MODEL.to_string(),
            gemini_api_base: DEFAULT_API_BASE.to_string(),
            request_timeout: DEFAULT_TIMEOUT,
            analyze_max_attempts: 5,
            analyze_base_delay: Duration::ZERO,
            database_url: None,
            upload_dir,
            max_upload_bytes: 1024 * 1024,
            port: 0,
            rust_log: "debug".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retry_policy_from_config() {
        let mut config = Config::for_tests(PathBuf::from("uploads"));
        config.analyze_base_delay = Duration::from_millis(1000);
        let policy = config.analyze_retry_policy();
        assert_eq!(policy.max_attempts, 5);
        assert_eq!(policy.delay_after(3), Duration::from_secs(4));
    }

    #[test]
    fn test_gemini_settings_carry_timeout() {
        let settings = Config::for_tests(PathBuf::from("uploads")).gemini_settings();
        assert_eq!(settings.timeout, Duration::from_secs(60));
        assert!(settings.api_key.is_none());
    }
}
