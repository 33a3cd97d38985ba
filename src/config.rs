use std::{env, path::PathBuf};

use secrecy::{ExposeSecret, SecretString};

use crate::errors::{AppError, AppResult};

pub const DEFAULT_GENERATION_API_BASE: &str =
    "https://generativelanguage.googleapis.com/v1beta/openai";
pub const DEFAULT_GENERATION_MODEL: &str = "gemini-2.0-flash";

#[derive(Clone, Debug)]
pub struct Config {
    pub web_server_host: String,
    pub web_server_port: u16,
    pub google_api_key: SecretString,
    pub generation_api_base: String,
    pub generation_model: String,
    pub career_guide_pdf: PathBuf,
    pub learning_tracks_pdf: PathBuf,
    pub max_upload_bytes: usize,
    pub fetch_timeout_secs: u64,
    pub cors_allowed_origin: Option<String>,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            web_server_host: env::var("WEB_SERVER_HOST")
                .unwrap_or_else(|_| "localhost".to_string()),
            web_server_port: env::var("WEB_SERVER_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(8080),
            google_api_key: SecretString::from(env::var("GOOGLE_API_KEY").unwrap_or_default()),
            generation_api_base: env::var("GENERATION_API_BASE")
                .unwrap_or_else(|_| DEFAULT_GENERATION_API_BASE.to_string()),
            generation_model: env::var("GENERATION_MODEL")
                .unwrap_or_else(|_| DEFAULT_GENERATION_MODEL.to_string()),
            career_guide_pdf: env::var("CAREER_GUIDE_PDF")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("Career_Domain_Knowledge_Guide.pdf")),
            learning_tracks_pdf: env::var("LEARNING_TRACKS_PDF")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("learning_tracks_30_domains.pdf")),
            max_upload_bytes: env::var("MAX_UPLOAD_BYTES")
                .ok()
                .and_then(|b| b.parse().ok())
                .unwrap_or(20 * 1024 * 1024),
            fetch_timeout_secs: env::var("FETCH_TIMEOUT_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(30),
            cors_allowed_origin: env::var("CORS_ALLOWED_ORIGIN").ok(),
        }
    }

    /// Rejects configurations that cannot reach the generation endpoint.
    pub fn validate(&self) -> AppResult<()> {
        if self.google_api_key.expose_secret().trim().is_empty() {
            return Err(AppError::Configuration(
                "GOOGLE_API_KEY is not set. Provide it through the environment or a .env file"
                    .to_string(),
            ));
        }

        if self.generation_model.trim().is_empty() {
            return Err(AppError::Configuration(
                "GENERATION_MODEL must not be empty".to_string(),
            ));
        }

        if !self.generation_api_base.starts_with("http://")
            && !self.generation_api_base.starts_with("https://")
        {
            return Err(AppError::Configuration(format!(
                "GENERATION_API_BASE must be an http(s) URL, got '{}'",
                self.generation_api_base
            )));
        }

        Ok(())
    }

    pub fn test_config() -> Self {
        Self {
            web_server_host: "127.0.0.1".to_string(),
            web_server_port: 8080,
            google_api_key: SecretString::from("test_api_key".to_string()),
            generation_api_base: "http://127.0.0.1:9".to_string(),
            generation_model: "test-model".to_string(),
            career_guide_pdf: PathBuf::from("missing_career_guide.pdf"),
            learning_tracks_pdf: PathBuf::from("missing_learning_tracks.pdf"),
            max_upload_bytes: 1024 * 1024,
            fetch_timeout_secs: 1,
            cors_allowed_origin: None,
        }
    }
}
