use async_openai::{config::OpenAIConfig, Client};
use async_trait::async_trait;
use secrecy::ExposeSecret;
use serde::Deserialize;
use serde_json::json;

use crate::{
    config::Config,
    errors::{AppError, AppResult},
    models::domain::GenerationParams,
};

/// One prompt in, one text out. Implementations must not retry.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait GenerationClient: Send + Sync {
    async fn generate(&self, prompt: &str, params: &GenerationParams) -> AppResult<String>;
}

/// Chat-completion client for any OpenAI-compatible endpoint, Gemini included.
pub struct OpenAiCompatibleClient {
    client: Client<OpenAIConfig>,
}

impl OpenAiCompatibleClient {
    pub fn new(config: &Config) -> Self {
        let openai_config = OpenAIConfig::new()
            .with_api_base(config.generation_api_base.clone())
            .with_api_key(config.google_api_key.expose_secret().to_string());

        Self {
            client: Client::with_config(openai_config),
        }
    }
}

#[async_trait]
impl GenerationClient for OpenAiCompatibleClient {
    async fn generate(&self, prompt: &str, params: &GenerationParams) -> AppResult<String> {
        log::debug!(
            "Requesting completion from model {} ({} prompt chars)",
            params.model,
            prompt.chars().count()
        );

        let completion: ChatCompletion = self
            .client
            .chat()
            .create_byot(build_request(prompt, params))
            .await?;

        completion_text(completion)
    }
}

#[derive(Debug, Deserialize)]
struct ChatCompletion {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
    #[serde(default)]
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ChatMessage {
    #[serde(default)]
    content: Option<String>,
}

fn build_request(prompt: &str, params: &GenerationParams) -> serde_json::Value {
    let mut request = json!({
        "model": params.model,
        "messages": [{ "role": "user", "content": prompt }],
        "temperature": params.temperature,
        "n": 1,
    });
    if let Some(max_tokens) = params.max_output_tokens {
        request["max_tokens"] = json!(max_tokens);
    }
    request
}

fn completion_text(completion: ChatCompletion) -> AppResult<String> {
    let choice = completion
        .choices
        .into_iter()
        .next()
        .ok_or_else(|| AppError::GenerationFailed("response contained no choices".to_string()))?;

    if choice.finish_reason.as_deref() == Some("content_filter") {
        return Err(AppError::GenerationFailed(
            "response was blocked by the provider content filter".to_string(),
        ));
    }

    Ok(choice.message.content.unwrap_or_default())
}
