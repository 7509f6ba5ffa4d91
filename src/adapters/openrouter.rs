//! OpenRouter chat-completions client for the reasoning engine.
//!
//! One user message per request, low temperature, no streaming and no
//! retries: a failed call is reported to the caller as-is.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{truncate, EngineError, ReasoningEngine};
use crate::config::{ConfigError, EngineSettings, ENV_OPENROUTER_KEY};

pub struct OpenRouterEngine {
    client: reqwest::Client,
    endpoint: String,
    model: String,
    temperature: f32,
    timeout: Duration,
    api_key: String,
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 1],
    temperature: f32,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ReplyMessage,
}

#[derive(Debug, Deserialize)]
struct ReplyMessage {
    #[serde(default)]
    content: Option<String>,
}

impl OpenRouterEngine {
    /// Create an engine client; the API key must already be resolved
    pub fn new(client: reqwest::Client, settings: &EngineSettings) -> Result<Self, ConfigError> {
        let api_key = settings
            .api_key
            .clone()
            .ok_or(ConfigError::MissingCredential(ENV_OPENROUTER_KEY))?;

        Ok(Self {
            client,
            endpoint: format!("{}/chat/completions", settings.base_url.trim_end_matches('/')),
            model: settings.model.clone(),
            temperature: settings.temperature,
            timeout: settings.timeout,
            api_key,
        })
    }
}

/// Extract the first choice's text, trimmed
fn reply_text(body: &str) -> Result<String, EngineError> {
    let response: ChatResponse =
        serde_json::from_str(body).map_err(|e| EngineError::Decode(e.to_string()))?;

    let content = response
        .choices
        .into_iter()
        .next()
        .and_then(|c| c.message.content)
        .map(|c| c.trim().to_string())
        .unwrap_or_default();

    if content.is_empty() {
        return Err(EngineError::EmptyReply);
    }
    Ok(content)
}

#[async_trait]
impl ReasoningEngine for OpenRouterEngine {
    fn name(&self) -> &str {
        &self.model
    }

    async fn complete(&self, prompt: &str) -> Result<String, EngineError> {
        let request = ChatRequest {
            model: &self.model,
            messages: [ChatMessage {
                role: "user",
                content: prompt,
            }],
            temperature: self.temperature,
        };

        debug!(model = %self.model, prompt_chars = prompt.len(), "Sending prompt to reasoning engine");

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .timeout(self.timeout)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(EngineError::Status {
                status: status.as_u16(),
                body: truncate(&body, 300),
            });
        }

        reply_text(&body)
    }
}
