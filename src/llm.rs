//! OpenRouter (OpenAI-style) chat-completion client.

use std::time::Duration;

use axum::async_trait;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::hashtags::COUNTRIES;

pub const DEFAULT_API_URL: &str = "https://openrouter.ai/api/v1/chat/completions";
pub const DEFAULT_MODEL: &str = "openai/gpt-4o";
pub const DEFAULT_TEMPERATURE: f32 = 0.7;
pub const DEFAULT_MAX_TOKENS: u32 = 1000;

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

/// Request body for the chat-completion endpoint.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ChatRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    pub temperature: f32,
    pub max_tokens: u32,
}

impl ChatRequest {
    /// One-shot user prompt.
    pub fn user_prompt(model: &str, prompt: String, temperature: f32, max_tokens: u32) -> Self {
        Self {
            model: model.to_string(),
            messages: vec![ChatMessage {
                role: "user".to_string(),
                content: prompt,
            }],
            temperature,
            max_tokens,
        }
    }
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: Option<ChoiceMessage>,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

#[derive(Debug, Error)]
pub enum UpstreamError {
    #[error("request timed out")]
    Timeout,
    #[error("transport error: {0}")]
    Transport(#[source] reqwest::Error),
    #[error("upstream returned status {0}")]
    Status(StatusCode),
    #[error("response had no message content")]
    MissingContent,
    #[error("response body was not a chat completion: {0}")]
    Unparsable(#[source] reqwest::Error),
}

impl From<reqwest::Error> for UpstreamError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            UpstreamError::Timeout
        } else {
            UpstreamError::Transport(e)
        }
    }
}

/// A chat-completion backend that returns the first choice's message text.
#[async_trait]
pub trait ChatCompletion: Send + Sync {
    async fn complete(&self, api_key: &str, request: &ChatRequest) -> Result<String, UpstreamError>;
}

/// Prompt asking for a per-country breakdown of the given hashtags.
pub fn build_prompt(hashtags: &[String]) -> String {
    format!(
        "Analyze these Instagram hashtags: {}. Return JSON with country usage data for {}. Use realistic numbers between 500-5000.",
        hashtags.join(", "),
        COUNTRIES.join(", ")
    )
}

pub struct OpenRouterClient {
    http: reqwest::Client,
    url: String,
}

impl OpenRouterClient {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self, reqwest::Error> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            url: url.into(),
        })
    }
}

#[async_trait]
impl ChatCompletion for OpenRouterClient {
    async fn complete(&self, api_key: &str, request: &ChatRequest) -> Result<String, UpstreamError> {
        let response = self
            .http
            .post(&self.url)
            .header("Authorization", format!("Bearer {}", api_key))
            .json(request)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(UpstreamError::Status(response.status()));
        }

        let body: ChatResponse = response.json().await.map_err(|e| {
            if e.is_timeout() {
                UpstreamError::Timeout
            } else {
                UpstreamError::Unparsable(e)
            }
        })?;

        body.choices
            .into_iter()
            .next()
            .and_then(|c| c.message)
            .and_then(|m| m.content)
            .filter(|content| !content.is_empty())
            .ok_or(UpstreamError::MissingContent)
    }
}
