//! Language model client
//!
//! Speaks the OpenAI-compatible chat completions API, which the hosted AI
//! gateway and most self-hosted model servers expose.

use async_trait::async_trait;
use mockall::automock;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use thiserror::Error;

const SYSTEM_PROMPT: &str = "You recommend grocery products. \
    Answer with a JSON array of product ids and nothing else.";

#[derive(Debug, Clone)]
pub struct ModelConfig {
    /// Base URL, e.g. `"https://gateway.example.com/v1"`.
    pub api_url: String,

    pub api_key: String,

    pub model: String,
}

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("language model rate limit reached")]
    RateLimited,

    #[error("unexpected response from language model: {0}")]
    UnexpectedResponse(String),
}

#[automock]
#[async_trait]
pub trait LanguageModel: Send + Sync {
    /// Send `prompt` and return the model's text answer.
    async fn complete(&self, prompt: String) -> Result<String, ModelError>;
}

#[derive(Debug, Clone)]
pub struct OpenAiCompatibleModel {
    config: ModelConfig,
    http: Client,
}

impl OpenAiCompatibleModel {
    #[must_use]
    pub fn new(config: ModelConfig) -> Self {
        Self {
            config,
            http: Client::new(),
        }
    }

    fn completions_url(&self) -> String {
        format!(
            "{}/chat/completions",
            self.config.api_url.trim_end_matches('/')
        )
    }
}

#[async_trait]
impl LanguageModel for OpenAiCompatibleModel {
    #[tracing::instrument(
        name = "recommendations.model.complete",
        skip(self, prompt),
        fields(model = %self.config.model),
        err
    )]
    async fn complete(&self, prompt: String) -> Result<String, ModelError> {
        let body = ChatRequest {
            model: &self.config.model,
            messages: [
                ChatMessage {
                    role: "system",
                    content: SYSTEM_PROMPT,
                },
                ChatMessage {
                    role: "user",
                    content: &prompt,
                },
            ],
        };

        let response = self
            .http
            .post(self.completions_url())
            .bearer_auth(&self.config.api_key)
            .json(&body)
            .send()
            .await?;

        if response.status() == StatusCode::TOO_MANY_REQUESTS {
            return Err(ModelError::RateLimited);
        }

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();

            return Err(ModelError::UnexpectedResponse(format!(
                "completion request failed with status {status}: {text}"
            )));
        }

        let parsed: ChatResponse = response.json().await?;

        first_choice(parsed)
    }
}

fn first_choice(response: ChatResponse) -> Result<String, ModelError> {
    response
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message.content)
        .ok_or_else(|| ModelError::UnexpectedResponse("no completion choices".to_string()))
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 2],
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ChatResponseMessage {
    content: Option<String>,
}
