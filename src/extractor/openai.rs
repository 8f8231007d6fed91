// OpenAI-compatible chat-completions client.
//
// Sends one system message and one user message per request and returns the
// content of the first choice. Any endpoint speaking the same wire format
// (OpenAI, OpenRouter, a local proxy) works by changing the base URL.
//
// API docs: https://platform.openai.com/docs/api-reference/chat/create

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::traits::{CompletionClient, CompletionError, CompletionRequest};
use crate::error::PrepError;

pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

/// Chat-completions client authenticated with a bearer API key.
pub struct OpenAiClient {
    client: Client,
    base_url: String,
    api_key: String,
}

impl OpenAiClient {
    /// Create a client for `base_url` (e.g. `https://api.openai.com/v1`).
    ///
    /// `timeout` bounds each request; `None` keeps reqwest's default.
    pub fn new(
        base_url: &str,
        api_key: &str,
        timeout: Option<Duration>,
    ) -> Result<Self, PrepError> {
        if api_key.trim().is_empty() {
            return Err(PrepError::Config(
                "OpenAI API key is empty. Set OPENAI_API_KEY in your .env file.".to_string(),
            ));
        }

        let mut builder = Client::builder().user_agent("postprep/0.1 (fine-tuning data prep)");
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| PrepError::Config(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
        })
    }

    fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.base_url)
    }
}

#[async_trait]
impl CompletionClient for OpenAiClient {
    async fn complete(&self, request: &CompletionRequest) -> Result<String, CompletionError> {
        let body = ChatRequest {
            model: &request.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: &request.system,
                },
                ChatMessage {
                    role: "user",
                    content: &request.user,
                },
            ],
            temperature: request.temperature,
            max_tokens: request.max_tokens,
        };

        let response = self
            .client
            .post(self.endpoint())
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| CompletionError::Service {
                status: e.status().map(|s| s.as_u16()),
                detail: e.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(CompletionError::Service {
                status: Some(status.as_u16()),
                detail: text,
            });
        }

        let text = response.text().await.map_err(|e| CompletionError::Service {
            status: Some(status.as_u16()),
            detail: format!("failed to read response body: {e}"),
        })?;

        let parsed: ChatCompletionResponse =
            serde_json::from_str(&text).map_err(|e| CompletionError::Unexpected {
                detail: format!("failed to parse chat completion response: {e}"),
            })?;

        let content = parsed.first_content()?;
        debug!(
            model = %request.model,
            choices = parsed.choices.len(),
            "Chat completion received"
        );
        Ok(content.to_string())
    }
}

// --- Chat completions request/response types ---

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

/// Response body of `POST /chat/completions`. Only the fields we read.
#[derive(Debug, Clone, Deserialize)]
pub struct ChatCompletionResponse {
    #[serde(default)]
    pub choices: Vec<ChatChoice>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChatChoice {
    pub message: ChoiceMessage,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChoiceMessage {
    pub content: Option<String>,
}

impl ChatCompletionResponse {
    /// Content of the top choice. An empty choice list or a null content
    /// (e.g. a refusal or tool call) is an unexpected response.
    pub fn first_content(&self) -> Result<&str, CompletionError> {
        let choice = self
            .choices
            .first()
            .ok_or_else(|| CompletionError::Unexpected {
                detail: "response contained no choices".to_string(),
            })?;
        choice
            .message
            .content
            .as_deref()
            .ok_or_else(|| CompletionError::Unexpected {
                detail: "first choice has no message content".to_string(),
            })
    }
}
