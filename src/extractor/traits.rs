// Completion client trait: the provider abstraction for topic extraction.
//
// A client turns one CompletionRequest into the text of the first response
// choice, or a CompletionError saying which kind of failure happened.

use async_trait::async_trait;
use serde::Serialize;
use thiserror::Error;

/// A single chat-completion request: one system instruction, one user message.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompletionRequest {
    pub model: String,
    pub system: String,
    pub user: String,
    pub temperature: f32,
    /// Hard cap on response length, in tokens
    pub max_tokens: u32,
}

/// Why a completion call failed.
///
/// `Service` covers transport errors and non-success HTTP statuses: the
/// provider never produced an answer. `Unexpected` covers everything else:
/// the call went through but the response could not be turned into text.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CompletionError {
    #[error("{}", describe_service(.status, .detail))]
    Service { status: Option<u16>, detail: String },

    #[error("{detail}")]
    Unexpected { detail: String },
}

fn describe_service(status: &Option<u16>, detail: &str) -> String {
    match status {
        Some(code) => format!("API returned {code}: {detail}"),
        None => format!("request failed: {detail}"),
    }
}

/// Trait for language-model providers. Async because every real provider is
/// an HTTP API.
#[async_trait]
pub trait CompletionClient: Send + Sync {
    /// Send one request and return the raw text of the first choice.
    async fn complete(&self, request: &CompletionRequest) -> Result<String, CompletionError>;
}
