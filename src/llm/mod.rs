//! Completion-service client module.
//!
//! Provides a trait-based abstraction over chat-completion providers, with
//! the OpenAI chat completions API as the primary implementation. The
//! orchestrator only ever sees the trait, so tests can substitute a
//! scripted fake.

mod openai;

pub use openai::OpenAiClient;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Role in a chat conversation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

/// A message in a chat conversation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    /// Create a message with the given role and text content.
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        ChatMessage {
            role,
            content: content.into(),
        }
    }
}

/// Optional parameters for chat completions.
///
/// Intentionally conservative; decomposition wants reproducible output.
#[derive(Debug, Clone, Default)]
pub struct ChatOptions {
    /// Sampling temperature (0 = deterministic).
    pub temperature: Option<f64>,
    /// Maximum output tokens to generate.
    pub max_tokens: Option<u64>,
}

/// Response from a chat completion.
#[derive(Debug, Clone)]
pub struct ChatResponse {
    /// Assistant message text, if the provider returned one.
    pub content: Option<String>,
    /// Model that produced the response.
    pub model: Option<String>,
}

/// Errors from the completion service.
#[derive(Debug, Error)]
pub enum LlmError {
    #[error("completion request failed: {0}")]
    Network(String),

    #[error("completion service returned {status}: {body}")]
    Api { status: u16, body: String },

    #[error("failed to parse completion response: {0}")]
    Parse(String),
}

/// Trait for completion clients.
#[async_trait]
pub trait CompletionClient: Send + Sync {
    /// Send a chat completion request and return the assistant response.
    async fn chat_completion(
        &self,
        messages: &[ChatMessage],
        options: ChatOptions,
    ) -> Result<ChatResponse, LlmError>;
}
