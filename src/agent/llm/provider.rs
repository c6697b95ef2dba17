//! LLM provider trait definition.

use super::types::{CompletionResponse, Message};
use crate::agent::tools::ToolDefinition;
use async_trait::async_trait;
use futures::stream::BoxStream;
use std::time::Duration;
use thiserror::Error;

/// Options for a completion request.
#[derive(Debug, Clone)]
pub struct CompletionOptions {
    /// Temperature for sampling (0.0 = deterministic, 1.0 = creative).
    pub temperature: f32,
    /// Maximum tokens to generate.
    pub max_tokens: Option<u32>,
    /// Request timeout.
    pub timeout: Duration,
}

impl Default for CompletionOptions {
    fn default() -> Self {
        Self {
            temperature: 0.7,
            max_tokens: Some(800),
            timeout: Duration::from_secs(120),
        }
    }
}

/// Errors that can occur when interacting with an LLM provider.
#[derive(Debug, Error)]
pub enum LlmError {
    #[error("Missing API key")]
    MissingApiKey,

    #[error("Connection error: {0}")]
    Connection(String),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Request timeout")]
    Timeout,

    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// Raw bytes of a streaming completion, as delivered by the provider.
pub type CompletionStream = BoxStream<'static, Result<Vec<u8>, LlmError>>;

/// Trait for LLM providers.
///
/// Implementations of this trait can connect to different chat-completion
/// backends while providing a unified interface to the dispatcher and the
/// HTTP routes.
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Get the provider's name (e.g., "groq").
    fn name(&self) -> &str;

    /// Get the default model being used.
    fn model(&self) -> &str;

    /// Complete a conversation, optionally with tool support.
    ///
    /// # Arguments
    /// * `model` - Model identifier to use for this request.
    /// * `messages` - The conversation history.
    /// * `tools` - Optional tool definitions the model can use.
    /// * `options` - Completion options (temperature, timeout, etc.).
    async fn complete(
        &self,
        model: &str,
        messages: &[Message],
        tools: Option<&[ToolDefinition]>,
        options: &CompletionOptions,
    ) -> Result<CompletionResponse, LlmError>;

    /// Complete a conversation, streaming the raw response body.
    ///
    /// The bytes are forwarded verbatim (SSE pass-through), letting the
    /// HTTP layer relay them without re-framing.
    async fn complete_stream(
        &self,
        model: &str,
        messages: &[Message],
        options: &CompletionOptions,
    ) -> Result<CompletionStream, LlmError>;

    /// Probe the provider's model listing endpoint.
    ///
    /// Used to validate connectivity and credentials; returns the number
    /// of models the provider advertises.
    async fn list_models(&self) -> Result<usize, LlmError>;
}
