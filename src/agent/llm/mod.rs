//! LLM provider abstraction layer.
//!
//! This module provides a trait-based abstraction for LLM providers,
//! allowing the dispatcher and HTTP routes to work with different
//! chat-completion backends.

mod groq;
mod provider;
mod types;

pub use groq::{GroqProvider, DEFAULT_BASE_URL};
pub use provider::{CompletionOptions, CompletionStream, LlmError, LlmProvider};
pub use types::{CompletionResponse, FinishReason, Message, MessageRole, TokenUsage, ToolCall};
