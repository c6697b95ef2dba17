//! Mock LLM provider for end-to-end tests
//!
//! Stands in for the Groq backend so tests never touch the network. The
//! provider either replays a script of pre-baked responses, answers with
//! a fixed default text, or fails every call as if no API key were set.

use agentdock::agent::llm::{
    CompletionOptions, CompletionResponse, CompletionStream, FinishReason, LlmError, LlmProvider,
    Message, MessageRole, ToolCall,
};
use agentdock::agent::tools::ToolDefinition;
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

pub const DEFAULT_ANSWER: &str = "This is a mock response.";
pub const STREAM_CHUNKS: [&str; 2] = ["data: hello\n\n", "data: world\n\n"];

pub struct MockLlmProvider {
    script: Mutex<VecDeque<Result<CompletionResponse, LlmError>>>,
    calls: AtomicUsize,
    has_api_key: bool,
}

impl MockLlmProvider {
    /// A provider that always answers with the default text.
    pub fn new() -> Arc<Self> {
        Self::scripted(Vec::new())
    }

    /// A provider that replays the given responses in order, then falls
    /// back to the default text.
    pub fn scripted(script: Vec<Result<CompletionResponse, LlmError>>) -> Arc<Self> {
        Arc::new(Self {
            script: Mutex::new(script.into()),
            calls: AtomicUsize::new(0),
            has_api_key: true,
        })
    }

    /// A provider that fails every call as if no API key were configured.
    pub fn missing_key() -> Arc<Self> {
        Arc::new(Self {
            script: Mutex::new(VecDeque::new()),
            calls: AtomicUsize::new(0),
            has_api_key: false,
        })
    }

    pub fn has_api_key(&self) -> bool {
        self.has_api_key
    }

    /// Number of completion calls made so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl LlmProvider for MockLlmProvider {
    fn name(&self) -> &str {
        "mock"
    }

    fn model(&self) -> &str {
        "mock-model"
    }

    async fn complete(
        &self,
        _model: &str,
        _messages: &[Message],
        _tools: Option<&[ToolDefinition]>,
        _options: &CompletionOptions,
    ) -> Result<CompletionResponse, LlmError> {
        if !self.has_api_key {
            return Err(LlmError::MissingApiKey);
        }
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.script
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| text_response(DEFAULT_ANSWER))
    }

    async fn complete_stream(
        &self,
        _model: &str,
        _messages: &[Message],
        _options: &CompletionOptions,
    ) -> Result<CompletionStream, LlmError> {
        if !self.has_api_key {
            return Err(LlmError::MissingApiKey);
        }
        self.calls.fetch_add(1, Ordering::SeqCst);
        let chunks: Vec<Result<Vec<u8>, LlmError>> = STREAM_CHUNKS
            .iter()
            .map(|chunk| Ok(chunk.as_bytes().to_vec()))
            .collect();
        Ok(Box::pin(futures::stream::iter(chunks)))
    }

    async fn list_models(&self) -> Result<usize, LlmError> {
        if !self.has_api_key {
            return Err(LlmError::MissingApiKey);
        }
        Ok(3)
    }
}

pub fn text_response(text: &str) -> Result<CompletionResponse, LlmError> {
    Ok(CompletionResponse {
        message: Message::assistant(text),
        finish_reason: FinishReason::Stop,
        usage: None,
    })
}

pub fn tool_call_response(
    name: &str,
    arguments: serde_json::Value,
) -> Result<CompletionResponse, LlmError> {
    Ok(CompletionResponse {
        message: Message {
            role: MessageRole::Assistant,
            content: String::new(),
            tool_calls: Some(vec![ToolCall {
                id: "call_0".to_string(),
                name: name.to_string(),
                arguments,
            }]),
            tool_call_id: None,
            tool_name: None,
        },
        finish_reason: FinishReason::ToolCalls,
        usage: None,
    })
}
