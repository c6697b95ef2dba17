//! AgentDock Server Library
//!
//! This library exposes the internal modules for testing and potential reuse.

pub mod agent;
pub mod config;
pub mod server;
pub mod store;

// Re-export commonly used types for convenience
pub use agent::dispatcher::{DispatchError, QueryDispatcher};
pub use agent::llm::{GroqProvider, LlmProvider};
pub use agent::registry::{Agent, AgentRegistry};
pub use agent::tools::{AgentTool, GithubTool, ToolRegistry};
pub use server::{run_server, RequestsLoggingLevel};
