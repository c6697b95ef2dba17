//! Agent tool registry and implementations.
//!
//! Tools are functions that agents can call to interact with external systems.
//! This module provides the trait definition, a registry for managing tools,
//! and the bundled GitHub tool.

mod github;
mod registry;

pub use github::GithubTool;
pub use registry::{AgentTool, ToolDefinition, ToolError, ToolRegistry};
