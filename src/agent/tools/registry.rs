//! Tool registry.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;
use tracing::debug;

/// Description of a tool as advertised to the model.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolDefinition {
    /// Unique tool name, used as the registry key.
    pub name: String,
    pub description: String,
    /// JSON schema for the tool's parameters.
    pub parameters: serde_json::Value,
}

/// Errors that can occur when executing a tool.
#[derive(Debug, Error)]
pub enum ToolError {
    #[error("Unknown tool: {0}")]
    UnknownTool(String),

    #[error("Invalid parameters: {0}")]
    InvalidParams(String),

    #[error("Execution failed: {0}")]
    ExecutionFailed(String),
}

/// A callable tool an agent may invoke during generation.
#[async_trait]
pub trait AgentTool: Send + Sync {
    /// The definition advertised to the model.
    fn definition(&self) -> ToolDefinition;

    /// Execute the tool with the given parameters.
    async fn execute(&self, params: serde_json::Value) -> Result<serde_json::Value, ToolError>;
}

/// In-memory registry mapping tool names to implementations.
///
/// Registering under an existing name overwrites the previous entry
/// while keeping its original insertion position; callers must not rely
/// on the ordering of `list()` beyond that.
#[derive(Default)]
pub struct ToolRegistry {
    tools: Vec<(String, Arc<dyn AgentTool>)>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or overwrite a tool, keyed by its definition name.
    pub fn register(&mut self, tool: Arc<dyn AgentTool>) {
        let name = tool.definition().name;
        debug!(tool = %name, "Registering tool");
        match self.tools.iter_mut().find(|(n, _)| *n == name) {
            Some(entry) => entry.1 = tool,
            None => self.tools.push((name, tool)),
        }
    }

    /// Remove a tool; returns whether an entry existed.
    pub fn deregister(&mut self, name: &str) -> bool {
        let before = self.tools.len();
        self.tools.retain(|(n, _)| n != name);
        self.tools.len() != before
    }

    pub fn get(&self, name: &str) -> Option<Arc<dyn AgentTool>> {
        self.tools
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, t)| t.clone())
    }

    /// All registered tool definitions, in insertion order.
    pub fn list(&self) -> Vec<ToolDefinition> {
        self.tools.iter().map(|(_, t)| t.definition()).collect()
    }

    /// Tools whose name contains the category substring, case-insensitive.
    ///
    /// This is a naive filter, not a real taxonomy; "git" matches "github".
    pub fn list_by_category(&self, category: &str) -> Vec<ToolDefinition> {
        let category = category.to_lowercase();
        self.tools
            .iter()
            .filter(|(name, _)| name.to_lowercase().contains(&category))
            .map(|(_, t)| t.definition())
            .collect()
    }

    /// Resolve a set of names to definitions, skipping unknown ones.
    pub fn definitions_for(&self, names: &[String]) -> Vec<ToolDefinition> {
        names
            .iter()
            .filter_map(|name| self.get(name).map(|t| t.definition()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FakeTool {
        name: &'static str,
        description: &'static str,
    }

    #[async_trait]
    impl AgentTool for FakeTool {
        fn definition(&self) -> ToolDefinition {
            ToolDefinition {
                name: self.name.to_string(),
                description: self.description.to_string(),
                parameters: serde_json::json!({"type": "object"}),
            }
        }

        async fn execute(&self, _params: serde_json::Value) -> Result<serde_json::Value, ToolError> {
            Ok(serde_json::json!({"ok": true}))
        }
    }

    fn fake(name: &'static str, description: &'static str) -> Arc<dyn AgentTool> {
        Arc::new(FakeTool { name, description })
    }

    #[test]
    fn test_register_and_lookup() {
        let mut registry = ToolRegistry::new();
        registry.register(fake("github", "github tool"));
        registry.register(fake("search", "search tool"));

        assert!(registry.get("github").is_some());
        assert!(registry.get("missing").is_none());
        assert_eq!(registry.list().len(), 2);
    }

    #[test]
    fn test_register_overwrites_existing_name() {
        let mut registry = ToolRegistry::new();
        registry.register(fake("github", "first"));
        registry.register(fake("github", "second"));

        let listed = registry.list();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].description, "second");
        assert_eq!(registry.get("github").unwrap().definition().description, "second");
    }

    #[test]
    fn test_deregister() {
        let mut registry = ToolRegistry::new();
        registry.register(fake("github", "github tool"));

        assert!(registry.deregister("github"));
        assert!(!registry.deregister("github"));
        assert!(registry.get("github").is_none());
    }

    #[test]
    fn test_list_by_category_substring_match() {
        let mut registry = ToolRegistry::new();
        registry.register(fake("github", "github tool"));
        registry.register(fake("search", "search tool"));

        let git_tools = registry.list_by_category("git");
        assert_eq!(git_tools.len(), 1);
        assert_eq!(git_tools[0].name, "github");

        let git_tools = registry.list_by_category("GIT");
        assert_eq!(git_tools.len(), 1);

        assert!(registry.list_by_category("jira").is_empty());
    }

    #[test]
    fn test_definitions_for_skips_unknown() {
        let mut registry = ToolRegistry::new();
        registry.register(fake("github", "github tool"));

        let defs =
            registry.definitions_for(&["github".to_string(), "missing".to_string()]);
        assert_eq!(defs.len(), 1);
        assert_eq!(defs[0].name, "github");
    }
}
