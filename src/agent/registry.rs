//! Agent registry.

use serde::{Deserialize, Serialize};
use tracing::debug;

fn default_model() -> String {
    "llama3-8b-8192".to_string()
}

fn default_active() -> bool {
    true
}

/// A named configuration pairing a system prompt, a model identifier, and
/// an optional tool set, used to scope a completion request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Agent {
    /// Unique agent id, used as the registry key.
    pub id: String,
    pub name: String,
    pub description: String,
    pub system_prompt: String,
    /// Names of registered tools this agent may use, in order.
    #[serde(default)]
    pub tools: Vec<String>,
    /// Model identifier; not validated against the upstream provider.
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default = "default_active")]
    pub active: bool,
}

/// In-memory registry mapping agent ids to definitions.
///
/// Same overwrite semantics as the tool registry: last register wins,
/// original insertion position is kept.
#[derive(Default)]
pub struct AgentRegistry {
    agents: Vec<Agent>,
}

impl AgentRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry pre-populated with the built-in GitHub agent.
    pub fn with_builtin_agents() -> Self {
        let mut registry = Self::new();
        registry.register(github_agent());
        registry
    }

    /// Insert or overwrite an agent, keyed by its id.
    pub fn register(&mut self, agent: Agent) {
        debug!(agent = %agent.id, "Registering agent");
        match self.agents.iter_mut().find(|a| a.id == agent.id) {
            Some(existing) => *existing = agent,
            None => self.agents.push(agent),
        }
    }

    /// Remove an agent; returns whether an entry existed.
    pub fn deregister(&mut self, agent_id: &str) -> bool {
        let before = self.agents.len();
        self.agents.retain(|a| a.id != agent_id);
        self.agents.len() != before
    }

    pub fn get(&self, agent_id: &str) -> Option<&Agent> {
        self.agents.iter().find(|a| a.id == agent_id)
    }

    pub fn list(&self) -> Vec<Agent> {
        self.agents.clone()
    }
}

/// The built-in GitHub agent, registered at startup.
pub fn github_agent() -> Agent {
    Agent {
        id: "github".to_string(),
        name: "GitHub Agent".to_string(),
        description: "Interacts with GitHub repositories, PRs, and issues".to_string(),
        system_prompt: "You are a GitHub agent that can help users interact with GitHub repositories.\n\
                        You can summarize PRs, list issues, check repository status, and more.\n\
                        Always respond in a helpful and concise manner."
            .to_string(),
        tools: vec!["github".to_string()],
        model: default_model(),
        active: true,
    }
}
