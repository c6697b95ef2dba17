use axum::extract::FromRef;

use crate::agent::llm::LlmProvider;
use crate::agent::{AgentRegistry, QueryDispatcher};
use crate::agent::tools::ToolRegistry;
use crate::store::{ActivityLogStore, EnvVarStore};
use std::sync::{Arc, Mutex};
use std::time::Instant;

use super::RequestsLoggingLevel;

pub type GuardedAgentRegistry = Arc<Mutex<AgentRegistry>>;
pub type GuardedToolRegistry = Arc<Mutex<ToolRegistry>>;
pub type GuardedEnvVarStore = Arc<EnvVarStore>;
pub type GuardedActivityLog = Arc<ActivityLogStore>;
pub type GuardedDispatcher = Arc<QueryDispatcher>;
pub type GuardedProvider = Arc<dyn LlmProvider>;

#[derive(Clone)]
pub struct AppState {
    pub logging_level: RequestsLoggingLevel,
    pub start_time: Instant,
    pub agents: GuardedAgentRegistry,
    pub tools: GuardedToolRegistry,
    pub env_vars: GuardedEnvVarStore,
    pub activity_log: GuardedActivityLog,
    pub dispatcher: GuardedDispatcher,
    pub provider: GuardedProvider,
    /// Whether an upstream API key was resolved at startup, reported by
    /// the check-env route.
    pub groq_key_present: bool,
}

impl FromRef<AppState> for GuardedAgentRegistry {
    fn from_ref(input: &AppState) -> Self {
        input.agents.clone()
    }
}

impl FromRef<AppState> for GuardedToolRegistry {
    fn from_ref(input: &AppState) -> Self {
        input.tools.clone()
    }
}

impl FromRef<AppState> for GuardedEnvVarStore {
    fn from_ref(input: &AppState) -> Self {
        input.env_vars.clone()
    }
}

impl FromRef<AppState> for GuardedActivityLog {
    fn from_ref(input: &AppState) -> Self {
        input.activity_log.clone()
    }
}

impl FromRef<AppState> for GuardedDispatcher {
    fn from_ref(input: &AppState) -> Self {
        input.dispatcher.clone()
    }
}

impl FromRef<AppState> for GuardedProvider {
    fn from_ref(input: &AppState) -> Self {
        input.provider.clone()
    }
}
