//! Query dispatcher.
//!
//! Validates an agent, issues the completion request (executing requested
//! tool calls between rounds), and records the attempt's outcome in the
//! activity log.

use crate::agent::llm::{CompletionOptions, LlmError, LlmProvider, Message};
use crate::agent::registry::AgentRegistry;
use crate::agent::tools::ToolRegistry;
use crate::store::{ActivityLogStore, ActivityStatus};
use serde_json::json;
use std::sync::{Arc, Mutex};
use thiserror::Error;
use tracing::{debug, warn};

/// How many characters of the query make it into the activity log.
const LOGGED_QUERY_LENGTH: usize = 50;

#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("Agent with ID {0} not found")]
    AgentNotFound(String),

    #[error("Agent with ID {0} is not active")]
    AgentInactive(String),

    #[error(transparent)]
    Llm(#[from] LlmError),
}

/// Dispatcher tuning knobs, resolved from the application config.
#[derive(Debug, Clone)]
pub struct DispatcherOptions {
    /// Upper bound on sequential tool-invocation rounds per query.
    /// A configuration ceiling, not a retry budget.
    pub max_tool_rounds: usize,
    pub completion: CompletionOptions,
}

impl Default for DispatcherOptions {
    fn default() -> Self {
        Self {
            max_tool_rounds: 3,
            completion: CompletionOptions::default(),
        }
    }
}

/// Routes natural-language queries to agents.
pub struct QueryDispatcher {
    agents: Arc<Mutex<AgentRegistry>>,
    tools: Arc<Mutex<ToolRegistry>>,
    provider: Arc<dyn LlmProvider>,
    activity_log: Arc<ActivityLogStore>,
    options: DispatcherOptions,
}

impl QueryDispatcher {
    pub fn new(
        agents: Arc<Mutex<AgentRegistry>>,
        tools: Arc<Mutex<ToolRegistry>>,
        provider: Arc<dyn LlmProvider>,
        activity_log: Arc<ActivityLogStore>,
        options: DispatcherOptions,
    ) -> Self {
        Self {
            agents,
            tools,
            provider,
            activity_log,
            options,
        }
    }

    /// Process a query against a registered agent.
    ///
    /// Fails before any upstream call when the agent is unknown or
    /// inactive. Otherwise the agent's system prompt leads the
    /// conversation, the query follows as the user message, and any tool
    /// calls the model requests are executed through the tool registry —
    /// at most `max_tool_rounds` times — before the final text is
    /// returned. Upstream failures are logged and propagated as-is: no
    /// retry, no backoff.
    ///
    /// `tool_names` overrides the agent's own tool list when non-empty.
    pub async fn process_query(
        &self,
        agent_id: &str,
        query: &str,
        tool_names: &[String],
    ) -> Result<String, DispatchError> {
        let agent = {
            let agents = self.agents.lock().unwrap();
            agents
                .get(agent_id)
                .cloned()
                .ok_or_else(|| DispatchError::AgentNotFound(agent_id.to_string()))?
        };

        if !agent.active {
            return Err(DispatchError::AgentInactive(agent_id.to_string()));
        }

        let action = format!("Process query: {}...", truncate(query, LOGGED_QUERY_LENGTH));
        self.activity_log
            .record(agent_id, &action, ActivityStatus::Pending, "");

        let names: &[String] = if tool_names.is_empty() {
            &agent.tools
        } else {
            tool_names
        };
        let tool_defs = {
            let tools = self.tools.lock().unwrap();
            tools.definitions_for(names)
        };
        let tool_defs = (!tool_defs.is_empty()).then_some(tool_defs);

        let mut messages = vec![
            Message::system(&agent.system_prompt),
            Message::user(query),
        ];

        let mut rounds = 0;
        loop {
            let response = match self
                .provider
                .complete(
                    &agent.model,
                    &messages,
                    tool_defs.as_deref(),
                    &self.options.completion,
                )
                .await
            {
                Ok(response) => response,
                Err(err) => {
                    self.activity_log.record(
                        agent_id,
                        &action,
                        ActivityStatus::Error,
                        format!("AI error: {}", err),
                    );
                    return Err(err.into());
                }
            };

            let tool_calls = response.message.tool_calls.clone().unwrap_or_default();
            if tool_calls.is_empty() || rounds >= self.options.max_tool_rounds {
                if !tool_calls.is_empty() {
                    warn!(
                        agent = %agent_id,
                        rounds = rounds,
                        "Tool round ceiling reached, returning partial answer"
                    );
                }
                self.activity_log
                    .record(agent_id, &action, ActivityStatus::Success, "");
                return Ok(response.message.content);
            }

            rounds += 1;
            debug!(
                agent = %agent_id,
                round = rounds,
                calls = tool_calls.len(),
                "Executing tool calls"
            );

            messages.push(response.message.clone());
            for call in tool_calls {
                let tool = self.tools.lock().unwrap().get(&call.name);
                let content = match tool {
                    Some(tool) => match tool.execute(call.arguments.clone()).await {
                        Ok(value) => value.to_string(),
                        // Tool failures feed back to the model instead of
                        // aborting the query.
                        Err(err) => json!({ "error": err.to_string() }).to_string(),
                    },
                    None => json!({ "error": format!("Unknown tool: {}", call.name) }).to_string(),
                };
                messages.push(Message::tool(content, call.id, call.name));
            }
        }
    }
}

fn truncate(s: &str, max_chars: usize) -> String {
    s.chars().take(max_chars).collect()
}
