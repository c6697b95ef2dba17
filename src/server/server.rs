use anyhow::Result;
use std::{
    sync::{Arc, Mutex},
    time::{Duration, Instant},
};

use tracing::{debug, error};

use crate::agent::llm::{CompletionOptions, GroqProvider, LlmProvider, Message, MessageRole};
use crate::agent::tools::{GithubTool, ToolRegistry};
use crate::agent::{Agent, AgentRegistry, DispatcherOptions, QueryDispatcher};
use crate::config::AppConfig;
use crate::store::{ActivityLogStore, ActivityStatus, EnvVarStore};

use axum::{
    body::Body,
    extract::{Query, State},
    http::{header, StatusCode},
    middleware,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use uuid::Uuid;

use super::error::ApiError;
use super::metrics::{metrics_handler, record_agent_query, record_upstream_error};
use super::{log_requests, state::*, RequestsLoggingLevel};

const BASIC_CHAT_PREAMBLE: &str =
    "You are a helpful assistant that answers questions concisely.";
const CHAT_PREAMBLE: &str =
    "You are a helpful assistant that can answer questions about GitHub and other developer tools.";

#[derive(Serialize)]
struct ServerStats {
    pub uptime: String,
    pub version: String,
}

fn format_uptime(duration: Duration) -> String {
    let total_seconds = duration.as_secs();

    let days = total_seconds / 86_400;
    let hours = (total_seconds % 86_400) / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let seconds = total_seconds % 60;

    format!("{}d {:02}:{:02}:{:02}", days, hours, minutes, seconds)
}

async fn home(State(state): State<AppState>) -> impl IntoResponse {
    let stats = ServerStats {
        uptime: format_uptime(state.start_time.elapsed()),
        version: env!("CARGO_PKG_VERSION").to_string(),
    };
    Json(stats)
}

#[derive(Deserialize, Debug)]
struct ChatBody {
    pub messages: Vec<IncomingMessage>,
}

#[derive(Deserialize, Debug)]
struct IncomingMessage {
    pub role: MessageRole,
    pub content: String,
}

impl From<IncomingMessage> for Message {
    fn from(msg: IncomingMessage) -> Self {
        Message {
            role: msg.role,
            content: msg.content,
            tool_calls: None,
            tool_call_id: None,
            tool_name: None,
        }
    }
}

fn conversation(preamble: &str, body: ChatBody) -> Vec<Message> {
    let mut messages = vec![Message::system(preamble)];
    messages.extend(body.messages.into_iter().map(Message::from));
    messages
}

async fn basic_chat(
    State(provider): State<GuardedProvider>,
    Json(body): Json<ChatBody>,
) -> Result<Response, ApiError> {
    let messages = conversation(BASIC_CHAT_PREAMBLE, body);

    let response = provider
        .complete(
            provider.model(),
            &messages,
            None,
            &CompletionOptions::default(),
        )
        .await
        .map_err(|err| {
            error!("Basic chat upstream error: {}", err);
            record_upstream_error("/api/basic-chat");
            ApiError::from(err)
        })?;

    Ok(Json(json!({
        "role": "assistant",
        "content": response.message.content,
    }))
    .into_response())
}

async fn chat(
    State(provider): State<GuardedProvider>,
    Json(body): Json<ChatBody>,
) -> Result<Response, ApiError> {
    let messages = conversation(CHAT_PREAMBLE, body);

    let stream = provider
        .complete_stream(provider.model(), &messages, &CompletionOptions::default())
        .await
        .map_err(|err| {
            error!("Chat upstream error: {}", err);
            record_upstream_error("/api/chat");
            ApiError::from(err)
        })?;

    // Relay the upstream SSE body untouched.
    let response = Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, "text/event-stream")
        .body(Body::from_stream(stream))
        .map_err(|err| ApiError::Internal(err.to_string()))?;

    Ok(response)
}

async fn validate_groq(State(provider): State<GuardedProvider>) -> Response {
    match provider.list_models().await {
        Ok(models) => Json(json!({ "valid": true, "models": models })).into_response(),
        Err(crate::agent::llm::LlmError::MissingApiKey) => (
            StatusCode::BAD_REQUEST,
            Json(json!({ "valid": false, "error": "API key not found" })),
        )
            .into_response(),
        Err(crate::agent::llm::LlmError::Api { status, message }) => (
            StatusCode::from_u16(status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
            Json(json!({ "valid": false, "error": message })),
        )
            .into_response(),
        Err(err) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "valid": false, "error": err.to_string() })),
        )
            .into_response(),
    }
}

async fn check_env(State(state): State<AppState>) -> impl IntoResponse {
    let has_github_token = std::env::var("GITHUB_TOKEN")
        .map(|v| !v.is_empty())
        .unwrap_or(false);

    Json(json!({
        "status": "ok",
        "environment": {
            "AGENT_GROQ_KEY": if state.groq_key_present { "Present" } else { "Missing" },
            "GITHUB_TOKEN": if has_github_token { "Present" } else { "Missing" },
        },
    }))
}

#[derive(Deserialize, Debug)]
struct QueryBody {
    pub agent_id: String,
    pub query: String,
    #[serde(default)]
    pub tools: Vec<String>,
}

async fn post_query(
    State(dispatcher): State<GuardedDispatcher>,
    Json(body): Json<QueryBody>,
) -> Result<Response, ApiError> {
    if body.agent_id.is_empty() || body.query.is_empty() {
        return Err(ApiError::Validation("Missing required fields".to_string()));
    }

    match dispatcher
        .process_query(&body.agent_id, &body.query, &body.tools)
        .await
    {
        Ok(text) => {
            record_agent_query(&body.agent_id, "success");
            Ok(Json(json!({ "response": text })).into_response())
        }
        Err(err) => {
            record_agent_query(&body.agent_id, "error");
            Err(err.into())
        }
    }
}

async fn get_agents(State(agents): State<GuardedAgentRegistry>) -> impl IntoResponse {
    let agents = agents.lock().unwrap().list();
    Json(json!({ "agents": agents }))
}

#[derive(Deserialize, Debug)]
struct CreateAgentBody {
    pub id: Option<String>,
    pub name: Option<String>,
    pub description: Option<String>,
    pub system_prompt: Option<String>,
    #[serde(default)]
    pub tools: Vec<String>,
    pub model: Option<String>,
    pub active: Option<bool>,
}

async fn post_agent(
    State(agents): State<GuardedAgentRegistry>,
    Json(body): Json<CreateAgentBody>,
) -> Result<Response, ApiError> {
    let name = body.name.filter(|s| !s.is_empty());
    let description = body.description.filter(|s| !s.is_empty());
    let (name, description) = match (name, description) {
        (Some(name), Some(description)) => (name, description),
        _ => return Err(ApiError::Validation("Missing required fields".to_string())),
    };

    let agent = Agent {
        id: body
            .id
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| format!("agent-{}", Uuid::new_v4())),
        name,
        description,
        system_prompt: body.system_prompt.unwrap_or_default(),
        tools: body.tools,
        model: body
            .model
            .unwrap_or_else(|| crate::config::DEFAULT_MODEL.to_string()),
        active: body.active.unwrap_or(true),
    };

    debug!("Creating agent {}", agent.id);
    agents.lock().unwrap().register(agent.clone());

    Ok((StatusCode::CREATED, Json(json!({ "agent": agent }))).into_response())
}

async fn get_env_vars(State(env_vars): State<GuardedEnvVarStore>) -> impl IntoResponse {
    Json(json!({ "variables": env_vars.list() }))
}

#[derive(Deserialize, Debug)]
struct CreateEnvVarBody {
    pub key: Option<String>,
    pub value: Option<String>,
    pub category: Option<String>,
    #[serde(rename = "isSecret")]
    pub is_secret: Option<bool>,
}

async fn post_env_var(
    State(env_vars): State<GuardedEnvVarStore>,
    Json(body): Json<CreateEnvVarBody>,
) -> Result<Response, ApiError> {
    let key = body.key.filter(|s| !s.is_empty());
    let value = body.value.filter(|s| !s.is_empty());
    let (key, value) = match (key, value) {
        (Some(key), Some(value)) => (key, value),
        _ => return Err(ApiError::Validation("Missing required fields".to_string())),
    };

    let variable = env_vars.insert(key, value, body.category, body.is_secret);
    Ok((StatusCode::CREATED, Json(json!({ "variable": variable }))).into_response())
}

#[derive(Deserialize, Debug)]
struct UpdateEnvVarBody {
    pub id: Option<String>,
    pub value: Option<String>,
}

async fn put_env_var(
    State(env_vars): State<GuardedEnvVarStore>,
    Json(body): Json<UpdateEnvVarBody>,
) -> Result<Response, ApiError> {
    let id = body.id.filter(|s| !s.is_empty());
    let value = body.value.filter(|s| !s.is_empty());
    let (id, value) = match (id, value) {
        (Some(id), Some(value)) => (id, value),
        _ => return Err(ApiError::Validation("Missing required fields".to_string())),
    };

    match env_vars.update(&id, value) {
        Some(variable) => Ok(Json(json!({ "variable": variable })).into_response()),
        None => Err(ApiError::NotFound(
            "Environment variable not found".to_string(),
        )),
    }
}

#[derive(Deserialize, Debug)]
struct DeleteEnvVarParams {
    pub id: Option<String>,
}

async fn delete_env_var(
    State(env_vars): State<GuardedEnvVarStore>,
    Query(params): Query<DeleteEnvVarParams>,
) -> Result<Response, ApiError> {
    let id = params
        .id
        .filter(|s| !s.is_empty())
        .ok_or_else(|| ApiError::Validation("Missing id parameter".to_string()))?;

    if env_vars.remove(&id) {
        Ok(Json(json!({ "success": true })).into_response())
    } else {
        Err(ApiError::NotFound(
            "Environment variable not found".to_string(),
        ))
    }
}

async fn get_logs(State(activity_log): State<GuardedActivityLog>) -> impl IntoResponse {
    Json(json!({ "logs": activity_log.list() }))
}

#[derive(Deserialize, Debug)]
struct CreateLogBody {
    pub agent: Option<String>,
    pub action: Option<String>,
    pub status: Option<ActivityStatus>,
    #[serde(default)]
    pub details: String,
}

async fn post_log(
    State(activity_log): State<GuardedActivityLog>,
    Json(body): Json<CreateLogBody>,
) -> Result<Response, ApiError> {
    let agent = body.agent.filter(|s| !s.is_empty());
    let action = body.action.filter(|s| !s.is_empty());
    let (agent, action, status) = match (agent, action, body.status) {
        (Some(agent), Some(action), Some(status)) => (agent, action, status),
        _ => return Err(ApiError::Validation("Missing required fields".to_string())),
    };

    let entry = activity_log.record(agent, action, status, body.details);
    Ok((StatusCode::CREATED, Json(json!({ "log": entry }))).into_response())
}

pub fn make_app(
    logging_level: RequestsLoggingLevel,
    provider: Arc<dyn LlmProvider>,
    dispatcher_options: DispatcherOptions,
    groq_key_present: bool,
) -> Router {
    let agents = Arc::new(Mutex::new(AgentRegistry::with_builtin_agents()));

    let mut tool_registry = ToolRegistry::new();
    tool_registry.register(Arc::new(GithubTool::new()));
    let tools = Arc::new(Mutex::new(tool_registry));

    let env_vars = Arc::new(EnvVarStore::with_defaults());
    let activity_log = Arc::new(ActivityLogStore::with_samples());

    let dispatcher = Arc::new(QueryDispatcher::new(
        agents.clone(),
        tools.clone(),
        provider.clone(),
        activity_log.clone(),
        dispatcher_options,
    ));

    let state = AppState {
        logging_level,
        start_time: Instant::now(),
        agents,
        tools,
        env_vars,
        activity_log,
        dispatcher,
        provider,
        groq_key_present,
    };

    let api_routes: Router = Router::new()
        .route("/basic-chat", post(basic_chat))
        .route("/chat", post(chat))
        .route("/validate-groq", get(validate_groq))
        .route("/check-env", get(check_env))
        .route("/query", post(post_query))
        .route("/agents", get(get_agents).post(post_agent))
        .route(
            "/env",
            get(get_env_vars)
                .post(post_env_var)
                .put(put_env_var)
                .delete(delete_env_var),
        )
        .route("/logs", get(get_logs).post(post_log))
        .with_state(state.clone());

    Router::new()
        .route("/", get(home))
        .with_state(state.clone())
        .nest("/api", api_routes)
        .route("/metrics", get(metrics_handler))
        .layer(middleware::from_fn_with_state(state, log_requests))
}

pub async fn run_server(config: AppConfig) -> Result<()> {
    let groq_key_present = config.llm.api_key.is_some();
    let provider: Arc<dyn LlmProvider> = Arc::new(GroqProvider::new(
        &config.llm.base_url,
        &config.llm.model,
        config.llm.api_key.clone(),
    ));

    let dispatcher_options = DispatcherOptions {
        max_tool_rounds: config.dispatcher.max_tool_rounds,
        completion: CompletionOptions {
            temperature: config.llm.temperature,
            max_tokens: config.llm.max_tokens,
            timeout: Duration::from_secs(config.llm.timeout_secs),
        },
    };

    let app = make_app(
        config.logging_level.clone(),
        provider,
        dispatcher_options,
        groq_key_present,
    );

    let listener = tokio::net::TcpListener::bind(format!("127.0.0.1:{}", config.port)).await?;
    tracing::info!("Listening on 127.0.0.1:{}", config.port);

    Ok(axum::serve(listener, app).await?)
}
