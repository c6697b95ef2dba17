//! HTTP client for end-to-end tests
//!
//! Wraps reqwest with one method per endpoint. When API routes or request
//! formats change, update only this file.

use super::constants::*;
use reqwest::Response;
use serde_json::{json, Value};
use std::time::Duration;

pub struct TestClient {
    /// The underlying reqwest client (public for custom requests in tests)
    pub client: reqwest::Client,
    /// The base URL of the test server
    pub base_url: String,
}

impl TestClient {
    pub fn new(base_url: String) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .expect("Failed to build reqwest client");

        Self { client, base_url }
    }

    // ========================================================================
    // Chat Endpoints
    // ========================================================================

    /// POST /api/basic-chat
    pub async fn basic_chat(&self, messages: Value) -> Response {
        self.client
            .post(format!("{}/api/basic-chat", self.base_url))
            .json(&json!({ "messages": messages }))
            .send()
            .await
            .expect("basic-chat request failed")
    }

    /// POST /api/chat
    pub async fn chat(&self, messages: Value) -> Response {
        self.client
            .post(format!("{}/api/chat", self.base_url))
            .json(&json!({ "messages": messages }))
            .send()
            .await
            .expect("chat request failed")
    }

    /// GET /api/validate-groq
    pub async fn validate_groq(&self) -> Response {
        self.client
            .get(format!("{}/api/validate-groq", self.base_url))
            .send()
            .await
            .expect("validate-groq request failed")
    }

    /// GET /api/check-env
    pub async fn check_env(&self) -> Response {
        self.client
            .get(format!("{}/api/check-env", self.base_url))
            .send()
            .await
            .expect("check-env request failed")
    }

    // ========================================================================
    // Query Endpoint
    // ========================================================================

    /// POST /api/query
    pub async fn post_query(&self, agent_id: &str, query: &str) -> Response {
        self.post_query_body(json!({ "agent_id": agent_id, "query": query }))
            .await
    }

    /// POST /api/query with an arbitrary body
    pub async fn post_query_body(&self, body: Value) -> Response {
        self.client
            .post(format!("{}/api/query", self.base_url))
            .json(&body)
            .send()
            .await
            .expect("query request failed")
    }

    // ========================================================================
    // Agent Endpoints
    // ========================================================================

    /// GET /api/agents
    pub async fn get_agents(&self) -> Response {
        self.client
            .get(format!("{}/api/agents", self.base_url))
            .send()
            .await
            .expect("get agents request failed")
    }

    /// POST /api/agents
    pub async fn post_agent(&self, body: Value) -> Response {
        self.client
            .post(format!("{}/api/agents", self.base_url))
            .json(&body)
            .send()
            .await
            .expect("post agent request failed")
    }

    // ========================================================================
    // Env Var Endpoints
    // ========================================================================

    /// GET /api/env
    pub async fn get_env_vars(&self) -> Response {
        self.client
            .get(format!("{}/api/env", self.base_url))
            .send()
            .await
            .expect("get env request failed")
    }

    /// POST /api/env
    pub async fn post_env_var(&self, body: Value) -> Response {
        self.client
            .post(format!("{}/api/env", self.base_url))
            .json(&body)
            .send()
            .await
            .expect("post env request failed")
    }

    /// PUT /api/env
    pub async fn put_env_var(&self, body: Value) -> Response {
        self.client
            .put(format!("{}/api/env", self.base_url))
            .json(&body)
            .send()
            .await
            .expect("put env request failed")
    }

    /// DELETE /api/env?id=...
    pub async fn delete_env_var(&self, id: Option<&str>) -> Response {
        let url = match id {
            Some(id) => format!("{}/api/env?id={}", self.base_url, id),
            None => format!("{}/api/env", self.base_url),
        };
        self.client
            .delete(url)
            .send()
            .await
            .expect("delete env request failed")
    }

    // ========================================================================
    // Log Endpoints
    // ========================================================================

    /// GET /api/logs
    pub async fn get_logs(&self) -> Response {
        self.client
            .get(format!("{}/api/logs", self.base_url))
            .send()
            .await
            .expect("get logs request failed")
    }

    /// POST /api/logs
    pub async fn post_log(&self, body: Value) -> Response {
        self.client
            .post(format!("{}/api/logs", self.base_url))
            .json(&body)
            .send()
            .await
            .expect("post log request failed")
    }

    // ========================================================================
    // Metrics
    // ========================================================================

    /// GET /metrics
    pub async fn get_metrics(&self) -> Response {
        self.client
            .get(format!("{}/metrics", self.base_url))
            .send()
            .await
            .expect("metrics request failed")
    }
}
