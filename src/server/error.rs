//! HTTP error taxonomy.
//!
//! Every failing route responds with `{"error": "..."}` and the mapped
//! status code.

use crate::agent::llm::LlmError;
use crate::agent::DispatchError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    /// Malformed or incomplete request payload.
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    NotFound(String),

    #[error("Missing API key")]
    MissingApiKey,

    /// The upstream LLM provider failed.
    #[error("Groq API error: {0}")]
    Upstream(String),

    #[error("{0}")]
    Internal(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::MissingApiKey | ApiError::Upstream(_) | ApiError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status(), Json(json!({ "error": self.to_string() }))).into_response()
    }
}

impl From<DispatchError> for ApiError {
    fn from(err: DispatchError) -> Self {
        match err {
            DispatchError::AgentNotFound(_) => ApiError::NotFound(err.to_string()),
            DispatchError::AgentInactive(_) => ApiError::Validation(err.to_string()),
            DispatchError::Llm(LlmError::MissingApiKey) => ApiError::MissingApiKey,
            DispatchError::Llm(llm_err) => ApiError::Upstream(llm_err.to_string()),
        }
    }
}

impl From<LlmError> for ApiError {
    fn from(err: LlmError) -> Self {
        match err {
            LlmError::MissingApiKey => ApiError::MissingApiKey,
            other => ApiError::Upstream(other.to_string()),
        }
    }
}
