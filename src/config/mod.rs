mod file_config;

pub use file_config::{DispatcherConfig, FileConfig, LlmConfig};

use crate::agent::llm::DEFAULT_BASE_URL;
use crate::server::RequestsLoggingLevel;
use anyhow::Result;
use clap::ValueEnum;

/// Name of the environment variable holding the Groq API key.
pub const GROQ_KEY_ENV_VAR: &str = "AGENT_GROQ_KEY";

pub const DEFAULT_MODEL: &str = "llama3-8b-8192";

/// CLI arguments that can be used for config resolution.
/// This struct mirrors the CLI arguments that can be overridden by TOML config.
#[derive(Debug, Clone)]
pub struct CliConfig {
    pub port: u16,
    pub logging_level: RequestsLoggingLevel,
    pub max_tool_rounds: usize,
    pub model: Option<String>,
    pub groq_base_url: Option<String>,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            port: 3002,
            logging_level: RequestsLoggingLevel::default(),
            max_tool_rounds: 3,
            model: None,
            groq_base_url: None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    // Core settings
    pub port: u16,
    pub logging_level: RequestsLoggingLevel,

    // Feature configs (with defaults)
    pub llm: LlmSettings,
    pub dispatcher: DispatcherSettings,
}

impl AppConfig {
    /// Resolve configuration from CLI arguments and optional TOML file config.
    /// TOML values override CLI values where present. The API key comes from
    /// the TOML file or, failing that, the `AGENT_GROQ_KEY` environment
    /// variable; a missing key is not an error at startup, only when a
    /// request actually needs the upstream provider.
    pub fn resolve(cli: &CliConfig, file_config: Option<FileConfig>) -> Result<Self> {
        let file = file_config.unwrap_or_default();

        // TOML overrides CLI for each field
        let port = file.port.unwrap_or(cli.port);

        let logging_level = file
            .logging_level
            .and_then(|s| parse_logging_level(&s))
            .unwrap_or_else(|| cli.logging_level.clone());

        // LLM settings from file config
        let llm_file = file.llm.unwrap_or_default();
        let llm_defaults = LlmSettings::default();
        let llm = LlmSettings {
            base_url: llm_file
                .base_url
                .or_else(|| cli.groq_base_url.clone())
                .unwrap_or(llm_defaults.base_url),
            model: llm_file
                .model
                .or_else(|| cli.model.clone())
                .unwrap_or(llm_defaults.model),
            api_key: llm_file
                .api_key
                .or_else(|| std::env::var(GROQ_KEY_ENV_VAR).ok()),
            temperature: llm_file.temperature.unwrap_or(llm_defaults.temperature),
            max_tokens: llm_file.max_tokens.or(llm_defaults.max_tokens),
            timeout_secs: llm_file.timeout_secs.unwrap_or(llm_defaults.timeout_secs),
        };

        // Dispatcher settings from file config
        let dispatcher_file = file.dispatcher.unwrap_or_default();
        let dispatcher = DispatcherSettings {
            max_tool_rounds: dispatcher_file.max_tool_rounds.unwrap_or(cli.max_tool_rounds),
        };

        Ok(Self {
            port,
            logging_level,
            llm,
            dispatcher,
        })
    }
}

/// Settings for the LLM provider.
#[derive(Debug, Clone)]
pub struct LlmSettings {
    pub base_url: String,
    pub model: String,
    pub api_key: Option<String>,
    pub temperature: f32,
    pub max_tokens: Option<u32>,
    pub timeout_secs: u64,
}

impl Default for LlmSettings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            api_key: None,
            temperature: 0.7,
            max_tokens: Some(800),
            timeout_secs: 120,
        }
    }
}

/// Settings for the query dispatcher.
#[derive(Debug, Clone)]
pub struct DispatcherSettings {
    pub max_tool_rounds: usize,
}

impl Default for DispatcherSettings {
    fn default() -> Self {
        Self { max_tool_rounds: 3 }
    }
}

/// Parses a logging level string into RequestsLoggingLevel.
/// Uses clap's ValueEnum trait for parsing.
fn parse_logging_level(s: &str) -> Option<RequestsLoggingLevel> {
    RequestsLoggingLevel::from_str(s, true).ok()
}
