use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use tracing::{info, level_filters::LevelFilter};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use agentdock::config::{AppConfig, CliConfig, FileConfig};
use agentdock::server::{run_server, RequestsLoggingLevel};

#[derive(Parser, Debug)]
struct CliArgs {
    /// Path to an optional TOML configuration file.
    #[clap(short, long)]
    pub config: Option<PathBuf>,

    /// The port to listen on.
    #[clap(short, long, default_value_t = 3002)]
    pub port: u16,

    /// The level of logging to perform on each request.
    #[clap(long, default_value = "path")]
    pub logging_level: RequestsLoggingLevel,

    /// Maximum number of sequential tool-invocation rounds per query.
    #[clap(long, default_value_t = 3)]
    pub max_tool_rounds: usize,

    /// Model identifier to request from the upstream provider.
    #[clap(long)]
    pub model: Option<String>,

    /// Base URL of the Groq-compatible API.
    #[clap(long)]
    pub groq_base_url: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli_args = CliArgs::parse();

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            EnvFilter::builder()
                .with_default_directive(LevelFilter::INFO.into())
                .with_env_var("LOG_LEVEL")
                .from_env_lossy(),
        )
        .try_init()
        .unwrap();

    let file_config = match &cli_args.config {
        Some(path) => {
            info!("Loading configuration from {:?}", path);
            Some(FileConfig::load(path)?)
        }
        None => None,
    };

    let cli_config = CliConfig {
        port: cli_args.port,
        logging_level: cli_args.logging_level,
        max_tool_rounds: cli_args.max_tool_rounds,
        model: cli_args.model,
        groq_base_url: cli_args.groq_base_url,
    };

    let config = AppConfig::resolve(&cli_config, file_config)?;

    info!("Initializing metrics...");
    agentdock::server::metrics::init_metrics();

    if config.llm.api_key.is_none() {
        info!("No Groq API key configured; chat routes will report it per request");
    }

    info!("Ready to serve at port {}!", config.port);
    run_server(config).await
}
