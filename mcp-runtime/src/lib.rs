use std::sync::Arc;

use cadenza_core::{Dispatcher, RegistryError};
use clap::{Args, Subcommand};
use serde_json::json;

pub mod auth;
pub mod automation;
pub mod cache;
pub mod catalog;
pub mod handlers;
pub mod scripts;
pub mod server;
pub mod settings;
pub mod telemetry;
pub mod util;

pub use server::{McpServer, ServerError};
pub use settings::{Settings, SettingsError};
pub use telemetry::LogFormat;

use util::to_pretty_json;

#[derive(Debug, thiserror::Error)]
pub enum RuntimeError {
    #[error("invalid configuration: {0}")]
    Settings(#[from] SettingsError),
    #[error("failed to build HTTP client: {0}")]
    HttpClient(#[from] reqwest::Error),
    #[error("tool registry is inconsistent: {0}")]
    Registry(#[from] RegistryError),
    #[error(transparent)]
    Server(#[from] ServerError),
}

impl RuntimeError {
    pub fn code(&self) -> &'static str {
        match self {
            RuntimeError::Settings(_) => "configuration_error",
            RuntimeError::HttpClient(_) => "http_client_error",
            RuntimeError::Registry(_) => "registry_error",
            RuntimeError::Server(_) => "mcp_server_error",
        }
    }
}

#[derive(Subcommand)]
pub enum McpCommands {
    /// Run the Cadenza MCP server over stdio
    Serve(McpServeArgs),
}

#[derive(Args, Clone, Debug, Default)]
pub struct McpServeArgs {
    /// Refuse to start without developer token credentials
    #[arg(long, env = "CADENZA_REQUIRE_CATALOG")]
    pub require_catalog: bool,
}

/// Validates settings and wires the production collaborators into a
/// dispatcher serving every tool.
pub fn build_runtime_dispatcher(settings: &Settings) -> Result<Dispatcher, RuntimeError> {
    settings.validate()?;
    let services = handlers::Services::from_settings(settings)?;
    Ok(handlers::build_dispatcher(&services)?)
}

async fn serve(settings: &Settings, args: McpServeArgs) -> Result<(), RuntimeError> {
    if args.require_catalog {
        settings.catalog_credentials()?;
    } else if let Err(err) = settings.catalog_credentials() {
        tracing::warn!(error = %err, "catalog credentials incomplete; catalog tools will fail");
    }
    let dispatcher = build_runtime_dispatcher(settings)?;
    McpServer::new(Arc::new(dispatcher)).serve_stdio().await?;
    Ok(())
}

pub async fn run(settings: &Settings, command: McpCommands) -> i32 {
    match command {
        McpCommands::Serve(args) => match serve(settings, args).await {
            Ok(()) => 0,
            Err(err) => {
                tracing::error!(error = %err, "MCP server stopped");
                let mut payload = json!({
                    "error": err.code(),
                    "message": err.to_string(),
                });
                if let RuntimeError::Settings(settings_err) = &err {
                    payload["hint"] = json!(settings_err.hint());
                }
                eprintln!("{}", to_pretty_json(&payload));
                1
            }
        },
    }
}
