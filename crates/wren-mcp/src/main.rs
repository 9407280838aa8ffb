//! wren MCP server binary.
//!
//! Communicates via stdio transport, which is the standard for local MCP
//! servers. See the library docs for configuration variables.

use std::sync::Arc;

use anyhow::{Context, Result};
use rmcp::{transport::stdio, ServiceExt};

use wren_client::MemoryClient;
use wren_core::WrenConfig;
use wren_mcp::{env, logging, MemoryServer};

#[tokio::main]
async fn main() -> Result<()> {
    // `.env` values take precedence over the inherited environment
    let env_file = env::load_env_file(None);

    let config = WrenConfig::from_env().context("Failed to load configuration")?;

    // Logs go to stderr and the log file; stdout is used for MCP transport
    logging::init_tracing(&config.server)?;
    if let Some(path) = &env_file {
        tracing::debug!(path = %path.display(), "Loaded environment file");
    }
    for note in config.ignored_vars() {
        tracing::warn!("{}", note);
    }

    tracing::info!(base_url = %config.api.base_url, "Starting wren MCP server");

    let client = MemoryClient::from_config(&config.api).context("Failed to create memory client")?;
    let server = MemoryServer::new(Arc::new(client));

    // Serve via stdio transport
    let service = server.serve(stdio()).await.inspect_err(|e| {
        tracing::error!("Server error: {:?}", e);
    })?;

    tracing::info!("MCP server running on stdio");

    service.waiting().await?;
    Ok(())
}
