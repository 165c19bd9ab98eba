//! fieldwork - MCP server for Movidesk field technicians
//!
//! This binary runs as an MCP server using stdio transport.
//!
//! # Configuration
//!
//! Set the following environment variables (or use a `.env` file):
//!
//! - `MOVIDESK_TOKEN`: Movidesk API token
//! - `FIELDWORK_TECHNICIAN`: technician name, stored on first run (optional)
//!
//! # Usage
//!
//! ```bash
//! MOVIDESK_TOKEN=xxx FIELDWORK_TECHNICIAN="Joao Lima" ./fieldwork
//! ```

use anyhow::{Context, Result};
use rmcp::{transport::stdio, ServiceExt};
use tracing_subscriber::{fmt, EnvFilter};

use fieldwork::{config, movidesk_client, server, session, store};

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (ignore errors if not found)
    dotenvy::dotenv().ok();

    // stdout is reserved for MCP JSON-RPC messages
    fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("fieldwork=info")),
        )
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .init();

    tracing::info!("Starting fieldwork MCP server v{}", env!("CARGO_PKG_VERSION"));

    let config = config::Config::from_env().context("Failed to load configuration")?;

    tracing::debug!("Configuration loaded, base_url: {}", config.base_url);
    if config.owner.is_none() {
        tracing::warn!("MOVIDESK_OWNER_ID is not set, reports will carry no owner");
    }

    let client =
        movidesk_client::MovideskClient::new(&config).context("Failed to create Movidesk client")?;

    // Read the technician once; it does not change for the rest of the run.
    let store = store::TechnicianStore::new(config.state_file.clone());
    let session = session::Session::resolve(&store, config.technician.as_deref())
        .context("Failed to load technician identity")?;

    match &session {
        Some(session) => tracing::info!(technician = %session.technician(), "Technician loaded"),
        None => tracing::warn!(
            path = %store.path().display(),
            "No technician stored yet, waiting for set_technician"
        ),
    }

    let server = server::FieldworkServer::new(client, store, session);

    tracing::info!("Server initialized, starting stdio transport");

    let service = server
        .serve(stdio())
        .await
        .inspect_err(|e| {
            tracing::error!("serving error: {:?}", e);
        })
        .context("Failed to start server")?;

    tracing::info!("Server running, waiting for requests");

    service
        .waiting()
        .await
        .context("Server error during operation")?;

    tracing::info!("Server shutting down");

    Ok(())
}
