//! Strictly Matches - Unified CLI
//!
//! Tic-tac-toe match service served over HTTP or MCP stdio.

#![warn(missing_docs)]

mod cli;

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use cli::{Cli, Command};
use rmcp::ServiceExt;
use strictly_matches::{MatchEngine, MatchServer, ServerConfig, http};
use tracing::{info, instrument};
use tracing_subscriber::EnvFilter;

const DEFAULT_FILTER: &str = "info,strictly_matches=debug";

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    match cli.command {
        Command::Http {
            host,
            port,
            db_path,
            config,
        } => run_http_server(config, host, port, db_path).await,
        Command::Mcp { db_path, config } => run_mcp_server(config, db_path).await,
    }
}

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

/// Resolves config from file and environment, then applies CLI overrides.
#[instrument(skip_all)]
fn resolve_config(
    path: Option<PathBuf>,
    host: Option<String>,
    port: Option<u16>,
    db_path: Option<String>,
) -> Result<ServerConfig> {
    let mut config = ServerConfig::load(path.as_deref())?;
    if let Some(host) = host {
        config = config.with_host(host);
    }
    if let Some(port) = port {
        config = config.with_port(port);
    }
    if let Some(db_path) = db_path {
        config = config.with_database_url(Some(db_path));
    }
    info!(?config, "Resolved server configuration");
    Ok(config)
}

/// Run the HTTP match server
async fn run_http_server(
    path: Option<PathBuf>,
    host: Option<String>,
    port: Option<u16>,
    db_path: Option<String>,
) -> Result<()> {
    tracing_subscriber::fmt().with_env_filter(env_filter()).init();

    let config = resolve_config(path, host, port, db_path)?;
    let engine = MatchEngine::with_tracing(config.open_store()?);

    let listener = tokio::net::TcpListener::bind((config.host().as_str(), *config.port())).await?;
    info!(
        host = %config.host(),
        port = config.port(),
        "Server ready at http://{}:{}/",
        config.host(),
        config.port()
    );

    axum::serve(listener, http::router(engine)).await?;
    info!("HTTP server stopped");
    Ok(())
}

/// Run the MCP match server (stdio mode)
async fn run_mcp_server(path: Option<PathBuf>, db_path: Option<String>) -> Result<()> {
    // stdout carries the protocol; logs go to stderr.
    tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .init();

    info!("Starting Strictly Matches MCP server");

    let config = resolve_config(path, None, None, db_path)?;
    let engine = MatchEngine::with_tracing(config.open_store()?);
    let server = MatchServer::new(engine);

    info!("Server ready - connect via MCP protocol");
    let service = server.serve(rmcp::transport::stdio()).await?;
    service.waiting().await?;

    Ok(())
}
