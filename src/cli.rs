//! Command-line interface for strictly_matches.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Strictly Matches - Tic-tac-toe match service with HTTP and MCP interfaces
#[derive(Parser, Debug)]
#[command(name = "strictly_matches")]
#[command(about = "Tic-tac-toe match service", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Subcommand to run
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run the HTTP match server
    Http {
        /// Host to bind to (overrides HOST and the config file)
        #[arg(long)]
        host: Option<String>,

        /// Port to bind to (overrides PORT and the config file)
        #[arg(short, long)]
        port: Option<u16>,

        /// SQLite database file (overrides DATABASE_URL); matches stay in memory if unset
        #[arg(long)]
        db_path: Option<String>,

        /// Path to a TOML config file
        #[arg(short, long)]
        config: Option<PathBuf>,
    },

    /// Run the MCP match server (stdio mode)
    Mcp {
        /// SQLite database file (overrides DATABASE_URL); matches stay in memory if unset
        #[arg(long)]
        db_path: Option<String>,

        /// Path to a TOML config file
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
}
