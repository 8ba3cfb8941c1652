//! Server configuration.

use std::path::Path;
use std::sync::Arc;

use derive_getters::Getters;
use derive_more::{Display, Error};
use derive_setters::Setters;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

use crate::db::{InMemoryMatchStore, MatchStore, SqliteMatchRepository, StoreError};

/// Configuration for the match servers.
///
/// Resolution order, last wins: defaults, TOML file, environment
/// (`HOST`, `PORT`, `DATABASE_URL`), command-line flags.
#[derive(Debug, Clone, PartialEq, Eq, Getters, Setters, Serialize, Deserialize)]
#[setters(prefix = "with_")]
pub struct ServerConfig {
    /// Interface to bind.
    #[serde(default = "default_host")]
    host: String,

    /// Port to bind.
    #[serde(default = "default_port")]
    port: u16,

    /// SQLite database path. Unset keeps matches in memory.
    #[serde(default)]
    database_url: Option<String>,
}

#[instrument]
fn default_host() -> String {
    "127.0.0.1".to_string()
}

#[instrument]
fn default_port() -> u16 {
    8000
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            database_url: None,
        }
    }
}

impl ServerConfig {
    /// Loads configuration from a TOML file.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        debug!("Loading config from file");
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::new(format!("Failed to read config file: {}", e)))?;

        let config: Self = toml::from_str(&content)
            .map_err(|e| ConfigError::new(format!("Failed to parse config: {}", e)))?;

        info!(host = %config.host, port = config.port, "Config loaded successfully");
        Ok(config)
    }

    /// Loads the file if one is given, then applies environment overrides.
    #[instrument(skip(path))]
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        config.with_env(|key| std::env::var(key).ok())
    }

    /// Applies `HOST`, `PORT` and `DATABASE_URL` from `lookup`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if `PORT` is not a valid port number.
    #[instrument(skip(self, lookup))]
    pub fn with_env(
        mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        if let Some(host) = lookup("HOST") {
            debug!(host = %host, "HOST override");
            self.host = host;
        }
        if let Some(port) = lookup("PORT") {
            self.port = port
                .trim()
                .parse()
                .map_err(|e| ConfigError::new(format!("Invalid PORT '{}': {}", port, e)))?;
            debug!(port = self.port, "PORT override");
        }
        if let Some(url) = lookup("DATABASE_URL").filter(|u| !u.trim().is_empty()) {
            debug!(database_url = %url, "DATABASE_URL override");
            self.database_url = Some(url);
        }
        Ok(self)
    }

    /// Opens the store this configuration selects.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the database cannot be opened or migrated.
    #[instrument(skip(self), fields(database_url = ?self.database_url))]
    pub fn open_store(&self) -> Result<Arc<dyn MatchStore>, StoreError> {
        match &self.database_url {
            Some(url) => {
                info!(path = %url, "Using SQLite match store");
                Ok(Arc::new(SqliteMatchRepository::open(url.clone())?))
            }
            None => {
                info!("Using in-memory match store");
                Ok(Arc::new(InMemoryMatchStore::new()))
            }
        }
    }
}

/// Configuration error.
#[derive(Debug, Clone, Display, Error)]
#[display("Config error: {} at {}:{}", message, file, line)]
pub struct ConfigError {
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl ConfigError {
    /// Creates a new configuration error.
    #[track_caller]
    #[instrument(skip(message))]
    pub fn new(message: String) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            message,
            line: loc.line(),
            file: loc.file(),
        }
    }
}
