//! Configuration management for ticket-desk
//!
//! Settings are layered, lowest precedence first:
//!
//! 1. Built-in defaults
//! 2. An optional config file (`ticket-desk.toml` unless `--config` is given)
//! 3. `TICKET_DESK__SECTION__KEY` environment variables
//! 4. `APP_PORT`, kept for deployments that only set the port
//!
//! Command-line flags are applied on top by the binary.

use crate::error::{Result, TicketDeskError};
use config::{Environment, File};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::Path;

/// Default config file looked up in the working directory
pub const DEFAULT_CONFIG_FILE: &str = "ticket-desk.toml";

/// Prefix of environment variable overrides
pub const ENV_PREFIX: &str = "TICKET_DESK";

/// Main configuration structure
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub storage: StorageConfig,
    pub log: LogConfig,
}

/// HTTP listener settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

/// Which storage backend to use
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    Memory,
    Sqlite,
}

/// Storage settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageConfig {
    pub backend: StorageBackend,
    /// Database URL, ignored by the memory backend
    pub url: String,
}

/// Logging settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogConfig {
    /// `tracing_subscriber::EnvFilter` directive used when `RUST_LOG` is unset
    pub filter: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 3000,
            },
            storage: StorageConfig {
                backend: StorageBackend::Sqlite,
                url: "sqlite://tickets.db?mode=rwc".to_string(),
            },
            log: LogConfig {
                filter: "info".to_string(),
            },
        }
    }
}

impl Config {
    /// Loads configuration from defaults, the config file and the environment
    ///
    /// An explicitly given `path` must exist; the default file is optional.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let defaults = Self::default();
        let file = match path {
            Some(path) => File::from(path).required(true),
            None => File::with_name(DEFAULT_CONFIG_FILE).required(false),
        };

        let settings = config::Config::builder()
            .set_default("server.host", defaults.server.host)?
            .set_default("server.port", i64::from(defaults.server.port))?
            .set_default("storage.backend", "sqlite")?
            .set_default("storage.url", defaults.storage.url)?
            .set_default("log.filter", defaults.log.filter)?
            .add_source(file)
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .set_override_option("server.port", std::env::var("APP_PORT").ok())?
            .build()?;

        Ok(settings.try_deserialize()?)
    }

    /// Address the HTTP server binds to
    pub fn socket_addr(&self) -> Result<SocketAddr> {
        format!("{}:{}", self.server.host, self.server.port)
            .parse()
            .map_err(|e| {
                TicketDeskError::Config(format!(
                    "Invalid listen address {}:{}: {e}",
                    self.server.host, self.server.port
                ))
            })
    }
}
