//! Command-line interface definition
//!
//! The binary in `main.rs` parses [`Cli`] and dispatches on [`Commands`].

use crate::config::{Config, StorageBackend};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// ticket-desk - ticket-tracking REST service
#[derive(Debug, Parser)]
#[command(name = "ticket-desk", version, about, long_about = None)]
pub struct Cli {
    /// Configuration file (defaults to ./ticket-desk.toml when present)
    #[arg(short, long, global = true, env = "TICKET_DESK_CONFIG")]
    pub config: Option<PathBuf>,

    /// Enable debug logging (ignored when RUST_LOG is set)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Run the HTTP server
    Serve(ServeArgs),

    /// Create the database schema and exit
    #[cfg(feature = "database")]
    Migrate {
        /// Database URL (overrides configuration)
        #[arg(long)]
        database_url: Option<String>,
    },

    /// Print the effective configuration as JSON
    Config,
}

/// Flags of the `serve` subcommand
#[derive(Debug, Default, Args)]
pub struct ServeArgs {
    /// Address to listen on
    #[arg(long)]
    pub host: Option<String>,

    /// Port to listen on
    #[arg(short, long)]
    pub port: Option<u16>,

    /// SQLite database URL
    #[arg(long, conflicts_with = "memory")]
    pub database_url: Option<String>,

    /// Keep tickets in memory only; they are lost on shutdown
    #[arg(long)]
    pub memory: bool,
}

impl ServeArgs {
    /// Applies the flags on top of the loaded configuration
    pub fn apply(&self, config: &mut Config) {
        if let Some(host) = &self.host {
            config.server.host.clone_from(host);
        }
        if let Some(port) = self.port {
            config.server.port = port;
        }
        if let Some(url) = &self.database_url {
            config.storage.backend = StorageBackend::Sqlite;
            config.storage.url.clone_from(url);
        }
        if self.memory {
            config.storage.backend = StorageBackend::Memory;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_serve_flags() {
        let cli = Cli::try_parse_from([
            "ticket-desk",
            "--verbose",
            "serve",
            "--port",
            "8081",
            "--memory",
        ])
        .unwrap();

        assert!(cli.verbose);
        let Commands::Serve(args) = cli.command else {
            panic!("expected serve command");
        };
        assert_eq!(args.port, Some(8081));
        assert!(args.memory);
    }

    #[test]
    fn test_memory_conflicts_with_database_url() {
        let result = Cli::try_parse_from([
            "ticket-desk",
            "serve",
            "--memory",
            "--database-url",
            "sqlite://x.db",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_serve_args_override_config() {
        let mut config = Config::default();
        ServeArgs {
            host: Some("0.0.0.0".to_string()),
            port: Some(9000),
            database_url: Some("sqlite://other.db".to_string()),
            memory: false,
        }
        .apply(&mut config);

        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 9000);
        assert_eq!(config.storage.backend, StorageBackend::Sqlite);
        assert_eq!(config.storage.url, "sqlite://other.db");

        ServeArgs {
            memory: true,
            ..ServeArgs::default()
        }
        .apply(&mut config);
        assert_eq!(config.storage.backend, StorageBackend::Memory);
    }

    #[test]
    fn test_command_is_required() {
        assert!(Cli::try_parse_from(["ticket-desk"]).is_err());
    }
}
