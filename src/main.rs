//! ticket-desk - ticket-tracking REST service
//!
//! This is the main entry point. It parses the command line, loads the
//! configuration, sets up logging and dispatches to the requested command.

use anyhow::Context;
use clap::Parser;
use std::process;
use std::sync::Arc;
use ticket_desk::api::{self, AppState};
use ticket_desk::cli::{Cli, Commands, ServeArgs};
use ticket_desk::config::Config;
use ticket_desk::service::TicketService;
use ticket_desk::storage::{self, TicketRepository};
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::{Level, info};
use tracing_subscriber::EnvFilter;

/// Main entry point for the ticket-desk binary
///
/// Errors are printed with their context chain and turn into exit code 1.
fn main() {
    // A missing .env file is not an error
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}

#[tokio::main]
async fn run(cli: Cli) -> anyhow::Result<()> {
    let config = Config::load(cli.config.as_deref()).context("Failed to load configuration")?;

    init_tracing(&config, cli.verbose);

    match cli.command {
        Commands::Serve(args) => serve(config, &args).await,
        #[cfg(feature = "database")]
        Commands::Migrate { database_url } => {
            migrate(database_url.as_deref().unwrap_or(&config.storage.url)).await
        },
        Commands::Config => {
            println!("{}", serde_json::to_string_pretty(&config)?);
            Ok(())
        },
    }
}

/// Logging filter precedence: `RUST_LOG`, then `--verbose`, then `log.filter`
fn init_tracing(config: &Config, verbose: bool) {
    let fallback = if verbose { "debug" } else { config.log.filter.as_str() };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback)),
        )
        .init();
}

async fn serve(mut config: Config, args: &ServeArgs) -> anyhow::Result<()> {
    args.apply(&mut config);
    let addr = config.socket_addr()?;

    let repository = storage::open(&config.storage)
        .await
        .context("Failed to open ticket storage")?;
    let state = Arc::new(AppState::new(TicketService::new(Arc::clone(&repository))));

    let app = api::build_router(state).layer(
        TraceLayer::new_for_http()
            .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
            .on_response(DefaultOnResponse::new().level(Level::INFO)),
    );

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    info!("ticket-desk listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server crashed")?;

    repository.close().await?;
    info!("ticket-desk stopped");
    Ok(())
}

#[cfg(feature = "database")]
async fn migrate(url: &str) -> anyhow::Result<()> {
    let storage = storage::SqliteStorage::connect(url)
        .await
        .with_context(|| format!("Failed to open {url}"))?;
    storage.migrate().await?;
    storage.close().await?;
    info!(url, "Database schema is up to date");
    Ok(())
}

/// Resolves on Ctrl-C or, on Unix, SIGTERM
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl-C: {e}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            },
            Err(e) => {
                tracing::error!("Failed to listen for SIGTERM: {e}");
                std::future::pending::<()>().await;
            },
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    info!("Shutdown signal received");
}
