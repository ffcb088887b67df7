//! HTTP API for ticket-desk
//!
//! [`build_router`] is the single entry point; the binary attaches
//! middleware layers (request tracing) after this call so tests can drive
//! the bare router with `tower::ServiceExt::oneshot`.

pub mod dto;
pub mod error;
mod handlers;

use crate::service::TicketService;
use axum::{
    Router,
    routing::{get, put},
};
use std::sync::Arc;

/// Static build information reported by `/health`
#[derive(Debug, Clone, Copy)]
pub struct BuildInfo {
    pub service: &'static str,
    pub version: &'static str,
}

impl Default for BuildInfo {
    fn default() -> Self {
        Self {
            service: env!("CARGO_PKG_NAME"),
            version: env!("CARGO_PKG_VERSION"),
        }
    }
}

/// State shared by all handlers
#[derive(Debug)]
pub struct AppState {
    pub tickets: TicketService,
    pub build: BuildInfo,
}

impl AppState {
    pub fn new(tickets: TicketService) -> Self {
        Self {
            tickets,
            build: BuildInfo::default(),
        }
    }
}

/// Build the complete application router wired to the given shared state
pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(handlers::root))
        .route("/health", get(handlers::health))
        .route(
            "/api/tickets",
            get(handlers::list_tickets).post(handlers::create_ticket),
        )
        .route("/api/tickets/start/:id", put(handlers::start_ticket))
        .route("/api/tickets/complete/:id", put(handlers::complete_ticket))
        .route("/api/tickets/cancel/:id", put(handlers::cancel_ticket))
        .route("/api/tickets/cancel-all", put(handlers::cancel_all_tickets))
        .with_state(state)
}
