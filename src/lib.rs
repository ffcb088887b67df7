//! ticket-desk - A small ticket-tracking REST service
//!
//! Clients create tickets, list and filter them, and move them through a
//! fixed lifecycle:
//!
//! ```text
//! NEW -> IN_PROGRESS -> COMPLETED
//!   \________________\-> CANCELLED
//! ```
//!
//! The crate is layered leaf first:
//! - [`core`]: the ticket model and the transition table
//! - [`storage`]: the [`storage::TicketRepository`] collaborator with
//!   in-memory and SQLite implementations
//! - [`service`]: lifecycle rules and list-query assembly
//! - `api` (feature `api`): the axum router
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use ticket_desk::service::TicketService;
//! use ticket_desk::storage::MemoryStorage;
//!
//! let service = TicketService::new(Arc::new(MemoryStorage::new()));
//!
//! let ticket = service.create("Printer jammed", "Tray 2 is stuck").await?;
//! let ticket = service.start(&ticket.id).await?;
//! let ticket = service.complete(&ticket.id, "Cleared the tray").await?;
//! ```

// Allow missing error documentation for internal implementations
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::cast_possible_truncation)]

pub mod cli;
pub mod config;
pub mod core;
pub mod error;
pub mod service;
pub mod storage;

#[cfg(feature = "api")]
pub mod api;

#[cfg(test)]
pub mod test_utils;

// Re-export commonly used types
pub use error::{Result, TicketDeskError};
