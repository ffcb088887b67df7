//! Error types for ticket-desk
//!
//! Every failure the service can report is a variant of [`TicketDeskError`],
//! so callers (the HTTP layer in particular) branch on the kind of error
//! instead of on its message.

use crate::core::Status;
use thiserror::Error;

/// Result type alias used throughout the crate
pub type Result<T> = std::result::Result<T, TicketDeskError>;

/// Main error type for ticket-desk operations
#[derive(Error, Debug)]
pub enum TicketDeskError {
    /// A required field was missing or a request was malformed
    #[error("Validation failed: {0}")]
    Validation(String),

    /// No ticket exists with the given ID
    #[error("Ticket not found: {id}")]
    NotFound { id: String },

    /// The requested transition is not allowed from the ticket's current status
    #[error("Ticket {id} cannot be {action}: current status is {current}")]
    InvalidState {
        id: String,
        current: Status,
        action: &'static str,
    },

    /// A bulk cancellation found no tickets in progress
    #[error("There are no tickets in progress to cancel")]
    NothingToCancel,

    /// The persistence backend failed
    #[error("Storage error: {0}")]
    Storage(String),

    /// Configuration could not be loaded
    #[error("Configuration error: {0}")]
    Config(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl TicketDeskError {
    /// Create a validation error from any displayable message
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Create a not-found error for a ticket reference
    pub fn not_found(id: impl ToString) -> Self {
        Self::NotFound { id: id.to_string() }
    }

    /// Create a storage error from any displayable backend error
    pub fn storage(err: impl std::fmt::Display) -> Self {
        Self::Storage(err.to_string())
    }

    /// Whether this error was caused by the caller rather than the server
    #[must_use]
    pub const fn is_client_error(&self) -> bool {
        matches!(
            self,
            Self::Validation(_)
                | Self::NotFound { .. }
                | Self::InvalidState { .. }
                | Self::NothingToCancel
        )
    }
}

impl From<config::ConfigError> for TicketDeskError {
    fn from(err: config::ConfigError) -> Self {
        Self::Config(err.to_string())
    }
}

#[cfg(feature = "database")]
impl From<sqlx::Error> for TicketDeskError {
    fn from(err: sqlx::Error) -> Self {
        Self::storage(err)
    }
}
