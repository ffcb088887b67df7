use crate::core::{Status, Ticket, TicketId};
use crate::error::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};

/// Normalized filter over the ticket table
///
/// Every field narrows the match; an all-`None` predicate matches every ticket.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TicketPredicate {
    /// Inclusive lower bound on `created_at`
    pub created_from: Option<DateTime<Utc>>,
    /// Exclusive upper bound on `created_at`
    pub created_before: Option<DateTime<Utc>>,
    pub status: Option<Status>,
}

impl TicketPredicate {
    /// Predicate matching every ticket in `status`
    #[must_use]
    pub fn with_status(status: Status) -> Self {
        Self {
            status: Some(status),
            ..Self::default()
        }
    }

    /// Checks whether a ticket satisfies every bound of the predicate
    #[must_use]
    pub fn matches(&self, ticket: &Ticket) -> bool {
        self.created_from.is_none_or(|from| ticket.created_at >= from)
            && self
                .created_before
                .is_none_or(|before| ticket.created_at < before)
            && self.status.is_none_or(|status| ticket.status == status)
    }
}

/// Slice of an ordered result set
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    pub limit: usize,
    pub offset: usize,
}

/// Fields written by a status change
///
/// `comment` is only written when present; `updated_at` is always refreshed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TicketUpdate {
    pub status: Status,
    pub comment: Option<String>,
}

impl TicketUpdate {
    /// Applies the update to an in-memory ticket
    pub fn apply(&self, ticket: &mut Ticket, now: DateTime<Utc>) {
        ticket.status = self.status;
        if let Some(comment) = &self.comment {
            ticket.comment = Some(comment.clone());
        }
        ticket.updated_at = now;
    }
}

/// Repository trait for ticket storage operations
///
/// This trait defines the interface for storing and retrieving tickets,
/// allowing for different storage implementations.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TicketRepository: Send + Sync {
    /// Loads a ticket by ID
    async fn find_by_id(&self, id: &TicketId) -> Result<Option<Ticket>>;

    /// Loads the tickets matching `predicate`, newest first, sliced to `page`
    async fn find_many(&self, predicate: &TicketPredicate, page: Page) -> Result<Vec<Ticket>>;

    /// Persists a new ticket
    async fn create(&self, ticket: Ticket) -> Result<Ticket>;

    /// Applies `update` to one ticket and returns the stored result
    ///
    /// Fails with `NotFound` when no ticket has the given ID.
    async fn update(&self, id: &TicketId, update: TicketUpdate) -> Result<Ticket>;

    /// Applies `update` to every ticket matching `predicate` in one step
    ///
    /// Returns the number of tickets changed.
    async fn update_many(&self, predicate: &TicketPredicate, update: TicketUpdate) -> Result<u64>;

    /// Counts tickets matching `predicate`
    async fn count(&self, predicate: &TicketPredicate) -> Result<u64>;

    /// Releases backend resources
    async fn close(&self) -> Result<()> {
        Ok(())
    }
}
