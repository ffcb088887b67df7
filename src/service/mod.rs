//! Ticket service: lifecycle rules and list-query assembly
//!
//! [`TicketService`] is the only place that decides whether a status change
//! is allowed. It reads the ticket, checks the transition table in
//! [`crate::core::Transition`], and writes through the injected
//! [`TicketRepository`].
//!
//! # Concurrency
//!
//! Single-ticket operations read and then write without a version check, so
//! two concurrent `start` calls on the same ticket may both succeed (the
//! last write wins). [`TicketService::cancel_all_in_progress`] changes rows
//! in one storage-level update and reports the rows that update actually
//! changed.

mod query;

pub use query::{DEFAULT_LIMIT, DateFilter, ListQuery};

use crate::core::{Status, Ticket, TicketId, Transition};
use crate::error::{Result, TicketDeskError};
use crate::storage::{TicketPredicate, TicketRepository, TicketUpdate};
use chrono::{Local, TimeZone};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Lifecycle and query operations over the ticket store
#[derive(Clone)]
pub struct TicketService {
    repository: Arc<dyn TicketRepository>,
}

impl std::fmt::Debug for TicketService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TicketService")
            .field("repository", &"Arc<dyn TicketRepository>")
            .finish()
    }
}

impl TicketService {
    /// Creates a service over the given storage
    pub fn new(repository: Arc<dyn TicketRepository>) -> Self {
        Self { repository }
    }

    /// The storage this service writes through
    #[must_use]
    pub fn repository(&self) -> &Arc<dyn TicketRepository> {
        &self.repository
    }

    /// Lists tickets newest first, reading calendar dates in the server's local time zone
    pub async fn list(&self, query: &ListQuery) -> Result<Vec<Ticket>> {
        self.list_in(query, &Local).await
    }

    /// Lists tickets newest first, reading calendar dates in `tz`
    pub async fn list_in<Tz: TimeZone>(&self, query: &ListQuery, tz: &Tz) -> Result<Vec<Ticket>> {
        let predicate = query.predicate_in(tz)?;
        debug!(?predicate, limit = query.limit, offset = query.offset, "Listing tickets");
        self.repository.find_many(&predicate, query.page()).await
    }

    /// Creates a ticket in the `NEW` status
    pub async fn create(&self, title: &str, content: &str) -> Result<Ticket> {
        require_non_empty("title", title)?;
        require_non_empty("content", content)?;

        let ticket = self.repository.create(Ticket::new(title, content)).await?;
        info!(id = %ticket.id, "Ticket created");
        Ok(ticket)
    }

    /// Moves a `NEW` ticket to `IN_PROGRESS`
    pub async fn start(&self, id: &TicketId) -> Result<Ticket> {
        self.transition(id, Transition::Start, None).await
    }

    /// Moves an `IN_PROGRESS` ticket to `COMPLETED`, recording `comment`
    pub async fn complete(&self, id: &TicketId, comment: &str) -> Result<Ticket> {
        require_non_empty("comment", comment)?;
        self.transition(id, Transition::Complete, Some(comment)).await
    }

    /// Moves a ticket in any status to `CANCELLED`, recording `comment`
    pub async fn cancel(&self, id: &TicketId, comment: &str) -> Result<Ticket> {
        require_non_empty("comment", comment)?;
        self.transition(id, Transition::Cancel, Some(comment)).await
    }

    /// Cancels every `IN_PROGRESS` ticket and returns how many were cancelled
    ///
    /// The returned number is the rows the bulk update changed, not the
    /// earlier count. Tickets that leave `IN_PROGRESS` between the two
    /// steps are not included.
    ///
    /// Fails with [`TicketDeskError::NothingToCancel`] when no ticket is in
    /// progress, either at the initial count or by the time the update runs.
    pub async fn cancel_all_in_progress(&self, comment: &str) -> Result<u64> {
        require_non_empty("comment", comment)?;

        let in_progress = TicketPredicate::with_status(Status::InProgress);
        if self.repository.count(&in_progress).await? == 0 {
            return Err(TicketDeskError::NothingToCancel);
        }

        let cancelled = self
            .repository
            .update_many(
                &in_progress,
                TicketUpdate {
                    status: Transition::Cancel.target(),
                    comment: Some(comment.to_string()),
                },
            )
            .await?;

        if cancelled == 0 {
            return Err(TicketDeskError::NothingToCancel);
        }

        info!(cancelled, "Cancelled all tickets in progress");
        Ok(cancelled)
    }

    async fn transition(
        &self,
        id: &TicketId,
        transition: Transition,
        comment: Option<&str>,
    ) -> Result<Ticket> {
        let ticket = self
            .repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| TicketDeskError::not_found(id))?;

        if let Err(err) = transition.check(&ticket) {
            warn!(%id, current = %ticket.status, ?transition, "Rejected ticket transition");
            return Err(err);
        }

        let updated = self
            .repository
            .update(
                id,
                TicketUpdate {
                    status: transition.target(),
                    comment: comment.map(str::to_string),
                },
            )
            .await?;

        info!(%id, from = %ticket.status, to = %updated.status, "Ticket status changed");
        Ok(updated)
    }
}

fn require_non_empty(field: &str, value: &str) -> Result<()> {
    if value.is_empty() {
        Err(TicketDeskError::validation(format!("{field} is required")))
    } else {
        Ok(())
    }
}
