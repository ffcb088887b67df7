//! Ticket lifecycle transitions
//!
//! ```text
//! NEW --start--> IN_PROGRESS --complete--> COMPLETED
//!  \                  |
//!   `----cancel-------+--------------------> CANCELLED
//! ```
//!
//! `cancel` accepts any source status, including the terminal ones.

use super::{Status, Ticket};
use crate::error::{Result, TicketDeskError};

/// A single-ticket status change
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    Start,
    Complete,
    Cancel,
}

impl Transition {
    /// Status the ticket ends up in
    #[must_use]
    pub const fn target(self) -> Status {
        match self {
            Self::Start => Status::InProgress,
            Self::Complete => Status::Completed,
            Self::Cancel => Status::Cancelled,
        }
    }

    /// Status the ticket must currently be in, if any
    #[must_use]
    pub const fn required_source(self) -> Option<Status> {
        match self {
            Self::Start => Some(Status::New),
            Self::Complete => Some(Status::InProgress),
            Self::Cancel => None,
        }
    }

    /// Past-tense verb used in error messages
    #[must_use]
    pub const fn past_tense(self) -> &'static str {
        match self {
            Self::Start => "started",
            Self::Complete => "completed",
            Self::Cancel => "cancelled",
        }
    }

    /// Whether a ticket in `current` may take this transition
    #[must_use]
    pub fn allows(self, current: Status) -> bool {
        self.required_source()
            .is_none_or(|required| required == current)
    }

    /// Checks that `ticket` may take this transition
    pub fn check(self, ticket: &Ticket) -> Result<()> {
        if self.allows(ticket.status) {
            Ok(())
        } else {
            Err(TicketDeskError::InvalidState {
                id: ticket.id.to_string(),
                current: ticket.status,
                action: self.past_tense(),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_start_only_from_new() {
        for status in Status::ALL {
            assert_eq!(Transition::Start.allows(status), status == Status::New);
        }
    }

    #[test]
    fn test_complete_only_from_in_progress() {
        for status in Status::ALL {
            assert_eq!(
                Transition::Complete.allows(status),
                status == Status::InProgress
            );
        }
    }

    #[test]
    fn test_cancel_from_any_status() {
        assert!(Status::ALL.into_iter().all(|s| Transition::Cancel.allows(s)));
    }

    #[test]
    fn test_check_reports_current_status() {
        let mut ticket = Ticket::new("t", "c");
        ticket.status = Status::Completed;

        let err = Transition::Start.check(&ticket).unwrap_err();
        assert!(matches!(
            err,
            TicketDeskError::InvalidState {
                current: Status::Completed,
                action: "started",
                ..
            }
        ));
    }
}
