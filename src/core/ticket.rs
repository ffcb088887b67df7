use chrono::{DateTime, SubsecRound, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use crate::error::TicketDeskError;

/// Unique identifier for a ticket
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TicketId(Uuid);

impl TicketId {
    /// Generates a fresh random ticket ID
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Wraps an existing UUID
    #[must_use]
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Returns the underlying UUID
    #[must_use]
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for TicketId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for TicketId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl FromStr for TicketId {
    type Err = TicketDeskError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        // A malformed ID cannot name a stored ticket
        Uuid::parse_str(s)
            .map(Self)
            .map_err(|_| TicketDeskError::not_found(s))
    }
}

/// Lifecycle status of a ticket
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Status {
    /// Freshly created, nobody is working on it
    #[default]
    New,
    /// Work has started
    InProgress,
    /// Work finished successfully
    Completed,
    /// Abandoned
    Cancelled,
}

impl Status {
    /// All statuses in lifecycle order
    pub const ALL: [Self; 4] = [Self::New, Self::InProgress, Self::Completed, Self::Cancelled];

    /// Wire and storage representation
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::New => "NEW",
            Self::InProgress => "IN_PROGRESS",
            Self::Completed => "COMPLETED",
            Self::Cancelled => "CANCELLED",
        }
    }

    /// Whether no further lifecycle step is expected
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Cancelled)
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Status {
    type Err = TicketDeskError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| {
                TicketDeskError::validation(format!(
                    "Unknown status '{s}'. Expected one of NEW, IN_PROGRESS, COMPLETED, CANCELLED"
                ))
            })
    }
}

/// Current time at the microsecond precision the storage backends keep
#[must_use]
pub fn timestamp_now() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(6)
}

/// A support ticket
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Ticket {
    pub id: TicketId,
    pub title: String,
    pub content: String,
    /// Set when the ticket is completed or cancelled
    pub comment: Option<String>,
    pub status: Status,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Ticket {
    /// Creates a new ticket in the `NEW` status, stamped with the current time
    pub fn new(title: impl Into<String>, content: impl Into<String>) -> Self {
        let now = timestamp_now();
        Self {
            id: TicketId::new(),
            title: title.into(),
            content: content.into(),
            comment: None,
            status: Status::New,
            created_at: now,
            updated_at: now,
        }
    }
}
