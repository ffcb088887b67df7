//! Test utilities for ticket-desk
//!
//! This module provides common test fixtures and utilities to reduce
//! duplication in test code across the codebase.

#![cfg(test)]

use crate::core::{Status, Ticket, TicketBuilder, TicketId};
use crate::service::TicketService;
use crate::storage::{MemoryStorage, TicketRepository};
use std::sync::Arc;

/// Test fixture bundling an in-memory store with a service over it
pub struct TestDesk {
    pub storage: Arc<MemoryStorage>,
    pub service: TicketService,
}

impl TestDesk {
    /// Create an empty desk
    pub fn new() -> Self {
        let storage = Arc::new(MemoryStorage::new());
        let service = TicketService::new(storage.clone());
        Self { storage, service }
    }

    /// Create a desk with one ticket in every status
    pub async fn with_sample_tickets() -> Self {
        let desk = Self::new();

        let tickets = vec![
            create_test_ticket("Fix login bug", Status::New),
            create_test_ticket("Replace office router", Status::InProgress),
            create_test_ticket("Order new badges", Status::Completed),
            create_test_ticket("Migrate mail server", Status::Cancelled),
        ];

        for ticket in tickets {
            desk.insert(ticket).await;
        }

        desk
    }

    /// Store a prepared ticket directly, bypassing the service
    pub async fn insert(&self, ticket: Ticket) -> Ticket {
        self.storage
            .create(ticket)
            .await
            .expect("Failed to save ticket")
    }

    /// Load a ticket that must exist
    pub async fn load(&self, id: &TicketId) -> Ticket {
        self.storage
            .find_by_id(id)
            .await
            .expect("Failed to load ticket")
            .expect("Ticket should exist")
    }
}

/// Create a test ticket in the given status
///
/// Terminal tickets get a closing comment, as they would through the service.
pub fn create_test_ticket(title: &str, status: Status) -> Ticket {
    let builder = TicketBuilder::new()
        .title(title)
        .content(format!("Description for {title}"))
        .status(status);

    if status.is_terminal() {
        builder.comment(format!("Closed {title}")).build()
    } else {
        builder.build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::TicketPredicate;

    #[tokio::test]
    async fn test_desk_with_sample_tickets() {
        let desk = TestDesk::with_sample_tickets().await;
        assert_eq!(desk.storage.len().await, 4);

        for status in Status::ALL {
            let count = desk
                .storage
                .count(&TicketPredicate::with_status(status))
                .await
                .unwrap();
            assert_eq!(count, 1, "one ticket in {status}");
        }
    }

    #[test]
    fn test_terminal_fixture_has_comment() {
        assert!(create_test_ticket("a", Status::Completed).comment.is_some());
        assert!(create_test_ticket("b", Status::New).comment.is_none());
    }
}
