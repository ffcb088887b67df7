//! In-process ticket storage
//!
//! Backs the service when no database is configured and in tests. All
//! tickets live in one map behind an async `RwLock`, so `update_many` is
//! atomic with respect to every other call on the same storage.

use super::repository::{Page, TicketPredicate, TicketRepository, TicketUpdate};
use crate::core::{Ticket, TicketId, timestamp_now};
use crate::error::{Result, TicketDeskError};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Ticket storage kept entirely in memory
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    tickets: Arc<RwLock<HashMap<TicketId, Ticket>>>,
}

impl MemoryStorage {
    /// Creates an empty storage
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored tickets
    pub async fn len(&self) -> usize {
        self.tickets.read().await.len()
    }

    /// Whether no ticket is stored
    pub async fn is_empty(&self) -> bool {
        self.tickets.read().await.is_empty()
    }
}

#[async_trait]
impl TicketRepository for MemoryStorage {
    async fn find_by_id(&self, id: &TicketId) -> Result<Option<Ticket>> {
        Ok(self.tickets.read().await.get(id).cloned())
    }

    async fn find_many(&self, predicate: &TicketPredicate, page: Page) -> Result<Vec<Ticket>> {
        let tickets = self.tickets.read().await;
        let mut matching: Vec<&Ticket> = tickets.values().filter(|t| predicate.matches(t)).collect();

        // Newest first; ID breaks ties so paging is stable
        matching.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| a.id.cmp(&b.id))
        });

        Ok(matching
            .into_iter()
            .skip(page.offset)
            .take(page.limit)
            .cloned()
            .collect())
    }

    async fn create(&self, ticket: Ticket) -> Result<Ticket> {
        let mut tickets = self.tickets.write().await;
        if tickets.contains_key(&ticket.id) {
            return Err(TicketDeskError::storage(format!(
                "Ticket {} already exists",
                ticket.id
            )));
        }
        tickets.insert(ticket.id, ticket.clone());
        Ok(ticket)
    }

    async fn update(&self, id: &TicketId, update: TicketUpdate) -> Result<Ticket> {
        let mut tickets = self.tickets.write().await;
        let ticket = tickets
            .get_mut(id)
            .ok_or_else(|| TicketDeskError::not_found(id))?;
        update.apply(ticket, timestamp_now());
        Ok(ticket.clone())
    }

    async fn update_many(&self, predicate: &TicketPredicate, update: TicketUpdate) -> Result<u64> {
        let mut tickets = self.tickets.write().await;
        let now = timestamp_now();
        let mut changed = 0;
        for ticket in tickets.values_mut().filter(|t| predicate.matches(t)) {
            update.apply(ticket, now);
            changed += 1;
        }
        Ok(changed)
    }

    async fn count(&self, predicate: &TicketPredicate) -> Result<u64> {
        let tickets = self.tickets.read().await;
        Ok(tickets.values().filter(|t| predicate.matches(t)).count() as u64)
    }
}
