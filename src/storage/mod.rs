//! Ticket persistence
//!
//! The service only talks to [`TicketRepository`]; [`open`] picks the
//! implementation named by the configuration.

mod memory;
mod repository;
#[cfg(feature = "database")]
mod sqlite;

pub use memory::MemoryStorage;
#[cfg(test)]
pub use repository::MockTicketRepository;
pub use repository::{Page, TicketPredicate, TicketRepository, TicketUpdate};
#[cfg(feature = "database")]
pub use sqlite::SqliteStorage;

use crate::config::{StorageBackend, StorageConfig};
use crate::error::Result;
use std::sync::Arc;

/// Opens the configured storage backend, applying the schema where needed
pub async fn open(config: &StorageConfig) -> Result<Arc<dyn TicketRepository>> {
    match config.backend {
        StorageBackend::Memory => {
            tracing::info!("Using in-memory ticket storage");
            Ok(Arc::new(MemoryStorage::new()))
        },
        #[cfg(feature = "database")]
        StorageBackend::Sqlite => {
            let storage = SqliteStorage::connect(&config.url).await?;
            storage.migrate().await?;
            Ok(Arc::new(storage))
        },
        #[cfg(not(feature = "database"))]
        StorageBackend::Sqlite => Err(crate::error::TicketDeskError::Config(
            "The sqlite backend requires the `database` feature".to_string(),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Ticket;

    #[tokio::test]
    async fn test_open_memory_backend() {
        let config = StorageConfig {
            backend: StorageBackend::Memory,
            url: String::new(),
        };

        let storage = open(&config).await.unwrap();
        let ticket = storage.create(Ticket::new("t", "c")).await.unwrap();
        assert!(storage.find_by_id(&ticket.id).await.unwrap().is_some());
    }

    #[cfg(feature = "database")]
    #[tokio::test]
    async fn test_open_sqlite_backend_applies_schema() {
        let config = StorageConfig {
            backend: StorageBackend::Sqlite,
            url: "sqlite::memory:".to_string(),
        };

        let storage = open(&config).await.unwrap();
        assert_eq!(
            storage.count(&TicketPredicate::default()).await.unwrap(),
            0
        );
        storage.close().await.unwrap();
    }
}
