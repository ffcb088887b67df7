//! SQLite-backed ticket storage
//!
//! Tickets live in a single `tickets` table. Timestamps are stored as
//! INTEGER microseconds since the Unix epoch so that range filters and
//! ordering compare numbers rather than text.

use super::repository::{Page, TicketPredicate, TicketRepository, TicketUpdate};
use crate::core::{Status, Ticket, TicketBuilder, TicketId, timestamp_now};
use crate::error::{Result, TicketDeskError};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions, SqliteRow};
use sqlx::{QueryBuilder, Row, Sqlite};
use std::str::FromStr;
use tracing::{debug, info};

const SCHEMA: [&str; 3] = [
    "CREATE TABLE IF NOT EXISTS tickets (
        id          TEXT PRIMARY KEY NOT NULL,
        title       TEXT NOT NULL,
        content     TEXT NOT NULL,
        comment     TEXT,
        status      TEXT NOT NULL DEFAULT 'NEW'
                    CHECK (status IN ('NEW', 'IN_PROGRESS', 'COMPLETED', 'CANCELLED')),
        created_at  INTEGER NOT NULL,
        updated_at  INTEGER NOT NULL
    )",
    "CREATE INDEX IF NOT EXISTS idx_tickets_created_at ON tickets (created_at DESC)",
    "CREATE INDEX IF NOT EXISTS idx_tickets_status ON tickets (status)",
];

const COLUMNS: &str = "id, title, content, comment, status, created_at, updated_at";

/// Ticket storage over a SQLite connection pool
#[derive(Debug, Clone)]
pub struct SqliteStorage {
    pool: SqlitePool,
}

impl SqliteStorage {
    /// Opens a pool for `url`, creating the database file if needed
    ///
    /// In-memory databases get a single long-lived connection, since every
    /// new connection would otherwise see its own empty database.
    pub async fn connect(url: &str) -> Result<Self> {
        let options = SqliteConnectOptions::from_str(url)?.create_if_missing(true);

        let pool_options = if is_in_memory(url) {
            SqlitePoolOptions::new()
                .max_connections(1)
                .min_connections(1)
                .idle_timeout(None)
                .max_lifetime(None)
        } else {
            SqlitePoolOptions::new().max_connections(5)
        };

        let pool = pool_options.connect_with(options).await?;
        info!(url, "Connected to SQLite");
        Ok(Self { pool })
    }

    /// Opens a fresh in-memory database with the schema applied
    pub async fn in_memory() -> Result<Self> {
        let storage = Self::connect("sqlite::memory:").await?;
        storage.migrate().await?;
        Ok(storage)
    }

    /// Creates the `tickets` table and its indexes if they do not exist
    pub async fn migrate(&self) -> Result<()> {
        for statement in SCHEMA {
            sqlx::query(statement).execute(&self.pool).await?;
        }
        debug!("SQLite schema is up to date");
        Ok(())
    }
}

fn is_in_memory(url: &str) -> bool {
    url.contains(":memory:") || url.contains("mode=memory")
}

fn push_predicate(query: &mut QueryBuilder<'_, Sqlite>, predicate: &TicketPredicate) {
    query.push(" WHERE 1 = 1");
    if let Some(from) = predicate.created_from {
        query
            .push(" AND created_at >= ")
            .push_bind(from.timestamp_micros());
    }
    if let Some(before) = predicate.created_before {
        query
            .push(" AND created_at < ")
            .push_bind(before.timestamp_micros());
    }
    if let Some(status) = predicate.status {
        query.push(" AND status = ").push_bind(status.as_str());
    }
}

fn to_i64(value: usize) -> i64 {
    i64::try_from(value).unwrap_or(i64::MAX)
}

fn timestamp_from_micros(micros: i64) -> Result<DateTime<Utc>> {
    DateTime::from_timestamp_micros(micros)
        .ok_or_else(|| TicketDeskError::storage(format!("Invalid stored timestamp: {micros}")))
}

fn ticket_from_row(row: &SqliteRow) -> Result<Ticket> {
    let id: String = row.try_get("id")?;
    let id = uuid::Uuid::parse_str(&id)
        .map_err(|e| TicketDeskError::storage(format!("Invalid stored ticket id '{id}': {e}")))?;
    let status: String = row.try_get("status")?;
    let status = Status::from_str(&status)
        .map_err(|_| TicketDeskError::storage(format!("Invalid stored status '{status}'")))?;

    Ok(TicketBuilder::new()
        .id(TicketId::from_uuid(id))
        .title(row.try_get::<String, _>("title")?)
        .content(row.try_get::<String, _>("content")?)
        .maybe_comment(row.try_get("comment")?)
        .status(status)
        .created_at(timestamp_from_micros(row.try_get("created_at")?)?)
        .updated_at(timestamp_from_micros(row.try_get("updated_at")?)?)
        .build())
}

#[async_trait]
impl TicketRepository for SqliteStorage {
    async fn find_by_id(&self, id: &TicketId) -> Result<Option<Ticket>> {
        let row = sqlx::query(&format!("SELECT {COLUMNS} FROM tickets WHERE id = ?"))
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await?;
        row.as_ref().map(ticket_from_row).transpose()
    }

    async fn find_many(&self, predicate: &TicketPredicate, page: Page) -> Result<Vec<Ticket>> {
        let mut query = QueryBuilder::new(format!("SELECT {COLUMNS} FROM tickets"));
        push_predicate(&mut query, predicate);
        query
            .push(" ORDER BY created_at DESC, id ASC LIMIT ")
            .push_bind(to_i64(page.limit))
            .push(" OFFSET ")
            .push_bind(to_i64(page.offset));

        let rows = query.build().fetch_all(&self.pool).await?;
        rows.iter().map(ticket_from_row).collect()
    }

    async fn create(&self, ticket: Ticket) -> Result<Ticket> {
        sqlx::query(&format!(
            "INSERT INTO tickets ({COLUMNS}) VALUES (?, ?, ?, ?, ?, ?, ?)"
        ))
        .bind(ticket.id.to_string())
        .bind(&ticket.title)
        .bind(&ticket.content)
        .bind(&ticket.comment)
        .bind(ticket.status.as_str())
        .bind(ticket.created_at.timestamp_micros())
        .bind(ticket.updated_at.timestamp_micros())
        .execute(&self.pool)
        .await?;
        Ok(ticket)
    }

    async fn update(&self, id: &TicketId, update: TicketUpdate) -> Result<Ticket> {
        let row = sqlx::query(&format!(
            "UPDATE tickets
             SET status = ?, comment = COALESCE(?, comment), updated_at = ?
             WHERE id = ?
             RETURNING {COLUMNS}"
        ))
        .bind(update.status.as_str())
        .bind(update.comment)
        .bind(timestamp_now().timestamp_micros())
        .bind(id.to_string())
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some(row) => ticket_from_row(&row),
            None => Err(TicketDeskError::not_found(id)),
        }
    }

    async fn update_many(&self, predicate: &TicketPredicate, update: TicketUpdate) -> Result<u64> {
        let mut query = QueryBuilder::new("UPDATE tickets SET status = ");
        query
            .push_bind(update.status.as_str())
            .push(", comment = COALESCE(")
            .push_bind(update.comment)
            .push(", comment), updated_at = ")
            .push_bind(timestamp_now().timestamp_micros());
        push_predicate(&mut query, predicate);

        let result = query.build().execute(&self.pool).await?;
        Ok(result.rows_affected())
    }

    async fn count(&self, predicate: &TicketPredicate) -> Result<u64> {
        let mut query = QueryBuilder::new("SELECT COUNT(*) FROM tickets");
        push_predicate(&mut query, predicate);

        let count: i64 = query.build().fetch_one(&self.pool).await?.try_get(0)?;
        Ok(u64::try_from(count).unwrap_or_default())
    }

    async fn close(&self) -> Result<()> {
        self.pool.close().await;
        info!("Closed SQLite pool");
        Ok(())
    }
}
