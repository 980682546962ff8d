//! ZenAudit Store - Append-only audit persistence
//!
//! SQLite-based store for:
//! - Organisation timelines
//! - Service timelines
//! - Audit records, keyed by `service_org_hash` and indexed by `org_user_hash`
//!
//! ## Architecture
//!
//! This crate implements the `IAuditRepository` port from `zenaudit-core`
//! using SQLite as the storage backend. It is a driven (secondary) adapter
//! in the hexagonal architecture.
//!
//! ## Key Components
//!
//! - [`DatabasePool`] - Connection pool with schema creation
//! - [`TableNames`] - Prefixed table names
//! - [`SqliteAuditRepository`] - Full `IAuditRepository` implementation
//! - [`StoreError`] - Error types for store operations
//!
//! ## Usage
//!
//! ```no_run
//! use std::path::Path;
//! use zenaudit_store::{DatabasePool, SqliteAuditRepository, TableNames};
//!
//! # async fn example() -> anyhow::Result<()> {
//! let tables = TableNames::with_prefix("zen")?;
//! let pool = DatabasePool::new(Path::new("/var/lib/zenaudit/audit.db"), tables).await?;
//! let repo = SqliteAuditRepository::new(pool.pool().clone(), pool.tables().clone());
//! // Use repo as IAuditRepository...
//! # Ok(())
//! # }
//! ```

pub mod pool;
pub mod repository;
pub mod tables;

pub use pool::DatabasePool;
pub use repository::SqliteAuditRepository;
pub use tables::TableNames;

/// Errors that can occur during store operations
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Failed to establish a database connection
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// A database query failed
    #[error("Query failed: {0}")]
    QueryFailed(String),

    /// Schema creation failed
    #[error("Migration failed: {0}")]
    MigrationFailed(String),

    /// Table prefix cannot be used in SQL identifiers
    #[error("Invalid table prefix: '{0}'")]
    InvalidPrefix(String),

    /// A stored row could not be mapped back to a domain value
    #[error("Corrupt row: {0}")]
    CorruptRow(String),
}

impl From<sqlx::Error> for StoreError {
    fn from(e: sqlx::Error) -> Self {
        StoreError::QueryFailed(e.to_string())
    }
}
