//! Database connection pool management
//!
//! Provides a wrapper around SQLx's SqlitePool with:
//! - Automatic directory creation for database files
//! - WAL journal mode for concurrent reads
//! - Schema creation for the configured table prefix
//! - In-memory mode for testing

use std::path::Path;

use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqlitePoolOptions};

use crate::tables::TableNames;
use crate::StoreError;

/// Manages a pool of SQLite connections for the audit store
///
/// The pool is configured with:
/// - WAL journal mode for concurrent read access
/// - 5 max connections for file-based databases
/// - 1 connection for in-memory databases (required for data persistence)
/// - 5-second busy timeout to handle write contention
pub struct DatabasePool {
    pool: SqlitePool,
    tables: TableNames,
}

impl DatabasePool {
    /// Opens (or creates) the database file and its prefixed tables
    ///
    /// # Errors
    ///
    /// Returns `StoreError::ConnectionFailed` if the connection cannot be established,
    /// or `StoreError::MigrationFailed` if the schema cannot be created.
    pub async fn new(db_path: &Path, tables: TableNames) -> Result<Self, StoreError> {
        if let Some(parent) = db_path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                StoreError::ConnectionFailed(format!(
                    "Failed to create database directory {}: {}",
                    parent.display(),
                    e
                ))
            })?;
        }

        let options = SqliteConnectOptions::new()
            .filename(db_path)
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .busy_timeout(std::time::Duration::from_secs(5));

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(options)
            .await
            .map_err(|e| {
                StoreError::ConnectionFailed(format!(
                    "Failed to connect to database at {}: {}",
                    db_path.display(),
                    e
                ))
            })?;

        Self::run_migrations(&pool, &tables).await?;

        tracing::info!(
            path = %db_path.display(),
            audit_table = %tables.audit,
            "Database pool initialized"
        );

        Ok(Self { pool, tables })
    }

    /// Creates an in-memory database pool for testing
    ///
    /// Uses a single connection to ensure data persistence across queries
    /// (SQLite in-memory databases are per-connection).
    ///
    /// # Errors
    ///
    /// Returns `StoreError::ConnectionFailed` if the connection cannot be established,
    /// or `StoreError::MigrationFailed` if the schema cannot be created.
    pub async fn in_memory(tables: TableNames) -> Result<Self, StoreError> {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .map_err(|e| {
                StoreError::ConnectionFailed(format!("Failed to create in-memory database: {}", e))
            })?;

        Self::run_migrations(&pool, &tables).await?;

        tracing::debug!("In-memory database pool initialized");

        Ok(Self { pool, tables })
    }

    /// Returns a reference to the underlying SQLite connection pool
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Returns the table names this pool was migrated for
    pub fn tables(&self) -> &TableNames {
        &self.tables
    }

    /// Creates the prefixed tables and indexes if they do not exist yet
    ///
    /// Safe to run against a database that already holds another prefix's
    /// tables.
    pub async fn ensure_tables(&self, tables: &TableNames) -> Result<(), StoreError> {
        Self::run_migrations(&self.pool, tables).await
    }

    async fn run_migrations(pool: &SqlitePool, tables: &TableNames) -> Result<(), StoreError> {
        let migration_sql = tables.render(include_str!("migrations/20261016_initial.sql"));
        sqlx::raw_sql(&migration_sql)
            .execute(pool)
            .await
            .map_err(|e| {
                StoreError::MigrationFailed(format!("Failed to run initial migration: {}", e))
            })?;

        tracing::debug!(prefix_table = %tables.organisations, "Database migrations completed");
        Ok(())
    }
}
