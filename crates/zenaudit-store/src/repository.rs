//! SQLite implementation of IAuditRepository
//!
//! Every write is an `INSERT`; nothing is ever updated or deleted. Reads that
//! need an entity's current state pick its row with the greatest
//! `(timestamp, seq)`, so equal timestamps resolve to the row inserted last.
//!
//! ## Type Mapping
//!
//! | Domain Type       | SQL Type | Strategy                               |
//! |-------------------|----------|----------------------------------------|
//! | OrgId, ServiceId  | TEXT     | `.as_str()` / `::new()`                |
//! | HashKey           | TEXT     | hex digest via `.as_str()` / `from_stored()` |
//! | Timestamp         | INTEGER  | encoded microseconds via `as_i64()`    |
//! | EntityStatus      | INTEGER  | 1 = active, 0 = inactive               |

use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};

use zenaudit_core::domain::{
    AuditRecord, AuditRecordQuery, EntityStatus, HashKey, OrgId, Organisation, Service, ServiceId,
    Timestamp,
};
use zenaudit_core::ports::IAuditRepository;

use crate::tables::TableNames;
use crate::StoreError;

/// SQL text rendered once for a table prefix
#[derive(Debug, Clone)]
struct Statements {
    insert_organisation: String,
    latest_organisation: String,
    list_organisations: String,
    insert_service: String,
    latest_service: String,
    list_services: String,
    insert_record: String,
    records_by_service_org_desc: String,
    records_by_service_org_asc: String,
    records_by_org_user_desc: String,
    records_by_org_user_asc: String,
}

impl Statements {
    fn new(tables: &TableNames) -> Self {
        let records_by = |column: &str, direction: &str| {
            tables.render(&format!(
                "SELECT service_org_hash, org_user_hash, timestamp, obo_id, actor_id
                 FROM {{audit}}
                 WHERE {column} = ? AND timestamp >= ? AND timestamp <= ?
                 ORDER BY timestamp {direction}, seq {direction}
                 LIMIT ?"
            ))
        };

        Self {
            insert_organisation: tables.render(
                "INSERT INTO {organisations} (org_id, timestamp, name, contact, website, status)
                 VALUES (?, ?, ?, ?, ?, ?)",
            ),
            latest_organisation: tables.render(
                "SELECT org_id, timestamp, name, contact, website, status
                 FROM {organisations}
                 WHERE org_id = ?
                 ORDER BY timestamp DESC, seq DESC
                 LIMIT 1",
            ),
            list_organisations: tables.render(
                "SELECT o.org_id, o.timestamp, o.name, o.contact, o.website, o.status
                 FROM {organisations} o
                 WHERE o.seq = (
                     SELECT i.seq FROM {organisations} i
                     WHERE i.org_id = o.org_id
                     ORDER BY i.timestamp DESC, i.seq DESC
                     LIMIT 1
                 )
                 ORDER BY o.org_id",
            ),
            insert_service: tables.render(
                "INSERT INTO {services} (org_id, service_id, timestamp, name, status)
                 VALUES (?, ?, ?, ?, ?)",
            ),
            latest_service: tables.render(
                "SELECT org_id, service_id, timestamp, name, status
                 FROM {services}
                 WHERE org_id = ? AND service_id = ?
                 ORDER BY timestamp DESC, seq DESC
                 LIMIT 1",
            ),
            list_services: tables.render(
                "SELECT s.org_id, s.service_id, s.timestamp, s.name, s.status
                 FROM {services} s
                 WHERE s.org_id = ? AND s.seq = (
                     SELECT i.seq FROM {services} i
                     WHERE i.org_id = s.org_id AND i.service_id = s.service_id
                     ORDER BY i.timestamp DESC, i.seq DESC
                     LIMIT 1
                 )
                 ORDER BY s.service_id",
            ),
            insert_record: tables.render(
                "INSERT INTO {audit} (service_org_hash, org_user_hash, timestamp, obo_id, actor_id)
                 VALUES (?, ?, ?, ?, ?)",
            ),
            records_by_service_org_desc: records_by("service_org_hash", "DESC"),
            records_by_service_org_asc: records_by("service_org_hash", "ASC"),
            records_by_org_user_desc: records_by("org_user_hash", "DESC"),
            records_by_org_user_asc: records_by("org_user_hash", "ASC"),
        }
    }
}

/// SQLite-based implementation of the audit repository port
///
/// All operations are performed through a connection pool for concurrency.
pub struct SqliteAuditRepository {
    pool: SqlitePool,
    statements: Statements,
}

impl SqliteAuditRepository {
    /// Creates a repository over the tables named by `tables`
    ///
    /// The tables must already exist; see [`crate::DatabasePool`].
    pub fn new(pool: SqlitePool, tables: TableNames) -> Self {
        Self {
            pool,
            statements: Statements::new(&tables),
        }
    }

    async fn query_records(
        &self,
        sql: &str,
        key: &HashKey,
        query: &AuditRecordQuery,
    ) -> anyhow::Result<Vec<AuditRecord>> {
        let rows = sqlx::query(sql)
            .bind(key.as_str())
            .bind(query.lower_bound())
            .bind(query.upper_bound())
            .bind(i64::from(query.effective_limit()))
            .fetch_all(&self.pool)
            .await?;

        tracing::trace!(count = rows.len(), "Fetched audit records");

        rows.iter()
            .map(|row| record_from_row(row).map_err(Into::into))
            .collect()
    }
}

// ============================================================================
// Row mapping
// ============================================================================

fn corrupt(err: impl std::fmt::Display) -> StoreError {
    StoreError::CorruptRow(err.to_string())
}

fn status_from_row(row: &SqliteRow) -> Result<EntityStatus, StoreError> {
    EntityStatus::try_from(row.try_get::<i64, _>("status")?).map_err(corrupt)
}

fn organisation_from_row(row: &SqliteRow) -> Result<Organisation, StoreError> {
    let org_id = OrgId::new(row.try_get::<String, _>("org_id")?).map_err(corrupt)?;
    let timestamp = Timestamp::from_raw(row.try_get("timestamp")?);

    Ok(Organisation::new(org_id, timestamp, status_from_row(row)?).with_details(
        row.try_get("name")?,
        row.try_get("contact")?,
        row.try_get("website")?,
    ))
}

fn service_from_row(row: &SqliteRow) -> Result<Service, StoreError> {
    let org_id = OrgId::new(row.try_get::<String, _>("org_id")?).map_err(corrupt)?;
    let service_id = ServiceId::new(row.try_get::<String, _>("service_id")?).map_err(corrupt)?;
    let timestamp = Timestamp::from_raw(row.try_get("timestamp")?);

    Ok(
        Service::new(org_id, service_id, timestamp, status_from_row(row)?)
            .with_name(row.try_get("name")?),
    )
}

fn record_from_row(row: &SqliteRow) -> Result<AuditRecord, StoreError> {
    Ok(AuditRecord {
        service_org_hash: HashKey::from_stored(row.try_get("service_org_hash")?),
        org_user_hash: HashKey::from_stored(row.try_get("org_user_hash")?),
        timestamp: Timestamp::from_raw(row.try_get("timestamp")?),
        obo_id: row.try_get("obo_id")?,
        actor_id: row.try_get("actor_id")?,
    })
}

// ============================================================================
// IAuditRepository implementation
// ============================================================================

#[async_trait::async_trait]
impl IAuditRepository for SqliteAuditRepository {
    async fn append_organisation(&self, organisation: &Organisation) -> anyhow::Result<()> {
        sqlx::query(&self.statements.insert_organisation)
            .bind(organisation.org_id().as_str())
            .bind(organisation.timestamp().as_i64())
            .bind(organisation.name())
            .bind(organisation.contact())
            .bind(organisation.website())
            .bind(organisation.status().as_i64())
            .execute(&self.pool)
            .await?;

        tracing::trace!(org_id = %organisation.org_id(), status = %organisation.status(), "Appended organisation row");
        Ok(())
    }

    async fn latest_organisation(&self, org_id: &OrgId) -> anyhow::Result<Option<Organisation>> {
        let row = sqlx::query(&self.statements.latest_organisation)
            .bind(org_id.as_str())
            .fetch_optional(&self.pool)
            .await?;

        match row {
            Some(ref r) => Ok(Some(organisation_from_row(r)?)),
            None => Ok(None),
        }
    }

    async fn list_organisations(&self) -> anyhow::Result<Vec<Organisation>> {
        let rows = sqlx::query(&self.statements.list_organisations)
            .fetch_all(&self.pool)
            .await?;

        rows.iter()
            .map(|row| organisation_from_row(row).map_err(Into::into))
            .collect()
    }

    async fn append_service(&self, service: &Service) -> anyhow::Result<()> {
        sqlx::query(&self.statements.insert_service)
            .bind(service.org_id().as_str())
            .bind(service.service_id().as_str())
            .bind(service.timestamp().as_i64())
            .bind(service.name())
            .bind(service.status().as_i64())
            .execute(&self.pool)
            .await?;

        tracing::trace!(
            org_id = %service.org_id(),
            service_id = %service.service_id(),
            status = %service.status(),
            "Appended service row"
        );
        Ok(())
    }

    async fn latest_service(
        &self,
        org_id: &OrgId,
        service_id: &ServiceId,
    ) -> anyhow::Result<Option<Service>> {
        let row = sqlx::query(&self.statements.latest_service)
            .bind(org_id.as_str())
            .bind(service_id.as_str())
            .fetch_optional(&self.pool)
            .await?;

        match row {
            Some(ref r) => Ok(Some(service_from_row(r)?)),
            None => Ok(None),
        }
    }

    async fn list_services(&self, org_id: &OrgId) -> anyhow::Result<Vec<Service>> {
        let rows = sqlx::query(&self.statements.list_services)
            .bind(org_id.as_str())
            .fetch_all(&self.pool)
            .await?;

        rows.iter()
            .map(|row| service_from_row(row).map_err(Into::into))
            .collect()
    }

    async fn append_record(&self, record: &AuditRecord) -> anyhow::Result<()> {
        sqlx::query(&self.statements.insert_record)
            .bind(record.service_org_hash.as_str())
            .bind(record.org_user_hash.as_str())
            .bind(record.timestamp.as_i64())
            .bind(record.obo_id.as_str())
            .bind(record.actor_id.as_str())
            .execute(&self.pool)
            .await?;

        tracing::trace!(key = %record.service_org_hash, "Appended audit record");
        Ok(())
    }

    async fn query_by_service_org(
        &self,
        service_org_hash: &HashKey,
        query: &AuditRecordQuery,
    ) -> anyhow::Result<Vec<AuditRecord>> {
        let sql = if query.newest_first {
            &self.statements.records_by_service_org_desc
        } else {
            &self.statements.records_by_service_org_asc
        };
        self.query_records(sql, service_org_hash, query).await
    }

    async fn query_by_org_user(
        &self,
        org_user_hash: &HashKey,
        query: &AuditRecordQuery,
    ) -> anyhow::Result<Vec<AuditRecord>> {
        let sql = if query.newest_first {
            &self.statements.records_by_org_user_desc
        } else {
            &self.statements.records_by_org_user_asc
        };
        self.query_records(sql, org_user_hash, query).await
    }
}
