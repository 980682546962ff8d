//! Audit repository port (driven/secondary port)
//!
//! This module defines the interface to the backing key-value store that
//! holds the organisation and service timelines and the audit records.
//!
//! ## Design Notes
//!
//! - Uses `anyhow::Result` because storage errors are adapter-specific and
//!   are classified as `AuditError::Store` by the use cases.
//! - Every write is an append. There is no update or delete operation;
//!   "current state" is computed on the read side by taking the latest row.
//! - Latest-row reads must order by timestamp and then by insertion order,
//!   so that equal timestamps resolve to the row written last.

use crate::domain::{AuditRecord, AuditRecordQuery, HashKey, OrgId, Organisation, Service, ServiceId};

/// Port trait for the audit store
#[async_trait::async_trait]
pub trait IAuditRepository: Send + Sync {
    // --- Organisation timeline ---

    /// Appends a row to an organisation's timeline
    async fn append_organisation(&self, organisation: &Organisation) -> anyhow::Result<()>;

    /// Returns the most recent row for the organisation, if any
    async fn latest_organisation(&self, org_id: &OrgId) -> anyhow::Result<Option<Organisation>>;

    /// Returns the latest row of every organisation, ordered by id
    async fn list_organisations(&self) -> anyhow::Result<Vec<Organisation>>;

    // --- Service timeline ---

    /// Appends a row to a service's timeline
    async fn append_service(&self, service: &Service) -> anyhow::Result<()>;

    /// Returns the most recent row for the service, if any
    async fn latest_service(
        &self,
        org_id: &OrgId,
        service_id: &ServiceId,
    ) -> anyhow::Result<Option<Service>>;

    /// Returns the latest row of every service of the organisation, ordered by id
    async fn list_services(&self, org_id: &OrgId) -> anyhow::Result<Vec<Service>>;

    // --- Audit records ---

    /// Appends an audit record
    async fn append_record(&self, record: &AuditRecord) -> anyhow::Result<()>;

    /// Queries records by their `service_org_hash` partition key
    async fn query_by_service_org(
        &self,
        service_org_hash: &HashKey,
        query: &AuditRecordQuery,
    ) -> anyhow::Result<Vec<AuditRecord>>;

    /// Queries records through the `org_user_hash` index
    async fn query_by_org_user(
        &self,
        org_user_hash: &HashKey,
        query: &AuditRecordQuery,
    ) -> anyhow::Result<Vec<AuditRecord>>;
}
