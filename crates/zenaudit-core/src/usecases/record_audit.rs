//! Audit record use case
//!
//! Validates a save request, checks that the writing organisation is active,
//! derives the two index keys and appends the record. Saves are not
//! idempotent: identical payloads produce distinct records.

use std::sync::Arc;

use anyhow::Context;
use serde_json::{Map, Value};
use tracing::{debug, info};

use crate::domain::validation::{self, field_text, AUDIT_RECORD_FIELDS};
use crate::domain::{
    derive, AuditError, AuditRecord, AuditRecordQuery, HashKey, OrgId, ServiceId, Timestamp,
    KEY_SEPARATOR,
};
use crate::ports::IAuditRepository;
use crate::usecases::registry::RegistryUseCase;

/// Use case for writing and reading audit records
pub struct AuditRecordUseCase {
    repository: Arc<dyn IAuditRepository>,
    registry: RegistryUseCase,
    require_active_service: bool,
}

impl AuditRecordUseCase {
    /// Creates the use case
    ///
    /// # Arguments
    ///
    /// * `repository` - Store receiving the audit records
    /// * `registry` - Registry consulted for organisation (and service) status
    pub fn new(repository: Arc<dyn IAuditRepository>, registry: RegistryUseCase) -> Self {
        Self {
            repository,
            registry,
            require_active_service: false,
        }
    }

    /// Also require the service to be registered and active before saving
    pub fn with_require_active_service(mut self, required: bool) -> Self {
        self.require_active_service = required;
        self
    }

    /// Saves an audit record for the organisation/service pair
    ///
    /// This method:
    /// 1. Validates `data` is exactly `{timestamp: integer, obo_id, actor_id}`
    /// 2. Checks the organisation exists and is active
    /// 3. Derives `service_org_hash` and `org_user_hash`
    /// 4. Appends the record
    ///
    /// # Errors
    ///
    /// - `AuditError::Validation` for malformed payloads and unknown or
    ///   inactive organisations; nothing is written
    /// - `AuditError::InvalidInput` if key derivation fails
    /// - `AuditError::Store` if the append fails
    pub async fn save(
        &self,
        org_id: &str,
        service_id: &str,
        data: &Map<String, Value>,
    ) -> Result<AuditRecord, AuditError> {
        validation::validate(AUDIT_RECORD_FIELDS, data)?;

        let org_id = OrgId::new(org_id)?;
        let service_id = ServiceId::new(service_id)?;

        self.registry.require_active_organisation(&org_id).await?;
        if self.require_active_service {
            self.registry
                .require_active_service(&org_id, &service_id)
                .await?;
        }

        let timestamp = data
            .get("timestamp")
            .and_then(Value::as_i64)
            .map(Timestamp::from_raw)
            .ok_or_else(|| AuditError::validation("timestamp does not fit in 64 bits"))?;
        let obo_id = field_text(data, "obo_id");
        let actor_id = field_text(data, "actor_id");

        let record = AuditRecord {
            service_org_hash: derive(KEY_SEPARATOR, &[service_id.as_str(), org_id.as_str()])?,
            org_user_hash: derive(KEY_SEPARATOR, &[org_id.as_str(), obo_id.as_str()])?,
            timestamp,
            obo_id,
            actor_id,
        };

        self.repository
            .append_record(&record)
            .await
            .context("Failed to append audit record")
            .map_err(AuditError::store)?;

        info!(
            org_id = %org_id,
            service_id = %service_id,
            timestamp = %record.timestamp,
            "Saved audit record"
        );

        Ok(record)
    }

    /// Returns records written for the organisation/service pair
    pub async fn records_for_service(
        &self,
        org_id: &str,
        service_id: &str,
        query: &AuditRecordQuery,
    ) -> Result<Vec<AuditRecord>, AuditError> {
        let org_id = OrgId::new(org_id)?;
        let service_id = ServiceId::new(service_id)?;
        let key = HashKey::service_org(service_id.as_str(), org_id.as_str());

        debug!(org_id = %org_id, service_id = %service_id, "Querying records by service");

        self.repository
            .query_by_service_org(&key, query)
            .await
            .context("Failed to query audit records by service")
            .map_err(AuditError::store)
    }

    /// Returns records of a user's activity across every service of the organisation
    pub async fn records_for_user(
        &self,
        org_id: &str,
        obo_id: &str,
        query: &AuditRecordQuery,
    ) -> Result<Vec<AuditRecord>, AuditError> {
        let org_id = OrgId::new(org_id)?;
        if obo_id.trim().is_empty() {
            return Err(AuditError::validation("user identifier must not be empty"));
        }
        let key = HashKey::org_user(org_id.as_str(), obo_id);

        debug!(org_id = %org_id, obo_id = %obo_id, "Querying records by user");

        self.repository
            .query_by_org_user(&key, query)
            .await
            .context("Failed to query audit records by user")
            .map_err(AuditError::store)
    }
}
