//! Organisation and service registry use case
//!
//! Manages the lifecycle of the organisations and services allowed to write
//! audit records. Both lifecycles follow the same contract: every call
//! appends a row to the entity's timeline and the latest row is the current
//! state. Nothing is ever updated in place.

use std::sync::Arc;

use anyhow::Context;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::{debug, info};

use crate::domain::validation::{self, field_text, ORGANISATION_FIELDS, SERVICE_FIELDS};
use crate::domain::{AuditError, MonotonicClock, OrgId, Organisation, Service, ServiceId};
use crate::ports::IAuditRepository;

/// Identifier(s) of an entity that was unregistered
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Unregistered {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub org_id: Option<String>,
}

/// Use case for registering, unregistering and checking organisations and services
#[derive(Clone)]
pub struct RegistryUseCase {
    repository: Arc<dyn IAuditRepository>,
    clock: Arc<MonotonicClock>,
}

impl RegistryUseCase {
    /// Creates a registry over the given repository
    ///
    /// # Arguments
    ///
    /// * `repository` - Store holding the organisation and service timelines
    /// * `clock` - Shared clock stamping every timeline row
    pub fn new(repository: Arc<dyn IAuditRepository>, clock: Arc<MonotonicClock>) -> Self {
        Self { repository, clock }
    }

    // ========================================================================
    // Organisations
    // ========================================================================

    /// Registers an organisation, or records updated details for an existing id
    ///
    /// When `org_id` is absent or blank a new identifier is generated. No
    /// lookup is made first, so every call without an id creates a new
    /// organisation.
    ///
    /// # Returns
    ///
    /// The supplied payload with the resolved `id` added.
    ///
    /// # Errors
    ///
    /// - `AuditError::Validation` if `data` is not exactly `{name, contact, website}`
    /// - `AuditError::Store` if the row cannot be appended
    pub async fn register_organisation(
        &self,
        org_id: Option<&str>,
        data: &Map<String, Value>,
    ) -> Result<Map<String, Value>, AuditError> {
        validation::validate(ORGANISATION_FIELDS, data)?;

        let org_id = match non_blank(org_id) {
            Some(id) => OrgId::new(id)?,
            None => OrgId::generate(),
        };

        let organisation = Organisation::registered(
            org_id.clone(),
            self.clock.now(),
            field_text(data, "name"),
            field_text(data, "contact"),
            field_text(data, "website"),
        );

        self.repository
            .append_organisation(&organisation)
            .await
            .context("Failed to append organisation registration")
            .map_err(AuditError::store)?;

        info!(org_id = %org_id, "Registered organisation");

        let mut result = data.clone();
        result.insert("id".to_string(), Value::String(org_id.to_string()));
        Ok(result)
    }

    /// Marks an organisation as inactive by appending an inactive row
    ///
    /// # Errors
    ///
    /// - `AuditError::Validation` if no identifier is supplied
    /// - `AuditError::Store` if the row cannot be appended
    pub async fn unregister_organisation(
        &self,
        org_id: Option<&str>,
    ) -> Result<Unregistered, AuditError> {
        let org_id = non_blank(org_id).ok_or_else(|| {
            AuditError::validation("No organisation identifier supplied for unregistration")
        })?;
        let org_id = OrgId::new(org_id)?;

        let row = Organisation::deactivated(org_id.clone(), self.clock.now());
        self.repository
            .append_organisation(&row)
            .await
            .context("Failed to append organisation unregistration")
            .map_err(AuditError::store)?;

        info!(org_id = %org_id, "Unregistered organisation");

        Ok(Unregistered {
            id: org_id.to_string(),
            org_id: None,
        })
    }

    /// Returns the most recent timeline row for the organisation
    pub async fn latest_status(&self, org_id: &OrgId) -> Result<Option<Organisation>, AuditError> {
        self.repository
            .latest_organisation(org_id)
            .await
            .context("Error retrieving organisation details")
            .map_err(AuditError::store)
    }

    /// Returns whether the organisation's latest row is active
    ///
    /// # Errors
    ///
    /// - `AuditError::Validation` if the organisation has never been registered
    pub async fn is_active(&self, org_id: &OrgId) -> Result<bool, AuditError> {
        match self.latest_status(org_id).await? {
            Some(organisation) => Ok(organisation.is_active()),
            None => {
                debug!(org_id = %org_id, "Organisation lookup found no rows");
                Err(AuditError::validation("Specified organisation does not exist"))
            }
        }
    }

    /// Fails unless the organisation exists and is active
    pub async fn require_active_organisation(&self, org_id: &OrgId) -> Result<(), AuditError> {
        if self.is_active(org_id).await? {
            Ok(())
        } else {
            debug!(org_id = %org_id, "Organisation is inactive");
            Err(AuditError::validation("Invalid organisation supplied"))
        }
    }

    /// Returns the current state of every organisation
    pub async fn list_organisations(&self) -> Result<Vec<Organisation>, AuditError> {
        self.repository
            .list_organisations()
            .await
            .context("Error listing organisations")
            .map_err(AuditError::store)
    }

    // ========================================================================
    // Services
    // ========================================================================

    /// Registers a service under an active organisation
    ///
    /// When `service_id` is absent or blank a new identifier is generated.
    ///
    /// # Returns
    ///
    /// The supplied payload with `id` and `org_id` added.
    ///
    /// # Errors
    ///
    /// - `AuditError::Validation` if `data` is not exactly `{name}`, or the
    ///   organisation is unknown or inactive
    /// - `AuditError::Store` if the row cannot be appended
    pub async fn register_service(
        &self,
        org_id: &str,
        service_id: Option<&str>,
        data: &Map<String, Value>,
    ) -> Result<Map<String, Value>, AuditError> {
        validation::validate(SERVICE_FIELDS, data)?;

        let org_id = OrgId::new(org_id)?;
        self.require_active_organisation(&org_id).await?;

        let service_id = match non_blank(service_id) {
            Some(id) => ServiceId::new(id)?,
            None => ServiceId::generate(),
        };

        let service = Service::registered(
            org_id.clone(),
            service_id.clone(),
            self.clock.now(),
            field_text(data, "name"),
        );

        self.repository
            .append_service(&service)
            .await
            .context("Failed to append service registration")
            .map_err(AuditError::store)?;

        info!(org_id = %org_id, service_id = %service_id, "Registered service");

        let mut result = data.clone();
        result.insert("id".to_string(), Value::String(service_id.to_string()));
        result.insert("org_id".to_string(), Value::String(org_id.to_string()));
        Ok(result)
    }

    /// Marks a service as inactive by appending an inactive row
    ///
    /// # Errors
    ///
    /// - `AuditError::Validation` if either identifier is missing
    /// - `AuditError::Store` if the row cannot be appended
    pub async fn unregister_service(
        &self,
        org_id: &str,
        service_id: Option<&str>,
    ) -> Result<Unregistered, AuditError> {
        let org_id = OrgId::new(org_id)?;
        let service_id = non_blank(service_id).ok_or_else(|| {
            AuditError::validation("No service identifier supplied for unregistration")
        })?;
        let service_id = ServiceId::new(service_id)?;

        let row = Service::deactivated(org_id.clone(), service_id.clone(), self.clock.now());
        self.repository
            .append_service(&row)
            .await
            .context("Failed to append service unregistration")
            .map_err(AuditError::store)?;

        info!(org_id = %org_id, service_id = %service_id, "Unregistered service");

        Ok(Unregistered {
            id: service_id.to_string(),
            org_id: Some(org_id.to_string()),
        })
    }

    /// Returns the most recent timeline row for the service
    pub async fn latest_service_status(
        &self,
        org_id: &OrgId,
        service_id: &ServiceId,
    ) -> Result<Option<Service>, AuditError> {
        self.repository
            .latest_service(org_id, service_id)
            .await
            .context("Error retrieving service details")
            .map_err(AuditError::store)
    }

    /// Returns whether the service's latest row is active
    ///
    /// # Errors
    ///
    /// - `AuditError::Validation` if the service has never been registered
    pub async fn is_service_active(
        &self,
        org_id: &OrgId,
        service_id: &ServiceId,
    ) -> Result<bool, AuditError> {
        match self.latest_service_status(org_id, service_id).await? {
            Some(service) => Ok(service.is_active()),
            None => Err(AuditError::validation("Specified service does not exist")),
        }
    }

    /// Fails unless the service exists and is active
    pub async fn require_active_service(
        &self,
        org_id: &OrgId,
        service_id: &ServiceId,
    ) -> Result<(), AuditError> {
        if self.is_service_active(org_id, service_id).await? {
            Ok(())
        } else {
            Err(AuditError::validation("Invalid service supplied"))
        }
    }

    /// Returns the current state of every service of the organisation
    pub async fn list_services(&self, org_id: &str) -> Result<Vec<Service>, AuditError> {
        let org_id = OrgId::new(org_id)?;
        self.repository
            .list_services(&org_id)
            .await
            .context("Error listing services")
            .map_err(AuditError::store)
    }
}

fn non_blank(id: Option<&str>) -> Option<&str> {
    id.filter(|s| !s.trim().is_empty())
}
