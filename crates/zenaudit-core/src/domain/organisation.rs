//! Organisation and service timeline entries
//!
//! Both entities are stored as append-only timelines. Every registration or
//! unregistration appends a new row; the row with the greatest timestamp is
//! the entity's current state.

use serde::{Deserialize, Serialize};

use super::errors::DomainError;
use super::newtypes::{OrgId, ServiceId};
use super::timestamp::Timestamp;

/// Lifecycle status of an organisation or service row
///
/// Stored and serialized as an integer: 1 = active, 0 = inactive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "i64", try_from = "i64")]
pub enum EntityStatus {
    Inactive,
    Active,
}

impl EntityStatus {
    /// Integer form used in storage
    pub const fn as_i64(self) -> i64 {
        match self {
            EntityStatus::Inactive => 0,
            EntityStatus::Active => 1,
        }
    }

    pub fn is_active(self) -> bool {
        self == EntityStatus::Active
    }
}

impl From<EntityStatus> for i64 {
    fn from(status: EntityStatus) -> Self {
        status.as_i64()
    }
}

impl TryFrom<i64> for EntityStatus {
    type Error = DomainError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(EntityStatus::Inactive),
            1 => Ok(EntityStatus::Active),
            other => Err(DomainError::InvalidStatus(other)),
        }
    }
}

impl std::fmt::Display for EntityStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EntityStatus::Inactive => write!(f, "inactive"),
            EntityStatus::Active => write!(f, "active"),
        }
    }
}

// ============================================================================
// Organisation
// ============================================================================

/// One entry in an organisation's timeline
///
/// Registration rows carry the organisation details; unregistration rows
/// only carry the identifier, timestamp and inactive status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Organisation {
    org_id: OrgId,
    timestamp: Timestamp,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    contact: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    website: Option<String>,
    status: EntityStatus,
}

impl Organisation {
    /// Creates a timeline row without details
    pub fn new(org_id: OrgId, timestamp: Timestamp, status: EntityStatus) -> Self {
        Self {
            org_id,
            timestamp,
            name: None,
            contact: None,
            website: None,
            status,
        }
    }

    /// Creates an active registration row
    pub fn registered(
        org_id: OrgId,
        timestamp: Timestamp,
        name: impl Into<String>,
        contact: impl Into<String>,
        website: impl Into<String>,
    ) -> Self {
        Self::new(org_id, timestamp, EntityStatus::Active).with_details(
            Some(name.into()),
            Some(contact.into()),
            Some(website.into()),
        )
    }

    /// Creates an inactive unregistration row
    pub fn deactivated(org_id: OrgId, timestamp: Timestamp) -> Self {
        Self::new(org_id, timestamp, EntityStatus::Inactive)
    }

    /// Sets the descriptive fields (used when restoring rows from storage)
    pub fn with_details(
        mut self,
        name: Option<String>,
        contact: Option<String>,
        website: Option<String>,
    ) -> Self {
        self.name = name;
        self.contact = contact;
        self.website = website;
        self
    }

    pub fn org_id(&self) -> &OrgId {
        &self.org_id
    }

    pub fn timestamp(&self) -> Timestamp {
        self.timestamp
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn contact(&self) -> Option<&str> {
        self.contact.as_deref()
    }

    pub fn website(&self) -> Option<&str> {
        self.website.as_deref()
    }

    pub fn status(&self) -> EntityStatus {
        self.status
    }

    /// Returns true if this row marks the organisation as active
    pub fn is_active(&self) -> bool {
        self.status.is_active()
    }
}

// ============================================================================
// Service
// ============================================================================

/// One entry in a service's timeline, scoped under an organisation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Service {
    org_id: OrgId,
    service_id: ServiceId,
    timestamp: Timestamp,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    name: Option<String>,
    status: EntityStatus,
}

impl Service {
    /// Creates a timeline row without details
    pub fn new(
        org_id: OrgId,
        service_id: ServiceId,
        timestamp: Timestamp,
        status: EntityStatus,
    ) -> Self {
        Self {
            org_id,
            service_id,
            timestamp,
            name: None,
            status,
        }
    }

    /// Creates an active registration row
    pub fn registered(
        org_id: OrgId,
        service_id: ServiceId,
        timestamp: Timestamp,
        name: impl Into<String>,
    ) -> Self {
        Self::new(org_id, service_id, timestamp, EntityStatus::Active).with_name(Some(name.into()))
    }

    /// Creates an inactive unregistration row
    pub fn deactivated(org_id: OrgId, service_id: ServiceId, timestamp: Timestamp) -> Self {
        Self::new(org_id, service_id, timestamp, EntityStatus::Inactive)
    }

    pub fn with_name(mut self, name: Option<String>) -> Self {
        self.name = name;
        self
    }

    pub fn org_id(&self) -> &OrgId {
        &self.org_id
    }

    pub fn service_id(&self) -> &ServiceId {
        &self.service_id
    }

    pub fn timestamp(&self) -> Timestamp {
        self.timestamp
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn status(&self) -> EntityStatus {
        self.status
    }

    pub fn is_active(&self) -> bool {
        self.status.is_active()
    }
}
