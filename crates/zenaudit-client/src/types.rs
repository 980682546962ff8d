//! Request and response bodies of the audit API
//!
//! Timeline listings and record queries reuse the core domain types
//! ([`Organisation`], [`Service`], [`AuditRecord`]) since the server
//! serializes those directly.

use serde::{Deserialize, Serialize};

pub use zenaudit_core::domain::{AuditRecord, Organisation, Service};
pub use zenaudit_core::usecases::Unregistered;

/// Body of an organisation registration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrganisationDetails {
    pub name: String,
    pub contact: String,
    pub website: String,
}

/// Response to an organisation registration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrganisationRegistration {
    pub id: String,
    #[serde(flatten)]
    pub details: OrganisationDetails,
}

/// Body of a service registration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceDetails {
    pub name: String,
}

/// Response to a service registration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceRegistration {
    pub id: String,
    pub org_id: String,
    pub name: String,
}

/// Body of an audit record save
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewAuditRecord {
    /// Encoded event time (see `zenaudit_core::domain::Timestamp`)
    pub timestamp: i64,
    pub obo_id: String,
    pub actor_id: String,
}

/// Response to a successful save
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaveReceipt {
    /// Always `"saved"`
    pub status: String,
    /// Server-side handling time in microseconds
    pub total_time: i64,
}

/// Error body returned by the server
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ErrorBody {
    #[allow(dead_code)]
    pub status: u16,
    pub error_message: String,
}
