//! Domain newtypes with validation
//!
//! Organisation and service identifiers are opaque caller-visible strings.
//! New ones are random UUID v4 tokens, but identifiers supplied by callers
//! are accepted verbatim as long as they are not blank.

use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::errors::DomainError;

// ============================================================================
// Organisation identifier
// ============================================================================

/// Identifier of a registered organisation
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrgId(String);

impl OrgId {
    /// Wraps a caller-supplied identifier
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidId` if the identifier is empty or only
    /// whitespace.
    pub fn new(id: impl Into<String>) -> Result<Self, DomainError> {
        let id = id.into();
        if id.trim().is_empty() {
            return Err(DomainError::InvalidId(
                "organisation identifier must not be empty".to_string(),
            ));
        }
        Ok(Self(id))
    }

    /// Generates a fresh random identifier
    #[must_use]
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// Returns the identifier as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for OrgId {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for OrgId {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl AsRef<str> for OrgId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

// ============================================================================
// Service identifier
// ============================================================================

/// Identifier of a service registered under an organisation
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ServiceId(String);

impl ServiceId {
    /// Wraps a caller-supplied identifier
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidId` if the identifier is empty or only
    /// whitespace.
    pub fn new(id: impl Into<String>) -> Result<Self, DomainError> {
        let id = id.into();
        if id.trim().is_empty() {
            return Err(DomainError::InvalidId(
                "service identifier must not be empty".to_string(),
            ));
        }
        Ok(Self(id))
    }

    /// Generates a fresh random identifier
    #[must_use]
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// Returns the identifier as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for ServiceId {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for ServiceId {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl AsRef<str> for ServiceId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_org_id_rejects_blank() {
        assert!(OrgId::new("").is_err());
        assert!(OrgId::new("   ").is_err());
        assert!(OrgId::new("acme").is_ok());
    }

    #[test]
    fn test_org_id_generate_is_uuid() {
        let id = OrgId::generate();
        assert!(Uuid::parse_str(id.as_str()).is_ok());
        assert_ne!(OrgId::generate(), id);
    }

    #[test]
    fn test_service_id_rejects_blank() {
        assert!(ServiceId::new("").is_err());
        assert!("billing".parse::<ServiceId>().is_ok());
    }

    #[test]
    fn test_ids_serialize_transparently() {
        let id = OrgId::new("org-1").unwrap();
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"org-1\"");
        let back: ServiceId = serde_json::from_str("\"svc-1\"").unwrap();
        assert_eq!(back.as_str(), "svc-1");
    }
}
