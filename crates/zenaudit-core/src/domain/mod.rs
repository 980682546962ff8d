//! Domain entities and business rules
//!
//! - Integer timestamp codec and a monotonic clock
//! - Hash key derivation for the audit indexes
//! - Schema-driven payload validation
//! - Organisation and service timeline entries
//! - Audit records and query parameters
//! - Domain-specific error types

pub mod errors;
pub mod hash_key;
pub mod newtypes;
pub mod organisation;
pub mod record;
pub mod timestamp;
pub mod validation;

// Re-export commonly used types
pub use errors::{AuditError, DomainError};
pub use hash_key::{derive, HashKey, KEY_SEPARATOR};
pub use newtypes::{OrgId, ServiceId};
pub use organisation::{EntityStatus, Organisation, Service};
pub use record::{AuditRecord, AuditRecordQuery, DEFAULT_QUERY_LIMIT, MAX_QUERY_LIMIT};
pub use timestamp::{MonotonicClock, Timestamp};
pub use validation::{FieldError, FieldKind};
