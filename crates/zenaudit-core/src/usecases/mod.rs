//! Use cases (interactors) for ZenAudit
//!
//! Use cases are thin coordinators that delegate validation rules to the
//! domain and I/O to the repository port.
//!
//! - [`RegistryUseCase`] - Organisation and service lifecycle
//! - [`AuditRecordUseCase`] - Saving and querying audit records

pub mod record_audit;
pub mod registry;

pub use record_audit::AuditRecordUseCase;
pub use registry::{RegistryUseCase, Unregistered};
