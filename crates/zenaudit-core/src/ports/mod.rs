//! Port definitions (hexagonal architecture interfaces)
//!
//! Ports are the interfaces the core depends on; their implementations live
//! in adapter crates.
//!
//! - [`IAuditRepository`] - Append-only storage for registry timelines and audit records

pub mod audit_repository;

pub use audit_repository::IAuditRepository;
