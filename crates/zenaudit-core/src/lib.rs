//! ZenAudit Core - Audit record model and registry rules
//!
//! This crate contains the hexagonal architecture core with:
//! - **Domain** - `Timestamp` codec, hash key derivation, field validation,
//!   `Organisation` / `Service` timelines, `AuditRecord`
//! - **Use cases** - `RegistryUseCase`, `AuditRecordUseCase`
//! - **Port definitions** - `IAuditRepository`, implemented by the store adapter
//! - **Configuration** - YAML-backed `Config`
//!
//! # Architecture
//!
//! The domain module contains pure rules with no I/O. The repository port
//! describes an append-only key-value store. Use cases validate input
//! against the domain rules before touching the port, so a rejected request
//! never writes anything.

pub mod config;
pub mod domain;
pub mod ports;
pub mod usecases;
