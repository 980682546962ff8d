//! Integration tests for zenaudit-client
//!
//! Uses wiremock to simulate the audit API and verifies request shapes,
//! response decoding and error mapping of the AuditClient.

mod common;

mod test_organisations;
mod test_records;
mod test_services;
