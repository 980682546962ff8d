//! ZenAudit Server - HTTP API over the audit use cases
//!
//! - [`routes`] - URL scheme under `/1.0/audit/org`
//! - [`handler`] - Request decoding, use case dispatch and JSON responses
//! - [`server`] - hyper accept loop with graceful shutdown

pub mod handler;
pub mod routes;
pub mod server;

pub use handler::ApiHandler;
pub use routes::Route;
pub use server::{serve, ApiServer};
