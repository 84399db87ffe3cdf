//! HTTP front for the incident extractor.
//!
//! `incident_api_router()` returns a composable `Router` that can be
//! mounted on any axum server; `start_api_server()` binds and serves it.

pub mod endpoints;
pub mod error;
pub mod middleware;
pub mod router;
pub mod server;
pub mod types;

pub use router::incident_api_router;
pub use server::{start_api_server, ApiServer, ApiSession};
pub use types::ApiContext;
