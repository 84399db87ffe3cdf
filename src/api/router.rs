//! Incident API router.
//!
//! Routes:
//! - `GET /health`
//! - `POST /extract`
//!
//! Every route passes through the request logger.

use axum::routing::{get, post};
use axum::Router;

use crate::api::endpoints;
use crate::api::middleware;
use crate::api::types::ApiContext;

/// Build the incident API router.
pub fn incident_api_router(ctx: ApiContext) -> Router {
    Router::new()
        .route("/health", get(endpoints::health::check))
        .route("/extract", post(endpoints::extract::extract))
        .with_state(ctx)
        .layer(axum::middleware::from_fn(middleware::audit::log_request))
}
