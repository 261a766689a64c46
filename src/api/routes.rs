//! Status route definitions
//!
//! - /health - liveness of this instance
//! - /api/v1/registration - registration/heartbeat status

use axum::{routing::get, Router};

use super::handlers::{self, StatusState};

/// Versioned API routes, nested under /api/v1
pub fn api_routes(state: StatusState) -> Router {
    Router::new()
        .route("/registration", get(handlers::get_registration))
        .with_state(state)
}

/// Health endpoint at root level
pub fn health_routes(state: StatusState) -> Router {
    Router::new()
        .route("/health", get(handlers::get_health))
        .with_state(state)
}
