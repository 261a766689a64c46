//! Status server using Axum
//!
//! Runs next to the heartbeat task on its own port (never the advertised
//! instance port) so operators can see what the agent is doing:
//! - `/health` for liveness
//! - `/api/v1/registration` for the registration protocol status

pub mod handlers;
mod routes;

pub use handlers::StatusState;

use axum::Router;
use tower_http::trace::TraceLayer;

/// Create the complete status router.
pub fn create_app(state: StatusState) -> Router {
    Router::new()
        .nest("/api/v1", routes::api_routes(state.clone()))
        .merge(routes::health_routes(state))
        .layer(TraceLayer::new_for_http())
}
