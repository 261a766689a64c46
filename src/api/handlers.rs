//! Status server handlers
//!
//! Lets operators see that the agent is alive and what the heartbeat task
//! last did.

use std::time::Instant;

use axum::{extract::State, Json};
use serde::Serialize;

use crate::registry::{InstanceStatus, RegistrationState, RegistrationStatus, StatusHandle};

// ============================================================================
// API State
// ============================================================================

/// Shared state for status handlers
#[derive(Clone)]
pub struct StatusState {
    /// Registration status written by the heartbeat task
    pub registration: StatusHandle,
    /// Process start, for uptime reporting
    pub started_at: Instant,
}

impl StatusState {
    pub fn new(registration: StatusHandle) -> Self {
        Self {
            registration,
            started_at: Instant::now(),
        }
    }
}

// ============================================================================
// Health Endpoint
// ============================================================================

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Same literal the heartbeat reports to the registry
    pub status: InstanceStatus,
    pub instance_id: String,
    pub registration_state: RegistrationState,
    pub version: String,
    pub uptime_seconds: u64,
}

/// GET /health
pub async fn get_health(State(state): State<StatusState>) -> Json<HealthResponse> {
    let registration = state.registration.snapshot().await;
    Json(HealthResponse {
        status: InstanceStatus::Ok,
        instance_id: registration.instance_id,
        registration_state: registration.state,
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_seconds: state.started_at.elapsed().as_secs(),
    })
}

// ============================================================================
// Registration Endpoint
// ============================================================================

/// GET /api/v1/registration - Last known state of the registration protocol
pub async fn get_registration(State(state): State<StatusState>) -> Json<RegistrationStatus> {
    Json(state.registration.snapshot().await)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_health_reports_ok_while_idle() {
        let state = StatusState::new(StatusHandle::new("todo-svc:localhost:4000"));
        let response = get_health(State(state)).await;

        assert_eq!(response.status, InstanceStatus::Ok);
        assert_eq!(response.instance_id, "todo-svc:localhost:4000");
        assert_eq!(response.registration_state, RegistrationState::Idle);
    }

    #[tokio::test]
    async fn test_registration_snapshot() {
        let state = StatusState::new(StatusHandle::new("todo-svc:localhost:4000"));
        let response = get_registration(State(state)).await;

        assert_eq!(response.heartbeats, 0);
        assert_eq!(response.registrations, 0);
        assert!(response.last_error.is_none());
    }
}
