//! Registration status shared between the heartbeat task and the status server

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::RwLock;

use super::registration::{RegistrationState, TickOutcome};

/// Point-in-time view of the registration protocol.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RegistrationStatus {
    pub instance_id: String,
    /// Last state the state machine entered.
    pub state: RegistrationState,
    /// Cycles that ended in a successful heartbeat.
    pub heartbeats: u64,
    /// Cycles that ended in a (re-)registration.
    pub registrations: u64,
    pub last_success: Option<DateTime<Utc>>,
    pub last_error: Option<String>,
}

/// Cloneable handle to the shared status.
#[derive(Debug, Clone)]
pub struct StatusHandle {
    inner: Arc<RwLock<RegistrationStatus>>,
}

impl StatusHandle {
    pub fn new(instance_id: &str) -> Self {
        Self {
            inner: Arc::new(RwLock::new(RegistrationStatus {
                instance_id: instance_id.to_string(),
                state: RegistrationState::Idle,
                heartbeats: 0,
                registrations: 0,
                last_success: None,
                last_error: None,
            })),
        }
    }

    pub async fn snapshot(&self) -> RegistrationStatus {
        self.inner.read().await.clone()
    }

    pub async fn state(&self) -> RegistrationState {
        self.inner.read().await.state
    }

    pub(crate) async fn transition(&self, state: RegistrationState) {
        self.inner.write().await.state = state;
    }

    pub(crate) async fn record_outcome(&self, outcome: TickOutcome) {
        let mut status = self.inner.write().await;
        status.state = outcome.state();
        match outcome {
            TickOutcome::Heartbeated => status.heartbeats += 1,
            TickOutcome::Registered => status.registrations += 1,
        }
        status.last_success = Some(Utc::now());
        status.last_error = None;
    }

    pub(crate) async fn record_failure(&self, error: &impl std::fmt::Display) {
        let mut status = self.inner.write().await;
        status.state = RegistrationState::Fatal;
        status.last_error = Some(error.to_string());
    }
}
