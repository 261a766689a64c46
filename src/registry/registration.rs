//! Registration state machine
//!
//! One cycle per scheduler tick:
//!
//! ```text
//! Idle → Upserting ─┬─ 2xx ──────────────────────────→ Heartbeated
//!                   ├─ 404 → Reregistering ─┬─ 201 ──→ Registered
//!                   │                       └─ other → Fatal
//!                   └─ error ─────────────────────────→ Fatal
//! ```
//!
//! A cycle makes at most two sequential registry calls and ends in exactly
//! one of: heartbeat sent, instance registered, or a returned
//! [`RegistrationError`]. Nothing here terminates the process.

use std::time::Duration;

use rand::Rng;
use serde::Serialize;
use tracing::{debug, info, warn};

use super::client::{Registry, RegistryError, UpsertOutcome};
use super::heartbeat::HeartbeatConfig;
use super::status::StatusHandle;
use super::types::InstanceIdentity;
use crate::config::defaults::{MAX_RETRY_BACKOFF_EXPONENT, MAX_RETRY_BACKOFF_SECS, RETRY_JITTER_MS};

/// States of the registration protocol.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RegistrationState {
    Idle,
    Upserting,
    Heartbeated,
    Reregistering,
    Registered,
    Fatal,
}

/// Successful end of a cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// The upsert was accepted.
    Heartbeated,
    /// The registry did not know the instance and it was created.
    Registered,
}

impl TickOutcome {
    pub fn state(self) -> RegistrationState {
        match self {
            TickOutcome::Heartbeated => RegistrationState::Heartbeated,
            TickOutcome::Registered => RegistrationState::Registered,
        }
    }
}

/// Fatal end of a cycle, tagged with the step that failed.
#[derive(Debug, thiserror::Error)]
pub enum RegistrationError {
    #[error("heartbeat upsert failed: {0}")]
    Upsert(#[source] RegistryError),
    #[error("instance registration failed: {0}")]
    Create(#[source] RegistryError),
}

impl RegistrationError {
    pub fn registry_error(&self) -> &RegistryError {
        match self {
            RegistrationError::Upsert(e) | RegistrationError::Create(e) => e,
        }
    }

    pub fn is_transient(&self) -> bool {
        self.registry_error().is_transient()
    }
}

/// Run one registration cycle against `registry`.
pub async fn run_tick<R: Registry + ?Sized>(
    registry: &R,
    identity: &InstanceIdentity,
    status: &StatusHandle,
) -> Result<TickOutcome, RegistrationError> {
    let result = advance(registry, identity, status).await;
    record(status, &result).await;
    result
}

async fn record(status: &StatusHandle, result: &Result<TickOutcome, RegistrationError>) {
    match result {
        Ok(outcome) => status.record_outcome(*outcome).await,
        Err(e) => status.record_failure(e).await,
    }
}

async fn advance<R: Registry + ?Sized>(
    registry: &R,
    identity: &InstanceIdentity,
    status: &StatusHandle,
) -> Result<TickOutcome, RegistrationError> {
    status.transition(RegistrationState::Upserting).await;
    let record = identity.record();

    match registry.upsert(&record).await.map_err(RegistrationError::Upsert)? {
        UpsertOutcome::Updated => {
            info!(instance_id = %record.instance_id, "Sent heartbeat");
            Ok(TickOutcome::Heartbeated)
        }
        UpsertOutcome::NotFound => {
            debug!(instance_id = %record.instance_id, "Instance unknown to registry, registering");
            status.transition(RegistrationState::Reregistering).await;

            registry.create(&record).await.map_err(RegistrationError::Create)?;
            info!(instance_id = %record.instance_id, "Registered instance");
            Ok(TickOutcome::Registered)
        }
    }
}

/// Run one cycle, retrying transport failures up to `config.max_retries`
/// times with exponential backoff. Protocol errors are returned at once.
///
/// Only the final result is recorded; while a retry is pending the status
/// stays `Upserting`.
pub async fn run_tick_with_retry<R: Registry + ?Sized>(
    registry: &R,
    identity: &InstanceIdentity,
    status: &StatusHandle,
    config: &HeartbeatConfig,
) -> Result<TickOutcome, RegistrationError> {
    let mut attempt: u32 = 0;
    loop {
        match advance(registry, identity, status).await {
            Err(e) if e.is_transient() && attempt < config.max_retries => {
                let delay = retry_backoff(config.retry_base_delay, attempt);
                attempt += 1;
                warn!(
                    error = %e,
                    attempt,
                    max_retries = config.max_retries,
                    retry_in_ms = delay.as_millis() as u64,
                    "Registry unreachable, retrying"
                );
                status.transition(RegistrationState::Upserting).await;
                tokio::time::sleep(delay).await;
            }
            result => {
                record(status, &result).await;
                return result;
            }
        }
    }
}

/// `base * 2^attempt`, capped, plus random jitter.
fn retry_backoff(base: Duration, attempt: u32) -> Duration {
    let factor = 1u32 << attempt.min(MAX_RETRY_BACKOFF_EXPONENT);
    let backoff = base
        .saturating_mul(factor)
        .min(Duration::from_secs(MAX_RETRY_BACKOFF_SECS));
    let jitter = if RETRY_JITTER_MS > 0 {
        rand::thread_rng().gen_range(0..RETRY_JITTER_MS)
    } else {
        0
    };
    backoff + Duration::from_millis(jitter)
}
