//! Heartbeat background task - runs the registration cycle on a fixed interval
//!
//! The first cycle runs immediately, then one per `interval` until the
//! cancellation token fires or a cycle ends fatally. Cycles never overlap: a
//! cycle that outlasts the interval causes the missed ticks to be skipped.

use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::info;

use super::client::Registry;
use super::registration::{run_tick_with_retry, RegistrationError, RegistrationState};
use super::status::StatusHandle;
use super::types::InstanceIdentity;
use crate::config::defaults;

/// Scheduler timing and retry settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeartbeatConfig {
    /// Time between the starts of two cycles.
    pub interval: Duration,
    /// In-cycle retries of transport failures (0 = fail fast).
    pub max_retries: u32,
    /// First retry delay; doubles per attempt.
    pub retry_base_delay: Duration,
}

impl Default for HeartbeatConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(defaults::HEARTBEAT_INTERVAL_SECS),
            max_retries: defaults::HEARTBEAT_MAX_RETRIES,
            retry_base_delay: Duration::from_millis(defaults::HEARTBEAT_RETRY_BASE_DELAY_MS),
        }
    }
}

/// Periodic driver of the registration state machine.
pub struct HeartbeatScheduler<R> {
    registry: R,
    identity: InstanceIdentity,
    status: StatusHandle,
    config: HeartbeatConfig,
}

impl<R: Registry> HeartbeatScheduler<R> {
    pub fn new(registry: R, identity: InstanceIdentity, config: HeartbeatConfig) -> Self {
        let status = StatusHandle::new(identity.instance_id());
        Self {
            registry,
            identity,
            status,
            config,
        }
    }

    /// Handle for observing the scheduler from other tasks.
    pub fn status(&self) -> StatusHandle {
        self.status.clone()
    }

    /// Run cycles until cancelled or a cycle fails.
    ///
    /// Returns the number of completed cycles on cancellation. An in-flight
    /// cycle is abandoned when the token fires.
    pub async fn run(&self, cancel: CancellationToken) -> Result<u64, RegistrationError> {
        let mut interval = tokio::time::interval(self.config.interval);
        interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
        let mut cycles = 0u64;

        info!(
            instance_id = %self.identity.instance_id(),
            interval_secs = self.config.interval.as_secs(),
            "[Heartbeat] Scheduler starting"
        );

        loop {
            tokio::select! {
                biased;
                _ = cancel.cancelled() => {
                    info!(cycles, "[Heartbeat] Received shutdown signal");
                    return Ok(cycles);
                }
                _ = interval.tick() => {}
            }

            tokio::select! {
                biased;
                _ = cancel.cancelled() => {
                    info!(cycles, "[Heartbeat] Shutdown during cycle, abandoning it");
                    self.status.transition(RegistrationState::Idle).await;
                    return Ok(cycles);
                }
                result = run_tick_with_retry(&self.registry, &self.identity, &self.status, &self.config) => {
                    result?;
                    cycles += 1;
                }
            }
        }
    }
}

impl<R: Registry + 'static> HeartbeatScheduler<R> {
    /// Run the scheduler on its own task.
    pub fn spawn(self, cancel: CancellationToken) -> JoinHandle<Result<u64, RegistrationError>> {
        tokio::spawn(async move { self.run(cancel).await })
    }
}
