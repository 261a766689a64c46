//! Luna Registry - self-registration and heartbeat
//!
//! Keeps this service instance known to the central registry.
//!
//! ## Architecture
//!
//! - **InstanceIdentity**: immutable name/version/address + derived instance id
//! - **RegistryClient**: `PUT` upsert and `POST` create against the registry
//! - **Registration state machine**: upsert, fall back to create on 404
//! - **HeartbeatScheduler**: runs the state machine now and every interval
//!
//! ## Design Principles
//!
//! - Idempotent: the instance id is stable, so every heartbeat hits the same resource
//! - Fail loudly: any unexpected registry answer ends the scheduler with a typed error
//! - No ambient state: clients are built from an explicit [`RegistryConfig`]

pub mod client;
pub mod heartbeat;
pub mod registration;
pub mod status;
pub mod types;

#[cfg(test)]
pub(crate) mod testing;

pub use client::{Registry, RegistryClient, RegistryConfig, RegistryError, UpsertOutcome};
pub use heartbeat::{HeartbeatConfig, HeartbeatScheduler};
pub use registration::{
    run_tick, run_tick_with_retry, RegistrationError, RegistrationState, TickOutcome,
};
pub use status::{RegistrationStatus, StatusHandle};
pub use types::{derive_instance_id, BalancerOptions, InstanceIdentity, InstanceRecord, InstanceStatus};
