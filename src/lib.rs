//! Luna Heartbeat: registry self-registration for service instances
//!
//! Announces a running service instance to the Luna registry and keeps it
//! marked alive.
//!
//! ## Architecture
//!
//! - **Config**: service descriptor, registry credentials and host, timing
//! - **Registry**: instance identity, HTTP client, upsert-or-create state machine
//! - **Heartbeat**: scheduler that repeats the registration cycle on an interval
//! - **API**: small status server answering on the advertised instance URL

pub mod api;
pub mod config;
pub mod registry;

pub use config::{AppConfig, CliArgs, ConfigError, Credentials, ServiceDescriptor};

pub use registry::{
    HeartbeatConfig, HeartbeatScheduler, InstanceIdentity, InstanceRecord, RegistrationError,
    RegistrationState, RegistrationStatus, Registry, RegistryClient, RegistryConfig,
    RegistryError, StatusHandle,
};
