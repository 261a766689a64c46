//! Startup Configuration
//!
//! Everything the heartbeat agent needs is resolved once, before any task is
//! spawned, into an immutable [`AppConfig`].
//!
//! ## Sources
//!
//! 1. CLI flags (each with an environment fallback, see [`CliArgs`])
//! 2. `LUNA_AUTH_USER` / `LUNA_AUTH_PASS` from the environment
//! 3. The service descriptor file at `$CONFIG_PATH` (default `service.json`)
//!
//! Any missing or malformed value is a [`ConfigError`] and the process must
//! not start heartbeating.

mod cli;
mod credentials;
mod descriptor;
pub mod defaults;

pub use cli::CliArgs;
pub use credentials::{Credentials, AUTH_PASS_VAR, AUTH_USER_VAR};
pub use descriptor::{load_descriptor, ServiceDescriptor};

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use crate::registry::{HeartbeatConfig, InstanceIdentity, RegistryConfig};

/// Environment variable naming the registry host.
pub const REGISTRY_HOST_VAR: &str = "LUNA_REGISTRY_HOST";

/// Fully resolved agent configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub descriptor: ServiceDescriptor,
    pub instance_host: String,
    pub instance_port: u16,
    pub registry: RegistryConfig,
    pub heartbeat: HeartbeatConfig,
    /// `None` when the status server is disabled.
    pub status_addr: Option<SocketAddr>,
}

impl AppConfig {
    /// Resolve the configuration from parsed CLI arguments and the process
    /// environment.
    pub fn load(args: &CliArgs) -> Result<Self, ConfigError> {
        Self::from_args(args, |var| std::env::var(var).ok())
    }

    /// Resolve the configuration with credentials taken from `lookup`.
    ///
    /// Checks run in a fixed order (descriptor, credentials, registry host,
    /// numeric settings) so the first reported error is deterministic.
    pub fn from_args<F>(args: &CliArgs, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let descriptor = load_descriptor(&args.config_path)?;
        let credentials = Credentials::from_lookup(lookup)?;

        let registry_host = args
            .registry_host
            .as_deref()
            .map(str::trim)
            .filter(|host| !host.is_empty())
            .ok_or(ConfigError::MissingEnv(REGISTRY_HOST_VAR))?;

        if args.interval_secs == 0 {
            return Err(ConfigError::Invalid {
                var: "LUNA_HEARTBEAT_INTERVAL_SECS",
                reason: "must be greater than zero".to_string(),
            });
        }
        if args.http_timeout_secs == 0 {
            return Err(ConfigError::Invalid {
                var: "LUNA_HTTP_TIMEOUT_SECS",
                reason: "must be greater than zero".to_string(),
            });
        }

        let mut registry =
            RegistryConfig::new(&args.registry_scheme, registry_host, credentials);
        registry.timeout = Duration::from_secs(args.http_timeout_secs);
        registry
            .base_url()
            .map_err(|e| ConfigError::Invalid {
                var: REGISTRY_HOST_VAR,
                reason: e.to_string(),
            })?;

        let heartbeat = HeartbeatConfig {
            interval: Duration::from_secs(args.interval_secs),
            max_retries: args.max_retries,
            ..HeartbeatConfig::default()
        };

        let status_addr = if args.no_status_server {
            None
        } else {
            let raw = &args.status_addr;
            let addr = raw.parse::<SocketAddr>().map_err(|e| ConfigError::Invalid {
                var: "LUNA_STATUS_ADDR",
                reason: format!("'{}': {}", raw, e),
            })?;
            if addr.port() == args.instance_port {
                return Err(ConfigError::Invalid {
                    var: "LUNA_STATUS_ADDR",
                    reason: format!("port {} is the advertised instance port", addr.port()),
                });
            }
            Some(addr)
        };

        Ok(Self {
            descriptor,
            instance_host: args.instance_host.clone(),
            instance_port: args.instance_port,
            registry,
            heartbeat,
            status_addr,
        })
    }

    /// Identity of this instance as advertised to the registry.
    pub fn identity(&self) -> InstanceIdentity {
        InstanceIdentity::new(&self.descriptor, &self.instance_host, self.instance_port)
    }
}

// ============================================================================
// Error Type
// ============================================================================

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("'{0}' is required and was not found")]
    MissingEnv(&'static str),

    #[error("invalid value for '{var}': {reason}")]
    Invalid { var: &'static str, reason: String },

    #[error("config I/O error ({}): {}", .0.display(), .1)]
    Io(PathBuf, #[source] std::io::Error),

    #[error("config parse error ({}): {}", .0.display(), .1)]
    Parse(PathBuf, String),

    #[error("descriptor field '{0}' must not be empty")]
    EmptyField(&'static str),
}
