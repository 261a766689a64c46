//! Command-line arguments
//!
//! Every non-secret setting can be given as a flag or through its environment
//! variable. Credentials are environment-only and never appear here.

use std::path::PathBuf;

use clap::Parser;

use super::defaults;

#[derive(Parser, Debug, Clone)]
#[command(name = "luna-heartbeat")]
#[command(about = "Registers this service instance with the Luna registry and keeps it alive")]
#[command(version)]
pub struct CliArgs {
    /// Service descriptor file (JSON, or TOML when the extension is .toml)
    #[arg(long, env = "CONFIG_PATH", default_value = defaults::DESCRIPTOR_PATH)]
    pub config_path: PathBuf,

    /// Registry host, optionally with a port (e.g. registry.internal:8080)
    #[arg(long, env = "LUNA_REGISTRY_HOST", value_name = "HOST[:PORT]")]
    pub registry_host: Option<String>,

    /// URL scheme used to reach the registry
    #[arg(long, env = "LUNA_REGISTRY_SCHEME", default_value = defaults::REGISTRY_SCHEME)]
    pub registry_scheme: String,

    /// Host this instance advertises to the registry
    #[arg(long, env = "LUNA_INSTANCE_HOST", default_value = defaults::INSTANCE_HOST)]
    pub instance_host: String,

    /// Port this instance advertises to the registry
    #[arg(long, env = "LUNA_INSTANCE_PORT", default_value_t = defaults::INSTANCE_PORT)]
    pub instance_port: u16,

    /// Seconds between heartbeat cycles
    #[arg(long, env = "LUNA_HEARTBEAT_INTERVAL_SECS", default_value_t = defaults::HEARTBEAT_INTERVAL_SECS)]
    pub interval_secs: u64,

    /// Timeout for a single registry request, in seconds
    #[arg(long, env = "LUNA_HTTP_TIMEOUT_SECS", default_value_t = defaults::REGISTRY_HTTP_TIMEOUT_SECS)]
    pub http_timeout_secs: u64,

    /// Retries of a transport failure within one cycle before giving up (0 = fail fast)
    #[arg(long, env = "LUNA_MAX_RETRIES", default_value_t = defaults::HEARTBEAT_MAX_RETRIES)]
    pub max_retries: u32,

    /// Bind address of the status server
    #[arg(long, env = "LUNA_STATUS_ADDR", value_name = "ADDR:PORT", default_value = defaults::STATUS_ADDR)]
    pub status_addr: String,

    /// Do not start the status server
    #[arg(long)]
    pub no_status_server: bool,

    /// Emit logs as JSON lines
    #[arg(long)]
    pub log_json: bool,
}
