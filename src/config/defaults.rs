//! System-wide default constants.
//!
//! Centralises the values the heartbeat agent falls back to when the
//! environment and CLI leave a setting unset.

// ============================================================================
// Service Descriptor
// ============================================================================

/// Descriptor file read when `CONFIG_PATH` is not set.
pub const DESCRIPTOR_PATH: &str = "service.json";

// ============================================================================
// Instance Address
// ============================================================================

/// Host advertised to the registry as part of the instance id and URL.
pub const INSTANCE_HOST: &str = "localhost";

/// Port advertised to the registry as part of the instance id and URL.
pub const INSTANCE_PORT: u16 = 4000;

// ============================================================================
// Registry Client
// ============================================================================

/// URL scheme used to reach the registry.
pub const REGISTRY_SCHEME: &str = "http";

/// Path prefix of the registry's instance collection.
pub const REGISTRY_INSTANCES_PATH: [&str; 3] = ["registry", "v1", "instances"];

/// Content type declared on every registry request body.
pub const REGISTRY_CONTENT_TYPE: &str = "application/json; charset=utf-8";

/// Whole-request timeout for registry calls (seconds).
pub const REGISTRY_HTTP_TIMEOUT_SECS: u64 = 10;

/// TCP connect timeout for registry calls (seconds).
pub const REGISTRY_CONNECT_TIMEOUT_SECS: u64 = 5;

/// Maximum number of response-body bytes kept in a protocol error.
pub const REGISTRY_ERROR_BODY_PREVIEW: usize = 256;

// ============================================================================
// Heartbeat Scheduler
// ============================================================================

/// Interval between registration/heartbeat cycles (seconds).
pub const HEARTBEAT_INTERVAL_SECS: u64 = 15;

/// In-tick retries of transport failures. 0 keeps the fail-fast behaviour.
pub const HEARTBEAT_MAX_RETRIES: u32 = 0;

/// Base delay for in-tick retry backoff (milliseconds).
pub const HEARTBEAT_RETRY_BASE_DELAY_MS: u64 = 500;

/// Cap on a single retry backoff (seconds).
pub const MAX_RETRY_BACKOFF_SECS: u64 = 10;

/// Maximum exponent for retry backoff (2^N multiplier).
pub const MAX_RETRY_BACKOFF_EXPONENT: u32 = 5;

/// Random jitter added to each retry backoff (milliseconds).
pub const RETRY_JITTER_MS: u64 = 250;

// ============================================================================
// Status Server
// ============================================================================

/// Status server bind address. Kept off the advertised instance port, which
/// belongs to the service being announced.
pub const STATUS_ADDR: &str = "0.0.0.0:9464";
