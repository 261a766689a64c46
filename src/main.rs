//! Luna Heartbeat - registry self-registration agent
//!
//! Registers this service instance with the Luna registry, then keeps
//! heartbeating until shutdown or until the registry answers unexpectedly.
//!
//! # Usage
//!
//! ```bash
//! LUNA_AUTH_USER=svc LUNA_AUTH_PASS=secret LUNA_REGISTRY_HOST=registry:8080 \
//!     ./luna-heartbeat --config-path service.json
//! ```
//!
//! # Environment Variables
//!
//! - `LUNA_AUTH_USER` / `LUNA_AUTH_PASS`: registry credentials (required)
//! - `LUNA_REGISTRY_HOST`: registry `host[:port]` (required)
//! - `CONFIG_PATH`: service descriptor path (default: service.json)
//! - `RUST_LOG`: Logging level (default: info)
//!
//! A `.env` file in the working directory is loaded first, if present.

use anyhow::{Context, Result};
use clap::Parser;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

use luna_heartbeat::api::{self, StatusState};
use luna_heartbeat::config::{AppConfig, CliArgs};
use luna_heartbeat::registry::{HeartbeatScheduler, RegistryClient, StatusHandle};

// ============================================================================
// Task Names
// ============================================================================

#[derive(Debug, Clone, Copy)]
enum TaskName {
    Heartbeat,
    StatusServer,
}

impl std::fmt::Display for TaskName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TaskName::Heartbeat => write!(f, "Heartbeat"),
            TaskName::StatusServer => write!(f, "StatusServer"),
        }
    }
}

// ============================================================================
// Task Spawning
// ============================================================================

/// Spawn the heartbeat scheduler into the JoinSet.
fn spawn_heartbeat(
    task_set: &mut JoinSet<Result<TaskName>>,
    scheduler: HeartbeatScheduler<RegistryClient>,
    cancel_token: CancellationToken,
) {
    task_set.spawn(async move {
        info!("[Heartbeat] Task starting");

        match scheduler.run(cancel_token).await {
            Ok(cycles) => {
                info!(cycles, "[Heartbeat] Stopped");
                Ok(TaskName::Heartbeat)
            }
            Err(e) => Err(anyhow::Error::new(e).context("[Heartbeat] registration failed")),
        }
    });
}

/// Spawn the status server task into the JoinSet.
fn spawn_status_server(
    task_set: &mut JoinSet<Result<TaskName>>,
    listener: tokio::net::TcpListener,
    status: StatusHandle,
    cancel_token: CancellationToken,
) {
    let app = api::create_app(StatusState::new(status));

    task_set.spawn(async move {
        info!("[StatusServer] Task starting");

        let result = axum::serve(listener, app)
            .with_graceful_shutdown(async move {
                cancel_token.cancelled().await;
                info!("[StatusServer] Received shutdown signal");
            })
            .await;

        match result {
            Ok(()) => {
                info!("[StatusServer] Graceful shutdown complete");
                Ok(TaskName::StatusServer)
            }
            Err(e) => Err(anyhow::anyhow!("[StatusServer] server error: {}", e)),
        }
    });
}

/// Run the supervisor loop: monitor tasks, cancel on failure.
///
/// The status server only exists to serve the registered instance, so a
/// heartbeat that ends normally also stops it.
async fn run_supervisor(
    task_set: &mut JoinSet<Result<TaskName>>,
    cancel_token: CancellationToken,
) -> Result<()> {
    info!("Supervisor: all tasks spawned, monitoring...");

    loop {
        tokio::select! {
            _ = cancel_token.cancelled() => {
                info!("Supervisor: shutdown signal received");
                break;
            }
            result = task_set.join_next() => {
                match result {
                    Some(Ok(Ok(task_name))) => {
                        info!("Supervisor: task {} completed normally", task_name);
                        if matches!(task_name, TaskName::Heartbeat) {
                            cancel_token.cancel();
                        }
                    }
                    Some(Ok(Err(e))) => {
                        error!("Supervisor: task failed with error: {:#}", e);
                        cancel_token.cancel();
                        return Err(e);
                    }
                    Some(Err(e)) => {
                        error!("Supervisor: task panicked: {}", e);
                        cancel_token.cancel();
                        return Err(anyhow::anyhow!("Task panicked: {}", e));
                    }
                    None => {
                        info!("Supervisor: all tasks completed");
                        break;
                    }
                }
            }
        }
    }

    // Drain remaining tasks so the status server finishes its graceful shutdown.
    while let Some(result) = task_set.join_next().await {
        match result {
            Ok(Ok(task_name)) => info!("Supervisor: task {} stopped", task_name),
            Ok(Err(e)) => return Err(e),
            Err(e) => return Err(anyhow::anyhow!("Task panicked: {}", e)),
        }
    }

    Ok(())
}

// ============================================================================
// Logging
// ============================================================================

fn init_tracing(json: bool) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    if json {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_target(false)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .init();
    }
}

// ============================================================================
// Main Entry Point
// ============================================================================

#[tokio::main]
async fn main() -> Result<()> {
    // A missing .env file is not an error.
    dotenvy::dotenv().ok();

    let args = CliArgs::parse();
    init_tracing(args.log_json);

    let config = AppConfig::load(&args).context("invalid configuration")?;
    let identity = config.identity();

    info!(
        "Service: {} v{} | Instance: {} | Registry: {}",
        config.descriptor.name,
        config.descriptor.version,
        identity.instance_id(),
        config.registry.redacted_base()
    );

    let client = RegistryClient::new(&config.registry).context("failed to build registry client")?;
    let scheduler = HeartbeatScheduler::new(client, identity, config.heartbeat.clone());
    let status = scheduler.status();

    // Graceful shutdown via Ctrl+C
    let cancel_token = CancellationToken::new();
    let shutdown_token = cancel_token.clone();
    tokio::spawn(async move {
        tokio::signal::ctrl_c().await.ok();
        info!("Received Ctrl+C, initiating shutdown...");
        shutdown_token.cancel();
    });

    let mut task_set: JoinSet<Result<TaskName>> = JoinSet::new();

    if let Some(addr) = config.status_addr {
        let listener = tokio::net::TcpListener::bind(addr)
            .await
            .with_context(|| format!("failed to bind status server to {}", addr))?;
        info!("Status server listening on http://{}", addr);
        spawn_status_server(&mut task_set, listener, status, cancel_token.clone());
    } else {
        info!("Status server disabled");
    }

    spawn_heartbeat(&mut task_set, scheduler, cancel_token.clone());

    run_supervisor(&mut task_set, cancel_token).await?;

    info!("Luna heartbeat shutdown complete");
    Ok(())
}
