//! Status API Regression Tests
//!
//! In-process tests that build the Axum app via `create_app()` and exercise
//! the status endpoints using `tower::ServiceExt::oneshot()`.
//! No binary spawn, no network port.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use luna_heartbeat::api::{create_app, StatusState};
use luna_heartbeat::config::ServiceDescriptor;
use luna_heartbeat::registry::{
    HeartbeatScheduler, InstanceIdentity, InstanceRecord, Registry, RegistryError, StatusHandle,
    UpsertOutcome,
};
use tokio_util::sync::CancellationToken;
use tower::ServiceExt;

/// Registry that already knows every instance.
struct KnownInstances;

#[async_trait::async_trait]
impl Registry for KnownInstances {
    async fn upsert(&self, _record: &InstanceRecord) -> Result<UpsertOutcome, RegistryError> {
        Ok(UpsertOutcome::Updated)
    }

    async fn create(&self, _record: &InstanceRecord) -> Result<(), RegistryError> {
        Ok(())
    }
}

fn identity() -> InstanceIdentity {
    let descriptor = ServiceDescriptor {
        name: "todo-svc".to_string(),
        description: "Todo list backend".to_string(),
        version: "1.2.0".to_string(),
    };
    InstanceIdentity::new(&descriptor, "localhost", 4000)
}

async fn get_json(state: StatusState, uri: &str) -> (StatusCode, serde_json::Value) {
    let resp = create_app(state)
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = resp.status();
    let body = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&body).unwrap())
}

#[tokio::test]
async fn test_health_returns_ok() {
    let state = StatusState::new(StatusHandle::new("todo-svc:localhost:4000"));
    let (status, json) = get_json(state, "/health").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "OK");
    assert_eq!(json["instance_id"], "todo-svc:localhost:4000");
    assert_eq!(json["registration_state"], "idle");
}

#[tokio::test]
async fn test_registration_reflects_heartbeats() {
    let scheduler = HeartbeatScheduler::new(
        Arc::new(KnownInstances),
        identity(),
        luna_heartbeat::registry::HeartbeatConfig::default(),
    );
    let status = scheduler.status();

    // First cycle is immediate; cancel right after it.
    let cancel = CancellationToken::new();
    let handle = scheduler.spawn(cancel.clone());
    for _ in 0..100 {
        if status.snapshot().await.heartbeats > 0 {
            break;
        }
        tokio::time::sleep(std::time::Duration::from_millis(10)).await;
    }
    cancel.cancel();
    handle.await.unwrap().unwrap();

    let (code, json) = get_json(StatusState::new(status), "/api/v1/registration").await;
    assert_eq!(code, StatusCode::OK);
    assert_eq!(json["instance_id"], "todo-svc:localhost:4000");
    assert_eq!(json["state"], "heartbeated");
    assert_eq!(json["heartbeats"], 1);
    assert_eq!(json["registrations"], 0);
    assert!(json["last_success"].is_string());
    assert!(json["last_error"].is_null());
}

#[tokio::test]
async fn test_unknown_route_is_404() {
    let state = StatusState::new(StatusHandle::new("todo-svc:localhost:4000"));
    let resp = create_app(state)
        .oneshot(Request::builder().uri("/api/v1/nope").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}
