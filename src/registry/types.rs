//! Registry data types
//!
//! [`InstanceRecord`] is the only entity sent over the wire. It is rebuilt
//! from the immutable [`InstanceIdentity`] before every registry call.

use serde::{Deserialize, Serialize};

use crate::config::ServiceDescriptor;

/// Health status reported with each heartbeat.
///
/// Only `OK` exists today; there is no health-check integration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum InstanceStatus {
    #[default]
    #[serde(rename = "OK")]
    Ok,
}

/// Load-balancing hints for the registry.
///
/// Always empty for now and serialized as `{}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BalancerOptions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight: Option<u32>,
}

/// Body of every upsert and create request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InstanceRecord {
    pub instance_id: String,
    pub name: String,
    pub description: String,
    pub version: String,
    pub status: InstanceStatus,
    pub balancer_options: BalancerOptions,
    pub url: String,
}

/// Derive the registry key for an instance: `{name}:{host}:{port}`.
pub fn derive_instance_id(descriptor: &ServiceDescriptor, host: &str, port: u16) -> String {
    format!("{}:{}:{}", descriptor.name, host, port)
}

/// Immutable identity of this running instance.
///
/// The instance id and URL are computed once here, so every heartbeat of the
/// process targets the same registry resource.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstanceIdentity {
    descriptor: ServiceDescriptor,
    instance_id: String,
    url: String,
}

impl InstanceIdentity {
    pub fn new(descriptor: &ServiceDescriptor, host: &str, port: u16) -> Self {
        Self {
            descriptor: descriptor.clone(),
            instance_id: derive_instance_id(descriptor, host, port),
            url: format!("http://{}:{}", host, port),
        }
    }

    pub fn instance_id(&self) -> &str {
        &self.instance_id
    }

    /// Externally reachable base URL of this instance.
    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn descriptor(&self) -> &ServiceDescriptor {
        &self.descriptor
    }

    /// Build a fresh record for one registry call.
    pub fn record(&self) -> InstanceRecord {
        InstanceRecord {
            instance_id: self.instance_id.clone(),
            name: self.descriptor.name.clone(),
            description: self.descriptor.description.clone(),
            version: self.descriptor.version.clone(),
            status: InstanceStatus::Ok,
            balancer_options: BalancerOptions::default(),
            url: self.url.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn todo_descriptor() -> ServiceDescriptor {
        ServiceDescriptor {
            name: "todo-svc".to_string(),
            description: "x".to_string(),
            version: "1.0".to_string(),
        }
    }

    #[test]
    fn test_instance_id_format() {
        let id = derive_instance_id(&todo_descriptor(), "localhost", 4000);
        assert_eq!(id, "todo-svc:localhost:4000");
    }

    #[test]
    fn test_instance_id_deterministic() {
        let descriptor = todo_descriptor();
        let first = derive_instance_id(&descriptor, "10.0.0.7", 8080);
        for _ in 0..10 {
            assert_eq!(derive_instance_id(&descriptor, "10.0.0.7", 8080), first);
        }
    }

    #[test]
    fn test_record_matches_identity() {
        let identity = InstanceIdentity::new(&todo_descriptor(), "localhost", 4000);
        let record = identity.record();

        assert_eq!(record.instance_id, "todo-svc:localhost:4000");
        assert_eq!(record.url, "http://localhost:4000");
        assert_eq!(record.status, InstanceStatus::Ok);
        assert_eq!(record, identity.record());
    }

    #[test]
    fn test_record_wire_format() {
        let identity = InstanceIdentity::new(&todo_descriptor(), "localhost", 4000);
        let value = serde_json::to_value(identity.record()).unwrap();

        assert_eq!(
            value,
            serde_json::json!({
                "instanceId": "todo-svc:localhost:4000",
                "name": "todo-svc",
                "description": "x",
                "version": "1.0",
                "status": "OK",
                "balancerOptions": {},
                "url": "http://localhost:4000",
            })
        );
    }

    #[test]
    fn test_serialized_body_contains_status_ok() {
        let identity = InstanceIdentity::new(&todo_descriptor(), "localhost", 4000);
        let body = serde_json::to_string(&identity.record()).unwrap();
        assert!(body.contains(r#""status":"OK""#));
    }
}
