//! Scripted in-memory registry for unit tests

use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;

use super::client::{Registry, RegistryError, UpsertOutcome};
use super::types::{InstanceIdentity, InstanceRecord};
use crate::config::ServiceDescriptor;

/// One scripted registry answer.
#[derive(Debug, Clone, Copy)]
pub enum Reply {
    Updated,
    NotFound,
    Created,
    Status(StatusCode),
    Unreachable,
    /// Answer `Updated` after the given delay.
    Delayed(Duration),
    /// Never answer.
    Hang,
}

/// Replays scripted replies in order and records every call.
///
/// When a script runs dry, upserts answer `Updated` and creates answer
/// `Created`.
#[derive(Debug, Default)]
pub struct ScriptedRegistry {
    upserts: Mutex<VecDeque<Reply>>,
    creates: Mutex<VecDeque<Reply>>,
    upsert_calls: Mutex<usize>,
    create_calls: Mutex<usize>,
    seen: Mutex<Vec<String>>,
    in_flight: Mutex<usize>,
    max_in_flight: Mutex<usize>,
}

impl ScriptedRegistry {
    pub fn new(upserts: Vec<Reply>, creates: Vec<Reply>) -> Self {
        Self {
            upserts: Mutex::new(upserts.into()),
            creates: Mutex::new(creates.into()),
            ..Self::default()
        }
    }

    pub fn upsert_calls(&self) -> usize {
        *self.upsert_calls.lock().unwrap()
    }

    pub fn create_calls(&self) -> usize {
        *self.create_calls.lock().unwrap()
    }

    pub fn seen_instance_ids(&self) -> Vec<String> {
        self.seen.lock().unwrap().clone()
    }

    /// Highest number of upserts that were ever running at the same time.
    pub fn max_in_flight(&self) -> usize {
        *self.max_in_flight.lock().unwrap()
    }

    fn note(&self, record: &InstanceRecord) {
        self.seen.lock().unwrap().push(record.instance_id.clone());
    }

    fn enter(&self) {
        let mut in_flight = self.in_flight.lock().unwrap();
        *in_flight += 1;
        let mut max = self.max_in_flight.lock().unwrap();
        *max = (*max).max(*in_flight);
    }

    fn leave(&self) {
        *self.in_flight.lock().unwrap() -= 1;
    }
}

#[async_trait]
impl Registry for ScriptedRegistry {
    async fn upsert(&self, record: &InstanceRecord) -> Result<UpsertOutcome, RegistryError> {
        self.note(record);
        *self.upsert_calls.lock().unwrap() += 1;
        let reply = self.upserts.lock().unwrap().pop_front().unwrap_or(Reply::Updated);
        self.enter();
        let result = match reply {
            Reply::Updated | Reply::Created => Ok(UpsertOutcome::Updated),
            Reply::NotFound => Ok(UpsertOutcome::NotFound),
            Reply::Status(status) => Err(protocol(status)),
            Reply::Unreachable => Err(transport_error()),
            Reply::Delayed(delay) => {
                tokio::time::sleep(delay).await;
                Ok(UpsertOutcome::Updated)
            }
            Reply::Hang => std::future::pending().await,
        };
        self.leave();
        result
    }

    async fn create(&self, record: &InstanceRecord) -> Result<(), RegistryError> {
        self.note(record);
        *self.create_calls.lock().unwrap() += 1;
        let reply = self.creates.lock().unwrap().pop_front().unwrap_or(Reply::Created);
        match reply {
            Reply::Created => Ok(()),
            Reply::Updated => Err(protocol(StatusCode::OK)),
            Reply::NotFound => Err(protocol(StatusCode::NOT_FOUND)),
            Reply::Status(status) => Err(protocol(status)),
            Reply::Unreachable => Err(transport_error()),
            Reply::Delayed(delay) => {
                tokio::time::sleep(delay).await;
                Ok(())
            }
            Reply::Hang => std::future::pending().await,
        }
    }
}

fn protocol(status: StatusCode) -> RegistryError {
    RegistryError::Protocol {
        status,
        body: String::new(),
    }
}

/// A real `reqwest::Error`, produced without touching the network.
pub fn transport_error() -> RegistryError {
    let err = reqwest::Client::new()
        .get("not a url")
        .build()
        .unwrap_err();
    RegistryError::Transport(err)
}

pub fn identity() -> InstanceIdentity {
    let descriptor = ServiceDescriptor {
        name: "todo-svc".to_string(),
        description: "x".to_string(),
        version: "1.0".to_string(),
    };
    InstanceIdentity::new(&descriptor, "localhost", 4000)
}
