//! Scripted in-process transport

use std::collections::HashMap;
use std::time::Duration;

use aw_client::{Transport, TransportError};
use parking_lot::Mutex;
use tracing::debug;

/// A request as seen by the transport
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedRequest {
    pub endpoint: String,
    pub operation: String,
    pub body: Vec<u8>,
}

#[derive(Debug, Clone)]
enum Script {
    Respond(Vec<u8>),
    Fail(String),
}

/// Transport answering from canned responses keyed by operation
///
/// A response scripted for an `(endpoint, operation)` pair takes precedence
/// over one scripted for the operation alone. Unscripted calls fail.
#[derive(Debug, Default)]
pub struct ScriptedTransport {
    by_operation: Mutex<HashMap<String, Script>>,
    by_endpoint: Mutex<HashMap<(String, String), Script>>,
    log: Mutex<Vec<RecordedRequest>>,
    latency: Option<Duration>,
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Delay every response by `latency`
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    /// Answer `operation` on any endpoint with `response`
    pub fn respond(&self, operation: &str, response: impl Into<Vec<u8>>) {
        self.by_operation
            .lock()
            .insert(operation.to_string(), Script::Respond(response.into()));
    }

    /// Answer `operation` on `endpoint` with `response`
    pub fn respond_to(&self, endpoint: &str, operation: &str, response: impl Into<Vec<u8>>) {
        self.by_endpoint.lock().insert(
            (endpoint.to_string(), operation.to_string()),
            Script::Respond(response.into()),
        );
    }

    /// Fail `operation` on any endpoint with `message`
    pub fn fail(&self, operation: &str, message: &str) {
        self.by_operation
            .lock()
            .insert(operation.to_string(), Script::Fail(message.to_string()));
    }

    /// Total calls received
    pub fn calls(&self) -> usize {
        self.log.lock().len()
    }

    /// Calls received for `operation`
    pub fn calls_for(&self, operation: &str) -> usize {
        self.log
            .lock()
            .iter()
            .filter(|r| r.operation == operation)
            .count()
    }

    /// Every request received, in arrival order
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.log.lock().clone()
    }

    fn script_for(&self, endpoint: &str, operation: &str) -> Option<Script> {
        let key = (endpoint.to_string(), operation.to_string());
        if let Some(script) = self.by_endpoint.lock().get(&key) {
            return Some(script.clone());
        }
        self.by_operation.lock().get(operation).cloned()
    }
}

impl Transport for ScriptedTransport {
    async fn request(
        &self,
        endpoint: &str,
        operation: &str,
        body: Vec<u8>,
    ) -> Result<Vec<u8>, TransportError> {
        debug!("Scripted call {} on {} ({} bytes)", operation, endpoint, body.len());
        self.log.lock().push(RecordedRequest {
            endpoint: endpoint.to_string(),
            operation: operation.to_string(),
            body,
        });

        let script = self.script_for(endpoint, operation);

        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }

        match script {
            Some(Script::Respond(payload)) => Ok(payload),
            Some(Script::Fail(message)) => Err(TransportError::new(message)),
            None => Err(TransportError::new(format!(
                "no scripted response for {operation} on {endpoint}"
            ))),
        }
    }
}
