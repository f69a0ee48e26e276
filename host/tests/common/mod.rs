// In-memory stand-in for the remote event log
#![allow(dead_code)]

use std::sync::Mutex;

use bounce_core::RemoteEventRecord;
use host::transport::{BoxFuture, Transport, TransportError};
use serde_json::{json, Value};

#[derive(Default)]
pub struct MockTransport {
    /// Reply with HTTP 500 to every write
    pub fail_writes: bool,
    /// `None` makes the snapshot read fail
    pub snapshot: Option<Vec<RemoteEventRecord>>,
    pub events: Mutex<Vec<Value>>,
    pub batches: Mutex<Vec<String>>,
}

impl MockTransport {
    pub fn ok() -> Self {
        Self {
            snapshot: Some(Vec::new()),
            ..Self::default()
        }
    }

    pub fn failing() -> Self {
        Self {
            fail_writes: true,
            ..Self::default()
        }
    }

    pub fn event_types(&self) -> Vec<String> {
        self.events
            .lock()
            .unwrap()
            .iter()
            .map(|e| e["type"].as_str().unwrap_or_default().to_string())
            .collect()
    }

    fn reply(&self) -> BoxFuture<Result<Value, TransportError>> {
        let fail = self.fail_writes;
        Box::pin(async move {
            if fail {
                Err(TransportError::Status(500))
            } else {
                Ok(json!({ "success": true }))
            }
        })
    }
}

impl Transport for MockTransport {
    fn post_event(&self, body: String) -> BoxFuture<Result<Value, TransportError>> {
        let value: Value = serde_json::from_str(&body).expect("event body is JSON");
        self.events.lock().unwrap().push(value);
        self.reply()
    }

    fn post_batch(&self, body: String) -> BoxFuture<Result<Value, TransportError>> {
        self.batches.lock().unwrap().push(body);
        self.reply()
    }

    fn fetch_snapshot(&self) -> BoxFuture<Result<Vec<RemoteEventRecord>, TransportError>> {
        let snapshot = self.snapshot.clone();
        Box::pin(async move { snapshot.ok_or_else(|| TransportError::Request("connection refused".to_string())) })
    }
}
