use std::future::Future;
use std::pin::Pin;

use bounce_core::RemoteEventRecord;
use reqwest::header::CONTENT_TYPE;
use serde_json::Value;

pub type BoxFuture<T> = Pin<Box<dyn Future<Output = T> + Send + 'static>>;

#[derive(Debug)]
pub enum TransportError {
    /// The request never produced a response (connection refused, timeout, ...)
    Request(String),
    /// The endpoint answered with a non-success status
    Status(u16),
    /// The response body was not the expected JSON
    Decode(String),
}

impl std::fmt::Display for TransportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TransportError::Request(e) => write!(f, "request failed: {}", e),
            TransportError::Status(code) => write!(f, "endpoint returned HTTP {}", code),
            TransportError::Decode(e) => write!(f, "invalid response body: {}", e),
        }
    }
}

impl std::error::Error for TransportError {}

/// The remote event log. Every call returns an owned future so it can be
/// handed to `tokio::spawn` and left to finish in the background.
pub trait Transport: Send + Sync {
    /// POST one `{type, data, timestamp}` body.
    fn post_event(&self, body: String) -> BoxFuture<Result<Value, TransportError>>;

    /// POST the whole local batch, verbatim.
    fn post_batch(&self, body: String) -> BoxFuture<Result<Value, TransportError>>;

    /// GET every record the remote side holds.
    fn fetch_snapshot(&self) -> BoxFuture<Result<Vec<RemoteEventRecord>, TransportError>>;
}

/// Endpoint paths relative to the base URL.
#[derive(Debug, Clone)]
pub struct Endpoints {
    pub event: String,
    pub batch: String,
    pub snapshot: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            event: "/api/events".to_string(),
            batch: "/api/events/batch".to_string(),
            snapshot: "/api/events".to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
    base_url: String,
    endpoints: Endpoints,
}

impl HttpTransport {
    pub fn new(base_url: &str, endpoints: Endpoints) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            endpoints,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn post_json(&self, path: &str, body: String) -> BoxFuture<Result<Value, TransportError>> {
        let request = self
            .client
            .post(self.url(path))
            .header(CONTENT_TYPE, "application/json")
            .body(body);
        Box::pin(async move {
            let resp = request
                .send()
                .await
                .map_err(|e| TransportError::Request(e.to_string()))?;
            let status = resp.status();
            if !status.is_success() {
                return Err(TransportError::Status(status.as_u16()));
            }
            resp.json::<Value>()
                .await
                .map_err(|e| TransportError::Decode(e.to_string()))
        })
    }
}

impl Transport for HttpTransport {
    fn post_event(&self, body: String) -> BoxFuture<Result<Value, TransportError>> {
        self.post_json(&self.endpoints.event, body)
    }

    fn post_batch(&self, body: String) -> BoxFuture<Result<Value, TransportError>> {
        self.post_json(&self.endpoints.batch, body)
    }

    fn fetch_snapshot(&self) -> BoxFuture<Result<Vec<RemoteEventRecord>, TransportError>> {
        let request = self.client.get(self.url(&self.endpoints.snapshot));
        Box::pin(async move {
            let resp = request
                .send()
                .await
                .map_err(|e| TransportError::Request(e.to_string()))?;
            let status = resp.status();
            if !status.is_success() {
                return Err(TransportError::Status(status.as_u16()));
            }
            resp.json::<Vec<RemoteEventRecord>>()
                .await
                .map_err(|e| TransportError::Decode(e.to_string()))
        })
    }
}
