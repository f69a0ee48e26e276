use std::fs;
use std::path::PathBuf;
use std::sync::{Mutex, MutexGuard};

use bounce_core::Event;
use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Body of a single-event write
#[derive(Debug, Deserialize)]
pub struct IncomingEvent {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub data: Value,
    #[serde(default)]
    pub timestamp: String,
}

impl From<Event> for IncomingEvent {
    fn from(e: Event) -> Self {
        Self {
            kind: e.kind,
            data: serde_json::to_value(e.data).unwrap_or(Value::Null),
            timestamp: e.local_timestamp,
        }
    }
}

/// What the sink keeps and serves back from the snapshot endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredRecord {
    pub id: u64,
    #[serde(rename = "type")]
    pub kind: String,
    pub data: Value,
    pub timestamp: String,
    #[serde(rename = "serverTimestamp")]
    pub server_timestamp: String,
}

/// Append-only event log, optionally mirrored to a JSON file.
pub struct EventStore {
    records: Mutex<Vec<StoredRecord>>,
    snapshot_path: Option<PathBuf>,
}

impl EventStore {
    pub fn in_memory() -> Self {
        Self {
            records: Mutex::new(Vec::new()),
            snapshot_path: None,
        }
    }

    /// Load the snapshot file if it exists; later writes go back to it.
    pub fn open(path: PathBuf) -> Result<Self, Box<dyn std::error::Error>> {
        let records = match fs::read_to_string(&path) {
            Ok(raw) => serde_json::from_str(&raw)
                .map_err(|e| format!("Error parsing snapshot '{}': {}", path.display(), e))?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Vec::new(),
            Err(e) => return Err(format!("Error reading snapshot '{}': {}", path.display(), e).into()),
        };
        tracing::info!("Loaded {} events from {}", records.len(), path.display());
        Ok(Self {
            records: Mutex::new(records),
            snapshot_path: Some(path),
        })
    }

    fn lock(&self) -> MutexGuard<'_, Vec<StoredRecord>> {
        self.records.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Store `events` under fresh sequential ids. Returns how many were stored.
    ///
    /// When the snapshot file cannot be written the new records are dropped
    /// again, so memory never holds more than the file.
    pub fn append(&self, events: Vec<IncomingEvent>) -> Result<usize, String> {
        let server_timestamp = Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true);
        let mut records = self.lock();
        let previous_len = records.len();
        let count = events.len();
        for event in events {
            let id = records.len() as u64 + 1;
            records.push(StoredRecord {
                id,
                kind: event.kind,
                data: event.data,
                timestamp: event.timestamp,
                server_timestamp: server_timestamp.clone(),
            });
        }

        if let Err(e) = self.persist(&records) {
            records.truncate(previous_len);
            return Err(e);
        }
        Ok(count)
    }

    fn persist(&self, records: &[StoredRecord]) -> Result<(), String> {
        let Some(path) = &self.snapshot_path else {
            return Ok(());
        };
        let json = serde_json::to_vec_pretty(records).map_err(|e| e.to_string())?;
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, json).map_err(|e| format!("Error writing snapshot: {}", e))?;
        fs::rename(&tmp, path).map_err(|e| format!("Error replacing snapshot: {}", e))?;
        Ok(())
    }

    pub fn snapshot(&self) -> Vec<StoredRecord> {
        self.lock().clone()
    }
}
