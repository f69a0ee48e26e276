//! Plain-text rendering of local and remote records for the comparison view.

use crate::{Event, RemoteEventRecord};

fn component(v: Option<f64>) -> String {
    match v {
        Some(v) => v.to_string(),
        None => "undefined".to_string(),
    }
}

pub fn format_local(events: &[Event]) -> String {
    events
        .iter()
        .map(|e| {
            format!(
                "Event ID: {}\nType: {}\nDX: {}\nDY: {}\nLocal Timestamp: {}\n\n",
                e.id,
                e.kind,
                component(e.data.dx),
                component(e.data.dy),
                e.local_timestamp
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn format_remote(records: &[RemoteEventRecord]) -> String {
    records
        .iter()
        .map(|r| {
            format!(
                "Event ID: {}\nType: {}\nDX: {}\nDY: {}\nTimestamp: {}\nServer Timestamp: {}\n\n",
                r.id,
                r.kind,
                component(r.data.dx),
                component(r.data.dy),
                r.timestamp,
                r.server_timestamp
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}
