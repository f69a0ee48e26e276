use std::future::Future;
use std::sync::Arc;

use bounce_core::constants::{EVENTS_KEY, RESET_EVENT_TYPE};
use bounce_core::report::{format_local, format_remote};
use bounce_core::{Event, Journal, Motion, OutboundEvent, ResetNotice};
use serde_json::Value;
use tokio::task::JoinHandle;

use crate::storage::LocalStore;
use crate::transport::{Transport, TransportError};
use crate::{now_iso, BoxError};

/// Handle to a background remote write. Dropping it detaches the task; the
/// write still completes.
pub type Delivery = JoinHandle<Result<Value, TransportError>>;

/// Text blocks for the comparison view.
#[derive(Debug, Clone, PartialEq)]
pub struct Comparison {
    pub local: String,
    /// `None` when the remote snapshot could not be read
    pub remote: Option<String>,
}

/// Records animation events into the local batch and mirrors them to the
/// remote log without waiting for it.
///
/// Remote writes are spawned onto the current Tokio runtime, so every method
/// that writes must be called from inside one.
pub struct EventLogger<S: LocalStore> {
    store: S,
    transport: Arc<dyn Transport>,
    in_flight: Vec<Delivery>,
    last_label: Option<String>,
}

impl<S: LocalStore> EventLogger<S> {
    pub fn new(store: S, transport: Arc<dyn Transport>) -> Self {
        Self {
            store,
            transport,
            in_flight: Vec::new(),
            last_label: None,
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// The most recent message recorded, as shown to the user.
    pub fn last_label(&self) -> Option<&str> {
        self.last_label.as_deref()
    }

    /// Current local batch. A missing or unreadable value reads as empty.
    pub fn events(&self) -> Vec<Event> {
        match self.store.get(EVENTS_KEY) {
            Ok(Some(raw)) => serde_json::from_str(&raw).unwrap_or_else(|e| {
                tracing::warn!("Discarding unreadable local events: {}", e);
                Vec::new()
            }),
            Ok(None) => Vec::new(),
            Err(e) => {
                tracing::warn!("Error reading local events: {}", e);
                Vec::new()
            }
        }
    }

    /// Append `label` to the local batch and fire a remote write for it.
    pub fn record(&mut self, label: &str, motion: Motion) -> Result<Delivery, BoxError> {
        let timestamp = now_iso();
        let body = serde_json::to_string(&OutboundEvent {
            kind: label,
            data: &motion,
            timestamp: timestamp.clone(),
        })?;
        let delivery = dispatch("event log", self.transport.post_event(body));

        let mut events = self.events();
        let id = Event::next_id(events.len())
            .ok_or_else(|| format!("Local batch is full ({} events)", events.len()))?;
        events.push(Event {
            id,
            kind: label.to_string(),
            data: motion,
            local_timestamp: timestamp,
        });
        self.store.set(EVENTS_KEY, &serde_json::to_string(&events)?)?;
        self.last_label = Some(label.to_string());

        tracing::debug!(id, label, "Recorded event");
        Ok(delivery)
    }

    /// Wipe the local batch for a new game and tell the remote log.
    pub fn reset(&mut self) -> Result<Delivery, BoxError> {
        let body = serde_json::to_string(&OutboundEvent {
            kind: RESET_EVENT_TYPE,
            data: &ResetNotice::reset(),
            timestamp: now_iso(),
        })?;
        let delivery = dispatch("reset notice", self.transport.post_event(body));
        self.store.remove(EVENTS_KEY)?;
        tracing::info!("Local events cleared for a new game");
        Ok(delivery)
    }

    /// Send the whole local batch in one request and clear it.
    ///
    /// The batch is cleared as soon as the request is dispatched, whatever
    /// the response turns out to be. Returns `None` when there is nothing
    /// stored.
    pub fn flush_to_remote(&mut self) -> Result<Option<Delivery>, BoxError> {
        let Some(raw) = self.store.get(EVENTS_KEY)? else {
            return Ok(None);
        };
        let count = serde_json::from_str::<Vec<Event>>(&raw).map(|v| v.len()).unwrap_or(0);
        if count == 0 {
            return Ok(None);
        }

        tracing::info!("Sending {} stored events", count);
        let delivery = dispatch("batch flush", self.transport.post_batch(raw));
        self.store.remove(EVENTS_KEY)?;
        Ok(Some(delivery))
    }

    /// Render the local batch and the remote snapshot side by side.
    pub async fn render_comparison(&self) -> Comparison {
        let local = format_local(&self.events());
        let remote = match self.transport.fetch_snapshot().await {
            Ok(records) => Some(format_remote(&records)),
            Err(e) => {
                tracing::error!("Error fetching server data: {}", e);
                None
            }
        };
        Comparison { local, remote }
    }

    /// Keep a delivery so [`settle`](Self::settle) waits for it. Handles are
    /// held until `settle` has counted their outcome, finished or not.
    pub fn track(&mut self, delivery: Delivery) {
        self.in_flight.push(delivery);
    }

    /// Wait for every tracked delivery. Returns `(delivered, failed)`.
    pub async fn settle(&mut self) -> (usize, usize) {
        let mut delivered = 0;
        let mut failed = 0;
        for delivery in self.in_flight.drain(..) {
            match delivery.await {
                Ok(Ok(_)) => delivered += 1,
                _ => failed += 1,
            }
        }
        (delivered, failed)
    }
}

impl<S: LocalStore> Journal for EventLogger<S> {
    fn note(&mut self, label: &str, motion: Motion) {
        match self.record(label, motion) {
            Ok(delivery) => self.track(delivery),
            Err(e) => tracing::error!("Error recording '{}': {}", label, e),
        }
    }
}

fn dispatch<F>(what: &'static str, request: F) -> Delivery
where
    F: Future<Output = Result<Value, TransportError>> + Send + 'static,
{
    tokio::spawn(async move {
        let result = request.await;
        match &result {
            Ok(reply) => tracing::debug!("{} acknowledged: {}", what, reply),
            Err(e) => tracing::error!("{} failed: {}", what, e),
        }
        result
    })
}
