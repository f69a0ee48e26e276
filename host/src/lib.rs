//! Client side of bounce-log: the event logger, its local store and remote
//! transport, and the session that maps user controls onto the animation
//! controller.

pub mod config;
pub mod frame;
pub mod logger;
pub mod session;
pub mod storage;
pub mod transport;

use chrono::{SecondsFormat, Utc};

pub use config::ClientConfig;
pub use frame::FrameClock;
pub use logger::{Comparison, Delivery, EventLogger};
pub use session::{AnimationSummary, Session};
pub use storage::{FileStore, LocalStore, MemoryStore};
pub use transport::{HttpTransport, Transport, TransportError};

/// Error type for store, config and session failures.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Current UTC time as ISO-8601 with millisecond precision, e.g.
/// `2024-03-01T10:00:00.000Z`.
pub fn now_iso() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}
