pub mod constants;
pub mod controller;
pub mod physics;
pub mod report;

use serde::{Deserialize, Serialize};

pub use controller::{AnimationController, AnimationState, ControlError, Controls, Journal, Notice, StepOutcome};

/// Offset of an element's top-left corner inside its container, in pixels.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub left: f64,
    pub top: f64,
}

/// Size of the area the element bounces around in.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Container {
    pub width: f64,
    pub height: f64,
}

impl Container {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

/// Per-frame displacement. Each component's magnitude stays within
/// `MIN_SPEED..=MAX_SPEED`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Velocity {
    pub dx: f64,
    pub dy: f64,
}

/// Axis-aligned bounding box relative to the container origin.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rect {
    pub left: f64,
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
}

impl Rect {
    pub fn offset(&self, dx: f64, dy: f64) -> Self {
        Self {
            left: self.left + dx,
            top: self.top + dy,
            right: self.right + dx,
            bottom: self.bottom + dy,
        }
    }
}

/// The square that moves around the container.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MovingElement {
    pub position: Position,
    pub width: f64,
    pub height: f64,
}

impl MovingElement {
    pub fn new(position: Position) -> Self {
        Self {
            position,
            width: constants::SQUARE_SIZE,
            height: constants::SQUARE_SIZE,
        }
    }

    pub fn bounds(&self) -> Rect {
        Rect {
            left: self.position.left,
            top: self.position.top,
            right: self.position.left + self.width,
            bottom: self.position.top + self.height,
        }
    }
}

/// Velocity snapshot attached to a logged event.
///
/// Both components are absent until a velocity has been drawn, in which case
/// the JSON form is `{}`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Motion {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dx: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dy: Option<f64>,
}

impl From<Velocity> for Motion {
    fn from(v: Velocity) -> Self {
        Self {
            dx: Some(v.dx),
            dy: Some(v.dy),
        }
    }
}

impl From<Option<Velocity>> for Motion {
    fn from(v: Option<Velocity>) -> Self {
        v.map(Motion::from).unwrap_or_default()
    }
}

/// One entry of the local batch, stored under the `events` key.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Event {
    /// 1-based, sequential within the current local batch
    pub id: u32,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub data: Motion,
    #[serde(rename = "localTimestamp")]
    pub local_timestamp: String,
}

impl Event {
    /// Id for the next event appended to a batch of `batch_len` events, or
    /// `None` once ids no longer fit.
    pub fn next_id(batch_len: usize) -> Option<u32> {
        batch_len.checked_add(1).and_then(|n| u32::try_from(n).ok())
    }
}

/// A record as returned by the remote snapshot read. Only used for display,
/// so every field tolerates being missing.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct RemoteEventRecord {
    #[serde(default)]
    pub id: u64,
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default)]
    pub data: Motion,
    #[serde(default)]
    pub timestamp: String,
    #[serde(rename = "serverTimestamp", default)]
    pub server_timestamp: String,
}

/// Body of a single-event remote write.
#[derive(Debug, Serialize)]
pub struct OutboundEvent<'a, T: Serialize> {
    #[serde(rename = "type")]
    pub kind: &'a str,
    pub data: &'a T,
    pub timestamp: String,
}

/// Payload sent to the remote log when a new game wipes the local batch.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ResetNotice {
    pub action: String,
}

impl ResetNotice {
    pub fn reset() -> Self {
        Self {
            action: "reset".to_string(),
        }
    }
}
