// Animation and logging constants shared by the client and the event sink.

/// Side length of the moving square (pixels)
pub const SQUARE_SIZE: f64 = 10.0;

/// Smallest allowed magnitude of a velocity component (pixels/frame)
pub const MIN_SPEED: f64 = 8.0;

/// Largest allowed magnitude of a velocity component (pixels/frame)
pub const MAX_SPEED: f64 = 12.0;

/// Local storage key holding the current batch
pub const EVENTS_KEY: &str = "events";

/// Remote event type sent when a new game wipes the local batch
pub const RESET_EVENT_TYPE: &str = "playEvent";

pub const MSG_GAME_START: &str = "Start of the game";
pub const MSG_STARTED: &str = "Animation started";
pub const MSG_STOPPED: &str = "Animation stopped";
pub const MSG_RELOADED: &str = "Animation reloaded";
pub const MSG_HORIZONTAL_WALL: &str = "Hitting a horizontal wall";
pub const MSG_BOTTOM_WALL: &str = "Hitting the bottom wall";
