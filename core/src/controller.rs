use rand::Rng;

use crate::constants::{
    MSG_BOTTOM_WALL, MSG_GAME_START, MSG_HORIZONTAL_WALL, MSG_RELOADED, MSG_STARTED, MSG_STOPPED,
};
use crate::physics::{advance, random_speed, spawn_position};
use crate::{Container, Motion, MovingElement, Position, Velocity};

/// Receives every message the controller emits, together with the velocity
/// at the time of the message.
pub trait Journal {
    fn note(&mut self, label: &str, motion: Motion);
}

/// An emitted message, as collected by the `Vec` journal.
#[derive(Clone, Debug, PartialEq)]
pub struct Notice {
    pub label: String,
    pub motion: Motion,
}

impl Journal for Vec<Notice> {
    fn note(&mut self, label: &str, motion: Motion) {
        self.push(Notice {
            label: label.to_string(),
            motion,
        });
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AnimationState {
    /// Element placed (or not yet created), never started since
    Idle,
    Running,
    /// Paused by the user; the element keeps its position
    Stopped,
    /// Bottom wall reached; the element is gone until a reload
    Terminated,
}

impl std::fmt::Display for AnimationState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AnimationState::Idle => write!(f, "idle"),
            AnimationState::Running => write!(f, "running"),
            AnimationState::Stopped => write!(f, "stopped"),
            AnimationState::Terminated => write!(f, "terminated"),
        }
    }
}

/// Whether the caller should schedule another frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StepOutcome {
    Continue,
    Halted,
}

/// Which controls are offered to the user in the current state.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Controls {
    pub start: bool,
    pub stop: bool,
    pub reload: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlError {
    /// There is no element to animate (before a new game, or after the
    /// bottom wall removed it)
    NoElement,
    NotRunning,
}

impl std::fmt::Display for ControlError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ControlError::NoElement => write!(f, "no element to animate; start a new game or reload"),
            ControlError::NotRunning => write!(f, "animation is not running"),
        }
    }
}

impl std::error::Error for ControlError {}

/// Owns the moving element, its velocity and the animation state.
///
/// Nothing here touches a rendering surface: callers drive [`step`] once per
/// frame and read the element back for drawing.
///
/// [`step`]: AnimationController::step
pub struct AnimationController<R: Rng> {
    container: Container,
    element: Option<MovingElement>,
    velocity: Option<Velocity>,
    state: AnimationState,
    rng: R,
}

impl<R: Rng> AnimationController<R> {
    pub fn new(container: Container, rng: R) -> Self {
        Self {
            container,
            element: None,
            velocity: None,
            state: AnimationState::Idle,
            rng,
        }
    }

    pub fn state(&self) -> AnimationState {
        self.state
    }

    pub fn element(&self) -> Option<&MovingElement> {
        self.element.as_ref()
    }

    pub fn velocity(&self) -> Option<Velocity> {
        self.velocity
    }

    pub fn container(&self) -> Container {
        self.container
    }

    pub fn motion(&self) -> Motion {
        Motion::from(self.velocity)
    }

    pub fn is_running(&self) -> bool {
        self.state == AnimationState::Running
    }

    pub fn controls(&self) -> Controls {
        match self.state {
            AnimationState::Idle => Controls { start: true, ..Controls::default() },
            AnimationState::Running => Controls { stop: true, ..Controls::default() },
            AnimationState::Stopped | AnimationState::Terminated => {
                Controls { reload: true, ..Controls::default() }
            }
        }
    }

    /// Put an element at a known spot with a known velocity, ready to start.
    /// Emits nothing.
    pub fn place(&mut self, position: Position, velocity: Velocity) {
        self.element = Some(MovingElement::new(position));
        self.velocity = Some(velocity);
        self.state = AnimationState::Idle;
    }

    /// Begin a new game: fresh element on the top edge, no velocity yet.
    pub fn reset_for_new_game(&mut self, journal: &mut impl Journal) {
        self.element = Some(self.spawn());
        self.velocity = None;
        self.state = AnimationState::Idle;
        journal.note(MSG_GAME_START, self.motion());
    }

    /// Start or resume. Already running is a no-op.
    pub fn start(&mut self, journal: &mut impl Journal) -> Result<(), ControlError> {
        match self.state {
            AnimationState::Running => return Ok(()),
            AnimationState::Terminated => return Err(ControlError::NoElement),
            AnimationState::Idle | AnimationState::Stopped => {}
        }
        if self.element.is_none() {
            return Err(ControlError::NoElement);
        }

        let rng = &mut self.rng;
        self.velocity.get_or_insert_with(|| random_speed(rng));
        self.state = AnimationState::Running;
        journal.note(MSG_STARTED, self.motion());
        Ok(())
    }

    pub fn stop(&mut self, journal: &mut impl Journal) -> Result<(), ControlError> {
        if self.state != AnimationState::Running {
            return Err(ControlError::NotRunning);
        }
        self.halt(journal);
        Ok(())
    }

    /// Replace the element with a new one and draw a new velocity. Valid in
    /// every state.
    pub fn reload(&mut self, journal: &mut impl Journal) {
        self.element = Some(self.spawn());
        self.velocity = Some(random_speed(&mut self.rng));
        self.state = AnimationState::Idle;
        journal.note(MSG_RELOADED, self.motion());
    }

    /// Advance one frame. Returns `Halted` when no further frame should be
    /// scheduled: the animation was not running, or the element reached the
    /// bottom wall and was removed.
    pub fn step(&mut self, journal: &mut impl Journal) -> StepOutcome {
        if self.state != AnimationState::Running {
            return StepOutcome::Halted;
        }
        let (Some(element), Some(velocity)) = (self.element, self.velocity) else {
            self.state = AnimationState::Terminated;
            return StepOutcome::Halted;
        };

        let next = advance(&element, velocity, self.container);
        self.velocity = Some(next.velocity);

        if next.horizontal {
            journal.note(MSG_HORIZONTAL_WALL, Motion::from(next.velocity));
        }

        if next.bottom {
            journal.note(MSG_BOTTOM_WALL, Motion::from(next.velocity));
            self.halt(journal);
            self.element = None;
            self.state = AnimationState::Terminated;
            return StepOutcome::Halted;
        }

        self.element = Some(MovingElement {
            position: next.position,
            ..element
        });
        StepOutcome::Continue
    }

    fn halt(&mut self, journal: &mut impl Journal) {
        self.state = AnimationState::Stopped;
        journal.note(MSG_STOPPED, self.motion());
    }

    fn spawn(&mut self) -> MovingElement {
        MovingElement::new(spawn_position(&mut self.rng, self.container))
    }
}
