use rand::Rng;

use crate::constants::{MAX_SPEED, MIN_SPEED, SQUARE_SIZE};
use crate::{Container, MovingElement, Position, Velocity};

/// Result of moving an element by one frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Advance {
    /// Velocity after wall reflections
    pub velocity: Velocity,
    /// Position to commit when the element keeps moving
    pub position: Position,
    pub horizontal: bool,
    pub top: bool,
    pub bottom: bool,
}

/// Draw one velocity component: uniform over `[-MAX_SPEED, MAX_SPEED)`,
/// rejected until its magnitude reaches `MIN_SPEED`.
pub fn random_component<R: Rng>(rng: &mut R) -> f64 {
    loop {
        let v = rng.gen_range(-MAX_SPEED..MAX_SPEED);
        if v.abs() >= MIN_SPEED {
            return v;
        }
    }
}

pub fn random_speed<R: Rng>(rng: &mut R) -> Velocity {
    let dx = random_component(rng);
    let dy = random_component(rng);
    Velocity { dx, dy }
}

/// Random spawn point along the top edge of the container.
pub fn spawn_position<R: Rng>(rng: &mut R, container: Container) -> Position {
    let span = container.width - SQUARE_SIZE;
    let left = if span > 0.0 { rng.gen_range(0.0..span) } else { 0.0 };
    Position { left, top: 0.0 }
}

/// Move `element` by `velocity` inside `container`.
///
/// The candidate box is the current box shifted by the velocity. Touching the
/// left or right side flips `dx`; touching the top flips `dy`. The bottom is
/// only checked when the top is not touched, and never flips anything. The
/// committed position uses the reflected velocity, so an element never ends
/// up past a side wall.
pub fn advance(element: &MovingElement, velocity: Velocity, container: Container) -> Advance {
    let candidate = element.bounds().offset(velocity.dx, velocity.dy);
    let mut next = velocity;

    let horizontal = candidate.left <= 0.0 || candidate.right >= container.width;
    if horizontal {
        next.dx = -next.dx;
    }

    let top = candidate.top <= 0.0;
    let bottom = !top && candidate.bottom >= container.height;
    if top {
        next.dy = -next.dy;
    }

    Advance {
        velocity: next,
        position: Position {
            left: element.position.left + next.dx,
            top: element.position.top + next.dy,
        },
        horizontal,
        top,
        bottom,
    }
}
