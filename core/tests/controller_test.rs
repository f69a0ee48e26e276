// Animation controller state machine and the messages it emits
use bounce_core::constants::*;
use bounce_core::{
    AnimationController, AnimationState, ControlError, Container, Controls, Motion, Notice, Position,
    StepOutcome, Velocity,
};
use rand::rngs::StdRng;
use rand::SeedableRng;

fn controller(width: f64, height: f64) -> AnimationController<StdRng> {
    AnimationController::new(Container::new(width, height), StdRng::seed_from_u64(930397884))
}

fn labels(notices: &[Notice]) -> Vec<&str> {
    notices.iter().map(|n| n.label.as_str()).collect()
}

fn count(notices: &[Notice], label: &str) -> usize {
    notices.iter().filter(|n| n.label == label).count()
}

fn run_to_end(ctl: &mut AnimationController<StdRng>, journal: &mut Vec<Notice>, max_frames: usize) -> usize {
    for frame in 1..=max_frames {
        if ctl.step(journal) == StepOutcome::Halted {
            return frame;
        }
    }
    max_frames
}

#[test]
fn test_start_without_element_fails() {
    let mut ctl = controller(300.0, 300.0);
    let mut journal = Vec::new();
    assert_eq!(ctl.start(&mut journal), Err(ControlError::NoElement));
    assert!(journal.is_empty());
    assert_eq!(ctl.state(), AnimationState::Idle);
}

#[test]
fn test_new_game_emits_start_of_game_without_velocity() {
    let mut ctl = controller(300.0, 300.0);
    let mut journal = Vec::new();
    ctl.reset_for_new_game(&mut journal);

    assert_eq!(labels(&journal), vec![MSG_GAME_START]);
    assert_eq!(journal[0].motion, Motion::default());
    let element = ctl.element().expect("element created");
    assert_eq!(element.position.top, 0.0);
    assert_eq!(ctl.controls(), Controls { start: true, stop: false, reload: false });
}

#[test]
fn test_start_draws_velocity_in_range() {
    let mut ctl = controller(300.0, 300.0);
    let mut journal = Vec::new();
    ctl.reset_for_new_game(&mut journal);
    ctl.start(&mut journal).unwrap();

    let v = ctl.velocity().expect("velocity assigned");
    assert!(v.dx.abs() >= MIN_SPEED && v.dx.abs() <= MAX_SPEED);
    assert!(v.dy.abs() >= MIN_SPEED && v.dy.abs() <= MAX_SPEED);
    assert_eq!(labels(&journal), vec![MSG_GAME_START, MSG_STARTED]);
    assert_eq!(journal[1].motion, Motion::from(v));
    assert!(ctl.is_running());
    assert_eq!(ctl.controls(), Controls { start: false, stop: true, reload: false });
}

#[test]
fn test_start_while_running_is_noop() {
    let mut ctl = controller(300.0, 300.0);
    let mut journal = Vec::new();
    ctl.reset_for_new_game(&mut journal);
    ctl.start(&mut journal).unwrap();
    let v = ctl.velocity();

    assert_eq!(ctl.start(&mut journal), Ok(()));
    assert_eq!(count(&journal, MSG_STARTED), 1);
    assert_eq!(ctl.velocity(), v);
}

#[test]
fn test_stop_keeps_position_and_resume_keeps_velocity() {
    let mut ctl = controller(300.0, 300.0);
    let mut journal = Vec::new();
    ctl.place(Position { left: 100.0, top: 100.0 }, Velocity { dx: 9.0, dy: 9.0 });
    ctl.start(&mut journal).unwrap();
    assert_eq!(ctl.step(&mut journal), StepOutcome::Continue);

    ctl.stop(&mut journal).unwrap();
    assert_eq!(ctl.state(), AnimationState::Stopped);
    assert_eq!(ctl.element().unwrap().position, Position { left: 109.0, top: 109.0 });
    assert_eq!(ctl.controls(), Controls { start: false, stop: false, reload: true });

    // stepping while stopped does nothing
    assert_eq!(ctl.step(&mut journal), StepOutcome::Halted);
    assert_eq!(ctl.element().unwrap().position, Position { left: 109.0, top: 109.0 });

    ctl.start(&mut journal).unwrap();
    assert_eq!(ctl.velocity(), Some(Velocity { dx: 9.0, dy: 9.0 }));
    assert_eq!(labels(&journal), vec![MSG_STARTED, MSG_STOPPED, MSG_STARTED]);
}

#[test]
fn test_stop_when_not_running_fails() {
    let mut ctl = controller(300.0, 300.0);
    let mut journal = Vec::new();
    ctl.reset_for_new_game(&mut journal);
    assert_eq!(ctl.stop(&mut journal), Err(ControlError::NotRunning));
    assert_eq!(labels(&journal), vec![MSG_GAME_START]);
}

#[test]
fn test_left_wall_step_flips_dx_and_reports() {
    let mut ctl = controller(300.0, 300.0);
    let mut journal = Vec::new();
    ctl.place(Position { left: 4.0, top: 100.0 }, Velocity { dx: -10.0, dy: 8.0 });
    ctl.start(&mut journal).unwrap();

    assert_eq!(ctl.step(&mut journal), StepOutcome::Continue);
    assert_eq!(ctl.velocity(), Some(Velocity { dx: 10.0, dy: 8.0 }));
    assert_eq!(labels(&journal), vec![MSG_STARTED, MSG_HORIZONTAL_WALL]);
    // message carries the reflected velocity
    assert_eq!(journal[1].motion, Motion { dx: Some(10.0), dy: Some(8.0) });
}

#[test]
fn test_bounce_scenario_300_by_300() {
    let mut ctl = controller(300.0, 300.0);
    let mut journal = Vec::new();
    ctl.reset_for_new_game(&mut journal);
    ctl.place(Position { left: 50.0, top: 0.0 }, Velocity { dx: 10.0, dy: 10.0 });
    ctl.start(&mut journal).unwrap();

    let frames = run_to_end(&mut ctl, &mut journal, 100);

    assert_eq!(frames, 29, "bottom wall should end the run on frame 29");
    assert!(count(&journal, MSG_HORIZONTAL_WALL) >= 1);
    assert_eq!(count(&journal, MSG_BOTTOM_WALL), 1);
    let tail: Vec<&str> = labels(&journal).into_iter().rev().take(2).collect();
    assert_eq!(tail, vec![MSG_STOPPED, MSG_BOTTOM_WALL]);

    assert_eq!(ctl.state(), AnimationState::Terminated);
    assert!(ctl.element().is_none());
    assert_eq!(ctl.controls(), Controls { start: false, stop: false, reload: true });
    assert_eq!(ctl.step(&mut journal), StepOutcome::Halted);
    assert_eq!(count(&journal, MSG_BOTTOM_WALL), 1);
}

#[test]
fn test_random_run_always_reaches_bottom_once() {
    for seed in 0..20u64 {
        let mut ctl = AnimationController::new(Container::new(400.0, 250.0), StdRng::seed_from_u64(seed));
        let mut journal = Vec::new();
        ctl.reset_for_new_game(&mut journal);
        ctl.start(&mut journal).unwrap();

        // with |dy| >= 8 the element cannot stay airborne longer than a few
        // hundred frames in a 250px container
        run_to_end(&mut ctl, &mut journal, 10_000);

        assert_eq!(count(&journal, MSG_BOTTOM_WALL), 1, "seed {}", seed);
        assert_eq!(ctl.state(), AnimationState::Terminated, "seed {}", seed);
        assert!(ctl.element().is_none());
    }
}

#[test]
fn test_start_after_bottom_requires_reload() {
    let mut ctl = controller(300.0, 300.0);
    let mut journal = Vec::new();
    ctl.place(Position { left: 100.0, top: 285.0 }, Velocity { dx: 8.0, dy: 8.0 });
    ctl.start(&mut journal).unwrap();
    assert_eq!(ctl.step(&mut journal), StepOutcome::Halted);

    assert_eq!(ctl.start(&mut journal), Err(ControlError::NoElement));
    ctl.reload(&mut journal);
    assert_eq!(ctl.start(&mut journal), Ok(()));
}

#[test]
fn test_reload_twice_creates_fresh_elements() {
    let mut ctl = controller(300.0, 300.0);
    let mut journal = Vec::new();

    ctl.reload(&mut journal);
    let first = *ctl.element().expect("first element");
    ctl.reload(&mut journal);
    let second = *ctl.element().expect("second element");

    assert_eq!(labels(&journal), vec![MSG_RELOADED, MSG_RELOADED]);
    assert_eq!(first.position.top, 0.0);
    assert_eq!(second.position.top, 0.0);
    assert_ne!(first.position.left, second.position.left);
    assert_eq!(ctl.state(), AnimationState::Idle);
    let v = ctl.velocity().expect("reload draws a velocity");
    assert!(v.dx.abs() >= MIN_SPEED && v.dy.abs() >= MIN_SPEED);
}

#[test]
fn test_reload_while_running_stops_animation() {
    let mut ctl = controller(300.0, 300.0);
    let mut journal = Vec::new();
    ctl.reset_for_new_game(&mut journal);
    ctl.start(&mut journal).unwrap();
    ctl.reload(&mut journal);

    assert!(!ctl.is_running());
    assert_eq!(ctl.step(&mut journal), StepOutcome::Halted);
    assert_eq!(labels(&journal), vec![MSG_GAME_START, MSG_STARTED, MSG_RELOADED]);
}
