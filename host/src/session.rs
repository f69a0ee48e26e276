use bounce_core::{AnimationController, AnimationState, Controls, StepOutcome};
use rand::Rng;

use crate::frame::FrameClock;
use crate::logger::{Comparison, EventLogger};
use crate::storage::LocalStore;
use crate::BoxError;

/// How an [`Session::animate`] run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnimationSummary {
    pub frames: u64,
    pub state: AnimationState,
}

/// One page's worth of state: the animation controller plus the event
/// logger, driven by the user controls.
///
/// Network writes started here are never awaited by the control methods;
/// call [`settle`](Session::settle) to wait for them.
pub struct Session<S: LocalStore, R: Rng> {
    controller: AnimationController<R>,
    logger: EventLogger<S>,
}

impl<S: LocalStore, R: Rng> Session<S, R> {
    pub fn new(controller: AnimationController<R>, logger: EventLogger<S>) -> Self {
        Self { controller, logger }
    }

    pub fn controller(&self) -> &AnimationController<R> {
        &self.controller
    }

    pub fn controller_mut(&mut self) -> &mut AnimationController<R> {
        &mut self.controller
    }

    pub fn logger(&self) -> &EventLogger<S> {
        &self.logger
    }

    pub fn controls(&self) -> Controls {
        self.controller.controls()
    }

    /// Latest message shown to the user.
    pub fn message(&self) -> Option<&str> {
        self.logger.last_label()
    }

    /// "New Game": drop the previous local history and place a fresh element.
    pub fn new_game(&mut self) -> Result<(), BoxError> {
        let delivery = self.logger.reset()?;
        self.logger.track(delivery);
        self.controller.reset_for_new_game(&mut self.logger);
        tracing::info!("New game started");
        Ok(())
    }

    /// "Close/Review": render stored vs. remote records.
    pub async fn review(&self) -> Comparison {
        self.logger.render_comparison().await
    }

    pub fn start(&mut self) -> Result<(), BoxError> {
        self.controller.start(&mut self.logger)?;
        Ok(())
    }

    pub fn stop(&mut self) -> Result<(), BoxError> {
        self.controller.stop(&mut self.logger)?;
        Ok(())
    }

    pub fn reload(&mut self) {
        self.controller.reload(&mut self.logger);
    }

    /// "Send-Stored-Events". Returns whether anything was sent.
    pub fn send_stored_events(&mut self) -> Result<bool, BoxError> {
        match self.logger.flush_to_remote()? {
            Some(delivery) => {
                self.logger.track(delivery);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Advance one frame.
    pub fn step(&mut self) -> StepOutcome {
        self.controller.step(&mut self.logger)
    }

    /// Step once per clock tick until the controller halts or `max_frames`
    /// steps have run.
    pub async fn animate(&mut self, clock: &mut FrameClock, max_frames: Option<u64>) -> AnimationSummary {
        let mut frames = 0;
        while self.controller.is_running() && max_frames.map_or(true, |max| frames < max) {
            clock.tick().await;
            frames += 1;
            if self.step() == StepOutcome::Halted {
                break;
            }
        }
        tracing::debug!(frames, state = %self.controller.state(), "Animation loop finished");
        AnimationSummary {
            frames,
            state: self.controller.state(),
        }
    }

    /// Wait for every background write started so far. Returns
    /// `(delivered, failed)`.
    pub async fn settle(&mut self) -> (usize, usize) {
        self.logger.settle().await
    }
}
