use std::time::Duration;

use tokio::time::{interval, Interval, MissedTickBehavior};

/// Paces animation steps, standing in for a display refresh callback.
pub enum FrameClock {
    /// One tick per frame at a fixed rate; late ticks are dropped rather
    /// than replayed in a burst.
    Paced(Interval),
    /// Ticks as fast as the runtime allows, yielding between frames so
    /// background deliveries still make progress.
    Unpaced,
}

impl FrameClock {
    pub fn paced(fps: u32) -> Self {
        let period = Duration::from_secs_f64(1.0 / fps.max(1) as f64);
        let mut ticker = interval(period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        FrameClock::Paced(ticker)
    }

    pub fn unpaced() -> Self {
        FrameClock::Unpaced
    }

    pub async fn tick(&mut self) {
        match self {
            FrameClock::Paced(ticker) => {
                ticker.tick().await;
            }
            FrameClock::Unpaced => tokio::task::yield_now().await,
        }
    }
}
