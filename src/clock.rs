//! Frame pacing
//!
//! The match loop yields to a [`Clock`] once per tick. Pacing is the only
//! thing a clock does; game state never reads wall time.

use std::thread;
use std::time::{Duration, Instant};

/// Frames averaged for the FPS readout
const FPS_WINDOW: usize = 60;

/// Per-tick rate limiter
pub trait Clock {
    /// Block until the next tick is due
    fn wait_for_next_tick(&mut self);

    /// Measured ticks per second, if known
    fn fps(&self) -> Option<u32> {
        None
    }
}

impl<C: Clock + ?Sized> Clock for Box<C> {
    fn wait_for_next_tick(&mut self) {
        (**self).wait_for_next_tick()
    }

    fn fps(&self) -> Option<u32> {
        (**self).fps()
    }
}

/// Sleeps out the remainder of each tick's time slot
#[derive(Debug)]
pub struct FixedRateClock {
    period: Duration,
    next_deadline: Option<Instant>,
    frame_times: [Option<Instant>; FPS_WINDOW],
    frame_index: usize,
    fps: Option<u32>,
}

impl FixedRateClock {
    pub fn new(ticks_per_second: u32) -> Self {
        Self {
            period: Duration::from_secs(1) / ticks_per_second.max(1),
            next_deadline: None,
            frame_times: [None; FPS_WINDOW],
            frame_index: 0,
            fps: None,
        }
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    fn record_frame(&mut self, now: Instant) {
        // Oldest sample is the one about to be overwritten
        if let Some(oldest) = self.frame_times[self.frame_index] {
            let elapsed = now.duration_since(oldest).as_secs_f64();
            if elapsed > 0.0 {
                self.fps = Some((FPS_WINDOW as f64 / elapsed).round() as u32);
            }
        }
        self.frame_times[self.frame_index] = Some(now);
        self.frame_index = (self.frame_index + 1) % FPS_WINDOW;
    }
}

impl Clock for FixedRateClock {
    fn wait_for_next_tick(&mut self) {
        let now = Instant::now();
        let deadline = self.next_deadline.unwrap_or(now) + self.period;

        if deadline > now {
            thread::sleep(deadline - now);
            self.next_deadline = Some(deadline);
        } else {
            // Fell behind (slow capture or inference): don't try to catch up
            self.next_deadline = Some(now);
        }

        self.record_frame(Instant::now());
    }

    fn fps(&self) -> Option<u32> {
        self.fps
    }
}

/// Never waits
#[derive(Debug, Default, Clone, Copy)]
pub struct Unthrottled;

impl Clock for Unthrottled {
    fn wait_for_next_tick(&mut self) {}
}
