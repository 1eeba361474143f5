//! The match loop
//!
//! Owns the match state and the three collaborators (gesture source,
//! display, clock) and drives one tick at a time until something ends the
//! match. Devices are acquired once on start and released once on the way
//! out, whichever way out that is.

use crate::clock::Clock;
use crate::gesture::{GestureError, GestureSource};
use crate::render::{DisplayError, Renderer, build_frame};
use crate::settings::Settings;
use crate::sim::{MatchState, Score, TickEvents, TickInput, tick};

/// Why the match stopped
#[derive(Debug, Clone, PartialEq)]
pub enum TerminationReason {
    /// Display asked to close
    QuitEvent,
    /// Quit key pressed
    QuitKey,
    /// Camera or detector failed mid-run
    CaptureFailed(GestureError),
    /// Display could not show a frame
    DisplayFailed(String),
    /// Configured tick budget used up
    TickLimit,
}

/// Loop lifecycle. There is no way back from `Terminated`.
#[derive(Debug, Clone, PartialEq)]
pub enum LoopState {
    Running,
    Terminated(TerminationReason),
}

/// Startup failures
#[derive(thiserror::Error, Debug)]
pub enum MatchError {
    #[error("Gesture source failed to start: {0}")]
    Gesture(#[source] GestureError),

    #[error("Display failed to open: {0}")]
    Display(#[source] DisplayError),

    #[error("Match already terminated")]
    AlreadyTerminated,
}

/// Outcome of a finished match
#[derive(Debug, Clone, PartialEq)]
pub struct MatchSummary {
    pub reason: TerminationReason,
    pub score: Score,
    pub ticks: u64,
}

pub struct MatchLoop<G: GestureSource, R: Renderer, C: Clock> {
    state: MatchState,
    gesture: G,
    renderer: R,
    clock: C,
    quit_key: char,
    max_ticks: Option<u64>,
    /// Ticks between FPS log lines
    fps_log_interval: u64,
    loop_state: LoopState,
    gesture_acquired: bool,
    display_open: bool,
    last_events: TickEvents,
}

impl<G: GestureSource, R: Renderer, C: Clock> MatchLoop<G, R, C> {
    pub fn new(settings: &Settings, gesture: G, renderer: R, clock: C) -> Self {
        Self {
            state: MatchState::new(settings),
            gesture,
            renderer,
            clock,
            quit_key: settings.game_loop.quit_key,
            max_ticks: settings.game_loop.max_ticks,
            fps_log_interval: u64::from(settings.game_loop.ticks_per_second) * 5,
            loop_state: LoopState::Running,
            gesture_acquired: false,
            display_open: false,
            last_events: TickEvents::default(),
        }
    }

    pub fn state(&self) -> &MatchState {
        &self.state
    }

    pub fn loop_state(&self) -> &LoopState {
        &self.loop_state
    }

    /// Events from the most recent tick
    pub fn last_events(&self) -> TickEvents {
        self.last_events
    }

    pub fn gesture(&self) -> &G {
        &self.gesture
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    /// Acquire the camera and open the display
    ///
    /// On failure anything already acquired is released again.
    pub fn start(&mut self) -> Result<(), MatchError> {
        if matches!(self.loop_state, LoopState::Terminated(_)) {
            return Err(MatchError::AlreadyTerminated);
        }

        if !self.gesture_acquired {
            self.gesture.acquire().map_err(MatchError::Gesture)?;
            self.gesture_acquired = true;
        }

        if !self.display_open {
            if let Err(e) = self.renderer.open() {
                self.shutdown();
                return Err(MatchError::Display(e));
            }
            self.display_open = true;
        }

        Ok(())
    }

    /// Run one tick. Does nothing until `start` has succeeded.
    pub fn step(&mut self) -> &LoopState {
        if self.loop_state != LoopState::Running {
            return &self.loop_state;
        }
        if !(self.gesture_acquired && self.display_open) {
            log::warn!("Match step before start, ignoring");
            return &self.loop_state;
        }
        if let Some(reason) = self.run_tick() {
            log::info!("Match ending: {:?}", reason);
            self.loop_state = LoopState::Terminated(reason);
        }
        &self.loop_state
    }

    fn run_tick(&mut self) -> Option<TerminationReason> {
        if self.renderer.quit_requested() {
            return Some(TerminationReason::QuitEvent);
        }
        if self
            .max_ticks
            .is_some_and(|max| self.state.time_ticks >= max)
        {
            return Some(TerminationReason::TickLimit);
        }

        let hand_y = match self.gesture.poll() {
            Ok(hand_y) => hand_y,
            Err(e) => {
                log::error!("{}", e);
                return Some(TerminationReason::CaptureFailed(e));
            }
        };

        self.last_events = tick(&mut self.state, &TickInput { hand_y });
        log::trace!(
            "tick {} ball={:?} player_y={} ai_y={}",
            self.state.time_ticks,
            self.state.ball.pos,
            self.state.player.y,
            self.state.ai.y
        );

        let frame = build_frame(&self.state);
        if let Err(e) = self.renderer.present(&frame) {
            log::error!("Failed to present frame: {}", e);
            return Some(TerminationReason::DisplayFailed(e.to_string()));
        }

        if self.renderer.key_pressed(self.quit_key) {
            return Some(TerminationReason::QuitKey);
        }

        self.clock.wait_for_next_tick();

        if self.fps_log_interval > 0 && self.state.time_ticks % self.fps_log_interval == 0 {
            if let Some(fps) = self.clock.fps() {
                log::debug!("{} fps", fps);
            }
        }

        None
    }

    /// Release devices; safe to call more than once
    fn shutdown(&mut self) {
        if self.gesture_acquired {
            self.gesture.release();
            self.gesture_acquired = false;
        }
        if self.display_open {
            self.renderer.close();
            self.display_open = false;
        }
    }

    /// Play until the match terminates
    pub fn run(&mut self) -> Result<MatchSummary, MatchError> {
        self.start()?;
        log::info!("Match started");

        while self.step() == &LoopState::Running {}

        self.shutdown();

        let reason = match &self.loop_state {
            LoopState::Terminated(reason) => reason.clone(),
            LoopState::Running => unreachable!("loop exits only once terminated"),
        };
        Ok(MatchSummary {
            reason,
            score: self.state.score,
            ticks: self.state.time_ticks,
        })
    }
}

impl<G: GestureSource, R: Renderer, C: Clock> Drop for MatchLoop<G, R, C> {
    fn drop(&mut self) {
        self.shutdown();
    }
}
