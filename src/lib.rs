//! Gesture Pong - single-screen Pong with a hand-tracked paddle
//!
//! Core modules:
//! - `sim`: Deterministic simulation (ball, paddles, collisions, scoring)
//! - `gesture`: Hand-position sources feeding the human paddle
//! - `render`: Draw primitives, frame building and a terminal display
//! - `clock`: Frame-rate limiting
//! - `match_loop`: The Running/Terminated loop tying it all together
//! - `settings`: File-backed configuration

pub mod clock;
pub mod gesture;
pub mod match_loop;
pub mod render;
pub mod settings;
pub mod sim;

pub use match_loop::{LoopState, MatchError, MatchLoop, MatchSummary, TerminationReason};
pub use settings::{Settings, SettingsError};

/// Game configuration constants
pub mod consts {
    /// Playing field dimensions (pixels)
    pub const FIELD_WIDTH: f32 = 800.0;
    pub const FIELD_HEIGHT: f32 = 600.0;

    /// Ball defaults
    pub const BALL_RADIUS: f32 = 10.0;
    pub const BALL_SPEED_X: f32 = 5.0;
    pub const BALL_SPEED_Y: f32 = 5.0;

    /// Paddle defaults
    pub const PADDLE_WIDTH: f32 = 10.0;
    pub const PADDLE_HEIGHT: f32 = 100.0;
    /// Per-tick step of the computer paddle
    pub const PADDLE_AI_SPEED: f32 = 7.0;
    /// Gap between the human paddle and the right wall
    pub const PLAYER_PADDLE_INSET: f32 = 20.0;
    /// Gap between the computer paddle and the left wall
    pub const AI_PADDLE_INSET: f32 = 10.0;

    /// Hand tracker thresholds
    pub const MIN_DETECTION_CONFIDENCE: f32 = 0.7;
    pub const MIN_TRACKING_CONFIDENCE: f32 = 0.7;
    pub const MAX_HANDS: usize = 1;
    /// Landmark index of the wrist in a 21-point hand model
    pub const WRIST_LANDMARK: usize = 0;

    /// Target tick rate
    pub const TICKS_PER_SECOND: u32 = 60;

    /// Score label position
    pub const SCORE_TEXT_Y: f32 = 20.0;
    pub const SCORE_TEXT_SIZE: f32 = 36.0;
}
