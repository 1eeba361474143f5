//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - One fixed step per tick, no wall-clock time
//! - Fixed update order (human paddle, computer paddle, ball, collisions, scoring)
//! - No camera, rendering or platform dependencies

pub mod collision;
pub mod state;
pub mod tick;

pub use collision::{ball_paddle_overlap, exited_wall, resolve_paddle_collision};
pub use state::{Ball, Field, MatchState, Paddle, Score, Side};
pub use tick::{TickEvents, TickInput, paddle_target, tick};
