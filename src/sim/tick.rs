//! Fixed-step simulation tick
//!
//! One call advances the match by exactly one frame. The order of the steps
//! below decides which collisions can happen before a reset.

use serde::{Deserialize, Serialize};

use super::collision::{exited_wall, resolve_paddle_collision};
use super::state::{Field, MatchState, Paddle, Side};

/// Input for a single tick
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TickInput {
    /// Normalized hand height in [0, 1] (0 = top), `None` when no hand was seen
    pub hand_y: Option<f32>,
}

impl TickInput {
    pub fn hand(y: f32) -> Self {
        Self { hand_y: Some(y) }
    }

    pub fn no_hand() -> Self {
        Self { hand_y: None }
    }
}

/// What happened during a tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TickEvents {
    /// Ball reflected off the human paddle
    pub player_hit: bool,
    /// Ball reflected off the computer paddle
    pub ai_hit: bool,
    /// Side credited with a point
    pub scored: Option<Side>,
}

/// Paddle top for a normalized hand height, centering the paddle on the hand
pub fn paddle_target(hand_y: f32, field: &Field, paddle: &Paddle) -> f32 {
    (hand_y * field.height).trunc() - (paddle.height / 2.0).floor()
}

/// Advance the match by one tick
pub fn tick(state: &mut MatchState, input: &TickInput) -> TickEvents {
    let mut events = TickEvents::default();
    let field = state.field;

    state.time_ticks += 1;

    // 1. Human paddle: follow the hand, or hold position without one.
    // A non-finite reading would poison the paddle for the rest of the match.
    let target = match input.hand_y {
        Some(y) if y.is_finite() => paddle_target(y, &field, &state.player),
        _ => state.player.y,
    };
    state.player.move_to(target, &field);

    // 2. Computer paddle chases the ball
    state.ai.track_target(state.ball.pos.y, &field);

    // 3. Ball motion and wall bounce
    state.ball.advance(&field);

    // 4. Paddles, human first
    events.player_hit = resolve_paddle_collision(&mut state.ball, &state.player);
    events.ai_hit = resolve_paddle_collision(&mut state.ball, &state.ai);

    // 5. Scoring: the side opposite the exited wall gets the point
    if let Some(wall) = exited_wall(&state.ball, &field) {
        let scorer = match wall {
            Side::Left => Side::Right,
            Side::Right => Side::Left,
        };
        state.score.credit(scorer);
        state.ball.reset(&field);
        events.scored = Some(scorer);
        log::debug!(
            "Point to {:?} at tick {} ({})",
            scorer,
            state.time_ticks,
            state.score.label()
        );
    }

    events
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::Settings;
    use glam::Vec2;

    fn new_state() -> MatchState {
        MatchState::new(&Settings::default())
    }

    #[test]
    fn test_paddle_target_centers_on_hand() {
        let state = new_state();
        assert_eq!(paddle_target(0.5, &state.field, &state.player), 250.0);
        assert_eq!(paddle_target(0.0, &state.field, &state.player), -50.0);
        // Truncated to whole pixels
        assert_eq!(paddle_target(0.1234, &state.field, &state.player), 24.0);
    }

    #[test]
    fn test_tick_moves_everything() {
        let mut state = new_state();
        let events = tick(&mut state, &TickInput::hand(0.25));

        assert_eq!(state.time_ticks, 1);
        assert_eq!(state.player.y, 100.0);
        // Ball at 300, computer center at 300: stays
        assert_eq!(state.ai.y, 250.0);
        assert_eq!(state.ball.pos, Vec2::new(405.0, 305.0));
        assert_eq!(events, TickEvents::default());
    }

    #[test]
    fn test_no_hand_holds_player_paddle() {
        let mut state = new_state();
        tick(&mut state, &TickInput::hand(0.9));
        let held = state.player.y;
        assert_eq!(held, 490.0);

        for _ in 0..30 {
            tick(&mut state, &TickInput::no_hand());
            assert_eq!(state.player.y, held);
        }
    }

    #[test]
    fn test_left_exit_scores_for_player() {
        let mut state = new_state();
        state.ball.pos = Vec2::new(4.0, 100.0);
        state.ball.vel = Vec2::new(-5.0, 5.0);
        // Move the computer paddle out of the way
        state.ai.y = 400.0;

        let events = tick(&mut state, &TickInput::no_hand());

        assert_eq!(events.scored, Some(Side::Right));
        assert_eq!(state.score.player, 1);
        assert_eq!(state.score.ai, 0);
        assert_eq!(state.ball.pos, Vec2::new(400.0, 300.0));
        assert_eq!(state.ball.vel, Vec2::new(5.0, 5.0));
    }

    #[test]
    fn test_right_exit_scores_for_ai() {
        let mut state = new_state();
        state.ball.pos = Vec2::new(797.0, 100.0);
        state.ball.vel = Vec2::new(5.0, -5.0);
        state.player.y = 400.0;

        let events = tick(&mut state, &TickInput::no_hand());

        assert_eq!(events.scored, Some(Side::Left));
        assert_eq!(state.score, crate::sim::Score { player: 0, ai: 1 });
        assert_eq!(state.ball.pos, Vec2::new(400.0, 300.0));
        assert_eq!(state.ball.vel, Vec2::new(-5.0, -5.0));
    }

    #[test]
    fn test_player_paddle_returns_ball() {
        let mut state = new_state();
        state.ball.pos = Vec2::new(765.0, 290.0);
        state.ball.vel = Vec2::new(5.0, 5.0);

        let events = tick(&mut state, &TickInput::hand(0.5));

        assert!(events.player_hit);
        assert!(!events.ai_hit);
        assert_eq!(state.ball.vel.x, -5.0);
        assert_eq!(events.scored, None);
    }

    #[test]
    fn test_non_finite_hand_holds_position() {
        let mut state = new_state();
        tick(&mut state, &TickInput::hand(0.5));
        assert_eq!(state.player.y, 250.0);

        for y in [f32::NAN, f32::INFINITY, f32::NEG_INFINITY] {
            tick(&mut state, &TickInput::hand(y));
            assert_eq!(state.player.y, 250.0);
        }
        tick(&mut state, &TickInput::no_hand());
        assert_eq!(state.player.y, 250.0);
    }

    #[test]
    fn test_determinism() {
        let mut state1 = new_state();
        let mut state2 = new_state();

        let inputs = [
            TickInput::hand(0.2),
            TickInput::no_hand(),
            TickInput::hand(0.8),
            TickInput::hand(0.55),
        ];

        for _ in 0..200 {
            for input in &inputs {
                tick(&mut state1, input);
                tick(&mut state2, input);
            }
        }

        assert_eq!(state1, state2);
        assert_eq!(state1.time_ticks, 800);
    }
}
