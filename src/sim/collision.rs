//! Collision detection and response
//!
//! Deliberately simple: a single-edge x test plus a strict y-span test,
//! no positional correction and no speed change on a hit. A ball that stays
//! overlapped with a paddle for several ticks flips x velocity every tick.

use super::state::{Ball, Field, Paddle, Side};

/// Whether the ball's leading edge has reached the paddle's face while
/// its center lies strictly inside the paddle's vertical span
pub fn ball_paddle_overlap(ball: &Ball, paddle: &Paddle) -> bool {
    let reached_face = match paddle.side {
        Side::Right => ball.pos.x + ball.radius >= paddle.x,
        Side::Left => ball.pos.x - ball.radius <= paddle.x + paddle.width,
    };
    let within_span = paddle.y < ball.pos.y && ball.pos.y < paddle.y + paddle.height;

    reached_face && within_span
}

/// Reflect the ball horizontally off `paddle` if they touch
///
/// Returns true when the ball was reflected.
pub fn resolve_paddle_collision(ball: &mut Ball, paddle: &Paddle) -> bool {
    if ball_paddle_overlap(ball, paddle) {
        ball.vel.x = -ball.vel.x;
        true
    } else {
        false
    }
}

/// The wall the ball has passed through, if any
///
/// Uses the ball center, so a ball half inside the wall is still in play.
pub fn exited_wall(ball: &Ball, field: &Field) -> Option<Side> {
    if ball.pos.x < 0.0 {
        Some(Side::Left)
    } else if ball.pos.x > field.width {
        Some(Side::Right)
    } else {
        None
    }
}
