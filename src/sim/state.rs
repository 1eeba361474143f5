//! Game state and core simulation types
//!
//! Everything a tick reads or writes lives here. No device handles.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::settings::Settings;

/// Which side of the field an entity belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Side {
    /// Computer paddle, x = 0 wall
    Left,
    /// Human paddle, x = field width wall
    Right,
}

/// Playing field bounds
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Field {
    pub width: f32,
    pub height: f32,
}

impl Field {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        Vec2::new(self.width / 2.0, self.height / 2.0)
    }
}

/// The ball
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Ball {
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
    /// Magnitude restored to the y velocity on reset
    pub base_speed_y: f32,
}

impl Ball {
    /// Ball at the field center moving with the default velocity
    pub fn new(field: &Field, radius: f32, speed: Vec2) -> Self {
        Self {
            pos: field.center(),
            vel: speed,
            radius,
            base_speed_y: speed.y,
        }
    }

    /// Move by one tick of velocity, reflecting off the top and bottom walls
    ///
    /// One reflection per tick and no sub-stepping: a ball fast enough to
    /// cross a wall in a single tick is not pulled back.
    pub fn advance(&mut self, field: &Field) {
        self.pos += self.vel;

        if self.pos.y - self.radius <= 0.0 || self.pos.y + self.radius >= field.height {
            self.vel.y = -self.vel.y;
        }
    }

    /// Back to center, serving toward the side that just conceded
    pub fn reset(&mut self, field: &Field) {
        self.pos = field.center();
        self.vel.x = -self.vel.x;
        self.vel.y = if self.vel.y > 0.0 {
            self.base_speed_y
        } else {
            -self.base_speed_y
        };
    }
}

/// A paddle
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Paddle {
    pub side: Side,
    /// Left edge, fixed for the paddle's lifetime
    pub x: f32,
    /// Top edge, always within [0, field height - height]
    pub y: f32,
    pub width: f32,
    pub height: f32,
    /// Per-tick step used by `track_target`
    pub speed: f32,
}

impl Paddle {
    /// Paddle at `x`, vertically centered in the field
    pub fn new(side: Side, x: f32, width: f32, height: f32, speed: f32, field: &Field) -> Self {
        Self {
            side,
            x,
            y: field.height / 2.0 - height / 2.0,
            width,
            height,
            speed,
        }
    }

    #[inline]
    pub fn center_y(&self) -> f32 {
        self.y + self.height / 2.0
    }

    /// Highest legal `y`
    #[inline]
    pub fn max_y(&self, field: &Field) -> f32 {
        (field.height - self.height).max(0.0)
    }

    fn clamp(&mut self, field: &Field) {
        self.y = self.y.clamp(0.0, self.max_y(field));
    }

    /// Jump straight to `target_y`, kept on screen
    pub fn move_to(&mut self, target_y: f32, field: &Field) {
        self.y = target_y;
        self.clamp(field);
    }

    /// Step the paddle center one `speed` toward `target_y`
    pub fn track_target(&mut self, target_y: f32, field: &Field) {
        let center = self.center_y();
        if center < target_y {
            self.y += self.speed;
        } else if center > target_y {
            self.y -= self.speed;
        }
        self.clamp(field);
    }
}

/// Running score
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Score {
    /// Human (right paddle)
    pub player: u32,
    /// Computer (left paddle)
    pub ai: u32,
}

impl Score {
    pub fn credit(&mut self, side: Side) {
        match side {
            Side::Right => self.player += 1,
            Side::Left => self.ai += 1,
        }
    }

    /// HUD label
    pub fn label(&self) -> String {
        format!("Player: {}  AI: {}", self.player, self.ai)
    }
}

/// Complete match state, owned by the match loop
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchState {
    pub field: Field,
    pub ball: Ball,
    /// Human-controlled paddle (right)
    pub player: Paddle,
    /// Computer paddle (left)
    pub ai: Paddle,
    pub score: Score,
    /// Ticks simulated so far
    pub time_ticks: u64,
}

impl MatchState {
    /// Fresh match laid out from settings
    pub fn new(settings: &Settings) -> Self {
        let field = Field::new(settings.field.width, settings.field.height);
        let p = &settings.paddle;

        Self {
            field,
            ball: Ball::new(&field, settings.ball.radius, settings.ball.speed),
            player: Paddle::new(
                Side::Right,
                field.width - p.player_inset,
                p.width,
                p.height,
                p.ai_speed,
                &field,
            ),
            ai: Paddle::new(Side::Left, p.ai_inset, p.width, p.height, p.ai_speed, &field),
            score: Score::default(),
            time_ticks: 0,
        }
    }
}
