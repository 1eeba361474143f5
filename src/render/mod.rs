//! Rendering interface
//!
//! The simulation hands the display an ordered list of draw primitives per
//! tick. Backends only draw; nothing flows back into game state except the
//! quit signals.

pub mod canvas;
pub mod terminal;

pub use canvas::Canvas;
pub use terminal::TerminalDisplay;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::{SCORE_TEXT_SIZE, SCORE_TEXT_Y};
use crate::sim::{MatchState, Paddle, Score};

/// Errors raised by a display backend
#[derive(thiserror::Error, Debug)]
pub enum DisplayError {
    #[error("Display unavailable: {0}")]
    Unavailable(String),

    #[error("Display write failed: {0}")]
    Io(#[from] std::io::Error),
}

/// RGB color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Color(pub u8, pub u8, pub u8);

impl Color {
    pub const BLACK: Color = Color(0, 0, 0);
    pub const WHITE: Color = Color(255, 255, 255);
}

/// One drawing instruction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum DrawCommand {
    /// Fill the whole field
    Clear(Color),
    /// Filled circle
    Circle {
        center: Vec2,
        radius: f32,
        color: Color,
    },
    /// Filled axis-aligned rectangle, `pos` is the top-left corner
    Rect { pos: Vec2, size: Vec2, color: Color },
    /// Text horizontally centered on `anchor.x`, top at `anchor.y`
    Text {
        text: String,
        anchor: Vec2,
        size: f32,
        color: Color,
    },
}

/// Everything drawn for one tick
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Frame {
    pub tick: u64,
    pub field_size: Vec2,
    pub commands: Vec<DrawCommand>,
    pub score: Score,
}

fn paddle_rect(paddle: &Paddle) -> DrawCommand {
    DrawCommand::Rect {
        pos: Vec2::new(paddle.x, paddle.y),
        size: Vec2::new(paddle.width, paddle.height),
        color: Color::WHITE,
    }
}

/// Draw list for the current state: background, ball, paddles, score
pub fn build_frame(state: &MatchState) -> Frame {
    let commands = vec![
        DrawCommand::Clear(Color::BLACK),
        DrawCommand::Circle {
            center: state.ball.pos,
            radius: state.ball.radius,
            color: Color::WHITE,
        },
        paddle_rect(&state.player),
        paddle_rect(&state.ai),
        DrawCommand::Text {
            text: state.score.label(),
            anchor: Vec2::new(state.field.width / 2.0, SCORE_TEXT_Y),
            size: SCORE_TEXT_SIZE,
            color: Color::WHITE,
        },
    ];

    Frame {
        tick: state.time_ticks,
        field_size: Vec2::new(state.field.width, state.field.height),
        commands,
        score: state.score,
    }
}

/// A display the match loop draws into
pub trait Renderer {
    /// Open the window/terminal. Called once before the first frame.
    fn open(&mut self) -> Result<(), DisplayError> {
        Ok(())
    }

    /// Whether the display asked to close (window closed, terminal gone)
    fn quit_requested(&mut self) -> bool;

    /// Show a frame
    fn present(&mut self, frame: &Frame) -> Result<(), DisplayError>;

    /// Whether `key` was pressed since the last check
    fn key_pressed(&mut self, key: char) -> bool;

    /// Tear down. Called once when the match ends.
    fn close(&mut self) {}
}

impl<R: Renderer + ?Sized> Renderer for Box<R> {
    fn open(&mut self) -> Result<(), DisplayError> {
        (**self).open()
    }

    fn quit_requested(&mut self) -> bool {
        (**self).quit_requested()
    }

    fn present(&mut self, frame: &Frame) -> Result<(), DisplayError> {
        (**self).present(frame)
    }

    fn key_pressed(&mut self, key: char) -> bool {
        (**self).key_pressed(key)
    }

    fn close(&mut self) {
        (**self).close()
    }
}
