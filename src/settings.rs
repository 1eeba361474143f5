//! Match settings
//!
//! Every tunable the match uses, loaded from a JSON file. Missing fields
//! fall back to the defaults in [`crate::consts`].

use std::fs;
use std::path::{Path, PathBuf};

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Errors raised while loading or validating settings
#[derive(thiserror::Error, Debug)]
pub enum SettingsError {
    #[error("Failed to access settings file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed settings file: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid settings: {0}")]
    Invalid(String),
}

/// Playing field dimensions
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldSettings {
    pub width: f32,
    pub height: f32,
}

impl Default for FieldSettings {
    fn default() -> Self {
        Self {
            width: FIELD_WIDTH,
            height: FIELD_HEIGHT,
        }
    }
}

/// Ball size and per-tick velocity magnitudes
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BallSettings {
    pub radius: f32,
    /// Per-axis speed in pixels per tick
    pub speed: Vec2,
}

impl Default for BallSettings {
    fn default() -> Self {
        Self {
            radius: BALL_RADIUS,
            speed: Vec2::new(BALL_SPEED_X, BALL_SPEED_Y),
        }
    }
}

/// Paddle geometry and computer paddle speed
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PaddleSettings {
    pub width: f32,
    pub height: f32,
    /// Pixels per tick the computer paddle may move
    pub ai_speed: f32,
    /// Distance from the right wall to the human paddle's left edge
    pub player_inset: f32,
    /// Distance from the left wall to the computer paddle's left edge
    pub ai_inset: f32,
}

impl Default for PaddleSettings {
    fn default() -> Self {
        Self {
            width: PADDLE_WIDTH,
            height: PADDLE_HEIGHT,
            ai_speed: PADDLE_AI_SPEED,
            player_inset: PLAYER_PADDLE_INSET,
            ai_inset: AI_PADDLE_INSET,
        }
    }
}

/// Hand tracker thresholds
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackerSettings {
    pub min_detection_confidence: f32,
    pub min_tracking_confidence: f32,
    pub max_hands: usize,
    /// Flip frames horizontally before detection
    pub mirror: bool,
}

impl Default for TrackerSettings {
    fn default() -> Self {
        Self {
            min_detection_confidence: MIN_DETECTION_CONFIDENCE,
            min_tracking_confidence: MIN_TRACKING_CONFIDENCE,
            max_hands: MAX_HANDS,
            mirror: true,
        }
    }
}

/// Loop pacing and termination
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoopSettings {
    pub ticks_per_second: u32,
    /// Key that ends the match when pressed
    pub quit_key: char,
    /// Stop after this many ticks (unbounded when absent)
    pub max_ticks: Option<u64>,
}

impl Default for LoopSettings {
    fn default() -> Self {
        Self {
            ticks_per_second: TICKS_PER_SECOND,
            quit_key: 'q',
            max_ticks: None,
        }
    }
}

/// Complete match configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub field: FieldSettings,
    pub ball: BallSettings,
    pub paddle: PaddleSettings,
    pub tracker: TrackerSettings,
    #[serde(rename = "loop")]
    pub game_loop: LoopSettings,
}

impl Settings {
    /// Load and validate settings from a JSON file
    pub fn load(path: &Path) -> Result<Self, SettingsError> {
        let json = fs::read_to_string(path).map_err(|source| SettingsError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let settings: Settings = serde_json::from_str(&json)?;
        settings.validate()?;
        log::info!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    /// Load settings if the file exists, otherwise use defaults
    pub fn load_or_default(path: &Path) -> Result<Self, SettingsError> {
        if path.exists() {
            Self::load(path)
        } else {
            log::info!("No settings at {}, using defaults", path.display());
            Ok(Self::default())
        }
    }

    /// Write settings as pretty JSON
    pub fn save(&self, path: &Path) -> Result<(), SettingsError> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json).map_err(|source| SettingsError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        log::info!("Settings saved to {}", path.display());
        Ok(())
    }

    /// Reject settings the simulation cannot run with
    pub fn validate(&self) -> Result<(), SettingsError> {
        let invalid = |msg: &str| Err(SettingsError::Invalid(msg.to_string()));

        if self.field.width <= 0.0 || self.field.height <= 0.0 {
            return invalid("field dimensions must be positive");
        }
        if self.ball.radius <= 0.0 {
            return invalid("ball radius must be positive");
        }
        if self.ball.speed.x < 0.0 || self.ball.speed.y < 0.0 {
            return invalid("ball speed components are magnitudes and must not be negative");
        }
        if self.paddle.width <= 0.0 || self.paddle.height <= 0.0 {
            return invalid("paddle dimensions must be positive");
        }
        if self.paddle.height > self.field.height {
            return invalid("paddle is taller than the field");
        }
        if self.paddle.ai_speed < 0.0 {
            return invalid("computer paddle speed must not be negative");
        }
        if self.paddle.player_inset > self.field.width || self.paddle.ai_inset > self.field.width
        {
            return invalid("paddle inset lies outside the field");
        }
        let confidence_ok = |c: f32| (0.0..=1.0).contains(&c);
        if !confidence_ok(self.tracker.min_detection_confidence)
            || !confidence_ok(self.tracker.min_tracking_confidence)
        {
            return invalid("tracker confidences must lie in [0, 1]");
        }
        if self.tracker.max_hands == 0 {
            return invalid("tracker must follow at least one hand");
        }
        if self.game_loop.ticks_per_second == 0 {
            return invalid("tick rate must be positive");
        }
        Ok(())
    }
}
