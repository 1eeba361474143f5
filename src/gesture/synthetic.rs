//! Seeded stand-in for a real hand
//!
//! Wanders smoothly between random heights and occasionally drops out, the
//! way a hand leaving the camera's view does. Same seed, same readings.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::{GestureError, GestureSource};

/// Fraction of the frame height the hand may move per poll
const MAX_STEP: f32 = 0.02;
/// Polls between picking a new destination
const RETARGET_INTERVAL: u32 = 90;
/// Dropouts last this many polls
const DROPOUT_LEN: u32 = 20;

/// Synthetic gesture source
#[derive(Debug, Clone)]
pub struct SyntheticHand {
    rng: Pcg32,
    y: f32,
    destination: f32,
    until_retarget: u32,
    /// Chance per poll that the hand disappears
    dropout_rate: f64,
    dropout_left: u32,
}

impl SyntheticHand {
    pub fn new(seed: u64, dropout_rate: f64) -> Self {
        let dropout_rate = if dropout_rate.is_finite() {
            dropout_rate.clamp(0.0, 1.0)
        } else {
            log::warn!("Ignoring non-finite dropout rate {}", dropout_rate);
            0.0
        };
        Self {
            rng: Pcg32::seed_from_u64(seed),
            y: 0.5,
            destination: 0.5,
            until_retarget: 0,
            dropout_rate,
            dropout_left: 0,
        }
    }

    fn step(&mut self) -> f32 {
        if self.until_retarget == 0 {
            self.destination = self.rng.random_range(0.1..0.9);
            self.until_retarget = RETARGET_INTERVAL;
        }
        self.until_retarget -= 1;

        let jitter = self.rng.random_range(-0.002..0.002);
        let delta = (self.destination - self.y).clamp(-MAX_STEP, MAX_STEP);
        self.y = (self.y + delta + jitter).clamp(0.0, 1.0);
        self.y
    }
}

impl GestureSource for SyntheticHand {
    fn poll(&mut self) -> Result<Option<f32>, GestureError> {
        if self.dropout_left > 0 {
            self.dropout_left -= 1;
            return Ok(None);
        }
        if self.dropout_rate > 0.0 && self.rng.random_bool(self.dropout_rate) {
            self.dropout_left = DROPOUT_LEN - 1;
            log::trace!("Synthetic hand out of view");
            return Ok(None);
        }
        Ok(Some(self.step()))
    }
}
