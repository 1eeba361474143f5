//! Camera + hand-landmark adapter
//!
//! Glues an external camera and an external landmark model into a
//! [`GestureSource`]. Neither the camera driver nor the model live here;
//! they plug in through [`FrameSource`] and [`HandDetector`].

use serde::{Deserialize, Serialize};

use super::{GestureError, GestureSource};
use crate::consts::WRIST_LANDMARK;
use crate::settings::TrackerSettings;

/// A captured RGB frame, row-major, 3 bytes per pixel
#[derive(Debug, Clone, PartialEq)]
pub struct CameraFrame {
    pub width: usize,
    pub height: usize,
    pub pixels: Vec<u8>,
}

impl CameraFrame {
    pub const CHANNELS: usize = 3;

    pub fn new(width: usize, height: usize, pixels: Vec<u8>) -> Self {
        debug_assert_eq!(pixels.len(), width * height * Self::CHANNELS);
        Self {
            width,
            height,
            pixels,
        }
    }

    /// Solid black frame
    pub fn blank(width: usize, height: usize) -> Self {
        Self::new(width, height, vec![0; width * height * Self::CHANNELS])
    }

    /// RGB at (x, y)
    pub fn pixel(&self, x: usize, y: usize) -> [u8; 3] {
        let i = (y * self.width + x) * Self::CHANNELS;
        [self.pixels[i], self.pixels[i + 1], self.pixels[i + 2]]
    }

    pub fn set_pixel(&mut self, x: usize, y: usize, rgb: [u8; 3]) {
        let i = (y * self.width + x) * Self::CHANNELS;
        self.pixels[i..i + Self::CHANNELS].copy_from_slice(&rgb);
    }

    /// Non-empty and the buffer matches the dimensions
    pub fn is_well_formed(&self) -> bool {
        self.width > 0
            && self.height > 0
            && self.pixels.len() == self.width * self.height * Self::CHANNELS
    }

    /// Flip left-right in place, so moving a hand right moves it right on screen
    pub fn mirror_horizontal(&mut self) {
        let row_len = self.width * Self::CHANNELS;
        for row in self.pixels.chunks_exact_mut(row_len) {
            for x in 0..self.width / 2 {
                let left = x * Self::CHANNELS;
                let right = (self.width - 1 - x) * Self::CHANNELS;
                for c in 0..Self::CHANNELS {
                    row.swap(left + c, right + c);
                }
            }
        }
    }
}

/// Normalized landmark position (x, y in [0, 1] of the frame; z relative depth)
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Landmark {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

/// One hand found by the detector
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetectedHand {
    /// Detector confidence in [0, 1]
    pub confidence: f32,
    /// 21-point hand model, wrist first
    pub landmarks: Vec<Landmark>,
}

impl DetectedHand {
    pub fn wrist(&self) -> Option<Landmark> {
        self.landmarks.get(WRIST_LANDMARK).copied()
    }
}

/// Camera device
pub trait FrameSource {
    fn open(&mut self) -> Result<(), GestureError> {
        Ok(())
    }

    /// Next frame; `Ok(None)` means the device returned no data
    fn grab(&mut self) -> Result<Option<CameraFrame>, GestureError>;

    fn release(&mut self) {}
}

/// Hand-landmark model
pub trait HandDetector {
    /// Hands found in `frame`, best first
    fn detect(&mut self, frame: &CameraFrame) -> Result<Vec<DetectedHand>, GestureError>;
}

/// Gesture source backed by a camera and a landmark model
pub struct HandTracker<F, D> {
    camera: F,
    detector: D,
    settings: TrackerSettings,
    /// A hand was accepted on the previous frame
    tracking: bool,
}

impl<F: FrameSource, D: HandDetector> HandTracker<F, D> {
    pub fn new(camera: F, detector: D, settings: TrackerSettings) -> Self {
        Self {
            camera,
            detector,
            settings,
            tracking: false,
        }
    }

    /// Whether the last frame had an accepted hand
    pub fn is_tracking(&self) -> bool {
        self.tracking
    }

    fn threshold(&self) -> f32 {
        if self.tracking {
            self.settings.min_tracking_confidence
        } else {
            self.settings.min_detection_confidence
        }
    }

    /// Hands passing the current threshold, capped at `max_hands`
    fn accept(&self, hands: Vec<DetectedHand>) -> Vec<DetectedHand> {
        let threshold = self.threshold();
        hands
            .into_iter()
            .filter(|hand| hand.confidence >= threshold)
            .take(self.settings.max_hands)
            .collect()
    }
}

impl<F: FrameSource, D: HandDetector> GestureSource for HandTracker<F, D> {
    fn acquire(&mut self) -> Result<(), GestureError> {
        self.camera.open()
    }

    fn poll(&mut self) -> Result<Option<f32>, GestureError> {
        let mut frame = self.camera.grab()?.ok_or(GestureError::FrameGrab)?;
        if !frame.is_well_formed() {
            log::warn!(
                "Camera returned a malformed {}x{} frame ({} bytes)",
                frame.width,
                frame.height,
                frame.pixels.len()
            );
            return Err(GestureError::FrameGrab);
        }
        if self.settings.mirror {
            frame.mirror_horizontal();
        }

        let detected = self.detector.detect(&frame)?;
        let hands = self.accept(detected);
        self.tracking = !hands.is_empty();

        let Some(wrist) = hands.first().and_then(DetectedHand::wrist) else {
            if self.tracking {
                log::warn!("Detected hand has no wrist landmark, ignoring");
            }
            return Ok(None);
        };
        if !wrist.y.is_finite() {
            log::warn!("Wrist landmark has non-finite y ({}), ignoring", wrist.y);
            return Ok(None);
        }
        Ok(Some(wrist.y))
    }

    fn release(&mut self) {
        self.camera.release();
        log::info!("Camera released");
    }
}
