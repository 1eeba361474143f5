//! Hand-position sources for the human paddle
//!
//! A source reports, once per tick, the normalized height of the tracked
//! hand (0 = top of the frame, 1 = bottom) or `None` when no hand is
//! visible. `None` is ordinary input and never ends the match; an `Err` does.

pub mod scripted;
pub mod synthetic;
pub mod tracker;

pub use scripted::{ScriptEnd, ScriptedGesture};
pub use synthetic::SyntheticHand;
pub use tracker::{CameraFrame, DetectedHand, FrameSource, HandDetector, HandTracker, Landmark};

/// Failures of the capture pipeline
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum GestureError {
    /// Camera could not be opened at startup
    #[error("Camera unavailable: {0}")]
    DeviceUnavailable(String),

    /// Camera stopped delivering frames mid-run
    #[error("Failed to grab frame")]
    FrameGrab,

    /// Hand detector failed on a frame
    #[error("Hand detection failed: {0}")]
    Inference(String),
}

/// Per-tick supplier of the human paddle's target
pub trait GestureSource {
    /// Acquire devices. Called once before the first poll.
    fn acquire(&mut self) -> Result<(), GestureError> {
        Ok(())
    }

    /// Latest hand height in [0, 1], or `None` without a hand
    fn poll(&mut self) -> Result<Option<f32>, GestureError>;

    /// Release devices. Called once when the match ends.
    fn release(&mut self) {}
}

impl<G: GestureSource + ?Sized> GestureSource for Box<G> {
    fn acquire(&mut self) -> Result<(), GestureError> {
        (**self).acquire()
    }

    fn poll(&mut self) -> Result<Option<f32>, GestureError> {
        (**self).poll()
    }

    fn release(&mut self) {
        (**self).release()
    }
}
