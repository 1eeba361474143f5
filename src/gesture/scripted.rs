//! Replay a fixed sequence of hand readings

use std::collections::VecDeque;

use super::{GestureError, GestureSource};

/// What a script does once its readings run out
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScriptEnd {
    /// Report "no hand" forever
    #[default]
    NoHand,
    /// Fail like a camera that stopped delivering frames
    CaptureFailure,
}

/// Gesture source replaying recorded readings, one per tick
#[derive(Debug, Clone, Default)]
pub struct ScriptedGesture {
    readings: VecDeque<Option<f32>>,
    end: ScriptEnd,
    polls: usize,
    acquired: usize,
    released: usize,
}

impl ScriptedGesture {
    pub fn new(readings: impl IntoIterator<Item = Option<f32>>, end: ScriptEnd) -> Self {
        Self {
            readings: readings.into_iter().collect(),
            end,
            ..Default::default()
        }
    }

    /// Readings not yet replayed
    pub fn remaining(&self) -> usize {
        self.readings.len()
    }

    pub fn polls(&self) -> usize {
        self.polls
    }

    /// Times `acquire` was called
    pub fn acquire_count(&self) -> usize {
        self.acquired
    }

    /// Times `release` was called
    pub fn release_count(&self) -> usize {
        self.released
    }
}

impl GestureSource for ScriptedGesture {
    fn acquire(&mut self) -> Result<(), GestureError> {
        self.acquired += 1;
        Ok(())
    }

    fn poll(&mut self) -> Result<Option<f32>, GestureError> {
        self.polls += 1;
        match self.readings.pop_front() {
            Some(reading) => Ok(reading),
            None => match self.end {
                ScriptEnd::NoHand => Ok(None),
                ScriptEnd::CaptureFailure => Err(GestureError::FrameGrab),
            },
        }
    }

    fn release(&mut self) {
        self.released += 1;
    }
}
