//! Text-mode display for headless runs
//!
//! Rasterizes every Nth frame to any `Write` sink. Keys arrive over a
//! channel fed by whoever owns the keyboard; a dropped channel means the
//! terminal went away and counts as a quit event.

use std::io::Write;
use std::sync::mpsc::{Receiver, TryRecvError};

use super::{Canvas, DisplayError, Frame, Renderer};
use crate::sim::Score;

const CLEAR_SCREEN: &str = "\x1b[2J\x1b[H";

pub struct TerminalDisplay<W: Write> {
    out: W,
    canvas: Canvas,
    /// Draw every Nth frame; 0 disables drawing
    render_every: u64,
    ansi: bool,
    keys: Option<Receiver<char>>,
    pressed: Vec<char>,
    disconnected: bool,
    frames: u64,
    last_score: Score,
}

impl<W: Write> TerminalDisplay<W> {
    pub fn new(out: W, cols: usize, rows: usize, render_every: u64) -> Self {
        Self {
            out,
            canvas: Canvas::new(cols, rows),
            render_every,
            ansi: false,
            keys: None,
            pressed: Vec::new(),
            disconnected: false,
            frames: 0,
            last_score: Score::default(),
        }
    }

    /// Clear the screen before each drawn frame
    pub fn with_ansi(mut self, ansi: bool) -> Self {
        self.ansi = ansi;
        self
    }

    /// Attach a keyboard feed
    pub fn with_keys(mut self, keys: Receiver<char>) -> Self {
        self.keys = Some(keys);
        self
    }

    /// Frames presented so far
    pub fn frames(&self) -> u64 {
        self.frames
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn drain_keys(&mut self) {
        let Some(keys) = &self.keys else {
            return;
        };
        loop {
            match keys.try_recv() {
                Ok(c) => self.pressed.push(c),
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    self.disconnected = true;
                    break;
                }
            }
        }
    }
}

impl<W: Write> Renderer for TerminalDisplay<W> {
    fn open(&mut self) -> Result<(), DisplayError> {
        log::info!(
            "Terminal display {}x{} (drawing every {} frames)",
            self.canvas.cols(),
            self.canvas.rows(),
            self.render_every
        );
        Ok(())
    }

    fn quit_requested(&mut self) -> bool {
        self.drain_keys();
        self.disconnected
    }

    fn present(&mut self, frame: &Frame) -> Result<(), DisplayError> {
        self.frames += 1;

        if frame.score != self.last_score {
            log::info!("{}", frame.score.label());
            self.last_score = frame.score;
        }

        if self.render_every == 0 || self.frames % self.render_every != 0 {
            return Ok(());
        }

        self.canvas.draw(frame);
        if self.ansi {
            write!(self.out, "{}", CLEAR_SCREEN)?;
        }
        writeln!(self.out, "{}", self.canvas)?;
        self.out.flush()?;
        Ok(())
    }

    fn key_pressed(&mut self, key: char) -> bool {
        self.drain_keys();
        let hit = self.pressed.contains(&key);
        self.pressed.clear();
        hit
    }

    fn close(&mut self) {
        if let Err(e) = self.out.flush() {
            log::warn!("Terminal flush on close failed: {}", e);
        }
        log::info!("Terminal display closed after {} frames", self.frames);
    }
}
