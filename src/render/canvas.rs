//! Software rasterizer into a character grid

use std::fmt;

use glam::Vec2;

use super::{DrawCommand, Frame};

const BLANK: char = ' ';
const BALL: char = 'O';
const PADDLE: char = '#';

/// Character-cell canvas covering the whole field
#[derive(Debug, Clone)]
pub struct Canvas {
    cols: usize,
    rows: usize,
    cells: Vec<char>,
    /// Field units per cell
    cell_size: Vec2,
}

impl Canvas {
    pub fn new(cols: usize, rows: usize) -> Self {
        let cols = cols.max(1);
        let rows = rows.max(1);
        Self {
            cols,
            rows,
            cells: vec![BLANK; cols * rows],
            cell_size: Vec2::ONE,
        }
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Character at (col, row), `None` outside the grid
    pub fn get(&self, col: usize, row: usize) -> Option<char> {
        (col < self.cols && row < self.rows).then(|| self.cells[row * self.cols + col])
    }

    fn set(&mut self, col: usize, row: usize, c: char) {
        if col < self.cols && row < self.rows {
            self.cells[row * self.cols + col] = c;
        }
    }

    fn fill(&mut self, c: char) {
        self.cells.fill(c);
    }

    /// Cell containing a field point, `None` when off the field
    fn cell_at(&self, p: Vec2) -> Option<(usize, usize)> {
        let cell = (p / self.cell_size).floor();
        if cell.x < 0.0 || cell.y < 0.0 {
            return None;
        }
        let (col, row) = (cell.x as usize, cell.y as usize);
        (col < self.cols && row < self.rows).then_some((col, row))
    }

    /// Inclusive cell range covering [start, end) along one axis
    fn span(start: f32, end: f32, cell: f32, limit: usize) -> Option<(usize, usize)> {
        let first = (start / cell).floor().max(0.0);
        let last = ((end / cell).ceil() - 1.0).min(limit as f32 - 1.0);
        (last >= first).then_some((first as usize, last as usize))
    }

    /// Rasterize every command of `frame` in order
    pub fn draw(&mut self, frame: &Frame) {
        self.cell_size = frame.field_size / Vec2::new(self.cols as f32, self.rows as f32);

        for command in &frame.commands {
            match command {
                DrawCommand::Clear(_) => self.fill(BLANK),
                DrawCommand::Circle { center, radius, .. } => self.draw_circle(*center, *radius),
                DrawCommand::Rect { pos, size, .. } => self.draw_rect(*pos, *size),
                DrawCommand::Text { text, anchor, .. } => self.draw_text(text, *anchor),
            }
        }
    }

    fn draw_circle(&mut self, center: Vec2, radius: f32) {
        // A ball smaller than a cell still shows up
        if let Some((col, row)) = self.cell_at(center) {
            self.set(col, row, BALL);
        }

        let lo = center - Vec2::splat(radius);
        let hi = center + Vec2::splat(radius);
        let (Some(cols), Some(rows)) = (
            Self::span(lo.x, hi.x, self.cell_size.x, self.cols),
            Self::span(lo.y, hi.y, self.cell_size.y, self.rows),
        ) else {
            return;
        };
        for row in rows.0..=rows.1 {
            for col in cols.0..=cols.1 {
                let cell_center = (Vec2::new(col as f32, row as f32) + 0.5) * self.cell_size;
                if cell_center.distance(center) <= radius {
                    self.set(col, row, BALL);
                }
            }
        }
    }

    fn draw_rect(&mut self, pos: Vec2, size: Vec2) {
        let end = pos + size;
        let (Some(cols), Some(rows)) = (
            Self::span(pos.x, end.x, self.cell_size.x, self.cols),
            Self::span(pos.y, end.y, self.cell_size.y, self.rows),
        ) else {
            return;
        };
        for row in rows.0..=rows.1 {
            for col in cols.0..=cols.1 {
                self.set(col, row, PADDLE);
            }
        }
    }

    fn draw_text(&mut self, text: &str, anchor: Vec2) {
        let row = (anchor.y / self.cell_size.y).floor();
        if row < 0.0 {
            return;
        }
        let len = text.chars().count() as isize;
        let start = (anchor.x / self.cell_size.x).floor() as isize - len / 2;
        for (i, c) in text.chars().enumerate() {
            let col = start + i as isize;
            if col >= 0 {
                self.set(col as usize, row as usize, c);
            }
        }
    }
}

impl fmt::Display for Canvas {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let border: String = std::iter::repeat_n('-', self.cols).collect();
        writeln!(f, "+{}+", border)?;
        for row in self.cells.chunks_exact(self.cols) {
            let line: String = row.iter().collect();
            writeln!(f, "|{}|", line)?;
        }
        write!(f, "+{}+", border)
    }
}
