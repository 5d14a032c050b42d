// Copyright (c) 2026 rezky_nightky

use crossterm::style::Color;

use crate::draw::Canvas;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Cell {
    pub ch: char,
    pub fg: Option<Color>,
    pub bg: Option<Color>,
    pub bold: bool,
}

impl Cell {
    pub fn blank_with_bg(bg: Option<Color>) -> Self {
        Self {
            ch: ' ',
            fg: None,
            bg,
            bold: false,
        }
    }
}

/// Virtual canvas pixels covered by one terminal cell.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CellSize {
    pub width: f64,
    pub height: f64,
}

impl CellSize {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Canvas spanned by a `cols` x `rows` terminal.
    pub fn canvas(&self, cols: u16, rows: u16) -> Canvas {
        Canvas::new(cols as f64 * self.width, rows as f64 * self.height)
    }

    /// Cell column and row under a canvas point; may lie off screen.
    pub fn locate(&self, x: f64, y: f64) -> Option<(i64, i64)> {
        if !(x.is_finite() && y.is_finite()) {
            return None;
        }
        Some((
            (x / self.width).floor() as i64,
            (y / self.height).floor() as i64,
        ))
    }
}

impl Default for CellSize {
    fn default() -> Self {
        Self::new(8.0, 16.0)
    }
}
