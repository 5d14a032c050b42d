// Copyright (c) 2026 rezky_nightky

use crate::palette::Hsl;

/// One drawing instruction in canvas pixel space, in paint order.
#[derive(Clone, Debug, PartialEq)]
pub enum DrawCommand {
    Clear {
        color: Hsl,
    },
    Glyph {
        x: f64,
        y: f64,
        text: &'static str,
        size: f64,
        color: Hsl,
        alpha: f64,
        rotation: f64,
        /// Applied after rotation, in the rotated frame.
        offset: (f64, f64),
        scale: (f64, f64),
    },
    Path {
        points: Vec<(f64, f64)>,
        color: Hsl,
        alpha: f64,
        width: f64,
    },
}

/// Size of the drawing surface in canvas pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Canvas {
    pub width: f64,
    pub height: f64,
}

impl Canvas {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    pub fn is_degenerate(&self) -> bool {
        !(self.width > 0.0 && self.height > 0.0)
    }

    pub fn center(&self) -> (f64, f64) {
        (self.width / 2.0, self.height / 2.0)
    }
}
