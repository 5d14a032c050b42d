// Copyright (c) 2026 rezky_nightky

use crossterm::style::Color;

use crate::cell::{Cell, CellSize};
use crate::draw::DrawCommand;
use crate::palette::{Hsl, Palette};

/// Glyphs this much taller than a cell render bold.
const BOLD_SIZE_RATIO: f64 = 1.25;
/// Glitch stretch past this on either axis renders bold.
const BOLD_SCALE: f64 = 1.1;
const THIN_STROKE: char = '·';
const WIDE_STROKE: char = '•';

#[derive(Clone, Debug)]
pub struct Frame {
    pub width: u16,
    pub height: u16,
    pub cells: Vec<Cell>,
    palette: Palette,
    gen: u32,
    cell_gen: Vec<u32>,
    blank: Cell,
    dirty_all: bool,
    dirty_map: Vec<bool>,
    dirty: Vec<usize>,
    /// Cells written since the last clear.
    written: Vec<usize>,
}

impl Frame {
    pub fn new(width: u16, height: u16, palette: Palette) -> Self {
        let len = width as usize * height as usize;
        let blank = Cell::blank_with_bg(palette.bg);
        let gen = 1u32;
        Self {
            width,
            height,
            cells: vec![blank; len],
            palette,
            gen,
            cell_gen: vec![gen; len],
            blank,
            dirty_all: true,
            dirty_map: vec![false; len],
            dirty: Vec::new(),
            written: Vec::new(),
        }
    }

    /// Reallocates the grid for a new terminal size and repaints `last` onto
    /// it, so a paused animation still shows a whole picture.
    pub fn resize(&mut self, width: u16, height: u16, last: &[DrawCommand], cell: CellSize) {
        *self = Self::new(width, height, self.palette);
        self.render(last, cell);
    }

    /// Blanks every cell. Only cells written since the previous clear are
    /// marked dirty unless the background itself changed.
    pub fn clear_with_bg(&mut self, bg: Option<Color>) {
        let blank = Cell::blank_with_bg(bg);
        if blank != self.blank {
            self.blank = blank;
            self.dirty_all = true;
            self.dirty.clear();
        } else if !self.dirty_all {
            for i in std::mem::take(&mut self.written) {
                self.mark_dirty(i);
            }
        }
        self.written.clear();

        self.gen = self.gen.wrapping_add(1);
        if self.gen == 0 {
            self.cell_gen.fill(0);
            self.gen = 1;
        }
    }

    pub fn is_dirty_all(&self) -> bool {
        self.dirty_all
    }

    pub fn dirty_indices(&self) -> &[usize] {
        &self.dirty
    }

    pub fn clear_dirty(&mut self) {
        if self.dirty_all {
            self.dirty_all = false;
            self.dirty_map.fill(false);
            self.dirty.clear();
            return;
        }

        for &i in &self.dirty {
            if let Some(v) = self.dirty_map.get_mut(i) {
                *v = false;
            }
        }
        self.dirty.clear();
    }

    fn mark_dirty(&mut self, i: usize) {
        if !self.dirty_all && self.dirty_map.get(i).copied() == Some(false) {
            self.dirty_map[i] = true;
            self.dirty.push(i);
        }
    }

    pub fn index(&self, x: u16, y: u16) -> Option<usize> {
        if x >= self.width || y >= self.height {
            return None;
        }
        Some(y as usize * self.width as usize + x as usize)
    }

    #[allow(dead_code)]
    pub fn get(&self, x: u16, y: u16) -> Option<&Cell> {
        self.index(x, y).map(|i| {
            if self.cell_gen.get(i).copied() == Some(self.gen) {
                &self.cells[i]
            } else {
                &self.blank
            }
        })
    }

    pub fn cell_at_index(&self, i: usize) -> Cell {
        if self.cell_gen.get(i).copied() == Some(self.gen) {
            self.cells[i]
        } else {
            self.blank
        }
    }

    pub fn set(&mut self, x: u16, y: u16, cell: Cell) {
        if let Some(i) = self.index(x, y) {
            let fresh = self.cell_gen.get(i).copied() != Some(self.gen);
            let cur = if fresh { self.blank } else { self.cells[i] };
            if fresh {
                self.written.push(i);
            }
            if cur == cell {
                return;
            }

            self.cells[i] = cell;
            if let Some(v) = self.cell_gen.get_mut(i) {
                *v = self.gen;
            }
            self.mark_dirty(i);
        }
    }

    /// Rasterises one tick's draw commands, in order, onto the cells.
    pub fn render(&mut self, commands: &[DrawCommand], cell: CellSize) {
        for cmd in commands {
            match cmd {
                DrawCommand::Clear { color } => {
                    self.palette = Palette::new(self.palette.mode, *color);
                    self.clear_with_bg(self.palette.bg);
                }
                DrawCommand::Glyph {
                    x,
                    y,
                    text,
                    size,
                    color,
                    alpha,
                    rotation,
                    offset,
                    scale,
                } => {
                    let (s, c) = rotation.sin_cos();
                    let px = x + offset.0 * c - offset.1 * s;
                    let py = y + offset.0 * s + offset.1 * c;
                    let Some((col, row)) = cell.locate(px, py) else {
                        continue;
                    };
                    let bold = *size >= cell.height * BOLD_SIZE_RATIO
                        || scale.0 > BOLD_SCALE
                        || scale.1 > BOLD_SCALE;
                    self.put_text(col, row, text, *color, *alpha, bold);
                }
                DrawCommand::Path {
                    points,
                    color,
                    alpha,
                    width,
                } => {
                    let ch = if *width > cell.width * 0.5 {
                        WIDE_STROKE
                    } else {
                        THIN_STROKE
                    };
                    self.stroke(points, cell, ch, *color, *alpha);
                }
            }
        }
    }

    /// Writes `text` centred on the cell at `col`, `row`.
    fn put_text(&mut self, col: i64, row: i64, text: &str, color: Hsl, alpha: f64, bold: bool) {
        let fg = self.palette.fg(color, alpha);
        let len = text.chars().count() as i64;
        let start = col - len / 2;
        for (i, ch) in text.chars().enumerate() {
            self.put(start + i as i64, row, ch, fg, bold);
        }
    }

    fn put(&mut self, col: i64, row: i64, ch: char, fg: Option<Color>, bold: bool) {
        let (Ok(x), Ok(y)) = (u16::try_from(col), u16::try_from(row)) else {
            return;
        };
        let bg = self.blank.bg;
        self.set(x, y, Cell { ch, fg, bg, bold });
    }

    fn stroke(&mut self, points: &[(f64, f64)], cell: CellSize, ch: char, color: Hsl, alpha: f64) {
        let fg = self.palette.fg(color, alpha);
        let cells: Vec<(i64, i64)> = points
            .iter()
            .filter_map(|&(x, y)| cell.locate(x, y))
            .collect();

        match cells.as_slice() {
            [] => {}
            [only] => self.put(only.0, only.1, ch, fg, false),
            _ => {
                for pair in cells.windows(2) {
                    for (x, y) in line(pair[0], pair[1]) {
                        self.put(x, y, ch, fg, false);
                    }
                }
            }
        }
    }
}

/// Bresenham cells from `a` to `b`, both ends included.
pub fn line(a: (i64, i64), b: (i64, i64)) -> Vec<(i64, i64)> {
    let (mut x, mut y) = a;
    let dx = (b.0 - x).abs();
    let dy = -(b.1 - y).abs();
    let sx = if x < b.0 { 1 } else { -1 };
    let sy = if y < b.1 { 1 } else { -1 };
    let mut err = dx + dy;

    let mut out = Vec::with_capacity((dx.max(-dy) + 1) as usize);
    loop {
        out.push((x, y));
        if (x, y) == b {
            break;
        }
        let e2 = 2 * err;
        if e2 >= dy {
            err += dy;
            x += sx;
        }
        if e2 <= dx {
            err += dx;
            y += sy;
        }
    }
    out
}
