// Copyright (c) 2026 rezky_nightky

use std::io::{stdout, Result, Stdout, Write};

use crossterm::{
    cursor, event,
    style::{
        Attribute, Color, Print, ResetColor, SetAttribute, SetBackgroundColor, SetForegroundColor,
    },
    terminal, ExecutableCommand, QueueableCommand,
};

use crate::cell::Cell;
use crate::frame::Frame;

/// What the terminal is currently showing.
struct LastFrame {
    width: u16,
    height: u16,
    cells: Vec<Cell>,
}

impl LastFrame {
    fn new(width: u16, height: u16) -> Self {
        let len = width as usize * height as usize;
        Self {
            width,
            height,
            cells: vec![Cell::blank_with_bg(None); len],
        }
    }
}

/// Current SGR state, so unchanged attributes are not re-sent.
#[derive(Default)]
struct Pen {
    fg: Option<Color>,
    bg: Option<Color>,
    bold: bool,
}

impl Pen {
    fn apply<W: Write>(&mut self, out: &mut W, cell: &Cell) -> Result<()> {
        if cell.fg != self.fg {
            out.queue(SetForegroundColor(cell.fg.unwrap_or(Color::Reset)))?;
            self.fg = cell.fg;
        }
        if cell.bg != self.bg {
            out.queue(SetBackgroundColor(cell.bg.unwrap_or(Color::Reset)))?;
            self.bg = cell.bg;
        }
        if cell.bold != self.bold {
            out.queue(SetAttribute(if cell.bold {
                Attribute::Bold
            } else {
                Attribute::NormalIntensity
            }))?;
            self.bold = cell.bold;
        }
        Ok(())
    }
}

/// Diffs frames against what was last written and emits only the changes.
pub struct Screen<W: Write> {
    out: W,
    last: Option<LastFrame>,
    run_buf: String,
    row_dirty: Vec<Vec<usize>>,
    touched_rows: Vec<u16>,
}

impl<W: Write> Screen<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            last: None,
            run_buf: String::with_capacity(64),
            row_dirty: Vec::new(),
            touched_rows: Vec::new(),
        }
    }

    pub fn draw(&mut self, frame: &mut Frame) -> Result<()> {
        let resized = self
            .last
            .as_ref()
            .map(|l| l.width != frame.width || l.height != frame.height)
            .unwrap_or(true);

        let total_cells = frame.width as usize * frame.height as usize;
        let dirty_is_large =
            total_cells > 0 && frame.dirty_indices().len() >= (total_cells / 3);

        if resized || frame.is_dirty_all() || dirty_is_large {
            self.redraw_all(frame, resized)?;
        } else {
            self.redraw_dirty(frame)?;
        }

        self.out.queue(SetAttribute(Attribute::Reset))?;
        self.out.queue(ResetColor)?;
        self.out.flush()?;
        frame.clear_dirty();
        Ok(())
    }

    fn redraw_all(&mut self, frame: &Frame, resized: bool) -> Result<()> {
        if resized {
            self.out.queue(terminal::Clear(terminal::ClearType::All))?;
        }
        if resized || self.last.is_none() {
            self.last = Some(LastFrame::new(frame.width, frame.height));
        }
        let Some(last) = self.last.as_mut() else {
            return Ok(());
        };

        let mut pen = Pen::default();
        for y in 0..frame.height {
            self.out.queue(cursor::MoveTo(0, y))?;
            for x in 0..frame.width {
                let idx = y as usize * frame.width as usize + x as usize;
                let cell = frame.cell_at_index(idx);
                pen.apply(&mut self.out, &cell)?;
                self.out.queue(Print(cell.ch))?;
                last.cells[idx] = cell;
            }
        }
        Ok(())
    }

    /// Rewrites changed cells row by row, batching same-style neighbours
    /// into one print.
    fn redraw_dirty(&mut self, frame: &Frame) -> Result<()> {
        let Some(last) = self.last.as_mut() else {
            return Ok(());
        };
        let width = frame.width as usize;

        if self.row_dirty.len() != frame.height as usize {
            self.row_dirty = vec![Vec::new(); frame.height as usize];
        }
        self.touched_rows.clear();
        for &idx in frame.dirty_indices() {
            let y = idx / width;
            let Some(row) = self.row_dirty.get_mut(y) else {
                continue;
            };
            if row.is_empty() {
                self.touched_rows.push(y as u16);
            }
            row.push(idx);
        }
        self.touched_rows.sort_unstable();

        let mut pen = Pen::default();
        let mut cur_pos: Option<(u16, u16)> = None;
        for &y in &self.touched_rows {
            let row = &mut self.row_dirty[y as usize];
            row.sort_unstable();
            row.dedup();

            let mut i = 0usize;
            while i < row.len() {
                let idx0 = row[i];
                let cell0 = frame.cell_at_index(idx0);
                if last.cells.get(idx0) == Some(&cell0) {
                    i += 1;
                    continue;
                }
                last.cells[idx0] = cell0;

                self.run_buf.clear();
                self.run_buf.push(cell0.ch);
                let mut run_len: u16 = 1;
                let mut j = i + 1;
                while j < row.len() && row[j] == row[j - 1] + 1 {
                    let cell1 = frame.cell_at_index(row[j]);
                    if last.cells.get(row[j]) == Some(&cell1)
                        || (cell1.fg, cell1.bg, cell1.bold) != (cell0.fg, cell0.bg, cell0.bold)
                    {
                        break;
                    }
                    self.run_buf.push(cell1.ch);
                    last.cells[row[j]] = cell1;
                    run_len = run_len.saturating_add(1);
                    j += 1;
                }

                let x0 = (idx0 % width) as u16;
                if cur_pos != Some((x0, y)) {
                    self.out.queue(cursor::MoveTo(x0, y))?;
                }
                pen.apply(&mut self.out, &cell0)?;
                self.out.queue(Print(self.run_buf.as_str()))?;

                let next_x = x0.saturating_add(run_len);
                cur_pos = (next_x < frame.width).then_some((next_x, y));
                i = j;
            }
            row.clear();
        }
        Ok(())
    }

    #[cfg(test)]
    fn output(&self) -> &W {
        &self.out
    }
}

/// The real terminal: raw mode, alternate screen, hidden cursor.
pub struct Terminal {
    screen: Screen<Stdout>,
}

impl Terminal {
    pub fn new() -> Result<Self> {
        let mut out = stdout();
        terminal::enable_raw_mode()?;
        let init_res: Result<()> = (|| {
            out.execute(terminal::EnterAlternateScreen)?;
            out.execute(cursor::Hide)?;
            let _ = out.execute(terminal::DisableLineWrap);
            out.execute(SetAttribute(Attribute::Reset))?;
            out.execute(ResetColor)?;
            out.execute(terminal::Clear(terminal::ClearType::All))?;
            out.flush()?;
            Ok(())
        })();
        if let Err(e) = init_res {
            restore_terminal_best_effort();
            return Err(e);
        }
        Ok(Self {
            screen: Screen::new(out),
        })
    }

    pub fn size(&self) -> Result<(u16, u16)> {
        terminal::size()
    }

    pub fn poll_event(timeout: std::time::Duration) -> Result<bool> {
        event::poll(timeout)
    }

    pub fn read_event() -> Result<event::Event> {
        event::read()
    }

    pub fn draw(&mut self, frame: &mut Frame) -> Result<()> {
        self.screen.draw(frame)
    }
}

impl Drop for Terminal {
    fn drop(&mut self) {
        restore_terminal_best_effort();
    }
}

pub fn restore_terminal_best_effort() {
    let mut out = stdout();
    let _ = out.execute(SetAttribute(Attribute::Reset));
    let _ = out.execute(ResetColor);
    let _ = out.execute(cursor::Show);
    let _ = out.execute(terminal::EnableLineWrap);
    let _ = out.execute(terminal::LeaveAlternateScreen);
    let _ = terminal::disable_raw_mode();
    let _ = out.flush();
}
