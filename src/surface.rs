/// Drawing layer — all terminal output lives here.
///
/// The game draws in playfield pixels through the `Surface` trait.  The
/// crossterm implementation scales those pixels onto the character grid:
/// stretched over the whole terminal in fullscreen mode, otherwise
/// letterboxed to keep the playfield's aspect ratio.

use std::io::{self, Write};

use crossterm::{
    cursor,
    style::{self, Color, Print},
    terminal, QueueableCommand,
};

use crate::entities::Rect;

/// Render/text target used by the game loop and the menu.
pub trait Surface {
    fn clear(&mut self, color: Color) -> io::Result<()>;
    fn fill_rect(&mut self, rect: Rect, color: Color) -> io::Result<()>;
    fn draw_text(&mut self, text: &str, x: i32, y: i32, color: Color) -> io::Result<()>;
    fn present(&mut self) -> io::Result<()>;

    /// Playfield size in pixels and whether it should fill the whole output.
    fn set_playfield(&mut self, _width: i32, _height: i32, _fullscreen: bool) {}

    /// Output size changed (terminal columns × rows).
    fn resize(&mut self, _cols: u16, _rows: u16) {}
}

// ── Viewport maths ───────────────────────────────────────────────────────────

/// Block of terminal cells the playfield is mapped onto.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Viewport {
    pub col: u16,
    pub row: u16,
    pub cols: u16,
    pub rows: u16,
}

/// Character cells are taken to be twice as tall as they are wide.
pub fn fit_viewport(cols: u16, rows: u16, width: i32, height: i32, fullscreen: bool) -> Viewport {
    let full = Viewport { col: 0, row: 0, cols, rows };
    if fullscreen || width <= 0 || height <= 0 || cols == 0 || rows == 0 {
        return full;
    }

    let (c, r) = (cols as i64, rows as i64);
    let (w, h) = (width as i64, height as i64);

    // Columns needed to keep the aspect ratio at full height.
    let cols_at_full_height = r * 2 * w / h;
    let (vc, vr) = if cols_at_full_height <= c {
        (cols_at_full_height.max(1), r)
    } else {
        (c, (c * h / (2 * w)).clamp(1, r))
    };

    Viewport {
        col: ((c - vc) / 2) as u16,
        row: ((r - vr) / 2) as u16,
        cols: vc as u16,
        rows: vr as u16,
    }
}

fn scale(value: i32, world: i32, cells: u16) -> u16 {
    if world <= 0 {
        return 0;
    }
    (value.clamp(0, world) as i64 * cells as i64 / world as i64) as u16
}

/// Map a pixel span `[start, start + len)` to a cell span, at least one cell wide.
fn cell_span(start: i32, len: i32, world: i32, cells: u16) -> Option<(u16, u16)> {
    if len <= 0 || cells == 0 {
        return None;
    }
    let first = scale(start, world, cells).min(cells - 1);
    let end = scale(start + len, world, cells).clamp(first + 1, cells);
    Some((first, end - first))
}

// ── Terminal implementation ──────────────────────────────────────────────────

pub struct TerminalSurface<W: Write> {
    out: W,
    cols: u16,
    rows: u16,
    width: i32,
    height: i32,
    fullscreen: bool,
    viewport: Viewport,
}

impl<W: Write> TerminalSurface<W> {
    pub fn new(out: W, cols: u16, rows: u16, width: i32, height: i32, fullscreen: bool) -> Self {
        Self {
            out,
            cols,
            rows,
            width,
            height,
            fullscreen,
            viewport: fit_viewport(cols, rows, width, height, fullscreen),
        }
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// Absolute `(col, row, cols, rows)` covered by `rect`, if any.
    pub fn cell_rect(&self, rect: Rect) -> Option<(u16, u16, u16, u16)> {
        let vp = self.viewport;
        let (c, w) = cell_span(rect.x, rect.w, self.width, vp.cols)?;
        let (r, h) = cell_span(rect.y, rect.h, self.height, vp.rows)?;
        Some((vp.col + c, vp.row + r, w, h))
    }

    /// Absolute cell of a pixel position, clamped into the viewport.
    pub fn cell_at(&self, x: i32, y: i32) -> (u16, u16) {
        let vp = self.viewport;
        let c = scale(x, self.width, vp.cols).min(vp.cols.saturating_sub(1));
        let r = scale(y, self.height, vp.rows).min(vp.rows.saturating_sub(1));
        (vp.col + c, vp.row + r)
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn refit(&mut self) {
        self.viewport = fit_viewport(self.cols, self.rows, self.width, self.height, self.fullscreen);
    }
}

impl<W: Write> Surface for TerminalSurface<W> {
    fn clear(&mut self, color: Color) -> io::Result<()> {
        self.out.queue(style::ResetColor)?;
        self.out.queue(terminal::Clear(terminal::ClearType::All))?;

        // Paint the playfield so the letterbox is visible.
        let vp = self.viewport;
        let blank = " ".repeat(vp.cols as usize);
        self.out.queue(style::SetBackgroundColor(color))?;
        for row in 0..vp.rows {
            self.out.queue(cursor::MoveTo(vp.col, vp.row + row))?;
            self.out.queue(Print(&blank))?;
        }
        Ok(())
    }

    fn fill_rect(&mut self, rect: Rect, color: Color) -> io::Result<()> {
        let Some((col, row, w, h)) = self.cell_rect(rect) else {
            return Ok(());
        };
        let block = "█".repeat(w as usize);
        self.out.queue(style::SetForegroundColor(color))?;
        for dy in 0..h {
            self.out.queue(cursor::MoveTo(col, row + dy))?;
            self.out.queue(Print(&block))?;
        }
        Ok(())
    }

    fn draw_text(&mut self, text: &str, x: i32, y: i32, color: Color) -> io::Result<()> {
        let (col, row) = self.cell_at(x, y);
        let room = (self.viewport.col + self.viewport.cols).saturating_sub(col) as usize;
        let clipped: String = text.chars().take(room).collect();
        self.out.queue(cursor::MoveTo(col, row))?;
        self.out.queue(style::SetForegroundColor(color))?;
        self.out.queue(Print(clipped))?;
        Ok(())
    }

    fn present(&mut self) -> io::Result<()> {
        // Park cursor in a harmless spot and flush
        self.out.queue(style::ResetColor)?;
        self.out.queue(cursor::MoveTo(0, self.rows.saturating_sub(1)))?;
        self.out.flush()
    }

    fn set_playfield(&mut self, width: i32, height: i32, fullscreen: bool) {
        self.width = width;
        self.height = height;
        self.fullscreen = fullscreen;
        self.refit();
    }

    fn resize(&mut self, cols: u16, rows: u16) {
        self.cols = cols;
        self.rows = rows;
        self.refit();
    }
}
