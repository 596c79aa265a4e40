//! Terminal output for rendered frames.
//!
//! [`TerminalRenderer`] remembers the frame it last put on screen. A frame of
//! the same size goes out as a patch of the cell runs that changed; the first
//! frame, and any frame after a resize or [`TerminalRenderer::invalidate`], is
//! a full repaint.

use std::io::{self, Write};
use std::ops::Range;

use anyhow::Result;
use crossterm::{
    cursor,
    style::{
        Attribute, Color, Print, ResetColor, SetAttribute, SetBackgroundColor, SetForegroundColor,
    },
    terminal, QueueableCommand,
};

use crate::fb::{Cell, CellStyle, FrameBuffer, Rgb};

/// Raw-mode, alternate-screen terminal output
pub struct TerminalRenderer<W: Write = io::Stdout> {
    out: W,
    shown: Option<FrameBuffer>,
    buf: Vec<u8>,
}

impl TerminalRenderer {
    pub fn new() -> Self {
        Self::with_writer(io::stdout())
    }
}

impl Default for TerminalRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl<W: Write> TerminalRenderer<W> {
    /// Renderer writing escape sequences to `out`
    pub fn with_writer(out: W) -> Self {
        Self {
            out,
            shown: None,
            buf: Vec::with_capacity(64 * 1024),
        }
    }

    pub fn enter(&mut self) -> Result<()> {
        terminal::enable_raw_mode()?;
        self.buf.clear();
        self.buf.queue(terminal::EnterAlternateScreen)?;
        self.buf.queue(cursor::Hide)?;
        self.buf.queue(terminal::DisableLineWrap)?;
        self.flush_buf()
    }

    /// Undo [`TerminalRenderer::enter`]
    pub fn exit(&mut self) -> Result<()> {
        self.buf.clear();
        self.buf.queue(ResetColor)?;
        self.buf.queue(SetAttribute(Attribute::Reset))?;
        self.buf.queue(terminal::EnableLineWrap)?;
        self.buf.queue(cursor::Show)?;
        self.buf.queue(terminal::LeaveAlternateScreen)?;
        self.flush_buf()?;
        terminal::disable_raw_mode()?;
        Ok(())
    }

    /// Terminal size, falling back to 80x24 when it cannot be queried
    pub fn size(&self) -> (u16, u16) {
        terminal::size().unwrap_or((80, 24))
    }

    /// Repaint everything on the next draw (after a resize, for example)
    pub fn invalidate(&mut self) {
        self.shown = None;
    }

    pub fn writer(&self) -> &W {
        &self.out
    }

    /// Put `fb` on screen and hand back the previously shown frame in its place.
    ///
    /// Callers keep one framebuffer, render into it, and pass it in every
    /// frame; the two buffers trade places instead of being cloned.
    pub fn draw_swap(&mut self, fb: &mut FrameBuffer) -> Result<()> {
        self.buf.clear();
        let mut shown = match self.shown.take() {
            Some(prev) if prev.width() == fb.width() && prev.height() == fb.height() => {
                encode_diff_into(&prev, fb, &mut self.buf)?;
                prev
            }
            stale => {
                encode_full_into(fb, &mut self.buf)?;
                let mut prev = stale.unwrap_or_else(|| FrameBuffer::new(0, 0));
                prev.resize(fb.width(), fb.height());
                prev
            }
        };
        self.flush_buf()?;

        std::mem::swap(&mut shown, fb);
        self.shown = Some(shown);
        Ok(())
    }

    fn flush_buf(&mut self) -> Result<()> {
        if !self.buf.is_empty() {
            self.out.write_all(&self.buf)?;
        }
        self.out.flush()?;
        Ok(())
    }
}

/// Encode a clear-and-repaint of the whole frame into `out`
pub fn encode_full_into(fb: &FrameBuffer, out: &mut Vec<u8>) -> Result<()> {
    out.queue(terminal::Clear(terminal::ClearType::All))?;

    let mut pen = Pen::new(out);
    for y in 0..fb.height() {
        pen.paint_run(0, y, fb.row(y))?;
    }
    pen.finish()
}

/// Encode only the cells of `next` that differ from `prev`.
///
/// Frames of different sizes cannot be patched and fall back to
/// [`encode_full_into`]. Nothing is written when the frames are equal.
pub fn encode_diff_into(prev: &FrameBuffer, next: &FrameBuffer, out: &mut Vec<u8>) -> Result<()> {
    if prev.width() != next.width() || prev.height() != next.height() {
        return encode_full_into(next, out);
    }

    let mut pen = Pen::new(out);
    for y in 0..next.height() {
        let row = next.row(y);
        for run in changed_runs(prev.row(y), row) {
            let cells = &row[run.start as usize..run.end as usize];
            pen.paint_run(run.start, y, cells)?;
        }
    }
    pen.finish()
}

/// Column ranges where two equally long rows differ, left to right
fn changed_runs<'a>(before: &'a [Cell], after: &'a [Cell]) -> impl Iterator<Item = Range<u16>> + 'a {
    let width = before.len().min(after.len());
    let differs = move |x: usize| before[x] != after[x];
    let mut x = 0;

    std::iter::from_fn(move || {
        while x < width && !differs(x) {
            x += 1;
        }
        if x >= width {
            return None;
        }
        let start = x;
        while x < width && differs(x) {
            x += 1;
        }
        Some(start as u16..x as u16)
    })
}

/// Writes cells while tracking the terminal's cursor and active style, so
/// repeated moves and style changes are left out.
struct Pen<'a> {
    out: &'a mut Vec<u8>,
    style: Option<CellStyle>,
    cursor: Option<(u16, u16)>,
    painted: bool,
}

impl<'a> Pen<'a> {
    fn new(out: &'a mut Vec<u8>) -> Self {
        Self {
            out,
            style: None,
            cursor: None,
            painted: false,
        }
    }

    fn paint_run(&mut self, x: u16, y: u16, cells: &[Cell]) -> Result<()> {
        if cells.is_empty() {
            return Ok(());
        }
        if self.cursor != Some((x, y)) {
            self.out.queue(cursor::MoveTo(x, y))?;
        }
        for cell in cells {
            self.set_style(cell.style)?;
            self.out.queue(Print(cell.ch))?;
        }
        self.cursor = Some((x.saturating_add(cells.len() as u16), y));
        self.painted = true;
        Ok(())
    }

    fn set_style(&mut self, style: CellStyle) -> Result<()> {
        let current = self.style;
        if current.map(|s| s.fg) != Some(style.fg) {
            self.out.queue(SetForegroundColor(to_color(style.fg)))?;
        }
        if current.map(|s| s.bg) != Some(style.bg) {
            self.out.queue(SetBackgroundColor(to_color(style.bg)))?;
        }
        if current.map(|s| (s.bold, s.dim)) != Some((style.bold, style.dim)) {
            // Bold and dim share one reset.
            self.out.queue(SetAttribute(Attribute::NormalIntensity))?;
            if style.bold {
                self.out.queue(SetAttribute(Attribute::Bold))?;
            }
            if style.dim {
                self.out.queue(SetAttribute(Attribute::Dim))?;
            }
        }
        self.style = Some(style);
        Ok(())
    }

    fn finish(self) -> Result<()> {
        if self.painted {
            self.out.queue(ResetColor)?;
            self.out.queue(SetAttribute(Attribute::Reset))?;
        }
        Ok(())
    }
}

fn to_color(rgb: Rgb) -> Color {
    Color::Rgb {
        r: rgb.r,
        g: rgb.g,
        b: rgb.b,
    }
}
