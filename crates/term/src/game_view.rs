//! GameView: maps a `core::SessionSnapshot` into a terminal framebuffer.
//!
//! This module is pure (no I/O). It only reads the snapshot, so it can be
//! unit-tested against hand-built sessions.

use crate::core::tetromino::rotation_table;
use crate::core::{CellSnapshot, SessionSnapshot};
use crate::fb::{CellStyle, FrameBuffer, Rgb};
use crate::types::BlockKind;

/// Terminal viewport dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub width: u16,
    pub height: u16,
}

impl Viewport {
    pub fn new(width: u16, height: u16) -> Self {
        Self { width, height }
    }
}

const BOARD_BG: Rgb = Rgb::new(30, 30, 40);
const PANEL_BG: Rgb = Rgb::new(0, 0, 0);

/// Text shown over the board when the game has ended
pub const GAME_OVER_TEXT: &str = "GAME OVER";

/// Text shown instead of the board while paused
pub const PAUSE_TEXT: &str = "PAUSE";

/// Block colour per kind
pub fn kind_color(kind: BlockKind) -> Rgb {
    match kind {
        BlockKind::O => Rgb::new(240, 220, 80),
        BlockKind::I => Rgb::new(80, 220, 220),
        BlockKind::T => Rgb::new(200, 120, 220),
        BlockKind::L => Rgb::new(255, 165, 0),
        BlockKind::J => Rgb::new(80, 120, 220),
        BlockKind::S => Rgb::new(100, 220, 120),
        BlockKind::Z => Rgb::new(220, 80, 80),
    }
}

/// A lightweight terminal renderer for a session.
pub struct GameView {
    /// Board cell width in terminal columns.
    cell_w: u16,
    /// Board cell height in terminal rows.
    cell_h: u16,
}

impl Default for GameView {
    fn default() -> Self {
        // 2x1 helps compensate for typical terminal glyph aspect ratio.
        Self {
            cell_w: 2,
            cell_h: 1,
        }
    }
}

impl GameView {
    pub fn new(cell_w: u16, cell_h: u16) -> Self {
        Self {
            cell_w: cell_w.max(1),
            cell_h: cell_h.max(1),
        }
    }

    /// Render the snapshot into an existing framebuffer.
    ///
    /// Callers can reuse one framebuffer across frames; it is only
    /// reallocated when the viewport grows.
    pub fn render_into(&self, snap: &SessionSnapshot, viewport: Viewport, fb: &mut FrameBuffer) {
        fb.resize(viewport.width, viewport.height);
        fb.clear(CellStyle::default().into_cell(' '));

        let board_px_w = snap.columns * self.cell_w;
        let board_px_h = snap.rows * self.cell_h;
        let frame_w = board_px_w + 2;
        let frame_h = board_px_h + 2;

        let start_x = viewport.width.saturating_sub(frame_w) / 2;
        let start_y = viewport.height.saturating_sub(frame_h) / 2;

        let border = CellStyle::new(Rgb::new(200, 200, 200), PANEL_BG);

        fb.fill_rect(
            start_x + 1,
            start_y + 1,
            board_px_w,
            board_px_h,
            ' ',
            CellStyle::new(Rgb::new(80, 80, 90), BOARD_BG),
        );
        self.draw_border(fb, start_x, start_y, frame_w, frame_h, border);

        // The board stays hidden while paused.
        if !snap.paused() {
            for row in 0..snap.rows {
                for col in 0..snap.columns {
                    match snap.cell(col, row) {
                        Some(cell) => self.draw_settled(fb, start_x, start_y, col, row, cell),
                        None => self.draw_empty_cell(fb, start_x, start_y, col, row),
                    }
                }
            }

            if let Some(active) = snap.active {
                let style = CellStyle::new(kind_color(active.kind), BOARD_BG).bold();
                for coord in active.cells {
                    // Cells above the grid are not drawn.
                    if coord.row < 0 || coord.col < 0 {
                        continue;
                    }
                    let (col, row) = (coord.col as u16, coord.row as u16);
                    if col < snap.columns && row < snap.rows {
                        self.fill_cell_rect(fb, start_x, start_y, col, row, '█', style);
                    }
                }
            }
        }

        self.draw_side_panel(fb, snap, viewport, start_x, start_y, frame_w);

        if snap.paused() {
            self.draw_overlay_text(fb, start_x, start_y, frame_w, frame_h, PAUSE_TEXT);
        } else if snap.game_over() {
            self.draw_overlay_text(fb, start_x, start_y, frame_w, frame_h, GAME_OVER_TEXT);
        }
    }

    /// Convenience helper that allocates a new framebuffer.
    pub fn render(&self, snap: &SessionSnapshot, viewport: Viewport) -> FrameBuffer {
        let mut fb = FrameBuffer::new(viewport.width, viewport.height);
        self.render_into(snap, viewport, &mut fb);
        fb
    }

    fn draw_border(&self, fb: &mut FrameBuffer, x: u16, y: u16, w: u16, h: u16, style: CellStyle) {
        if w < 2 || h < 2 {
            return;
        }

        fb.put_char(x, y, '┌', style);
        fb.put_char(x + w - 1, y, '┐', style);
        fb.put_char(x, y + h - 1, '└', style);
        fb.put_char(x + w - 1, y + h - 1, '┘', style);

        for dx in 1..w - 1 {
            fb.put_char(x + dx, y, '─', style);
            fb.put_char(x + dx, y + h - 1, '─', style);
        }
        for dy in 1..h - 1 {
            fb.put_char(x, y + dy, '│', style);
            fb.put_char(x + w - 1, y + dy, '│', style);
        }
    }

    fn draw_empty_cell(&self, fb: &mut FrameBuffer, start_x: u16, start_y: u16, x: u16, y: u16) {
        let style = CellStyle::new(Rgb::new(90, 90, 100), BOARD_BG).dim();
        self.fill_cell_rect(fb, start_x, start_y, x, y, '·', style);
    }

    fn draw_settled(
        &self,
        fb: &mut FrameBuffer,
        start_x: u16,
        start_y: u16,
        x: u16,
        y: u16,
        cell: &CellSnapshot,
    ) {
        let fg = BOARD_BG.blend(kind_color(cell.kind), cell.opacity);
        let style = CellStyle::new(fg, BOARD_BG);
        self.fill_cell_rect(fb, start_x, start_y, x, y, '█', style);
    }

    fn fill_cell_rect(
        &self,
        fb: &mut FrameBuffer,
        start_x: u16,
        start_y: u16,
        cell_x: u16,
        cell_y: u16,
        ch: char,
        style: CellStyle,
    ) {
        let px = start_x + 1 + cell_x * self.cell_w;
        let py = start_y + 1 + cell_y * self.cell_h;
        fb.fill_rect(px, py, self.cell_w, self.cell_h, ch, style);
    }

    fn draw_side_panel(
        &self,
        fb: &mut FrameBuffer,
        snap: &SessionSnapshot,
        viewport: Viewport,
        start_x: u16,
        start_y: u16,
        frame_w: u16,
    ) {
        let panel_x = start_x.saturating_add(frame_w).saturating_add(2);
        if panel_x >= viewport.width {
            return;
        }
        let panel_w = viewport.width - panel_x;
        if panel_w < 12 {
            return;
        }

        let label = CellStyle::new(Rgb::new(220, 220, 220), PANEL_BG).bold();
        let value = CellStyle::new(Rgb::new(200, 200, 200), PANEL_BG);

        let mut y = start_y;
        fb.put_str(panel_x, y, "NEXT", label);
        y = y.saturating_add(1);
        if !snap.paused() {
            self.draw_preview(fb, panel_x, y, snap.next);
        }
        y = y.saturating_add(5);

        for (name, amount) in [
            ("SCORE", snap.score),
            ("LEVEL", snap.level),
            ("ROWS", snap.rows_cleared),
        ] {
            fb.put_str(panel_x, y, name, label);
            y = y.saturating_add(1);
            fb.put_u32(panel_x, y, amount, value);
            y = y.saturating_add(2);
        }
    }

    /// First rotation state of `kind`, in a 4x4 box at (x, y)
    fn draw_preview(&self, fb: &mut FrameBuffer, x: u16, y: u16, kind: BlockKind) {
        let Some(state) = rotation_table(kind).first() else {
            return;
        };
        let min_col = state.iter().map(|&(dc, _)| dc).min().unwrap_or(0);
        let min_row = state.iter().map(|&(_, dr)| dr).min().unwrap_or(0);
        let style = CellStyle::new(kind_color(kind), PANEL_BG);

        for &(dc, dr) in state {
            let px = x + (dc - min_col) as u16 * self.cell_w;
            let py = y + (dr - min_row) as u16 * self.cell_h;
            fb.fill_rect(px, py, self.cell_w, self.cell_h, '█', style);
        }
    }

    fn draw_overlay_text(
        &self,
        fb: &mut FrameBuffer,
        start_x: u16,
        start_y: u16,
        frame_w: u16,
        frame_h: u16,
        text: &str,
    ) {
        let mid_y = start_y.saturating_add(frame_h / 2);
        let text_w = text.chars().count() as u16;
        let x = start_x.saturating_add(frame_w.saturating_sub(text_w) / 2);
        let style = CellStyle::new(Rgb::new(255, 255, 255), PANEL_BG).bold();
        fb.put_str(x, mid_y, text, style);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::ActiveSnapshot;
    use crate::types::{GridCoord, SessionState};

    fn empty_snapshot() -> SessionSnapshot {
        SessionSnapshot {
            rows: 4,
            columns: 4,
            cells: vec![None; 16],
            ..SessionSnapshot::default()
        }
    }

    fn find(fb: &FrameBuffer, text: &str) -> bool {
        (0..fb.height()).any(|y| fb.row_text(y).contains(text))
    }

    // Board origin for a 4x4 board (10x6 frame) centered in 40x12
    const ORIGIN_X: u16 = 15 + 1;
    const ORIGIN_Y: u16 = 3 + 1;

    #[test]
    fn settled_cells_fade_toward_background() {
        let mut snap = empty_snapshot();
        snap.cells[0] = Some(CellSnapshot {
            kind: BlockKind::Z,
            opacity: 1.0,
        });
        snap.cells[1] = Some(CellSnapshot {
            kind: BlockKind::Z,
            opacity: 0.0,
        });

        let fb = GameView::default().render(&snap, Viewport::new(40, 12));

        let opaque = fb.get(ORIGIN_X, ORIGIN_Y).unwrap();
        assert_eq!(opaque.ch, '█');
        assert_eq!(opaque.style.fg, kind_color(BlockKind::Z));

        let faded = fb.get(ORIGIN_X + 2, ORIGIN_Y).unwrap();
        assert_eq!(faded.style.fg, BOARD_BG);
    }

    #[test]
    fn active_cells_above_grid_are_skipped() {
        let mut snap = empty_snapshot();
        snap.active = Some(ActiveSnapshot {
            kind: BlockKind::I,
            rotation_index: 1,
            cells: [
                GridCoord::new(1, -2),
                GridCoord::new(1, -1),
                GridCoord::new(1, 0),
                GridCoord::new(1, 1),
            ],
        });

        let fb = GameView::default().render(&snap, Viewport::new(40, 12));

        // Border row above the board is untouched.
        assert_eq!(fb.get(ORIGIN_X + 2, ORIGIN_Y - 1).map(|c| c.ch), Some('─'));
        assert_eq!(fb.get(ORIGIN_X + 2, ORIGIN_Y).map(|c| c.ch), Some('█'));
        assert_eq!(fb.get(ORIGIN_X + 2, ORIGIN_Y + 1).map(|c| c.ch), Some('█'));
        assert_eq!(fb.get(ORIGIN_X + 2, ORIGIN_Y + 2).map(|c| c.ch), Some('·'));
    }

    #[test]
    fn pause_hides_board() {
        let mut snap = empty_snapshot();
        snap.cells[0] = Some(CellSnapshot {
            kind: BlockKind::O,
            opacity: 1.0,
        });
        snap.state = SessionState::Paused;

        let fb = GameView::default().render(&snap, Viewport::new(40, 12));
        assert_eq!(fb.get(ORIGIN_X, ORIGIN_Y).map(|c| c.ch), Some(' '));
        assert!(find(&fb, PAUSE_TEXT));
    }

    #[test]
    fn game_over_overlay_and_panel() {
        let mut snap = empty_snapshot();
        snap.state = SessionState::GameOver;
        snap.score = 1240;
        snap.level = 3;
        snap.rows_cleared = 31;

        let fb = GameView::default().render(&snap, Viewport::new(60, 24));
        assert!(find(&fb, GAME_OVER_TEXT));
        assert!(find(&fb, "SCORE"));
        assert!(find(&fb, "1240"));
        assert!(find(&fb, "LEVEL"));
        assert!(find(&fb, "ROWS"));
        assert!(find(&fb, "31"));
    }

    #[test]
    fn tiny_viewport_does_not_panic() {
        let snap = empty_snapshot();
        let fb = GameView::default().render(&snap, Viewport::new(3, 2));
        assert_eq!(fb.width(), 3);
    }
}
