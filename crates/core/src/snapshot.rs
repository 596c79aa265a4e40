//! Read-only copy of a session for the renderer

use crate::types::{BlockKind, GridCoord, SessionState};

/// A settled cell as the renderer sees it
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CellSnapshot {
    pub kind: BlockKind,
    /// Fade opacity in `[0.0, 1.0]`
    pub opacity: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActiveSnapshot {
    pub kind: BlockKind,
    pub rotation_index: usize,
    /// Cell positions; rows may be negative while the piece enters the grid
    pub cells: [GridCoord; 4],
}

#[derive(Debug, Clone, PartialEq)]
pub struct SessionSnapshot {
    pub rows: u16,
    pub columns: u16,
    /// Row-major, `rows * columns` entries
    pub cells: Vec<Option<CellSnapshot>>,
    pub active: Option<ActiveSnapshot>,
    pub next: BlockKind,
    pub level: u32,
    pub speed: u32,
    pub score: u32,
    pub rows_cleared: u32,
    pub state: SessionState,
}

impl SessionSnapshot {
    pub fn cell(&self, col: u16, row: u16) -> Option<&CellSnapshot> {
        if col >= self.columns || row >= self.rows {
            return None;
        }
        self.cells[row as usize * self.columns as usize + col as usize].as_ref()
    }

    pub fn paused(&self) -> bool {
        self.state == SessionState::Paused
    }

    pub fn game_over(&self) -> bool {
        self.state == SessionState::GameOver
    }

    pub fn playable(&self) -> bool {
        self.state == SessionState::Running
    }
}

impl Default for SessionSnapshot {
    fn default() -> Self {
        Self {
            rows: 0,
            columns: 0,
            cells: Vec::new(),
            active: None,
            next: BlockKind::O,
            level: 0,
            speed: 0,
            score: 0,
            rows_cleared: 0,
            state: SessionState::Running,
        }
    }
}
