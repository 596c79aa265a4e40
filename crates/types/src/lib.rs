//! Core types module - shared data structures and constants
//!
//! This module defines the fundamental types used throughout the workspace.
//! All types are plain data with no behaviour beyond small conversions, so they
//! can be used by the engine, the terminal shell, and the event log alike.
//!
//! # Grid Dimensions
//!
//! Default playfield dimensions:
//!
//! - **Columns**: 10 (indexed 0-9, left to right)
//! - **Rows**: 20 (indexed 0-19, top to bottom)
//! - **Spawn anchor**: (5, 0), the pivot cell of a freshly spawned piece
//!
//! Rows above the grid (`row < 0`) are legal for falling pieces; they never
//! collide with the pile.
//!
//! # Timing
//!
//! Time is measured in logical ticks, not milliseconds:
//!
//! | Constant | Value | Description |
//! |----------|-------|-------------|
//! | `DEFAULT_FPS` | 60 | Logical ticks per second |
//! | `START_SPEED` | 11 | Speed at level 0 |
//! | `MAX_SPEED` | 55 | Speed cap |
//! | `SPEED_INCREMENT` | 4 | Speed added per level-up |
//! | `NUM_FADE_CYCLES` | 60 | Ticks a completed row takes to fade out |
//!
//! A piece is forced down every `fps - speed` ticks, so level 0 drops a row
//! every 49 ticks and the capped speed every 5 ticks.
//!
//! # Examples
//!
//! ```
//! use dumblox_types::{BlockKind, Direction, GameAction, GridCoord, GRID_COLUMNS, GRID_ROWS};
//!
//! let kind = BlockKind::from_str("t").unwrap();
//! assert_eq!(kind, BlockKind::T);
//!
//! let at = GridCoord::new(4, 0).step(Direction::Down);
//! assert_eq!(at, GridCoord::new(4, 1));
//!
//! assert_eq!(GameAction::from_str("hardDrop"), Some(GameAction::HardDrop));
//! assert_eq!(GRID_COLUMNS, 10);
//! assert_eq!(GRID_ROWS, 20);
//! ```

/// Default number of grid rows
pub const GRID_ROWS: u16 = 20;

/// Default number of grid columns
pub const GRID_COLUMNS: u16 = 10;

/// Logical ticks per second
pub const DEFAULT_FPS: u32 = 60;

/// Speed at level 0
pub const START_SPEED: u32 = 11;

/// Speed never rises above this value
pub const MAX_SPEED: u32 = 55;

/// Speed added on each level-up while below the cap
pub const SPEED_INCREMENT: u32 = 4;

/// Rows that must be cleared to advance one level
pub const ROWS_PER_LEVEL: u32 = 10;

/// Line clear base points for 1, 2, 3 and 4 simultaneous rows.
///
/// Points are multiplied by (level + 1).
pub const SCORING_TABLE: [u32; 4] = [40, 100, 300, 1200];

/// Ticks spent fading completed rows before they are removed
pub const NUM_FADE_CYCLES: u32 = 60;

/// Most rows a single landing can complete (a tetromino spans at most four rows)
pub const MAX_CLEARED_ROWS: usize = 4;

/// Pivot column of a freshly spawned piece on the default grid
pub const SPAWN_COLUMN: i16 = (GRID_COLUMNS / 2) as i16;

/// Pivot row of a freshly spawned piece
pub const SPAWN_ROW: i16 = 0;

/// Extra logical updates the shell may run per frame when it falls behind
pub const MAX_FRAME_SKIPS: u32 = 5;

/// A (column, row) position on the grid.
///
/// Validity is contextual: pieces may sit above the grid (`row < 0`) while falling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GridCoord {
    pub col: i16,
    pub row: i16,
}

impl GridCoord {
    pub const fn new(col: i16, row: i16) -> Self {
        Self { col, row }
    }

    /// Coordinate shifted by the given column/row deltas
    pub const fn offset(self, dc: i16, dr: i16) -> Self {
        Self {
            col: self.col + dc,
            row: self.row + dr,
        }
    }

    /// Coordinate one cell away in `direction`
    pub fn step(self, direction: Direction) -> Self {
        let (dc, dr) = direction.delta();
        self.offset(dc, dr)
    }
}

/// The seven tetromino kinds, in the order the game enumerates them.
///
/// - **O**: 2x2 square (one rotation state)
/// - **I**: straight bar (two rotation states)
/// - **T**, **L**, **J**: four rotation states
/// - **S**, **Z**: skew pieces (two rotation states)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum BlockKind {
    O,
    I,
    T,
    L,
    J,
    S,
    Z,
}

impl BlockKind {
    /// Every kind, in enumeration order
    pub const ALL: [BlockKind; 7] = [
        BlockKind::O,
        BlockKind::I,
        BlockKind::T,
        BlockKind::L,
        BlockKind::J,
        BlockKind::S,
        BlockKind::Z,
    ];

    /// Position of this kind in [`BlockKind::ALL`]
    pub fn index(self) -> usize {
        match self {
            BlockKind::O => 0,
            BlockKind::I => 1,
            BlockKind::T => 2,
            BlockKind::L => 3,
            BlockKind::J => 4,
            BlockKind::S => 5,
            BlockKind::Z => 6,
        }
    }

    /// Parse kind from string (case-insensitive)
    ///
    /// # Examples
    ///
    /// ```
    /// use dumblox_types::BlockKind;
    ///
    /// assert_eq!(BlockKind::from_str("i"), Some(BlockKind::I));
    /// assert_eq!(BlockKind::from_str("Z"), Some(BlockKind::Z));
    /// assert_eq!(BlockKind::from_str("x"), None);
    /// ```
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "o" => Some(BlockKind::O),
            "i" => Some(BlockKind::I),
            "t" => Some(BlockKind::T),
            "l" => Some(BlockKind::L),
            "j" => Some(BlockKind::J),
            "s" => Some(BlockKind::S),
            "z" => Some(BlockKind::Z),
            _ => None,
        }
    }

    /// Uppercase single-letter name
    pub fn as_str(&self) -> &'static str {
        match self {
            BlockKind::O => "O",
            BlockKind::I => "I",
            BlockKind::T => "T",
            BlockKind::L => "L",
            BlockKind::J => "J",
            BlockKind::S => "S",
            BlockKind::Z => "Z",
        }
    }
}

/// Direction of a one-cell translation.
///
/// `Up` exists for debugging and for undoing a failed downward move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Direction {
    Down,
    Left,
    Right,
    Up,
}

impl Direction {
    /// The direction that undoes this one
    pub fn opposite(self) -> Self {
        match self {
            Direction::Down => Direction::Up,
            Direction::Up => Direction::Down,
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }

    /// (column, row) delta; rows grow downward
    pub fn delta(self) -> (i16, i16) {
        match self {
            Direction::Down => (0, 1),
            Direction::Up => (0, -1),
            Direction::Left => (-1, 0),
            Direction::Right => (1, 0),
        }
    }
}

/// Rotation direction.
///
/// Clockwise advances the rotation index, counter-clockwise retreats it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum RotateDirection {
    Clockwise,
    CounterClockwise,
}

impl RotateDirection {
    pub fn reverse(self) -> Self {
        match self {
            RotateDirection::Clockwise => RotateDirection::CounterClockwise,
            RotateDirection::CounterClockwise => RotateDirection::Clockwise,
        }
    }
}

/// Session operations that input events map to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum GameAction {
    /// Move piece one cell left
    MoveLeft,
    /// Move piece one cell right
    MoveRight,
    /// Move piece one cell down (lands it when blocked)
    MoveDown,
    /// Move piece one cell up (debug only)
    MoveUp,
    /// Drop piece to the bottom and land it
    HardDrop,
    /// Rotate piece clockwise
    RotateCw,
    /// Rotate piece counter-clockwise
    RotateCcw,
    /// Toggle pause state
    TogglePause,
    /// Leave the game
    Exit,
}

impl GameAction {
    /// Parse action from string
    ///
    /// # Examples
    ///
    /// ```
    /// use dumblox_types::GameAction;
    ///
    /// assert_eq!(GameAction::from_str("moveLeft"), Some(GameAction::MoveLeft));
    /// assert_eq!(GameAction::from_str("ROTATECW"), Some(GameAction::RotateCw));
    /// assert_eq!(GameAction::from_str("hold"), None);
    /// ```
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "moveleft" => Some(GameAction::MoveLeft),
            "moveright" => Some(GameAction::MoveRight),
            "movedown" => Some(GameAction::MoveDown),
            "moveup" => Some(GameAction::MoveUp),
            "harddrop" => Some(GameAction::HardDrop),
            "rotatecw" => Some(GameAction::RotateCw),
            "rotateccw" => Some(GameAction::RotateCcw),
            "togglepause" | "pause" => Some(GameAction::TogglePause),
            "exit" => Some(GameAction::Exit),
            _ => None,
        }
    }

    /// camelCase name
    pub fn as_str(&self) -> &'static str {
        match self {
            GameAction::MoveLeft => "moveLeft",
            GameAction::MoveRight => "moveRight",
            GameAction::MoveDown => "moveDown",
            GameAction::MoveUp => "moveUp",
            GameAction::HardDrop => "hardDrop",
            GameAction::RotateCw => "rotateCw",
            GameAction::RotateCcw => "rotateCcw",
            GameAction::TogglePause => "togglePause",
            GameAction::Exit => "exit",
        }
    }
}

/// Top-level session state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SessionState {
    #[default]
    Running,
    Paused,
    GameOver,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_game_constants() {
        assert_eq!(GRID_ROWS, 20);
        assert_eq!(GRID_COLUMNS, 10);
        assert_eq!(SPAWN_COLUMN, 5);
        assert_eq!(DEFAULT_FPS - START_SPEED, 49);
        assert_eq!(DEFAULT_FPS - MAX_SPEED, 5);
        assert_eq!(SCORING_TABLE, [40, 100, 300, 1200]);
    }

    #[test]
    fn direction_opposites_cancel() {
        for dir in [Direction::Down, Direction::Left, Direction::Right, Direction::Up] {
            let start = GridCoord::new(3, 7);
            assert_eq!(start.step(dir).step(dir.opposite()), start);
            assert_eq!(dir.opposite().opposite(), dir);
        }
    }

    #[test]
    fn block_kind_index_matches_all() {
        for (i, kind) in BlockKind::ALL.iter().enumerate() {
            assert_eq!(kind.index(), i);
            assert_eq!(BlockKind::from_str(kind.as_str()), Some(*kind));
        }
    }

    #[test]
    fn game_action_names_roundtrip() {
        for action in [
            GameAction::MoveLeft,
            GameAction::MoveRight,
            GameAction::MoveDown,
            GameAction::MoveUp,
            GameAction::HardDrop,
            GameAction::RotateCw,
            GameAction::RotateCcw,
            GameAction::TogglePause,
            GameAction::Exit,
        ] {
            assert_eq!(GameAction::from_str(action.as_str()), Some(action));
        }
    }
}
