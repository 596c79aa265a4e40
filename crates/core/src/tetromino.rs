//! Tetromino module - piece shapes and rotation tables
//!
//! Rotation states are pre-baked per kind rather than computed by rotating
//! coordinates. Each state lists four `(column, row)` offsets from the pivot
//! cell, and index 2 of every state is the pivot itself (`(0, 0)`).
//!
//! Rotating only selects another entry of the table. Moving translates the
//! pieces of every state, so a later rotation stays centred on the moved pivot.

use arrayvec::ArrayVec;

use crate::field::Field;
use crate::piece::Piece;
use crate::types::{BlockKind, Direction, GridCoord, RotateDirection};

/// Offset of a single cell relative to the pivot
pub type CellOffset = (i16, i16);

/// One rotation state - four offsets, index 2 is the pivot
pub type RotationState = [CellOffset; 4];

/// Index of the pivot cell inside every rotation state
pub const PIVOT_INDEX: usize = 2;

/// Rotation states of a kind, in clockwise order
pub fn rotation_table(kind: BlockKind) -> &'static [RotationState] {
    match kind {
        BlockKind::O => &O_ROTATIONS,
        BlockKind::I => &I_ROTATIONS,
        BlockKind::T => &T_ROTATIONS,
        BlockKind::L => &L_ROTATIONS,
        BlockKind::J => &J_ROTATIONS,
        BlockKind::S => &S_ROTATIONS,
        BlockKind::Z => &Z_ROTATIONS,
    }
}

/// [2][0]
/// [1][3]
const O_ROTATIONS: [RotationState; 1] = [[(1, 0), (0, 1), (0, 0), (1, 1)]];

const I_ROTATIONS: [RotationState; 2] = [
    // [0][1][2][3]
    [(-2, 0), (-1, 0), (0, 0), (1, 0)],
    // vertical, pivot third from the top
    [(0, -2), (0, -1), (0, 0), (0, 1)],
];

const T_ROTATIONS: [RotationState; 4] = [
    // [3][2][1]
    //    [0]
    [(0, 1), (1, 0), (0, 0), (-1, 0)],
    //    [3]
    // [0][2]
    //    [1]
    [(-1, 0), (0, 1), (0, 0), (0, -1)],
    //    [0]
    // [1][2][3]
    [(0, -1), (-1, 0), (0, 0), (1, 0)],
    // [1]
    // [2][0]
    // [3]
    [(1, 0), (0, -1), (0, 0), (0, 1)],
];

const L_ROTATIONS: [RotationState; 4] = [
    // [3][2][1]
    // [0]
    [(-1, 1), (1, 0), (0, 0), (-1, 0)],
    // [0][3]
    //    [2]
    //    [1]
    [(-1, -1), (0, 1), (0, 0), (0, -1)],
    //       [0]
    // [1][2][3]
    [(1, -1), (-1, 0), (0, 0), (1, 0)],
    // [1]
    // [2]
    // [3][0]
    [(1, 1), (0, -1), (0, 0), (0, 1)],
];

const J_ROTATIONS: [RotationState; 4] = [
    // [3][2][1]
    //       [0]
    [(1, 1), (1, 0), (0, 0), (-1, 0)],
    //    [3]
    //    [2]
    // [0][1]
    [(-1, 1), (0, 1), (0, 0), (0, -1)],
    // [0]
    // [1][2][3]
    [(-1, -1), (-1, 0), (0, 0), (1, 0)],
    // [1][0]
    // [2]
    // [3]
    [(1, -1), (0, -1), (0, 0), (0, 1)],
];

const S_ROTATIONS: [RotationState; 2] = [
    //    [2][0]
    // [1][3]
    [(1, 0), (-1, 1), (0, 0), (0, 1)],
    // [3]
    // [2][0]
    //    [1]
    [(1, 0), (1, 1), (0, 0), (0, -1)],
];

const Z_ROTATIONS: [RotationState; 2] = [
    // [0][2]
    //    [1][3]
    [(-1, 0), (0, 1), (0, 0), (1, 1)],
    //    [0]
    // [2][1]
    // [3]
    [(1, -1), (1, 0), (0, 0), (0, 1)],
];

/// A falling four-cell piece with every rotation state materialised
#[derive(Debug, Clone, PartialEq)]
pub struct Tetromino {
    kind: BlockKind,
    states: ArrayVec<[Piece; 4], 4>,
    rotation_index: usize,
}

impl Tetromino {
    /// Build a tetromino whose pivot sits at `anchor`
    pub fn new(kind: BlockKind, anchor: GridCoord) -> Self {
        let states = rotation_table(kind)
            .iter()
            .map(|state| state.map(|(dc, dr)| Piece::new(anchor.offset(dc, dr), kind)))
            .collect();

        Self {
            kind,
            states,
            rotation_index: 0,
        }
    }

    pub fn kind(&self) -> BlockKind {
        self.kind
    }

    pub fn rotation_index(&self) -> usize {
        self.rotation_index
    }

    pub fn rotation_count(&self) -> usize {
        self.states.len()
    }

    /// Pieces of the active rotation state
    pub fn pieces(&self) -> &[Piece; 4] {
        &self.states[self.rotation_index]
    }

    /// Position of the pivot cell
    pub fn pivot(&self) -> GridCoord {
        self.pieces()[PIVOT_INDEX].coord
    }

    fn translate(&mut self, direction: Direction) {
        for state in self.states.iter_mut() {
            for piece in state.iter_mut() {
                piece.translate(direction);
            }
        }
    }

    /// Move one cell in `direction`.
    ///
    /// The move is applied speculatively and reverted when the field reports a
    /// collision, so a failed move leaves every coordinate unchanged.
    pub fn try_move(&mut self, field: &Field, direction: Direction) -> bool {
        self.translate(direction);

        if field.collides(self) {
            self.translate(direction.opposite());
            return false;
        }

        true
    }

    /// Select the next (clockwise) or previous (counter-clockwise) rotation state.
    ///
    /// Wraps around in both directions; reverts the index on collision.
    pub fn try_rotate(&mut self, field: &Field, rotate_direction: RotateDirection) -> bool {
        let previous = self.rotation_index;
        let count = self.states.len();

        self.rotation_index = match rotate_direction {
            RotateDirection::Clockwise => (previous + 1) % count,
            RotateDirection::CounterClockwise => (previous + count - 1) % count,
        };

        if field.collides(self) {
            self.rotation_index = previous;
            return false;
        }

        true
    }

    /// Move down until blocked. Returns the number of rows travelled.
    pub fn drop_to_bottom(&mut self, field: &Field) -> u32 {
        let mut rows = 0;
        while self.try_move(field, Direction::Down) {
            rows += 1;
        }
        rows
    }
}
