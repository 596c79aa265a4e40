//! Piece module - a single grid cell
//!
//! A piece is one of the four cells of a tetromino. Once a tetromino lands,
//! its pieces are copied into the field and become part of the pile.

use crate::types::{BlockKind, Direction, GridCoord};

/// A single cell with a position and a fade opacity in `[0.0, 1.0]`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Piece {
    pub coord: GridCoord,
    pub kind: BlockKind,
    opacity: f32,
}

impl Piece {
    /// Create a fully opaque piece
    pub fn new(coord: GridCoord, kind: BlockKind) -> Self {
        Self {
            coord,
            kind,
            opacity: 1.0,
        }
    }

    pub fn opacity(&self) -> f32 {
        self.opacity
    }

    /// Set the fade opacity, clamped to `[0.0, 1.0]`
    pub fn set_opacity(&mut self, alpha: f32) {
        self.opacity = alpha.clamp(0.0, 1.0);
    }

    /// Move one cell in `direction`
    #[inline]
    pub fn translate(&mut self, direction: Direction) {
        self.coord = self.coord.step(direction);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_piece_is_opaque() {
        let piece = Piece::new(GridCoord::new(2, 3), BlockKind::T);
        assert_eq!(piece.opacity(), 1.0);
        assert_eq!(piece.coord, GridCoord::new(2, 3));
    }

    #[test]
    fn test_opacity_is_clamped() {
        let mut piece = Piece::new(GridCoord::new(0, 0), BlockKind::I);
        piece.set_opacity(-0.5);
        assert_eq!(piece.opacity(), 0.0);
        piece.set_opacity(3.0);
        assert_eq!(piece.opacity(), 1.0);
        piece.set_opacity(0.25);
        assert_eq!(piece.opacity(), 0.25);
    }

    #[test]
    fn test_translate() {
        let mut piece = Piece::new(GridCoord::new(4, 4), BlockKind::O);
        piece.translate(Direction::Down);
        assert_eq!(piece.coord, GridCoord::new(4, 5));
        piece.translate(Direction::Left);
        assert_eq!(piece.coord, GridCoord::new(3, 5));
    }
}
