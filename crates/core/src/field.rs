//! Field module - the grid of settled pieces (the pile)
//!
//! The field is a `rows x columns` grid where each cell is empty or holds one
//! settled piece. Storage is a flat row-major vector.
//! Coordinates: (col, row) where col ranges 0..columns (left to right) and
//! row ranges 0..rows (top to bottom). Falling pieces may sit above row 0.

use arrayvec::ArrayVec;

use crate::piece::Piece;
use crate::tetromino::Tetromino;
use crate::types::{GridCoord, GRID_COLUMNS, GRID_ROWS, MAX_CLEARED_ROWS};

/// Row indices completed by a single landing, ascending
pub type RowSet = ArrayVec<usize, MAX_CLEARED_ROWS>;

/// The settled pile plus the sticky game-over flag
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    rows: u16,
    columns: u16,
    /// Row-major cells (row * columns + col)
    cells: Vec<Option<Piece>>,
    game_over: bool,
}

impl Field {
    /// Create an empty field
    pub fn new(rows: u16, columns: u16) -> Self {
        Self {
            rows,
            columns,
            cells: vec![None; rows as usize * columns as usize],
            game_over: false,
        }
    }

    pub fn rows(&self) -> u16 {
        self.rows
    }

    pub fn columns(&self) -> u16 {
        self.columns
    }

    #[inline(always)]
    fn index(&self, col: i16, row: i16) -> Option<usize> {
        if col < 0 || row < 0 || col >= self.columns as i16 || row >= self.rows as i16 {
            return None;
        }
        Some(row as usize * self.columns as usize + col as usize)
    }

    /// Settled piece at (col, row); `None` when empty or out of bounds
    pub fn get(&self, col: i16, row: i16) -> Option<&Piece> {
        self.index(col, row).and_then(|idx| self.cells[idx].as_ref())
    }

    /// Replace the cell at (col, row). Returns false if out of bounds.
    ///
    /// The stored piece's coordinate is rewritten to match the cell.
    pub fn set(&mut self, col: i16, row: i16, cell: Option<Piece>) -> bool {
        match self.index(col, row) {
            Some(idx) => {
                self.cells[idx] = cell.map(|mut piece| {
                    piece.coord = GridCoord::new(col, row);
                    piece
                });
                true
            }
            None => false,
        }
    }

    pub fn is_occupied(&self, col: i16, row: i16) -> bool {
        self.get(col, row).is_some()
    }

    /// Row slice; empty when out of bounds
    pub fn row(&self, row: usize) -> &[Option<Piece>] {
        if row >= self.rows as usize {
            return &[];
        }
        let width = self.columns as usize;
        &self.cells[row * width..(row + 1) * width]
    }

    /// Check if every column of a row is occupied
    pub fn is_row_complete(&self, row: usize) -> bool {
        row < self.rows as usize && self.row(row).iter().all(Option::is_some)
    }

    /// Number of occupied cells
    pub fn occupied_count(&self) -> usize {
        self.cells.iter().filter(|cell| cell.is_some()).count()
    }

    /// Does the tetromino's active rotation state hit a wall, the floor, or the pile?
    ///
    /// Pieces above the grid (`row < 0`) only test the side walls; this lets a
    /// piece spawn and rotate partially off the top.
    pub fn collides(&self, tetromino: &Tetromino) -> bool {
        tetromino.pieces().iter().any(|piece| {
            let GridCoord { col, row } = piece.coord;
            if col < 0 || col >= self.columns as i16 || row >= self.rows as i16 {
                return true;
            }
            row >= 0 && self.is_occupied(col, row)
        })
    }

    /// Copy a landed tetromino into the pile and report the completed rows.
    ///
    /// Landing on an occupied row-0 cell, or landing with any piece still above
    /// the grid, sets the sticky game-over flag. Callers are expected to have
    /// moved the tetromino with collision checks, so pieces are never below
    /// the floor or outside the walls.
    pub fn merge_landed(&mut self, tetromino: &Tetromino) -> RowSet {
        for piece in tetromino.pieces() {
            let GridCoord { col, row } = piece.coord;

            if row < 0 {
                // Stacked out of the top: nowhere to put it.
                self.game_over = true;
                continue;
            }

            let Some(idx) = self.index(col, row) else {
                debug_assert!(false, "landed piece outside field at ({col}, {row})");
                continue;
            };

            if row == 0 && self.cells[idx].is_some() {
                self.game_over = true;
            }
            self.cells[idx] = Some(*piece);
        }

        let mut completed = RowSet::new();
        for row in 0..self.rows as usize {
            if self.is_row_complete(row) && completed.try_push(row).is_err() {
                debug_assert!(false, "more than {MAX_CLEARED_ROWS} rows completed at once");
                break;
            }
        }
        completed
    }

    /// Remove one row, shifting every row above it down by one.
    ///
    /// Rows below are untouched; the top row becomes empty.
    fn delete_row(&mut self, row: usize) {
        if row >= self.rows as usize {
            return;
        }

        let width = self.columns as usize;

        // copy_within handles the overlapping ranges
        for r in (1..=row).rev() {
            let src = (r - 1) * width;
            self.cells.copy_within(src..src + width, r * width);
        }
        self.cells[..width].fill(None);

        for r in 1..=row {
            for cell in self.cells[r * width..(r + 1) * width].iter_mut().flatten() {
                cell.coord.row = r as i16;
            }
        }
    }

    /// Delete rows, lowest index first, as a series of single-row deletions.
    ///
    /// Deleting in ascending order keeps the remaining indices valid: each
    /// deletion only shifts rows above it, which all have smaller indices.
    pub fn delete_rows(&mut self, rows: &[usize]) {
        let mut sorted = rows.to_vec();
        sorted.sort_unstable();
        sorted.dedup();

        for row in sorted {
            self.delete_row(row);
        }
    }

    /// Set the fade opacity of every occupied piece in the given rows
    pub fn set_opacity(&mut self, rows: &[usize], alpha: f32) {
        let width = self.columns as usize;
        for &row in rows {
            if row >= self.rows as usize {
                continue;
            }
            for piece in self.cells[row * width..(row + 1) * width]
                .iter_mut()
                .flatten()
            {
                piece.set_opacity(alpha);
            }
        }
    }

    /// Sticky game-over flag; only [`Field::clear`] resets it
    pub fn is_game_over(&self) -> bool {
        self.game_over
    }

    /// Empty every cell and reset the game-over flag
    pub fn clear(&mut self) {
        self.cells.fill(None);
        self.game_over = false;
    }

    /// Get a reference to the internal cells
    pub fn cells(&self) -> &[Option<Piece>] {
        &self.cells
    }

    /// Create from an ASCII picture for testing (`#` occupied, anything else empty)
    #[cfg(test)]
    pub fn from_rows(picture: &[&str], kind: crate::types::BlockKind) -> Self {
        let rows = picture.len() as u16;
        let columns = picture.first().map(|r| r.len()).unwrap_or(0) as u16;
        let mut field = Self::new(rows, columns);
        for (r, line) in picture.iter().enumerate() {
            assert_eq!(line.len(), columns as usize);
            for (c, ch) in line.chars().enumerate() {
                if ch == '#' {
                    let coord = GridCoord::new(c as i16, r as i16);
                    field.set(coord.col, coord.row, Some(Piece::new(coord, kind)));
                }
            }
        }
        field
    }

    /// Render as an ASCII picture for testing
    #[cfg(test)]
    pub fn to_rows(&self) -> Vec<String> {
        (0..self.rows as usize)
            .map(|r| {
                self.row(r)
                    .iter()
                    .map(|c| if c.is_some() { '#' } else { '.' })
                    .collect()
            })
            .collect()
    }
}

impl Default for Field {
    fn default() -> Self {
        Self::new(GRID_ROWS, GRID_COLUMNS)
    }
}
