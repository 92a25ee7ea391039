//! Board intersections of the 5×9 Fanorona grid.

use std::fmt;

/// One of the 45 intersections, encoded as a `u8`.
///
/// Index = row * 9 + col, with row 0 at the top of the board (rank 5)
/// and col 0 on the left (file a). So index 0 = a5, index 44 = i1.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Cell(u8);

impl Cell {
    /// Total number of intersections.
    pub const COUNT: usize = 45;

    /// Number of rows on the board.
    pub const ROWS: usize = 5;

    /// Number of columns on the board.
    pub const COLS: usize = 9;

    /// The center intersection (e3, index 22), empty in the starting setup.
    pub const CENTER: Cell = Cell(22);

    /// Create a cell from a row and column.
    #[inline]
    pub const fn new(row: usize, col: usize) -> Cell {
        debug_assert!(row < Self::ROWS && col < Self::COLS);
        Cell((row * 9 + col) as u8)
    }

    /// Create a cell from a zero-based index, returning `None` if out of range.
    #[inline]
    pub const fn from_index(index: u8) -> Option<Cell> {
        if index < 45 { Some(Cell(index)) } else { None }
    }

    /// Create a cell from a zero-based index without bounds checking.
    ///
    /// # Panics
    ///
    /// Debug-asserts that `index < 45`.
    #[inline]
    pub(crate) const fn from_index_unchecked(index: u8) -> Cell {
        debug_assert!(index < 45);
        Cell(index)
    }

    /// Return the zero-based index (0..45).
    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    /// Return the row (0 = top rank).
    #[inline]
    pub const fn row(self) -> usize {
        self.0 as usize / 9
    }

    /// Return the column (0 = file a).
    #[inline]
    pub const fn col(self) -> usize {
        self.0 as usize % 9
    }

    /// Return `true` if this is a strong intersection.
    ///
    /// Strong intersections (`(row + col)` even) are connected diagonally;
    /// weak intersections only orthogonally. The asymmetry is intrinsic to
    /// the Fanorona board weave.
    #[inline]
    pub const fn is_strong(self) -> bool {
        (self.row() + self.col()) % 2 == 0
    }

    /// Manhattan distance to another cell.
    pub const fn manhattan(self, other: Cell) -> i32 {
        (self.row() as i32 - other.row() as i32).abs()
            + (self.col() as i32 - other.col() as i32).abs()
    }

    /// Iterate over all 45 cells in index order.
    pub fn all() -> impl Iterator<Item = Cell> {
        (0u8..45).map(Cell)
    }
}

impl fmt::Display for Cell {
    /// Board notation: file letter then rank digit, e.g. `a5` for index 0.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let file = (b'a' + self.col() as u8) as char;
        let rank = 5 - self.row();
        write!(f, "{file}{rank}")
    }
}

impl fmt::Debug for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Cell({} = {})", self.0, self)
    }
}

#[cfg(test)]
mod tests {
    use super::Cell;

    #[test]
    fn index_roundtrip() {
        for i in 0u8..45 {
            let cell = Cell::from_index(i).unwrap();
            assert_eq!(cell.index(), i as usize);
        }
        assert!(Cell::from_index(45).is_none());
    }

    #[test]
    fn row_col_mapping() {
        let cell = Cell::new(2, 4);
        assert_eq!(cell.index(), 22);
        assert_eq!(cell.row(), 2);
        assert_eq!(cell.col(), 4);
        assert_eq!(cell, Cell::CENTER);
    }

    #[test]
    fn display_notation() {
        assert_eq!(Cell::new(0, 0).to_string(), "a5");
        assert_eq!(Cell::new(4, 8).to_string(), "i1");
        assert_eq!(Cell::CENTER.to_string(), "e3");
    }

    #[test]
    fn strong_intersections_follow_parity() {
        assert!(Cell::new(0, 0).is_strong());
        assert!(!Cell::new(0, 1).is_strong());
        assert!(Cell::CENTER.is_strong());
        for cell in Cell::all() {
            assert_eq!(cell.is_strong(), (cell.row() + cell.col()) % 2 == 0);
        }
    }

    #[test]
    fn manhattan_distance() {
        assert_eq!(Cell::new(0, 0).manhattan(Cell::new(4, 8)), 12);
        assert_eq!(Cell::CENTER.manhattan(Cell::CENTER), 0);
    }
}
