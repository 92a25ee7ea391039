//! A 45-bit occupancy set, one bit per board intersection.

use std::fmt;
use std::ops::{BitAnd, BitAndAssign, BitOr, BitOrAssign, Not};

use crate::cell::Cell;

/// A set of board cells packed into a `u64`.
///
/// Invariant: bits 45..64 are always zero.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct CellSet(u64);

/// Mask covering the 45 valid board bits.
const BOARD_MASK: u64 = (1 << 45) - 1;

impl CellSet {
    /// Empty set (no cells).
    pub const EMPTY: CellSet = CellSet(0);

    /// Full board (all 45 cells).
    pub const FULL: CellSet = CellSet(BOARD_MASK);

    /// Create a set from raw bits. Bits above cell 44 are discarded.
    #[inline]
    pub const fn new(bits: u64) -> CellSet {
        CellSet(bits & BOARD_MASK)
    }

    /// Return the underlying bits.
    #[inline]
    pub const fn bits(self) -> u64 {
        self.0
    }

    /// Build a set from a list of cells.
    pub fn from_cells(cells: &[Cell]) -> CellSet {
        let mut set = CellSet::EMPTY;
        for &cell in cells {
            set = set.with(cell);
        }
        set
    }

    /// Return `true` if no cells are set.
    #[inline]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Count the occupied cells.
    #[inline]
    pub const fn count(self) -> u32 {
        self.0.count_ones()
    }

    /// Return `true` if the given cell is in the set.
    #[inline]
    pub const fn contains(self, cell: Cell) -> bool {
        (self.0 & (1u64 << cell.index())) != 0
    }

    /// Return a new set with the given cell added.
    #[inline]
    pub const fn with(self, cell: Cell) -> CellSet {
        CellSet(self.0 | (1u64 << cell.index()))
    }

    /// Return a new set with the given cell removed.
    #[inline]
    pub const fn without(self, cell: Cell) -> CellSet {
        CellSet(self.0 & !(1u64 << cell.index()))
    }

    /// Return the lowest-index cell in the set, or `None` if empty.
    #[inline]
    pub const fn first(self) -> Option<Cell> {
        if self.0 == 0 {
            None
        } else {
            Some(Cell::from_index_unchecked(self.0.trailing_zeros() as u8))
        }
    }

    /// Pop the lowest-index cell, returning it and the remaining set.
    #[inline]
    pub const fn pop_first(self) -> Option<(Cell, CellSet)> {
        if self.0 == 0 {
            None
        } else {
            let cell = Cell::from_index_unchecked(self.0.trailing_zeros() as u8);
            Some((cell, CellSet(self.0 & (self.0 - 1))))
        }
    }

    /// Iterate over the cells in ascending index order.
    pub fn iter(self) -> Iter {
        Iter(self)
    }
}

/// Iterator over the cells of a [`CellSet`].
pub struct Iter(CellSet);

impl Iterator for Iter {
    type Item = Cell;

    fn next(&mut self) -> Option<Cell> {
        let (cell, rest) = self.0.pop_first()?;
        self.0 = rest;
        Some(cell)
    }
}

impl IntoIterator for CellSet {
    type Item = Cell;
    type IntoIter = Iter;

    fn into_iter(self) -> Iter {
        Iter(self)
    }
}

impl BitOr for CellSet {
    type Output = CellSet;
    fn bitor(self, rhs: CellSet) -> CellSet {
        CellSet(self.0 | rhs.0)
    }
}

impl BitOrAssign for CellSet {
    fn bitor_assign(&mut self, rhs: CellSet) {
        self.0 |= rhs.0;
    }
}

impl BitAnd for CellSet {
    type Output = CellSet;
    fn bitand(self, rhs: CellSet) -> CellSet {
        CellSet(self.0 & rhs.0)
    }
}

impl BitAndAssign for CellSet {
    fn bitand_assign(&mut self, rhs: CellSet) {
        self.0 &= rhs.0;
    }
}

impl Not for CellSet {
    type Output = CellSet;
    fn not(self) -> CellSet {
        CellSet(!self.0 & BOARD_MASK)
    }
}

impl fmt::Debug for CellSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CellSet{{")?;
        let mut sep = "";
        for cell in self.iter() {
            write!(f, "{sep}{cell}")?;
            sep = " ";
        }
        write!(f, "}}")
    }
}
