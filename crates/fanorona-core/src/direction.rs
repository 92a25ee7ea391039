//! The eight compass directions of board movement.

use std::fmt;

/// A movement direction, indexed 0..8 clockwise from north.
///
/// North points toward row 0 (rank 5). Odd-indexed directions are the
/// diagonals, available only from strong intersections. Direction `d` and
/// `d + 4 mod 8` are opposites.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Direction {
    North = 0,
    NorthEast = 1,
    East = 2,
    SouthEast = 3,
    South = 4,
    SouthWest = 5,
    West = 6,
    NorthWest = 7,
}

/// Row delta per direction index.
pub(crate) const DR: [i8; 8] = [-1, -1, 0, 1, 1, 1, 0, -1];

/// Column delta per direction index.
pub(crate) const DC: [i8; 8] = [0, 1, 1, 1, 0, -1, -1, -1];

impl Direction {
    /// All eight directions in index order.
    pub const ALL: [Direction; 8] = [
        Direction::North,
        Direction::NorthEast,
        Direction::East,
        Direction::SouthEast,
        Direction::South,
        Direction::SouthWest,
        Direction::West,
        Direction::NorthWest,
    ];

    /// Create a direction from its index, returning `None` if out of range.
    #[inline]
    pub const fn from_index(index: u8) -> Option<Direction> {
        if index < 8 {
            Some(Self::ALL[index as usize])
        } else {
            None
        }
    }

    /// Return the zero-based index (0..8).
    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// The reverse direction (`d + 4 mod 8`).
    #[inline]
    pub const fn opposite(self) -> Direction {
        Self::ALL[(self as usize + 4) % 8]
    }

    /// Return `true` for the diagonal directions (odd index).
    #[inline]
    pub const fn is_diagonal(self) -> bool {
        self as usize % 2 != 0
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Direction::North => "N",
            Direction::NorthEast => "NE",
            Direction::East => "E",
            Direction::SouthEast => "SE",
            Direction::South => "S",
            Direction::SouthWest => "SW",
            Direction::West => "W",
            Direction::NorthWest => "NW",
        };
        write!(f, "{name}")
    }
}
