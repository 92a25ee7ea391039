//! Static board geometry: adjacency per direction and positional weights.

use crate::cell::Cell;
use crate::direction::{DC, DR, Direction};

/// Neighbor index per `[cell][direction]`, or -1 where no edge exists.
///
/// Weak intersections (odd `(row + col)`) have their diagonal entries
/// disabled; edges of the board have no neighbor beyond them.
static ADJACENT: [[i8; 8]; 45] = {
    let mut table = [[-1i8; 8]; 45];
    let mut row = 0usize;
    while row < 5 {
        let mut col = 0usize;
        while col < 9 {
            let cell = row * 9 + col;
            let strong = (row + col) % 2 == 0;
            let mut d = 0usize;
            while d < 8 {
                // Diagonal lines only exist through strong intersections.
                if strong || d % 2 == 0 {
                    let nr = row as i8 + DR[d];
                    let nc = col as i8 + DC[d];
                    if nr >= 0 && nr < 5 && nc >= 0 && nc < 9 {
                        table[cell][d] = nr * 9 + nc;
                    }
                }
                d += 1;
            }
            col += 1;
        }
        row += 1;
    }
    table
};

/// Static positional value per cell, center-weighted.
///
/// Strong intersections score higher than their weak neighbors; the center
/// of the board is worth the most.
#[rustfmt::skip]
pub const CELL_VALUE: [i32; 45] = [
    1, 2, 1, 2, 1, 2, 1, 2, 1,
    2, 4, 3, 4, 3, 4, 3, 4, 2,
    1, 3, 8, 6, 9, 6, 8, 3, 1,
    2, 4, 3, 4, 3, 4, 3, 4, 2,
    1, 2, 1, 2, 1, 2, 1, 2, 1,
];

/// Return the neighboring cell in the given direction, if an edge exists.
#[inline]
pub fn neighbor(cell: Cell, dir: Direction) -> Option<Cell> {
    let idx = ADJACENT[cell.index()][dir.index()];
    if idx < 0 {
        None
    } else {
        Cell::from_index(idx as u8)
    }
}
