//! Immutable game state snapshots.

use std::fmt;

use crate::cell::Cell;
use crate::cellset::CellSet;
use crate::direction::Direction;
use crate::zobrist;

/// The side-to-move sign.
///
/// Occupancy is always stored relative to the side to move (`my` / `opp`),
/// so the sign only matters for hashing and for translating to the wire
/// encoding, which uses absolute `±1` markers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    Plus,
    Minus,
}

impl Side {
    /// The other side.
    #[inline]
    pub const fn flip(self) -> Side {
        match self {
            Side::Plus => Side::Minus,
            Side::Minus => Side::Plus,
        }
    }

    /// The wire sign: `+1` or `-1`.
    #[inline]
    pub const fn sign(self) -> i8 {
        match self {
            Side::Plus => 1,
            Side::Minus => -1,
        }
    }

    /// Parse a wire sign.
    #[inline]
    pub const fn from_sign(sign: i8) -> Option<Side> {
        match sign {
            1 => Some(Side::Plus),
            -1 => Some(Side::Minus),
            _ => None,
        }
    }
}

/// Transient state of a capture chain in progress.
///
/// Only meaningful while a chain is running: the same piece keeps
/// capturing, may not revisit a cell in `visited`, and may not move in
/// `last_dir` again.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Combo {
    /// The piece currently mid-chain.
    pub piece: Cell,
    /// The cell the piece just left.
    pub prev: Cell,
    /// Every cell used by the chain so far, including the start.
    pub visited: CellSet,
    /// The direction of the most recent hop.
    pub last_dir: Direction,
}

/// A Fanorona position, relative to the side to move.
///
/// Value type: applying a move produces a new snapshot and never mutates
/// the source. The cached hash covers occupancy and side only; combo
/// sub-state is intentionally excluded (see [`crate::zobrist`]).
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct Position {
    my: CellSet,
    opp: CellSet,
    side: Side,
    combo: Option<Combo>,
    hash: u64,
}

impl Position {
    /// Create a position with no capture chain in progress.
    ///
    /// # Panics
    ///
    /// Debug-asserts that the occupancy sets are disjoint.
    pub fn new(my: CellSet, opp: CellSet, side: Side) -> Position {
        Self::with_combo(my, opp, side, None)
    }

    /// Create a position, optionally mid-chain.
    pub fn with_combo(my: CellSet, opp: CellSet, side: Side, combo: Option<Combo>) -> Position {
        debug_assert!((my & opp).is_empty(), "occupancy sets overlap");
        Position {
            my,
            opp,
            side,
            combo,
            hash: zobrist::compute(my, opp, side),
        }
    }

    /// The classic Fanoron-Tsivy starting setup.
    ///
    /// The mover owns the two rows nearest it plus the alternating middle-row
    /// cells; the center stays empty. Middle row, mover's view:
    /// opp, own, opp, own, empty, opp, own, opp, own.
    pub fn starting() -> Position {
        let mut my = CellSet::EMPTY;
        let mut opp = CellSet::EMPTY;
        for col in 0..9 {
            opp = opp.with(Cell::new(0, col)).with(Cell::new(1, col));
            my = my.with(Cell::new(3, col)).with(Cell::new(4, col));
        }
        for col in [0, 2, 5, 7] {
            opp = opp.with(Cell::new(2, col));
        }
        for col in [1, 3, 6, 8] {
            my = my.with(Cell::new(2, col));
        }
        Position::new(my, opp, Side::Plus)
    }

    /// Own-piece occupancy (side to move).
    #[inline]
    pub const fn my(&self) -> CellSet {
        self.my
    }

    /// Opponent occupancy.
    #[inline]
    pub const fn opp(&self) -> CellSet {
        self.opp
    }

    /// The side to move.
    #[inline]
    pub const fn side(&self) -> Side {
        self.side
    }

    /// The capture chain in progress, if any.
    #[inline]
    pub const fn combo(&self) -> Option<Combo> {
        self.combo
    }

    /// Return `true` while a capture chain is running.
    #[inline]
    pub const fn in_combo(&self) -> bool {
        self.combo.is_some()
    }

    /// The cached zobrist hash.
    #[inline]
    pub const fn hash(&self) -> u64 {
        self.hash
    }
}

impl fmt::Debug for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Position")
            .field("my", &self.my)
            .field("opp", &self.opp)
            .field("side", &self.side)
            .field("combo", &self.combo)
            .field("hash", &format_args!("{:#018x}", self.hash))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::{Combo, Position, Side};
    use crate::cell::Cell;
    use crate::cellset::CellSet;
    use crate::direction::Direction;

    #[test]
    fn starting_position_shape() {
        let pos = Position::starting();
        assert_eq!(pos.my().count(), 22);
        assert_eq!(pos.opp().count(), 22);
        assert!((pos.my() & pos.opp()).is_empty());
        assert!(!pos.my().contains(Cell::CENTER));
        assert!(!pos.opp().contains(Cell::CENTER));
        assert_eq!(pos.side(), Side::Plus);
        assert!(!pos.in_combo());
    }

    #[test]
    fn starting_middle_row_alternates() {
        let pos = Position::starting();
        // Mover's view of row 2: opp own opp own . opp own opp own
        for (col, mine) in [(0, false), (1, true), (2, false), (3, true),
                            (5, false), (6, true), (7, false), (8, true)] {
            let cell = Cell::new(2, col);
            assert_eq!(pos.my().contains(cell), mine, "col {col}");
            assert_eq!(pos.opp().contains(cell), !mine, "col {col}");
        }
    }

    #[test]
    fn side_sign_roundtrip() {
        assert_eq!(Side::from_sign(1), Some(Side::Plus));
        assert_eq!(Side::from_sign(-1), Some(Side::Minus));
        assert_eq!(Side::from_sign(0), None);
        assert_eq!(Side::Plus.flip(), Side::Minus);
    }

    #[test]
    fn combo_substate_does_not_change_hash() {
        // Identical occupancy and side, one mid-chain: hashes collide even
        // though the legal-move sets differ. This mirrors the persisted
        // knowledge format and is relied on by the transposition table.
        let my = CellSet::from_cells(&[Cell::new(2, 2), Cell::new(3, 3)]);
        let opp = CellSet::from_cells(&[Cell::new(1, 1)]);
        let bare = Position::new(my, opp, Side::Plus);
        let chained = Position::with_combo(
            my,
            opp,
            Side::Plus,
            Some(Combo {
                piece: Cell::new(2, 2),
                prev: Cell::new(2, 3),
                visited: CellSet::from_cells(&[Cell::new(2, 3), Cell::new(2, 2)]),
                last_dir: Direction::West,
            }),
        );
        assert_eq!(bare.hash(), chained.hash());
        assert_ne!(bare, chained);
    }
}
