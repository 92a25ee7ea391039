//! The JSON-facing state encoding shared with game clients.
//!
//! Clients see an absolute board: 45 markers valued `1` (plus player),
//! `-1` (minus player) or `0`, plus a side-to-move sign and the chain
//! fields `inCombo` / `comboPiece` / `prevPos`. Internally everything is
//! relative to the side to move, so this module is the only place the
//! two views meet. Decoding is strict: anything that does not describe a
//! reachable-shaped state is an error, never a panic.

use serde::{Deserialize, Serialize};

use crate::cell::Cell;
use crate::cellset::CellSet;
use crate::direction::Direction;
use crate::error::DecodeError;
use crate::position::{Combo, Position, Side};
use crate::topology;

const fn no_cell() -> i32 {
    -1
}

/// A game state as it travels over the wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WireState {
    /// Row-major markers for all 45 intersections.
    pub board: Vec<i8>,
    /// Side to move: `1` or `-1`.
    pub player: i32,
    #[serde(rename = "inCombo", default)]
    pub in_combo: bool,
    /// Index of the mid-chain piece, `-1` when idle.
    #[serde(rename = "comboPiece", default = "no_cell")]
    pub combo_piece: i32,
    /// Cell the chain piece last left, `-1` when idle.
    #[serde(rename = "prevPos", default = "no_cell")]
    pub prev_pos: i32,
    /// Cells used by the chain so far. Optional on requests; older
    /// clients only echo the piece and its previous cell.
    #[serde(default)]
    pub visited: Vec<i32>,
}

fn cell_field(field: &'static str, value: i32) -> Result<Cell, DecodeError> {
    u8::try_from(value)
        .ok()
        .and_then(Cell::from_index)
        .ok_or(DecodeError::BadCell { field, found: value })
}

impl WireState {
    /// Validate and convert into an internal position.
    pub fn to_position(&self) -> Result<Position, DecodeError> {
        if self.board.len() != Cell::COUNT {
            return Err(DecodeError::BadBoardLength { found: self.board.len() });
        }
        let mut plus = CellSet::EMPTY;
        let mut minus = CellSet::EMPTY;
        for (idx, &marker) in self.board.iter().enumerate() {
            let cell = Cell::from_index(idx as u8).ok_or(DecodeError::BadBoardLength {
                found: self.board.len(),
            })?;
            match marker {
                1 => plus = plus.with(cell),
                -1 => minus = minus.with(cell),
                0 => {}
                other => return Err(DecodeError::BadMarker { cell: idx, found: other }),
            }
        }

        let side = i8::try_from(self.player)
            .ok()
            .and_then(Side::from_sign)
            .ok_or(DecodeError::BadSide { found: self.player })?;
        let (my, opp) = match side {
            Side::Plus => (plus, minus),
            Side::Minus => (minus, plus),
        };

        let combo = if self.in_combo {
            if self.combo_piece < 0 || self.prev_pos < 0 {
                return Err(DecodeError::MissingComboFields);
            }
            let piece = cell_field("comboPiece", self.combo_piece)?;
            let prev = cell_field("prevPos", self.prev_pos)?;
            if !my.contains(piece) {
                return Err(DecodeError::ComboPieceNotOwn { piece: self.combo_piece });
            }
            let last_dir = Direction::ALL
                .into_iter()
                .find(|&d| topology::neighbor(prev, d) == Some(piece))
                .ok_or(DecodeError::ComboNotAdjacent {
                    prev: self.prev_pos,
                    piece: self.combo_piece,
                })?;
            let mut visited = CellSet::from_cells(&[prev, piece]);
            for &idx in &self.visited {
                visited = visited.with(cell_field("visited", idx)?);
            }
            Some(Combo { piece, prev, visited, last_dir })
        } else {
            // Stale chain fields on an idle state are ignored.
            None
        };

        Ok(Position::with_combo(my, opp, side, combo))
    }

    /// Encode an internal position for the wire.
    pub fn from_position(pos: &Position) -> WireState {
        let sign = pos.side().sign();
        let mut board = vec![0i8; Cell::COUNT];
        for cell in pos.my() {
            board[cell.index()] = sign;
        }
        for cell in pos.opp() {
            board[cell.index()] = -sign;
        }
        let (in_combo, combo_piece, prev_pos, visited) = match pos.combo() {
            Some(combo) => (
                true,
                combo.piece.index() as i32,
                combo.prev.index() as i32,
                combo.visited.iter().map(|c| c.index() as i32).collect(),
            ),
            None => (false, -1, -1, Vec::new()),
        };
        WireState {
            board,
            player: pos.side().sign() as i32,
            in_combo,
            combo_piece,
            prev_pos,
            visited,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::WireState;
    use crate::cell::Cell;
    use crate::cellset::CellSet;
    use crate::direction::Direction;
    use crate::error::DecodeError;
    use crate::position::{Combo, Position, Side};

    #[test]
    fn starting_position_roundtrip() {
        let pos = Position::starting();
        let wire = WireState::from_position(&pos);
        assert_eq!(wire.player, 1);
        assert_eq!(wire.board.iter().filter(|&&m| m == 1).count(), 22);
        assert_eq!(wire.board.iter().filter(|&&m| m == -1).count(), 22);
        assert_eq!(wire.to_position().unwrap(), pos);
    }

    #[test]
    fn minus_player_view_swaps_sets() {
        let my = CellSet::from_cells(&[Cell::new(0, 0)]);
        let opp = CellSet::from_cells(&[Cell::new(4, 8)]);
        let pos = Position::new(my, opp, Side::Minus);
        let wire = WireState::from_position(&pos);
        assert_eq!(wire.player, -1);
        assert_eq!(wire.board[0], -1);
        assert_eq!(wire.board[44], 1);
        assert_eq!(wire.to_position().unwrap(), pos);
    }

    #[test]
    fn combo_roundtrip_recovers_direction() {
        let combo = Combo {
            piece: Cell::CENTER,
            prev: Cell::new(2, 3),
            visited: CellSet::from_cells(&[Cell::new(2, 2), Cell::new(2, 3), Cell::CENTER]),
            last_dir: Direction::East,
        };
        let pos = Position::with_combo(
            CellSet::from_cells(&[Cell::CENTER]),
            CellSet::from_cells(&[Cell::new(0, 0)]),
            Side::Plus,
            Some(combo),
        );
        let wire = WireState::from_position(&pos);
        assert!(wire.in_combo);
        assert_eq!(wire.to_position().unwrap(), pos);
    }

    #[test]
    fn rejects_bad_board_length() {
        let wire = WireState {
            board: vec![0; 44],
            player: 1,
            in_combo: false,
            combo_piece: -1,
            prev_pos: -1,
            visited: Vec::new(),
        };
        assert_eq!(wire.to_position(), Err(DecodeError::BadBoardLength { found: 44 }));
    }

    #[test]
    fn rejects_bad_marker_and_side() {
        let mut wire = WireState::from_position(&Position::starting());
        wire.board[7] = 3;
        assert_eq!(wire.to_position(), Err(DecodeError::BadMarker { cell: 7, found: 3 }));
        wire.board[7] = 0;
        wire.player = 2;
        assert_eq!(wire.to_position(), Err(DecodeError::BadSide { found: 2 }));
    }

    #[test]
    fn rejects_inconsistent_combo_fields() {
        let mut wire = WireState::from_position(&Position::starting());
        wire.in_combo = true;
        assert_eq!(wire.to_position(), Err(DecodeError::MissingComboFields));

        wire.combo_piece = 99;
        wire.prev_pos = 22;
        assert_eq!(
            wire.to_position(),
            Err(DecodeError::BadCell { field: "comboPiece", found: 99 })
        );

        // Cell 22 (the center) is empty at the start, so no side owns it.
        wire.combo_piece = 22;
        wire.prev_pos = 21;
        assert_eq!(wire.to_position(), Err(DecodeError::ComboPieceNotOwn { piece: 22 }));

        // d3 and f3 are both plus pieces but are not adjacent.
        wire.combo_piece = 21;
        wire.prev_pos = 19;
        assert_eq!(
            wire.to_position(),
            Err(DecodeError::ComboNotAdjacent { prev: 19, piece: 21 })
        );
    }

    #[test]
    fn stale_combo_fields_ignored_when_idle() {
        let mut wire = WireState::from_position(&Position::starting());
        wire.combo_piece = 21;
        wire.prev_pos = 20;
        let pos = wire.to_position().unwrap();
        assert!(!pos.in_combo());
    }
}
