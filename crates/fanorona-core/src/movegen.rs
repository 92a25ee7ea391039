//! Legal move generation and move application.
//!
//! Capture rules: a piece moving onto an empty adjacent cell captures by
//! *approach* (the contiguous opponent run just beyond the landing cell,
//! in the travel direction) or by *withdrawal* (the run just behind the
//! source, traced away from it). Captures are mandatory: if any exist,
//! quiet moves are not legal. A capture may continue as a chain with the
//! same piece, never repeating the previous travel direction and never
//! landing on a cell the chain already used.

use crate::cell::Cell;
use crate::cellset::CellSet;
use crate::direction::Direction;
use crate::error::RuleError;
use crate::moves::{Move, MoveKind, STOP_ACTION};
use crate::position::{Combo, Position, Side};
use crate::topology;

/// Outcome of applying one action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Step {
    /// The resulting position. After a won game this still belongs to the
    /// winner, chain state included, so a client can replay the final run.
    pub position: Position,
    /// `true` when the move removed the opponent's last piece.
    pub win: bool,
}

/// Walk a contiguous opponent run starting at `start`, in `dir`.
fn trace_run(opp: CellSet, start: Option<Cell>, dir: Direction) -> Vec<Cell> {
    let mut victims = Vec::new();
    let mut cur = start;
    while let Some(cell) = cur {
        if !opp.contains(cell) {
            break;
        }
        victims.push(cell);
        cur = topology::neighbor(cell, dir);
    }
    victims
}

/// The approach and withdrawal runs for a `from -> to` step along `dir`.
fn runs_for_step(opp: CellSet, from: Cell, to: Cell, dir: Direction) -> (Vec<Cell>, Vec<Cell>) {
    let approach = trace_run(opp, topology::neighbor(to, dir), dir);
    let back = dir.opposite();
    let withdrawal = trace_run(opp, topology::neighbor(from, back), back);
    (approach, withdrawal)
}

fn push_captures(moves: &mut Vec<Move>, opp: CellSet, from: Cell, to: Cell, dir: Direction) {
    let (approach, withdrawal) = runs_for_step(opp, from, to, dir);
    if !approach.is_empty() {
        moves.push(Move {
            action: Move::encode_action(from, dir, false),
            kind: MoveKind::Approach,
            from: Some(from),
            to: Some(to),
            victims: approach,
        });
    }
    if !withdrawal.is_empty() {
        moves.push(Move {
            action: Move::encode_action(from, dir, true),
            kind: MoveKind::Withdrawal,
            from: Some(from),
            to: Some(to),
            victims: withdrawal,
        });
    }
}

/// Capture continuations available to a mid-chain piece.
fn chain_captures(my: CellSet, opp: CellSet, combo: &Combo) -> Vec<Move> {
    let occupied = my | opp;
    let mut moves = Vec::new();
    for dir in Direction::ALL {
        if dir == combo.last_dir {
            continue;
        }
        let Some(to) = topology::neighbor(combo.piece, dir) else {
            continue;
        };
        if occupied.contains(to) || combo.visited.contains(to) {
            continue;
        }
        push_captures(&mut moves, opp, combo.piece, to, dir);
    }
    moves
}

/// Generate every legal move in the position.
///
/// Mid-chain this is the piece's capture continuations plus the stop
/// action. Otherwise it is every capture move if any exist, and every
/// quiet move only when none do.
pub fn generate_moves(pos: &Position) -> Vec<Move> {
    if let Some(combo) = pos.combo() {
        let mut moves = chain_captures(pos.my(), pos.opp(), &combo);
        moves.push(Move::stop());
        return moves;
    }

    let occupied = pos.my() | pos.opp();
    let mut captures = Vec::new();
    let mut quiets = Vec::new();
    for from in pos.my() {
        for dir in Direction::ALL {
            let Some(to) = topology::neighbor(from, dir) else {
                continue;
            };
            if occupied.contains(to) {
                continue;
            }
            let before = captures.len();
            push_captures(&mut captures, pos.opp(), from, to, dir);
            if captures.len() == before {
                quiets.push(Move {
                    action: Move::encode_action(from, dir, false),
                    kind: MoveKind::Quiet,
                    from: Some(from),
                    to: Some(to),
                    victims: Vec::new(),
                });
            }
        }
    }
    if captures.is_empty() { quiets } else { captures }
}

/// Hand the turn to the other side, clearing any chain state.
fn end_turn(my: CellSet, opp: CellSet, side: Side) -> Position {
    Position::new(opp, my, side.flip())
}

/// Apply a move known to be legal in `pos`.
///
/// The move must come from [`generate_moves`] on the same position;
/// victims are taken as given rather than re-traced.
pub fn play(pos: &Position, mv: &Move) -> Step {
    let (Some(from), Some(to), Some(dir)) = (mv.from, mv.to, mv.direction()) else {
        // Stop action: the chain ends and the turn passes.
        return Step {
            position: end_turn(pos.my(), pos.opp(), pos.side()),
            win: false,
        };
    };

    let my = pos.my().without(from).with(to);
    let mut opp = pos.opp();
    for &victim in &mv.victims {
        opp = opp.without(victim);
    }

    if mv.victims.is_empty() {
        return Step {
            position: end_turn(my, opp, pos.side()),
            win: false,
        };
    }

    let visited = match pos.combo() {
        Some(combo) => combo.visited.with(to),
        None => CellSet::from_cells(&[from, to]),
    };
    let combo = Combo {
        piece: to,
        prev: from,
        visited,
        last_dir: dir,
    };

    if opp.is_empty() {
        // Final capture: keep the winner to move so the chain is readable.
        return Step {
            position: Position::with_combo(my, opp, pos.side(), Some(combo)),
            win: true,
        };
    }

    if chain_captures(my, opp, &combo).is_empty() {
        Step {
            position: end_turn(my, opp, pos.side()),
            win: false,
        }
    } else {
        Step {
            position: Position::with_combo(my, opp, pos.side(), Some(combo)),
            win: false,
        }
    }
}

/// Validate an action id against the position and apply it.
pub fn apply(pos: &Position, action: u16) -> Result<Step, RuleError> {
    let moves = generate_moves(pos);
    match moves.iter().find(|m| m.action == action) {
        Some(mv) => Ok(play(pos, mv)),
        None if Move::decode_action(action).is_none() && action != STOP_ACTION => {
            Err(RuleError::BadAction { action })
        }
        None => Err(RuleError::IllegalAction { action }),
    }
}
