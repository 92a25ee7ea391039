//! Move representation and the packed action-id encoding.

use std::fmt;

use crate::cell::Cell;
use crate::direction::Direction;

/// Action id ending a capture chain voluntarily.
pub const STOP_ACTION: u16 = 720;

/// Out-of-range sentinel returned when the engine has no legal action.
pub const RESIGN_ACTION: u16 = 721;

/// Offset distinguishing withdrawal actions from approach/quiet ones.
const WITHDRAWAL_OFFSET: u16 = 360;

/// What a move does.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveKind {
    /// A plain single-step move; legal only when no capture exists.
    Quiet,
    /// Capture by moving toward an opponent run.
    Approach,
    /// Capture by moving away from an opponent run.
    Withdrawal,
    /// Synthetic end-of-chain action (id 720).
    Stop,
}

impl MoveKind {
    /// Wire name used by the client protocol.
    pub const fn as_str(self) -> &'static str {
        match self {
            MoveKind::Quiet => "move",
            MoveKind::Approach => "approach",
            MoveKind::Withdrawal => "withdrawal",
            MoveKind::Stop => "stop",
        }
    }
}

/// A fully-resolved action in some position.
///
/// `victims` lists captured cells in run order; replay and animation care
/// about the order, the engine only about the set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Move {
    /// Packed action id: `cell*8 + dir`, `+360` for withdrawals, 720 = stop.
    pub action: u16,
    pub kind: MoveKind,
    /// Source cell; `None` for the stop action.
    pub from: Option<Cell>,
    /// Destination cell; `None` for the stop action.
    pub to: Option<Cell>,
    pub victims: Vec<Cell>,
}

impl Move {
    /// The synthetic stop-chain move.
    pub fn stop() -> Move {
        Move {
            action: STOP_ACTION,
            kind: MoveKind::Stop,
            from: None,
            to: None,
            victims: Vec::new(),
        }
    }

    /// Pack a source cell and direction into an action id.
    pub const fn encode_action(from: Cell, dir: Direction, withdrawal: bool) -> u16 {
        let base = (from.index() * 8 + dir.index()) as u16;
        if withdrawal { base + WITHDRAWAL_OFFSET } else { base }
    }

    /// Unpack an action id into (source, direction, is_withdrawal).
    ///
    /// Returns `None` for the stop action, the resign sentinel, and any id
    /// outside the packed range.
    pub const fn decode_action(action: u16) -> Option<(Cell, Direction, bool)> {
        if action >= STOP_ACTION {
            return None;
        }
        let withdrawal = action >= WITHDRAWAL_OFFSET;
        let norm = if withdrawal { action - WITHDRAWAL_OFFSET } else { action };
        let cell = match Cell::from_index((norm / 8) as u8) {
            Some(c) => c,
            None => return None,
        };
        let dir = match Direction::from_index((norm % 8) as u8) {
            Some(d) => d,
            None => return None,
        };
        Some((cell, dir, withdrawal))
    }

    /// The travel direction encoded in the action id, if any.
    pub const fn direction(&self) -> Option<Direction> {
        match Self::decode_action(self.action) {
            Some((_, dir, _)) => Some(dir),
            None => None,
        }
    }

    /// Return `true` for approach and withdrawal moves.
    pub fn is_capture(&self) -> bool {
        matches!(self.kind, MoveKind::Approach | MoveKind::Withdrawal)
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.from, self.to) {
            (Some(from), Some(to)) => write!(f, "{from}-{to}"),
            _ => write!(f, "Stop"),
        }
    }
}
