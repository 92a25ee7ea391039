//! Core Fanorona types: board representation, move generation, and game rules.

mod cell;
mod cellset;
mod direction;
mod error;
mod movegen;
mod moves;
mod position;
mod topology;
mod wire;
mod zobrist;

pub use cell::Cell;
pub use cellset::CellSet;
pub use direction::Direction;
pub use error::{DecodeError, RuleError};
pub use movegen::{Step, apply, generate_moves, play};
pub use moves::{Move, MoveKind, RESIGN_ACTION, STOP_ACTION};
pub use position::{Combo, Position, Side};
pub use topology::{CELL_VALUE, neighbor};
pub use wire::WireState;
