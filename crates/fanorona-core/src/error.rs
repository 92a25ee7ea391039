//! Error types for state decoding and move application.

use thiserror::Error;

/// A client-supplied game state failed validation.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DecodeError {
    #[error("board must have 45 cells, got {found}")]
    BadBoardLength { found: usize },

    #[error("cell {cell} holds invalid marker {found}, expected -1, 0 or 1")]
    BadMarker { cell: usize, found: i8 },

    #[error("player must be 1 or -1, got {found}")]
    BadSide { found: i32 },

    #[error("{field} index {found} is outside the board")]
    BadCell { field: &'static str, found: i32 },

    #[error("inCombo set but comboPiece or prevPos is missing")]
    MissingComboFields,

    #[error("combo piece {piece} is not owned by the side to move")]
    ComboPieceNotOwn { piece: i32 },

    #[error("prevPos {prev} is not adjacent to combo piece {piece}")]
    ComboNotAdjacent { prev: i32, piece: i32 },
}

/// A well-decoded position rejected an action.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RuleError {
    #[error("action id {action} does not encode a move")]
    BadAction { action: u16 },

    #[error("action {action} is not legal in this position")]
    IllegalAction { action: u16 },
}
