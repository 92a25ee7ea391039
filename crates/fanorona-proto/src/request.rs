//! Client requests, one JSON object per line.

use serde::Deserialize;

use fanorona_core::WireState;

/// A request from the game client, tagged by `op`.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Request {
    /// Ask the engine for its move in the given state.
    Think { state: WireState },
    /// Apply a move (human or the engine's own echo) to the state.
    Move { state: WireState, action_id: u16 },
    /// List the legal moves in the given state.
    Moves { state: WireState },
    /// Start a fresh game, keeping learned memory.
    Restart,
    /// Report the size of the persistent memory.
    MemoryStats,
}
