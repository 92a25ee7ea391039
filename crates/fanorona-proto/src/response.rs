//! Responses sent back to the game client.

use serde::Serialize;

use fanorona_core::{Move, WireState};

/// The engine's chosen move with its commentary.
#[derive(Debug, Clone, Serialize)]
pub struct ThinkResponse {
    pub action_id: i32,
    pub score: i32,
    pub strategy: String,
    pub pv: String,
}

/// The state after a move was applied.
#[derive(Debug, Clone, Serialize)]
pub struct MoveResponse {
    #[serde(flatten)]
    pub state: WireState,
    pub win: bool,
}

/// One legal move, described for the client.
#[derive(Debug, Clone, Serialize)]
pub struct MoveInfo {
    pub action_id: u16,
    /// `"approach"`, `"withdrawal"`, `"move"` or `"stop"`.
    pub kind: &'static str,
    /// Source cell index, `-1` for the stop action.
    pub from: i32,
    /// Destination cell index, `-1` for the stop action.
    pub to: i32,
    pub victims: Vec<i32>,
}

impl From<&Move> for MoveInfo {
    fn from(mv: &Move) -> MoveInfo {
        MoveInfo {
            action_id: mv.action,
            kind: mv.kind.as_str(),
            from: mv.from.map_or(-1, |c| c.index() as i32),
            to: mv.to.map_or(-1, |c| c.index() as i32),
            victims: mv.victims.iter().map(|c| c.index() as i32).collect(),
        }
    }
}

/// The legal moves in a state.
#[derive(Debug, Clone, Serialize)]
pub struct MovesResponse {
    pub moves: Vec<MoveInfo>,
}

/// Plain acknowledgement.
#[derive(Debug, Clone, Serialize)]
pub struct StatusResponse {
    pub status: &'static str,
}

impl StatusResponse {
    pub fn ok() -> StatusResponse {
        StatusResponse { status: "ok" }
    }
}

/// Size of the persistent memory.
#[derive(Debug, Clone, Serialize)]
pub struct MemoryStatsResponse {
    pub count: usize,
}

/// A failed request.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}
