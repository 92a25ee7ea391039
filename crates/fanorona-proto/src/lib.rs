//! Line protocol between the engine and game clients.
//!
//! Requests arrive as one JSON object per line tagged with an `op`
//! field; every request gets exactly one JSON object back. Failures of
//! any kind are answered with an `{"error": ...}` object, never by
//! closing the stream.

mod request;
mod response;

pub use request::Request;
pub use response::{
    ErrorResponse, MemoryStatsResponse, MoveInfo, MoveResponse, MovesResponse, StatusResponse,
    ThinkResponse,
};

use fanorona_core::{WireState, apply, generate_moves};
use fanorona_engine::Engine;
use serde::Serialize;

/// Handle one request line and produce one response line.
pub fn handle(engine: &Engine, line: &str) -> String {
    match dispatch(engine, line) {
        Ok(json) => json,
        Err(error) => {
            tracing::warn!(%error, "request failed");
            encode(&ErrorResponse { error })
        }
    }
}

fn dispatch(engine: &Engine, line: &str) -> Result<String, String> {
    let request: Request =
        serde_json::from_str(line).map_err(|e| format!("bad request: {e}"))?;
    match request {
        Request::Think { state } => {
            let pos = state.to_position().map_err(|e| e.to_string())?;
            let result = engine.think(&pos);
            Ok(encode(&ThinkResponse {
                action_id: result.action as i32,
                score: result.score,
                strategy: result.strategy.to_string(),
                pv: result.pv,
            }))
        }
        Request::Move { state, action_id } => {
            let pos = state.to_position().map_err(|e| e.to_string())?;
            engine.analyze_human_move(action_id);
            engine.record_state(pos.hash());
            let step = apply(&pos, action_id).map_err(|e| e.to_string())?;
            engine.record_state(step.position.hash());
            Ok(encode(&MoveResponse {
                state: WireState::from_position(&step.position),
                win: step.win,
            }))
        }
        Request::Moves { state } => {
            let pos = state.to_position().map_err(|e| e.to_string())?;
            let moves = generate_moves(&pos);
            Ok(encode(&MovesResponse {
                moves: moves.iter().map(MoveInfo::from).collect(),
            }))
        }
        Request::Restart => {
            engine.reset_game();
            Ok(encode(&StatusResponse::ok()))
        }
        Request::MemoryStats => Ok(encode(&MemoryStatsResponse {
            count: engine.memory_len(),
        })),
    }
}

fn encode<T: Serialize>(response: &T) -> String {
    serde_json::to_string(response)
        .unwrap_or_else(|_| String::from(r#"{"error":"response encoding failed"}"#))
}
