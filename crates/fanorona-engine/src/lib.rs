//! Fanorona search engine: negascout over capture chains, a persistent
//! transposition table, and opponent-move prediction.

mod eval;

pub mod engine;
pub mod search;

pub use engine::{Engine, EngineConfig, Feedback, ThinkResult};
pub use search::persist::MemoryError;
pub use search::{SearchOutcome, StopReason, Strategy};
