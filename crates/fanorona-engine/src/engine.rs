//! The engine facade: search, game memory, and opponent modeling.

use std::collections::VecDeque;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use fanorona_core::{Position, RESIGN_ACTION};

use crate::search::heuristics::HistoryTable;
use crate::search::persist;
use crate::search::tt::TranspositionTable;
use crate::search::{SearchOutcome, StopReason, Strategy, run};

/// How many recent state hashes are kept for repetition detection.
const RECENT_LIMIT: usize = 500;

/// Tunable engine parameters.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Wall-clock budget per think call.
    pub time_budget: Duration,
    /// Iterative-deepening ceiling.
    pub max_depth: i32,
    /// Transposition-table prune ceiling.
    pub max_entries: usize,
    /// Piece lead required before repetitions are penalized.
    pub loop_lead_margin: i32,
    /// Root score for a repeating move while ahead.
    pub loop_penalty_winning: i32,
    /// Root score for a repeating move otherwise.
    pub loop_penalty_neutral: i32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            time_budget: Duration::from_millis(1000),
            max_depth: 1000,
            max_entries: 1_000_000,
            loop_lead_margin: 1,
            loop_penalty_winning: -25_000,
            loop_penalty_neutral: 0,
        }
    }
}

/// Outcome of the engine's last opponent-move prediction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Feedback {
    /// No prediction has been made yet.
    Initial,
    /// The game was restarted.
    Reset,
    /// The engine's own move came back; waiting for the human.
    Waiting,
    /// The human played the predicted move.
    Hit,
    /// The human played something else.
    Miss,
}

impl fmt::Display for Feedback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Feedback::Initial => "Initial",
            Feedback::Reset => "Reset",
            Feedback::Waiting => "Wait...",
            Feedback::Hit => "Hit",
            Feedback::Miss => "Miss",
        };
        write!(f, "{name}")
    }
}

/// What the engine wants to play, with its commentary.
#[derive(Debug, Clone)]
pub struct ThinkResult {
    /// Chosen action id, or [`RESIGN_ACTION`] if nothing is legal.
    pub action: u16,
    pub score: i32,
    /// Narrative principal variation.
    pub pv: String,
    pub strategy: Strategy,
}

/// Per-game mutable state behind one lock.
struct SharedState {
    recent: VecDeque<u64>,
    pending_engine_action: i32,
    predicted_reply: i32,
    feedback: Feedback,
}

impl SharedState {
    fn new() -> Self {
        Self {
            recent: VecDeque::new(),
            pending_engine_action: -1,
            predicted_reply: -1,
            feedback: Feedback::Initial,
        }
    }
}

/// A Fanorona engine with persistent memory.
///
/// All receivers are `&self`; the engine can be shared behind an `Arc`
/// between a request loop and the autosave thread. Searches are not
/// reentrant by contract (the caller serializes think calls) but
/// memory saves may overlap a search freely.
pub struct Engine {
    config: EngineConfig,
    tt: TranspositionTable,
    history: HistoryTable,
    shared: Mutex<SharedState>,
    save_guard: Mutex<()>,
}

impl Engine {
    pub fn new(config: EngineConfig) -> Self {
        let tt = TranspositionTable::new(config.max_entries);
        Self {
            config,
            tt,
            history: HistoryTable::new(),
            shared: Mutex::new(SharedState::new()),
            save_guard: Mutex::new(()),
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Number of remembered positions.
    pub fn memory_len(&self) -> usize {
        self.tt.len()
    }

    /// Note a visited game state for repetition detection.
    pub fn record_state(&self, hash: u64) {
        let mut shared = self.lock_shared();
        shared.recent.push_back(hash);
        if shared.recent.len() > RECENT_LIMIT {
            shared.recent.pop_front();
        }
    }

    /// Forget the current game: repetition log and prediction state.
    /// Learned memory (table and history counters) is kept.
    pub fn reset_game(&self) {
        let mut shared = self.lock_shared();
        shared.recent.clear();
        shared.pending_engine_action = -1;
        shared.predicted_reply = -1;
        shared.feedback = Feedback::Reset;
    }

    /// Grade an incoming move against the last prediction.
    ///
    /// The engine's own chosen move echoes back through the move channel
    /// first; that one only arms the predictor. The next move is the
    /// human's and is scored as a hit or a miss.
    pub fn analyze_human_move(&self, action: u16) {
        let mut shared = self.lock_shared();
        if action as i32 == shared.pending_engine_action {
            shared.pending_engine_action = -1;
            shared.feedback = Feedback::Waiting;
            return;
        }
        if shared.predicted_reply != -1 {
            shared.feedback = if action as i32 == shared.predicted_reply {
                Feedback::Hit
            } else {
                Feedback::Miss
            };
        }
    }

    /// The last prediction outcome.
    pub fn feedback(&self) -> Feedback {
        self.lock_shared().feedback
    }

    /// Search the position and pick a move.
    pub fn think(&self, pos: &Position) -> ThinkResult {
        let recent: Vec<u64> = {
            let shared = self.lock_shared();
            shared.recent.iter().copied().collect()
        };

        let outcome = run(pos, &self.tt, &self.history, &recent, &self.config);
        self.log_outcome(&outcome);

        let strategy = if outcome.action == RESIGN_ACTION {
            Strategy::Resign
        } else {
            Strategy::for_score(outcome.score)
        };

        let mut shared = self.lock_shared();
        shared.pending_engine_action = outcome.action as i32;
        shared.predicted_reply = outcome.predicted_reply;
        drop(shared);

        ThinkResult {
            action: outcome.action,
            score: outcome.score,
            pv: outcome.pv,
            strategy,
        }
    }

    fn log_outcome(&self, outcome: &SearchOutcome) {
        if outcome.stop == StopReason::NoMoves {
            tracing::info!("no legal moves, resigning");
            return;
        }
        let seconds = outcome.elapsed.as_secs_f64().max(0.001);
        tracing::info!(
            stop = %outcome.stop,
            depth = outcome.depth,
            nodes = outcome.nodes,
            knps = (outcome.nodes as f64 / seconds / 1000.0) as u64,
            tt_hit_pct = outcome.tt_hit_pct as u64,
            root_pct = outcome.root_best_pct as u64,
            prediction = %self.feedback(),
            pv = %outcome.pv,
            "search finished"
        );
    }

    /// Restore the memory file, if one exists.
    ///
    /// A corrupt file is logged and the in-memory state reset; it is
    /// never fatal.
    pub fn load_memory(&self, path: &Path) {
        if !path.exists() {
            tracing::info!(path = %path.display(), "no memory file, starting fresh");
            return;
        }
        match persist::load(path, &self.tt, &self.history) {
            Ok(entries) => {
                tracing::info!(entries, path = %path.display(), "memory restored");
            }
            Err(e) => {
                tracing::warn!(error = %e, path = %path.display(), "memory corrupted, resetting");
                self.tt.clear();
                self.history.reset();
            }
        }
    }

    /// Prune and persist the memory file.
    ///
    /// Serialized against concurrent saves; a search running at the same
    /// time keeps storing into the table unhindered.
    pub fn save_memory(&self, path: &Path) -> std::io::Result<()> {
        let _guard = self.save_guard.lock().expect("save guard poisoned");
        self.tt.prune();
        persist::save(path, &self.tt, &self.history)?;
        tracing::info!(entries = self.tt.len(), path = %path.display(), "memory saved");
        Ok(())
    }

    /// Start a detached background thread that saves the memory file on
    /// a fixed interval.
    pub fn spawn_autosave(self: &Arc<Self>, path: PathBuf, interval: Duration) {
        let engine = Arc::clone(self);
        std::thread::spawn(move || {
            loop {
                std::thread::sleep(interval);
                if let Err(e) = engine.save_memory(&path) {
                    tracing::warn!(error = %e, "autosave failed");
                }
            }
        });
    }

    fn lock_shared(&self) -> std::sync::MutexGuard<'_, SharedState> {
        self.shared.lock().expect("state mutex poisoned")
    }
}

impl fmt::Debug for Engine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Engine")
            .field("tt", &self.tt)
            .field("config", &self.config)
            .finish()
    }
}
