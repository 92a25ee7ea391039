//! Iterative-deepening search driver and reporting.

pub mod heuristics;
pub mod negascout;
pub mod ordering;
pub mod persist;
pub mod tt;

use std::collections::HashSet;
use std::fmt;
use std::fmt::Write as _;
use std::time::{Duration, Instant};

use fanorona_core::{Position, RESIGN_ACTION, apply, generate_moves, play};

use crate::engine::EngineConfig;
use heuristics::HistoryTable;
use negascout::{INF, MATE_SCORE, MATE_THRESHOLD, SearchContext, negascout};
use tt::{Bound, TranspositionTable, TtEntry};

/// Why the deepening loop ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// Every configured depth completed.
    MaxDepth,
    /// The time budget ran out mid-iteration.
    Time,
    /// A forced win or loss was proven.
    Mate,
    /// The side to move has no legal action.
    NoMoves,
}

impl fmt::Display for StopReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            StopReason::MaxDepth => "MaxDepth",
            StopReason::Time => "Time",
            StopReason::Mate => "Mate",
            StopReason::NoMoves => "NoMoves",
        };
        write!(f, "{name}")
    }
}

/// Coarse description of the engine's standing, derived from the score.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    Checkmate,
    Defeat,
    Crushing,
    Advantage,
    Critical,
    Pressure,
    Balanced,
    Resign,
}

impl Strategy {
    /// Classify a search score.
    pub fn for_score(score: i32) -> Strategy {
        if score > MATE_THRESHOLD {
            Strategy::Checkmate
        } else if score < -MATE_THRESHOLD {
            Strategy::Defeat
        } else if score >= 2000 {
            Strategy::Crushing
        } else if score >= 500 {
            Strategy::Advantage
        } else if score <= -2000 {
            Strategy::Critical
        } else if score <= -500 {
            Strategy::Pressure
        } else {
            Strategy::Balanced
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Strategy::Checkmate => "Checkmate",
            Strategy::Defeat => "Defeat",
            Strategy::Crushing => "Crushing",
            Strategy::Advantage => "Advantage",
            Strategy::Critical => "Critical",
            Strategy::Pressure => "Pressure",
            Strategy::Balanced => "Balanced",
            Strategy::Resign => "Resign",
        };
        write!(f, "{name}")
    }
}

/// Result of a completed search.
#[derive(Debug, Clone)]
pub struct SearchOutcome {
    /// Chosen action, or [`RESIGN_ACTION`] when no move exists.
    pub action: u16,
    /// Score at the deepest completed iteration.
    pub score: i32,
    /// Depth recorded for the root in the transposition table.
    pub depth: i32,
    pub stop: StopReason,
    pub nodes: u64,
    pub tt_hits: u64,
    pub elapsed: Duration,
    /// Share of last-iteration nodes spent on the first root move.
    /// High values mean the move ordering is doing its job.
    pub root_best_pct: f64,
    pub tt_hit_pct: f64,
    /// Human-readable expected line, e.g. `A: d3-e3 | H: c2-c3`.
    pub pv: String,
    /// The reply the table expects from the opponent, `-1` if unknown.
    pub predicted_reply: i32,
}

/// Search `pos` within the configured budget.
///
/// `recent` holds hashes of recently visited game states; a root move
/// whose child repeats one is not searched at all but scored with the
/// loop penalty, discouraging shuffling when ahead.
pub fn run(
    pos: &Position,
    tt: &TranspositionTable,
    history: &HistoryTable,
    recent: &[u64],
    config: &EngineConfig,
) -> SearchOutcome {
    let start = Instant::now();
    let mut ctx = SearchContext {
        tt,
        history,
        deadline: start + config.time_budget,
        nodes: 0,
        tt_hits: 0,
        stopped: false,
    };

    let mut moves = generate_moves(pos);
    if moves.is_empty() {
        return SearchOutcome {
            action: RESIGN_ACTION,
            score: -MATE_SCORE,
            depth: 0,
            stop: StopReason::NoMoves,
            nodes: 0,
            tt_hits: 0,
            elapsed: start.elapsed(),
            root_best_pct: 0.0,
            tt_hit_pct: 0.0,
            pv: String::from("Surrender"),
            predicted_reply: -1,
        };
    }

    ordering::sort_root_initial(&mut moves);
    let mut best_action = moves[0].action;
    let mut score = 0;
    let mut stop = StopReason::MaxDepth;
    let am_winning =
        pos.my().count() as i32 > pos.opp().count() as i32 + config.loop_lead_margin;

    let mut iteration_start_nodes = 0;
    let mut root_nodes_best = 0;
    for depth in 1..=config.max_depth {
        root_nodes_best = 0;
        iteration_start_nodes = ctx.nodes;
        if depth > 1 {
            ordering::sort_root_fronting(&mut moves, best_action);
        }

        let mut alpha = -INF;
        let beta = INF;
        let mut iter_score = -INF;
        let mut iter_action = moves[0].action;

        for (i, mv) in moves.iter().enumerate() {
            let child = play(pos, mv).position;
            let val = if recent.contains(&child.hash()) {
                if am_winning {
                    config.loop_penalty_winning
                } else {
                    config.loop_penalty_neutral
                }
            } else if child.side() == pos.side() {
                negascout(&mut ctx, &child, depth, alpha, beta, 1)
            } else {
                -negascout(&mut ctx, &child, depth - 1, -beta, -alpha, 1)
            };
            if ctx.stopped {
                break;
            }
            if i == 0 {
                root_nodes_best += ctx.nodes - iteration_start_nodes;
            }
            if val > iter_score {
                iter_score = val;
                iter_action = mv.action;
            }
            alpha = alpha.max(val);
            if alpha >= beta {
                break;
            }
        }

        if ctx.stopped {
            // Partial iterations are discarded; the previous depth stands.
            stop = StopReason::Time;
            break;
        }
        score = iter_score;
        best_action = iter_action;
        tt.store(
            pos.hash(),
            TtEntry {
                depth,
                score,
                bound: Bound::Exact,
                best: best_action as i32,
            },
        );
        if score.abs() > MATE_THRESHOLD {
            stop = StopReason::Mate;
            break;
        }
    }

    let elapsed = start.elapsed();
    let last_iter_nodes = (ctx.nodes - iteration_start_nodes).max(1);
    let predicted_reply = apply(pos, best_action)
        .ok()
        .and_then(|step| tt.probe(step.position.hash()))
        .map_or(-1, |e| e.best);

    SearchOutcome {
        action: best_action,
        score,
        depth: tt.probe(pos.hash()).map_or(0, |e| e.depth),
        stop,
        nodes: ctx.nodes,
        tt_hits: ctx.tt_hits,
        elapsed,
        root_best_pct: root_nodes_best as f64 * 100.0 / last_iter_nodes as f64,
        tt_hit_pct: ctx.tt_hits as f64 * 100.0 / ctx.nodes.max(1) as f64,
        pv: narrative_pv(pos, best_action, config.max_depth, tt),
        predicted_reply,
    }
}

/// Walk the transposition table from the root along best actions,
/// rendering each as board notation. `A:` segments are the searching
/// side's moves, `H:` the opponent's. Stops at unknown positions, at a
/// win, or when the line revisits a state.
fn narrative_pv(root: &Position, first: u16, max_steps: i32, tt: &TranspositionTable) -> String {
    let mut out = String::from("A:");
    let mut curr = *root;
    let mut seen = HashSet::new();
    let mut action = first as i32;
    let start_side = root.side();
    let mut last_side = start_side;

    for _ in 0..max_steps {
        if !seen.insert(curr.hash()) {
            break;
        }
        let moves = generate_moves(&curr);
        let Some(mv) = moves.iter().find(|m| m.action as i32 == action) else {
            break;
        };
        if curr.side() != last_side {
            out.push_str(if curr.side() == start_side { " | A:" } else { " | H:" });
            last_side = curr.side();
        }
        match (mv.from, mv.to) {
            (Some(from), Some(to)) => {
                let _ = write!(out, " {from}-{to}");
            }
            _ => out.push_str(" Stop"),
        }
        let step = play(&curr, mv);
        if step.win {
            out.push_str(" #WIN");
            break;
        }
        curr = step.position;
        let Some(e) = tt.probe(curr.hash()) else {
            break;
        };
        action = e.best;
    }
    out
}
