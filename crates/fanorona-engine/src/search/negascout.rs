//! Principal-variation search over capture chains.
//!
//! Standard negascout with one twist: a move that keeps the turn (a
//! capture that opens a chain) descends at the *same* depth without
//! negation, since the child is still this side's decision. Only a
//! turn-passing child flips perspective and burns a ply of depth.

use std::time::Instant;

use fanorona_core::{Position, generate_moves, play};

use crate::eval::evaluate;
use crate::search::heuristics::HistoryTable;
use crate::search::ordering;
use crate::search::tt::{Bound, TranspositionTable, TtEntry};

/// Window sentinel, larger than any reachable score.
pub const INF: i32 = 100_000_000;

/// Base score for a won position.
pub const MATE_SCORE: i32 = 90_000_000;

/// Scores beyond this magnitude mean a forced win or loss was found.
pub const MATE_THRESHOLD: i32 = 80_000_000;

/// Hard recursion ceiling. Chain extensions and the depth-0 combo
/// re-search can stack plies past the nominal depth; past this point
/// the node falls back to static evaluation.
pub(crate) const MAX_PLY: u32 = 128;

/// How often (in nodes) the clock is consulted.
const TICK_MASK: u64 = 4095;

/// Mutable per-search state threaded through the recursion.
pub(crate) struct SearchContext<'a> {
    pub tt: &'a TranspositionTable,
    pub history: &'a HistoryTable,
    pub deadline: Instant,
    pub nodes: u64,
    pub tt_hits: u64,
    pub stopped: bool,
}

impl SearchContext<'_> {
    /// Count a node and poll the clock every `TICK_MASK + 1` nodes.
    fn tick(&mut self) {
        if self.nodes & TICK_MASK == 0 && Instant::now() > self.deadline {
            self.stopped = true;
        }
        self.nodes += 1;
    }
}

/// A mate found with `depth` remaining; shallower mates score higher.
pub(crate) const fn mate_in(depth: i32) -> i32 {
    MATE_SCORE - (50 - depth)
}

pub(crate) fn negascout(
    ctx: &mut SearchContext<'_>,
    pos: &Position,
    depth: i32,
    mut alpha: i32,
    mut beta: i32,
    ply: u32,
) -> i32 {
    ctx.tick();
    if ctx.stopped {
        return alpha;
    }

    let entry = ctx.tt.probe(pos.hash());
    if let Some(e) = entry
        && e.depth >= depth
    {
        ctx.tt_hits += 1;
        match e.bound {
            Bound::Exact => return e.score,
            Bound::Lower => alpha = alpha.max(e.score),
            Bound::Upper => beta = beta.min(e.score),
        }
        if alpha >= beta {
            return e.score;
        }
    }

    if pos.opp().is_empty() {
        return mate_in(depth);
    }
    if ply >= MAX_PLY {
        return evaluate(pos);
    }
    if depth <= 0 {
        // A chain in progress is too sharp to evaluate statically; give
        // it one more ply to resolve.
        return if pos.in_combo() {
            negascout(ctx, pos, 1, alpha, beta, ply + 1)
        } else {
            evaluate(pos)
        };
    }

    let mut moves = generate_moves(pos);
    if moves.is_empty() {
        return -mate_in(depth);
    }
    let tt_action = entry.map_or(-1, |e| e.best);
    ordering::sort_moves(&mut moves, tt_action, ctx.history);

    let alpha_orig = alpha;
    let mut best_score = -INF;
    let mut best_action: i32 = -1;

    for (i, mv) in moves.iter().enumerate() {
        let child = play(pos, mv).position;
        let val = if child.side() == pos.side() {
            // Same side still to move: no negation, no depth spent.
            negascout(ctx, &child, depth, alpha, beta, ply + 1)
        } else if i == 0 {
            -negascout(ctx, &child, depth - 1, -beta, -alpha, ply + 1)
        } else {
            let scout = -negascout(ctx, &child, depth - 1, -alpha - 1, -alpha, ply + 1);
            if scout > alpha && scout < beta {
                -negascout(ctx, &child, depth - 1, -beta, -alpha, ply + 1)
            } else {
                scout
            }
        };
        if ctx.stopped {
            return alpha;
        }
        if val > best_score {
            best_score = val;
            best_action = mv.action as i32;
        }
        if val > alpha {
            alpha = val;
            if let (Some(from), Some(to)) = (mv.from, mv.to) {
                ctx.history.reward(from, to, depth);
            }
        }
        if alpha >= beta {
            break;
        }
    }

    if !ctx.stopped {
        let bound = if best_score <= alpha_orig {
            Bound::Upper
        } else if best_score >= beta {
            Bound::Lower
        } else {
            Bound::Exact
        };
        ctx.tt.store(
            pos.hash(),
            TtEntry {
                depth,
                score: best_score,
                bound,
                best: best_action,
            },
        );
    }
    best_score
}

#[cfg(test)]
mod tests {
    use std::time::{Duration, Instant};

    use super::{INF, MATE_THRESHOLD, SearchContext, mate_in, negascout};
    use crate::search::heuristics::HistoryTable;
    use crate::search::tt::{Bound, TranspositionTable, TtEntry};
    use fanorona_core::{Cell, CellSet, Position, Side};

    fn ctx<'a>(tt: &'a TranspositionTable, history: &'a HistoryTable) -> SearchContext<'a> {
        SearchContext {
            tt,
            history,
            deadline: Instant::now() + Duration::from_secs(60),
            nodes: 0,
            tt_hits: 0,
            stopped: false,
        }
    }

    fn cells(indices: &[u8]) -> CellSet {
        let list: Vec<Cell> = indices
            .iter()
            .map(|&i| Cell::from_index(i).unwrap())
            .collect();
        CellSet::from_cells(&list)
    }

    #[test]
    fn won_position_scores_mate() {
        let tt = TranspositionTable::new(1000);
        let history = HistoryTable::new();
        let pos = Position::new(cells(&[22]), CellSet::EMPTY, Side::Plus);
        let score = negascout(&mut ctx(&tt, &history), &pos, 3, -INF, INF, 0);
        assert_eq!(score, mate_in(3));
        assert!(score > MATE_THRESHOLD);
    }

    #[test]
    fn blocked_position_scores_mated() {
        // a5 is boxed in by enemy pieces with no capture available.
        let tt = TranspositionTable::new(1000);
        let history = HistoryTable::new();
        let pos = Position::new(cells(&[0]), cells(&[1, 9, 10, 2, 18]), Side::Plus);
        let score = negascout(&mut ctx(&tt, &history), &pos, 3, -INF, INF, 0);
        assert_eq!(score, -mate_in(3));
    }

    #[test]
    fn finds_winning_capture() {
        // d3 withdraws east and sweeps the last two enemy pieces.
        let tt = TranspositionTable::new(1000);
        let history = HistoryTable::new();
        let pos = Position::new(cells(&[21]), cells(&[20, 19]), Side::Plus);
        let score = negascout(&mut ctx(&tt, &history), &pos, 2, -INF, INF, 0);
        assert!(score > MATE_THRESHOLD, "score {score} should be a mate");
        let entry = tt.probe(pos.hash()).unwrap();
        assert_eq!(entry.best, 530);
    }

    #[test]
    fn exact_tt_entry_short_circuits() {
        let tt = TranspositionTable::new(1000);
        let history = HistoryTable::new();
        let pos = Position::new(cells(&[0]), cells(&[44]), Side::Plus);
        tt.store(
            pos.hash(),
            TtEntry {
                depth: 50,
                score: 777,
                bound: Bound::Exact,
                best: -1,
            },
        );
        let mut c = ctx(&tt, &history);
        let score = negascout(&mut c, &pos, 3, -INF, INF, 0);
        assert_eq!(score, 777);
        assert_eq!(c.tt_hits, 1);
        assert_eq!(c.nodes, 1);
    }

    #[test]
    fn shallow_tt_entry_does_not_cut() {
        let tt = TranspositionTable::new(1000);
        let history = HistoryTable::new();
        let pos = Position::new(cells(&[0]), cells(&[44]), Side::Plus);
        tt.store(
            pos.hash(),
            TtEntry {
                depth: 1,
                score: 777,
                bound: Bound::Exact,
                best: -1,
            },
        );
        let mut c = ctx(&tt, &history);
        let score = negascout(&mut c, &pos, 3, -INF, INF, 0);
        assert_ne!(score, 777);
        assert!(c.nodes > 1);
    }

    #[test]
    fn deadline_stops_the_search() {
        let tt = TranspositionTable::new(1000);
        let history = HistoryTable::new();
        let mut c = SearchContext {
            tt: &tt,
            history: &history,
            deadline: Instant::now() - Duration::from_millis(1),
            nodes: 0,
            tt_hits: 0,
            stopped: false,
        };
        let pos = Position::starting();
        let score = negascout(&mut c, &pos, 30, -INF, INF, 0);
        assert!(c.stopped);
        assert_eq!(score, -INF);
    }

    #[test]
    fn search_is_deterministic() {
        let pos = Position::starting();
        let run = || {
            let tt = TranspositionTable::new(100_000);
            let history = HistoryTable::new();
            let mut c = ctx(&tt, &history);
            negascout(&mut c, &pos, 4, -INF, INF, 0)
        };
        assert_eq!(run(), run());
    }
}
