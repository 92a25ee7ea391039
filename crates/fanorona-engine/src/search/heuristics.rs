//! History heuristic for quiet-ish move ordering.

use std::sync::atomic::{AtomicI32, Ordering};

use fanorona_core::{Cell, Move};

/// One row/column per cell plus a slot for the stop action.
const LANES: usize = 46;

/// From/to move counters, shared with the search and the memory file.
///
/// Indexed by `(from + 1, to + 1)` so the stop action (no cells) maps to
/// lane 0. Updates use relaxed atomics; the search tolerates slightly
/// stale reads and the persistence snapshot only needs per-slot atomicity.
pub struct HistoryTable {
    table: Box<[AtomicI32]>,
}

impl HistoryTable {
    /// Create a zeroed history table.
    pub fn new() -> Self {
        Self {
            table: (0..LANES * LANES).map(|_| AtomicI32::new(0)).collect(),
        }
    }

    fn slot(from: Option<Cell>, to: Option<Cell>) -> usize {
        let row = from.map_or(0, |c| c.index() + 1);
        let col = to.map_or(0, |c| c.index() + 1);
        row * LANES + col
    }

    /// Reward a move that raised alpha, weighted by depth squared.
    pub fn reward(&self, from: Cell, to: Cell, depth: i32) {
        let slot = Self::slot(Some(from), Some(to));
        self.table[slot].fetch_add(depth * depth, Ordering::Relaxed);
    }

    /// Ordering score for a move. The stop action always reads zero.
    pub fn score(&self, mv: &Move) -> i32 {
        self.table[Self::slot(mv.from, mv.to)].load(Ordering::Relaxed)
    }

    /// Reset every counter to zero.
    pub fn reset(&self) {
        for slot in self.table.iter() {
            slot.store(0, Ordering::Relaxed);
        }
    }

    /// Copy all counters out in row-major order, for persistence.
    pub fn snapshot(&self) -> Vec<i32> {
        self.table
            .iter()
            .map(|slot| slot.load(Ordering::Relaxed))
            .collect()
    }

    /// Restore counters from a persisted row-major snapshot.
    ///
    /// # Panics
    ///
    /// Debug-asserts that the slice covers the whole table.
    pub fn load(&self, values: &[i32]) {
        debug_assert_eq!(values.len(), LANES * LANES);
        for (slot, &value) in self.table.iter().zip(values) {
            slot.store(value, Ordering::Relaxed);
        }
    }
}

impl Default for HistoryTable {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::HistoryTable;
    use fanorona_core::{Cell, Move};

    #[test]
    fn reward_accumulates_depth_squared() {
        let ht = HistoryTable::new();
        let from = Cell::new(2, 2);
        let to = Cell::new(2, 3);
        ht.reward(from, to, 4);
        ht.reward(from, to, 3);

        let mv = Move {
            action: Move::encode_action(from, fanorona_core::Direction::East, false),
            kind: fanorona_core::MoveKind::Quiet,
            from: Some(from),
            to: Some(to),
            victims: Vec::new(),
        };
        assert_eq!(ht.score(&mv), 16 + 9);
    }

    #[test]
    fn stop_action_scores_zero() {
        let ht = HistoryTable::new();
        ht.reward(Cell::new(0, 0), Cell::new(0, 1), 10);
        assert_eq!(ht.score(&Move::stop()), 0);
    }

    #[test]
    fn snapshot_load_roundtrip() {
        let ht = HistoryTable::new();
        ht.reward(Cell::new(1, 1), Cell::new(1, 2), 5);
        let snap = ht.snapshot();
        assert_eq!(snap.len(), 46 * 46);

        let other = HistoryTable::new();
        other.load(&snap);
        assert_eq!(other.snapshot(), snap);

        other.reset();
        assert!(other.snapshot().iter().all(|&v| v == 0));
    }
}
