//! Shared transposition table, persisted across games.
//!
//! Unlike a fixed-slot table, entries accumulate until the configured
//! ceiling and are pruned in depth tiers just before a save. Replacement
//! is always-write: a fresh search result overwrites whatever the slot
//! held, which keeps the long-lived table biased toward recent play.

use dashmap::DashMap;

/// How a stored score bounds the true value.
///
/// The discriminants are the on-disk flag values and must not change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum Bound {
    /// The score is exact (searched with an open window).
    Exact = 0,
    /// The score is a lower bound (failed high).
    Lower = 1,
    /// The score is an upper bound (failed low).
    Upper = 2,
}

impl Bound {
    /// Decode a persisted flag value.
    pub(crate) const fn from_bits(bits: i32) -> Option<Bound> {
        match bits {
            0 => Some(Bound::Exact),
            1 => Some(Bound::Lower),
            2 => Some(Bound::Upper),
            _ => None,
        }
    }

    /// The persisted flag value.
    pub(crate) const fn bits(self) -> i32 {
        self as i32
    }
}

/// One remembered search result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TtEntry {
    /// Remaining search depth when the entry was written.
    pub depth: i32,
    /// Score, qualified by `bound`.
    pub score: i32,
    pub bound: Bound,
    /// Best action id found, or `-1` if none survived.
    pub best: i32,
}

/// Concurrent transposition table keyed by position hash.
///
/// All receivers are `&self`; the table is safe to probe and store from
/// the search while a save snapshots it from another thread.
pub struct TranspositionTable {
    entries: DashMap<u64, TtEntry>,
    capacity: usize,
}

impl TranspositionTable {
    /// Create an empty table that prunes down to `capacity` entries.
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: DashMap::new(),
            capacity,
        }
    }

    /// Look up a position.
    pub fn probe(&self, hash: u64) -> Option<TtEntry> {
        self.entries.get(&hash).map(|entry| *entry)
    }

    /// Store a search result, replacing any existing entry.
    pub fn store(&self, hash: u64, entry: TtEntry) {
        self.entries.insert(hash, entry);
    }

    /// Number of stored entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Return `true` if the table holds no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Drop every entry.
    pub fn clear(&self) {
        self.entries.clear();
    }

    /// The prune ceiling.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Copy out all entries, for persistence.
    pub fn snapshot(&self) -> Vec<(u64, TtEntry)> {
        self.entries
            .iter()
            .map(|entry| (*entry.key(), *entry.value()))
            .collect()
    }

    /// Shrink the table below its capacity.
    ///
    /// Shallow entries go first, in depth tiers (2, then 4, then 8). If
    /// the table is still over the ceiling after the tiers, the deepest
    /// `capacity` entries are kept and the rest dropped.
    pub fn prune(&self) {
        if self.entries.len() <= self.capacity {
            return;
        }
        let before = self.entries.len();
        for floor in [2, 4, 8] {
            if self.entries.len() > self.capacity {
                self.entries.retain(|_, entry| entry.depth > floor);
            }
        }
        if self.entries.len() > self.capacity {
            let mut all = self.snapshot();
            all.sort_by(|a, b| b.1.depth.cmp(&a.1.depth));
            all.truncate(self.capacity);
            self.entries.clear();
            for (hash, entry) in all {
                self.entries.insert(hash, entry);
            }
        }
        tracing::info!(before, after = self.entries.len(), "pruned transposition table");
    }
}

impl std::fmt::Debug for TranspositionTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TranspositionTable")
            .field("entries", &self.entries.len())
            .field("capacity", &self.capacity)
            .finish()
    }
}
