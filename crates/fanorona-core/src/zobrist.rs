//! Zobrist hashing of board occupancy and side to move.
//!
//! Keys are generated at compile time from a fixed seed, so hashes are
//! stable across runs and builds, a requirement for the persisted
//! knowledge file, which is keyed by these hashes.
//!
//! The hash deliberately covers only (own occupancy, opponent occupancy,
//! side sign). Mid-chain capture state (combo piece, visited cells, last
//! direction) is ignored, so a position inside a capture chain hashes the
//! same as the bare board. Transposition entries for such states can
//! therefore describe a different legal-move set; see `Position` tests.

use crate::cellset::CellSet;
use crate::position::Side;

const SEED: u64 = 0x4641_4e4f_524f_4e41; // "FANORONA"

/// Xorshift64 PRNG. Returns (value, next_state).
const fn xorshift64(mut state: u64) -> (u64, u64) {
    state ^= state << 13;
    state ^= state >> 7;
    state ^= state << 17;
    (state, state)
}

/// Key per cell occupied by the side to move.
static OWN_KEY: [u64; 45] = {
    let mut table = [0u64; 45];
    let mut state = SEED;
    let mut i = 0;
    while i < 45 {
        let (val, next) = xorshift64(state);
        table[i] = val;
        state = next;
        i += 1;
    }
    table
};

/// Key per cell occupied by the opponent.
static OPP_KEY: [u64; 45] = {
    let mut table = [0u64; 45];
    let mut state = SEED;
    // Advance past the 45 own-cell keys
    let mut i = 0;
    while i < 45 {
        let (_, next) = xorshift64(state);
        state = next;
        i += 1;
    }
    let mut idx = 0;
    while idx < 45 {
        let (val, next) = xorshift64(state);
        table[idx] = val;
        state = next;
        idx += 1;
    }
    table
};

/// Key XORed in when the side-to-move sign is negative.
static SIDE_KEY: u64 = {
    let mut state = SEED;
    // Advance past 45 + 45 = 90 previous keys
    let mut i = 0;
    while i < 90 {
        let (_, next) = xorshift64(state);
        state = next;
        i += 1;
    }
    let (val, _) = xorshift64(state);
    val
};

/// Compute the hash of an occupancy pair plus side to move.
pub(crate) fn compute(my: CellSet, opp: CellSet, side: Side) -> u64 {
    let mut hash = 0u64;
    let mut rest = my;
    while let Some((cell, next)) = rest.pop_first() {
        hash ^= OWN_KEY[cell.index()];
        rest = next;
    }
    let mut rest = opp;
    while let Some((cell, next)) = rest.pop_first() {
        hash ^= OPP_KEY[cell.index()];
        rest = next;
    }
    if side == Side::Minus {
        hash ^= SIDE_KEY;
    }
    hash
}
