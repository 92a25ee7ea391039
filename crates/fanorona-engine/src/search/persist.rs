//! On-disk memory file: transposition entries plus history counters.
//!
//! Big-endian layout, kept stable across releases:
//!
//! ```text
//! i32            entry count
//! per entry:     i64 key, i32 depth, i32 score, i32 flag, i32 best
//! 46*46 x i32    history counters (optional; older files end early)
//! ```
//!
//! A file that ends cleanly after the entry table is accepted without
//! history. Anything torn mid-record is reported as corrupt so the
//! caller can reset the in-memory state.

use std::fs::File;
use std::io::{self, BufReader, BufWriter, ErrorKind, Read, Write};
use std::path::Path;

use thiserror::Error;

use crate::search::heuristics::HistoryTable;
use crate::search::tt::{Bound, TranspositionTable, TtEntry};

const HISTORY_SLOTS: usize = 46 * 46;

/// Why a memory file could not be used.
#[derive(Debug, Error)]
pub enum MemoryError {
    #[error("memory file i/o: {0}")]
    Io(#[from] io::Error),

    #[error("memory file corrupt: {0}")]
    Corrupt(&'static str),
}

fn read_i32(r: &mut impl Read) -> io::Result<i32> {
    let mut buf = [0u8; 4];
    r.read_exact(&mut buf)?;
    Ok(i32::from_be_bytes(buf))
}

fn read_i64(r: &mut impl Read) -> io::Result<i64> {
    let mut buf = [0u8; 8];
    r.read_exact(&mut buf)?;
    Ok(i64::from_be_bytes(buf))
}

/// Write the table and history counters to `path`.
///
/// The table is snapshotted once up front, so concurrent stores during
/// the write affect neither the count nor the records.
pub fn save(path: &Path, tt: &TranspositionTable, history: &HistoryTable) -> io::Result<()> {
    let entries = tt.snapshot();
    let mut w = BufWriter::new(File::create(path)?);
    w.write_all(&(entries.len() as i32).to_be_bytes())?;
    for (key, entry) in entries {
        w.write_all(&(key as i64).to_be_bytes())?;
        w.write_all(&entry.depth.to_be_bytes())?;
        w.write_all(&entry.score.to_be_bytes())?;
        w.write_all(&entry.bound.bits().to_be_bytes())?;
        w.write_all(&entry.best.to_be_bytes())?;
    }
    for value in history.snapshot() {
        w.write_all(&value.to_be_bytes())?;
    }
    w.flush()
}

/// Load a memory file into the table and history counters.
///
/// Returns the number of entries restored. On [`MemoryError::Corrupt`]
/// the table may hold a partial load; the caller decides whether to
/// keep or clear it.
pub fn load(
    path: &Path,
    tt: &TranspositionTable,
    history: &HistoryTable,
) -> Result<usize, MemoryError> {
    let mut r = BufReader::new(File::open(path)?);

    let count = read_i32(&mut r).map_err(|_| MemoryError::Corrupt("missing entry count"))?;
    let count = usize::try_from(count).map_err(|_| MemoryError::Corrupt("negative entry count"))?;
    for _ in 0..count {
        let key = read_i64(&mut r).map_err(|_| MemoryError::Corrupt("truncated entry table"))?;
        let depth = read_i32(&mut r).map_err(|_| MemoryError::Corrupt("truncated entry table"))?;
        let score = read_i32(&mut r).map_err(|_| MemoryError::Corrupt("truncated entry table"))?;
        let flag = read_i32(&mut r).map_err(|_| MemoryError::Corrupt("truncated entry table"))?;
        let best = read_i32(&mut r).map_err(|_| MemoryError::Corrupt("truncated entry table"))?;
        let bound = Bound::from_bits(flag).ok_or(MemoryError::Corrupt("invalid bound flag"))?;
        tt.store(key as u64, TtEntry { depth, score, bound, best });
    }

    // History counters were added later; a clean end-of-file here is an
    // old-format file, not corruption.
    match read_i32(&mut r) {
        Ok(first) => {
            let mut values = Vec::with_capacity(HISTORY_SLOTS);
            values.push(first);
            for _ in 1..HISTORY_SLOTS {
                values.push(
                    read_i32(&mut r).map_err(|_| MemoryError::Corrupt("truncated history table"))?,
                );
            }
            history.load(&values);
        }
        Err(e) if e.kind() == ErrorKind::UnexpectedEof => {}
        Err(e) => return Err(MemoryError::Io(e)),
    }

    Ok(count)
}

#[cfg(test)]
mod tests {
    use std::fs;
    use std::path::PathBuf;

    use super::{MemoryError, load, save};
    use crate::search::heuristics::HistoryTable;
    use crate::search::tt::{Bound, TranspositionTable, TtEntry};
    use fanorona_core::Cell;

    fn temp_file(tag: &str) -> PathBuf {
        std::env::temp_dir().join(format!(
            "fanorona-memory-{tag}-{}.dat",
            std::process::id()
        ))
    }

    fn sample_table() -> TranspositionTable {
        let tt = TranspositionTable::new(1000);
        tt.store(
            0x1111,
            TtEntry { depth: 7, score: 350, bound: Bound::Exact, best: 170 },
        );
        tt.store(
            0x2222,
            TtEntry { depth: 3, score: -42, bound: Bound::Upper, best: -1 },
        );
        tt
    }

    #[test]
    fn save_load_roundtrip() {
        let path = temp_file("roundtrip");
        let tt = sample_table();
        let history = HistoryTable::new();
        history.reward(Cell::new(2, 2), Cell::new(2, 3), 6);
        save(&path, &tt, &history).unwrap();

        let tt2 = TranspositionTable::new(1000);
        let history2 = HistoryTable::new();
        let restored = load(&path, &tt2, &history2).unwrap();
        assert_eq!(restored, 2);
        assert_eq!(tt2.probe(0x1111), tt.probe(0x1111));
        assert_eq!(tt2.probe(0x2222), tt.probe(0x2222));
        assert_eq!(history2.snapshot(), history.snapshot());

        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn missing_history_tail_is_tolerated() {
        let path = temp_file("no-history");
        // Count of one entry, then exactly one record, nothing after.
        let mut bytes = Vec::new();
        bytes.extend_from_slice(&1i32.to_be_bytes());
        bytes.extend_from_slice(&0x3333i64.to_be_bytes());
        bytes.extend_from_slice(&5i32.to_be_bytes());
        bytes.extend_from_slice(&100i32.to_be_bytes());
        bytes.extend_from_slice(&0i32.to_be_bytes());
        bytes.extend_from_slice(&248i32.to_be_bytes());
        fs::write(&path, bytes).unwrap();

        let tt = TranspositionTable::new(1000);
        let history = HistoryTable::new();
        assert_eq!(load(&path, &tt, &history).unwrap(), 1);
        assert_eq!(tt.probe(0x3333).unwrap().best, 248);
        assert!(history.snapshot().iter().all(|&v| v == 0));

        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn truncated_entry_is_corrupt() {
        let path = temp_file("truncated");
        let mut bytes = Vec::new();
        bytes.extend_from_slice(&2i32.to_be_bytes());
        bytes.extend_from_slice(&0x4444i64.to_be_bytes());
        // Record cut off mid-way.
        bytes.extend_from_slice(&7i32.to_be_bytes());
        fs::write(&path, bytes).unwrap();

        let tt = TranspositionTable::new(1000);
        let history = HistoryTable::new();
        assert!(matches!(
            load(&path, &tt, &history),
            Err(MemoryError::Corrupt("truncated entry table"))
        ));

        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn invalid_bound_flag_is_corrupt() {
        let path = temp_file("bad-flag");
        let mut bytes = Vec::new();
        bytes.extend_from_slice(&1i32.to_be_bytes());
        bytes.extend_from_slice(&0x5555i64.to_be_bytes());
        bytes.extend_from_slice(&5i32.to_be_bytes());
        bytes.extend_from_slice(&100i32.to_be_bytes());
        bytes.extend_from_slice(&9i32.to_be_bytes());
        bytes.extend_from_slice(&170i32.to_be_bytes());
        fs::write(&path, bytes).unwrap();

        let tt = TranspositionTable::new(1000);
        let history = HistoryTable::new();
        assert!(matches!(
            load(&path, &tt, &history),
            Err(MemoryError::Corrupt("invalid bound flag"))
        ));

        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn missing_file_is_io_error() {
        let path = temp_file("definitely-missing");
        let tt = TranspositionTable::new(1000);
        let history = HistoryTable::new();
        assert!(matches!(
            load(&path, &tt, &history),
            Err(MemoryError::Io(_))
        ));
    }
}
