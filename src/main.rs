use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use tracing::{debug, info, warn};

use fanorona_engine::{Engine, EngineConfig};

/// Fanorona engine speaking a JSON line protocol on stdin/stdout.
#[derive(Debug, Parser)]
#[command(name = "fanorona", version, about)]
struct Args {
    /// Think time per move, in milliseconds.
    #[arg(long = "time-ms", default_value_t = 1000)]
    time_ms: u64,

    /// Iterative-deepening ceiling.
    #[arg(long = "max-depth", default_value_t = 1000)]
    max_depth: i32,

    /// Transposition-table prune ceiling, in entries.
    #[arg(long = "max-entries", default_value_t = 1_000_000)]
    max_entries: usize,

    /// Path of the persistent memory file.
    #[arg(long = "memory-file", default_value = "fanorona_memory.dat")]
    memory_file: PathBuf,

    /// Seconds between background memory saves.
    #[arg(long = "save-interval-secs", default_value_t = 60)]
    save_interval_secs: u64,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt::init();
    let args = Args::parse();
    info!(
        time_ms = args.time_ms,
        max_depth = args.max_depth,
        max_entries = args.max_entries,
        "fanorona starting"
    );

    let engine = Arc::new(Engine::new(EngineConfig {
        time_budget: Duration::from_millis(args.time_ms),
        max_depth: args.max_depth,
        max_entries: args.max_entries,
        ..EngineConfig::default()
    }));
    engine.load_memory(&args.memory_file);
    engine.spawn_autosave(
        args.memory_file.clone(),
        Duration::from_secs(args.save_interval_secs),
    );

    let stdin = io::stdin();
    let mut stdout = io::stdout().lock();
    for line in stdin.lock().lines() {
        let line = line?;
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        debug!(request = %trimmed, "received request");
        let reply = fanorona_proto::handle(&engine, trimmed);
        writeln!(stdout, "{reply}")?;
        stdout.flush()?;
    }

    info!("input closed, saving memory");
    if let Err(e) = engine.save_memory(&args.memory_file) {
        warn!(error = %e, "final save failed");
    }
    Ok(())
}
