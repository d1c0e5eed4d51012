use std::{env, path::PathBuf, time::Duration};

// Runtime/server constants (not gameplay tuning).

pub fn http_port() -> u16 {
    env::var("IDLE_MINER_PORT")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(3000)
}

// Unset or empty keeps the ledger in memory for the lifetime of the process.
pub fn ledger_path() -> Option<PathBuf> {
    env::var("LEDGER_PATH")
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
}

pub fn production_tick() -> Duration {
    let millis = env::var("PRODUCTION_TICK_MS")
        .ok()
        .and_then(|value| value.parse::<u64>().ok())
        .filter(|&value| value > 0)
        .unwrap_or(1000);
    Duration::from_millis(millis)
}

pub fn production_publish_every() -> u64 {
    env::var("PRODUCTION_PUBLISH_EVERY")
        .ok()
        .and_then(|value| value.parse::<u64>().ok())
        .filter(|&value| value > 0)
        .unwrap_or(5)
}

pub const SESSION_EVENT_CAPACITY: usize = 256;
pub const SESSION_NOTICE_CAPACITY: usize = 64;
pub const LEDGER_BROADCAST_CAPACITY: usize = 128;

pub const FRAME_INTERVAL: Duration = Duration::from_micros(1_000_000 / 60);
