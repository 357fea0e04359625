//! Logger setup for the command-line tool
//!
//! The library logs through the `log` facade; the binary routes those records
//! to stderr via env_logger so stdout stays clean for listings and JSON.

use anyhow::{anyhow, Result};
use log::LevelFilter;

/// Install the stderr logger. `RUST_LOG`, when set, refines `level`.
pub fn init(level: LevelFilter) -> Result<()> {
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .format_timestamp(None)
        .target(env_logger::Target::Stderr)
        .try_init()
        .map_err(|e| anyhow!("Failed to set logger: {}", e))
}
