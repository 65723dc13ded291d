//! File-based logging using simplelog
//!
//! The terminal belongs to the game while it runs, so log records go to a
//! file instead. The level comes from `RUST_LOG` and defaults to `info`.

use anyhow::{Context, Result};
use simplelog::{ConfigBuilder, LevelFilter, WriteLogger};
use std::fs::File;
use std::path::{Path, PathBuf};

/// Where logs go when no path is given on the command line
pub fn default_log_path() -> PathBuf {
    std::env::temp_dir().join("wrap_snake.log")
}

/// Parse a `RUST_LOG`-style level, falling back to `Info`
pub fn level_from(value: Option<&str>) -> LevelFilter {
    value
        .and_then(|v| v.trim().parse::<LevelFilter>().ok())
        .unwrap_or(LevelFilter::Info)
}

/// Initialize file-based logging at `path`
pub fn init(path: &Path) -> Result<()> {
    let level = level_from(std::env::var("RUST_LOG").ok().as_deref());

    let config = ConfigBuilder::new().set_time_format_rfc3339().build();

    let file = File::create(path)
        .with_context(|| format!("Failed to create log file {:?}", path))?;

    WriteLogger::init(level, config, file).context("Failed to initialize logger")?;

    Ok(())
}
