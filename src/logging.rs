//! Tracing setup.
//!
//! The terminal is in raw mode while a test runs, so log lines go to a file
//! (or nowhere) instead of stderr.

use std::fs::{self, File, OpenOptions};
use std::io;
use std::path::Path;
use std::sync::Mutex;

use tracing_subscriber::EnvFilter;

/// Environment variable holding a filter directive, e.g. `keyrace=debug`.
pub const LOG_ENV: &str = "KEYRACE_LOG";

/// Install the global subscriber writing to `path`.
///
/// `KEYRACE_LOG` wins over `default_level`. Returns `Ok(false)` when a
/// subscriber was already installed.
pub fn init(default_level: &str, path: &Path) -> io::Result<bool> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let file = OpenOptions::new().create(true).append(true).open(path)?;
    Ok(install(default_level, file))
}

fn install(default_level: &str, file: File) -> bool {
    tracing_subscriber::fmt()
        .with_env_filter(filter(default_level))
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_target(true)
        .try_init()
        .is_ok()
}

fn filter(default_level: &str) -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(default_level))
}
