//! File logging.
//!
//! The terminal belongs to the TUI, so log output goes to a file instead of
//! stderr. The filter comes from `DUCKPAD_LOG` (same syntax as `RUST_LOG`)
//! and defaults to `info`.

use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Mutex;

use tracing_subscriber::EnvFilter;

pub const LOG_FILTER_ENV: &str = "DUCKPAD_LOG";

/// Installs the global subscriber, appending to `path`.
///
/// # Errors
///
/// Returns `Err` if the log file cannot be opened. A subscriber that is
/// already installed (tests) is left in place.
pub fn init(path: &Path) -> std::io::Result<()> {
    let file = OpenOptions::new().create(true).append(true).open(path)?;

    let filter = EnvFilter::try_from_env(LOG_FILTER_ENV)
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_target(true)
        .try_init();
    Ok(())
}
