//! File-backed tracing setup
//!
//! The terminal belongs to the UI, so log output goes to a file. Filtering
//! follows `SAMPLER_LOG` (EnvFilter syntax), defaulting to `info`.

use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use tracing::info;
use tracing_subscriber::filter::EnvFilter;
use tracing_subscriber::fmt;
use tracing_subscriber::util::SubscriberInitExt;

pub const LOG_ENV: &str = "SAMPLER_LOG";

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("info"))
}

/// Install the global subscriber writing to `path` (or the default log file).
///
/// Returns the file in use, or `None` when logging stays disabled.
pub fn init(path: Option<&Path>) -> Option<PathBuf> {
    let path = path
        .map(Path::to_path_buf)
        .or_else(crate::config::log_file_path)?;

    if let Some(parent) = path.parent() {
        let _ = fs::create_dir_all(parent);
    }
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .ok()?;

    fmt()
        .with_env_filter(env_filter())
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_target(true)
        .finish()
        .try_init()
        .ok()?;

    info!(path = %path.display(), "logging initialized");
    Some(path)
}
