//! File-backed JSON logging with an explicit lifecycle.

use std::fs::{File, OpenOptions};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use thiserror::Error;
use tracing::subscriber::DefaultGuard;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Error)]
pub enum LogError {
    #[error("failed to open log file {path:?}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid log filter '{directive}': {reason}")]
    Filter { directive: String, reason: String },
}

/// An open log file plus the subscriber routing `tracing` events into it.
///
/// Lines are appended (the file is never truncated or rotated). The session
/// must outlive everything that should be logged; keep it in `main`.
#[derive(Debug)]
pub struct LogSession {
    path: PathBuf,
    _guard: DefaultGuard,
}

impl LogSession {
    /// Open `path` for appending. The filter comes from `RUST_LOG` when set,
    /// otherwise from `default_level`.
    pub fn open(path: &Path, default_level: &str) -> Result<Self, LogError> {
        let filter = match EnvFilter::try_from_default_env() {
            Ok(filter) => filter,
            Err(_) => parse_filter(default_level)?,
        };
        Self::start(path, filter)
    }

    /// Open `path` with an explicit filter directive, ignoring `RUST_LOG`.
    pub fn open_with_filter(path: &Path, directive: &str) -> Result<Self, LogError> {
        Self::start(path, parse_filter(directive)?)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn start(path: &Path, filter: EnvFilter) -> Result<Self, LogError> {
        let file = open_append(path)?;

        let subscriber = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .json()
            .with_timer(tracing_subscriber::fmt::time::SystemTime)
            .with_target(false)
            .with_writer(Mutex::new(file))
            .finish();

        let guard = tracing::subscriber::set_default(subscriber);
        tracing::debug!(path = %path.display(), "log session opened");

        Ok(Self {
            path: path.to_path_buf(),
            _guard: guard,
        })
    }
}

impl Drop for LogSession {
    fn drop(&mut self) {
        tracing::debug!(path = %self.path.display(), "log session closed");
    }
}

fn parse_filter(directive: &str) -> Result<EnvFilter, LogError> {
    EnvFilter::try_new(directive).map_err(|e| LogError::Filter {
        directive: directive.to_string(),
        reason: e.to_string(),
    })
}

fn open_append(path: &Path) -> Result<File, LogError> {
    let wrap = |source| LogError::Open {
        path: path.to_path_buf(),
        source,
    };

    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent).map_err(wrap)?;
    }

    OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(wrap)
}
