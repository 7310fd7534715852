//! Logging setup.
//!
//! The TUI owns the terminal, so log output goes to a file under the state
//! directory. `WORDFLOW_LOG` overrides the configured filter, e.g.
//! `WORDFLOW_LOG=wordflow=debug`.

use std::fs::{self, File, OpenOptions};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use tracing_subscriber::EnvFilter;

pub const LOG_ENV: &str = "WORDFLOW_LOG";

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum, strum_macros::Display)]
#[strum(serialize_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable lines
    Text,
    /// One JSON object per line
    Json,
}

/// Configuration for logging initialization
pub struct LoggingConfig {
    pub format: LogFormat,
    pub level: String,
    pub path: Option<PathBuf>,
}

impl LoggingConfig {
    pub fn new(format: LogFormat, level: String, path: Option<PathBuf>) -> Self {
        Self {
            format,
            level,
            path,
        }
    }

    /// Env var wins over the configured level
    pub fn filter(&self) -> EnvFilter {
        EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| {
            EnvFilter::try_new(&self.level).unwrap_or_else(|_| EnvFilter::new("info"))
        })
    }

    /// Install the global subscriber. Returns false if one was already set
    /// or no log file could be opened.
    pub fn init(&self) -> bool {
        let Some(file) = self.path.as_deref().and_then(open_log_file) else {
            return false;
        };
        let writer = Mutex::new(file);

        let installed = match self.format {
            LogFormat::Json => tracing_subscriber::fmt()
                .json()
                .with_env_filter(self.filter())
                .with_writer(writer)
                .with_target(true)
                .with_current_span(true)
                .flatten_event(true)
                .try_init(),
            LogFormat::Text => tracing_subscriber::fmt()
                .with_env_filter(self.filter())
                .with_writer(writer)
                .with_ansi(false)
                .with_target(true)
                .try_init(),
        };
        installed.is_ok()
    }
}

fn open_log_file(path: &Path) -> Option<File> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).ok()?;
    }
    OpenOptions::new().create(true).append(true).open(path).ok()
}
