//! Error types for wordflow
//!
//! Every failure here is recoverable: load errors are shown on screen,
//! definition errors are only logged, usage errors are ignored.

use thiserror::Error;

/// Failure to produce a word list for a language code
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LoadError {
    /// The code is not in the language catalog
    #[error("unknown language code '{0}'")]
    NotFound(String),

    /// The backing resource could not be read or parsed
    #[error("word list for '{code}' unavailable: {reason}")]
    SourceUnavailable { code: String, reason: String },
}

/// Failure of the best-effort dictionary lookup
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DefinitionError {
    #[error("definition unavailable: {0}")]
    Unavailable(String),
}

/// Operation attempted in a state that does not allow it
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum UsageError {
    #[error("no words loaded")]
    EmptyWordList,
}

/// Problems with the settings file
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The file exists but is not a valid config
    #[error("malformed config {path}: {source}")]
    Malformed {
        path: String,
        source: serde_json::Error,
    },

    #[error("cannot write config {path}: {source}")]
    Write {
        path: String,
        source: std::io::Error,
    },
}

/// Errors surfaced by the terminal application itself
#[derive(Error, Debug)]
pub enum AppError {
    /// Terminal/IO error
    #[error("terminal error: {0}")]
    Terminal(#[from] std::io::Error),

    /// Settings file could not be written
    #[error("config error: {0}")]
    Config(#[from] ConfigError),
}

/// Result type for application-level operations
pub type Result<T> = std::result::Result<T, AppError>;
