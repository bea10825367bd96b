//! Error types shared by the registry, its sources, and configuration.

use std::path::PathBuf;

use thiserror::Error;

/// Failures raised by sources and by the registry's derived views.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SourceError {
    /// `fetch_list` was called on a source that never overrode it.
    #[error("source `{alias}` in realm `{realm}` does not implement fetch_list")]
    NotImplemented { realm: String, alias: String },

    /// Two choices with the same value were handed to [`SourceChoices`](crate::SourceChoices).
    #[error("duplicate choice `{alias}` in realm `{realm}`")]
    DuplicateChoice { realm: String, alias: String },

    /// A value is not one of the currently registered aliases.
    #[error("`{value}` is not a registered source in realm `{realm}`")]
    UnknownChoice { realm: String, value: String },
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config file {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(String),

    #[error("poll_interval_secs must be positive, got {0}")]
    InvalidInterval(u64),

    #[error("invalid source entry #{index}: {reason}")]
    InvalidSource { index: usize, reason: String },
}
