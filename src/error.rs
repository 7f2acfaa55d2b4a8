use std::path::{Path, PathBuf};

use thiserror::Error;

/// Failures that stop a dataset from being loaded at all.
///
/// Per-field problems never show up here: a bad cell degrades to null/false
/// and the row is still emitted.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("dataset source unavailable: {}", path.display())]
    SourceUnavailable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("dataset {} is malformed: {reason}", path.display())]
    Malformed { path: PathBuf, reason: String },
}

impl LoadError {
    pub(crate) fn unavailable(path: &Path, source: impl Into<std::io::Error>) -> Self {
        LoadError::SourceUnavailable {
            path: path.to_path_buf(),
            source: source.into(),
        }
    }

    pub(crate) fn malformed(path: &Path, reason: impl Into<String>) -> Self {
        LoadError::Malformed {
            path: path.to_path_buf(),
            reason: reason.into(),
        }
    }
}

/// Failures of the free-text fallback responder. Always recoverable: the
/// engine renders them as an `Error: ...` answer.
#[derive(Debug, Error)]
pub enum FallbackError {
    #[error("no API token configured (set {0})")]
    MissingCredential(&'static str),

    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("service returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("service error: {0}")]
    Service(String),

    #[error("invalid response: {0}")]
    InvalidResponse(String),
}

impl FallbackError {
    pub fn is_timeout(&self) -> bool {
        matches!(self, FallbackError::Transport(e) if e.is_timeout())
    }
}

/// Problems with an explicitly requested configuration file.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config file {}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot parse config file {}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}
