use std::path::PathBuf;

use thiserror::Error;

/// Failures while reading game data or configuration from disk.
///
/// None of these are fatal to a running session: callers log them and keep
/// whatever data they already had.
#[derive(Debug, Error)]
pub enum DataError {
    #[error("I/O error while reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse JSON in {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("{path} is empty")]
    Empty { path: PathBuf },

    #[error("no game data could be loaded for language '{language}' (tried: {})", tried.join(", "))]
    NoCandidate { language: String, tried: Vec<String> },
}

impl DataError {
    #[must_use]
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    #[must_use]
    pub fn parse(path: impl Into<PathBuf>, source: serde_json::Error) -> Self {
        Self::Parse {
            path: path.into(),
            source,
        }
    }

    /// True when the file simply does not exist, as opposed to being unreadable
    /// or malformed.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Io { source, .. } if source.kind() == std::io::ErrorKind::NotFound)
    }
}

pub type DataResult<T> = Result<T, DataError>;
