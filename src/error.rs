//! Error taxonomy for snipbox.
//!
//! Every collaborator failure is expressed as a [`SnipError`] so the session
//! controller can turn it into a status message at a single boundary.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

pub type Result<T, E = SnipError> = std::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum SnipError {
    #[error("clipboard unavailable: {0}")]
    ClipboardUnavailable(String),

    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error("render failed: {0}")]
    Render(String),

    #[error("index {index} out of range (len {len})")]
    IndexOutOfRange { index: usize, len: usize },
}

/// Failures of the persisted snippet file.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("could not access {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("malformed snippet file {path}: {source}")]
    Malformed {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to serialize snippets: {0}")]
    Serialize(#[source] serde_json::Error),

    #[error("no data directory available on this platform")]
    NoDataDir,
}

impl StorageError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        StorageError::Io {
            path: path.into(),
            source,
        }
    }
}

impl From<arboard::Error> for SnipError {
    fn from(err: arboard::Error) -> Self {
        SnipError::ClipboardUnavailable(err.to_string())
    }
}
