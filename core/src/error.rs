//! Typed errors for corpus loading and index persistence.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LexError {
    #[error("dataset unavailable at {path}: {source}")]
    DatasetUnavailable {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("invalid dataset row at line {line}: {source}")]
    InvalidRow {
        line: u64,
        #[source]
        source: csv::Error,
    },

    #[error("index cache at {path} cannot be decoded: {source}")]
    IndexCacheCorrupt {
        path: PathBuf,
        #[source]
        source: bincode::Error,
    },

    #[error("failed to persist index cache to {path}: {source}")]
    CachePersist {
        path: PathBuf,
        #[source]
        source: anyhow::Error,
    },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, LexError>;
