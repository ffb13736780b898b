use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, ImporterError>;

#[derive(Error, Debug)]
pub enum ImporterError {
    #[error("Storage error: {0}")]
    StorageError(#[from] storage::error::StorageError),

    #[error("Cannot read {path}: {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Cannot write {path}: {source}")]
    WriteError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Invalid path: {0}")]
    InvalidPath(PathBuf),
}
