//! Error types for companion discovery

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CompanionError {
    #[error("media path is empty")]
    EmptyPath,

    #[error("media path has no file name: {0}")]
    NoBaseName(String),

    #[error("invalid match threshold {0} (expected 0-4)")]
    InvalidThreshold(i64),

    #[error("invalid sort mode: {0}")]
    InvalidSortMode(String),

    #[error("failed to read directory {dir}: {source}")]
    ReadDir {
        dir: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

pub type Result<T> = std::result::Result<T, CompanionError>;
