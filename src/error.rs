use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Failures reading or writing the persisted high score.
#[derive(Debug, Error)]
pub enum ScoreError {
    #[error("failed to access score file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("score file {path} is malformed: {source}")]
    Malformed {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Top-level error for the binary.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("terminal error: {0}")]
    Terminal(#[from] io::Error),
    #[error(transparent)]
    Score(#[from] ScoreError),
    #[error("cell size must be between 1 and {max}, got {got}")]
    InvalidCellSize { got: u16, max: u16 },
}
