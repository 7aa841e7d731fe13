use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::ScoreError;

pub(crate) const APP_DIR_NAME: &str = "grid-snake";
const SCORE_FILE_NAME: &str = "scores.json";

/// Persistent storage for the single best score.
pub trait ScoreStore {
    /// Returns the stored best score, or 0 when none was saved yet.
    fn high_score(&self) -> u32;

    /// Replaces the stored best score.
    fn set_high_score(&mut self, score: u32) -> Result<(), ScoreError>;
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
struct ScoreFile {
    high_score: u32,
}

/// Returns the platform-correct score file path.
#[must_use]
pub fn scores_path() -> PathBuf {
    let mut base = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
    base.push(APP_DIR_NAME);
    base.push(SCORE_FILE_NAME);
    base
}

/// High score kept as JSON on disk, cached in memory after opening.
#[derive(Debug, Clone)]
pub struct JsonScoreStore {
    path: PathBuf,
    cached: u32,
}

impl JsonScoreStore {
    /// Opens the store at `path`.
    ///
    /// A missing file counts as a high score of 0. A file that exists but
    /// cannot be read or parsed is an error so the caller can warn about it.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, ScoreError> {
        let path = path.into();
        let cached = load_high_score_from_path(&path)?;
        Ok(Self { path, cached })
    }

    /// Like [`JsonScoreStore::open`], but starts from 0 when the file is
    /// unreadable; the next save overwrites it.
    #[must_use]
    pub fn open_or_default(path: impl Into<PathBuf>) -> (Self, Option<ScoreError>) {
        let path = path.into();
        match load_high_score_from_path(&path) {
            Ok(cached) => (Self { path, cached }, None),
            Err(error) => (Self { path, cached: 0 }, Some(error)),
        }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ScoreStore for JsonScoreStore {
    fn high_score(&self) -> u32 {
        self.cached
    }

    fn set_high_score(&mut self, score: u32) -> Result<(), ScoreError> {
        save_high_score_to_path(&self.path, score)?;
        self.cached = score;
        Ok(())
    }
}

/// High score that lives only as long as the process.
#[derive(Debug, Clone, Copy, Default)]
pub struct MemoryScoreStore {
    high_score: u32,
}

impl MemoryScoreStore {
    #[must_use]
    pub fn with_high_score(high_score: u32) -> Self {
        Self { high_score }
    }
}

impl ScoreStore for MemoryScoreStore {
    fn high_score(&self) -> u32 {
        self.high_score
    }

    fn set_high_score(&mut self, score: u32) -> Result<(), ScoreError> {
        self.high_score = score;
        Ok(())
    }
}

fn load_high_score_from_path(path: &Path) -> Result<u32, ScoreError> {
    let raw = match fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(0),
        Err(source) => {
            return Err(ScoreError::Io {
                path: path.to_path_buf(),
                source,
            });
        }
    };

    serde_json::from_str::<ScoreFile>(&raw)
        .map(|file| file.high_score)
        .map_err(|source| ScoreError::Malformed {
            path: path.to_path_buf(),
            source,
        })
}

fn save_high_score_to_path(path: &Path, score: u32) -> Result<(), ScoreError> {
    let io_error = |source: io::Error| ScoreError::Io {
        path: path.to_path_buf(),
        source,
    };

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(io_error)?;
    }

    let payload = ScoreFile { high_score: score };
    let json = serde_json::to_string_pretty(&payload).map_err(|source| ScoreError::Malformed {
        path: path.to_path_buf(),
        source,
    })?;

    fs::write(path, json).map_err(io_error)
}
