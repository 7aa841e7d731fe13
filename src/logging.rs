use std::fs::{self, File, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};

use env_logger::{Env, Target};

use crate::score::APP_DIR_NAME;

const LOG_FILE_NAME: &str = "grid-snake.log";

/// Returns the log file path, next to the score file.
#[must_use]
pub fn log_path() -> PathBuf {
    let mut base = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
    base.push(APP_DIR_NAME);
    base.push(LOG_FILE_NAME);
    base
}

/// Opens `path` for appending, creating missing parent directories.
pub fn open_log_file(path: &Path) -> io::Result<File> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    OpenOptions::new().create(true).append(true).open(path)
}

/// Installs the global logger, writing to `path` instead of stderr.
///
/// The game owns the terminal in raw mode, so log lines must never reach
/// the screen. `RUST_LOG` overrides the default `warn` filter.
pub fn init(path: &Path) -> io::Result<()> {
    let file = open_log_file(path)?;
    env_logger::Builder::from_env(Env::default().default_filter_or("warn"))
        .target(Target::Pipe(Box::new(file)))
        .init();
    Ok(())
}
