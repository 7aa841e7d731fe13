use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use grid_snake::config::{GridSize, MAX_CELL_SIZE};
use grid_snake::error::AppError;
use grid_snake::game::GameEngine;
use grid_snake::input::InputHandler;
use grid_snake::logging::{self, log_path};
use grid_snake::renderer::{TerminalRenderer, install_panic_hook};
use grid_snake::scheduler::Difficulty;
use grid_snake::score::{JsonScoreStore, MemoryScoreStore, ScoreStore, scores_path};
use grid_snake::session::{self, Session};
use log::warn;

#[derive(Debug, Parser)]
#[command(version, about = "Grid snake in the terminal")]
struct Cli {
    /// Starting speed.
    #[arg(long, value_enum, default_value_t = Difficulty::Medium)]
    difficulty: Difficulty,

    /// Terminal rows per board cell.
    #[arg(long, default_value_t = 1)]
    cell_size: u16,

    /// Keep the high score in memory only.
    #[arg(long = "no-save")]
    no_save: bool,

    /// Score file location (defaults to the platform data directory).
    #[arg(long)]
    scores_file: Option<PathBuf>,

    /// Log file location (defaults to the platform data directory).
    #[arg(long)]
    log_file: Option<PathBuf>,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let log_file = cli.log_file.clone().unwrap_or_else(log_path);
    if let Err(error) = logging::init(&log_file) {
        eprintln!("grid-snake: logging disabled, cannot open {}: {error}", log_file.display());
    }

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            eprintln!("grid-snake: {error}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), AppError> {
    if cli.cell_size == 0 || cli.cell_size > MAX_CELL_SIZE {
        return Err(AppError::InvalidCellSize {
            got: cli.cell_size,
            max: MAX_CELL_SIZE,
        });
    }

    if cli.no_save {
        return play(cli, MemoryScoreStore::default());
    }

    let path = cli.scores_file.clone().unwrap_or_else(scores_path);
    let (store, load_error) = JsonScoreStore::open_or_default(path);
    if let Some(load_error) = load_error {
        warn!("{load_error}; starting from 0");
    }
    play(cli, store)
}

fn play<S: ScoreStore>(cli: Cli, store: S) -> Result<(), AppError> {
    install_panic_hook();
    let mut renderer = TerminalRenderer::enter()?;
    let (cols, rows) = renderer.viewport()?;

    let bounds = GridSize::for_viewport(cols, rows, cli.cell_size);
    let mut session = Session::new(GameEngine::new(bounds), store, cli.difficulty, cli.cell_size);
    let mut input = InputHandler::new();

    let outcome = session::run(&mut session, &mut renderer, &mut input);
    drop(renderer);

    if let Some(error) = session.save_error() {
        eprintln!("grid-snake: high score was not saved: {error}");
    }
    outcome?;
    Ok(())
}
