use std::io;
use std::time::{Duration, Instant};

use log::{debug, info, warn};

use crate::config::{FRAME_POLL_MS, GridSize};
use crate::error::ScoreError;
use crate::game::{GameEngine, GameStatus, StepOutcome};
use crate::input::{Command, InputSource};
use crate::renderer::{FrameView, Renderer};
use crate::scheduler::{Difficulty, TickScheduler};
use crate::score::ScoreStore;
use crate::ui::hud::HudInfo;

/// Whether the host loop should keep going after a command.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum Flow {
    Continue,
    Quit,
}

/// Host for one engine: owns the tick timer, the score store and the
/// player-facing settings, and turns commands into engine calls.
#[derive(Debug)]
pub struct Session<S> {
    engine: GameEngine,
    scheduler: TickScheduler,
    store: S,
    difficulty: Difficulty,
    high_score: u32,
    best_at_start: u32,
    cell_size: u16,
    pending_bounds: Option<GridSize>,
    save_error: Option<ScoreError>,
}

impl<S: ScoreStore> Session<S> {
    #[must_use]
    pub fn new(engine: GameEngine, store: S, difficulty: Difficulty, cell_size: u16) -> Self {
        let high_score = store.high_score();
        Self {
            engine,
            scheduler: TickScheduler::new(),
            store,
            difficulty,
            high_score,
            best_at_start: high_score,
            cell_size,
            pending_bounds: None,
            save_error: None,
        }
    }

    /// Applies one command at time `now`.
    pub fn apply(&mut self, command: Command, now: Instant) -> Flow {
        match command {
            Command::Steer(direction) => {
                self.engine.set_direction(direction);
            }
            Command::Start => {
                if !self.engine.status().is_live() {
                    self.start(now);
                }
            }
            Command::Restart => self.start(now),
            Command::TogglePause => self.toggle_pause(now),
            Command::ChangeDifficulty(difficulty) => self.change_difficulty(difficulty, now),
            Command::CycleDifficulty => self.change_difficulty(self.difficulty.next(), now),
            Command::Resize { cols, rows } => self.resize(cols, rows),
            Command::Quit => return Flow::Quit,
        }
        Flow::Continue
    }

    /// Steps the engine if a tick is due at `now`.
    pub fn tick(&mut self, now: Instant) -> Option<StepOutcome> {
        if !self.scheduler.due(now) {
            return None;
        }

        let outcome = self.engine.step();
        match outcome {
            StepOutcome::Ate => self.record_score(),
            StepOutcome::BoardFilled => {
                self.record_score();
                self.scheduler.stop();
            }
            StepOutcome::Collided(_) | StepOutcome::Idle => self.scheduler.stop(),
            StepOutcome::Moved => {}
        }
        Some(outcome)
    }

    /// Everything a renderer needs for the next frame.
    #[must_use]
    pub fn frame_view(&self) -> FrameView<'_> {
        FrameView {
            snapshot: self.engine.snapshot(),
            hud: HudInfo {
                high_score: self.high_score,
                best_at_start: self.best_at_start,
                difficulty: self.difficulty,
            },
            cell_size: self.cell_size,
        }
    }

    #[must_use]
    pub fn engine(&self) -> &GameEngine {
        &self.engine
    }

    /// Mutable engine access for staging positions in tests and demos.
    pub fn engine_mut(&mut self) -> &mut GameEngine {
        &mut self.engine
    }

    #[must_use]
    pub fn scheduler(&self) -> &TickScheduler {
        &self.scheduler
    }

    #[must_use]
    pub fn store(&self) -> &S {
        &self.store
    }

    #[must_use]
    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    #[must_use]
    pub fn high_score(&self) -> u32 {
        self.high_score
    }

    /// First failed high-score save, kept so the host can report it once the
    /// terminal is restored. Later saves are still attempted.
    #[must_use]
    pub fn save_error(&self) -> Option<&ScoreError> {
        self.save_error.as_ref()
    }

    /// Grid waiting for the next reset, if a resize arrived mid-game.
    #[must_use]
    pub fn pending_bounds(&self) -> Option<GridSize> {
        self.pending_bounds
    }

    fn start(&mut self, now: Instant) {
        let bounds = self
            .pending_bounds
            .take()
            .unwrap_or_else(|| self.engine.bounds());
        self.engine.reset(bounds);
        self.best_at_start = self.high_score;
        self.scheduler.start(self.difficulty.tick_interval(), now);
    }

    fn toggle_pause(&mut self, now: Instant) {
        self.engine.toggle_pause();
        match self.engine.status() {
            GameStatus::Paused => self.scheduler.stop(),
            GameStatus::Running => self.scheduler.start(self.difficulty.tick_interval(), now),
            _ => {}
        }
    }

    fn change_difficulty(&mut self, difficulty: Difficulty, now: Instant) {
        info!("difficulty {} -> {difficulty}", self.difficulty);
        self.difficulty = difficulty;

        if self.engine.status().is_live() {
            self.start(now);
        }
    }

    fn resize(&mut self, cols: u16, rows: u16) {
        let bounds = GridSize::for_viewport(cols, rows, self.cell_size);
        if self.engine.resize(bounds) {
            self.pending_bounds = None;
        } else {
            info!("deferring resize to {0}x{0} until the next game", bounds.side());
            self.pending_bounds = Some(bounds);
        }
    }

    fn record_score(&mut self) {
        let score = self.engine.score();
        if score <= self.high_score {
            return;
        }

        self.high_score = score;
        match self.store.set_high_score(score) {
            Ok(()) => {}
            Err(error) if self.save_error.is_none() => {
                warn!("failed to save high score: {error}");
                self.save_error = Some(error);
            }
            Err(error) => debug!("high score save failed again: {error}"),
        }
    }
}

/// Drives `session` until a [`Command::Quit`] arrives.
///
/// Each pass renders one frame, waits for input until the next tick (at most
/// one frame), then runs a tick if one is due. Steps never overlap and input
/// lands between them.
pub fn run<S, R, I>(session: &mut Session<S>, renderer: &mut R, input: &mut I) -> io::Result<()>
where
    S: ScoreStore,
    R: Renderer,
    I: InputSource,
{
    loop {
        renderer.render(&session.frame_view())?;

        let frame = Duration::from_millis(FRAME_POLL_MS);
        let timeout = session
            .scheduler()
            .time_until_next(Instant::now())
            .map_or(frame, |left| left.min(frame));

        if let Some(command) = input.poll(timeout)? {
            if session.apply(command, Instant::now()) == Flow::Quit {
                return Ok(());
            }
        }

        session.tick(Instant::now());
    }
}

#[cfg(test)]
mod tests {
    use std::time::{Duration, Instant};

    use std::io;
    use std::path::PathBuf;

    use crate::config::GridSize;
    use crate::error::ScoreError;
    use crate::game::{GameEngine, GameStatus, StepOutcome};
    use crate::input::{Command, Direction};
    use crate::scheduler::Difficulty;
    use crate::score::{MemoryScoreStore, ScoreStore};
    use crate::snake::{Position, Snake};

    use super::{Flow, Session};

    #[derive(Debug, Default)]
    struct RecordingStore {
        stored: u32,
        saves: Vec<u32>,
    }

    impl ScoreStore for RecordingStore {
        fn high_score(&self) -> u32 {
            self.stored
        }

        fn set_high_score(&mut self, score: u32) -> Result<(), ScoreError> {
            self.stored = score;
            self.saves.push(score);
            Ok(())
        }
    }

    #[derive(Debug, Default)]
    struct ReadOnlyStore {
        attempts: u32,
    }

    impl ScoreStore for ReadOnlyStore {
        fn high_score(&self) -> u32 {
            0
        }

        fn set_high_score(&mut self, _score: u32) -> Result<(), ScoreError> {
            self.attempts += 1;
            Err(ScoreError::Io {
                path: PathBuf::from("/read-only/scores.json"),
                source: io::Error::new(io::ErrorKind::PermissionDenied, "read-only"),
            })
        }
    }

    fn session_with<S: ScoreStore>(store: S) -> Session<S> {
        Session::new(
            GameEngine::new_with_seed(GridSize::new(30), 21),
            store,
            Difficulty::Medium,
            1,
        )
    }

    fn feed_ahead<S: ScoreStore>(session: &mut Session<S>) {
        let engine = session.engine_mut();
        let next = engine.snake().head().shifted(engine.snake().pending_direction());
        engine.set_food(next);
    }

    #[test]
    fn start_arms_the_timer_at_the_difficulty_interval() {
        let now = Instant::now();
        let mut session = session_with(MemoryScoreStore::default());

        assert_eq!(session.tick(now + Duration::from_secs(1)), None);

        session.apply(Command::Start, now);
        assert_eq!(session.engine().status(), GameStatus::Running);
        assert_eq!(
            session.scheduler().interval(),
            Some(Duration::from_millis(100))
        );
        assert_eq!(session.tick(now + Duration::from_millis(50)), None);
        assert!(session.tick(now + Duration::from_millis(100)).is_some());
    }

    #[test]
    fn start_is_ignored_mid_game_but_restart_is_not() {
        let now = Instant::now();
        let mut session = session_with(MemoryScoreStore::default());
        session.apply(Command::Start, now);
        session.engine_mut().set_food(Position::new(29, 29));
        session.tick(now + Duration::from_millis(100));
        assert_eq!(session.engine().snake().head(), Position::new(7, 6));

        session.apply(Command::Start, now + Duration::from_millis(120));
        assert_eq!(session.engine().snake().head(), Position::new(7, 6));

        session.apply(Command::Restart, now + Duration::from_millis(130));
        assert_eq!(session.engine().snake().head(), Position::new(6, 6));
    }

    #[test]
    fn beating_the_stored_best_saves_each_new_high() {
        let now = Instant::now();
        let mut session = session_with(RecordingStore {
            stored: 20,
            saves: Vec::new(),
        });
        session.apply(Command::Start, now);

        for tick in 1..=5 {
            feed_ahead(&mut session);
            let at = now + Duration::from_millis(100 * tick);
            assert_eq!(session.tick(at), Some(StepOutcome::Ate));
        }

        assert_eq!(session.engine().score(), 50);
        assert_eq!(session.high_score(), 50);
        assert_eq!(session.store().saves, vec![30, 40, 50]);
        assert_eq!(session.store().high_score(), 50);
    }

    #[test]
    fn failed_saves_are_retried_and_the_first_error_is_kept() {
        let now = Instant::now();
        let mut session = session_with(ReadOnlyStore::default());
        session.apply(Command::Start, now);

        for tick in 1..=2 {
            feed_ahead(&mut session);
            let at = now + Duration::from_millis(100 * tick);
            assert_eq!(session.tick(at), Some(StepOutcome::Ate));
        }

        assert_eq!(session.store().attempts, 2);
        assert_eq!(session.high_score(), 20);
        assert!(matches!(
            session.save_error(),
            Some(ScoreError::Io { path, .. }) if path.ends_with("scores.json")
        ));
    }

    #[test]
    fn filling_the_board_wins_saves_and_stops_the_timer() {
        let now = Instant::now();
        let mut session = Session::new(
            GameEngine::new_with_seed(GridSize::new(8), 3),
            RecordingStore::default(),
            Difficulty::Medium,
            1,
        );
        session.apply(Command::Start, now);

        // Serpentine over rows 0..=6, then row 7 from x = 7 down to x = 1,
        // leaving (0, 7) as the last free cell.
        let mut cells: Vec<Position> = (0..7)
            .flat_map(|y| {
                let row: Vec<Position> = (0..8).map(|x| Position::new(x, y)).collect();
                if y % 2 == 0 { row } else { row.into_iter().rev().collect() }
            })
            .collect();
        cells.extend((1..8).rev().map(|x| Position::new(x, 7)));
        cells.reverse();
        assert_eq!(cells.len(), 63);
        assert_eq!(cells[0], Position::new(1, 7));

        let engine = session.engine_mut();
        engine.set_snake(Snake::from_segments(cells, Direction::Left));
        engine.set_food(Position::new(0, 7));

        let outcome = session.tick(now + Duration::from_millis(100));

        assert_eq!(outcome, Some(StepOutcome::BoardFilled));
        assert_eq!(session.engine().status(), GameStatus::Won);
        assert_eq!(session.high_score(), 10);
        assert_eq!(session.store().saves, vec![10]);
        assert!(!session.scheduler().is_running());
    }

    #[test]
    fn game_over_stops_the_timer() {
        let now = Instant::now();
        let mut session = session_with(MemoryScoreStore::default());
        session.apply(Command::Start, now);
        session.apply(Command::Steer(Direction::Up), now);
        session.engine_mut().set_food(Position::new(29, 29));

        let mut at = now;
        let outcome = loop {
            at += Duration::from_millis(100);
            match session.tick(at) {
                Some(StepOutcome::Moved) => continue,
                other => break other,
            }
        };

        assert!(matches!(outcome, Some(StepOutcome::Collided(_))));
        assert_eq!(session.engine().status(), GameStatus::GameOver);
        assert!(!session.scheduler().is_running());
    }

    #[test]
    fn pause_stops_and_resumes_ticking() {
        let now = Instant::now();
        let mut session = session_with(MemoryScoreStore::default());
        session.apply(Command::Start, now);

        session.apply(Command::TogglePause, now);
        assert_eq!(session.engine().status(), GameStatus::Paused);
        assert_eq!(session.tick(now + Duration::from_secs(5)), None);

        let resumed = now + Duration::from_secs(5);
        session.apply(Command::TogglePause, resumed);
        assert_eq!(session.engine().status(), GameStatus::Running);
        assert!(session.tick(resumed + Duration::from_millis(100)).is_some());
    }

    #[test]
    fn changing_difficulty_mid_game_restarts_at_new_interval() {
        let now = Instant::now();
        let mut session = session_with(MemoryScoreStore::default());
        session.apply(Command::Start, now);
        session.engine_mut().set_food(Position::new(29, 29));
        session.tick(now + Duration::from_millis(100));

        let changed = now + Duration::from_millis(110);
        session.apply(Command::ChangeDifficulty(Difficulty::Hard), changed);

        assert_eq!(session.difficulty(), Difficulty::Hard);
        assert_eq!(session.engine().snake().head(), Position::new(6, 6));
        assert_eq!(
            session.scheduler().interval(),
            Some(Duration::from_millis(70))
        );
        assert!(session.tick(changed + Duration::from_millis(70)).is_some());
    }

    #[test]
    fn changing_difficulty_while_paused_restarts_running() {
        let now = Instant::now();
        let mut session = session_with(MemoryScoreStore::default());
        session.apply(Command::Start, now);
        session.engine_mut().set_food(Position::new(29, 29));
        session.tick(now + Duration::from_millis(100));
        session.apply(Command::TogglePause, now + Duration::from_millis(120));
        assert!(!session.scheduler().is_running());

        let changed = now + Duration::from_millis(200);
        session.apply(Command::ChangeDifficulty(Difficulty::Hard), changed);

        assert_eq!(session.engine().status(), GameStatus::Running);
        assert_eq!(session.engine().snake().head(), Position::new(6, 6));
        assert_eq!(
            session.scheduler().interval(),
            Some(Duration::from_millis(70))
        );
        assert!(session.tick(changed + Duration::from_millis(70)).is_some());
    }

    #[test]
    fn changing_difficulty_before_start_does_not_start() {
        let now = Instant::now();
        let mut session = session_with(MemoryScoreStore::default());

        session.apply(Command::CycleDifficulty, now);

        assert_eq!(session.difficulty(), Difficulty::Hard);
        assert_eq!(session.engine().status(), GameStatus::Ready);
        assert!(!session.scheduler().is_running());
    }

    #[test]
    fn resize_mid_game_waits_for_the_next_reset() {
        let now = Instant::now();
        let mut session = session_with(MemoryScoreStore::default());
        session.apply(Command::Start, now);

        session.apply(Command::Resize { cols: 60, rows: 24 }, now);
        assert_eq!(session.engine().bounds(), GridSize::new(30));
        assert_eq!(session.pending_bounds(), Some(GridSize::new(20)));

        session.apply(Command::Restart, now);
        assert_eq!(session.engine().bounds(), GridSize::new(20));
        assert_eq!(session.pending_bounds(), None);
    }

    #[test]
    fn resize_before_start_applies_at_once() {
        let mut session = session_with(MemoryScoreStore::default());

        session.apply(Command::Resize { cols: 60, rows: 24 }, Instant::now());

        assert_eq!(session.engine().bounds(), GridSize::new(20));
        assert_eq!(session.pending_bounds(), None);
    }

    #[test]
    fn quit_ends_the_loop() {
        let mut session = session_with(MemoryScoreStore::default());
        assert_eq!(session.apply(Command::Quit, Instant::now()), Flow::Quit);
    }
}
