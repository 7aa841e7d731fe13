use log::{debug, info};
use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::config::{FOOD_POINTS, GridSize};
use crate::food::spawn_position;
use crate::input::Direction;
use crate::snake::{Position, Snake};

/// Starting body, head first: three cells heading right near the top-left.
pub const START_SEGMENTS: [Position; 3] =
    [Position::new(6, 6), Position::new(5, 6), Position::new(4, 6)];

/// Current high-level gameplay state.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum GameStatus {
    /// Laid out but not started.
    Ready,
    Running,
    Paused,
    GameOver,
    /// The snake filled the board; no cell is left for food.
    Won,
}

impl GameStatus {
    /// True for a game that has started and not yet ended.
    #[must_use]
    pub fn is_live(self) -> bool {
        matches!(self, Self::Running | Self::Paused)
    }
}

/// Why the last game ended.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum DeathReason {
    Wall,
    SelfCollision,
}

/// What a single [`GameEngine::step`] did.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum StepOutcome {
    /// Shifted one cell, length unchanged.
    Moved,
    /// Ate food, grew by one and food was placed elsewhere.
    Ate,
    /// Ate the last food on a board with no free cell left.
    BoardFilled,
    /// The move was invalid; the snake is unchanged.
    Collided(DeathReason),
    /// Not running, nothing happened.
    Idle,
}

/// Read-only view of the engine handed to renderers.
#[derive(Debug, Clone, Copy)]
pub struct Snapshot<'a> {
    pub snake: &'a Snake,
    pub food: Option<Position>,
    pub score: u32,
    pub status: GameStatus,
    pub death_reason: Option<DeathReason>,
    pub bounds: GridSize,
}

/// Complete game state for one process, advanced one tick at a time.
#[derive(Debug, Clone)]
pub struct GameEngine {
    snake: Snake,
    food: Option<Position>,
    score: u32,
    status: GameStatus,
    death_reason: Option<DeathReason>,
    bounds: GridSize,
    rng: StdRng,
}

impl GameEngine {
    /// Creates an engine in [`GameStatus::Ready`] seeded from OS entropy.
    #[must_use]
    pub fn new(bounds: GridSize) -> Self {
        Self::with_rng(bounds, StdRng::from_entropy())
    }

    /// Creates a deterministic engine for tests and reproducible simulations.
    #[must_use]
    pub fn new_with_seed(bounds: GridSize, seed: u64) -> Self {
        Self::with_rng(bounds, StdRng::seed_from_u64(seed))
    }

    fn with_rng(bounds: GridSize, rng: StdRng) -> Self {
        let mut engine = Self {
            snake: Snake::from_segments(START_SEGMENTS.to_vec(), Direction::Right),
            food: None,
            score: 0,
            status: GameStatus::Ready,
            death_reason: None,
            bounds,
            rng,
        };
        engine.place_food();
        engine
    }

    /// Lays out a fresh game on a `bounds` board and starts it.
    pub fn reset(&mut self, bounds: GridSize) {
        self.bounds = bounds;
        self.snake = Snake::from_segments(START_SEGMENTS.to_vec(), Direction::Right);
        self.score = 0;
        self.death_reason = None;
        self.status = GameStatus::Running;
        self.place_food();

        debug!("reset on {0}x{0} board, food at {1:?}", bounds.side(), self.food);
    }

    /// Queues a turn for the next step; reversals are silently ignored.
    ///
    /// Returns whether the request was kept.
    pub fn set_direction(&mut self, direction: Direction) -> bool {
        self.snake.steer(direction)
    }

    /// Advances the game by exactly one cell.
    pub fn step(&mut self) -> StepOutcome {
        if self.status != GameStatus::Running {
            return StepOutcome::Idle;
        }

        let new_head = self.snake.commit_turn();

        if let Some(reason) = self.collision_at(new_head) {
            self.status = GameStatus::GameOver;
            self.death_reason = Some(reason);
            info!("game over ({reason:?}) with score {}", self.score);
            return StepOutcome::Collided(reason);
        }

        if self.food != Some(new_head) {
            self.snake.advance(new_head, false);
            return StepOutcome::Moved;
        }

        self.snake.advance(new_head, true);
        self.score += FOOD_POINTS;
        self.place_food();

        if self.food.is_none() {
            self.status = GameStatus::Won;
            info!("board filled with score {}", self.score);
            return StepOutcome::BoardFilled;
        }

        StepOutcome::Ate
    }

    /// Toggles between running and paused; other states are unaffected.
    pub fn toggle_pause(&mut self) {
        self.status = match self.status {
            GameStatus::Running => GameStatus::Paused,
            GameStatus::Paused => GameStatus::Running,
            other => other,
        };
    }

    /// Changes the board bound outside of a live game.
    ///
    /// Returns `false` and leaves the board alone while a game is running or
    /// paused, since existing cells could fall outside the new bound.
    pub fn resize(&mut self, bounds: GridSize) -> bool {
        if self.status.is_live() {
            return false;
        }
        if bounds != self.bounds {
            self.bounds = bounds;
            if self.food.is_some_and(|food| !food.is_within_bounds(bounds)) {
                self.place_food();
            }
        }
        true
    }

    /// Returns a read-only view for rendering.
    #[must_use]
    pub fn snapshot(&self) -> Snapshot<'_> {
        Snapshot {
            snake: &self.snake,
            food: self.food,
            score: self.score,
            status: self.status,
            death_reason: self.death_reason,
            bounds: self.bounds,
        }
    }

    #[must_use]
    pub fn status(&self) -> GameStatus {
        self.status
    }

    #[must_use]
    pub fn score(&self) -> u32 {
        self.score
    }

    #[must_use]
    pub fn bounds(&self) -> GridSize {
        self.bounds
    }

    #[must_use]
    pub fn snake(&self) -> &Snake {
        &self.snake
    }

    #[must_use]
    pub fn food(&self) -> Option<Position> {
        self.food
    }

    /// Replaces the snake; used to stage positions in tests and demos.
    pub fn set_snake(&mut self, snake: Snake) {
        self.snake = snake;
    }

    /// Moves the food; used to stage positions in tests and demos.
    pub fn set_food(&mut self, food: Position) {
        self.food = Some(food);
    }

    fn collision_at(&self, position: Position) -> Option<DeathReason> {
        if !position.is_within_bounds(self.bounds) {
            return Some(DeathReason::Wall);
        }
        // Checked against the pre-move body, tail included.
        if self.snake.occupies(position) {
            return Some(DeathReason::SelfCollision);
        }
        None
    }

    fn place_food(&mut self) {
        self.food = spawn_position(&mut self.rng, self.bounds, &self.snake);
    }
}
