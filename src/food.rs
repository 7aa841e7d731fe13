use rand::Rng;

use crate::config::{FOOD_SAMPLE_ATTEMPTS, GridSize};
use crate::snake::{Position, Snake};

/// Picks a uniformly random cell that the snake does not occupy.
///
/// Rejection-samples up to [`FOOD_SAMPLE_ATTEMPTS`] times, which is nearly
/// always enough on a sparse board, then picks among the enumerated free
/// cells. Returns `None` only when every cell is occupied.
#[must_use]
pub fn spawn_position<R: Rng + ?Sized>(
    rng: &mut R,
    bounds: GridSize,
    snake: &Snake,
) -> Option<Position> {
    if snake.len() >= bounds.total_cells() {
        return free_cell(rng, bounds, snake);
    }

    let side = i32::from(bounds.side());
    for _ in 0..FOOD_SAMPLE_ATTEMPTS {
        let candidate = Position::new(rng.gen_range(0..side), rng.gen_range(0..side));
        if !snake.occupies(candidate) {
            return Some(candidate);
        }
    }

    free_cell(rng, bounds, snake)
}

fn free_cell<R: Rng + ?Sized>(rng: &mut R, bounds: GridSize, snake: &Snake) -> Option<Position> {
    let side = i32::from(bounds.side());
    let candidates: Vec<Position> = (0..side)
        .flat_map(|y| (0..side).map(move |x| Position::new(x, y)))
        .filter(|position| !snake.occupies(*position))
        .collect();

    if candidates.is_empty() {
        return None;
    }

    let index = rng.gen_range(0..candidates.len());
    Some(candidates[index])
}
