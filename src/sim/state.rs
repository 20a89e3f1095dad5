/// GameState: the complete snapshot of a run.
///
/// Owned and mutated only by `GameEngine`. Renderers and input code get a
/// shared reference and must not mutate it. A restart replaces the whole
/// value; nothing is torn down piecemeal.

use std::collections::VecDeque;

use rand::Rng;

use crate::domain::food::generate_food;
use crate::domain::grid::{Cell, Direction};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GameState {
    /// Head at the front, tail at the back. Never empty.
    pub snake: VecDeque<Cell>,
    pub food: Cell,
    pub direction: Direction,
    /// Heading requested by input, committed at the next tick if legal.
    pub pending: Direction,
    pub score: u32,
    pub is_game_over: bool,
}

impl GameState {
    /// Start-of-run state: one cell at the center, stationary, fresh food.
    pub fn fresh<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let snake: VecDeque<Cell> = [Cell::center()].into_iter().collect();
        // A one-cell snake always leaves room; the fallback is never used.
        let food = generate_food(&snake, rng).unwrap_or(Cell::new(0, 0));
        GameState {
            snake,
            food,
            direction: Direction::NONE,
            pending: Direction::NONE,
            score: 0,
            is_game_over: false,
        }
    }

    pub fn head(&self) -> Cell {
        self.snake.front().copied().unwrap_or_else(Cell::center)
    }

    pub fn len(&self) -> usize {
        self.snake.len()
    }
}
