/// Food placement.
///
/// Rejection sampling first (cheap while the board is mostly empty), then a
/// uniform pick from the explicit free-cell list so placement always
/// terminates. The RNG is injected so tests can seed it.

use std::collections::VecDeque;

use rand::Rng;

use super::grid::{Cell, TILE_COUNT};

/// Draws tried before falling back to the free-cell list.
const MAX_REJECTION_DRAWS: usize = 64;

/// Pick a cell not occupied by the snake. `None` when the board is full.
pub fn generate_food<R: Rng + ?Sized>(snake: &VecDeque<Cell>, rng: &mut R) -> Option<Cell> {
    for _ in 0..MAX_REJECTION_DRAWS {
        let candidate = Cell::new(rng.gen_range(0..TILE_COUNT), rng.gen_range(0..TILE_COUNT));
        if !snake.contains(&candidate) {
            return Some(candidate);
        }
    }

    let free = free_cells(snake);
    if free.is_empty() {
        return None;
    }
    Some(free[rng.gen_range(0..free.len())])
}

/// Every board cell the snake does not occupy, row-major.
pub fn free_cells(snake: &VecDeque<Cell>) -> Vec<Cell> {
    let mut occupied = vec![false; (TILE_COUNT * TILE_COUNT) as usize];
    for seg in snake.iter().filter(|c| c.in_bounds()) {
        occupied[(seg.y * TILE_COUNT + seg.x) as usize] = true;
    }
    (0..TILE_COUNT)
        .flat_map(|y| (0..TILE_COUNT).map(move |x| Cell::new(x, y)))
        .filter(|c| !occupied[(c.y * TILE_COUNT + c.x) as usize])
        .collect()
}
