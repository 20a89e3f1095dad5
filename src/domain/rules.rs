/// Collision and turning rules.
///
/// Pure functions over the snake body: no side effects, no RNG.
/// These encode "what ends a run" and "which heading may be committed".
///
/// ## Collision Truth Table
/// ┌────────────────────────────────┬───────────┬───────────────────────┐
/// │ Candidate head                  │ Result    │ Notes                 │
/// ├────────────────────────────────┼───────────┼───────────────────────┤
/// │ x or y outside [0, TILE_COUNT)  │ Wall      │ any heading           │
/// │ equals body[i], 0 < i < len-1   │ SelfBite  │ pre-move body         │
/// │ equals body[0] (old head)       │ none      │ becomes the neck      │
/// │ equals body[len-1] (tail)       │ none      │ vacated this tick     │
/// │ Otherwise                       │ none      │                       │
/// └────────────────────────────────┴───────────┴───────────────────────┘
///
/// The tail is always vacated when the head lands on it: food never sits on
/// the snake, so that move cannot be an eating move.

use std::collections::VecDeque;

use super::grid::{Cell, Direction};

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Collision {
    Wall,
    SelfBite,
    /// No free cell left for food: the snake has filled the board.
    BoardFull,
}

pub fn hits_wall(head: Cell) -> bool {
    !head.in_bounds()
}

/// Does `head` land on a segment that is still occupied after this tick?
/// Skips the current head and the tail that moves away.
pub fn hits_body(snake: &VecDeque<Cell>, head: Cell) -> bool {
    let staying = snake.len().saturating_sub(1);
    snake.iter().take(staying).skip(1).any(|&seg| seg == head)
}

/// Collision check for a candidate head against the pre-move snake.
pub fn check_collision(snake: &VecDeque<Cell>, head: Cell) -> Option<Collision> {
    if hits_wall(head) {
        Some(Collision::Wall)
    } else if hits_body(snake, head) {
        Some(Collision::SelfBite)
    } else {
        None
    }
}

/// Heading to use for the next tick, given what is buffered.
///
/// A pending `NONE` keeps the current heading; a pending reversal is refused.
pub fn commit_heading(current: Direction, pending: Direction) -> Direction {
    if pending.is_none() || pending.reverses(current) {
        current
    } else {
        pending
    }
}

// ══════════════════════════════════════════════════════════════
// Unit tests
// ══════════════════════════════════════════════════════════════
