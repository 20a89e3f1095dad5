/// The engine: owns the game state and advances it one tick at a time.
///
/// Tick processing order:
///   1. Commit the pending heading (reversals refused)
///   2. Stationary guard (no heading yet → nothing moves)
///   3. Candidate head = head + heading
///   4. Collision check → game over
///   5. Push head; eat (grow, score, new food) or pop tail
///
/// Input never touches `direction` directly. It only writes `pending`, so at
/// most one turn is taken per tick no matter how many keys arrive in between.

use log::{debug, info};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::domain::food::generate_food;
use crate::domain::grid::{Direction, SCORE_INCREMENT};
use crate::domain::intent::Intent;
use crate::domain::rules::{self, Collision};
use super::event::GameEvent;
use super::state::GameState;

pub struct GameEngine<R: Rng = StdRng> {
    state: GameState,
    rng: R,
}

impl GameEngine<StdRng> {
    pub fn new() -> Self {
        GameEngine::with_rng(StdRng::from_entropy())
    }
}

impl<R: Rng> GameEngine<R> {
    pub fn with_rng(mut rng: R) -> Self {
        let state = GameState::fresh(&mut rng);
        GameEngine { state, rng }
    }

    /// Read-only view for renderers and the HUD.
    pub fn state(&self) -> &GameState {
        &self.state
    }

    /// Replace the whole state with a fresh run.
    pub fn reset(&mut self) {
        self.state = GameState::fresh(&mut self.rng);
        debug!("reset: food at {:?}", self.state.food);
    }

    // ══════════════════════════════════════════════════════════
    // Tick
    // ══════════════════════════════════════════════════════════

    pub fn advance(&mut self) -> Vec<GameEvent> {
        if self.state.is_game_over {
            return vec![];
        }

        let s = &mut self.state;
        s.direction = rules::commit_heading(s.direction, s.pending);
        if s.direction.is_none() {
            return vec![GameEvent::Stalled];
        }

        let head = s.head().offset(s.direction);
        if let Some(cause) = rules::check_collision(&s.snake, head) {
            return vec![self.end_run(cause)];
        }

        s.snake.push_front(head);
        if head != s.food {
            s.snake.pop_back();
            return vec![GameEvent::Moved { head }];
        }

        s.score += SCORE_INCREMENT;
        let score = s.score;
        let mut events = vec![
            GameEvent::FoodEaten { at: head, score },
            GameEvent::ScoreChanged { score },
        ];
        match generate_food(&self.state.snake, &mut self.rng) {
            Some(food) => {
                self.state.food = food;
                debug!("ate at {head:?}, score {score}, next food {food:?}");
            }
            None => events.push(self.end_run(Collision::BoardFull)),
        }
        events
    }

    fn end_run(&mut self, cause: Collision) -> GameEvent {
        self.state.is_game_over = true;
        let score = self.state.score;
        info!("game over ({cause:?}), score {score}, length {}", self.state.len());
        GameEvent::GameOver { cause, score }
    }

    // ══════════════════════════════════════════════════════════
    // Input
    // ══════════════════════════════════════════════════════════

    /// Buffer a heading for the next tick. Returns whether it was buffered.
    ///
    /// Ignored after game over. A reversal of the current heading is dropped
    /// early once the snake has a body; the tick re-checks regardless.
    pub fn set_direction(&mut self, dir: Direction) -> bool {
        if self.state.is_game_over {
            return false;
        }
        if dir.dx.abs() + dir.dy.abs() != 1 {
            return false;
        }
        if self.state.len() > 1 && dir.reverses(self.state.direction) {
            return false;
        }
        self.state.pending = dir;
        true
    }

    /// Start a new run. Only honored from game over; mid-run restarts are ignored.
    pub fn restart(&mut self) -> Vec<GameEvent> {
        if !self.state.is_game_over {
            return vec![];
        }
        self.reset();
        info!("restarted");
        vec![GameEvent::Restarted, GameEvent::ScoreChanged { score: 0 }]
    }

    pub fn handle_intent(&mut self, intent: Intent) -> Vec<GameEvent> {
        match intent {
            Intent::Restart => self.restart(),
            Intent::Steer(dir) => {
                self.set_direction(dir);
                vec![]
            }
        }
    }
}

#[cfg(test)]
impl<R: Rng> GameEngine<R> {
    pub fn state_mut(&mut self) -> &mut GameState {
        &mut self.state
    }
}

// ══════════════════════════════════════════════════════════════
// Unit tests
// ══════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;
    use crate::domain::grid::{Cell, TILE_COUNT};

    fn engine(seed: u64) -> GameEngine<StdRng> {
        GameEngine::with_rng(StdRng::seed_from_u64(seed))
    }

    fn body(cells: &[(i32, i32)]) -> VecDeque<Cell> {
        cells.iter().map(|&(x, y)| Cell::new(x, y)).collect()
    }

    /// Put the engine into a known mid-run position.
    fn place(e: &mut GameEngine<StdRng>, cells: &[(i32, i32)], dir: Direction, food: (i32, i32)) {
        e.state.snake = body(cells);
        e.state.direction = dir;
        e.state.pending = dir;
        e.state.food = Cell::new(food.0, food.1);
    }

    // ── Reset ──

    #[test]
    fn fresh_run_is_centered_and_still() {
        let e = engine(1);
        let s = e.state();
        assert_eq!(s.snake, body(&[(10, 10)]));
        assert_eq!(s.direction, Direction::NONE);
        assert_eq!(s.pending, Direction::NONE);
        assert_eq!(s.score, 0);
        assert!(!s.is_game_over);
        assert!(s.food.in_bounds());
        assert_ne!(s.food, Cell::center());
    }

    #[test]
    fn stationary_tick_stalls() {
        let mut e = engine(1);
        let before = e.state().clone();
        assert_eq!(e.advance(), vec![GameEvent::Stalled]);
        assert_eq!(e.state(), &before);
    }

    // ── Scenarios ──

    #[test]
    fn first_step_right_from_center() {
        let mut e = engine(2);
        e.state.food = Cell::new(0, 0);
        assert!(e.set_direction(Direction::RIGHT));
        let events = e.advance();
        assert_eq!(events, vec![GameEvent::Moved { head: Cell::new(11, 10) }]);
        assert_eq!(e.state().snake, body(&[(11, 10)]));
        assert_eq!(e.state().direction, Direction::RIGHT);
        assert_eq!(e.state().score, 0);
    }

    #[test]
    fn eating_grows_and_scores() {
        let mut e = engine(3);
        place(&mut e, &[(5, 5), (4, 5)], Direction::RIGHT, (6, 5));
        let events = e.advance();
        assert_eq!(e.state().snake, body(&[(6, 5), (5, 5), (4, 5)]));
        assert_eq!(e.state().score, 10);
        assert!(!e.state().snake.contains(&e.state().food));
        assert_eq!(
            events,
            vec![
                GameEvent::FoodEaten { at: Cell::new(6, 5), score: 10 },
                GameEvent::ScoreChanged { score: 10 },
            ]
        );
    }

    #[test]
    fn plain_move_keeps_length() {
        let mut e = engine(4);
        place(&mut e, &[(5, 5), (4, 5), (3, 5)], Direction::RIGHT, (0, 0));
        e.advance();
        assert_eq!(e.state().snake, body(&[(6, 5), (5, 5), (4, 5)]));
        assert_eq!(e.state().score, 0);
    }

    #[test]
    fn left_wall_ends_run() {
        let mut e = engine(5);
        place(&mut e, &[(0, 5)], Direction::LEFT, (9, 9));
        let events = e.advance();
        assert!(e.state().is_game_over);
        assert_eq!(events, vec![GameEvent::GameOver { cause: Collision::Wall, score: 0 }]);
        assert_eq!(e.state().snake, body(&[(0, 5)]));
    }

    #[test]
    fn every_wall_ends_run() {
        let cases = [
            ((TILE_COUNT - 1, 3), Direction::RIGHT),
            ((3, 0), Direction::UP),
            ((3, TILE_COUNT - 1), Direction::DOWN),
        ];
        for (start, dir) in cases {
            let mut e = engine(6);
            place(&mut e, &[start], dir, (9, 9));
            e.advance();
            assert!(e.state().is_game_over, "{start:?} {dir:?}");
        }
    }

    #[test]
    fn biting_body_ends_run() {
        let mut e = engine(7);
        // Heading down into (5,6), which stays occupied.
        place(&mut e, &[(5, 5), (4, 5), (4, 6), (5, 6), (6, 6)], Direction::RIGHT, (0, 0));
        assert!(e.set_direction(Direction::DOWN));
        let events = e.advance();
        assert!(e.state().is_game_over);
        assert_eq!(events, vec![GameEvent::GameOver { cause: Collision::SelfBite, score: 0 }]);
    }

    #[test]
    fn following_the_tail_is_fine() {
        let mut e = engine(8);
        place(&mut e, &[(5, 5), (5, 6), (4, 6), (4, 5)], Direction::UP, (0, 0));
        assert!(e.set_direction(Direction::LEFT));
        e.advance();
        assert!(!e.state().is_game_over);
        assert_eq!(e.state().snake, body(&[(4, 5), (5, 5), (5, 6), (4, 6)]));
    }

    // ── Reversal guard ──

    #[test]
    fn reversal_is_not_committed() {
        let mut e = engine(9);
        place(&mut e, &[(5, 5)], Direction::RIGHT, (0, 0));
        // Length 1: the early filter lets it through, the tick refuses it.
        assert!(e.set_direction(Direction::LEFT));
        e.advance();
        assert_eq!(e.state().direction, Direction::RIGHT);
        assert_eq!(e.state().head(), Cell::new(6, 5));
    }

    #[test]
    fn reversal_is_filtered_early_with_a_body() {
        let mut e = engine(10);
        place(&mut e, &[(5, 5), (4, 5)], Direction::RIGHT, (0, 0));
        assert!(!e.set_direction(Direction::LEFT));
        assert_eq!(e.state().pending, Direction::RIGHT);
        e.advance();
        assert_eq!(e.state().head(), Cell::new(6, 5));
    }

    #[test]
    fn only_last_buffered_turn_counts() {
        let mut e = engine(11);
        place(&mut e, &[(5, 5), (4, 5)], Direction::RIGHT, (0, 0));
        // Up then left inside one tick: left is checked against the committed
        // heading (right) and dropped, so the snake turns up.
        e.set_direction(Direction::UP);
        e.set_direction(Direction::LEFT);
        e.advance();
        assert_eq!(e.state().head(), Cell::new(5, 4));
    }

    #[test]
    fn one_turn_per_tick() {
        let mut e = engine(12);
        place(&mut e, &[(5, 5), (4, 5), (3, 5)], Direction::RIGHT, (0, 0));
        e.set_direction(Direction::UP);
        e.advance();
        e.set_direction(Direction::LEFT);
        e.advance();
        assert_eq!(e.state().snake, body(&[(4, 4), (5, 4), (5, 5)]));
    }

    #[test]
    fn non_unit_headings_are_rejected() {
        let mut e = engine(13);
        assert!(!e.set_direction(Direction { dx: 2, dy: 0 }));
        assert!(!e.set_direction(Direction { dx: 1, dy: 1 }));
        assert!(!e.set_direction(Direction::NONE));
        assert_eq!(e.state().pending, Direction::NONE);
    }

    // ── Game over / restart ──

    #[test]
    fn tick_after_game_over_changes_nothing() {
        let mut e = engine(14);
        place(&mut e, &[(0, 5)], Direction::LEFT, (9, 9));
        e.advance();
        let frozen = e.state().clone();
        assert!(e.advance().is_empty());
        assert!(e.advance().is_empty());
        assert_eq!(e.state(), &frozen);
    }

    #[test]
    fn input_after_game_over_is_ignored() {
        let mut e = engine(15);
        place(&mut e, &[(0, 5)], Direction::LEFT, (9, 9));
        e.advance();
        assert!(!e.set_direction(Direction::UP));
        assert_eq!(e.state().pending, Direction::LEFT);
    }

    #[test]
    fn restart_mid_run_is_ignored() {
        let mut e = engine(16);
        place(&mut e, &[(5, 5), (4, 5)], Direction::RIGHT, (0, 0));
        e.state.score = 30;
        assert!(e.handle_intent(Intent::Restart).is_empty());
        assert_eq!(e.state().score, 30);
        assert_eq!(e.state().len(), 2);
    }

    #[test]
    fn restart_after_game_over_resets_everything() {
        let mut e = engine(17);
        place(&mut e, &[(0, 5), (1, 5)], Direction::LEFT, (9, 9));
        e.state.score = 50;
        e.advance();
        let events = e.handle_intent(Intent::Restart);
        assert_eq!(events, vec![GameEvent::Restarted, GameEvent::ScoreChanged { score: 0 }]);
        let s = e.state();
        assert!(!s.is_game_over);
        assert_eq!(s.snake, body(&[(10, 10)]));
        assert_eq!(s.direction, Direction::NONE);
        assert_eq!(s.pending, Direction::NONE);
        assert_eq!(s.score, 0);
    }

    #[test]
    fn filling_the_board_ends_the_run() {
        let mut e = engine(18);
        // Serpentine over every cell except (0,0); the head sits on (1,0)
        // heading left onto the last free cell, which holds the food.
        let mut cells: VecDeque<Cell> = VecDeque::new();
        for y in 0..TILE_COUNT {
            let row: Vec<i32> = if y % 2 == 0 {
                (0..TILE_COUNT).collect()
            } else {
                (0..TILE_COUNT).rev().collect()
            };
            for x in row {
                if (x, y) != (0, 0) {
                    cells.push_back(Cell::new(x, y));
                }
            }
        }
        e.state.snake = cells;
        e.state.direction = Direction::LEFT;
        e.state.pending = Direction::LEFT;
        e.state.food = Cell::new(0, 0);
        let events = e.advance();
        assert_eq!(
            events.last(),
            Some(&GameEvent::GameOver { cause: Collision::BoardFull, score: 10 })
        );
        assert!(e.state().is_game_over);
    }

    // ── Invariants over random play ──

    #[test]
    fn food_never_on_snake_during_random_play() {
        let mut e = engine(99);
        let mut pick = StdRng::seed_from_u64(1234);
        let dirs = [Direction::UP, Direction::DOWN, Direction::LEFT, Direction::RIGHT];
        for _ in 0..5_000 {
            if e.state().is_game_over {
                e.restart();
            }
            if pick.gen_bool(0.3) {
                e.set_direction(dirs[pick.gen_range(0..4)]);
            }
            let len_before = e.state().len();
            let events = e.advance();
            let s = e.state();
            assert!(!s.snake.contains(&s.food));
            assert!(s.snake.iter().all(|c| c.in_bounds()));
            let ate = events.iter().any(|ev| matches!(ev, GameEvent::FoodEaten { .. }));
            let expected = if ate { len_before + 1 } else { len_before };
            assert_eq!(s.len(), expected);
        }
    }
}
