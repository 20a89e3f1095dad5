/// Events emitted by the engine.
/// The session turns these into HUD updates and sound cues.

use crate::domain::grid::Cell;
use crate::domain::rules::Collision;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum GameEvent {
    /// Snake moved one cell without eating.
    Moved { head: Cell },
    /// Tick ran but no heading is set yet (before the first key press).
    Stalled,
    FoodEaten { at: Cell, score: u32 },
    ScoreChanged { score: u32 },
    GameOver { cause: Collision, score: u32 },
    Restarted,
}
