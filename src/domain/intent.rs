/// Player intents: what an input source asks the engine to do.
/// Key names follow the browser's `KeyboardEvent.key` spelling so any
/// front end can reuse the same table.

use super::grid::Direction;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Intent {
    Steer(Direction),
    Restart,
}

impl Intent {
    /// Map a key name to an intent. Unknown keys map to `None` and are ignored.
    pub fn from_key_name(key: &str) -> Option<Intent> {
        let intent = match key {
            "ArrowUp" | "w" | "W" => Intent::Steer(Direction::UP),
            "ArrowDown" | "s" | "S" => Intent::Steer(Direction::DOWN),
            "ArrowLeft" | "a" | "A" => Intent::Steer(Direction::LEFT),
            "ArrowRight" | "d" | "D" => Intent::Steer(Direction::RIGHT),
            " " => Intent::Restart,
            _ => return None,
        };
        Some(intent)
    }
}
