/// Gamepad input tracker using gilrs.
///
/// Button mapping is loaded from config.toml via `load_button_config()`.
/// Default mapping:
///   D-pad / Left Stick    →  Steer (edge-triggered, one turn per push)
///   Start / A             →  Restart
///   Select                →  Quit
///
/// Without the "gamepad" feature the tracker compiles but never sees input.

#[cfg(feature = "gamepad")]
use gilrs::{Axis, Button, EventType, Gilrs};
#[cfg(feature = "gamepad")]
use log::info;

use crate::config::GamepadConfig;
use crate::domain::grid::Direction;

#[cfg_attr(not(feature = "gamepad"), allow(dead_code))]
const STICK_DEADZONE: f32 = 0.25;

/// Logical button identifiers (one per physical button).
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum Btn {
    A,       // South
    B,       // East
    X,       // West
    Y,       // North
    L1,      // LeftTrigger
    R1,      // RightTrigger
    Start,
    Select,
}

impl Btn {
    fn from_name(s: &str) -> Option<Btn> {
        match s.to_uppercase().as_str() {
            "A" | "SOUTH" => Some(Btn::A),
            "B" | "EAST" => Some(Btn::B),
            "X" | "WEST" => Some(Btn::X),
            "Y" | "NORTH" => Some(Btn::Y),
            "L1" | "LB" | "LEFTTRIGGER" => Some(Btn::L1),
            "R1" | "RB" | "RIGHTTRIGGER" => Some(Btn::R1),
            "START" => Some(Btn::Start),
            "SELECT" | "BACK" => Some(Btn::Select),
            _ => None,
        }
    }

    #[cfg(feature = "gamepad")]
    fn from_gilrs(btn: Button) -> Option<Btn> {
        match btn {
            Button::South => Some(Btn::A),
            Button::East => Some(Btn::B),
            Button::West => Some(Btn::X),
            Button::North => Some(Btn::Y),
            Button::LeftTrigger => Some(Btn::L1),
            Button::RightTrigger => Some(Btn::R1),
            Button::Start => Some(Btn::Start),
            Button::Select => Some(Btn::Select),
            _ => None,
        }
    }
}

/// Per-button state: held (continuous) and just_pressed (edge).
#[derive(Clone, Copy, Debug, Default)]
struct BtnState {
    held: bool,
    just_pressed: bool,
}

impl BtnState {
    fn set(&mut self, held: bool) {
        if held && !self.held {
            self.just_pressed = true;
        }
        self.held = held;
    }
}

/// Order of the d-pad / stick slots.
const DIRS: [Direction; 4] = [Direction::UP, Direction::DOWN, Direction::LEFT, Direction::RIGHT];

/// Action-to-button mapping (loaded from config).
struct ActionMap {
    restart: Vec<Btn>,
    quit: Vec<Btn>,
}

impl Default for ActionMap {
    fn default() -> Self {
        ActionMap {
            restart: vec![Btn::Start, Btn::A],
            quit: vec![Btn::Select],
        }
    }
}

pub struct GamepadState {
    #[cfg(feature = "gamepad")]
    gilrs: Option<Gilrs>,

    // All tracked buttons (indexed by Btn)
    buttons: [BtnState; 8],
    // Indexed like DIRS
    dpad: [BtnState; 4],
    stick: [BtnState; 4],
    #[cfg_attr(not(feature = "gamepad"), allow(dead_code))]
    stick_x: f32,
    #[cfg_attr(not(feature = "gamepad"), allow(dead_code))]
    stick_y: f32,

    action_map: ActionMap,

    pub connected: bool,
}

impl GamepadState {
    pub fn new() -> Self {
        #[cfg(feature = "gamepad")]
        let (gilrs_opt, connected) = match Gilrs::new() {
            Ok(g) => {
                let has_pad = g.gamepads().next().is_some();
                info!("gamepad support ready, pad connected: {has_pad}");
                (Some(g), has_pad)
            }
            Err(e) => {
                info!("gamepad support unavailable: {e}");
                (None, false)
            }
        };
        #[cfg(not(feature = "gamepad"))]
        let connected = false;

        GamepadState {
            #[cfg(feature = "gamepad")]
            gilrs: gilrs_opt,
            buttons: [BtnState::default(); 8],
            dpad: [BtnState::default(); 4],
            stick: [BtnState::default(); 4],
            stick_x: 0.0,
            stick_y: 0.0,
            action_map: ActionMap::default(),
            connected,
        }
    }

    /// Load button mapping from config. Lists with no recognised names keep
    /// the defaults.
    pub fn load_button_config(&mut self, cfg: &GamepadConfig) {
        fn parse_list(names: &[String]) -> Vec<Btn> {
            names.iter().filter_map(|s| Btn::from_name(s)).collect()
        }
        let rs = parse_list(&cfg.restart);
        if !rs.is_empty() {
            self.action_map.restart = rs;
        }
        let qt = parse_list(&cfg.quit);
        if !qt.is_empty() {
            self.action_map.quit = qt;
        }
    }

    pub fn update(&mut self) {
        self.clear_just_pressed();

        #[cfg(feature = "gamepad")]
        self.poll_gilrs();
    }

    #[cfg(feature = "gamepad")]
    fn poll_gilrs(&mut self) {
        let gilrs = match &mut self.gilrs {
            Some(g) => g,
            None => return,
        };

        let events: Vec<_> = std::iter::from_fn(|| gilrs.next_event()).collect();

        for event in events {
            match event.event {
                EventType::ButtonPressed(btn, _) => {
                    self.connected = true;
                    self.set_button(btn, true);
                }
                EventType::ButtonReleased(btn, _) => {
                    self.connected = true;
                    self.set_button(btn, false);
                }
                EventType::AxisChanged(axis, value, _) => {
                    self.connected = true;
                    match axis {
                        Axis::LeftStickX => self.stick_x = value,
                        Axis::LeftStickY => self.stick_y = value,
                        _ => {}
                    }
                }
                EventType::Connected => {
                    self.connected = true;
                    info!("gamepad connected");
                }
                EventType::Disconnected => {
                    self.connected = false;
                    self.release_all();
                    info!("gamepad disconnected");
                }
                _ => {}
            }
        }

        // Stick → digital, in DIRS order (stick Y is up-positive).
        self.stick[0].set(self.stick_y > STICK_DEADZONE);
        self.stick[1].set(self.stick_y < -STICK_DEADZONE);
        self.stick[2].set(self.stick_x < -STICK_DEADZONE);
        self.stick[3].set(self.stick_x > STICK_DEADZONE);
    }

    #[cfg(feature = "gamepad")]
    fn set_button(&mut self, gilrs_btn: Button, held: bool) {
        let dpad_slot = match gilrs_btn {
            Button::DPadUp => Some(0),
            Button::DPadDown => Some(1),
            Button::DPadLeft => Some(2),
            Button::DPadRight => Some(3),
            _ => None,
        };
        if let Some(slot) = dpad_slot {
            self.dpad[slot].set(held);
        } else if let Some(btn) = Btn::from_gilrs(gilrs_btn) {
            self.press(btn, held);
        }
    }

    #[cfg_attr(not(feature = "gamepad"), allow(dead_code))]
    fn press(&mut self, btn: Btn, held: bool) {
        self.buttons[btn as usize].set(held);
    }

    // ── Action queries (config-driven) ──

    fn any_just_pressed(&self, btns: &[Btn]) -> bool {
        btns.iter().any(|&b| self.buttons[b as usize].just_pressed)
    }

    /// First direction freshly pushed on the d-pad or stick this frame.
    pub fn steer_pressed(&self) -> Option<Direction> {
        (0..DIRS.len())
            .find(|&i| self.dpad[i].just_pressed || self.stick[i].just_pressed)
            .map(|i| DIRS[i])
    }

    pub fn restart_pressed(&self) -> bool {
        self.any_just_pressed(&self.action_map.restart)
    }

    pub fn quit_pressed(&self) -> bool {
        self.any_just_pressed(&self.action_map.quit)
    }

    // ── Internal ──

    fn clear_just_pressed(&mut self) {
        for b in self.buttons.iter_mut().chain(&mut self.dpad).chain(&mut self.stick) {
            b.just_pressed = false;
        }
    }

    #[cfg_attr(not(feature = "gamepad"), allow(dead_code))]
    fn release_all(&mut self) {
        for b in self.buttons.iter_mut().chain(&mut self.dpad).chain(&mut self.stick) {
            *b = BtnState::default();
        }
        self.stick_x = 0.0;
        self.stick_y = 0.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cfg(restart: &[&str], quit: &[&str]) -> GamepadConfig {
        GamepadConfig {
            restart: restart.iter().map(|s| s.to_string()).collect(),
            quit: quit.iter().map(|s| s.to_string()).collect(),
        }
    }

    #[test]
    fn button_names_are_case_insensitive() {
        assert_eq!(Btn::from_name("start"), Some(Btn::Start));
        assert_eq!(Btn::from_name("South"), Some(Btn::A));
        assert_eq!(Btn::from_name("back"), Some(Btn::Select));
        assert_eq!(Btn::from_name("Turbo"), None);
    }

    #[test]
    fn config_overrides_and_falls_back() {
        let mut gp = GamepadState::new();
        gp.load_button_config(&cfg(&["Y"], &["nonsense"]));
        assert_eq!(gp.action_map.restart, vec![Btn::Y]);
        assert_eq!(gp.action_map.quit, vec![Btn::Select]);
    }

    #[test]
    fn restart_is_edge_triggered() {
        let mut gp = GamepadState::new();
        gp.press(Btn::Start, true);
        assert!(gp.restart_pressed());
        gp.clear_just_pressed();
        gp.press(Btn::Start, true);
        assert!(!gp.restart_pressed(), "holding does not repeat");
        assert!(!gp.quit_pressed());
    }

    #[test]
    fn dpad_push_steers_once() {
        let mut gp = GamepadState::new();
        gp.dpad[2].set(true);
        assert_eq!(gp.steer_pressed(), Some(Direction::LEFT));
        gp.clear_just_pressed();
        gp.dpad[2].set(true);
        assert_eq!(gp.steer_pressed(), None);
    }

    #[test]
    fn release_all_clears_holds() {
        let mut gp = GamepadState::new();
        gp.dpad[0].set(true);
        gp.press(Btn::A, true);
        gp.release_all();
        assert!(!gp.dpad[0].held);
        assert!(!gp.buttons[Btn::A as usize].held);
    }
}
