/// Keyboard and mouse input.
///
/// Drains every pending terminal event once per loop iteration and keeps
/// them in arrival order:
///   - key presses → `Intent`s (steer / restart), via the shared key-name table
///   - left clicks → terminal positions, hit-tested against the on-screen
///     direction buttons by the caller
///   - Ctrl+C, Esc, Q → quit
///
/// Release events are ignored; only presses and auto-repeats count.

use std::time::Duration;

use crossterm::event::{
    self, poll, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEventKind,
};

use crate::domain::intent::Intent;

pub struct InputState {
    /// Intents from this drain, oldest first.
    intents: Vec<Intent>,
    /// Left-click positions (col, row) from this drain.
    clicks: Vec<(u16, u16)>,
    quit: bool,
}

impl InputState {
    pub fn new() -> Self {
        InputState {
            intents: Vec::with_capacity(8),
            clicks: Vec::with_capacity(4),
            quit: false,
        }
    }

    /// Drain all pending terminal events without blocking.
    pub fn drain_events(&mut self) {
        self.intents.clear();
        self.clicks.clear();

        while poll(Duration::ZERO).unwrap_or(false) {
            match event::read() {
                Ok(Event::Key(key)) => self.on_key(key),
                Ok(Event::Mouse(m)) => {
                    if m.kind == MouseEventKind::Down(MouseButton::Left) {
                        self.clicks.push((m.column, m.row));
                    }
                }
                _ => {}
            }
        }
    }

    fn on_key(&mut self, key: KeyEvent) {
        if key.kind == KeyEventKind::Release {
            return;
        }
        if is_quit(&key) {
            self.quit = true;
        } else if let Some(intent) = intent_for_key(key.code) {
            self.intents.push(intent);
        }
    }

    pub fn intents(&self) -> &[Intent] {
        &self.intents
    }

    pub fn clicks(&self) -> &[(u16, u16)] {
        &self.clicks
    }

    pub fn quit_requested(&self) -> bool {
        self.quit
    }
}

fn is_quit(key: &KeyEvent) -> bool {
    let ctrl_c = key.modifiers.contains(KeyModifiers::CONTROL)
        && matches!(key.code, KeyCode::Char('c') | KeyCode::Char('C'));
    ctrl_c || matches!(key.code, KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('Q'))
}

/// Translate a terminal key into the browser-style key name the intent
/// table understands, then look it up.
pub fn intent_for_key(code: KeyCode) -> Option<Intent> {
    match code {
        KeyCode::Up => Intent::from_key_name("ArrowUp"),
        KeyCode::Down => Intent::from_key_name("ArrowDown"),
        KeyCode::Left => Intent::from_key_name("ArrowLeft"),
        KeyCode::Right => Intent::from_key_name("ArrowRight"),
        KeyCode::Char(c) => {
            let mut buf = [0u8; 4];
            Intent::from_key_name(c.encode_utf8(&mut buf))
        }
        _ => None,
    }
}
