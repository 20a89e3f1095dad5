/// Session: drives the engine from a clock and fans events out to the
/// front end.
///
/// The front end is reached only through two ports:
///   - `Hud`       — score text and the game-over indicator
///   - `SoundSink` — fire-and-forget cues
///
/// Every entry point goes through the engine, which checks the game-over
/// flag first, so a stopped run can never be advanced by a late tick.

use std::time::Duration;

use rand::rngs::StdRng;
use rand::Rng;

use crate::domain::grid::TICK_INTERVAL;
use crate::domain::intent::Intent;
use super::clock::{Deferred, Interval};
use super::engine::GameEngine;
use super::event::GameEvent;
use super::state::GameState;

/// Text and visibility sinks owned by the front end.
pub trait Hud {
    fn set_score_text(&mut self, score: u32);
    fn show_game_over(&mut self);
    fn hide_game_over(&mut self);
}

/// Sound cues. Implementations swallow their own failures.
pub trait SoundSink {
    fn play_eat_sound(&self);
    fn play_game_over_sound(&self);
}

/// Sink used when no audio device (or no `sound` feature) is available.
pub struct Silent;

impl SoundSink for Silent {
    fn play_eat_sound(&self) {}
    fn play_game_over_sound(&self) {}
}

pub struct Session<R: Rng = StdRng> {
    engine: GameEngine<R>,
    ticker: Interval,
    game_over_sound: Deferred,
    game_over_delay: Duration,
}

impl<R: Rng> Session<R> {
    pub fn new(engine: GameEngine<R>, game_over_delay: Duration) -> Self {
        Session {
            engine,
            ticker: Interval::new(TICK_INTERVAL),
            game_over_sound: Deferred::default(),
            game_over_delay,
        }
    }

    pub fn state(&self) -> &GameState {
        self.engine.state()
    }

    /// Push the initial HUD state and start ticking.
    pub fn start(&mut self, now: Duration, hud: &mut dyn Hud) {
        hud.set_score_text(self.engine.state().score);
        hud.hide_game_over();
        self.ticker.start(now);
    }

    pub fn apply(&mut self, intent: Intent, now: Duration, hud: &mut dyn Hud, sound: &dyn SoundSink) {
        let events = self.engine.handle_intent(intent);
        self.dispatch(&events, now, hud, sound);
    }

    /// Poll both timers. Call as often as the host loop spins.
    /// Returns the events of the tick that ran, if any.
    pub fn update(&mut self, now: Duration, hud: &mut dyn Hud, sound: &dyn SoundSink) -> Vec<GameEvent> {
        let mut events = vec![];
        if self.ticker.poll(now) {
            events = self.engine.advance();
            self.dispatch(&events, now, hud, sound);
        }
        if self.game_over_sound.poll(now) {
            sound.play_game_over_sound();
        }
        events
    }

    fn dispatch(&mut self, events: &[GameEvent], now: Duration, hud: &mut dyn Hud, sound: &dyn SoundSink) {
        for event in events {
            match *event {
                GameEvent::FoodEaten { .. } => sound.play_eat_sound(),
                GameEvent::ScoreChanged { score } => hud.set_score_text(score),
                GameEvent::GameOver { .. } => {
                    self.ticker.stop();
                    hud.show_game_over();
                    // Delayed so the cue does not overlap the tick that ended the run.
                    self.game_over_sound.arm(now, self.game_over_delay);
                }
                GameEvent::Restarted => {
                    self.game_over_sound.cancel();
                    hud.hide_game_over();
                    self.ticker.start(now);
                }
                GameEvent::Moved { .. } | GameEvent::Stalled => {}
            }
        }
    }
}

#[cfg(test)]
impl<R: Rng> Session<R> {
    pub fn is_ticking(&self) -> bool {
        self.ticker.is_running()
    }

    pub fn engine_mut(&mut self) -> &mut GameEngine<R> {
        &mut self.engine
    }
}
