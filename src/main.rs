/// Entry point and host loop.
///
/// One thread, one loop: drain input, feed intents to the session, let the
/// session poll its tick, and repaint whenever the frame interval fires.

mod config;
mod domain;
mod sim;
mod ui;

use std::fs::File;
use std::time::Duration;

use log::{debug, info, trace, warn};
use simplelog::{ConfigBuilder, WriteLogger};

use config::{GameConfig, LogConfig};
use domain::intent::Intent;
use sim::clock::{Clock, Interval, SystemClock};
use sim::engine::GameEngine;
use sim::event::GameEvent;
use sim::session::{Session, SoundSink};
use ui::gamepad::GamepadState;
use ui::input::InputState;
use ui::renderer::Renderer;

const LOOP_SLEEP: Duration = Duration::from_millis(5);

fn main() {
    let (config, source, warnings) = GameConfig::load();
    init_logging(&config.log);
    info!("gridsnake {} starting", env!("CARGO_PKG_VERSION"));
    config.log_startup(&source, &warnings);

    let mut renderer = Renderer::new();
    if let Err(e) = renderer.init() {
        // Raw mode may be half-enabled; undo whatever did succeed.
        let _ = renderer.cleanup();
        eprintln!("Terminal init failed: {e}");
        return;
    }

    let sound = ui::sound::open_sink(&config.sound);
    let delay = Duration::from_millis(config.sound.game_over_delay_ms);
    let mut session = Session::new(GameEngine::new(), delay);

    let result = game_loop(&mut session, &mut renderer, &*sound, &config);

    if let Err(e) = renderer.cleanup() {
        eprintln!("Terminal cleanup failed: {e}");
    }

    let score = session.state().score;
    match result {
        Ok(()) => info!("quit with score {score}"),
        Err(e) => {
            warn!("game loop error: {e}");
            eprintln!("Game error: {e}");
        }
    }

    println!();
    println!("Thanks for playing Snake!");
    println!("Final Score: {score}");
}

/// File logger; the terminal belongs to the game while it runs.
fn init_logging(cfg: &LogConfig) {
    let file = match File::create(&cfg.file) {
        Ok(f) => f,
        Err(e) => {
            eprintln!("Warning: could not open log file {}: {e}", cfg.file);
            return;
        }
    };
    let log_config = ConfigBuilder::new().set_time_format_rfc3339().build();
    if let Err(e) = WriteLogger::init(cfg.level_filter(), log_config, file) {
        eprintln!("Warning: logger init failed: {e}");
    }
}

fn game_loop(
    session: &mut Session,
    renderer: &mut Renderer,
    sound: &dyn SoundSink,
    config: &GameConfig,
) -> Result<(), Box<dyn std::error::Error>> {
    let clock = SystemClock::new();
    let mut kb = InputState::new();
    let mut gp = GamepadState::new();
    gp.load_button_config(&config.gamepad);

    let frame_period = Duration::from_secs(1) / config.display.frame_rate;
    let mut frames = Interval::new(frame_period);

    session.start(clock.now(), renderer);
    renderer.render(session.state(), 0.0)?;
    frames.start(clock.now());

    loop {
        kb.drain_events();
        gp.update();

        if kb.quit_requested() || gp.quit_pressed() {
            break;
        }

        let now = clock.now();
        for intent in collect_intents(&kb, &gp, renderer) {
            session.apply(intent, now, renderer, sound);
        }

        for event in session.update(clock.now(), renderer, sound) {
            match event {
                GameEvent::Moved { head } => trace!("head at ({}, {})", head.x, head.y),
                GameEvent::FoodEaten { at, score } => debug!("ate at ({}, {}), score {score}", at.x, at.y),
                GameEvent::GameOver { cause, score } => debug!("run ended by {cause:?}, score {score}"),
                _ => {}
            }
        }

        let now = clock.now();
        if frames.poll(now) {
            renderer.render(session.state(), now.as_secs_f64() * 1000.0)?;
        }
        std::thread::sleep(LOOP_SLEEP);
    }

    Ok(())
}

/// Every intent from this loop iteration, in source order: keys, clicks
/// on the on-screen buttons, then the gamepad.
fn collect_intents(kb: &InputState, gp: &GamepadState, renderer: &Renderer) -> Vec<Intent> {
    let mut intents = kb.intents().to_vec();
    intents.extend(
        kb.clicks()
            .iter()
            .filter_map(|&(col, row)| renderer.button_at(col, row))
            .map(Intent::Steer),
    );
    if gp.connected {
        intents.extend(gp.steer_pressed().map(Intent::Steer));
        if gp.restart_pressed() {
            intents.push(Intent::Restart);
        }
    }
    intents
}
