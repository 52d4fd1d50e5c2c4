/// Entry point and frame loop.

mod config;
mod domain;
mod sim;
mod ui;

use std::fs::File;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use log::{debug, error, info};
use simplelog::{LevelFilter, WriteLogger};

use config::{GameConfig, LogConfig};
use sim::event::GameEvent;
use sim::session::Session;
use ui::gamepad::GamepadState;
use ui::input::InputState;
use ui::renderer::Renderer;
use ui::sound::SoundEngine;

const FRAME_SLEEP: Duration = Duration::from_millis(5);

fn main() {
    let config = GameConfig::load();
    init_logging(&config.log);
    info!(
        "starting: tick {} ms, grid marks {}, sound {}",
        config.speed.tick_rate_ms, config.display.grid, config.sound.enabled,
    );

    let mut session = Session::new();
    let mut renderer = Renderer::new(config.display.grid);

    if let Err(e) = renderer.init() {
        error!("terminal init failed: {e}");
        eprintln!("Terminal init failed: {e}");
        let _ = renderer.cleanup();
        return;
    }

    let sound = if config.sound.enabled { SoundEngine::new() } else { None };

    let result = game_loop(&mut session, &mut renderer, sound.as_ref(), &config);

    if let Err(e) = renderer.cleanup() {
        eprintln!("Terminal cleanup failed: {e}");
    }

    if let Err(e) = result {
        error!("game loop aborted: {e:#}");
        eprintln!("Game error: {e:#}");
    }

    info!("exit with score {} (best {})", session.score(), session.best_score());
    println!("Final score: {}", session.score());
}

/// Log to a file: the terminal belongs to the renderer while playing.
fn init_logging(cfg: &LogConfig) {
    if cfg.level == LevelFilter::Off {
        return;
    }
    match File::create(&cfg.file) {
        Ok(file) => {
            if let Err(e) = WriteLogger::init(cfg.level, simplelog::Config::default(), file) {
                eprintln!("Warning: logger init failed: {e}");
            }
        }
        Err(e) => {
            eprintln!("Warning: could not create log file {}: {e}", cfg.file.display());
        }
    }
}

/// Poll input, apply signals, tick when due, draw. Returns when the
/// player quits.
fn game_loop(
    session: &mut Session,
    renderer: &mut Renderer,
    sound: Option<&SoundEngine>,
    config: &GameConfig,
) -> Result<()> {
    let mut kb = InputState::new();
    let mut gp = GamepadState::new();
    gp.load_button_config(&config.gamepad);
    let tick_rate = Duration::from_millis(config.speed.tick_rate_ms);
    let mut last_tick = Instant::now();
    let mut events: Vec<GameEvent> = Vec::new();

    loop {
        events.clear();
        kb.drain_events();
        gp.update();

        let pad_signals = gp.signals();
        for &signal in kb.signals().iter().chain(pad_signals.iter()) {
            if session.handle_signal(signal, &mut events) {
                info!("quit requested");
                return Ok(());
            }
        }

        if last_tick.elapsed() >= tick_rate {
            events.extend(session.tick());
            last_tick = Instant::now();
        }

        process_events(sound, &events);

        renderer
            .render(session, gp.connected)
            .context("failed to draw frame")?;
        std::thread::sleep(FRAME_SLEEP);
    }
}

fn process_events(sound: Option<&SoundEngine>, events: &[GameEvent]) {
    for event in events {
        match event {
            GameEvent::FoodEaten { at, score } => {
                debug!("food eaten at ({}, {}), score {score}", at.x, at.y);
            }
            GameEvent::FoodPlaced { at } => debug!("food placed at ({}, {})", at.x, at.y),
            GameEvent::Crashed { cause, score } => info!("game over ({cause:?}), score {score}"),
            GameEvent::BoardFilled { score } => info!("board filled, score {score}"),
            GameEvent::Paused => debug!("paused"),
            GameEvent::Resumed => debug!("resumed"),
            GameEvent::Restarted => info!("restarted"),
        }

        let sfx = match sound {
            Some(s) => s,
            None => continue,
        };
        match event {
            GameEvent::FoodEaten { .. } => sfx.play_eat(),
            GameEvent::Crashed { .. } => sfx.play_crash(),
            GameEvent::BoardFilled { .. } => sfx.play_win(),
            GameEvent::Paused => sfx.play_pause(),
            GameEvent::Resumed => sfx.play_resume(),
            GameEvent::FoodPlaced { .. } | GameEvent::Restarted => {}
        }
    }
}
