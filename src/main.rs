/// Entry point and game loop.

mod config;
mod domain;
mod sim;
mod ui;

use std::fs::File;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use log::{debug, error, info};
use rand::rngs::StdRng;
use rand::SeedableRng;

use config::GameConfig;
use domain::entity::Direction;
use sim::event::GameEvent;
use sim::step;
use sim::world::{Phase, WorldState};
use ui::gamepad::GamepadState;
use ui::input::InputState;
use ui::renderer::Renderer;

const FRAME_SLEEP: Duration = Duration::from_millis(5);

/// Log file used when `BURROW_LOG` is unset.
const DEFAULT_LOG_FILE: &str = "burrow.log";

fn main() -> Result<()> {
    init_logging();

    let config = GameConfig::load();
    info!("speed settings: {:?}", config.speed);
    let mut rng = match config.seed {
        Some(seed) => {
            info!("enemy AI seeded with {seed}");
            StdRng::seed_from_u64(seed)
        }
        None => StdRng::from_os_rng(),
    };

    let mut world = WorldState::new(config.speed.clone());
    let mut renderer = Renderer::new();

    // Init can fail after raw mode is on, so cleanup runs regardless.
    let result = renderer.init()
        .context("terminal init failed")
        .and_then(|()| game_loop(&mut world, &mut renderer, &mut rng, &config));
    let cleanup = renderer.cleanup().context("terminal cleanup failed");
    first_error(result, cleanup)?;

    println!();
    println!("Thanks for playing Burrow!");
    println!("Dirt dug: {}", world.player.dirt_dug);
    Ok(())
}

/// The game error wins over a cleanup error; the loser is logged.
fn first_error(result: Result<()>, cleanup: Result<()>) -> Result<()> {
    match (result, cleanup) {
        (Err(e), Err(c)) => {
            error!("{c:#}");
            Err(e)
        }
        (Err(e), Ok(())) | (Ok(()), Err(e)) => Err(e),
        (Ok(()), Ok(())) => Ok(()),
    }
}

/// The terminal belongs to the renderer, so log records go to a file.
/// Filter comes from `RUST_LOG` (default `info`).
fn init_logging() {
    let path = std::env::var("BURROW_LOG").unwrap_or_else(|_| DEFAULT_LOG_FILE.to_string());
    let file = match File::create(&path) {
        Ok(f) => f,
        Err(_) => return,
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Pipe(Box::new(file)))
        .init();
}

fn game_loop(
    world: &mut WorldState,
    renderer: &mut Renderer,
    rng: &mut StdRng,
    config: &GameConfig,
) -> Result<()> {
    let mut kb = InputState::new();
    kb.honor_release = renderer.keyboard_enhanced;
    let mut gp = GamepadState::new(&config.gamepad);
    debug!("gamepad connected at startup: {}", gp.connected);
    let mut last_tick = Instant::now();
    let tick_rate = Duration::from_millis(config.speed.tick_rate_ms);

    // Latches a direction pressed between ticks so short taps still count.
    let mut pending_move: Option<Direction> = None;

    loop {
        kb.drain_events();
        gp.update();

        if handle_meta(world, &kb, &gp) {
            break;
        }

        if world.phase == Phase::Playing && !world.paused {
            if let Some(dir) = detect_movement(&kb, &gp) {
                pending_move = Some(dir);
            }
        }

        if last_tick.elapsed() >= tick_rate {
            let movement = pending_move.take().or_else(|| detect_movement(&kb, &gp));
            let events = step::step(world, movement, rng);
            process_events(world, &events);
            world.tick_message();
            last_tick = Instant::now();
        }

        renderer.render(world).context("render failed")?;
        std::thread::sleep(FRAME_SLEEP);
    }

    info!("quit on tick {}, {} dirt dug", world.tick, world.player.dirt_dug);
    Ok(())
}

fn detect_movement(kb: &InputState, gp: &GamepadState) -> Option<Direction> {
    kb.movement().or_else(|| gp.movement())
}

/// Quit, pause and restart. Returns true when the player quits.
fn handle_meta(world: &mut WorldState, kb: &InputState, gp: &GamepadState) -> bool {
    if kb.quit_pressed() || gp.cancel_pressed() {
        return true;
    }

    match world.phase {
        Phase::Playing => {
            if kb.pause_pressed() || gp.pause_pressed() {
                world.paused = !world.paused;
                if world.paused {
                    world.set_message("PAUSED", 0);
                } else {
                    world.message.clear();
                }
                debug!("paused: {}", world.paused);
            }
        }
        Phase::GameOver => {
            if kb.restart_pressed() || gp.confirm_pressed() {
                info!("restart after {} ticks", world.tick);
                world.restart();
                world.set_message("Dig!", 90);
            }
        }
    }
    false
}

fn process_events(world: &mut WorldState, events: &[GameEvent]) {
    for ev in events {
        match *ev {
            GameEvent::Dug { col, row } => {
                debug!("dug ({col}, {row}), total {}", world.player.dirt_dug);
            }
            GameEvent::PlayerCaught { enemy } => {
                let kind = world.enemies.get(enemy).map(|e| e.kind);
                info!("game over: caught by {kind:?} (enemy {enemy})");
                world.set_message("Hit by enemy!! Game over!", 0);
            }
        }
    }
}
