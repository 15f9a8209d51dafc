//! Heartshot headless runner
//!
//! Plays a level with the autopilot at a fixed 60 Hz and records the
//! result in `./saves/`. The browser build enters through
//! `heartshot::platform::web` instead.
//!
//! Usage: `heartshot [level] [quality] [seed]`

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use heartshot::persistence::{FileBackend, SaveManager};
    use heartshot::sim::{GameEvent, TickInput};
    use heartshot::{Game, QualityPreset, Settings};

    /// Frame delta for the simulated 60 Hz display
    const FRAME_DT: f32 = 1.0 / 60.0;
    /// Give up after ten simulated minutes
    const MAX_FRAMES: u32 = 60 * 60 * 10;

    env_logger::init();
    log::info!("Heartshot (native) starting...");

    let mut args = std::env::args().skip(1);
    let level_id: u32 = args.next().and_then(|a| a.parse().ok()).unwrap_or(1);
    let quality = args
        .next()
        .and_then(|a| match a.parse::<QualityPreset>() {
            Ok(preset) => Some(preset),
            Err(e) => {
                log::warn!("{e}; using the saved preset");
                None
            }
        });
    let seed: u64 = args.next().and_then(|a| a.parse().ok()).unwrap_or(42);

    let backend = FileBackend::new("saves");
    let mut settings = Settings::load(&backend);
    if let Some(quality) = quality {
        settings.quality = quality;
    }
    log::info!("quality {}", settings.quality.label());

    let mut game = match Game::new(seed, settings, SaveManager::load(backend)) {
        Ok(game) => game,
        Err(e) => {
            log::error!("could not read built-in levels: {e}");
            std::process::exit(1);
        }
    };

    if !game.is_level_unlocked(level_id) {
        log::warn!("level {level_id} is still locked in this save; playing it anyway");
    }
    if let Err(e) = game.load_level(level_id) {
        log::error!("{e}");
        std::process::exit(1);
    }

    let input = TickInput {
        autopilot: true,
        ..Default::default()
    };
    for frame in 0..MAX_FRAMES {
        for event in game.frame(&input, FRAME_DT) {
            match event {
                GameEvent::LevelComplete(done) => {
                    println!(
                        "Level {} cleared in {:.1}s with {} shots: {} star(s)",
                        done.level_id, done.time, done.projectiles_fired, done.stars
                    );
                }
                GameEvent::AnimalHit { .. } | GameEvent::AnimalReverted { .. } => {
                    let session = &game.state().session;
                    log::info!(
                        "frame {frame}: {}/{} unicorns",
                        session.transformed(),
                        session.total_animals
                    );
                }
                other => log::debug!("frame {frame}: {other:?}"),
            }
        }
        if game.is_complete() {
            return;
        }
    }

    let session = &game.state().session;
    println!(
        "Gave up after {:.0}s: {} of {} animals left",
        session.elapsed, session.animals_remaining, session.total_animals
    );
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is heartshot::platform::web::start
}
