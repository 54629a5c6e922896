//! Taxi Duel headless runner
//!
//! Plays one scripted match without a window and prints the final snapshot as
//! JSON. Usage: `taxi-duel [config.json] [seed]`.

#[cfg(not(target_arch = "wasm32"))]
use taxi_duel::sim::{Arena, Craft, CraftInput, PlayerId, RoundState, TickInput, tick};
#[cfg(not(target_arch = "wasm32"))]
use taxi_duel::{ConfigError, GameConfig, Settings};

/// Stop a stalemate match after this many ticks (five minutes at 60 Hz)
#[cfg(not(target_arch = "wasm32"))]
const MAX_TICKS: u64 = 60 * 60 * 5;

/// Autopilot: hold an altitude that drifts over time and fire whenever loaded.
#[cfg(not(target_arch = "wasm32"))]
fn autopilot<C: Craft>(craft: &C, time_ticks: u64) -> CraftInput {
    let phase = time_ticks as f32 / 90.0 + craft.id().index() as f32 * 1.7;
    let target_y = 300.0 + phase.sin() * 180.0;
    let pos = craft.position();
    let vel = craft.velocity();

    CraftInput {
        up: pos.y + vel.y * 10.0 > target_y,
        left: false,
        right: false,
        shoot: craft.can_shoot(),
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() -> Result<(), ConfigError> {
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let config = match args.next() {
        Some(path) => GameConfig::from_path(path)?,
        None => GameConfig::default(),
    };
    let seed = args
        .next()
        .and_then(|s| s.parse::<u64>().ok())
        .unwrap_or(0x5eed);

    log::info!("Taxi Duel (headless) starting, seed {:#x}", seed);

    let mut arena = Arena::new(config, Settings::default(), seed);
    tick(
        &mut arena,
        &TickInput {
            start: true,
            ..Default::default()
        },
    );

    while arena.state.round_state != RoundState::MatchEnd {
        if arena.time_ticks >= MAX_TICKS {
            log::warn!("Tick limit reached with score {:?}", arena.state.score);
            break;
        }

        let mut input = TickInput::default();
        for id in PlayerId::ALL {
            input.crafts[id.index()] = autopilot(arena.craft(id), arena.time_ticks);
        }
        tick(&mut arena, &input);

        for event in arena.events() {
            log::debug!("tick {}: {:?}", arena.time_ticks, event);
        }
    }

    log::info!(
        "Finished after {} ticks, score {}-{}",
        arena.time_ticks,
        arena.state.score[0],
        arena.state.score[1]
    );
    println!("{}", serde_json::to_string(&arena.snapshot())?);
    Ok(())
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // The library is embedded by a host; there is no wasm binary entry point
}
