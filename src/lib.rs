//! Taxi Duel - two-player Space Taxi arena battle
//!
//! Core modules:
//! - `sim`: Fixed-step simulation (barrier, projectiles, craft, round/match flow)
//! - `config`: Typed, validated game configuration
//! - `settings`: Presentation preferences that shape feedback output
//! - `error`: Configuration error type

pub mod config;
pub mod error;
pub mod settings;
pub mod sim;

pub use config::GameConfig;
pub use error::ConfigError;
pub use settings::{QualityPreset, Settings};

/// Default game constants (every one of these can be overridden via `GameConfig`)
pub mod consts {
    /// Arena dimensions
    pub const WORLD_W: f32 = 800.0;
    pub const WORLD_H: f32 = 600.0;

    /// Craft hull size
    pub const CRAFT_W: f32 = 30.0;
    pub const CRAFT_H: f32 = 16.0;

    /// Physics (per tick)
    pub const GRAVITY: f32 = 0.06;
    pub const THRUST_UP: f32 = 0.2;
    pub const THRUST_SIDE: f32 = 0.15;
    pub const MAX_VELOCITY: f32 = 8.0;
    pub const DRAG: f32 = 0.98;

    /// Fuel
    pub const MAX_FUEL: f32 = 100.0;
    pub const FUEL_BURN_THRUST: f32 = 0.15;
    pub const FUEL_BURN_SIDE: f32 = 0.06;
    pub const FUEL_REFILL_RATE: f32 = 1.5;

    /// Ammo (~1 round per second while parked on an ammo pad)
    pub const MAX_AMMO: f32 = 15.0;
    pub const AMMO_REFILL_RATE: f32 = 0.015;
    /// Ticks between shots
    pub const SHOOT_COOLDOWN: u32 = 15;

    /// Projectiles
    pub const PROJECTILE_SPEED: f32 = 12.0;
    pub const PROJECTILE_SIZE: f32 = 6.0;
    /// Fraction of world gravity applied to projectiles
    pub const PROJECTILE_GRAVITY_SCALE: f32 = 0.1;

    /// Barrier column, centred in the arena
    pub const BARRIER_X: f32 = 375.0;
    pub const BARRIER_W: f32 = 50.0;
    pub const BARRIER_COLS: u32 = 4;
    pub const BARRIER_ROWS: u32 = 24;
    pub const BLOCK_H: f32 = 25.0;
    pub const BLOCK_HP: u8 = 2;
    pub const BARRIER_SCROLL_SPEED: f32 = 1.0;

    /// Match flow (ticks)
    pub const ROUNDS_TO_WIN: u32 = 3;
    pub const ROUND_START_DELAY: u32 = 90;
    pub const ROUND_END_DELAY: u32 = 60;

    /// Floor (fuel pads either side of the barrier) and ceiling
    pub const FLOOR_Y: f32 = 570.0;
    pub const CEILING_H: f32 = 30.0;

    /// Ammo pads on the side walls
    pub const AMMO_PAD_Y: f32 = 280.0;
    pub const AMMO_PAD_W: f32 = 80.0;
    pub const AMMO_PAD_H: f32 = 15.0;
    pub const AMMO_PAD_MARGIN: f32 = 20.0;

    /// Spawn points
    pub const SPAWN_P1: (f32, f32) = (100.0, 150.0);
    pub const SPAWN_P2: (f32, f32) = (700.0, 150.0);
}
