//! Game configuration
//!
//! Every tunable number the simulation reads lives here, grouped by concern.
//! Defaults come from `crate::consts`; any subset can be overridden from JSON.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::ConfigError;

/// Arena size
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldConfig {
    pub width: f32,
    pub height: f32,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            width: WORLD_W,
            height: WORLD_H,
        }
    }
}

/// Per-tick physics coefficients used by the craft integrator and projectiles
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsConfig {
    pub gravity: f32,
    pub thrust_up: f32,
    pub thrust_side: f32,
    /// Velocity multiplier applied every tick (1.0 = no drag)
    pub drag: f32,
    pub max_velocity: f32,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            gravity: GRAVITY,
            thrust_up: THRUST_UP,
            thrust_side: THRUST_SIDE,
            drag: DRAG,
            max_velocity: MAX_VELOCITY,
        }
    }
}

/// Craft hull, fuel and ammo economy
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CraftConfig {
    pub width: f32,
    pub height: f32,
    pub max_fuel: f32,
    pub fuel_burn_thrust: f32,
    pub fuel_burn_side: f32,
    pub fuel_refill_rate: f32,
    pub max_ammo: f32,
    pub ammo_refill_rate: f32,
    /// Ticks between shots
    pub shoot_cooldown: u32,
}

impl Default for CraftConfig {
    fn default() -> Self {
        Self {
            width: CRAFT_W,
            height: CRAFT_H,
            max_fuel: MAX_FUEL,
            fuel_burn_thrust: FUEL_BURN_THRUST,
            fuel_burn_side: FUEL_BURN_SIDE,
            fuel_refill_rate: FUEL_REFILL_RATE,
            max_ammo: MAX_AMMO,
            ammo_refill_rate: AMMO_REFILL_RATE,
            shoot_cooldown: SHOOT_COOLDOWN,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectileConfig {
    pub speed: f32,
    /// Edge length of the square hit box
    pub size: f32,
    /// Fraction of world gravity applied each tick
    pub gravity_scale: f32,
}

impl Default for ProjectileConfig {
    fn default() -> Self {
        Self {
            speed: PROJECTILE_SPEED,
            size: PROJECTILE_SIZE,
            gravity_scale: PROJECTILE_GRAVITY_SCALE,
        }
    }
}

/// Scrolling barrier geometry
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BarrierConfig {
    /// Left edge of the barrier column
    pub x: f32,
    pub width: f32,
    pub rows: u32,
    pub cols: u32,
    pub block_height: f32,
    pub block_hp: u8,
    /// Scroll distance per tick
    pub scroll_speed: f32,
}

impl Default for BarrierConfig {
    fn default() -> Self {
        Self {
            x: BARRIER_X,
            width: BARRIER_W,
            rows: BARRIER_ROWS,
            cols: BARRIER_COLS,
            block_height: BLOCK_H,
            block_hp: BLOCK_HP,
            scroll_speed: BARRIER_SCROLL_SPEED,
        }
    }
}

impl BarrierConfig {
    #[inline]
    pub fn block_width(&self) -> f32 {
        self.width / self.cols as f32
    }

    /// Height of the whole grid; one full scroll cycle
    #[inline]
    pub fn total_height(&self) -> f32 {
        self.rows as f32 * self.block_height
    }
}

/// Round and match flow
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RulesConfig {
    pub rounds_to_win: u32,
    /// Countdown ticks before a round goes live
    pub round_start_delay: u32,
    /// Ticks the round result stays on screen
    pub round_end_delay: u32,
}

impl Default for RulesConfig {
    fn default() -> Self {
        Self {
            rounds_to_win: ROUNDS_TO_WIN,
            round_start_delay: ROUND_START_DELAY,
            round_end_delay: ROUND_END_DELAY,
        }
    }
}

/// Complete static configuration for a match
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub world: WorldConfig,
    pub physics: PhysicsConfig,
    pub craft: CraftConfig,
    pub projectile: ProjectileConfig,
    pub barrier: BarrierConfig,
    pub rules: RulesConfig,
}

impl GameConfig {
    /// Parse and validate a JSON document. Missing fields keep their defaults.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        if let Err(e) = config.validate() {
            log::warn!("Rejected config: {}", e);
            return Err(e);
        }
        Ok(config)
    }

    /// Load, parse and validate a JSON config file
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let config = Self::from_json_str(&json)?;
        log::info!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Reject values the simulation cannot run with
    pub fn validate(&self) -> Result<(), ConfigError> {
        let positive = |field: &'static str, value: f32| {
            if value > 0.0 && value.is_finite() {
                Ok(())
            } else {
                Err(ConfigError::invalid(
                    field,
                    format!("must be > 0, got {value}"),
                ))
            }
        };

        positive("world.width", self.world.width)?;
        positive("world.height", self.world.height)?;
        positive("craft.width", self.craft.width)?;
        positive("craft.height", self.craft.height)?;
        positive("craft.max_fuel", self.craft.max_fuel)?;
        positive("craft.max_ammo", self.craft.max_ammo)?;
        positive("projectile.size", self.projectile.size)?;
        positive("barrier.width", self.barrier.width)?;
        positive("barrier.block_height", self.barrier.block_height)?;

        if !(self.physics.drag > 0.0 && self.physics.drag <= 1.0) {
            return Err(ConfigError::invalid(
                "physics.drag",
                format!("must be in (0, 1], got {}", self.physics.drag),
            ));
        }
        if self.barrier.rows == 0 || self.barrier.cols == 0 {
            return Err(ConfigError::invalid(
                "barrier",
                "rows and cols must be non-zero",
            ));
        }
        if self.barrier.block_hp == 0 {
            return Err(ConfigError::invalid(
                "barrier.block_hp",
                "must be at least 1",
            ));
        }
        if !(self.barrier.scroll_speed >= 0.0 && self.barrier.scroll_speed.is_finite()) {
            return Err(ConfigError::invalid(
                "barrier.scroll_speed",
                format!("must be >= 0, got {}", self.barrier.scroll_speed),
            ));
        }
        if self.barrier.x < 0.0 || self.barrier.x + self.barrier.width > self.world.width {
            return Err(ConfigError::invalid(
                "barrier.x",
                "barrier column must lie inside the world",
            ));
        }
        if self.barrier.total_height() < self.world.height {
            return Err(ConfigError::invalid(
                "barrier.rows",
                format!(
                    "grid height {} is shorter than the world height {}",
                    self.barrier.total_height(),
                    self.world.height
                ),
            ));
        }
        if self.rules.rounds_to_win == 0 {
            return Err(ConfigError::invalid(
                "rules.rounds_to_win",
                "must be at least 1",
            ));
        }

        Ok(())
    }
}
