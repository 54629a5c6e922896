//! The contract between the simulation core and a craft integrator
//!
//! A craft owns its own movement, fuel and ammo bookkeeping. The core only
//! drives it through the `Craft` trait: one `update` per live tick, `reset`
//! per round, `die` on a fatal collision, and the shoot/platform queries.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::rect::Rect;

/// Which side of the duel a craft (or a projectile's owner) belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PlayerId {
    One,
    Two,
}

impl PlayerId {
    pub const ALL: [PlayerId; 2] = [PlayerId::One, PlayerId::Two];

    /// Score/array slot (0 or 1)
    #[inline]
    pub fn index(self) -> usize {
        match self {
            PlayerId::One => 0,
            PlayerId::Two => 1,
        }
    }
}

/// Control state for one craft, stable for the duration of a tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CraftInput {
    pub up: bool,
    pub left: bool,
    pub right: bool,
    pub shoot: bool,
}

/// What a craft is touching after its movement step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Platform {
    /// Landed on a fuel pad
    Fuel,
    /// Landed on an ammo pad
    Ammo,
    /// Hit the floor too fast
    Crash,
}

/// Launch parameters produced by `Craft::shoot`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProjectileSpawn {
    pub pos: Vec2,
    pub vel: Vec2,
    pub owner: PlayerId,
}

pub trait Craft {
    fn id(&self) -> PlayerId;
    /// Hull centre in screen space
    fn position(&self) -> Vec2;
    fn velocity(&self) -> Vec2;
    fn is_alive(&self) -> bool;
    /// True if any thruster fired during the last `update`
    fn is_thrusting(&self) -> bool;
    fn fuel(&self) -> f32;
    fn ammo(&self) -> f32;
    fn max_ammo(&self) -> f32;

    /// Integrate one tick of movement from input. No-op when dead.
    fn update(&mut self, input: &CraftInput);
    /// Back to spawn with full fuel and ammo
    fn reset(&mut self);
    fn die(&mut self);

    fn can_shoot(&self) -> bool;
    /// Spend one round; `None` when the craft cannot shoot right now
    fn shoot(&mut self) -> Option<ProjectileSpawn>;

    /// Landing/crash check after `update`. `None` means nothing to act on.
    fn check_platform_collision(&mut self) -> Option<Platform>;
    /// Returns true if fuel actually increased
    fn refuel(&mut self, rate: f32) -> bool;
    /// Returns true if ammo actually increased
    fn reload(&mut self, rate: f32) -> bool;

    fn bounding_box(&self) -> Rect;
}
