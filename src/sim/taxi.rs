//! Reference craft: the Space Taxi
//!
//! A thrust-and-gravity lander. Outside the barrier column the arena has a
//! solid ceiling and a floor of fuel pads; inside the column the craft can
//! fly off one edge and reappear at the other. Two ammo pads sit on the side
//! walls and are solid from every direction.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::craft::{Craft, CraftInput, Platform, PlayerId, ProjectileSpawn};
use super::rect::Rect;
use crate::config::{BarrierConfig, CraftConfig, GameConfig, PhysicsConfig, WorldConfig};
use crate::consts::{
    AMMO_PAD_H, AMMO_PAD_MARGIN, AMMO_PAD_W, AMMO_PAD_Y, CEILING_H, FLOOR_Y, SPAWN_P1, SPAWN_P2,
};

/// Touchdown limits
const SAFE_LANDING_SPEED: f32 = 4.0;
const SAFE_LANDING_ANGLE: f32 = 0.4;
/// Vertical slack for "resting on top of an ammo pad"
const PAD_CONTACT_TOLERANCE: f32 = 2.0;
/// Speed kept after bouncing off a solid surface
const BOUNCE: f32 = 0.3;
const MAX_TILT: f32 = 0.3;
/// Fraction of the craft's vertical velocity a shot inherits
const SHOT_INHERIT: f32 = 0.3;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Taxi {
    pub id: PlayerId,
    pub spawn: Vec2,
    pub pos: Vec2,
    pub vel: Vec2,
    /// Visual tilt in radians; also gates safe landings
    pub angle: f32,
    pub fuel: f32,
    pub ammo: f32,
    pub alive: bool,
    pub thrusting: bool,
    pub shoot_cooldown: u32,
    world: WorldConfig,
    physics: PhysicsConfig,
    hull: CraftConfig,
    barrier: BarrierConfig,
    projectile_speed: f32,
}

impl Taxi {
    pub fn new(id: PlayerId, config: &GameConfig) -> Self {
        let (x, y) = match id {
            PlayerId::One => SPAWN_P1,
            PlayerId::Two => SPAWN_P2,
        };
        let mut taxi = Self {
            id,
            spawn: Vec2::new(x, y),
            pos: Vec2::ZERO,
            vel: Vec2::ZERO,
            angle: 0.0,
            fuel: 0.0,
            ammo: 0.0,
            alive: true,
            thrusting: false,
            shoot_cooldown: 0,
            world: config.world,
            physics: config.physics,
            hull: config.craft,
            barrier: config.barrier,
            projectile_speed: config.projectile.speed,
        };
        taxi.reset();
        taxi
    }

    /// Inside the barrier column, where vertical wrap replaces floor and ceiling
    fn in_wrap_zone(&self) -> bool {
        self.pos.x >= self.barrier.x && self.pos.x <= self.barrier.x + self.barrier.width
    }

    fn ammo_pads(&self) -> [Rect; 2] {
        [
            Rect::new(AMMO_PAD_MARGIN, AMMO_PAD_Y, AMMO_PAD_W, AMMO_PAD_H),
            Rect::new(
                self.world.width - AMMO_PAD_MARGIN - AMMO_PAD_W,
                AMMO_PAD_Y,
                AMMO_PAD_W,
                AMMO_PAD_H,
            ),
        ]
    }

    fn apply_thrust(&mut self, input: &CraftInput) {
        if self.fuel <= 0.0 {
            self.angle *= 0.95;
            return;
        }
        if input.up {
            self.vel.y -= self.physics.thrust_up;
            self.fuel -= self.hull.fuel_burn_thrust;
            self.thrusting = true;
        }
        if input.left {
            self.vel.x -= self.physics.thrust_side;
            self.fuel -= self.hull.fuel_burn_side;
            self.angle = (self.angle - 0.05).max(-MAX_TILT);
            self.thrusting = true;
        } else if input.right {
            self.vel.x += self.physics.thrust_side;
            self.fuel -= self.hull.fuel_burn_side;
            self.angle = (self.angle + 0.05).min(MAX_TILT);
            self.thrusting = true;
        } else {
            self.angle *= 0.9;
        }
    }

    fn confine(&mut self) {
        let half = Vec2::new(self.hull.width, self.hull.height) / 2.0;

        if self.in_wrap_zone() {
            if self.pos.y > self.world.height + self.hull.height {
                self.pos.y = -self.hull.height;
            } else if self.pos.y < -self.hull.height {
                self.pos.y = self.world.height + self.hull.height;
            }
        } else if self.pos.y - half.y < CEILING_H {
            self.pos.y = CEILING_H + half.y;
            self.vel.y = self.vel.y.abs() * BOUNCE;
        }

        if self.pos.x < half.x {
            self.pos.x = half.x;
            self.vel.x = 0.0;
        } else if self.pos.x > self.world.width - half.x {
            self.pos.x = self.world.width - half.x;
            self.vel.x = 0.0;
        }
    }

    /// Ammo pads are solid: push out along the axis of least overlap
    fn push_out_of_pads(&mut self) {
        for pad in self.ammo_pads() {
            let hull = self.bounding_box();
            if !hull.overlaps(&pad) {
                continue;
            }
            let overlap_left = hull.right() - pad.x;
            let overlap_right = pad.right() - hull.x;
            let overlap_top = hull.bottom() - pad.y;
            let overlap_bottom = pad.bottom() - hull.y;

            if overlap_top.min(overlap_bottom) < overlap_left.min(overlap_right) {
                if overlap_top < overlap_bottom {
                    // Resting on top; landing itself is decided by check_platform_collision
                    self.pos.y = pad.y - self.hull.height / 2.0;
                } else {
                    self.pos.y = pad.bottom() + self.hull.height / 2.0;
                    if self.vel.y < 0.0 {
                        self.vel.y = self.vel.y.abs() * BOUNCE;
                    }
                }
            } else if overlap_left < overlap_right {
                self.pos.x = pad.x - self.hull.width / 2.0;
                self.vel.x = -self.vel.x.abs() * BOUNCE;
            } else {
                self.pos.x = pad.right() + self.hull.width / 2.0;
                self.vel.x = self.vel.x.abs() * BOUNCE;
            }
        }
    }

    fn can_touch_down(&self) -> bool {
        self.vel.length() < SAFE_LANDING_SPEED
            && self.angle.abs() < SAFE_LANDING_ANGLE
            && self.vel.y >= 0.0
    }

    fn touch_down(&mut self, surface_y: f32) {
        self.pos.y = surface_y - self.hull.height / 2.0;
        self.vel.y = 0.0;
        self.vel.x *= 0.5;
        self.angle = 0.0;
    }
}

impl Craft for Taxi {
    fn id(&self) -> PlayerId {
        self.id
    }

    fn position(&self) -> Vec2 {
        self.pos
    }

    fn velocity(&self) -> Vec2 {
        self.vel
    }

    fn is_alive(&self) -> bool {
        self.alive
    }

    fn is_thrusting(&self) -> bool {
        self.thrusting
    }

    fn fuel(&self) -> f32 {
        self.fuel
    }

    fn ammo(&self) -> f32 {
        self.ammo
    }

    fn max_ammo(&self) -> f32 {
        self.hull.max_ammo
    }

    fn update(&mut self, input: &CraftInput) {
        if !self.alive {
            return;
        }

        self.thrusting = false;
        self.apply_thrust(input);

        self.vel.y += self.physics.gravity;
        self.vel *= self.physics.drag;
        self.vel = self.vel.clamp_length_max(self.physics.max_velocity);
        self.pos += self.vel;

        self.confine();
        self.push_out_of_pads();

        self.shoot_cooldown = self.shoot_cooldown.saturating_sub(1);
        self.fuel = self.fuel.clamp(0.0, self.hull.max_fuel);
    }

    fn reset(&mut self) {
        self.pos = self.spawn;
        self.vel = Vec2::ZERO;
        self.angle = 0.0;
        self.fuel = self.hull.max_fuel;
        self.ammo = self.hull.max_ammo;
        self.alive = true;
        self.thrusting = false;
        self.shoot_cooldown = 0;
    }

    fn die(&mut self) {
        self.alive = false;
    }

    fn can_shoot(&self) -> bool {
        self.alive && self.ammo >= 1.0 && self.shoot_cooldown == 0
    }

    fn shoot(&mut self) -> Option<ProjectileSpawn> {
        if !self.can_shoot() {
            return None;
        }
        self.ammo -= 1.0;
        self.shoot_cooldown = self.hull.shoot_cooldown;

        // Always fire toward the opponent's half
        let direction = if self.pos.x < self.world.width / 2.0 { 1.0 } else { -1.0 };
        Some(ProjectileSpawn {
            pos: Vec2::new(self.pos.x + direction * self.hull.width / 2.0, self.pos.y),
            vel: Vec2::new(direction * self.projectile_speed, self.vel.y * SHOT_INHERIT),
            owner: self.id,
        })
    }

    fn check_platform_collision(&mut self) -> Option<Platform> {
        if !self.alive {
            return None;
        }
        let mut landed = None;

        if !self.in_wrap_zone() && self.pos.y + self.hull.height / 2.0 >= FLOOR_Y {
            if self.can_touch_down() {
                self.touch_down(FLOOR_Y);
                landed = Some(Platform::Fuel);
            } else if self.vel.length() >= SAFE_LANDING_SPEED {
                return Some(Platform::Crash);
            }
        }

        for pad in self.ammo_pads() {
            let over_pad = self.pos.x + self.hull.width / 2.0 > pad.x
                && self.pos.x - self.hull.width / 2.0 < pad.right();
            let on_top =
                ((self.pos.y + self.hull.height / 2.0) - pad.y).abs() <= PAD_CONTACT_TOLERANCE;
            if over_pad && on_top && self.can_touch_down() {
                self.touch_down(pad.y);
                landed = Some(Platform::Ammo);
            }
        }

        landed
    }

    fn refuel(&mut self, rate: f32) -> bool {
        let before = self.fuel;
        self.fuel = (self.fuel + rate).min(self.hull.max_fuel);
        self.fuel > before
    }

    fn reload(&mut self, rate: f32) -> bool {
        let before = self.ammo;
        self.ammo = (self.ammo + rate).min(self.hull.max_ammo);
        self.ammo > before
    }

    fn bounding_box(&self) -> Rect {
        Rect::centered(self.pos, self.hull.width, self.hull.height)
    }
}
