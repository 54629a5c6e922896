//! Cosmetic feedback: particles and screen shake
//!
//! Nothing here influences gameplay. The renderer reads it once per frame.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::settings::Settings;

/// Particle rendering style
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ParticleKind {
    Spark,
    Rock,
    Dust,
    Thrust,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Particle {
    pub pos: Vec2,
    pub vel: Vec2,
    /// 0xRRGGBB
    pub color: u32,
    /// 1.0 at birth, removed at 0
    pub life: f32,
    /// Life lost per tick
    pub decay: f32,
    pub size: f32,
    pub kind: ParticleKind,
}

const EXPLOSION_PARTICLES: usize = 40;
const EXPLOSION_COLORS: [u32; 2] = [0xff5500, 0xffffaa];
const EXPLOSION_SHAKE: f32 = 20.0;

const ROCK_COLORS: [u32; 6] = [0x8b7355, 0x6b5344, 0x5a4a3a, 0x7a6a5a, 0x9a8a7a, 0x4a3a2a];
const DUST_PARTICLES: usize = 10;
const DUST_COLOR: u32 = 0xaa9988;
/// Debris counts are tuned for a block of this radius
const DEBRIS_REFERENCE_RADIUS: f32 = 25.0;

const THRUST_COLOR: u32 = 0xffff55;
const RECOIL_SHAKE: f32 = 4.0;

const SHAKE_DECAY: f32 = 0.9;
const DIRECTIONAL_SHAKE_DECAY: f32 = 0.85;

/// Particle buffer plus screen shake state
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Effects {
    pub particles: Vec<Particle>,
    /// Omnidirectional shake intensity
    pub shake: f32,
    /// Directional shake offsets
    pub shake_x: f32,
    pub shake_y: f32,
    max_particles: usize,
    shake_enabled: bool,
}

impl Effects {
    pub fn new(settings: &Settings) -> Self {
        Self {
            particles: Vec::new(),
            shake: 0.0,
            shake_x: 0.0,
            shake_y: 0.0,
            max_particles: settings.max_particles(),
            shake_enabled: settings.effective_screen_shake(),
        }
    }

    /// Drop all particles and zero every shake component
    pub fn clear(&mut self) {
        self.particles.clear();
        self.shake = 0.0;
        self.shake_x = 0.0;
        self.shake_y = 0.0;
    }

    /// Keep the newest particles when over budget
    fn enforce_cap(&mut self) {
        if self.particles.len() > self.max_particles {
            let excess = self.particles.len() - self.max_particles;
            self.particles.drain(..excess);
        }
    }

    /// Fireball burst for a destroyed craft, with a hard shake
    pub fn explosion(&mut self, rng: &mut impl Rng, at: Vec2) {
        for i in 0..EXPLOSION_PARTICLES {
            self.particles.push(Particle {
                pos: at,
                vel: Vec2::new(
                    (rng.random::<f32>() - 0.5) * 12.0,
                    (rng.random::<f32>() - 0.5) * 12.0,
                ),
                color: EXPLOSION_COLORS[i % 2],
                life: 1.0,
                decay: 0.01 + rng.random::<f32>() * 0.02,
                size: 2.0 + rng.random::<f32>() * 4.0,
                kind: ParticleKind::Spark,
            });
        }
        self.enforce_cap();
        if self.shake_enabled {
            self.shake = EXPLOSION_SHAKE;
        }
    }

    /// Rock chips for a block hit. A killing hit throws more, faster debris
    /// plus a dust cloud and a small shake.
    pub fn debris(&mut self, rng: &mut impl Rng, at: Vec2, radius: f32, destroyed: bool) {
        let base = if destroyed { 20.0 } else { 8.0 };
        let count = (base * (radius / DEBRIS_REFERENCE_RADIUS)).floor() as usize;

        for _ in 0..count {
            let angle = rng.random::<f32>() * std::f32::consts::TAU;
            let speed = if destroyed {
                2.0 + rng.random::<f32>() * 6.0
            } else {
                1.0 + rng.random::<f32>() * 3.0
            };
            let size = if destroyed {
                2.0 + rng.random::<f32>() * 5.0
            } else {
                1.0 + rng.random::<f32>() * 3.0
            };
            self.particles.push(Particle {
                pos: at
                    + Vec2::new(
                        (rng.random::<f32>() - 0.5) * radius,
                        (rng.random::<f32>() - 0.5) * radius,
                    ),
                vel: Vec2::new(angle.cos(), angle.sin()) * speed,
                color: ROCK_COLORS[rng.random_range(0..ROCK_COLORS.len())],
                life: 1.0,
                decay: if destroyed { 0.015 } else { 0.03 },
                size,
                kind: ParticleKind::Rock,
            });
        }

        if destroyed {
            for _ in 0..DUST_PARTICLES {
                self.particles.push(Particle {
                    pos: at
                        + Vec2::new(
                            (rng.random::<f32>() - 0.5) * radius * 0.5,
                            (rng.random::<f32>() - 0.5) * radius * 0.5,
                        ),
                    vel: Vec2::new(
                        (rng.random::<f32>() - 0.5) * 2.0,
                        (rng.random::<f32>() - 0.5) * 2.0,
                    ),
                    color: DUST_COLOR,
                    life: 0.8,
                    decay: 0.02,
                    size: 6.0 + rng.random::<f32>() * 8.0,
                    kind: ParticleKind::Dust,
                });
            }
            if self.shake_enabled {
                self.shake = self.shake.max(radius * 0.2);
            }
        }
        self.enforce_cap();
    }

    /// One exhaust puff below a thrusting craft
    pub fn thrust(&mut self, rng: &mut impl Rng, at: Vec2) {
        self.particles.push(Particle {
            pos: at,
            vel: Vec2::new(
                (rng.random::<f32>() - 0.5) * 2.0,
                rng.random::<f32>() * 3.0 + 1.0,
            ),
            color: THRUST_COLOR,
            life: 1.0,
            decay: 0.05,
            size: 3.0,
            kind: ParticleKind::Thrust,
        });
        self.enforce_cap();
    }

    /// Kick the view away from the direction of fire (`direction` is ±1)
    pub fn recoil(&mut self, rng: &mut impl Rng, direction: f32) {
        if !self.shake_enabled {
            return;
        }
        self.shake_x += direction * RECOIL_SHAKE;
        self.shake_y += (rng.random::<f32>() - 0.5) * 2.0;
    }

    /// Advance particles and decay shake. Runs every tick in every state.
    pub fn update(&mut self) {
        for particle in &mut self.particles {
            particle.pos += particle.vel;
            particle.life -= particle.decay;
        }
        self.particles.retain(|p| p.life > 0.0);

        if self.shake > 0.0 {
            self.shake *= SHAKE_DECAY;
            if self.shake < 0.01 {
                self.shake = 0.0;
            }
        }
        self.shake_x *= DIRECTIONAL_SHAKE_DECAY;
        self.shake_y *= DIRECTIONAL_SHAKE_DECAY;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn effects() -> Effects {
        Effects::new(&Settings::default())
    }

    #[test]
    fn test_explosion_burst() {
        let mut rng = Pcg32::seed_from_u64(7);
        let mut fx = effects();
        fx.explosion(&mut rng, Vec2::new(10.0, 20.0));
        assert_eq!(fx.particles.len(), 40);
        assert_eq!(fx.shake, 20.0);
        assert!(fx.particles.iter().all(|p| p.pos == Vec2::new(10.0, 20.0)));
        assert!(fx.particles.iter().all(|p| p.vel.x.abs() <= 6.0 && p.vel.y.abs() <= 6.0));
    }

    #[test]
    fn test_destroying_hit_gives_more_feedback() {
        let mut rng = Pcg32::seed_from_u64(7);
        let mut chip = effects();
        chip.debris(&mut rng, Vec2::ZERO, 12.5, false);
        assert_eq!(chip.particles.len(), 4);
        assert_eq!(chip.shake, 0.0);

        let mut kill = effects();
        kill.debris(&mut rng, Vec2::ZERO, 12.5, true);
        let dust = kill
            .particles
            .iter()
            .filter(|p| p.kind == ParticleKind::Dust)
            .count();
        assert_eq!(dust, 10);
        assert_eq!(kill.particles.len(), 10 + 10);
        assert!((kill.shake - 2.5).abs() < 1e-6);
    }

    #[test]
    fn test_debris_shake_never_lowers_existing_shake() {
        let mut rng = Pcg32::seed_from_u64(1);
        let mut fx = effects();
        fx.explosion(&mut rng, Vec2::ZERO);
        fx.debris(&mut rng, Vec2::ZERO, 12.5, true);
        assert_eq!(fx.shake, 20.0);
    }

    #[test]
    fn test_decay() {
        let mut rng = Pcg32::seed_from_u64(3);
        let mut fx = effects();
        fx.shake = 10.0;
        fx.recoil(&mut rng, -1.0);
        assert_eq!(fx.shake_x, -4.0);

        fx.update();
        assert!((fx.shake - 9.0).abs() < 1e-5);
        assert!((fx.shake_x + 3.4).abs() < 1e-5);

        for _ in 0..200 {
            fx.update();
        }
        assert_eq!(fx.shake, 0.0);
        assert!(fx.shake_x.abs() < 1e-6);
    }

    #[test]
    fn test_particles_expire() {
        let mut rng = Pcg32::seed_from_u64(3);
        let mut fx = effects();
        fx.thrust(&mut rng, Vec2::ZERO);
        // decay 0.05 per tick: gone after 20 ticks
        for _ in 0..19 {
            fx.update();
        }
        assert_eq!(fx.particles.len(), 1);
        fx.update();
        fx.update();
        assert!(fx.particles.is_empty());
    }

    #[test]
    fn test_particle_cap_drops_oldest() {
        let mut rng = Pcg32::seed_from_u64(3);
        let mut fx = Effects::new(&Settings::from_preset(crate::settings::QualityPreset::Low));
        fx.thrust(&mut rng, Vec2::new(-1.0, -1.0));
        for _ in 0..4 {
            fx.explosion(&mut rng, Vec2::ZERO);
        }
        assert_eq!(fx.particles.len(), 128);
        assert!(fx.particles.iter().all(|p| p.kind == ParticleKind::Spark));
    }

    #[test]
    fn test_reduced_motion_suppresses_shake() {
        let mut rng = Pcg32::seed_from_u64(3);
        let mut fx = Effects::new(&Settings {
            reduced_motion: true,
            ..Settings::default()
        });
        fx.explosion(&mut rng, Vec2::ZERO);
        fx.recoil(&mut rng, 1.0);
        assert_eq!(fx.shake, 0.0);
        assert_eq!(fx.shake_x, 0.0);
        assert_eq!(fx.particles.len(), 40);
    }
}
