//! Projectile ballistics and the per-tick hit sweep

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::barrier::{Barrier, BlockId};
use super::craft::{Craft, PlayerId, ProjectileSpawn};
use super::rect::Rect;
use crate::config::{GameConfig, ProjectileConfig, WorldConfig};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Projectile {
    pub pos: Vec2,
    pub vel: Vec2,
    pub owner: PlayerId,
    pub alive: bool,
}

impl Projectile {
    pub fn new(spawn: ProjectileSpawn) -> Self {
        Self {
            pos: spawn.pos,
            vel: spawn.vel,
            owner: spawn.owner,
            alive: true,
        }
    }

    /// Advance one tick. Leaving the top or bottom wraps to the other edge;
    /// leaving the left or right side kills the projectile.
    pub fn update(&mut self, world: &WorldConfig, gravity: f32, config: &ProjectileConfig) {
        if !self.alive {
            return;
        }

        self.pos += self.vel;
        self.vel.y += gravity * config.gravity_scale;

        let margin = config.size;
        if self.pos.y > world.height + margin {
            self.pos.y = -margin;
        } else if self.pos.y < -margin {
            self.pos.y = world.height + margin;
        }

        if self.pos.x < -margin || self.pos.x > world.width + margin {
            self.alive = false;
        }
    }

    /// Square hit box centred on the projectile
    pub fn bounds(&self, size: f32) -> Rect {
        Rect::centered(self.pos, size, size)
    }

    /// A projectile never hits its own owner, a dead craft, or anything once spent
    pub fn hits_craft<C: Craft>(&self, craft: &C, size: f32) -> bool {
        if !self.alive || !craft.is_alive() || craft.id() == self.owner {
            return false;
        }
        self.bounds(size).overlaps(&craft.bounding_box())
    }

    pub fn die(&mut self) {
        self.alive = false;
    }
}

/// One resolved projectile impact
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Hit {
    Craft {
        victim: PlayerId,
        shooter: PlayerId,
        /// Victim's hull centre at the moment of impact
        at: Vec2,
    },
    Block {
        block: BlockId,
        /// This hit took the block's last hit point
        destroyed: bool,
        shooter: PlayerId,
        /// Block centre on screen at the moment of impact
        at: Vec2,
    },
}

/// Owns every live projectile
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectileManager {
    world: WorldConfig,
    gravity: f32,
    config: ProjectileConfig,
    projectiles: Vec<Projectile>,
}

impl ProjectileManager {
    pub fn new(config: &GameConfig) -> Self {
        Self {
            world: config.world,
            gravity: config.physics.gravity,
            config: config.projectile,
            projectiles: Vec::new(),
        }
    }

    pub fn add(&mut self, spawn: ProjectileSpawn) {
        self.projectiles.push(Projectile::new(spawn));
    }

    /// Advance every projectile, then drop the dead ones in a single pass
    pub fn update(&mut self) {
        for projectile in &mut self.projectiles {
            projectile.update(&self.world, self.gravity, &self.config);
        }
        self.projectiles.retain(|p| p.alive);
    }

    /// Resolve this tick's impacts in insertion order.
    ///
    /// Each projectile's box is tested against every craft first. Only if it is
    /// still alive is its centre point tested against the barrier, so it
    /// produces at most one effect.
    pub fn check_collisions<C: Craft>(
        &mut self,
        crafts: &mut [C],
        barrier: &mut Barrier,
    ) -> Vec<Hit> {
        let size = self.config.size;
        let mut hits = Vec::new();

        for projectile in &mut self.projectiles {
            if !projectile.alive {
                continue;
            }

            for craft in crafts.iter_mut() {
                if projectile.hits_craft(&*craft, size) {
                    craft.die();
                    projectile.die();
                    hits.push(Hit::Craft {
                        victim: craft.id(),
                        shooter: projectile.owner,
                        at: craft.position(),
                    });
                }
            }

            if !projectile.alive {
                continue;
            }

            let struck = barrier
                .block_at(projectile.pos.x, projectile.pos.y)
                .map(|block| (block.id, block.hp == 1, barrier.block_center(block)));
            if let Some((block, destroyed, at)) = struck {
                barrier.damage_block(block);
                projectile.die();
                hits.push(Hit::Block {
                    block,
                    destroyed,
                    shooter: projectile.owner,
                    at,
                });
            }
        }

        hits
    }

    pub fn clear(&mut self) {
        self.projectiles.clear();
    }

    pub fn all(&self) -> &[Projectile] {
        &self.projectiles
    }

    pub fn len(&self) -> usize {
        self.projectiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.projectiles.is_empty()
    }
}
