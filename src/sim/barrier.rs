//! Destructible scrolling barrier
//!
//! A fixed grid of blocks filling the centre column of the arena. The grid
//! scrolls downward every tick and wraps, so each block's on-screen position
//! is derived from its immutable `base_y` and the shared scroll offset.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::craft::Craft;
use super::rect::Rect;
use crate::config::{BarrierConfig, GameConfig, WorldConfig};

/// Grid coordinate of a block; stable for the lifetime of the barrier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BlockId {
    pub row: u32,
    pub col: u32,
}

/// A single barrier cell
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Block {
    pub id: BlockId,
    /// Left edge (never changes)
    pub x: f32,
    /// Top edge before scrolling (never changes)
    pub base_y: f32,
    pub hp: u8,
    pub max_hp: u8,
}

impl Block {
    /// Destroyed blocks keep their grid slot but no longer collide
    #[inline]
    pub fn is_destroyed(&self) -> bool {
        self.hp == 0
    }
}

/// Screen-space top edge of a block for a given scroll offset.
///
/// Periodic in `scroll` with period `total_height`. The result lies in
/// `[world_height - total_height, world_height)`.
#[inline]
pub fn screen_y(base_y: f32, scroll: f32, total_height: f32, world_height: f32) -> f32 {
    (base_y + scroll).rem_euclid(total_height) - (total_height - world_height)
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Barrier {
    config: BarrierConfig,
    world: WorldConfig,
    /// Row-major, `rows * cols` entries
    blocks: Vec<Block>,
    /// Always in `[0, total_height)`
    scroll_offset: f32,
}

impl Barrier {
    pub fn new(config: &GameConfig) -> Self {
        let mut barrier = Self {
            config: config.barrier,
            world: config.world,
            blocks: Vec::new(),
            scroll_offset: 0.0,
        };
        barrier.init();
        barrier
    }

    fn init(&mut self) {
        let block_w = self.config.block_width();
        let cols = self.config.cols;
        self.blocks = (0..self.config.rows)
            .flat_map(|row| (0..cols).map(move |col| BlockId { row, col }))
            .map(|id| Block {
                id,
                x: self.config.x + id.col as f32 * block_w,
                base_y: id.row as f32 * self.config.block_height,
                hp: self.config.block_hp,
                max_hp: self.config.block_hp,
            })
            .collect();
        self.scroll_offset = 0.0;
    }

    /// Restore every block and rewind the scroll (start of each round)
    pub fn reset(&mut self) {
        for block in &mut self.blocks {
            block.hp = block.max_hp;
        }
        self.scroll_offset = 0.0;
    }

    /// Advance the scroll by one tick
    pub fn update(&mut self) {
        self.scroll_offset =
            (self.scroll_offset + self.config.scroll_speed).rem_euclid(self.total_height());
    }

    #[inline]
    pub fn total_height(&self) -> f32 {
        self.config.total_height()
    }

    #[inline]
    pub fn scroll_offset(&self) -> f32 {
        self.scroll_offset
    }

    #[inline]
    pub fn block_width(&self) -> f32 {
        self.config.block_width()
    }

    #[inline]
    pub fn block_height(&self) -> f32 {
        self.config.block_height
    }

    /// Half the larger block dimension; scales debris effects
    pub fn block_radius(&self) -> f32 {
        self.block_width().max(self.block_height()) / 2.0
    }

    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    pub fn block(&self, id: BlockId) -> Option<&Block> {
        if id.row >= self.config.rows || id.col >= self.config.cols {
            return None;
        }
        self.blocks.get((id.row * self.config.cols + id.col) as usize)
    }

    fn block_mut(&mut self, id: BlockId) -> Option<&mut Block> {
        if id.row >= self.config.rows || id.col >= self.config.cols {
            return None;
        }
        self.blocks.get_mut((id.row * self.config.cols + id.col) as usize)
    }

    pub fn block_screen_y(&self, block: &Block) -> f32 {
        screen_y(
            block.base_y,
            self.scroll_offset,
            self.total_height(),
            self.world.height,
        )
    }

    /// Current screen-space box of a block
    pub fn block_rect(&self, block: &Block) -> Rect {
        Rect::new(
            block.x,
            self.block_screen_y(block),
            self.block_width(),
            self.block_height(),
        )
    }

    pub fn block_center(&self, block: &Block) -> Vec2 {
        self.block_rect(block).center()
    }

    /// Live blocks currently inside the visible band, with their screen boxes
    fn live_visible(&self) -> impl Iterator<Item = (&Block, Rect)> {
        self.blocks
            .iter()
            .filter(|block| !block.is_destroyed())
            .map(|block| (block, self.block_rect(block)))
            .filter(|(_, rect)| rect.y <= self.world.height && rect.bottom() >= 0.0)
    }

    /// Does a live craft's hull overlap any live, visible block?
    pub fn check_craft_collision<C: Craft>(&self, craft: &C) -> bool {
        if !craft.is_alive() {
            return false;
        }
        let hull = craft.bounding_box();
        self.live_visible().any(|(_, rect)| rect.overlaps(&hull))
    }

    /// First live, visible block containing the point
    pub fn block_at(&self, x: f32, y: f32) -> Option<&Block> {
        let point = Vec2::new(x, y);
        self.live_visible()
            .find(|(_, rect)| rect.contains(point))
            .map(|(block, _)| block)
    }

    /// Take one hit point from a block. Returns false if it was already
    /// destroyed (or the id is out of range).
    pub fn damage_block(&mut self, id: BlockId) -> bool {
        match self.block_mut(id) {
            Some(block) if block.hp > 0 => {
                block.hp -= 1;
                true
            }
            _ => false,
        }
    }

    /// True when fewer than 30% of ten samples down the column at `x` are blocked
    pub fn is_passable(&self, x: f32) -> bool {
        const SAMPLES: usize = 10;
        let blocked = (0..SAMPLES)
            .map(|i| i as f32 / SAMPLES as f32 * self.world.height)
            .filter(|&y| self.block_at(x, y).is_some())
            .count();
        (blocked as f32) < SAMPLES as f32 * 0.3
    }

    pub fn total_hp(&self) -> u32 {
        self.blocks.iter().map(|b| b.hp as u32).sum()
    }

    pub fn destroyed_percentage(&self) -> f32 {
        let max_hp: u32 = self.blocks.iter().map(|b| b.max_hp as u32).sum();
        if max_hp == 0 {
            return 0.0;
        }
        (max_hp - self.total_hp()) as f32 / max_hp as f32 * 100.0
    }
}
