//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must stay deterministic:
//! - Fixed step only (one `tick` per frame, no wall-clock time)
//! - Seeded RNG only, with separate streams for effects and tie-breaks
//! - Stable iteration order (player one before player two, blocks row-major)
//! - No rendering, audio or input-device dependencies

pub mod barrier;
pub mod craft;
pub mod effects;
pub mod events;
pub mod projectile;
pub mod rect;
pub mod state;
pub mod taxi;
pub mod tick;

pub use barrier::{Barrier, Block, BlockId};
pub use craft::{Craft, CraftInput, Platform, PlayerId, ProjectileSpawn};
pub use effects::{Effects, Particle, ParticleKind};
pub use events::{GameEvent, Rumble, SoundEffect};
pub use projectile::{Hit, Projectile, ProjectileManager};
pub use rect::Rect;
pub use state::{
    Arena, CraftView, MatchState, RngState, RoundEndOutcome, RoundState, Snapshot, TieBreak,
};
pub use taxi::Taxi;
pub use tick::{PlayingPhase, TickInput, tick};
