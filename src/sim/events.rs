//! Fire-and-forget notifications for the audio and haptics hosts
//!
//! The simulation queues these during a tick; the host drains them afterwards.
//! Nothing in the core ever reads an event back.

use serde::{Deserialize, Serialize};

use super::craft::PlayerId;

/// Sound effect cues
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SoundEffect {
    /// A craft fired
    Shoot(PlayerId),
    /// A craft was destroyed
    Explosion,
    /// A projectile struck a barrier block
    BarrierHit,
    /// Fuel is flowing on a fuel pad
    Refuel,
    /// A round was decided
    RoundWin,
    /// A side reached the win threshold
    MatchWin,
}

/// Controller rumble patterns
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Rumble {
    Shoot,
    Landing,
    Explosion,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    Sound(SoundEffect),
    Rumble { player: PlayerId, kind: Rumble },
}
