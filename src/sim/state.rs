//! Round/match state and the arena that owns the world
//!
//! `MatchState` is the explicit per-match value (score, timers, round phase).
//! Its transitions are plain methods with no access to the world, so the
//! round/match rules can be tested on their own. `Arena` owns everything else
//! a tick touches.

use glam::Vec2;
use rand::Rng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::barrier::Barrier;
use super::craft::{Craft, PlayerId};
use super::effects::{Effects, Particle};
use super::events::GameEvent;
use super::projectile::{Projectile, ProjectileManager};
use super::rect::Rect;
use super::taxi::Taxi;
use crate::config::{GameConfig, RulesConfig};
use crate::settings::Settings;

/// Current phase of the match
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RoundState {
    /// Title screen, waiting for start input
    Menu,
    /// Pre-round countdown
    Countdown,
    /// Live simulation
    Playing,
    /// Round decided, result on screen
    RoundEnd,
    /// A side reached the win threshold, waiting for restart input
    MatchEnd,
}

/// What the round-end timer decided this tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoundEndOutcome {
    Waiting,
    NextRound,
    MatchOver(PlayerId),
}

/// RNG state wrapper: a seed plus a PCG stream selector
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RngState {
    pub seed: u64,
    pub stream: u64,
}

impl RngState {
    pub fn new(seed: u64, stream: u64) -> Self {
        Self { seed, stream }
    }

    pub fn to_rng(&self) -> Pcg32 {
        Pcg32::new(self.seed, self.stream)
    }
}

/// PCG stream for cosmetic effects
const EFFECTS_STREAM: u64 = 0x0a02_bdbf_7bb3_c0a7;
/// PCG stream reserved for mutual-kill tie-breaks
const TIE_BREAK_STREAM: u64 = 0x5851_f42d_4c95_7f2d;

/// Picks a displayed "winner" when both craft die in the same tick.
///
/// Owns its own RNG stream so cosmetic randomness elsewhere never shifts it,
/// and it never touches the score.
#[derive(Debug, Clone)]
pub struct TieBreak {
    rng: Pcg32,
}

impl TieBreak {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: RngState::new(seed, TIE_BREAK_STREAM).to_rng(),
        }
    }

    pub fn pick(&mut self) -> PlayerId {
        if self.rng.random_bool(0.5) {
            PlayerId::One
        } else {
            PlayerId::Two
        }
    }
}

/// Score and round flow for one match
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchState {
    pub round_state: RoundState,
    /// Indexed by `PlayerId::index`
    pub score: [u32; 2],
    /// Ticks until the round goes live
    pub countdown: u32,
    /// Ticks until the next round (or match end)
    pub round_end_timer: u32,
    /// For display only; after a mutual kill this is a coin flip
    pub last_round_winner: Option<PlayerId>,
    /// Rounds started this match
    pub round: u32,
}

impl Default for MatchState {
    fn default() -> Self {
        Self::new()
    }
}

impl MatchState {
    pub fn new() -> Self {
        Self {
            round_state: RoundState::Menu,
            score: [0, 0],
            countdown: 0,
            round_end_timer: 0,
            last_round_winner: None,
            round: 0,
        }
    }

    /// Fresh scoreline; the caller follows with `begin_round`
    pub fn begin_match(&mut self) {
        self.score = [0, 0];
        self.last_round_winner = None;
        self.round = 0;
    }

    pub fn begin_round(&mut self, rules: &RulesConfig) {
        self.round += 1;
        self.countdown = rules.round_start_delay;
        self.round_state = RoundState::Countdown;
    }

    /// One countdown tick. Returns true on the tick the round goes live.
    pub fn tick_countdown(&mut self) -> bool {
        self.countdown = self.countdown.saturating_sub(1);
        if self.countdown == 0 {
            self.round_state = RoundState::Playing;
            return true;
        }
        false
    }

    /// Score a finished round from which craft survived.
    ///
    /// A lone survivor earns a point. A mutual kill scores nothing; the
    /// tie-break only chooses which side the result screen names.
    pub fn record_round(
        &mut self,
        alive: [bool; 2],
        tie_break: &mut TieBreak,
        rules: &RulesConfig,
    ) {
        let winner = match alive {
            [true, false] => {
                self.score[0] += 1;
                PlayerId::One
            }
            [false, true] => {
                self.score[1] += 1;
                PlayerId::Two
            }
            _ => tie_break.pick(),
        };
        self.last_round_winner = Some(winner);
        self.round_end_timer = rules.round_end_delay;
        self.round_state = RoundState::RoundEnd;
    }

    /// Side that has reached the win threshold, if any
    pub fn match_winner(&self, rules: &RulesConfig) -> Option<PlayerId> {
        PlayerId::ALL
            .into_iter()
            .find(|id| self.score[id.index()] >= rules.rounds_to_win)
    }

    /// One result-screen tick
    pub fn tick_round_end(&mut self, rules: &RulesConfig) -> RoundEndOutcome {
        self.round_end_timer = self.round_end_timer.saturating_sub(1);
        if self.round_end_timer > 0 {
            return RoundEndOutcome::Waiting;
        }
        match self.match_winner(rules) {
            Some(winner) => {
                self.round_state = RoundState::MatchEnd;
                RoundEndOutcome::MatchOver(winner)
            }
            None => RoundEndOutcome::NextRound,
        }
    }
}

/// Read-only view of one craft for the renderer
#[derive(Debug, Clone, Serialize)]
pub struct CraftView {
    pub id: PlayerId,
    pub pos: Vec2,
    pub vel: Vec2,
    pub bounds: Rect,
    pub alive: bool,
    pub thrusting: bool,
    pub fuel: f32,
    pub ammo: f32,
    /// Ammo went up this tick (drives the reload tone)
    pub reloading: bool,
}

impl CraftView {
    fn of<C: Craft>(craft: &C, reloading: bool) -> Self {
        Self {
            id: craft.id(),
            pos: craft.position(),
            vel: craft.velocity(),
            bounds: craft.bounding_box(),
            alive: craft.is_alive(),
            thrusting: craft.is_thrusting(),
            fuel: craft.fuel(),
            ammo: craft.ammo(),
            reloading,
        }
    }
}

/// Everything the renderer reads after a tick
#[derive(Debug, Clone, Serialize)]
pub struct Snapshot<'a> {
    pub crafts: [CraftView; 2],
    pub projectiles: &'a [Projectile],
    pub barrier: &'a Barrier,
    pub particles: &'a [Particle],
    pub score: [u32; 2],
    pub round_state: RoundState,
    pub countdown: u32,
    pub last_round_winner: Option<PlayerId>,
    pub shake: f32,
    pub shake_x: f32,
    pub shake_y: f32,
}

/// The whole simulated world. Only `tick` mutates it.
pub struct Arena<C: Craft> {
    pub config: GameConfig,
    pub settings: Settings,
    /// Indexed by `PlayerId::index`
    pub crafts: [C; 2],
    pub barrier: Barrier,
    pub projectiles: ProjectileManager,
    pub state: MatchState,
    pub effects: Effects,
    /// Simulation tick counter
    pub time_ticks: u64,
    /// Events raised during the most recent tick
    pub(crate) events: Vec<GameEvent>,
    /// Cosmetic randomness (particles, recoil, refuel chirps)
    pub(crate) rng: Pcg32,
    pub(crate) tie_break: TieBreak,
    /// Whether each craft was sitting on a pad last tick
    pub(crate) was_landed: [bool; 2],
    /// Whether each craft took on ammo this tick
    pub(crate) reloading: [bool; 2],
}

impl Arena<Taxi> {
    /// Arena with two reference taxis
    pub fn new(config: GameConfig, settings: Settings, seed: u64) -> Self {
        let crafts = [
            Taxi::new(PlayerId::One, &config),
            Taxi::new(PlayerId::Two, &config),
        ];
        Self::with_crafts(config, settings, seed, crafts)
    }
}

impl<C: Craft> Arena<C> {
    /// Arena around caller-supplied craft. `crafts[i].id()` must match slot `i`.
    pub fn with_crafts(config: GameConfig, settings: Settings, seed: u64, crafts: [C; 2]) -> Self {
        debug_assert!(
            crafts
                .iter()
                .enumerate()
                .all(|(i, c)| c.id().index() == i),
            "craft slots must match their ids"
        );
        Self {
            barrier: Barrier::new(&config),
            projectiles: ProjectileManager::new(&config),
            effects: Effects::new(&settings),
            state: MatchState::new(),
            time_ticks: 0,
            events: Vec::new(),
            rng: RngState::new(seed, EFFECTS_STREAM).to_rng(),
            tie_break: TieBreak::new(seed),
            was_landed: [false; 2],
            reloading: [false; 2],
            config,
            settings,
            crafts,
        }
    }

    pub fn craft(&self, id: PlayerId) -> &C {
        &self.crafts[id.index()]
    }

    /// Notifications raised by the most recent tick
    pub fn events(&self) -> &[GameEvent] {
        &self.events
    }

    pub fn snapshot(&self) -> Snapshot<'_> {
        Snapshot {
            crafts: [
                CraftView::of(&self.crafts[0], self.reloading[0]),
                CraftView::of(&self.crafts[1], self.reloading[1]),
            ],
            projectiles: self.projectiles.all(),
            barrier: &self.barrier,
            particles: &self.effects.particles,
            score: self.state.score,
            round_state: self.state.round_state,
            countdown: self.state.countdown,
            last_round_winner: self.state.last_round_winner,
            shake: self.effects.shake,
            shake_x: self.effects.shake_x,
            shake_y: self.effects.shake_y,
        }
    }
}
