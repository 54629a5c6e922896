//! Fixed-step simulation tick
//!
//! One call per rendered frame. The tick dispatches strictly on the current
//! `RoundState`; only `Playing` runs the barrier, craft, projectile and
//! collision work, as the ordered phases in `PlayingPhase::ORDER`. Particle
//! and shake decay run afterwards in every state.

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::craft::{Craft, CraftInput, Platform, PlayerId};
use super::events::{GameEvent, Rumble, SoundEffect};
use super::projectile::Hit;
use super::state::{Arena, RoundEndOutcome, RoundState};

/// Input for a single tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TickInput {
    /// Indexed by `PlayerId::index`
    pub crafts: [CraftInput; 2],
    /// Start/restart button (only read on the menu and match-end screens)
    pub start: bool,
}

/// Chance per refuelling tick of playing the refuel chirp
const REFUEL_CHIRP_CHANCE: f64 = 0.1;

/// The steps of a live tick, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayingPhase {
    /// Advance the barrier scroll.
    /// Post: every later collision test this tick sees the new offset.
    ScrollBarrier,
    /// Per craft, in id order: fire if asked, integrate input, handle pad
    /// contact, emit thrust, test against the barrier.
    /// Post: new projectiles are already in the live list.
    DriveCrafts,
    /// Move every projectile (including ones fired this tick) and prune the dead.
    AdvanceProjectiles,
    /// Resolve projectile hits against craft, then the barrier.
    /// Pre: projectiles have moved. Post: every death this tick has happened.
    ResolveHits,
    /// End the round if at most one craft is alive.
    CheckRoundOver,
}

impl PlayingPhase {
    pub const ORDER: [PlayingPhase; 5] = [
        PlayingPhase::ScrollBarrier,
        PlayingPhase::DriveCrafts,
        PlayingPhase::AdvanceProjectiles,
        PlayingPhase::ResolveHits,
        PlayingPhase::CheckRoundOver,
    ];
}

/// Advance the arena by one fixed step
pub fn tick<C: Craft>(arena: &mut Arena<C>, input: &TickInput) {
    arena.events.clear();
    arena.reloading = [false; 2];
    arena.time_ticks += 1;

    match arena.state.round_state {
        RoundState::Menu | RoundState::MatchEnd => {
            if input.start {
                arena.start_match();
            }
        }
        RoundState::Countdown => {
            if arena.state.tick_countdown() {
                log::debug!("Round {} live", arena.state.round);
            }
        }
        RoundState::Playing => {
            for phase in PlayingPhase::ORDER {
                log::trace!("tick {} {:?}", arena.time_ticks, phase);
                arena.run_phase(phase, input);
            }
        }
        RoundState::RoundEnd => arena.update_round_end(),
    }

    arena.effects.update();
}

impl<C: Craft> Arena<C> {
    /// Zero the score and begin the first round
    pub fn start_match(&mut self) {
        log::info!("Match start (first to {})", self.config.rules.rounds_to_win);
        self.state.begin_match();
        self.start_round();
    }

    /// Reset the world for a fresh round and enter the countdown
    pub fn start_round(&mut self) {
        for craft in &mut self.crafts {
            craft.reset();
        }
        self.barrier.reset();
        self.projectiles.clear();
        self.effects.clear();
        self.was_landed = [false; 2];
        self.state.begin_round(&self.config.rules);
        log::info!(
            "Round {} countdown (score {}-{})",
            self.state.round,
            self.state.score[0],
            self.state.score[1]
        );
    }

    fn run_phase(&mut self, phase: PlayingPhase, input: &TickInput) {
        match phase {
            PlayingPhase::ScrollBarrier => self.barrier.update(),
            PlayingPhase::DriveCrafts => {
                for id in PlayerId::ALL {
                    self.drive_craft(id, &input.crafts[id.index()]);
                }
            }
            PlayingPhase::AdvanceProjectiles => self.projectiles.update(),
            PlayingPhase::ResolveHits => self.resolve_hits(),
            PlayingPhase::CheckRoundOver => {
                let alive = self.crafts.iter().filter(|c| c.is_alive()).count();
                if alive <= 1 {
                    self.end_round();
                }
            }
        }
    }

    fn drive_craft(&mut self, id: PlayerId, input: &CraftInput) {
        let i = id.index();

        if input.shoot && self.crafts[i].can_shoot() {
            if let Some(spawn) = self.crafts[i].shoot() {
                self.projectiles.add(spawn);
                self.sound(SoundEffect::Shoot(id));
                self.rumble(id, Rumble::Shoot);
                // Kick the view away from the direction of fire
                let recoil = if self.crafts[i].position().x < self.config.world.width / 2.0 {
                    -1.0
                } else {
                    1.0
                };
                self.effects.recoil(&mut self.rng, recoil);
            }
        }

        self.crafts[i].update(input);

        if !self.crafts[i].is_alive() {
            return;
        }

        let platform = self.crafts[i].check_platform_collision();
        match platform {
            Some(Platform::Crash) => {
                log::debug!("{:?} crashed into the floor", id);
                self.destroy_craft(id);
            }
            Some(Platform::Fuel) => {
                self.landing_rumble(id);
                let rate = self.config.craft.fuel_refill_rate;
                if self.crafts[i].refuel(rate) && self.rng.random_bool(REFUEL_CHIRP_CHANCE) {
                    self.sound(SoundEffect::Refuel);
                }
            }
            Some(Platform::Ammo) => {
                self.landing_rumble(id);
                let craft = &mut self.crafts[i];
                if craft.ammo() < craft.max_ammo() {
                    self.reloading[i] = craft.reload(self.config.craft.ammo_refill_rate);
                }
            }
            None => {}
        }
        self.was_landed[i] = matches!(platform, Some(Platform::Fuel | Platform::Ammo));

        let craft = &self.crafts[i];
        if craft.is_alive() && craft.is_thrusting() && craft.fuel() > 0.0 {
            let hull = craft.bounding_box();
            let exhaust = glam::Vec2::new(hull.center().x, hull.bottom());
            self.effects.thrust(&mut self.rng, exhaust);
        }

        if self.barrier.check_craft_collision(&self.crafts[i]) {
            log::debug!("{:?} flew into the barrier", id);
            self.destroy_craft(id);
        }
    }

    fn resolve_hits(&mut self) {
        let hits = self
            .projectiles
            .check_collisions(&mut self.crafts, &mut self.barrier);

        for hit in hits {
            match hit {
                Hit::Craft {
                    victim,
                    shooter,
                    at,
                } => {
                    log::debug!("{:?} shot down {:?}", shooter, victim);
                    self.explode(victim, at);
                }
                Hit::Block {
                    block,
                    destroyed,
                    at,
                    ..
                } => {
                    log::trace!(
                        "block ({}, {}) hit, destroyed: {}",
                        block.row,
                        block.col,
                        destroyed
                    );
                    self.sound(SoundEffect::BarrierHit);
                    let radius = self.barrier.block_radius();
                    self.effects.debris(&mut self.rng, at, radius, destroyed);
                }
            }
        }
    }

    /// Kill a craft outside the projectile sweep (crash, barrier contact)
    fn destroy_craft(&mut self, id: PlayerId) {
        let craft = &mut self.crafts[id.index()];
        craft.die();
        let at = craft.position();
        self.explode(id, at);
    }

    fn explode(&mut self, id: PlayerId, at: glam::Vec2) {
        self.sound(SoundEffect::Explosion);
        self.rumble(id, Rumble::Explosion);
        self.effects.explosion(&mut self.rng, at);
    }

    fn end_round(&mut self) {
        let alive = [self.crafts[0].is_alive(), self.crafts[1].is_alive()];
        self.state
            .record_round(alive, &mut self.tie_break, &self.config.rules);
        self.sound(SoundEffect::RoundWin);

        match alive {
            [false, false] => log::info!(
                "Round {} draw: both craft down (showing {:?})",
                self.state.round,
                self.state.last_round_winner
            ),
            _ => log::info!(
                "Round {} to {:?} (score {}-{})",
                self.state.round,
                self.state.last_round_winner,
                self.state.score[0],
                self.state.score[1]
            ),
        }
    }

    fn update_round_end(&mut self) {
        match self.state.tick_round_end(&self.config.rules) {
            RoundEndOutcome::Waiting => {}
            RoundEndOutcome::NextRound => self.start_round(),
            RoundEndOutcome::MatchOver(winner) => {
                log::info!(
                    "Match to {:?} ({}-{})",
                    winner,
                    self.state.score[0],
                    self.state.score[1]
                );
                self.sound(SoundEffect::MatchWin);
            }
        }
    }

    fn landing_rumble(&mut self, id: PlayerId) {
        if !self.was_landed[id.index()] {
            self.rumble(id, Rumble::Landing);
        }
    }

    fn sound(&mut self, effect: SoundEffect) {
        self.events.push(GameEvent::Sound(effect));
    }

    fn rumble(&mut self, player: PlayerId, kind: Rumble) {
        if self.settings.haptics {
            self.events.push(GameEvent::Rumble { player, kind });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GameConfig;
    use crate::consts::{AMMO_PAD_Y, FLOOR_Y};
    use crate::settings::Settings;
    use crate::sim::ParticleKind;
    use crate::sim::taxi::Taxi;
    use glam::Vec2;

    fn arena() -> Arena<Taxi> {
        Arena::new(GameConfig::default(), Settings::default(), 12345)
    }

    /// Arena mid-round with the countdown already elapsed
    fn live_arena() -> Arena<Taxi> {
        let mut arena = arena();
        arena.start_match();
        arena.state.countdown = 0;
        arena.state.round_state = RoundState::Playing;
        arena
    }

    fn shoot(player: PlayerId) -> TickInput {
        let mut input = TickInput::default();
        input.crafts[player.index()].shoot = true;
        input
    }

    fn has_event(arena: &Arena<Taxi>, event: GameEvent) -> bool {
        arena.events().contains(&event)
    }

    #[test]
    fn test_menu_waits_for_start() {
        let mut arena = arena();
        tick(&mut arena, &TickInput::default());
        assert_eq!(arena.state.round_state, RoundState::Menu);

        let start = TickInput {
            start: true,
            ..Default::default()
        };
        tick(&mut arena, &start);
        assert_eq!(arena.state.round_state, RoundState::Countdown);
        assert_eq!(arena.state.countdown, 90);
        assert_eq!(arena.state.score, [0, 0]);
    }

    #[test]
    fn test_countdown_expires_on_exact_tick() {
        let mut arena = arena();
        arena.start_match();
        arena.state.countdown = 2;
        tick(&mut arena, &TickInput::default());
        assert_eq!(arena.state.round_state, RoundState::Countdown);
        assert_eq!(arena.state.countdown, 1);

        tick(&mut arena, &TickInput::default());
        assert_eq!(arena.state.countdown, 0);
        assert_eq!(arena.state.round_state, RoundState::Playing);
        assert!(arena.crafts.iter().all(|c| c.is_alive()));
    }

    #[test]
    fn test_barrier_only_scrolls_while_playing() {
        let mut arena = arena();
        arena.start_match();
        tick(&mut arena, &TickInput::default());
        assert_eq!(arena.barrier.scroll_offset(), 0.0);
        // Shooting is ignored outside Playing
        tick(&mut arena, &shoot(PlayerId::One));
        assert!(arena.projectiles.is_empty());

        let mut arena = live_arena();
        tick(&mut arena, &TickInput::default());
        assert_eq!(arena.barrier.scroll_offset(), 1.0);
    }

    #[test]
    fn test_phase_order() {
        let order = PlayingPhase::ORDER;
        let pos = |p: PlayingPhase| order.iter().position(|&q| q == p).unwrap();
        assert_eq!(order[0], PlayingPhase::ScrollBarrier);
        assert!(pos(PlayingPhase::DriveCrafts) < pos(PlayingPhase::AdvanceProjectiles));
        assert!(pos(PlayingPhase::AdvanceProjectiles) < pos(PlayingPhase::ResolveHits));
        assert_eq!(order[order.len() - 1], PlayingPhase::CheckRoundOver);
    }

    #[test]
    fn test_lone_survivor_scores() {
        let mut arena = live_arena();
        arena.crafts[1].die();
        tick(&mut arena, &TickInput::default());
        assert_eq!(arena.state.round_state, RoundState::RoundEnd);
        assert_eq!(arena.state.score, [1, 0]);
        assert_eq!(arena.state.last_round_winner, Some(PlayerId::One));
        assert!(has_event(&arena, GameEvent::Sound(SoundEffect::RoundWin)));
    }

    #[test]
    fn test_mutual_kill_scores_nothing() {
        for seed in 0..32 {
            let mut arena = Arena::new(GameConfig::default(), Settings::default(), seed);
            arena.start_match();
            arena.state.round_state = RoundState::Playing;
            arena.state.score = [1, 2];
            arena.crafts[0].die();
            arena.crafts[1].die();
            tick(&mut arena, &TickInput::default());
            assert_eq!(arena.state.round_state, RoundState::RoundEnd);
            assert_eq!(arena.state.score, [1, 2]);
            assert!(arena.state.last_round_winner.is_some());
        }
    }

    #[test]
    fn test_shot_lands_on_the_tick_it_is_fired() {
        let mut arena = live_arena();
        arena.crafts[0].pos = Vec2::new(300.0, 300.0);
        arena.crafts[1].pos = Vec2::new(330.0, 300.0);

        tick(&mut arena, &shoot(PlayerId::One));

        assert!(arena.crafts[0].is_alive());
        assert!(!arena.crafts[1].is_alive());
        assert!(has_event(&arena, GameEvent::Sound(SoundEffect::Shoot(PlayerId::One))));
        assert!(has_event(&arena, GameEvent::Sound(SoundEffect::Explosion)));
        assert!(has_event(
            &arena,
            GameEvent::Rumble {
                player: PlayerId::Two,
                kind: Rumble::Explosion
            }
        ));
        assert_eq!(arena.state.round_state, RoundState::RoundEnd);
        assert_eq!(arena.state.score, [1, 0]);
        // Explosion burst plus one shake decay step
        assert!(arena.effects.particles.len() >= 40);
        assert!((arena.effects.shake - 18.0).abs() < 1e-4);
    }

    #[test]
    fn test_recoil_pushes_away_from_shot() {
        let mut arena = live_arena();
        tick(&mut arena, &shoot(PlayerId::One));
        assert_eq!(arena.projectiles.len(), 1);
        // Player one fires right, so the view kicks left (after one decay step)
        assert!((arena.effects.shake_x + 4.0 * 0.85).abs() < 1e-4);
    }

    #[test]
    fn test_flying_into_barrier_is_fatal() {
        let mut arena = live_arena();
        arena.crafts[0].pos = Vec2::new(400.0, 300.0);
        tick(&mut arena, &TickInput::default());
        assert!(!arena.crafts[0].is_alive());
        assert_eq!(arena.state.score, [0, 1]);
        assert!(has_event(&arena, GameEvent::Sound(SoundEffect::Explosion)));
    }

    #[test]
    fn test_projectile_damages_barrier() {
        let mut arena = live_arena();
        arena.crafts[0].pos = Vec2::new(340.0, 312.0);
        tick(&mut arena, &shoot(PlayerId::One));
        tick(&mut arena, &TickInput::default());
        tick(&mut arena, &TickInput::default());

        assert!(arena.projectiles.is_empty());
        assert_eq!(arena.barrier.total_hp(), 24 * 4 * 2 - 1);
        assert_eq!(arena.state.round_state, RoundState::Playing);
        assert!(arena.effects.particles.iter().any(|p| p.kind == ParticleKind::Rock));
    }

    #[test]
    fn test_refuel_and_landing_rumble() {
        let mut arena = live_arena();
        arena.crafts[0].pos = Vec2::new(100.0, FLOOR_Y - 8.0);
        arena.crafts[0].fuel = 50.0;

        tick(&mut arena, &TickInput::default());
        assert!((arena.crafts[0].fuel - 51.5).abs() < 1e-4);
        assert!(has_event(
            &arena,
            GameEvent::Rumble {
                player: PlayerId::One,
                kind: Rumble::Landing
            }
        ));

        tick(&mut arena, &TickInput::default());
        assert!((arena.crafts[0].fuel - 53.0).abs() < 1e-4);
        assert!(!has_event(
            &arena,
            GameEvent::Rumble {
                player: PlayerId::One,
                kind: Rumble::Landing
            }
        ));
    }

    #[test]
    fn test_ammo_pad_reload_is_reported() {
        let mut arena = live_arena();
        arena.crafts[0].pos = Vec2::new(60.0, AMMO_PAD_Y - 8.0);
        arena.crafts[0].ammo = 3.0;

        tick(&mut arena, &TickInput::default());
        assert!((arena.crafts[0].ammo - 3.015).abs() < 1e-4);
        let snapshot = arena.snapshot();
        assert!(snapshot.crafts[0].reloading);
        assert!(!snapshot.crafts[1].reloading);
        assert!(has_event(
            &arena,
            GameEvent::Rumble {
                player: PlayerId::One,
                kind: Rumble::Landing
            }
        ));

        // Parked with a full magazine: no reload tone
        arena.crafts[0].ammo = 15.0;
        tick(&mut arena, &TickInput::default());
        assert_eq!(arena.crafts[0].ammo, 15.0);
        assert!(!arena.snapshot().crafts[0].reloading);
    }

    #[test]
    fn test_thrust_leaves_exhaust_only_with_fuel() {
        let thrust = |fuel: f32| {
            let mut arena = live_arena();
            arena.crafts[0].fuel = fuel;
            let mut input = TickInput::default();
            input.crafts[0].up = true;
            tick(&mut arena, &input);
            arena
                .effects
                .particles
                .iter()
                .filter(|p| p.kind == ParticleKind::Thrust)
                .count()
        };

        assert_eq!(thrust(100.0), 1);
        assert_eq!(thrust(0.0), 0);
    }

    #[test]
    fn test_haptics_off_suppresses_rumble() {
        let settings = Settings {
            haptics: false,
            ..Settings::default()
        };
        let mut arena = Arena::new(GameConfig::default(), settings, 1);
        arena.start_match();
        arena.state.round_state = RoundState::Playing;
        tick(&mut arena, &shoot(PlayerId::Two));
        assert!(has_event(&arena, GameEvent::Sound(SoundEffect::Shoot(PlayerId::Two))));
        assert!(
            !arena
                .events()
                .iter()
                .any(|e| matches!(e, GameEvent::Rumble { .. }))
        );
    }

    #[test]
    fn test_next_round_resets_world_but_not_score() {
        let mut arena = live_arena();
        arena.barrier.damage_block(crate::sim::BlockId { row: 3, col: 1 });
        arena.crafts[1].die();
        tick(&mut arena, &TickInput::default());
        assert_eq!(arena.state.round_state, RoundState::RoundEnd);

        for _ in 0..60 {
            tick(&mut arena, &TickInput::default());
        }
        assert_eq!(arena.state.round_state, RoundState::Countdown);
        assert_eq!(arena.state.round, 2);
        assert_eq!(arena.state.score, [1, 0]);
        assert_eq!(arena.barrier.total_hp(), 24 * 4 * 2);
        assert_eq!(arena.barrier.scroll_offset(), 0.0);
        assert!(arena.crafts.iter().all(|c| c.is_alive()));
        assert!(arena.effects.particles.is_empty());
        assert_eq!(arena.effects.shake, 0.0);
    }

    #[test]
    fn test_match_ends_at_threshold_and_restarts() {
        let mut arena = live_arena();
        arena.state.score = [2, 0];
        arena.crafts[1].die();
        tick(&mut arena, &TickInput::default());
        assert_eq!(arena.state.score, [3, 0]);
        assert_eq!(arena.state.round_state, RoundState::RoundEnd);

        for _ in 0..59 {
            tick(&mut arena, &TickInput::default());
        }
        assert_eq!(arena.state.round_state, RoundState::RoundEnd);
        tick(&mut arena, &TickInput::default());
        assert_eq!(arena.state.round_state, RoundState::MatchEnd);
        assert!(has_event(&arena, GameEvent::Sound(SoundEffect::MatchWin)));

        // Idle until restart, then straight into a new match
        tick(&mut arena, &TickInput::default());
        assert_eq!(arena.state.round_state, RoundState::MatchEnd);
        let start = TickInput {
            start: true,
            ..Default::default()
        };
        tick(&mut arena, &start);
        assert_eq!(arena.state.round_state, RoundState::Countdown);
        assert_eq!(arena.state.score, [0, 0]);
    }

    #[test]
    fn test_shake_decays_between_rounds() {
        let mut arena = arena();
        arena.start_match();
        arena.effects.shake = 10.0;
        arena.effects.shake_y = 2.0;
        tick(&mut arena, &TickInput::default());
        assert_eq!(arena.state.round_state, RoundState::Countdown);
        assert!((arena.effects.shake - 9.0).abs() < 1e-5);
        assert!((arena.effects.shake_y - 1.7).abs() < 1e-5);
    }

    #[test]
    fn test_determinism() {
        let mut a = arena();
        let mut b = arena();
        let start = TickInput {
            start: true,
            ..Default::default()
        };
        tick(&mut a, &start);
        tick(&mut b, &start);

        for i in 0..400u32 {
            let mut input = TickInput::default();
            input.crafts[0].up = i % 3 == 0;
            input.crafts[0].shoot = i % 20 == 0;
            input.crafts[1].left = i % 5 == 0;
            input.crafts[1].shoot = i % 25 == 0;
            tick(&mut a, &input);
            tick(&mut b, &input);
        }

        let snap_a = serde_json::to_string(&a.snapshot()).unwrap();
        let snap_b = serde_json::to_string(&b.snapshot()).unwrap();
        assert_eq!(snap_a, snap_b);
    }
}
