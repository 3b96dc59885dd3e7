//! The battlefield loop.
//!
//! [`Simulation`] owns every entity, the medic, the rescue loop and the
//! reinforcement timers, and advances them one tick per host frame.
//!
//! # Processing Order
//!
//! Each [`Simulation::step`] runs, in order:
//!
//! 1. **Input**: medic movement and grenade keys
//! 2. **AI**: every tank thinks in parallel against a frozen [`WorldView`];
//!    outputs are sorted by (tank id, sequence) and resolved (shell launches,
//!    AI events, tank repulsion)
//! 3. **Reinforcements**
//! 4. **Shell flight**: shells that reached their target distance explode
//! 5. **Effect expiry** (explosions, bursts, puffs)
//! 6. **Freeze grenades**: flight and fuse detonations
//! 7. **Pickups**: expiry, collection, spawning
//! 8. **Rescue loop**: bleed-out, pickup, delivery, respawn delays
//! 9. **Shell collisions**: canvas edge, direct tank hits, direct medic hits
//! 10. **Freeze zone expiry**
//! 11. **Screen-shake decay**
//!
//! # Determinism
//!
//! Given the same seed, config and sequence of `(timestamp, input)` pairs, a
//! simulation produces the same events. Tanks think in parallel but each one
//! only touches itself and draws from its own generator; everything else is
//! sequential and iterates entities in id order.
//!
//! # Example
//!
//! ```
//! use barrage_core::config::GameConfig;
//! use barrage_core::player::InputState;
//! use barrage_core::simulation::{Phase, Simulation};
//!
//! let mut sim = Simulation::new(GameConfig::default(), 42).expect("valid config");
//! assert_eq!(sim.phase(), Phase::Ready);
//!
//! sim.start();
//! for frame in 0..10u64 {
//!     sim.step(frame * 16, &InputState::idle());
//! }
//!
//! assert_eq!(sim.tick(), 10);
//! assert_eq!(sim.now_ms(), 144);
//! ```

use std::collections::BTreeMap;
use std::fmt;

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::ai::{think, AiContext};
use crate::arena::Arena;
use crate::audio::{self, AudioSink};
use crate::clock::{Millis, SimClock, TickContext};
use crate::config::GameConfig;
use crate::effects::{
    EffectKind, Effects, BURST_MS, EXPLOSION_MS, FREEZE_SHAKE, FREEZE_ZONE_MS, SHELL_SHAKE,
};
use crate::entity::{Entity, EntityId, EntityTag, Team};
use crate::error::ConfigError;
use crate::event::GameEvent;
use crate::grenade::{FreezeGrenade, PickupGrenade};
use crate::hud::{HudSink, HudSummary};
use crate::output::{sort_outputs, OutputEnvelope};
use crate::player::{GrenadeKey, InputKeys, InputState, Player};
use crate::profiles::{BuiltinProfiles, ProfileProvider};
use crate::resolver::{
    apply_area_damage, apply_area_freeze, default_resolvers, resolve_outputs, ResolveContext,
    Resolver,
};
use crate::snapshot::RenderSnapshot;
use crate::soldier::RescueFlow;
use crate::spawn::{deploy_armies, SpawnController};
use crate::world_view::WorldView;

// =============================================================================
// Phase
// =============================================================================

/// Lifecycle of a game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Phase {
    /// Built, waiting for `start`.
    #[default]
    Ready,
    /// Ticking.
    Running,
    /// Frozen by the host.
    Paused,
    /// The medic ran out of lives.
    GameOver,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ready => write!(f, "Ready"),
            Self::Running => write!(f, "Running"),
            Self::Paused => write!(f, "Paused"),
            Self::GameOver => write!(f, "GameOver"),
        }
    }
}

// =============================================================================
// Simulation
// =============================================================================

/// One game of tanks, medic and soldier.
pub struct Simulation {
    config: GameConfig,
    seed: u64,
    /// Master seed for tank generators in the current game.
    tank_seed: u64,
    rng: ChaCha8Rng,
    clock: SimClock,
    phase: Phase,
    arena: Arena,
    player: Player,
    lives: u32,
    rescue: RescueFlow,
    spawner: SpawnController,
    effects: Effects,
    /// Manual grenades waiting for their second key press.
    pending_grenades: BTreeMap<GrenadeKey, EntityId>,
    next_pickup_at: Millis,
    resolvers: Vec<Box<dyn Resolver>>,
    profiles: Box<dyn ProfileProvider>,
    audio: Option<Box<dyn AudioSink>>,
    hud: Option<Box<dyn HudSink>>,
}

impl fmt::Debug for Simulation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Simulation")
            .field("seed", &self.seed)
            .field("phase", &self.phase)
            .field("clock", &self.clock)
            .field("arena", &self.arena)
            .field("player", &self.player)
            .field("lives", &self.lives)
            .field("rescue", &self.rescue)
            .field("pending_grenades", &self.pending_grenades)
            .field("resolvers", &format!("[{} resolvers]", self.resolvers.len()))
            .field("audio", &self.audio.is_some())
            .field("hud", &self.hud.is_some())
            .finish_non_exhaustive()
    }
}

impl Simulation {
    /// Builds a game with the built-in soldier roster.
    ///
    /// # Errors
    ///
    /// Returns the first configuration problem found by
    /// [`GameConfig::validate`].
    pub fn new(config: GameConfig, seed: u64) -> Result<Self, ConfigError> {
        Self::with_profiles(config, seed, Box::new(BuiltinProfiles))
    }

    /// Builds a game that draws soldier profiles from `profiles`.
    ///
    /// # Errors
    ///
    /// Returns the first configuration problem found by
    /// [`GameConfig::validate`].
    pub fn with_profiles(
        config: GameConfig,
        seed: u64,
        profiles: Box<dyn ProfileProvider>,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let clock = SimClock::new(config.clock.max_frame_delta_ms);
        let rescue = RescueFlow::new(0, &config, profiles.as_ref(), &mut rng);
        let mut sim = Self {
            player: Player::new(&config),
            lives: config.rescue.lives,
            tank_seed: 0,
            rescue,
            spawner: SpawnController::new(0),
            effects: Effects::new(),
            pending_grenades: BTreeMap::new(),
            next_pickup_at: 0,
            arena: Arena::new(),
            phase: Phase::Ready,
            resolvers: default_resolvers(),
            audio: None,
            hud: None,
            clock,
            config,
            seed,
            rng,
            profiles,
        };
        sim.deploy(0);
        info!(seed, "simulation ready");
        Ok(sim)
    }

    /// Places the armies and arms the pickup timer at `now`.
    fn deploy(&mut self, now: Millis) {
        self.tank_seed = self.rng.gen();
        deploy_armies(&mut self.arena, &self.config, self.tank_seed, &mut self.rng);
        self.spawner = SpawnController::new(now);
        self.next_pickup_at = now + self.pickup_interval();
    }

    fn pickup_interval(&mut self) -> Millis {
        let pickup = &self.config.pickup;
        self.rng.gen_range(pickup.min_interval_ms..=pickup.max_interval_ms)
    }

    /// Sends cues and whistles to `sink` after every tick.
    pub fn set_audio_sink(&mut self, sink: Box<dyn AudioSink>) {
        self.audio = Some(sink);
    }

    /// Sends the HUD summary to `sink` after every tick.
    pub fn set_hud_sink(&mut self, sink: Box<dyn HudSink>) {
        self.hud = Some(sink);
    }

    // =========================================================================
    // Lifecycle
    // =========================================================================

    /// Starts a ready game or resumes a paused one.
    pub fn start(&mut self) {
        if matches!(self.phase, Phase::Ready | Phase::Paused) {
            self.clock.reanchor();
            self.phase = Phase::Running;
            info!(now = self.clock.now_ms(), "running");
        }
    }

    /// Pauses a running game. Time spent paused does not reach the timers.
    pub fn pause(&mut self) {
        if self.phase == Phase::Running {
            self.phase = Phase::Paused;
            info!(now = self.clock.now_ms(), "paused");
        }
    }

    /// Throws away the battlefield and starts a fresh game.
    ///
    /// The config is kept, and the random stream continues, so consecutive
    /// games differ while staying reproducible from the construction seed.
    /// Returns a `WhistleStopped` for every shell still whistling when the
    /// old battlefield was dropped; the sinks receive them too.
    pub fn restart(&mut self) -> Vec<GameEvent> {
        let now = self.clock.now_ms();
        let mut events = Vec::new();
        self.silence_shells(&mut events);
        self.arena.clear();
        self.effects.clear();
        self.pending_grenades.clear();
        self.player = Player::new(&self.config);
        self.lives = self.config.rescue.lives;
        self.rescue = RescueFlow::new(now, &self.config, self.profiles.as_ref(), &mut self.rng);
        self.deploy(now);
        self.clock.reanchor();
        self.phase = Phase::Running;
        info!(now, "restarted");
        self.publish(&events);
        events
    }

    // =========================================================================
    // Tick
    // =========================================================================

    /// Advances one frame given the host timestamp and the current input.
    ///
    /// Returns the events of the tick in the order they happened. Does
    /// nothing unless the game is running.
    pub fn step(&mut self, raw_now: Millis, input: &InputState) -> Vec<GameEvent> {
        if self.phase != Phase::Running {
            return Vec::new();
        }
        let time = self.clock.advance(raw_now);
        let now = time.now_ms;
        let mut events = Vec::new();

        self.player.update(input, &self.config.arena);
        self.handle_input(input, now, &mut events);

        events.extend(self.run_ai(time));

        events.extend(self.spawner.update(
            now,
            &mut self.arena,
            self.rescue.rescues(),
            &self.config,
            self.tank_seed,
            &mut self.rng,
        ));

        self.update_shells(now, &mut events);
        self.effects.expire(
            now,
            &[EffectKind::Explosion, EffectKind::FreezeBurst, EffectKind::Puff],
        );
        self.update_grenades(now, &mut events);
        self.update_pickups(now, &mut events);

        events.extend(self.rescue.update(
            now,
            &mut self.player,
            &self.config,
            self.profiles.as_ref(),
            &mut self.rng,
        ));

        self.check_shell_collisions(now, &mut events);
        self.effects.expire(now, &[EffectKind::FreezeZone]);
        self.effects.decay_shake();

        self.publish(&events);
        events
    }

    fn run_ai(&mut self, time: TickContext) -> Vec<GameEvent> {
        let view = WorldView::capture(&self.arena, time.tick);
        let config = &self.config;
        let mut outputs: Vec<OutputEnvelope> = self
            .arena
            .par_map_tanks(|id, tank| {
                let ctx = AiContext::new(id, time, config);
                OutputEnvelope::wrap_all(think(tank, &ctx, &view), id, time.tick)
            })
            .into_iter()
            .flatten()
            .collect();
        sort_outputs(&mut outputs);
        let ctx = ResolveContext::new(time, &self.config);
        resolve_outputs(&self.resolvers, &outputs, &ctx, &mut self.arena)
    }

    fn publish(&mut self, events: &[GameEvent]) {
        if let Some(sink) = self.audio.as_mut() {
            audio::dispatch(events, sink.as_mut());
        }
        if self.hud.is_some() {
            let summary = self.hud_summary();
            if let Some(sink) = self.hud.as_mut() {
                sink.update(&summary);
            }
        }
    }

    // =========================================================================
    // Grenades
    // =========================================================================

    fn handle_input(&mut self, input: &InputState, now: Millis, events: &mut Vec<GameEvent>) {
        for key in GrenadeKey::ALL {
            if input.pressed.contains(key.input()) {
                self.grenade_key(key, key.direction(), now, events);
            }
        }
        if input.pressed.contains(InputKeys::THROW_DEFAULT) {
            let direction = self.player.default_throw_direction();
            self.throw_grenade(direction, false, now, events);
        }
    }

    /// Handles a directional grenade key at the current time.
    ///
    /// The first press throws a manual grenade along `direction`; the next
    /// press of the same key detonates it.
    pub fn handle_grenade_key(&mut self, key: GrenadeKey, direction: Vec2) -> Vec<GameEvent> {
        let mut events = Vec::new();
        if self.phase == Phase::Running {
            let now = self.clock.now_ms();
            self.grenade_key(key, direction, now, &mut events);
        }
        events
    }

    fn grenade_key(&mut self, key: GrenadeKey, direction: Vec2, now: Millis, events: &mut Vec<GameEvent>) {
        if let Some(&pending) = self.pending_grenades.get(&key) {
            self.pending_grenades.remove(&key);
            self.detonate_grenade(pending, now, events);
        } else if let Some(grenade) = self.throw_grenade(direction, true, now, events) {
            self.pending_grenades.insert(key, grenade);
        }
    }

    fn throw_grenade(
        &mut self,
        direction: Vec2,
        manual: bool,
        now: Millis,
        events: &mut Vec<GameEvent>,
    ) -> Option<EntityId> {
        let direction = self.player.throw(now, direction)?;
        let grenade = FreezeGrenade::throw(self.player.position, direction, now, &self.config.grenade, manual);
        let id = self.arena.spawn_freeze_grenade(grenade);
        let remaining = self.player.grenades();
        info!(grenade = %id, manual, remaining, "grenade thrown");
        events.push(GameEvent::GrenadeThrown {
            grenade: id,
            manual,
            remaining,
        });
        Some(id)
    }

    fn update_grenades(&mut self, now: Millis, events: &mut Vec<GameEvent>) {
        for id in self.arena.ids_with_tag(EntityTag::FreezeGrenade) {
            let Some(grenade) = self.arena.freeze_grenade_mut(id) else {
                continue;
            };
            grenade.update();
            if grenade.fuse_expired(now) {
                self.detonate_grenade(id, now, events);
            }
        }
    }

    fn detonate_grenade(&mut self, id: EntityId, now: Millis, events: &mut Vec<GameEvent>) {
        let Some(grenade) = self.arena.freeze_grenade_mut(id) else {
            return;
        };
        if !grenade.detonate() {
            return;
        }
        let position = grenade.position();
        let radius = grenade.radius();
        self.arena.despawn(id);
        self.pending_grenades.retain(|_, pending| *pending != id);

        let duration_ms = self.config.rescue.freeze_duration_ms(self.rescue.rescues());
        let frozen = apply_area_freeze(&mut self.arena, position, radius, now, duration_ms);
        self.effects.add(EffectKind::FreezeBurst, position, radius, now, BURST_MS);
        self.effects.add(EffectKind::FreezeZone, position, radius, now, FREEZE_ZONE_MS);
        self.effects.shake(FREEZE_SHAKE);
        info!(grenade = %id, frozen, duration_ms, "freeze grenade detonated");
        events.push(GameEvent::GrenadeDetonated {
            grenade: id,
            position,
            frozen,
            duration_ms,
        });
    }

    // =========================================================================
    // Pickups
    // =========================================================================

    fn update_pickups(&mut self, now: Millis, events: &mut Vec<GameEvent>) {
        let collector = self.player.position;
        let collector_size = self.player.size();
        for id in self.arena.ids_with_tag(EntityTag::Pickup) {
            let Some(pickup) = self.arena.pickup_mut(id) else {
                continue;
            };
            let position = pickup.position();
            let size = pickup.size();
            if pickup.update(now) {
                self.arena.despawn(id);
                self.effects.add(EffectKind::Puff, position, size * 2.0, now, BURST_MS);
                debug!(pickup = %id, "pickup expired");
                events.push(GameEvent::PickupExpired { pickup: id });
            } else if pickup.in_pickup_range(collector, collector_size) {
                self.arena.despawn(id);
                let grenades = self.player.add_grenade();
                self.effects.add(EffectKind::Puff, position, size * 2.0, now, BURST_MS);
                info!(pickup = %id, grenades, "pickup collected");
                events.push(GameEvent::PickupCollected { pickup: id, grenades });
            }
        }

        if now < self.next_pickup_at {
            return;
        }
        if self.arena.pickup_count() < self.config.pickup.max_alive {
            let arena = &self.config.arena;
            let margin = self.config.pickup.edge_margin;
            let span = (arena.height - 2.0 * margin).max(0.0);
            let position = Vec2::new(arena.channel_center(), margin + self.rng.gen::<f32>() * span);
            let pickup = self
                .arena
                .spawn_pickup(PickupGrenade::with_config(position, now, &self.config.pickup));
            debug!(%pickup, y = position.y, "pickup spawned");
            events.push(GameEvent::PickupSpawned { pickup, position });
        }
        self.next_pickup_at = now + self.pickup_interval();
    }

    // =========================================================================
    // Shells
    // =========================================================================

    fn update_shells(&mut self, now: Millis, events: &mut Vec<GameEvent>) {
        for id in self.arena.ids_with_tag(EntityTag::Shell) {
            let Some(shell) = self.arena.shell_mut(id) else {
                continue;
            };
            shell.update();
            if shell.has_reached_target() {
                let at = shell.position();
                self.detonate_shell(id, at, now, events);
            }
        }
    }

    fn check_shell_collisions(&mut self, now: Millis, events: &mut Vec<GameEvent>) {
        for id in self.arena.ids_with_tag(EntityTag::Shell) {
            if self.phase == Phase::GameOver {
                return;
            }
            let Some(shell) = self.arena.get(id).and_then(Entity::as_shell) else {
                continue;
            };
            let at = if shell.is_out_of_bounds(&self.config.arena) {
                Some(shell.position())
            } else {
                self.arena
                    .tanks()
                    .find(|(_, t)| t.team() != shell.team() && shell.touches(t.position, t.size()))
                    .map(|(_, t)| t.position)
                    .or_else(|| {
                        let player = &self.player;
                        (!self.config.arena.in_safe_zone(player.position)
                            && shell.touches(player.position, player.size()))
                        .then_some(player.position)
                    })
            };
            if let Some(at) = at {
                self.detonate_shell(id, at, now, events);
            }
        }
    }

    fn detonate_shell(&mut self, id: EntityId, at: Vec2, now: Millis, events: &mut Vec<GameEvent>) {
        let Some(shell) = self.arena.shell_mut(id) else {
            return;
        };
        let whistle_stopped = shell.stop_whistle();
        let owner = shell.owner();
        let team = shell.team();
        let radius = shell.explosion_radius();
        self.arena.despawn(id);

        if whistle_stopped {
            events.push(GameEvent::WhistleStopped { shell: id });
        }
        if let Some(tank) = self.arena.tank_mut(owner) {
            tank.clear_active_shell();
        }
        self.effects.add(EffectKind::Explosion, at, radius, now, EXPLOSION_MS);
        self.effects.shake(SHELL_SHAKE);
        debug!(shell = %id, %team, x = at.x, y = at.y, "shell exploded");
        events.push(GameEvent::ShellExploded {
            shell: id,
            position: at,
            radius,
        });

        events.extend(apply_area_damage(&mut self.arena, at, radius, team, now));

        if !self.config.arena.in_safe_zone(self.player.position)
            && self.player.position.distance(at) <= radius
        {
            self.hit_player(now, events);
        }
    }

    /// Stops the whistle of every shell left in flight.
    fn silence_shells(&mut self, events: &mut Vec<GameEvent>) {
        for id in self.arena.ids_with_tag(EntityTag::Shell) {
            if self.arena.shell_mut(id).is_some_and(|shell| shell.stop_whistle()) {
                events.push(GameEvent::WhistleStopped { shell: id });
            }
        }
    }

    fn hit_player(&mut self, now: Millis, events: &mut Vec<GameEvent>) {
        if self.phase == Phase::GameOver {
            return;
        }
        self.lives = self.lives.saturating_sub(1);
        info!(lives = self.lives, "medic hit");
        events.push(GameEvent::PlayerHit { lives: self.lives });

        if self.lives == 0 {
            let rescues = self.rescue.rescues();
            self.phase = Phase::GameOver;
            info!(rescues, "game over");
            events.push(GameEvent::GameOver { rescues });
            self.silence_shells(events);
            return;
        }
        if let Some(event) = self.rescue.lose_carried(now) {
            events.push(event);
        }
        self.player.respawn(&self.config);
    }

    // =========================================================================
    // Views
    // =========================================================================

    /// Numbers for the score display.
    #[must_use]
    pub fn hud_summary(&self) -> HudSummary {
        let now = self.clock.now_ms();
        let rescues = self.rescue.rescues();
        let counts = Team::ALL.map(|team| self.arena.tank_count(team));
        let mut next_spawn_secs = [0; 2];
        for (slot, team) in Team::ALL.into_iter().enumerate() {
            next_spawn_secs[slot] = self.spawner.seconds_until_spawn(
                team,
                now,
                counts[slot],
                rescues,
                &self.config.spawn,
            );
        }
        HudSummary {
            phase: self.phase,
            lives: self.lives,
            rescues,
            grenades: self.player.grenades(),
            tanks: counts,
            next_spawn_secs,
        }
    }

    /// Everything needed to draw the current frame.
    #[must_use]
    pub fn snapshot(&self) -> RenderSnapshot {
        RenderSnapshot::capture(
            &self.arena,
            &self.player,
            &self.rescue,
            &self.effects,
            self.clock.now_ms(),
        )
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// Lifecycle phase.
    #[must_use]
    pub const fn phase(&self) -> Phase {
        self.phase
    }

    /// Ticks run so far.
    #[must_use]
    pub const fn tick(&self) -> u64 {
        self.clock.ticks()
    }

    /// Current simulation time.
    #[must_use]
    pub const fn now_ms(&self) -> Millis {
        self.clock.now_ms()
    }

    /// The seed this simulation was built with.
    #[must_use]
    pub const fn seed(&self) -> u64 {
        self.seed
    }

    /// The active configuration.
    #[must_use]
    pub const fn config(&self) -> &GameConfig {
        &self.config
    }

    /// Tanks, shells, grenades and pickups.
    #[must_use]
    pub const fn arena(&self) -> &Arena {
        &self.arena
    }

    /// Mutable battlefield, for scripted scenarios.
    pub fn arena_mut(&mut self) -> &mut Arena {
        &mut self.arena
    }

    /// The medic.
    #[must_use]
    pub const fn player(&self) -> &Player {
        &self.player
    }

    /// Mutable medic, for scripted scenarios.
    pub fn player_mut(&mut self) -> &mut Player {
        &mut self.player
    }

    /// Medic lives left.
    #[must_use]
    pub const fn lives(&self) -> u32 {
        self.lives
    }

    /// The rescue loop.
    #[must_use]
    pub const fn rescue(&self) -> &RescueFlow {
        &self.rescue
    }

    /// Visual effects and screen shake.
    #[must_use]
    pub const fn effects(&self) -> &Effects {
        &self.effects
    }

    /// The manual grenade waiting on `key`, if any.
    #[must_use]
    pub fn pending_grenade(&self, key: GrenadeKey) -> Option<EntityId> {
        self.pending_grenades.get(&key).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn running(seed: u64) -> Simulation {
        let mut sim = Simulation::new(GameConfig::default(), seed).expect("default config");
        sim.start();
        sim.step(0, &InputState::idle());
        sim
    }

    mod lifecycle_tests {
        use super::*;

        #[test]
        fn rejects_invalid_config() {
            let mut config = GameConfig::default();
            config.arena.width = -1.0;
            assert!(Simulation::new(config, 1).is_err());
        }

        #[test]
        fn builds_armies_and_soldier() {
            let sim = Simulation::new(GameConfig::default(), 7).expect("default config");
            assert_eq!(sim.arena().tank_count(Team::Left), 5);
            assert_eq!(sim.arena().tank_count(Team::Right), 5);
            assert!(sim.rescue().soldier().is_some());
            assert_eq!(sim.lives(), 3);
            assert_eq!(sim.phase(), Phase::Ready);
        }

        #[test]
        fn step_is_noop_unless_running() {
            let mut sim = Simulation::new(GameConfig::default(), 7).expect("default config");
            assert!(sim.step(0, &InputState::idle()).is_empty());
            assert_eq!(sim.tick(), 0);

            sim.start();
            sim.step(0, &InputState::idle());
            sim.pause();
            sim.step(16, &InputState::idle());
            assert_eq!(sim.tick(), 1);
            assert_eq!(sim.phase(), Phase::Paused);
        }

        #[test]
        fn pause_does_not_advance_time() {
            let mut sim = running(7);
            sim.step(16, &InputState::idle());
            sim.pause();
            sim.start();
            sim.step(60_000, &InputState::idle());
            assert_eq!(sim.now_ms(), 16);
        }

        #[test]
        fn restart_rebuilds_world() {
            let mut sim = running(7);
            sim.arena_mut().clear();
            sim.player_mut().position.y = 400.0;
            assert!(sim.restart().is_empty());
            assert_eq!(sim.phase(), Phase::Running);
            assert_eq!(sim.arena().tank_count(Team::Left), 5);
            assert!((sim.player().position.y - 30.0).abs() < 0.0001);
            assert_eq!(sim.lives(), 3);
        }

        #[test]
        fn simulation_is_send() {
            fn assert_send<T: Send>() {}
            assert_send::<Simulation>();
        }
    }

    mod grenade_tests {
        use super::*;

        #[test]
        fn second_press_detonates_manual_grenade() {
            let mut sim = running(3);
            let events = sim.step(16, &InputState::pressing(InputKeys::THROW_DOWN));
            let thrown = events.iter().find_map(|e| match e {
                GameEvent::GrenadeThrown { grenade, manual: true, remaining: 2 } => Some(*grenade),
                _ => None,
            });
            let thrown = thrown.expect("grenade thrown");
            assert_eq!(sim.pending_grenade(GrenadeKey::Down), Some(thrown));

            let events = sim.step(32, &InputState::pressing(InputKeys::THROW_DOWN));
            assert!(events
                .iter()
                .any(|e| matches!(e, GameEvent::GrenadeDetonated { grenade, .. } if *grenade == thrown)));
            assert_eq!(sim.pending_grenade(GrenadeKey::Down), None);
            assert!(!sim.arena().contains(thrown));
        }

        #[test]
        fn fuse_clears_pending_key() {
            let mut sim = running(3);
            sim.step(16, &InputState::pressing(InputKeys::THROW_LEFT));
            assert!(sim.pending_grenade(GrenadeKey::Left).is_some());
            let mut detonated = false;
            for frame in 2..80u64 {
                let events = sim.step(frame * 16, &InputState::idle());
                detonated |= events
                    .iter()
                    .any(|e| matches!(e, GameEvent::GrenadeDetonated { .. }));
            }
            assert!(detonated);
            assert_eq!(sim.pending_grenade(GrenadeKey::Left), None);
        }

        #[test]
        fn default_throw_goes_down_when_empty_handed() {
            let mut sim = running(3);
            let events = sim.step(16, &InputState::pressing(InputKeys::THROW_DEFAULT));
            assert!(events
                .iter()
                .any(|e| matches!(e, GameEvent::GrenadeThrown { manual: false, .. })));
            let grenade = sim.snapshot().grenades[0];
            assert!(grenade.position.y > sim.player().position.y);
        }

        #[test]
        fn grenade_key_throws_along_given_direction() {
            let mut sim = running(3);
            let events = sim.handle_grenade_key(GrenadeKey::Right, Vec2::X);
            let grenade = events
                .iter()
                .find_map(|e| match e {
                    GameEvent::GrenadeThrown { grenade, .. } => Some(*grenade),
                    _ => None,
                })
                .expect("grenade thrown");
            let state = sim
                .arena()
                .get(grenade)
                .and_then(Entity::as_freeze_grenade)
                .expect("grenade in arena");
            assert!(state.is_manual());
            assert!(state.velocity().x > 0.0);
            assert!(state.velocity().y.abs() < 0.0001);
            assert_eq!(sim.pending_grenade(GrenadeKey::Right), Some(grenade));
        }

        #[test]
        fn grenade_key_ignored_while_paused() {
            let mut sim = running(3);
            sim.pause();
            assert!(sim.handle_grenade_key(GrenadeKey::Up, Vec2::NEG_Y).is_empty());
            assert_eq!(sim.player().grenades(), 3);
        }

        #[test]
        fn cooldown_blocks_rapid_throws() {
            let mut sim = running(3);
            sim.step(16, &InputState::pressing(InputKeys::THROW_DEFAULT));
            let events = sim.step(32, &InputState::pressing(InputKeys::THROW_UP));
            assert!(!events
                .iter()
                .any(|e| matches!(e, GameEvent::GrenadeThrown { .. })));
            assert_eq!(sim.player().grenades(), 2);
        }
    }

    mod hud_tests {
        use super::*;

        #[test]
        fn summary_reflects_state() {
            let sim = running(5);
            let summary = sim.hud_summary();
            assert_eq!(summary.phase, Phase::Running);
            assert_eq!(summary.lives, 3);
            assert_eq!(summary.grenades, 3);
            assert_eq!(summary.tanks, [5, 5]);
            assert_eq!(summary.next_spawn_secs, [20, 20]);
        }
    }
}
