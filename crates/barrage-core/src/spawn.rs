//! Army setup and reinforcements.
//!
//! Both armies start with one tank per roster entry, scattered over their
//! home half by rejection sampling. During play each team gets reinforcements
//! on its own timer: the fewer tanks a team has left, the sooner the next one
//! arrives, and every completed rescue shortens the wait for both sides.
//!
//! | Tanks left | Interval |
//! |---|---|
//! | 0 | `min_interval_ms` |
//! | 1 | `one_tank_ms` |
//! | 2 | `two_tank_ms` |
//! | n >= 3 | `min(max_interval_ms, base_interval_ms + (n - 3) * per_extra_tank_ms)` |
//!
//! The result is reduced by `rescue_accel_ms` per rescue, never below
//! `min_interval_ms`.
//!
//! Reinforcements appear in a narrow strip along the team's outer edge. When
//! no free spot is found the spawn is deferred and retried `retry_ms` later
//! instead of waiting a full interval.
//!
//! # Example
//!
//! ```
//! use barrage_core::config::SpawnConfig;
//! use barrage_core::spawn::spawn_interval_ms;
//!
//! let config = SpawnConfig::default();
//! assert_eq!(spawn_interval_ms(0, 0, &config), 2000);
//! assert_eq!(spawn_interval_ms(4, 0, &config), 18000);
//! assert_eq!(spawn_interval_ms(4, 3, &config), 15000);
//! ```

use glam::Vec2;
use rand::Rng;
use tracing::{debug, info};

use crate::arena::Arena;
use crate::clock::Millis;
use crate::config::{GameConfig, SpawnConfig};
use crate::entity::{Entity, EntityId, Team};
use crate::event::GameEvent;
use crate::personality::Personality;
use crate::tank::{derive_seed, Tank};

// =============================================================================
// Cadence
// =============================================================================

/// Reinforcement interval for a team with `active` tanks after `rescues`
/// completed rescues.
#[must_use]
pub fn spawn_interval_ms(active: usize, rescues: u32, config: &SpawnConfig) -> Millis {
    let by_count = match active {
        0 => config.min_interval_ms,
        1 => config.one_tank_ms,
        2 => config.two_tank_ms,
        n => {
            let extra = u64::try_from(n - 3).unwrap_or(u64::MAX);
            config
                .base_interval_ms
                .saturating_add(extra.saturating_mul(config.per_extra_tank_ms))
                .min(config.max_interval_ms)
        }
    };
    by_count
        .saturating_sub(u64::from(rescues).saturating_mul(config.rescue_accel_ms))
        .max(config.min_interval_ms)
}

// =============================================================================
// Placement
// =============================================================================

/// Axis-aligned sampling box.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Bounds {
    min: Vec2,
    max: Vec2,
}

impl Bounds {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Vec2 {
        Vec2::new(
            self.min.x + rng.gen::<f32>() * (self.max.x - self.min.x),
            self.min.y + rng.gen::<f32>() * (self.max.y - self.min.y),
        )
    }
}

fn army_bounds(team: Team, config: &GameConfig) -> Bounds {
    let arena = &config.arena;
    let margin = config.spawn.army_margin;
    let (min_x, max_x) = match team {
        Team::Left => (margin, arena.channel_left() - margin),
        Team::Right => (arena.channel_right() + margin, arena.width - margin),
    };
    Bounds {
        min: Vec2::new(min_x, margin),
        max: Vec2::new(max_x, arena.height - margin),
    }
}

fn strip_bounds(team: Team, config: &GameConfig) -> Bounds {
    let arena = &config.arena;
    let spawn = &config.spawn;
    let (min_x, max_x) = match team {
        Team::Left => (spawn.edge_inset, spawn.strip_depth),
        Team::Right => (arena.width - spawn.strip_depth, arena.width - spawn.edge_inset),
    };
    Bounds {
        min: Vec2::new(min_x, arena.safe_zone_height),
        max: Vec2::new(max_x, arena.height),
    }
}

/// Looks for a free reinforcement spot on `team`'s outer edge.
///
/// Returns `None` if every attempt landed within `size * spacing_factor` of
/// an existing tank.
pub fn find_spawn_position<R: Rng + ?Sized>(
    arena: &Arena,
    team: Team,
    config: &GameConfig,
    rng: &mut R,
) -> Option<Vec2> {
    let bounds = strip_bounds(team, config);
    let spacing = config.tank.size * config.spawn.spacing_factor;
    (0..config.spawn.attempts)
        .map(|_| bounds.sample(rng))
        .find(|&pos| !arena.is_position_occupied(pos, spacing))
}

fn spawn_tank(
    arena: &mut Arena,
    pos: Vec2,
    team: Team,
    personality: Personality,
    config: &GameConfig,
    master_seed: u64,
) -> EntityId {
    arena.spawn_with(|id| {
        Entity::tank(
            id,
            Tank::new(pos, team, personality, config, derive_seed(master_seed, id)),
        )
    })
}

/// Places both starting armies, left team first.
///
/// Each tank gets `army_attempts` tries to land clear of the tanks placed
/// before it; if all fail it takes the last sampled spot anyway.
pub fn deploy_armies<R: Rng + ?Sized>(
    arena: &mut Arena,
    config: &GameConfig,
    master_seed: u64,
    rng: &mut R,
) -> Vec<EntityId> {
    let spacing = config.tank.size * config.spawn.army_spacing_factor;
    let mut placed = Vec::with_capacity(config.spawn.roster.len() * 2);
    for team in Team::ALL {
        let bounds = army_bounds(team, config);
        for &personality in &config.spawn.roster {
            let mut pos = bounds.sample(rng);
            let mut attempts = 1;
            while attempts < config.spawn.army_attempts && arena.is_position_occupied(pos, spacing) {
                pos = bounds.sample(rng);
                attempts += 1;
            }
            let id = spawn_tank(arena, pos, team, personality, config, master_seed);
            debug!(tank = %id, %team, %personality, attempts, "army tank placed");
            placed.push(id);
        }
    }
    info!(
        left = arena.tank_count(Team::Left),
        right = arena.tank_count(Team::Right),
        "armies deployed"
    );
    placed
}

// =============================================================================
// Controller
// =============================================================================

/// Per-team reinforcement timers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpawnController {
    last_spawn: [Millis; 2],
}

const fn slot(team: Team) -> usize {
    match team {
        Team::Left => 0,
        Team::Right => 1,
    }
}

impl SpawnController {
    /// Starts both timers at `now`.
    #[must_use]
    pub const fn new(now: Millis) -> Self {
        Self {
            last_spawn: [now, now],
        }
    }

    /// When `team`'s timer last restarted.
    #[must_use]
    pub const fn last_spawn(&self, team: Team) -> Millis {
        self.last_spawn[slot(team)]
    }

    /// Spawns at most one reinforcement per team whose timer has run out.
    pub fn update<R: Rng + ?Sized>(
        &mut self,
        now: Millis,
        arena: &mut Arena,
        rescues: u32,
        config: &GameConfig,
        master_seed: u64,
        rng: &mut R,
    ) -> Vec<GameEvent> {
        let mut events = Vec::new();
        for team in Team::ALL {
            let active = arena.tank_count(team);
            let interval = spawn_interval_ms(active, rescues, &config.spawn);
            let last = self.last_spawn[slot(team)];
            if now.saturating_sub(last) < interval {
                continue;
            }
            match find_spawn_position(arena, team, config, rng) {
                Some(pos) => {
                    let personality = Personality::random(rng);
                    let tank = spawn_tank(arena, pos, team, personality, config, master_seed);
                    self.last_spawn[slot(team)] = now;
                    info!(%tank, %team, %personality, active = active + 1, "reinforcement arrived");
                    events.push(GameEvent::TankSpawned {
                        tank,
                        team,
                        personality,
                    });
                }
                None => {
                    self.last_spawn[slot(team)] =
                        (now + config.spawn.retry_ms).saturating_sub(interval);
                    debug!(%team, "no room for reinforcement, retrying");
                    events.push(GameEvent::SpawnDeferred { team });
                }
            }
        }
        events
    }

    /// Whole seconds until `team`'s next reinforcement, rounded up.
    #[must_use]
    pub fn seconds_until_spawn(
        &self,
        team: Team,
        now: Millis,
        active: usize,
        rescues: u32,
        config: &SpawnConfig,
    ) -> u64 {
        let interval = spawn_interval_ms(active, rescues, config);
        let elapsed = now.saturating_sub(self.last_spawn[slot(team)]);
        interval.saturating_sub(elapsed).div_ceil(1000)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    mod interval_tests {
        use super::*;

        #[test]
        fn fewer_tanks_spawn_faster() {
            let config = SpawnConfig::default();
            assert_eq!(spawn_interval_ms(0, 0, &config), 2000);
            assert_eq!(spawn_interval_ms(1, 0, &config), 6000);
            assert_eq!(spawn_interval_ms(2, 0, &config), 10000);
            assert_eq!(spawn_interval_ms(3, 0, &config), 15000);
            assert_eq!(spawn_interval_ms(5, 0, &config), 20000);
            assert_eq!(spawn_interval_ms(50, 0, &config), 20000);
        }

        #[test]
        fn rescues_accelerate_down_to_floor() {
            let config = SpawnConfig::default();
            assert_eq!(spawn_interval_ms(3, 4, &config), 11000);
            assert_eq!(spawn_interval_ms(3, 13, &config), 2000);
            assert_eq!(spawn_interval_ms(3, 100, &config), 2000);
            assert_eq!(spawn_interval_ms(0, 5, &config), 2000);
        }

        proptest! {
            #[test]
            fn interval_stays_in_bounds(active in 0usize..100, rescues in 0u32..1000) {
                let config = SpawnConfig::default();
                let interval = spawn_interval_ms(active, rescues, &config);
                prop_assert!(interval >= config.min_interval_ms);
                prop_assert!(interval <= config.max_interval_ms);
            }
        }
    }

    mod placement_tests {
        use super::*;

        #[test]
        fn armies_stay_in_home_halves() {
            let config = GameConfig::default();
            let mut arena = Arena::new();
            let mut rng = ChaCha8Rng::seed_from_u64(11);
            let placed = deploy_armies(&mut arena, &config, 11, &mut rng);

            assert_eq!(placed.len(), 10);
            assert_eq!(arena.tank_count(Team::Left), 5);
            assert_eq!(arena.tank_count(Team::Right), 5);
            for (_, tank) in arena.tanks() {
                match tank.team() {
                    Team::Left => assert!(tank.position.x <= config.arena.channel_left() - 50.0),
                    Team::Right => assert!(tank.position.x >= config.arena.channel_right() + 50.0),
                }
                assert!(tank.position.y >= 50.0 && tank.position.y <= 550.0);
            }
        }

        #[test]
        fn roster_sets_personalities() {
            let config = GameConfig::default();
            let mut arena = Arena::new();
            let mut rng = ChaCha8Rng::seed_from_u64(3);
            deploy_armies(&mut arena, &config, 3, &mut rng);
            let left: Vec<Personality> = arena.team_tanks(Team::Left).map(|(_, t)| t.personality()).collect();
            assert_eq!(left, config.spawn.roster);
        }

        #[test]
        fn spawn_strip_is_on_outer_edge() {
            let config = GameConfig::default();
            let arena = Arena::new();
            let mut rng = ChaCha8Rng::seed_from_u64(5);
            for _ in 0..50 {
                let left = find_spawn_position(&arena, Team::Left, &config, &mut rng).expect("empty arena");
                assert!((10.0..=80.0).contains(&left.x));
                assert!(left.y >= 50.0);
                let right = find_spawn_position(&arena, Team::Right, &config, &mut rng).expect("empty arena");
                assert!((920.0..=990.0).contains(&right.x));
            }
        }
    }

    mod controller_tests {
        use super::*;

        fn crowded_strip(config: &GameConfig) -> Arena {
            let mut arena = Arena::new();
            let mut y = 40.0;
            while y <= 620.0 {
                for x in [15.0, 45.0, 75.0] {
                    spawn_tank(&mut arena, Vec2::new(x, y), Team::Left, Personality::Sniper, config, 0);
                }
                y += 30.0;
            }
            arena
        }

        #[test]
        fn empty_team_reinforces_after_minimum() {
            let config = GameConfig::default();
            let mut arena = Arena::new();
            let mut rng = ChaCha8Rng::seed_from_u64(1);
            let mut controller = SpawnController::new(0);

            assert!(controller.update(1999, &mut arena, 0, &config, 1, &mut rng).is_empty());
            let events = controller.update(2000, &mut arena, 0, &config, 1, &mut rng);
            assert_eq!(events.len(), 2);
            assert!(matches!(events[0], GameEvent::TankSpawned { team: Team::Left, .. }));
            assert!(matches!(events[1], GameEvent::TankSpawned { team: Team::Right, .. }));
            assert_eq!(controller.last_spawn(Team::Left), 2000);
        }

        #[test]
        fn blocked_spawn_retries_after_a_second() {
            let config = GameConfig::default();
            let mut arena = crowded_strip(&config);
            let left = arena.tank_count(Team::Left);
            let mut rng = ChaCha8Rng::seed_from_u64(1);
            let mut controller = SpawnController::new(0);
            let interval = spawn_interval_ms(left, 0, &config.spawn);

            let events = controller.update(interval, &mut arena, 0, &config, 1, &mut rng);
            assert!(events.contains(&GameEvent::SpawnDeferred { team: Team::Left }));
            assert_eq!(
                controller.seconds_until_spawn(Team::Left, interval, left, 0, &config.spawn),
                1
            );
        }

        #[test]
        fn hud_seconds_round_up() {
            let config = SpawnConfig::default();
            let controller = SpawnController::new(0);
            assert_eq!(controller.seconds_until_spawn(Team::Right, 0, 3, 0, &config), 15);
            assert_eq!(controller.seconds_until_spawn(Team::Right, 14_001, 3, 0, &config), 1);
            assert_eq!(controller.seconds_until_spawn(Team::Right, 16_000, 3, 0, &config), 0);
        }
    }
}
