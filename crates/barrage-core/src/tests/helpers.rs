//! Test helpers for setting up battlefields and driving the simulation.
//!
//! Simulations built here are driven at a fixed 16 ms frame, with the raw
//! host timestamp equal to `tick * FRAME_MS`, so simulation time always
//! equals raw time in these tests.

use glam::Vec2;

use crate::clock::Millis;
use crate::config::GameConfig;
use crate::entity::{Entity, EntityId, Team};
use crate::event::GameEvent;
use crate::personality::Personality;
use crate::player::InputState;
use crate::shell::{Shell, ShellLaunch};
use crate::simulation::Simulation;
use crate::tank::{derive_seed, Tank};

/// Frame length used by every scenario.
pub const FRAME_MS: Millis = 16;

// =============================================================================
// Setup
// =============================================================================

/// Default tuning with reinforcements pushed out of reach of any test.
pub fn quiet_config() -> GameConfig {
    let mut config = GameConfig::default();
    config.spawn.min_interval_ms = 600_000;
    config.spawn.max_interval_ms = 600_000;
    config
}

/// A started simulation that has run its first (time 0) tick.
pub fn running_sim(config: GameConfig, seed: u64) -> Simulation {
    let mut sim = Simulation::new(config, seed).expect("valid config");
    sim.start();
    step_frame(&mut sim, &InputState::idle());
    sim
}

/// A running simulation with no tanks and no reinforcements.
pub fn empty_battlefield(seed: u64) -> Simulation {
    let mut sim = running_sim(quiet_config(), seed);
    sim.arena_mut().clear();
    sim
}

/// Puts a tank on the field.
pub fn spawn_tank(sim: &mut Simulation, team: Team, personality: Personality, position: Vec2) -> EntityId {
    let config = sim.config().clone();
    let seed = sim.seed();
    sim.arena_mut().spawn_with(|id| {
        Entity::tank(
            id,
            Tank::new(position, team, personality, &config, derive_seed(seed, id)),
        )
    })
}

/// Puts a shell in flight without going through a tank's warning.
pub fn spawn_shell(sim: &mut Simulation, owner: EntityId, team: Team, origin: Vec2, angle: f32, target_distance: f32) -> EntityId {
    let shell_config = sim.config().shell.clone();
    sim.arena_mut().spawn_shell(Shell::launch(&ShellLaunch {
        owner,
        team,
        origin,
        angle,
        speed: shell_config.speed,
        size: shell_config.size,
        explosion_radius: shell_config.explosion_radius,
        target_distance,
    }))
}

// =============================================================================
// Driving
// =============================================================================

/// Runs one frame at the next fixed timestamp.
pub fn step_frame(sim: &mut Simulation, input: &InputState) -> Vec<GameEvent> {
    let raw = sim.tick() * FRAME_MS;
    sim.step(raw, input)
}

/// Runs `frames` idle frames and returns each frame's time and events.
pub fn run_idle(sim: &mut Simulation, frames: u64) -> Vec<(Millis, Vec<GameEvent>)> {
    (0..frames)
        .map(|_| {
            let events = step_frame(sim, &InputState::idle());
            (sim.now_ms(), events)
        })
        .collect()
}

/// First frame time at which `matches` held for some event.
pub fn first_time(frames: &[(Millis, Vec<GameEvent>)], matches: impl Fn(&GameEvent) -> bool) -> Option<Millis> {
    frames
        .iter()
        .find(|(_, events)| events.iter().any(&matches))
        .map(|(now, _)| *now)
}

/// All events of all frames, in order.
pub fn flatten(frames: &[(Millis, Vec<GameEvent>)]) -> Vec<GameEvent> {
    frames.iter().flat_map(|(_, events)| events.clone()).collect()
}
