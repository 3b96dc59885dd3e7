//! Score and HUD boundary.
//!
//! Once per tick the simulation builds a [`HudSummary`] of plain numbers and
//! pushes it to an optional [`HudSink`]. Formatting is entirely the host's
//! business.

use serde::{Deserialize, Serialize};

use crate::entity::Team;
use crate::simulation::Phase;

/// Numbers shown around the battlefield.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HudSummary {
    /// Lifecycle phase.
    pub phase: Phase,
    /// Medic lives left.
    pub lives: u32,
    /// Rescues completed.
    pub rescues: u32,
    /// Freeze grenades in stock.
    pub grenades: u32,
    /// Active tanks per team, `[left, right]`.
    pub tanks: [usize; 2],
    /// Whole seconds until the next reinforcement per team, `[left, right]`.
    pub next_spawn_secs: [u64; 2],
}

impl HudSummary {
    /// Active tanks of `team`.
    #[must_use]
    pub const fn tanks(&self, team: Team) -> usize {
        match team {
            Team::Left => self.tanks[0],
            Team::Right => self.tanks[1],
        }
    }

    /// Seconds until `team`'s next reinforcement.
    #[must_use]
    pub const fn next_spawn_secs(&self, team: Team) -> u64 {
        match team {
            Team::Left => self.next_spawn_secs[0],
            Team::Right => self.next_spawn_secs[1],
        }
    }
}

/// Receives the HUD summary once per tick.
pub trait HudSink: Send {
    /// Shows `summary`.
    fn update(&mut self, summary: &HudSummary);
}
