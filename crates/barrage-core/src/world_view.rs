//! `WorldView` is the frozen, read-only picture of the battlefield that tank
//! AI reads during the parallel phase.
//!
//! Tanks think concurrently and each one mutably borrows only itself, so they
//! cannot look at the arena while thinking. Instead the simulation captures a
//! [`WorldView`] at the start of the AI phase: a flat, id-sorted copy of every
//! tank's team, position and health. All tanks see the same snapshot, which
//! makes the phase independent of scheduling order.
//!
//! # Example
//!
//! ```
//! use barrage_core::entity::{EntityId, HealthState, Team};
//! use barrage_core::world_view::{TankSnapshot, WorldView};
//! use glam::Vec2;
//!
//! let view = WorldView::from_snapshots(
//!     3,
//!     vec![
//!         TankSnapshot::new(EntityId::new(1), Team::Left, Vec2::new(100.0, 300.0), HealthState::Healthy),
//!         TankSnapshot::new(EntityId::new(2), Team::Right, Vec2::new(900.0, 300.0), HealthState::Healthy),
//!         TankSnapshot::new(EntityId::new(3), Team::Right, Vec2::new(600.0, 100.0), HealthState::Disabled),
//!     ],
//! );
//!
//! let nearest = view.nearest_enemy(Team::Left, Vec2::new(100.0, 300.0)).unwrap();
//! assert_eq!(nearest.id, EntityId::new(3));
//! assert_eq!(view.tick(), 3);
//! ```

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::arena::Arena;
use crate::entity::{EntityId, HealthState, Team};

/// What other tanks can see of a tank.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TankSnapshot {
    /// Tank id.
    pub id: EntityId,
    /// Team.
    pub team: Team,
    /// Hull center at capture time.
    pub position: Vec2,
    /// Health at capture time.
    pub health: HealthState,
}

impl TankSnapshot {
    /// Creates a snapshot entry.
    #[must_use]
    pub const fn new(id: EntityId, team: Team, position: Vec2, health: HealthState) -> Self {
        Self {
            id,
            team,
            position,
            health,
        }
    }
}

/// Read-only, id-sorted view of all tanks for one tick.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WorldView {
    tick: u64,
    tanks: Vec<TankSnapshot>,
}

impl WorldView {
    /// Captures every tank in the arena.
    #[must_use]
    pub fn capture(arena: &Arena, tick: u64) -> Self {
        let tanks = arena
            .tanks()
            .map(|(id, tank)| TankSnapshot::new(id, tank.team(), tank.position, tank.health_state()))
            .collect();
        Self { tick, tanks }
    }

    /// Builds a view from explicit snapshots (sorted by id on the way in).
    #[must_use]
    pub fn from_snapshots(tick: u64, mut tanks: Vec<TankSnapshot>) -> Self {
        tanks.sort_by_key(|t| t.id);
        Self { tick, tanks }
    }

    /// Tick the view was captured on.
    #[must_use]
    pub const fn tick(&self) -> u64 {
        self.tick
    }

    /// All tanks, sorted by id.
    #[must_use]
    pub fn tanks(&self) -> &[TankSnapshot] {
        &self.tanks
    }

    /// Looks up one tank.
    #[must_use]
    pub fn get(&self, id: EntityId) -> Option<&TankSnapshot> {
        self.tanks
            .binary_search_by_key(&id, |t| t.id)
            .ok()
            .map(|i| &self.tanks[i])
    }

    /// Number of tanks on `team`.
    #[must_use]
    pub fn team_count(&self, team: Team) -> usize {
        self.tanks.iter().filter(|t| t.team == team).count()
    }

    /// Closest tank of the opposing team, or `None` when the enemy army is
    /// empty. Equal distances resolve to the lower id.
    #[must_use]
    pub fn nearest_enemy(&self, team: Team, from: Vec2) -> Option<&TankSnapshot> {
        let enemy = team.opponent();
        self.tanks
            .iter()
            .filter(|t| t.team == enemy)
            .fold(None, |best: Option<(&TankSnapshot, f32)>, t| {
                let d = from.distance_squared(t.position);
                match best {
                    Some((_, best_d)) if best_d <= d => best,
                    _ => Some((t, d)),
                }
            })
            .map(|(t, _)| t)
    }
}
