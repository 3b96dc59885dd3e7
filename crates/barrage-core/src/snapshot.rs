//! Render boundary.
//!
//! A [`RenderSnapshot`] carries everything a host needs to draw one frame:
//! positions, orientations, status flags and the remaining-time fractions
//! behind progress bars. It is a plain copy; holding it does not borrow the
//! simulation.
//!
//! # Architecture
//!
//! Entity views are built from the arena in id order, so two snapshots of the
//! same state are identical and serialize identically.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::arena::Arena;
use crate::clock::Millis;
use crate::effects::{Effect, Effects};
use crate::entity::{EntityId, EntityInner, HealthState, Team};
use crate::personality::Personality;
use crate::player::Player;
use crate::soldier::{RescueFlow, SoldierState};

/// How to draw a tank.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TankView {
    /// Tank id.
    pub id: EntityId,
    /// Team color.
    pub team: Team,
    /// Personality marker.
    pub personality: Personality,
    /// Hull center.
    pub position: Vec2,
    /// Facing in radians.
    pub heading: f32,
    /// Hull size.
    pub size: f32,
    /// Health stage.
    pub health: HealthState,
    /// Remaining freeze as a fraction, 0 when not frozen.
    pub freeze_remaining: f32,
    /// Repair progress as a fraction, 0 when not disabled.
    pub repair_progress: f32,
    /// True while telegraphing a shot.
    pub warning: bool,
    /// Whether the warning flash is lit this frame.
    pub flash_on: bool,
}

/// How to draw a shell.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ShellView {
    /// Shell id.
    pub id: EntityId,
    /// Team of the firing tank.
    pub team: Team,
    /// Center.
    pub position: Vec2,
    /// Diameter.
    pub size: f32,
}

/// How to draw a thrown freeze grenade.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GrenadeView {
    /// Grenade id.
    pub id: EntityId,
    /// Center.
    pub position: Vec2,
    /// Diameter.
    pub size: f32,
    /// Freeze radius, for the blast preview.
    pub radius: f32,
    /// Waiting for a second key press.
    pub manual: bool,
    /// Fuse progress in `[0, 1]`.
    pub fuse_progress: f32,
}

/// How to draw a grenade pickup.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PickupView {
    /// Pickup id.
    pub id: EntityId,
    /// Center.
    pub position: Vec2,
    /// Radius.
    pub size: f32,
    /// Close to expiry.
    pub flashing: bool,
    /// Drawn this frame.
    pub visible: bool,
}

/// How to draw the soldier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SoldierView {
    /// "Rank Name".
    pub name: String,
    /// Center.
    pub position: Vec2,
    /// Diameter.
    pub size: f32,
    /// Waiting or carried.
    pub state: SoldierState,
    /// Remaining life as a fraction.
    pub bleed_fraction: f32,
}

/// How to draw the medic.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlayerView {
    /// Center.
    pub position: Vec2,
    /// Diameter.
    pub size: f32,
    /// Carrying the soldier.
    pub carrying: bool,
    /// Grenades in stock.
    pub grenades: u32,
}

/// Everything needed to draw one frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderSnapshot {
    /// Simulation time of the frame.
    pub now_ms: Millis,
    /// Tanks in id order.
    pub tanks: Vec<TankView>,
    /// Shells in id order.
    pub shells: Vec<ShellView>,
    /// Thrown grenades in id order.
    pub grenades: Vec<GrenadeView>,
    /// Pickups in id order.
    pub pickups: Vec<PickupView>,
    /// The current soldier, if one is on the field.
    pub soldier: Option<SoldierView>,
    /// The medic.
    pub player: PlayerView,
    /// Live effects.
    pub effects: Vec<Effect>,
    /// Screen-shake magnitude.
    pub shake: f32,
}

impl RenderSnapshot {
    /// Captures the drawable state at `now`.
    #[must_use]
    pub fn capture(
        arena: &Arena,
        player: &Player,
        rescue: &RescueFlow,
        effects: &Effects,
        now: Millis,
    ) -> Self {
        let mut snapshot = Self {
            now_ms: now,
            tanks: Vec::new(),
            shells: Vec::new(),
            grenades: Vec::new(),
            pickups: Vec::new(),
            soldier: rescue.soldier().map(|s| SoldierView {
                name: s.profile().display_name(),
                position: s.position,
                size: s.size(),
                state: s.state(),
                bleed_fraction: s.bleed_fraction(),
            }),
            player: PlayerView {
                position: player.position,
                size: player.size(),
                carrying: player.is_carrying(),
                grenades: player.grenades(),
            },
            effects: effects.effects().to_vec(),
            shake: effects.shake_magnitude(),
        };

        for entity in arena.entities_sorted() {
            let id = entity.id();
            match entity.inner() {
                EntityInner::Tank(tank) => snapshot.tanks.push(TankView {
                    id,
                    team: tank.team(),
                    personality: tank.personality(),
                    position: tank.position,
                    heading: tank.heading,
                    size: tank.size(),
                    health: tank.health_state(),
                    freeze_remaining: tank.freeze_remaining_fraction(now),
                    repair_progress: tank.repair_progress(now),
                    warning: tank.warning().is_active(),
                    flash_on: tank.warning().flash_on(now),
                }),
                EntityInner::Shell(shell) => snapshot.shells.push(ShellView {
                    id,
                    team: shell.team(),
                    position: shell.position(),
                    size: shell.size(),
                }),
                EntityInner::FreezeGrenade(grenade) => snapshot.grenades.push(GrenadeView {
                    id,
                    position: grenade.position(),
                    size: grenade.size(),
                    radius: grenade.radius(),
                    manual: grenade.is_manual(),
                    fuse_progress: grenade.fuse_progress(now),
                }),
                EntityInner::Pickup(pickup) => snapshot.pickups.push(PickupView {
                    id,
                    position: pickup.position(),
                    size: pickup.size(),
                    flashing: pickup.is_flashing(),
                    visible: pickup.is_visible(),
                }),
            }
        }
        snapshot
    }
}
