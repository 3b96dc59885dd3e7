//! Domain events emitted by the simulation.
//!
//! Every tick returns the events it produced, in the order they happened.
//! Hosts use them to drive audio, logs, and UI messages; nothing in the
//! simulation reads them back.
//!
//! # Audio mapping
//!
//! [`GameEvent::sound`] maps an event onto a named [`SoundCue`]. Events with
//! no audible counterpart map to `None`. Shell whistles are not cues; they
//! are start/stop pairs keyed by shell id ([`GameEvent::WhistleStarted`],
//! [`GameEvent::WhistleStopped`]).

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::entity::{EntityId, Team};
use crate::personality::Personality;

/// Why a soldier was lost.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LossCause {
    /// Bled out, waiting or carried.
    BledOut,
    /// The medic carrying them was hit.
    KilledInAction,
}

/// Something that happened during a tick.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    // -- tanks ---------------------------------------------------------------
    /// A tank began its pre-shot telegraph.
    WarningStarted {
        /// Tank about to shoot.
        tank: EntityId,
    },
    /// A tank fired a shell.
    TankShot {
        /// Firing tank.
        tank: EntityId,
        /// New shell.
        shell: EntityId,
        /// Team of the firing tank.
        team: Team,
    },
    /// A tank dropped to one health and stopped.
    TankDisabled {
        /// Affected tank.
        tank: EntityId,
    },
    /// A tank was destroyed and removed.
    TankDestroyed {
        /// Removed tank.
        tank: EntityId,
        /// Its team.
        team: Team,
    },
    /// A disabled tank finished repairing.
    TankRepaired {
        /// Repaired tank.
        tank: EntityId,
    },
    /// A frozen tank thawed.
    TankUnfrozen {
        /// Thawed tank.
        tank: EntityId,
    },
    /// A reinforcement arrived.
    TankSpawned {
        /// New tank.
        tank: EntityId,
        /// Its team.
        team: Team,
        /// Its personality.
        personality: Personality,
    },
    /// A reinforcement found no free spot and will retry.
    SpawnDeferred {
        /// Team waiting for the reinforcement.
        team: Team,
    },

    // -- shells --------------------------------------------------------------
    /// A shell's whistle started.
    WhistleStarted {
        /// Whistling shell.
        shell: EntityId,
    },
    /// A shell's whistle stopped. Emitted at most once per shell.
    WhistleStopped {
        /// Silenced shell.
        shell: EntityId,
    },
    /// A shell exploded.
    ShellExploded {
        /// Exploding shell.
        shell: EntityId,
        /// Blast center.
        position: Vec2,
        /// Blast radius.
        radius: f32,
    },

    // -- grenades ------------------------------------------------------------
    /// The medic threw a freeze grenade.
    GrenadeThrown {
        /// New grenade.
        grenade: EntityId,
        /// True if it waits for a second key press.
        manual: bool,
        /// Grenades left afterwards.
        remaining: u32,
    },
    /// A freeze grenade went off.
    GrenadeDetonated {
        /// Consumed grenade.
        grenade: EntityId,
        /// Blast center.
        position: Vec2,
        /// Number of tanks frozen.
        frozen: usize,
        /// Freeze length applied.
        duration_ms: u64,
    },
    /// A grenade pickup appeared in the channel.
    PickupSpawned {
        /// New pickup.
        pickup: EntityId,
        /// Where it lies.
        position: Vec2,
    },
    /// The medic collected a pickup.
    PickupCollected {
        /// Collected pickup.
        pickup: EntityId,
        /// Grenades held afterwards.
        grenades: u32,
    },
    /// A pickup expired uncollected.
    PickupExpired {
        /// Wasted pickup.
        pickup: EntityId,
    },

    // -- rescue --------------------------------------------------------------
    /// A new soldier is waiting for rescue.
    SoldierSpawned {
        /// Display name.
        name: String,
    },
    /// The medic picked up the soldier.
    SoldierPickedUp {
        /// Display name.
        name: String,
    },
    /// A carried soldier is close to bleeding out.
    SoldierCritical {
        /// Display name.
        name: String,
    },
    /// The soldier reached the hospital.
    SoldierRescued {
        /// Display name.
        name: String,
        /// Rescues completed so far.
        rescues: u32,
    },
    /// The soldier was lost.
    SoldierDied {
        /// Display name.
        name: String,
        /// How they were lost.
        cause: LossCause,
    },

    // -- medic ---------------------------------------------------------------
    /// The medic was caught in a blast.
    PlayerHit {
        /// Lives left.
        lives: u32,
    },
    /// The medic ran out of lives.
    GameOver {
        /// Rescues completed.
        rescues: u32,
    },
}

/// Named sound effects a host can map to audio.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SoundCue {
    /// A tank fired.
    TankShoot,
    /// A shell exploded.
    Explosion,
    /// A tank came back online.
    TankRepaired,
    /// A grenade left the medic's hand.
    GrenadeThrow,
    /// A freeze grenade went off.
    FreezeBlast,
    /// A pickup was collected.
    GrenadePickup,
    /// The soldier was picked up.
    SoldierPickup,
    /// The carried soldier is critical.
    CriticalBeep,
    /// The soldier reached the hospital.
    MissionSuccess,
    /// The soldier was lost.
    SoldierDeath,
    /// The medic was hit.
    PlayerHit,
}

impl GameEvent {
    /// The sound effect for this event, if any.
    #[must_use]
    pub const fn sound(&self) -> Option<SoundCue> {
        match self {
            Self::TankShot { .. } => Some(SoundCue::TankShoot),
            Self::ShellExploded { .. } => Some(SoundCue::Explosion),
            Self::TankRepaired { .. } => Some(SoundCue::TankRepaired),
            Self::GrenadeThrown { .. } => Some(SoundCue::GrenadeThrow),
            Self::GrenadeDetonated { .. } => Some(SoundCue::FreezeBlast),
            Self::PickupCollected { .. } => Some(SoundCue::GrenadePickup),
            Self::SoldierPickedUp { .. } => Some(SoundCue::SoldierPickup),
            Self::SoldierCritical { .. } => Some(SoundCue::CriticalBeep),
            Self::SoldierRescued { .. } => Some(SoundCue::MissionSuccess),
            Self::SoldierDied { .. } => Some(SoundCue::SoldierDeath),
            Self::PlayerHit { .. } => Some(SoundCue::PlayerHit),
            Self::WarningStarted { .. }
            | Self::TankDisabled { .. }
            | Self::TankDestroyed { .. }
            | Self::TankUnfrozen { .. }
            | Self::TankSpawned { .. }
            | Self::SpawnDeferred { .. }
            | Self::WhistleStarted { .. }
            | Self::WhistleStopped { .. }
            | Self::PickupSpawned { .. }
            | Self::PickupExpired { .. }
            | Self::SoldierSpawned { .. }
            | Self::GameOver { .. } => None,
        }
    }
}
