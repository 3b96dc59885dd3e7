//! Small state components shared by combat units.
//!
//! - [`Team`]: which side of the channel a unit fights for
//! - [`StatusFlags`]: frozen / disabled / shell-in-flight bits
//! - [`HealthState`]: the three-stage health ladder
//! - [`DamageOutcome`]: what a single hit did

use bitflags::bitflags;
use serde::{Deserialize, Serialize};
use std::f32::consts::PI;
use std::fmt;

/// Side of the battlefield.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Team {
    /// Army west of the channel; fires to the right.
    Left,
    /// Army east of the channel; fires to the left.
    Right,
}

impl Team {
    /// Both teams, in iteration order.
    pub const ALL: [Self; 2] = [Self::Left, Self::Right];

    /// The other team.
    #[must_use]
    pub const fn opponent(self) -> Self {
        match self {
            Self::Left => Self::Right,
            Self::Right => Self::Left,
        }
    }

    /// Fixed firing heading: straight across the channel.
    #[must_use]
    pub const fn firing_angle(self) -> f32 {
        match self {
            Self::Left => 0.0,
            Self::Right => PI,
        }
    }
}

impl fmt::Display for Team {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Left => write!(f, "left"),
            Self::Right => write!(f, "right"),
        }
    }
}

bitflags! {
    /// Status bits of a tank.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
    pub struct StatusFlags: u8 {
        /// Immobilized by a freeze grenade until `frozen_until`.
        const FROZEN = 1 << 0;
        /// At 1 health, waiting for self-repair.
        const DISABLED = 1 << 1;
        /// A shell fired by this tank is still in flight.
        const SHELL_IN_FLIGHT = 1 << 2;
    }
}

/// Health ladder of a tank: 2 → 1 → 0.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum HealthState {
    /// Full health.
    Healthy,
    /// One hit taken; cannot move or shoot until repaired.
    Disabled,
    /// Removed from the roster.
    Destroyed,
}

impl HealthState {
    /// Maps a raw health value onto the ladder.
    #[must_use]
    pub const fn from_health(health: u8) -> Self {
        match health {
            0 => Self::Destroyed,
            1 => Self::Disabled,
            _ => Self::Healthy,
        }
    }
}

/// Result of applying one damage step.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum DamageOutcome {
    /// Health dropped but the unit is neither disabled nor destroyed.
    Damaged,
    /// Health reached 1; the repair timer started.
    Disabled,
    /// Health reached 0.
    Destroyed,
}

impl fmt::Display for DamageOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Damaged => write!(f, "damaged"),
            Self::Disabled => write!(f, "disabled"),
            Self::Destroyed => write!(f, "destroyed"),
        }
    }
}
