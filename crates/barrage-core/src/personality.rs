//! Tank personalities and their tuning constants.
//!
//! A [`Personality`] is fixed when a tank is built. It resolves to a
//! [`PersonalityProfile`] bundle (engagement ranges, speed factor, aim
//! tolerance, aggressiveness, shot cooldown). The lookup is a pure `const fn`,
//! so querying the same personality always yields the same constants.
//!
//! The per-personality combat movement lives in
//! [`ai::movement`](crate::ai::movement); this module only holds data.
//!
//! # Example
//!
//! ```
//! use barrage_core::personality::Personality;
//!
//! let sniper = Personality::Sniper.profile();
//! assert!((sniper.shooting_range - 400.0).abs() < 0.0001);
//! assert_eq!(sniper.shot_cooldown_ms, 2200);
//! ```

use rand::Rng;
use serde::{Deserialize, Serialize};
use std::f32::consts::PI;
use std::fmt;

/// Behavioral archetype of a tank.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Personality {
    /// Closes distance, then circle-strafes.
    Aggressive,
    /// Keeps long range and makes small angle adjustments.
    Sniper,
    /// Holds ground with small repositioning.
    Defensive,
    /// Works around the enemy's side.
    Flanker,
}

impl Personality {
    /// Every personality, in declaration order.
    pub const ALL: [Self; 4] = [
        Self::Aggressive,
        Self::Sniper,
        Self::Defensive,
        Self::Flanker,
    ];

    /// Returns the tuning constants for this personality.
    #[must_use]
    pub const fn profile(self) -> PersonalityProfile {
        match self {
            Self::Aggressive => PersonalityProfile {
                shooting_range: 280.0,
                optimal_distance: 120.0,
                speed_factor: 0.8,
                aim_tolerance: PI / 10.0,
                aggressiveness: 0.8,
                shot_cooldown_ms: 1200,
            },
            Self::Sniper => PersonalityProfile {
                shooting_range: 400.0,
                optimal_distance: 280.0,
                speed_factor: 0.4,
                aim_tolerance: PI / 20.0,
                aggressiveness: 0.3,
                shot_cooldown_ms: 2200,
            },
            Self::Defensive => PersonalityProfile {
                shooting_range: 320.0,
                optimal_distance: 200.0,
                speed_factor: 0.5,
                aim_tolerance: PI / 15.0,
                aggressiveness: 0.4,
                shot_cooldown_ms: 1800,
            },
            Self::Flanker => PersonalityProfile {
                shooting_range: 350.0,
                optimal_distance: 180.0,
                speed_factor: 0.6,
                aim_tolerance: PI / 12.0,
                aggressiveness: 0.6,
                shot_cooldown_ms: 1400,
            },
        }
    }

    /// Picks a personality uniformly at random.
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self::ALL[rng.gen_range(0..Self::ALL.len())]
    }
}

impl fmt::Display for Personality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Aggressive => write!(f, "aggressive"),
            Self::Sniper => write!(f, "sniper"),
            Self::Defensive => write!(f, "defensive"),
            Self::Flanker => write!(f, "flanker"),
        }
    }
}

/// Combat tuning bundle for one personality.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersonalityProfile {
    /// Distance at which the tank starts treating an enemy as a threat.
    pub shooting_range: f32,
    /// Preferred engagement distance.
    pub optimal_distance: f32,
    /// Multiplier on intended movement.
    pub speed_factor: f32,
    /// Aim tolerance in radians.
    pub aim_tolerance: f32,
    /// 0-1; widens the "aggressive" decision band.
    pub aggressiveness: f32,
    /// Minimum time between shots.
    pub shot_cooldown_ms: u64,
}

impl PersonalityProfile {
    /// Range below which the tank fights instead of patrolling.
    #[must_use]
    pub fn combat_range(&self) -> f32 {
        self.shooting_range * 0.8
    }
}
