//! Random decision sampler.
//!
//! Each tank carries a short-lived [`Decision`] tag layered on top of its
//! personality. The tag is re-rolled on a rolling timer (every 1.5-4.5 s,
//! randomized per roll) from the tank's own generator, so every unit samples
//! independently. Decisions scale combat speed and preferred distance and
//! switch a few personality behaviors (panic strafing, sniper hesitation,
//! flanker repositioning).
//!
//! # Bands
//!
//! A uniform roll `r` in `[0, 1)` maps to:
//!
//! | roll | decision |
//! |---|---|
//! | `r < 0.08` | hesitate |
//! | `r < 0.15` | panic |
//! | `r < 0.30` | overconfident |
//! | `r < 0.35` | cautious |
//! | `r < 0.38` | seek cover |
//! | `r < 0.70 + 0.3 * aggressiveness` | aggressive |
//! | `r < 0.85` | reposition |
//! | otherwise | normal |

use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::clock::Millis;

/// Short-lived behavioral modifier.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Decision {
    /// Barely move.
    Hesitate,
    /// Move fast and erratically; want distance.
    Panic,
    /// Ignore cover and get close.
    Overconfident,
    /// Keep extra distance.
    Cautious,
    /// Head for cover even in combat.
    SeekCover,
    /// Press the attack.
    Aggressive,
    /// Look for a better angle.
    Reposition,
    /// No modifier.
    #[default]
    Normal,
}

/// Multipliers a decision applies to combat movement.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecisionModifiers {
    /// Multiplier on the personality speed factor.
    pub speed: f32,
    /// Multiplier on the personality optimal distance.
    pub distance: f32,
}

impl DecisionModifiers {
    const IDENTITY: Self = Self {
        speed: 1.0,
        distance: 1.0,
    };
}

impl Decision {
    /// Maps a uniform roll onto a decision, widening the aggressive band by
    /// `aggressiveness`.
    #[must_use]
    pub fn from_roll(roll: f32, aggressiveness: f32) -> Self {
        if roll < 0.08 {
            Self::Hesitate
        } else if roll < 0.15 {
            Self::Panic
        } else if roll < 0.30 {
            Self::Overconfident
        } else if roll < 0.35 {
            Self::Cautious
        } else if roll < 0.38 {
            Self::SeekCover
        } else if roll < 0.70 + aggressiveness * 0.3 {
            Self::Aggressive
        } else if roll < 0.85 {
            Self::Reposition
        } else {
            Self::Normal
        }
    }

    /// Speed and distance multipliers applied in combat.
    ///
    /// `SeekCover` overrides combat movement entirely and reports identity.
    #[must_use]
    pub const fn modifiers(self) -> DecisionModifiers {
        match self {
            Self::Hesitate => DecisionModifiers {
                speed: 0.2,
                distance: 1.0,
            },
            Self::Panic => DecisionModifiers {
                speed: 1.5,
                distance: 0.7,
            },
            Self::Overconfident => DecisionModifiers {
                speed: 1.2,
                distance: 0.5,
            },
            Self::Cautious => DecisionModifiers {
                speed: 0.6,
                distance: 1.5,
            },
            Self::Aggressive => DecisionModifiers {
                speed: 1.1,
                distance: 0.8,
            },
            Self::SeekCover | Self::Reposition | Self::Normal => DecisionModifiers::IDENTITY,
        }
    }
}

impl fmt::Display for Decision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Hesitate => "hesitate",
            Self::Panic => "panic",
            Self::Overconfident => "overconfident",
            Self::Cautious => "cautious",
            Self::SeekCover => "seek_cover",
            Self::Aggressive => "aggressive",
            Self::Reposition => "reposition",
            Self::Normal => "normal",
        };
        f.write_str(name)
    }
}

/// Rolling-timer sampler owned by one tank.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecisionSampler {
    decision: Decision,
    rolled_at: Option<Millis>,
    duration_ms: Millis,
    random_factor: f32,
}

impl DecisionSampler {
    /// Creates a sampler that rolls on its first update.
    pub fn new<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self {
            decision: Decision::Normal,
            rolled_at: None,
            duration_ms: 0,
            random_factor: rng.gen(),
        }
    }

    /// Re-rolls the decision once the current one has run its course.
    ///
    /// Returns `true` if a new decision was drawn.
    pub fn update<R: Rng + ?Sized>(&mut self, now: Millis, aggressiveness: f32, rng: &mut R) -> bool {
        if self
            .rolled_at
            .is_some_and(|at| now.saturating_sub(at) <= self.duration_ms)
        {
            return false;
        }
        self.decision = Decision::from_roll(rng.gen(), aggressiveness);
        self.random_factor = rng.gen();
        self.rolled_at = Some(now);
        self.duration_ms = rng.gen_range(1500..4500);
        true
    }

    /// Pins `decision` for `hold_ms`, overriding the sampler.
    pub fn force(&mut self, decision: Decision, now: Millis, hold_ms: Millis) {
        self.decision = decision;
        self.rolled_at = Some(now);
        self.duration_ms = hold_ms;
    }

    /// The active decision.
    #[must_use]
    pub const fn decision(&self) -> Decision {
        self.decision
    }

    /// Per-roll random factor in `[0, 1)`, used to pick strafe sides.
    #[must_use]
    pub const fn random_factor(&self) -> f32 {
        self.random_factor
    }

    /// How long the current decision lasts.
    #[must_use]
    pub const fn duration_ms(&self) -> Millis {
        self.duration_ms
    }
}
