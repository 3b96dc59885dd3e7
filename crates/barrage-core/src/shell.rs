//! Artillery shells.
//!
//! A shell is fired with a pre-set target distance (the range to the enemy at
//! the moment of firing). It flies in a straight line at constant speed and
//! detonates when it has covered that distance, when it leaves the canvas, or
//! when it passes over an enemy unit. The last step before the target is
//! shortened so the shell lands exactly on the target point.
//!
//! Each shell also tracks its whistle sound. The whistle is started once on
//! launch and stopped at most once; a second stop is a no-op.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::config::ArenaConfig;
use crate::entity::{EntityId, Team};
use crate::geometry::from_angle;

/// Everything needed to put a new shell in flight.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ShellLaunch {
    /// Tank that fired.
    pub owner: EntityId,
    /// Team of the firing tank.
    pub team: Team,
    /// Muzzle position.
    pub origin: Vec2,
    /// Firing heading in radians.
    pub angle: f32,
    /// Distance per tick.
    pub speed: f32,
    /// Shell diameter.
    pub size: f32,
    /// Area-damage radius.
    pub explosion_radius: f32,
    /// Distance after which the shell detonates.
    pub target_distance: f32,
}

/// Lifecycle of the shell's whistle sound.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Whistle {
    /// Not started yet.
    #[default]
    Silent,
    /// Playing.
    Playing,
    /// Stopped for good.
    Stopped,
}

/// An artillery shell in flight.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Shell {
    position: Vec2,
    velocity: Vec2,
    owner: EntityId,
    team: Team,
    size: f32,
    explosion_radius: f32,
    target_distance: f32,
    traveled: f32,
    whistle: Whistle,
}

impl Shell {
    /// Creates a shell at the muzzle, heading along the launch angle.
    #[must_use]
    pub fn launch(launch: &ShellLaunch) -> Self {
        Self {
            position: launch.origin,
            velocity: from_angle(launch.angle) * launch.speed,
            owner: launch.owner,
            team: launch.team,
            size: launch.size,
            explosion_radius: launch.explosion_radius,
            target_distance: launch.target_distance.max(0.0),
            traveled: 0.0,
            whistle: Whistle::Silent,
        }
    }

    /// Advances one tick.
    ///
    /// If this step would pass the target distance, the shell moves only the
    /// remaining distance, stops, and is ready to detonate.
    pub fn update(&mut self) {
        if self.has_reached_target() {
            self.velocity = Vec2::ZERO;
            return;
        }
        let step = self.velocity.length();
        let remaining = self.target_distance - self.traveled;
        if step >= remaining {
            if step > 0.0 {
                self.position += self.velocity * (remaining / step);
            }
            self.traveled = self.target_distance;
            self.velocity = Vec2::ZERO;
        } else {
            self.position += self.velocity;
            self.traveled += step;
        }
    }

    /// True once the shell has covered its target distance.
    #[must_use]
    pub fn has_reached_target(&self) -> bool {
        self.traveled >= self.target_distance
    }

    /// True if the shell center left the canvas.
    #[must_use]
    pub fn is_out_of_bounds(&self, arena: &ArenaConfig) -> bool {
        !arena.contains(self.position)
    }

    /// Direct-hit test against a body of diameter `size` at `center`.
    #[must_use]
    pub fn touches(&self, center: Vec2, size: f32) -> bool {
        self.position.distance(center) < size / 2.0 + self.size / 2.0
    }

    /// Starts the whistle. Returns `true` only on the first call.
    pub fn start_whistle(&mut self) -> bool {
        if self.whistle == Whistle::Silent {
            self.whistle = Whistle::Playing;
            true
        } else {
            false
        }
    }

    /// Stops the whistle. Returns `true` only if it was playing.
    pub fn stop_whistle(&mut self) -> bool {
        if self.whistle == Whistle::Playing {
            self.whistle = Whistle::Stopped;
            true
        } else {
            false
        }
    }

    /// Current whistle state.
    #[must_use]
    pub const fn whistle(&self) -> Whistle {
        self.whistle
    }

    /// Current position.
    #[must_use]
    pub const fn position(&self) -> Vec2 {
        self.position
    }

    /// Per-tick velocity (zero once landed).
    #[must_use]
    pub const fn velocity(&self) -> Vec2 {
        self.velocity
    }

    /// Tank that fired this shell.
    #[must_use]
    pub const fn owner(&self) -> EntityId {
        self.owner
    }

    /// Team of the firing tank.
    #[must_use]
    pub const fn team(&self) -> Team {
        self.team
    }

    /// Shell diameter.
    #[must_use]
    pub const fn size(&self) -> f32 {
        self.size
    }

    /// Area-damage radius.
    #[must_use]
    pub const fn explosion_radius(&self) -> f32 {
        self.explosion_radius
    }

    /// Distance at which the shell detonates.
    #[must_use]
    pub const fn target_distance(&self) -> f32 {
        self.target_distance
    }

    /// Distance covered so far. Never exceeds the target distance.
    #[must_use]
    pub const fn traveled(&self) -> f32 {
        self.traveled
    }
}
