//! Freeze grenades thrown by the medic and grenade pickups along the channel.
//!
//! A [`FreezeGrenade`] flies in a straight line (no gravity) and detonates
//! once its fuse burns down or, for manually-triggered throws, on the second
//! press of the throw key. Detonation is one-shot: a consumed grenade cannot
//! be triggered again.
//!
//! A [`PickupGrenade`] sits in the channel until the medic walks over it or it
//! expires. It flashes during the last stretch of its lifetime.
//!
//! # Example
//!
//! ```
//! use barrage_core::config::GrenadeConfig;
//! use barrage_core::grenade::FreezeGrenade;
//! use glam::Vec2;
//!
//! let config = GrenadeConfig::default();
//! let mut grenade = FreezeGrenade::throw(Vec2::new(500.0, 300.0), Vec2::new(0.0, 1.0), 0, &config, true);
//!
//! assert!(grenade.detonate());
//! assert!(!grenade.detonate());
//! ```

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::clock::Millis;
use crate::config::{GrenadeConfig, PickupConfig};
use crate::geometry::safe_normalize;

// =============================================================================
// Freeze grenade
// =============================================================================

/// A thrown freeze grenade.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FreezeGrenade {
    position: Vec2,
    velocity: Vec2,
    thrown_at: Millis,
    fuse_ms: Millis,
    radius: f32,
    size: f32,
    manual: bool,
    detonated: bool,
}

impl FreezeGrenade {
    /// Throws a grenade from `origin` along `direction`.
    ///
    /// A zero direction falls back to straight down.
    #[must_use]
    pub fn throw(
        origin: Vec2,
        direction: Vec2,
        now: Millis,
        config: &GrenadeConfig,
        manual: bool,
    ) -> Self {
        Self {
            position: origin,
            velocity: safe_normalize(direction) * config.throw_speed,
            thrown_at: now,
            fuse_ms: config.fuse_ms,
            radius: config.radius,
            size: config.size,
            manual,
            detonated: false,
        }
    }

    /// Moves one tick along the throw direction.
    pub fn update(&mut self) {
        if !self.detonated {
            self.position += self.velocity;
        }
    }

    /// True once the fuse has burned down on a live grenade.
    #[must_use]
    pub fn fuse_expired(&self, now: Millis) -> bool {
        !self.detonated && now.saturating_sub(self.thrown_at) >= self.fuse_ms
    }

    /// Consumes the grenade. Returns `true` only on the first call.
    pub fn detonate(&mut self) -> bool {
        if self.detonated {
            return false;
        }
        self.detonated = true;
        self.velocity = Vec2::ZERO;
        true
    }

    /// Fuse progress in `[0, 1]`, for the pre-detonation flash.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn fuse_progress(&self, now: Millis) -> f32 {
        let burned = now.saturating_sub(self.thrown_at) as f32;
        (burned / self.fuse_ms.max(1) as f32).min(1.0)
    }

    /// Current position.
    #[must_use]
    pub const fn position(&self) -> Vec2 {
        self.position
    }

    /// Per-tick velocity.
    #[must_use]
    pub const fn velocity(&self) -> Vec2 {
        self.velocity
    }

    /// Freeze radius.
    #[must_use]
    pub const fn radius(&self) -> f32 {
        self.radius
    }

    /// Body diameter.
    #[must_use]
    pub const fn size(&self) -> f32 {
        self.size
    }

    /// True if thrown for manual triggering.
    #[must_use]
    pub const fn is_manual(&self) -> bool {
        self.manual
    }

    /// True once consumed.
    #[must_use]
    pub const fn is_detonated(&self) -> bool {
        self.detonated
    }
}

// =============================================================================
// Pickup grenade
// =============================================================================

/// Lifecycle of a pickup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PickupState {
    /// Waiting to be collected.
    Available,
    /// Waiting, and flashing because expiry is near.
    Flashing,
    /// Lifetime ran out.
    Expired,
}

/// A grenade lying in the channel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PickupGrenade {
    position: Vec2,
    spawned_at: Millis,
    lifetime_ms: Millis,
    flash_after_ms: Millis,
    flash_toggle_ms: Millis,
    size: f32,
    state: PickupState,
    flash_visible: bool,
    last_toggle_at: Millis,
}

impl PickupGrenade {
    /// Places a pickup with default timings.
    #[must_use]
    pub fn new(position: Vec2, now: Millis) -> Self {
        Self::with_config(position, now, &PickupConfig::default())
    }

    /// Places a pickup with the configured timings.
    #[must_use]
    pub fn with_config(position: Vec2, now: Millis, config: &PickupConfig) -> Self {
        Self {
            position,
            spawned_at: now,
            lifetime_ms: config.lifetime_ms,
            flash_after_ms: config.flash_after_ms,
            flash_toggle_ms: config.flash_toggle_ms,
            size: config.size,
            state: PickupState::Available,
            flash_visible: true,
            last_toggle_at: 0,
        }
    }

    /// Advances the flash and expiry timers.
    ///
    /// Returns `true` on the tick the pickup expires.
    pub fn update(&mut self, now: Millis) -> bool {
        if self.state == PickupState::Expired {
            return false;
        }
        let age = now.saturating_sub(self.spawned_at);
        if age >= self.lifetime_ms {
            self.state = PickupState::Expired;
            return true;
        }
        if age >= self.flash_after_ms {
            self.state = PickupState::Flashing;
            if now.saturating_sub(self.last_toggle_at) > self.flash_toggle_ms {
                self.flash_visible = !self.flash_visible;
                self.last_toggle_at = now;
            }
        }
        false
    }

    /// True if a medic of diameter `collector_size` at `position` can grab it.
    #[must_use]
    pub fn in_pickup_range(&self, position: Vec2, collector_size: f32) -> bool {
        self.state != PickupState::Expired
            && self.position.distance(position) < self.size + collector_size / 2.0
    }

    /// Current lifecycle state.
    #[must_use]
    pub const fn state(&self) -> PickupState {
        self.state
    }

    /// True once expired.
    #[must_use]
    pub fn is_expired(&self) -> bool {
        self.state == PickupState::Expired
    }

    /// True while in the flashing stretch.
    #[must_use]
    pub fn is_flashing(&self) -> bool {
        self.state == PickupState::Flashing
    }

    /// Whether the pickup should be drawn this frame.
    #[must_use]
    pub fn is_visible(&self) -> bool {
        match self.state {
            PickupState::Available => true,
            PickupState::Flashing => self.flash_visible,
            PickupState::Expired => false,
        }
    }

    /// Position in the channel.
    #[must_use]
    pub const fn position(&self) -> Vec2 {
        self.position
    }

    /// Body radius.
    #[must_use]
    pub const fn size(&self) -> f32 {
        self.size
    }
}
