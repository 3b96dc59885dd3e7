//! Short-lived visual effects and screen shake.
//!
//! Effects are pure presentation records: the simulation adds them where
//! something visible happens and expires them on a timer, but never reads
//! them for game logic. They are exposed through the render snapshot.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::clock::Millis;

/// Lifetime of a shell explosion.
pub const EXPLOSION_MS: Millis = 1500;
/// Lifetime of a freeze burst or puff.
pub const BURST_MS: Millis = 1000;
/// Lifetime of the lingering freeze zone.
pub const FREEZE_ZONE_MS: Millis = 1000;

/// Shake added by a shell explosion.
pub const SHELL_SHAKE: f32 = 8.0;
/// Shake added by a freeze detonation.
pub const FREEZE_SHAKE: f32 = 3.0;
/// Per-tick shake decay factor.
pub const SHAKE_DECAY: f32 = 0.9;
/// Shake below this snaps to zero.
pub const SHAKE_FLOOR: f32 = 0.1;

/// What an effect depicts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EffectKind {
    /// Shell blast.
    Explosion,
    /// Freeze grenade blast.
    FreezeBurst,
    /// Pickup collected or wasted.
    Puff,
    /// Area tinted after a freeze.
    FreezeZone,
}

/// One visual effect.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Effect {
    /// What to draw.
    pub kind: EffectKind,
    /// Center.
    pub position: Vec2,
    /// Full radius.
    pub radius: f32,
    /// Creation time.
    pub started_at: Millis,
    /// Lifetime.
    pub duration_ms: Millis,
}

impl Effect {
    /// Elapsed fraction of the lifetime in `[0, 1]`.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn progress(&self, now: Millis) -> f32 {
        (now.saturating_sub(self.started_at) as f32 / self.duration_ms.max(1) as f32).min(1.0)
    }

    /// True once the lifetime has passed.
    #[must_use]
    pub const fn is_expired(&self, now: Millis) -> bool {
        now.saturating_sub(self.started_at) >= self.duration_ms
    }
}

/// Live effects plus the screen-shake magnitude.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Effects {
    effects: Vec<Effect>,
    shake: f32,
}

impl Effects {
    /// No effects, no shake.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            effects: Vec::new(),
            shake: 0.0,
        }
    }

    /// Adds an effect.
    pub fn add(&mut self, kind: EffectKind, position: Vec2, radius: f32, now: Millis, duration_ms: Millis) {
        self.effects.push(Effect {
            kind,
            position,
            radius,
            started_at: now,
            duration_ms,
        });
    }

    /// Raises the shake to at least `magnitude`.
    pub fn shake(&mut self, magnitude: f32) {
        self.shake = self.shake.max(magnitude);
    }

    /// Drops expired effects of the given kinds.
    pub fn expire(&mut self, now: Millis, kinds: &[EffectKind]) {
        self.effects
            .retain(|e| !(kinds.contains(&e.kind) && e.is_expired(now)));
    }

    /// Decays the shake by one tick.
    pub fn decay_shake(&mut self) {
        self.shake *= SHAKE_DECAY;
        if self.shake < SHAKE_FLOOR {
            self.shake = 0.0;
        }
    }

    /// Live effects in creation order.
    #[must_use]
    pub fn effects(&self) -> &[Effect] {
        &self.effects
    }

    /// Current shake magnitude.
    #[must_use]
    pub const fn shake_magnitude(&self) -> f32 {
        self.shake
    }

    /// Removes everything.
    pub fn clear(&mut self) {
        self.effects.clear();
        self.shake = 0.0;
    }
}
