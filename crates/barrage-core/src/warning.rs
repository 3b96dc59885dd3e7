//! Shooting-warning state machine.
//!
//! Before every shot a tank telegraphs its intent: it stops moving and its
//! hull flashes, slowly at first and faster as the shot approaches. The
//! machine has two resting states, `Idle` and `Telegraphing`; firing consumes
//! the telegraph and returns to `Idle`.
//!
//! ```text
//!            start()                 fire() once elapsed >= duration
//!   Idle ──────────────▶ Telegraphing ─────────────────────────────▶ Idle
//!     ▲                       │
//!     └──── reset() ──────────┘  (frozen, disabled, hit, or elapsed > duration + grace)
//! ```
//!
//! Eligibility (cooldown, frozen, disabled, shell in flight) is owned by the
//! [`Tank`](crate::tank::Tank); this module only tracks timing and the flash
//! curve.
//!
//! # Flash curve
//!
//! The flash half-period eases from `slow` to `fast`:
//! `period = slow + (fast - slow) * progress^curve`, with
//! `progress = min(elapsed / duration, 1)`. The hull shows the warning color
//! while `now mod (2 * period) < period`.

use serde::{Deserialize, Serialize};

use crate::clock::Millis;
use crate::config::WarningConfig;

/// Where the telegraph currently is.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub enum WarningPhase {
    /// No shot pending.
    #[default]
    Idle,
    /// Telegraphing a shot.
    Telegraphing {
        /// When the telegraph started.
        started_at: Millis,
        /// Heading the shot will be fired along.
        target_angle: f32,
    },
}

/// Pre-shot telegraph of one tank.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShootingWarning {
    phase: WarningPhase,
    duration_ms: Millis,
    grace_ms: Millis,
    slow_flash_ms: f32,
    fast_flash_ms: f32,
    curve: f32,
}

impl ShootingWarning {
    /// Creates an idle warning with the configured timings.
    #[must_use]
    pub fn new(config: &WarningConfig) -> Self {
        Self {
            phase: WarningPhase::Idle,
            duration_ms: config.duration_ms,
            grace_ms: config.grace_ms,
            slow_flash_ms: config.slow_flash_ms,
            fast_flash_ms: config.fast_flash_ms,
            curve: config.curve,
        }
    }

    /// Current phase.
    #[must_use]
    pub const fn phase(&self) -> WarningPhase {
        self.phase
    }

    /// True while telegraphing.
    #[must_use]
    pub const fn is_active(&self) -> bool {
        matches!(self.phase, WarningPhase::Telegraphing { .. })
    }

    /// Full telegraph length.
    #[must_use]
    pub const fn duration_ms(&self) -> Millis {
        self.duration_ms
    }

    /// Enters the telegraph. Returns `false` if one is already running.
    pub fn start(&mut self, now: Millis, target_angle: f32) -> bool {
        if self.is_active() {
            return false;
        }
        self.phase = WarningPhase::Telegraphing {
            started_at: now,
            target_angle,
        };
        true
    }

    /// Cancels the telegraph without firing.
    pub fn reset(&mut self) {
        self.phase = WarningPhase::Idle;
    }

    /// Time spent telegraphing, if active.
    #[must_use]
    pub const fn elapsed(&self, now: Millis) -> Option<Millis> {
        match self.phase {
            WarningPhase::Idle => None,
            WarningPhase::Telegraphing { started_at, .. } => Some(now.saturating_sub(started_at)),
        }
    }

    /// True once the full telegraph has elapsed.
    #[must_use]
    pub fn is_complete(&self, now: Millis) -> bool {
        self.elapsed(now).is_some_and(|e| e >= self.duration_ms)
    }

    /// True once the telegraph has outlived its grace period without firing.
    #[must_use]
    pub fn is_stale(&self, now: Millis) -> bool {
        self.elapsed(now)
            .is_some_and(|e| e > self.duration_ms + self.grace_ms)
    }

    /// Heading the pending shot will use.
    #[must_use]
    pub const fn target_angle(&self) -> Option<f32> {
        match self.phase {
            WarningPhase::Idle => None,
            WarningPhase::Telegraphing { target_angle, .. } => Some(target_angle),
        }
    }

    /// Consumes the telegraph, returning its heading.
    pub fn fire(&mut self) -> Option<f32> {
        let angle = self.target_angle();
        self.phase = WarningPhase::Idle;
        angle
    }

    /// Telegraph progress in `[0, 1]`; 0 when idle.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn progress(&self, now: Millis) -> f32 {
        self.elapsed(now).map_or(0.0, |e| {
            (e as f32 / self.duration_ms.max(1) as f32).min(1.0)
        })
    }

    /// Current flash half-period in milliseconds.
    #[must_use]
    pub fn flash_period_ms(&self, now: Millis) -> f32 {
        let eased = self.progress(now).powf(self.curve);
        self.slow_flash_ms + (self.fast_flash_ms - self.slow_flash_ms) * eased
    }

    /// Whether the hull shows the warning color at `now`.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn flash_on(&self, now: Millis) -> bool {
        if !self.is_active() {
            return false;
        }
        let period = f64::from(self.flash_period_ms(now)).max(1.0);
        (now as f64) % (period * 2.0) < period
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn warning() -> ShootingWarning {
        ShootingWarning::new(&WarningConfig {
            duration_ms: 1000,
            grace_ms: 500,
            slow_flash_ms: 200.0,
            fast_flash_ms: 50.0,
            curve: 2.0,
        })
    }

    mod transition_tests {
        use super::*;

        #[test]
        fn starts_idle() {
            let w = warning();
            assert!(!w.is_active());
            assert_eq!(w.phase(), WarningPhase::Idle);
            assert!(!w.is_complete(10_000));
        }

        #[test]
        fn start_is_not_reentrant() {
            let mut w = warning();
            assert!(w.start(100, 0.0));
            assert!(!w.start(200, 1.0));
            assert_eq!(w.elapsed(300), Some(200));
        }

        #[test]
        fn completes_after_duration() {
            let mut w = warning();
            w.start(0, 0.0);
            assert!(!w.is_complete(999));
            assert!(w.is_complete(1000));
        }

        #[test]
        fn stale_after_grace() {
            let mut w = warning();
            w.start(0, 0.0);
            assert!(!w.is_stale(1500));
            assert!(w.is_stale(1501));
        }

        #[test]
        fn fire_returns_angle_and_idles() {
            let mut w = warning();
            w.start(0, std::f32::consts::PI);
            let angle = w.fire().unwrap();
            assert!((angle - std::f32::consts::PI).abs() < 0.0001);
            assert!(!w.is_active());
            assert!(w.fire().is_none());
        }
    }

    mod flash_tests {
        use super::*;

        #[test]
        fn period_eases_from_slow_to_fast() {
            let mut w = warning();
            w.start(0, 0.0);
            assert!((w.flash_period_ms(0) - 200.0).abs() < 0.001);
            // progress 0.5 -> eased 0.25 -> 200 - 150 * 0.25
            assert!((w.flash_period_ms(500) - 162.5).abs() < 0.001);
            assert!((w.flash_period_ms(1000) - 50.0).abs() < 0.001);
            assert!((w.flash_period_ms(5000) - 50.0).abs() < 0.001);
        }

        #[test]
        fn flash_toggles() {
            let mut w = warning();
            w.start(0, 0.0);
            // period 200 near the start: on in [0, 200), off in [200, 400)
            assert!(w.flash_on(10));
            assert!(!w.flash_on(250));
        }

        #[test]
        fn idle_never_flashes() {
            let w = warning();
            assert!(!w.flash_on(10));
            assert!(w.progress(10).abs() < 0.0001);
        }
    }
}
