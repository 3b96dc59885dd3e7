//! Tanks: the combat units.
//!
//! A [`Tank`] owns its physical state, its status effects and the state of its
//! AI brain and shooting warning. Everything here mutates only the tank
//! itself; effects on other entities (shells, damage, freezing) go through the
//! simulation loop.
//!
//! # Status effects
//!
//! - **Frozen**: set by freeze grenades; the tank skips its update until
//!   `frozen_until`, then resumes on the same tick it thaws.
//! - **Disabled**: the first hit drops health to 1; the tank cannot move or
//!   shoot until `repair_ms` has passed, then returns to full health.
//! - **Destroyed**: the second hit drops health to 0; the simulation removes
//!   the tank.
//! - **Shell in flight**: at most one shell per tank; the flag clears when the
//!   shell detonates.
//!
//! # Example
//!
//! ```
//! use barrage_core::config::GameConfig;
//! use barrage_core::entity::{DamageOutcome, Team};
//! use barrage_core::personality::Personality;
//! use barrage_core::tank::Tank;
//! use glam::Vec2;
//!
//! let config = GameConfig::default();
//! let mut tank = Tank::new(Vec2::new(100.0, 300.0), Team::Left, Personality::Sniper, &config, 7);
//!
//! assert_eq!(tank.take_damage(1_000), DamageOutcome::Disabled);
//! assert!(tank.is_disabled());
//!
//! let report = tank.update_status(9_000);
//! assert!(report.repaired);
//! assert_eq!(tank.health(), 2);
//! ```

use glam::Vec2;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::ai::AiBrain;
use crate::clock::Millis;
use crate::config::{GameConfig, ShellConfig};
use crate::entity::{DamageOutcome, EntityId, HealthState, StatusFlags, Team};
use crate::personality::{Personality, PersonalityProfile};
use crate::shell::ShellLaunch;
use crate::warning::ShootingWarning;

/// What happened to a tank's status timers at the start of its update.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StatusReport {
    /// The freeze expired this tick.
    pub unfrozen: bool,
    /// The tank finished repairing this tick.
    pub repaired: bool,
    /// The AI may run this tick.
    pub can_act: bool,
}

/// An AI-controlled tank.
#[derive(Debug, Clone)]
pub struct Tank {
    /// Hull center.
    pub position: Vec2,
    /// Facing in radians.
    pub heading: f32,
    size: f32,
    speed: f32,
    team: Team,
    personality: Personality,
    profile: PersonalityProfile,
    health: u8,
    max_health: u8,
    flags: StatusFlags,
    frozen_at: Millis,
    frozen_until: Millis,
    default_freeze_ms: Millis,
    disabled_since: Millis,
    repair_ms: Millis,
    last_shot_at: Option<Millis>,
    pub(crate) warning: ShootingWarning,
    pub(crate) brain: AiBrain,
    pub(crate) rng: ChaCha8Rng,
}

impl Tank {
    /// Builds a healthy tank.
    ///
    /// `seed` drives this tank's private generator (decisions, patrol jitter),
    /// so tanks can think in parallel without sharing state.
    #[must_use]
    pub fn new(
        position: Vec2,
        team: Team,
        personality: Personality,
        config: &GameConfig,
        seed: u64,
    ) -> Self {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let brain = AiBrain::new(config.tank.direction_commit_ms, &mut rng);
        Self {
            position,
            heading: team.firing_angle(),
            size: config.tank.size,
            speed: config.tank.speed,
            team,
            personality,
            profile: personality.profile(),
            health: config.tank.max_health,
            max_health: config.tank.max_health,
            flags: StatusFlags::empty(),
            frozen_at: 0,
            frozen_until: 0,
            default_freeze_ms: config.tank.default_freeze_ms,
            disabled_since: 0,
            repair_ms: config.tank.repair_ms,
            last_shot_at: None,
            warning: ShootingWarning::new(&config.warning),
            brain,
            rng,
        }
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// Team this tank fights for.
    #[must_use]
    pub const fn team(&self) -> Team {
        self.team
    }

    /// Fixed personality.
    #[must_use]
    pub const fn personality(&self) -> Personality {
        self.personality
    }

    /// Tuning constants of the personality.
    #[must_use]
    pub const fn profile(&self) -> &PersonalityProfile {
        &self.profile
    }

    /// Hull diameter.
    #[must_use]
    pub const fn size(&self) -> f32 {
        self.size
    }

    /// Distance per tick at full speed.
    #[must_use]
    pub const fn speed(&self) -> f32 {
        self.speed
    }

    /// Current health.
    #[must_use]
    pub const fn health(&self) -> u8 {
        self.health
    }

    /// Health mapped onto the healthy / disabled / destroyed ladder.
    #[must_use]
    pub const fn health_state(&self) -> HealthState {
        HealthState::from_health(self.health)
    }

    /// Raw status bits.
    #[must_use]
    pub const fn flags(&self) -> StatusFlags {
        self.flags
    }

    /// True while frozen.
    #[must_use]
    pub const fn is_frozen(&self) -> bool {
        self.flags.contains(StatusFlags::FROZEN)
    }

    /// True while waiting for repair.
    #[must_use]
    pub const fn is_disabled(&self) -> bool {
        self.flags.contains(StatusFlags::DISABLED)
    }

    /// True while a shell fired by this tank is in flight.
    #[must_use]
    pub const fn has_active_shell(&self) -> bool {
        self.flags.contains(StatusFlags::SHELL_IN_FLIGHT)
    }

    /// Timestamp at which the freeze ends.
    #[must_use]
    pub const fn frozen_until(&self) -> Millis {
        self.frozen_until
    }

    /// Timestamp at which the tank became disabled.
    #[must_use]
    pub const fn disabled_since(&self) -> Millis {
        self.disabled_since
    }

    /// Minimum time between shots.
    #[must_use]
    pub const fn shot_cooldown_ms(&self) -> Millis {
        self.profile.shot_cooldown_ms
    }

    /// The shooting-warning state machine.
    #[must_use]
    pub const fn warning(&self) -> &ShootingWarning {
        &self.warning
    }

    /// The AI brain.
    #[must_use]
    pub const fn brain(&self) -> &AiBrain {
        &self.brain
    }

    /// Mutable AI brain, for forcing decisions in tests and tools.
    pub fn brain_mut(&mut self) -> &mut AiBrain {
        &mut self.brain
    }

    /// Remaining freeze as a fraction of the freeze length, for progress bars.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn freeze_remaining_fraction(&self, now: Millis) -> f32 {
        if !self.is_frozen() {
            return 0.0;
        }
        let total = self.frozen_until.saturating_sub(self.frozen_at).max(1);
        let left = self.frozen_until.saturating_sub(now);
        (left as f32 / total as f32).clamp(0.0, 1.0)
    }

    /// Repair progress in `[0, 1]`, for progress bars.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn repair_progress(&self, now: Millis) -> f32 {
        if !self.is_disabled() {
            return 0.0;
        }
        let done = now.saturating_sub(self.disabled_since);
        (done as f32 / self.repair_ms.max(1) as f32).min(1.0)
    }

    // =========================================================================
    // Status effects
    // =========================================================================

    /// Advances the freeze and repair timers.
    ///
    /// A freeze that expires this tick lets the AI run on the same tick. A
    /// repair that completes this tick consumes the tick.
    pub fn update_status(&mut self, now: Millis) -> StatusReport {
        let mut report = StatusReport::default();
        if self.is_frozen() {
            if now >= self.frozen_until {
                self.flags.remove(StatusFlags::FROZEN);
                report.unfrozen = true;
            } else {
                return report;
            }
        }
        if self.is_disabled() {
            if now.saturating_sub(self.disabled_since) >= self.repair_ms {
                self.repair();
                report.repaired = true;
            }
            return report;
        }
        report.can_act = true;
        report
    }

    /// Freezes the tank until `now + duration` (default duration if `None`).
    ///
    /// Returns the unfreeze timestamp.
    pub fn freeze(&mut self, now: Millis, duration: Option<Millis>) -> Millis {
        let duration = duration.unwrap_or(self.default_freeze_ms);
        self.flags.insert(StatusFlags::FROZEN);
        self.frozen_at = now;
        self.frozen_until = now + duration;
        self.frozen_until
    }

    /// Applies one damage step and cancels any pending shot.
    pub fn take_damage(&mut self, now: Millis) -> DamageOutcome {
        self.health = self.health.saturating_sub(1);
        self.warning.reset();
        match self.health {
            0 => DamageOutcome::Destroyed,
            1 => {
                self.flags.insert(StatusFlags::DISABLED);
                self.disabled_since = now;
                DamageOutcome::Disabled
            }
            _ => DamageOutcome::Damaged,
        }
    }

    /// Restores full health and clears the disabled state.
    pub fn repair(&mut self) {
        self.health = self.max_health;
        self.flags.remove(StatusFlags::DISABLED);
        self.disabled_since = 0;
    }

    // =========================================================================
    // Shooting
    // =========================================================================

    fn cooldown_elapsed(&self, now: Millis) -> bool {
        self.last_shot_at
            .map_or(true, |t| now.saturating_sub(t) > self.profile.shot_cooldown_ms)
    }

    fn is_armed(&self) -> bool {
        !self.is_frozen() && !self.is_disabled() && !self.has_active_shell()
    }

    /// Gate for entering the warning: armed and off cooldown.
    #[must_use]
    pub fn can_start_warning(&self, now: Millis) -> bool {
        self.is_armed() && self.cooldown_elapsed(now)
    }

    /// Enters the warning and turns toward `target_angle`.
    ///
    /// Returns `false` if already warning or not eligible.
    pub fn start_warning(&mut self, now: Millis, target_angle: f32) -> bool {
        if self.warning.is_active() || !self.can_start_warning(now) {
            return false;
        }
        self.warning.start(now, target_angle);
        self.heading = target_angle;
        true
    }

    /// Cancels a warning that lost eligibility or outlived its grace period.
    ///
    /// Returns `true` if a warning was cancelled.
    pub fn update_warning(&mut self, now: Millis) -> bool {
        if self.warning.is_active() && (!self.can_start_warning(now) || self.warning.is_stale(now)) {
            self.warning.reset();
            return true;
        }
        false
    }

    /// True once the full warning has elapsed and the tank may still fire.
    ///
    /// Losing the armed state (frozen, disabled, shell in flight) cancels the
    /// warning.
    pub fn can_shoot(&mut self, now: Millis) -> bool {
        if !self.is_armed() {
            self.warning.reset();
            return false;
        }
        self.cooldown_elapsed(now) && self.warning.is_complete(now)
    }

    /// Fires a shell if the warning has completed.
    ///
    /// Returns `None` while a shell is in flight, during cooldown, or before
    /// the warning has run its full length.
    pub fn shoot(
        &mut self,
        id: EntityId,
        now: Millis,
        shell: &ShellConfig,
        target_distance: f32,
    ) -> Option<ShellLaunch> {
        if !self.can_shoot(now) {
            return None;
        }
        self.last_shot_at = Some(now);
        self.flags.insert(StatusFlags::SHELL_IN_FLIGHT);
        let angle = self.warning.fire().unwrap_or(self.heading);
        Some(ShellLaunch {
            owner: id,
            team: self.team,
            origin: self.position,
            angle,
            speed: shell.speed,
            size: shell.size,
            explosion_radius: shell.explosion_radius,
            target_distance,
        })
    }

    /// Frees the shell slot after this tank's shell detonated.
    pub fn clear_active_shell(&mut self) {
        self.flags.remove(StatusFlags::SHELL_IN_FLIGHT);
    }
}

/// Derives a per-entity seed from the master seed (splitmix64 finalizer).
#[must_use]
pub fn derive_seed(master: u64, id: EntityId) -> u64 {
    let mut z = master ^ id.as_u64().wrapping_mul(0x9E37_79B9_7F4A_7C15);
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}
