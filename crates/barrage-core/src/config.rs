//! Game configuration.
//!
//! [`GameConfig`] gathers every tunable constant of the battlefield: canvas and
//! channel geometry, tank stats, warning timings, grenade and pickup rules,
//! the rescue loop and the spawn cadence. All sections implement `Default`
//! with the values the game ships with, and the whole tree round-trips through
//! JSON so hosts can override individual fields.
//!
//! # Example
//!
//! ```
//! use barrage_core::config::GameConfig;
//!
//! let config = GameConfig::from_json(r#"{ "arena": { "width": 1000.0, "channel_width": 80.0 } }"#)
//!     .expect("valid config");
//!
//! assert!((config.arena.channel_left() - 460.0).abs() < 0.0001);
//! assert!((config.arena.channel_right() - 540.0).abs() < 0.0001);
//! assert_eq!(config.tank.max_health, 2);
//! ```

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::entity::Team;
use crate::error::ConfigError;
use crate::personality::Personality;

// =============================================================================
// Root
// =============================================================================

/// Complete configuration for one simulation.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Canvas, channel and safe-zone geometry.
    pub arena: ArenaConfig,
    /// Tank stats and status-effect timings.
    pub tank: TankConfig,
    /// Shooting-warning telegraph.
    pub warning: WarningConfig,
    /// Artillery shells.
    pub shell: ShellConfig,
    /// The medic.
    pub player: PlayerConfig,
    /// Freeze grenades thrown by the medic.
    pub grenade: GrenadeConfig,
    /// Grenade pickups spawned along the channel.
    pub pickup: PickupConfig,
    /// The injured soldier.
    pub soldier: SoldierConfig,
    /// Lives, delays and the freeze difficulty ramp.
    pub rescue: RescueConfig,
    /// Army initialization and reinforcement cadence.
    pub spawn: SpawnConfig,
    /// Frame-delta clamping.
    pub clock: ClockConfig,
}

impl GameConfig {
    /// Parses a config from JSON and validates it.
    ///
    /// Missing fields fall back to their defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] for malformed JSON and any validation
    /// error from [`GameConfig::validate`].
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Serializes the config to pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] if serialization fails.
    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Checks that the configuration describes a playable battlefield.
    ///
    /// # Errors
    ///
    /// Returns the first violated constraint.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let arena = &self.arena;
        if !(arena.width.is_finite() && arena.height.is_finite())
            || arena.width <= 0.0
            || arena.height <= 0.0
        {
            return Err(ConfigError::InvalidCanvas {
                width: arena.width,
                height: arena.height,
            });
        }
        if !arena.channel_width.is_finite()
            || arena.channel_width <= 0.0
            || arena.channel_width >= arena.width
        {
            return Err(ConfigError::InvalidChannel {
                channel_width: arena.channel_width,
                canvas_width: arena.width,
            });
        }

        positive("tank.size", self.tank.size)?;
        positive("tank.speed", self.tank.speed)?;
        positive("shell.speed", self.shell.speed)?;
        positive("shell.explosion_radius", self.shell.explosion_radius)?;
        positive("player.size", self.player.size)?;
        positive("grenade.radius", self.grenade.radius)?;
        positive("soldier.size", self.soldier.size)?;

        nonzero("tank.repair_ms", self.tank.repair_ms)?;
        nonzero("tank.direction_commit_ms", self.tank.direction_commit_ms)?;
        nonzero("warning.duration_ms", self.warning.duration_ms)?;
        nonzero("grenade.fuse_ms", self.grenade.fuse_ms)?;
        nonzero("pickup.lifetime_ms", self.pickup.lifetime_ms)?;
        nonzero("soldier.bleed_out_ms", self.soldier.bleed_out_ms)?;
        nonzero("spawn.min_interval_ms", self.spawn.min_interval_ms)?;
        nonzero("clock.max_frame_delta_ms", self.clock.max_frame_delta_ms)?;

        if self.tank.max_health == 0 {
            return Err(ConfigError::ZeroDuration {
                field: "tank.max_health",
            });
        }
        if self.pickup.min_interval_ms > self.pickup.max_interval_ms {
            return Err(ConfigError::InvertedRange {
                field: "pickup.interval",
                min: self.pickup.min_interval_ms,
                max: self.pickup.max_interval_ms,
            });
        }
        if self.spawn.min_interval_ms > self.spawn.max_interval_ms {
            return Err(ConfigError::InvertedRange {
                field: "spawn.interval",
                min: self.spawn.min_interval_ms,
                max: self.spawn.max_interval_ms,
            });
        }
        if self.spawn.roster.is_empty() {
            return Err(ConfigError::EmptyRoster);
        }
        Ok(())
    }
}

fn positive(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::NonPositive { field, value })
    }
}

fn nonzero(field: &'static str, value: u64) -> Result<(), ConfigError> {
    if value == 0 {
        Err(ConfigError::ZeroDuration { field })
    } else {
        Ok(())
    }
}

// =============================================================================
// Sections
// =============================================================================

/// Canvas geometry and the central channel ("no-man's-land").
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArenaConfig {
    /// Canvas width in pixels.
    pub width: f32,
    /// Canvas height in pixels.
    pub height: f32,
    /// Width of the channel, centered horizontally.
    pub channel_width: f32,
    /// The hospital safe zone covers `y < safe_zone_height`.
    pub safe_zone_height: f32,
}

impl Default for ArenaConfig {
    fn default() -> Self {
        Self {
            width: 1000.0,
            height: 600.0,
            channel_width: 60.0,
            safe_zone_height: 50.0,
        }
    }
}

impl ArenaConfig {
    /// Left edge of the channel.
    #[must_use]
    pub fn channel_left(&self) -> f32 {
        self.width / 2.0 - self.channel_width / 2.0
    }

    /// Right edge of the channel.
    #[must_use]
    pub fn channel_right(&self) -> f32 {
        self.width / 2.0 + self.channel_width / 2.0
    }

    /// Horizontal center of the channel (the medic's lane).
    #[must_use]
    pub fn channel_center(&self) -> f32 {
        (self.channel_left() + self.channel_right()) / 2.0
    }

    /// Center of the canvas.
    #[must_use]
    pub fn center(&self) -> Vec2 {
        Vec2::new(self.width / 2.0, self.height / 2.0)
    }

    /// Returns true if `pos` lies on the canvas (edges inclusive).
    #[must_use]
    pub fn contains(&self, pos: Vec2) -> bool {
        pos.x >= 0.0 && pos.x <= self.width && pos.y >= 0.0 && pos.y <= self.height
    }

    /// Returns true if `pos` is inside the hospital safe zone.
    #[must_use]
    pub fn in_safe_zone(&self, pos: Vec2) -> bool {
        pos.y < self.safe_zone_height
    }

    /// Returns true if `x` lies across the channel from `team`'s territory.
    #[must_use]
    pub fn is_across_channel(&self, team: Team, x: f32) -> bool {
        match team {
            Team::Left => x > self.channel_right(),
            Team::Right => x < self.channel_left(),
        }
    }
}

/// Tank stats.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TankConfig {
    /// Hull diameter.
    pub size: f32,
    /// Distance covered per tick at full speed.
    pub speed: f32,
    /// Starting (and repaired) health.
    pub max_health: u8,
    /// Time a disabled tank needs to self-repair.
    pub repair_ms: u64,
    /// Freeze duration used when none is given.
    pub default_freeze_ms: u64,
    /// How long a committed movement axis is held.
    pub direction_commit_ms: u64,
    /// Repulsion kicks in below `size * repulsion_radius_factor`.
    pub repulsion_radius_factor: f32,
    /// Distance a crowded tank is pushed per tick.
    pub repulsion_force: f32,
}

impl Default for TankConfig {
    fn default() -> Self {
        Self {
            size: 30.0,
            speed: 1.5,
            max_health: 2,
            repair_ms: 8000,
            default_freeze_ms: 3000,
            direction_commit_ms: 2000,
            repulsion_radius_factor: 0.8,
            repulsion_force: 0.5,
        }
    }
}

/// Shooting-warning telegraph timings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WarningConfig {
    /// Time between entering the warning and being allowed to fire.
    pub duration_ms: u64,
    /// Extra time after `duration_ms` before a stale warning is cancelled.
    pub grace_ms: u64,
    /// Flash half-period at the start of the warning.
    pub slow_flash_ms: f32,
    /// Flash half-period at the end of the warning.
    pub fast_flash_ms: f32,
    /// Easing exponent from slow to fast.
    pub curve: f32,
}

impl Default for WarningConfig {
    fn default() -> Self {
        Self {
            duration_ms: 500,
            grace_ms: 500,
            slow_flash_ms: 200.0,
            fast_flash_ms: 50.0,
            curve: 2.0,
        }
    }
}

/// Artillery shell parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShellConfig {
    /// Distance travelled per tick.
    pub speed: f32,
    /// Shell diameter, used for direct-hit tests.
    pub size: f32,
    /// Area-damage radius.
    pub explosion_radius: f32,
}

impl Default for ShellConfig {
    fn default() -> Self {
        Self {
            speed: 8.0,
            size: 6.0,
            explosion_radius: 80.0,
        }
    }
}

/// The medic.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerConfig {
    /// Starting (and respawn) height, at the channel center.
    pub start_y: f32,
    /// Body diameter.
    pub size: f32,
    /// Vertical distance per tick.
    pub speed: f32,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            start_y: 30.0,
            size: 20.0,
            speed: 3.0,
        }
    }
}

/// Freeze grenades.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GrenadeConfig {
    /// Grenades carried at the start.
    pub count: u32,
    /// Minimum time between throws.
    pub cooldown_ms: u64,
    /// Distance travelled per tick.
    pub throw_speed: f32,
    /// Time from throw to self-detonation.
    pub fuse_ms: u64,
    /// Freeze radius.
    pub radius: f32,
    /// Grenade diameter.
    pub size: f32,
}

impl Default for GrenadeConfig {
    fn default() -> Self {
        Self {
            count: 3,
            cooldown_ms: 3000,
            throw_speed: 4.0,
            fuse_ms: 1000,
            radius: 150.0,
            size: 8.0,
        }
    }
}

/// Grenade pickups along the channel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PickupConfig {
    /// Shortest random gap between spawns.
    pub min_interval_ms: u64,
    /// Longest random gap between spawns.
    pub max_interval_ms: u64,
    /// Time before an uncollected pickup is wasted.
    pub lifetime_ms: u64,
    /// Age at which the pickup starts flashing.
    pub flash_after_ms: u64,
    /// Flash toggle period.
    pub flash_toggle_ms: u64,
    /// Maximum pickups alive at once.
    pub max_alive: usize,
    /// Pickup radius.
    pub size: f32,
    /// Pickups spawn in `[edge_margin, height - edge_margin]`.
    pub edge_margin: f32,
}

impl Default for PickupConfig {
    fn default() -> Self {
        Self {
            min_interval_ms: 8000,
            max_interval_ms: 20000,
            lifetime_ms: 10000,
            flash_after_ms: 8000,
            flash_toggle_ms: 200,
            max_alive: 3,
            size: 8.0,
            edge_margin: 80.0,
        }
    }
}

/// The injured soldier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SoldierConfig {
    /// Body diameter.
    pub size: f32,
    /// Spawn height above the bottom edge.
    pub bottom_offset: f32,
    /// Time from spawn to death without rescue.
    pub bleed_out_ms: u64,
    /// Remaining fraction below which a carried soldier is critical.
    pub critical_fraction: f32,
}

impl Default for SoldierConfig {
    fn default() -> Self {
        Self {
            size: 15.0,
            bottom_offset: 50.0,
            bleed_out_ms: 30000,
            critical_fraction: 0.3,
        }
    }
}

/// Rescue loop and difficulty ramp.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RescueConfig {
    /// Player lives.
    pub lives: u32,
    /// Delay before a new soldier appears after a rescue.
    pub celebration_ms: u64,
    /// Delay before a new soldier appears after a death.
    pub mourning_ms: u64,
    /// Freeze duration before any rescue.
    pub base_freeze_ms: u64,
    /// Floor of the freeze duration.
    pub min_freeze_ms: u64,
    /// Freeze reduction per completed rescue.
    pub freeze_step_ms: u64,
}

impl Default for RescueConfig {
    fn default() -> Self {
        Self {
            lives: 3,
            celebration_ms: 2000,
            mourning_ms: 3000,
            base_freeze_ms: 5000,
            min_freeze_ms: 1000,
            freeze_step_ms: 800,
        }
    }
}

impl RescueConfig {
    /// Freeze duration after `rescues` completed rescues.
    #[must_use]
    pub fn freeze_duration_ms(&self, rescues: u32) -> u64 {
        self.base_freeze_ms
            .saturating_sub(u64::from(rescues).saturating_mul(self.freeze_step_ms))
            .max(self.min_freeze_ms)
    }
}

/// Army initialization and reinforcement cadence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpawnConfig {
    /// Personalities of the initial army, one tank each, per team.
    pub roster: Vec<Personality>,
    /// Placement attempts per initial tank.
    pub army_attempts: u32,
    /// Distance kept from the canvas edges and the channel at setup.
    pub army_margin: f32,
    /// Initial tanks keep `size * army_spacing_factor` apart.
    pub army_spacing_factor: f32,
    /// Interval with no tanks left, and the overall floor.
    pub min_interval_ms: u64,
    /// Interval with one tank left.
    pub one_tank_ms: u64,
    /// Interval with two tanks left.
    pub two_tank_ms: u64,
    /// Interval with three tanks.
    pub base_interval_ms: u64,
    /// Added per tank beyond three.
    pub per_extra_tank_ms: u64,
    /// Interval ceiling.
    pub max_interval_ms: u64,
    /// Interval reduction per completed rescue.
    pub rescue_accel_ms: u64,
    /// Delay before retrying a failed spawn.
    pub retry_ms: u64,
    /// Placement attempts per reinforcement.
    pub attempts: u32,
    /// Reinforcements keep `size * spacing_factor` from every tank.
    pub spacing_factor: f32,
    /// Reinforcement strip spans `[edge_inset, strip_depth]` from the home edge.
    pub edge_inset: f32,
    /// See `edge_inset`.
    pub strip_depth: f32,
}

impl Default for SpawnConfig {
    fn default() -> Self {
        Self {
            roster: vec![
                Personality::Aggressive,
                Personality::Sniper,
                Personality::Defensive,
                Personality::Flanker,
                Personality::Aggressive,
            ],
            army_attempts: 50,
            army_margin: 50.0,
            army_spacing_factor: 1.5,
            min_interval_ms: 2000,
            one_tank_ms: 6000,
            two_tank_ms: 10000,
            base_interval_ms: 15000,
            per_extra_tank_ms: 3000,
            max_interval_ms: 20000,
            rescue_accel_ms: 1000,
            retry_ms: 1000,
            attempts: 20,
            spacing_factor: 2.0,
            edge_inset: 10.0,
            strip_depth: 80.0,
        }
    }
}

/// Frame-delta clamping.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClockConfig {
    /// Largest simulation-time advance accepted for a single frame.
    pub max_frame_delta_ms: u64,
}

impl Default for ClockConfig {
    fn default() -> Self {
        Self {
            max_frame_delta_ms: 100,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    mod arena_tests {
        use super::*;

        #[test]
        fn channel_is_centered() {
            let arena = ArenaConfig::default();
            assert!((arena.channel_left() - 470.0).abs() < 0.0001);
            assert!((arena.channel_right() - 530.0).abs() < 0.0001);
            assert!((arena.channel_center() - 500.0).abs() < 0.0001);
        }

        #[test]
        fn across_channel_is_team_relative() {
            let arena = ArenaConfig::default();
            assert!(arena.is_across_channel(Team::Left, 600.0));
            assert!(!arena.is_across_channel(Team::Left, 500.0));
            assert!(arena.is_across_channel(Team::Right, 100.0));
            assert!(!arena.is_across_channel(Team::Right, 600.0));
        }

        #[test]
        fn safe_zone_is_top_strip() {
            let arena = ArenaConfig::default();
            assert!(arena.in_safe_zone(Vec2::new(500.0, 49.0)));
            assert!(!arena.in_safe_zone(Vec2::new(500.0, 50.0)));
        }
    }

    mod validation_tests {
        use super::*;

        #[test]
        fn default_is_valid() {
            assert!(GameConfig::default().validate().is_ok());
        }

        #[test]
        fn rejects_bad_canvas() {
            let mut config = GameConfig::default();
            config.arena.height = 0.0;
            assert!(matches!(
                config.validate(),
                Err(ConfigError::InvalidCanvas { .. })
            ));
        }

        #[test]
        fn rejects_channel_wider_than_canvas() {
            let mut config = GameConfig::default();
            config.arena.channel_width = 2000.0;
            assert!(matches!(
                config.validate(),
                Err(ConfigError::InvalidChannel { .. })
            ));
        }

        #[test]
        fn rejects_zero_repair_time() {
            let mut config = GameConfig::default();
            config.tank.repair_ms = 0;
            assert!(matches!(
                config.validate(),
                Err(ConfigError::ZeroDuration {
                    field: "tank.repair_ms"
                })
            ));
        }

        #[test]
        fn rejects_inverted_pickup_interval() {
            let mut config = GameConfig::default();
            config.pickup.min_interval_ms = 30000;
            assert!(matches!(
                config.validate(),
                Err(ConfigError::InvertedRange { .. })
            ));
        }

        #[test]
        fn rejects_empty_roster() {
            let mut config = GameConfig::default();
            config.spawn.roster.clear();
            assert!(matches!(config.validate(), Err(ConfigError::EmptyRoster)));
        }
    }

    mod json_tests {
        use super::*;

        #[test]
        fn partial_json_fills_defaults() {
            let config = GameConfig::from_json(r#"{ "tank": { "speed": 2.0 } }"#).unwrap();
            assert!((config.tank.speed - 2.0).abs() < 0.0001);
            assert!((config.tank.size - 30.0).abs() < 0.0001);
            assert_eq!(config.rescue.lives, 3);
        }

        #[test]
        fn malformed_json_is_an_error() {
            assert!(matches!(
                GameConfig::from_json("{ nope"),
                Err(ConfigError::Parse(_))
            ));
        }

        #[test]
        fn invalid_json_values_are_rejected() {
            let result = GameConfig::from_json(r#"{ "warning": { "duration_ms": 0 } }"#);
            assert!(matches!(result, Err(ConfigError::ZeroDuration { .. })));
        }

        #[test]
        fn serialized_config_parses_back() {
            let config = GameConfig::default();
            let json = config.to_json().unwrap();
            assert_eq!(GameConfig::from_json(&json).unwrap(), config);
        }
    }

    mod freeze_ramp_tests {
        use super::*;

        #[test]
        fn freeze_shrinks_with_rescues_down_to_floor() {
            let rescue = RescueConfig::default();
            assert_eq!(rescue.freeze_duration_ms(0), 5000);
            assert_eq!(rescue.freeze_duration_ms(1), 4200);
            assert_eq!(rescue.freeze_duration_ms(5), 1000);
            assert_eq!(rescue.freeze_duration_ms(50), 1000);
        }

        #[test]
        fn huge_step_saturates_to_floor() {
            let rescue = RescueConfig {
                freeze_step_ms: u64::MAX,
                ..RescueConfig::default()
            };
            assert_eq!(rescue.freeze_duration_ms(u32::MAX), 1000);
            assert_eq!(rescue.freeze_duration_ms(0), 5000);
        }
    }
}
