//! Line of sight and cover.
//!
//! Exposure is deliberately crude: a tank is exposed when an enemy sits on
//! roughly the same horizontal band on the far side of the channel. Breaking
//! line of sight therefore means changing rows, never hiding behind anything.

use glam::Vec2;

use crate::config::ArenaConfig;
use crate::entity::Team;

/// Vertical separation below which two tanks see each other.
pub const SIGHT_BAND: f32 = 80.0;

/// Vertical separation a cover point tries to reach.
pub const COVER_BAND: f32 = 120.0;

/// How far a tank moves up or down in one cover step.
pub const COVER_STEP: f32 = 100.0;

/// Margin kept from the canvas edges and the channel when picking cover.
pub const COVER_MARGIN: f32 = 60.0;

/// True if a tank of `team` at `from` is exposed to the enemy at `enemy`.
///
/// # Example
///
/// ```
/// use barrage_core::ai::sensor::in_line_of_sight;
/// use barrage_core::config::ArenaConfig;
/// use barrage_core::entity::Team;
/// use glam::Vec2;
///
/// let arena = ArenaConfig { channel_width: 80.0, ..ArenaConfig::default() };
/// let left = Vec2::new(100.0, 300.0);
/// let right = Vec2::new(900.0, 300.0);
///
/// assert!(in_line_of_sight(Team::Left, left, right, &arena));
/// assert!(in_line_of_sight(Team::Right, right, left, &arena));
/// assert!(!in_line_of_sight(Team::Left, left, Vec2::new(900.0, 390.0), &arena));
/// ```
#[must_use]
pub fn in_line_of_sight(team: Team, from: Vec2, enemy: Vec2, arena: &ArenaConfig) -> bool {
    (enemy.y - from.y).abs() < SIGHT_BAND && arena.is_across_channel(team, enemy.x)
}

/// Point a tank should move to in order to break line of sight.
///
/// When the enemy is within [`COVER_BAND`] rows the point is one step up (upper
/// half) or down (lower half). The point never leaves the home half.
#[must_use]
pub fn cover_point(team: Team, from: Vec2, enemy: Vec2, arena: &ArenaConfig) -> Vec2 {
    let mut target_y = from.y;
    if (from.y - enemy.y).abs() < COVER_BAND {
        target_y = if from.y < arena.height / 2.0 {
            (from.y - COVER_STEP).max(COVER_MARGIN)
        } else {
            (from.y + COVER_STEP).min(arena.height - COVER_MARGIN)
        };
    }
    let target_x = match team {
        Team::Left => from
            .x
            .min(arena.channel_left() - COVER_MARGIN)
            .max(COVER_MARGIN),
        Team::Right => from
            .x
            .min(arena.width - COVER_MARGIN)
            .max(arena.channel_right() + COVER_MARGIN),
    };
    Vec2::new(target_x, target_y)
}
