//! Firing decisions.
//!
//! A tank never fires on sight. When a target qualifies the tank first enters
//! its shooting warning; a later tick that still qualifies turns the completed
//! warning into a [`Command::LaunchShell`]. Teams fire straight across the
//! channel, so the shell angle is fixed per team and the enemy's position only
//! sets how far the shell flies.

use rand::Rng;
use tracing::trace;

use crate::clock::Millis;
use crate::config::GameConfig;
use crate::decision::Decision;
use crate::entity::{EntityId, Team};
use crate::event::GameEvent;
use crate::output::{Command, Output};
use crate::tank::Tank;
use crate::world_view::TankSnapshot;

/// Vertical offset beyond which a target is not worth a shot.
pub const VERTICAL_TOLERANCE: f32 = 100.0;

/// Closest target distance.
pub const MIN_RANGE: f32 = 50.0;

/// Farthest target distance.
pub const MAX_RANGE: f32 = 600.0;

/// Chance that a hesitating tank passes on an otherwise valid shot.
const HESITATE_SKIP: f32 = 0.02;

/// True if `enemy` is a target this tank should telegraph a shot at.
pub fn should_shoot(tank: &mut Tank, enemy: &TankSnapshot, now: Millis) -> bool {
    if !tank.can_start_warning(now) {
        return false;
    }
    let delta = enemy.position - tank.position;
    let facing = match tank.team() {
        Team::Left => delta.x > 0.0,
        Team::Right => delta.x < 0.0,
    };
    if !facing {
        return false;
    }
    let distance = delta.length();
    if delta.y.abs() > VERTICAL_TOLERANCE || !(MIN_RANGE..=MAX_RANGE).contains(&distance) {
        return false;
    }
    !(tank.brain.sampler.decision() == Decision::Hesitate && tank.rng.gen::<f32>() < HESITATE_SKIP)
}

/// Runs the warning and firing step for one tank.
///
/// Stale or ineligible warnings are cancelled first. A qualifying target
/// across the channel then either starts the warning or, once it completes,
/// fires.
pub fn fire(
    id: EntityId,
    tank: &mut Tank,
    enemy: Option<&TankSnapshot>,
    now: Millis,
    config: &GameConfig,
    outputs: &mut Vec<Output>,
) {
    tank.update_warning(now);
    let Some(enemy) = enemy else {
        return;
    };
    if !should_shoot(tank, enemy, now) || !config.arena.is_across_channel(tank.team(), enemy.position.x) {
        return;
    }

    if !tank.warning().is_active() {
        let angle = tank.team().firing_angle();
        if tank.start_warning(now, angle) {
            trace!(tank = %id, target = %enemy.id, "warning started");
            outputs.push(GameEvent::WarningStarted { tank: id }.into());
        }
    } else {
        let distance = tank.position.distance(enemy.position);
        if let Some(launch) = tank.shoot(id, now, &config.shell, distance) {
            trace!(tank = %id, distance, "shell launched");
            outputs.push(Command::LaunchShell(launch).into());
        }
    }
}
