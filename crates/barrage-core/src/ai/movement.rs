//! Movement intent for each AI state.
//!
//! Every function here writes the tank's raw intended direction into its
//! brain. The vector is unnormalized: only its direction survives
//! [`steering`](super::steering), except that a zero vector means "keep the
//! committed direction".

use std::f32::consts::{FRAC_PI_2, FRAC_PI_4};

use glam::Vec2;
use rand::Rng;

use super::sensor::cover_point;
use crate::clock::Millis;
use crate::config::ArenaConfig;
use crate::decision::Decision;
use crate::entity::Team;
use crate::geometry::{from_angle, heading_of, sign0};
use crate::personality::Personality;
use crate::tank::Tank;

/// Distance to the cover point under which the tank creeps instead of runs.
const COVER_ARRIVAL: f32 = 10.0;

/// Distance from a wall at which patrol turns around.
const WALL_MARGIN: f32 = 60.0;

/// Distance from the center beyond which patrol drifts back.
const CENTER_SLACK: f32 = 100.0;

/// Distance from the channel beyond which patrol may head toward it.
const CHANNEL_SLACK: f32 = 120.0;

/// Runs toward the cover point, or creeps once there.
pub fn seek_cover(tank: &mut Tank, enemy: Vec2, arena: &ArenaConfig) {
    let target = cover_point(tank.team(), tank.position, enemy, arena);
    let offset = target - tank.position;
    let distance = offset.length();
    if distance > COVER_ARRIVAL {
        tank.brain.direction = offset / distance * tank.profile().speed_factor * 1.2;
    } else {
        tank.brain.direction *= 0.2;
    }
}

/// Personality-specific combat movement, modulated by the active decision.
pub fn combat(tank: &mut Tank, enemy: Vec2, arena: &ArenaConfig) {
    let decision = tank.brain.sampler.decision();
    if decision == Decision::SeekCover {
        let target = cover_point(tank.team(), tank.position, enemy, arena);
        tank.brain.direction = (target - tank.position) * 0.5;
        return;
    }

    let profile = *tank.profile();
    let modifiers = decision.modifiers();
    let optimal = profile.optimal_distance * modifiers.distance;
    let speed = profile.speed_factor * modifiers.speed;
    let distance = tank.position.distance(enemy);
    let angle = heading_of(enemy - tank.position);
    let toward = from_angle(angle);
    let strafe = if tank.brain.sampler.random_factor() > 0.5 {
        FRAC_PI_4
    } else {
        -FRAC_PI_4
    };

    tank.brain.direction = match tank.personality() {
        Personality::Aggressive => {
            if decision == Decision::Panic {
                let jitter = Vec2::new(tank.rng.gen::<f32>() - 0.5, tank.rng.gen::<f32>() - 0.5);
                jitter * speed * 2.0
            } else if distance > optimal {
                toward * speed
            } else {
                from_angle(angle + FRAC_PI_2) * speed * 0.8
            }
        }
        Personality::Sniper => {
            if decision == Decision::Hesitate {
                Vec2::ZERO
            } else if distance < optimal || decision == Decision::Cautious {
                -toward * speed
            } else {
                from_angle(angle + strafe) * speed * 0.3
            }
        }
        Personality::Defensive => {
            if decision == Decision::Panic && distance < optimal * 0.8 {
                -toward * speed * 0.5
            } else {
                from_angle(angle + strafe) * speed * 0.6
            }
        }
        Personality::Flanker => {
            let flank = from_angle(match tank.team() {
                Team::Left => angle + FRAC_PI_2,
                Team::Right => angle - FRAC_PI_2,
            });
            if decision == Decision::Reposition {
                flank * speed * 1.2
            } else if distance > optimal * 1.3 {
                (toward + flank) * speed * 0.7
            } else if distance < optimal * 0.8 {
                -toward * speed * 0.6
            } else {
                flank * speed
            }
        }
    };
}

/// Wandering with a pull toward the enemy, away from walls and toward the
/// middle of the field.
pub fn patrol(tank: &mut Tank, enemy: Option<Vec2>, now: Millis, arena: &ArenaConfig) {
    if let Some(enemy) = enemy {
        tank.brain.direction = sign0(enemy - tank.position) * 0.4;
    } else if tank
        .brain
        .last_wander_at
        .map_or(true, |t| now.saturating_sub(t) > tank.brain.wander_interval_ms)
    {
        tank.brain.direction = Vec2::new(
            (tank.rng.gen::<f32>() - 0.5) * 1.5,
            (tank.rng.gen::<f32>() - 0.5) * 1.5,
        );
        tank.brain.last_wander_at = Some(now);
        tank.brain.wander_interval_ms = tank.rng.gen_range(2000..3000);
    }

    let pos = tank.position;
    let team = tank.team();
    let dir = &mut tank.brain.direction;

    if tank.rng.gen::<f32>() < 0.2 {
        let channel = arena.channel_center();
        match team {
            Team::Left if pos.x < channel - CHANNEL_SLACK => dir.x = dir.x.abs(),
            Team::Right if pos.x > channel + CHANNEL_SLACK => dir.x = -dir.x.abs(),
            _ => {}
        }
    }

    if pos.x < WALL_MARGIN {
        dir.x = dir.x.abs();
    } else if pos.x > arena.width - WALL_MARGIN {
        dir.x = -dir.x.abs();
    }
    if pos.y < WALL_MARGIN {
        dir.y = dir.y.abs();
    } else if pos.y > arena.height - WALL_MARGIN {
        dir.y = -dir.y.abs();
    }

    if tank.rng.gen::<f32>() < 0.3 {
        let center = arena.center();
        if pos.x < center.x - CENTER_SLACK {
            dir.x += 0.5;
        } else if pos.x > center.x + CENTER_SLACK {
            dir.x -= 0.5;
        }
        if pos.y < center.y - CENTER_SLACK {
            dir.y += 0.3;
        } else if pos.y > center.y + CENTER_SLACK {
            dir.y -= 0.3;
        }
    }
}
