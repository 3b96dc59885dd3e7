//! Direction commitment and the actual move.
//!
//! Intent vectors from [`movement`](super::movement) are snapped to a single
//! axis and held for the commit window, so tanks move in straight horizontal
//! or vertical runs instead of jittering diagonally.

use glam::Vec2;
use rand::Rng;

use crate::clock::Millis;
use crate::config::ArenaConfig;
use crate::entity::Team;
use crate::geometry::{clamp_to_canvas, heading_of};
use crate::tank::Tank;

use super::AiBrain;

/// Movement below this per-axis magnitude does not turn the hull.
const TURN_THRESHOLD: f32 = 0.1;

/// Snaps `intent` to its dominant axis, keeping it only when it differs
/// from the committed axis and the commit window has passed.
///
/// Returns the direction to move this tick: the committed unit axis scaled by
/// the intent's magnitude, or the bare committed axis while the window holds.
pub fn commit<R: Rng + ?Sized>(brain: &mut AiBrain, now: Millis, rng: &mut R) -> Vec2 {
    let committed_at = *brain.committed_at.get_or_insert(now);
    if now.saturating_sub(committed_at) <= brain.commit_ms {
        return brain.committed;
    }

    let intent = brain.direction;
    let ax = intent.x.abs();
    let ay = intent.y.abs();
    let horizontal = Vec2::new(intent.x.signum(), 0.0);
    let vertical = Vec2::new(0.0, intent.y.signum());
    let axis = if ax > ay {
        horizontal
    } else if ay > ax {
        vertical
    } else if ax > 0.0 {
        if rng.gen::<f32>() > 0.5 {
            horizontal
        } else {
            vertical
        }
    } else {
        brain.committed
    };

    if axis != brain.committed {
        brain.committed = axis;
        brain.committed_at = Some(now);
    }
    brain.committed * intent.length()
}

/// Moves the tank one tick along `direction` at full tank speed.
///
/// A tank in its shooting warning stands still. The hull turns to face the
/// movement, the canvas clamps the body, and the channel edge stops it.
pub fn execute(tank: &mut Tank, direction: Vec2, arena: &ArenaConfig) {
    if tank.warning().is_active() {
        tank.brain.direction = Vec2::ZERO;
        return;
    }

    let step = direction.try_normalize().map_or(Vec2::ZERO, |d| d * tank.speed());
    if step.x.abs() > TURN_THRESHOLD || step.y.abs() > TURN_THRESHOLD {
        tank.heading = heading_of(step);
    }

    let half = tank.size() / 2.0;
    let mut next = clamp_to_canvas(tank.position + step, tank.size(), arena.width, arena.height);
    let mut stored = step;
    match tank.team() {
        Team::Left if next.x + half > arena.channel_left() => {
            next.x = arena.channel_left() - half;
            stored.x = 0.0;
        }
        Team::Right if next.x - half < arena.channel_right() => {
            next.x = arena.channel_right() + half;
            stored.x = 0.0;
        }
        _ => {}
    }
    tank.position = next;
    tank.brain.direction = stored;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GameConfig;
    use crate::personality::Personality;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn brain() -> AiBrain {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        AiBrain::new(2000, &mut rng)
    }

    mod commit_tests {
        use super::*;

        #[test]
        fn first_call_holds_initial_axis() {
            let mut b = brain();
            let mut rng = ChaCha8Rng::seed_from_u64(2);
            b.direction = Vec2::new(5.0, 0.0);
            let dir = commit(&mut b, 100, &mut rng);
            assert_eq!(dir, Vec2::new(0.0, 1.0));
        }

        #[test]
        fn snaps_to_dominant_axis_after_window() {
            let mut b = brain();
            let mut rng = ChaCha8Rng::seed_from_u64(2);
            commit(&mut b, 0, &mut rng);
            b.direction = Vec2::new(-3.0, 4.0);
            let dir = commit(&mut b, 2001, &mut rng);
            assert!((dir.x).abs() < 0.0001);
            assert!((dir.y - 5.0).abs() < 0.0001);

            b.direction = Vec2::new(-4.0, 3.0);
            let dir = commit(&mut b, 2002, &mut rng);
            assert!((dir.x + 5.0).abs() < 0.0001);
            assert_eq!(b.committed_direction(), Vec2::new(-1.0, 0.0));
        }

        #[test]
        fn new_axis_is_held_for_window() {
            let mut b = brain();
            let mut rng = ChaCha8Rng::seed_from_u64(2);
            commit(&mut b, 0, &mut rng);
            b.direction = Vec2::new(1.0, 0.0);
            commit(&mut b, 2001, &mut rng);
            b.direction = Vec2::new(0.0, -1.0);
            let held = commit(&mut b, 3000, &mut rng);
            assert_eq!(held, Vec2::new(1.0, 0.0));
            let switched = commit(&mut b, 4002, &mut rng);
            assert_eq!(switched, Vec2::new(0.0, -1.0));
        }

        #[test]
        fn zero_intent_keeps_axis() {
            let mut b = brain();
            let mut rng = ChaCha8Rng::seed_from_u64(2);
            commit(&mut b, 0, &mut rng);
            b.direction = Vec2::ZERO;
            let dir = commit(&mut b, 5000, &mut rng);
            assert_eq!(dir, Vec2::ZERO);
            assert_eq!(b.committed_direction(), Vec2::new(0.0, 1.0));
        }
    }

    mod execute_tests {
        use super::*;

        fn tank(team: Team, x: f32) -> Tank {
            Tank::new(
                Vec2::new(x, 300.0),
                team,
                Personality::Defensive,
                &GameConfig::default(),
                5,
            )
        }

        #[test]
        fn moves_at_tank_speed_and_turns() {
            let arena = ArenaConfig::default();
            let mut t = tank(Team::Left, 200.0);
            execute(&mut t, Vec2::new(0.0, 0.2), &arena);
            assert!((t.position.y - 301.5).abs() < 0.0001);
            assert!((t.heading - std::f32::consts::FRAC_PI_2).abs() < 0.0001);
        }

        #[test]
        fn channel_stops_left_team() {
            let arena = ArenaConfig::default();
            let mut t = tank(Team::Left, 454.0);
            execute(&mut t, Vec2::new(1.0, 0.0), &arena);
            assert!((t.position.x - (arena.channel_left() - 15.0)).abs() < 0.0001);
            assert!(t.brain().direction().x.abs() < 0.0001);
        }

        #[test]
        fn channel_stops_right_team() {
            let arena = ArenaConfig::default();
            let mut t = tank(Team::Right, 546.0);
            execute(&mut t, Vec2::new(-1.0, 0.0), &arena);
            assert!((t.position.x - (arena.channel_right() + 15.0)).abs() < 0.0001);
        }

        #[test]
        fn warning_freezes_movement() {
            let arena = ArenaConfig::default();
            let mut t = tank(Team::Left, 200.0);
            assert!(t.start_warning(10_000, 0.0));
            execute(&mut t, Vec2::new(0.0, 1.0), &arena);
            assert!((t.position.y - 300.0).abs() < 0.0001);
        }
    }
}
