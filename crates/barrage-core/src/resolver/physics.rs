//! Physics resolver: tank-to-tank repulsion.
//!
//! Tanks do not collide rigidly. After the AI phase, any two tanks closer than
//! `size * repulsion_radius_factor` are nudged apart by `repulsion_force`
//! pixels. Only the lower-id tank of a pair moves, so a pair is never pushed
//! twice in one tick.
//!
//! # Processing Order
//!
//! Pairs are visited as `(i, j)` with `i < j` in id order, and each nudge uses
//! positions already updated by earlier pairs.

use glam::Vec2;

use crate::arena::Arena;
use crate::config::GameConfig;
use crate::entity::EntityId;
use crate::event::GameEvent;
use crate::geometry::clamp_to_canvas;
use crate::output::{OutputEnvelope, OutputKind};

use super::{ResolveContext, Resolver};

/// Pairs closer than this are treated as stacked and left alone.
const MIN_SEPARATION: f32 = 0.1;

/// Resolver that separates overlapping tanks.
///
/// # Example
///
/// ```
/// use barrage_core::resolver::{PhysicsResolver, Resolver};
///
/// let resolver = PhysicsResolver::new();
/// assert!(resolver.handles().is_empty());
/// ```
#[derive(Debug, Clone, Default)]
pub struct PhysicsResolver;

impl PhysicsResolver {
    /// Creates a new physics resolver.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Applies one round of repulsion to every tank pair.
    pub fn separate(arena: &mut Arena, config: &GameConfig) {
        let ids: Vec<EntityId> = arena.tanks().map(|(id, _)| id).collect();
        for (i, &id) in ids.iter().enumerate() {
            for &other in &ids[i + 1..] {
                let Some(other_pos) = arena.tank(other).map(|t| t.position) else {
                    continue;
                };
                let Some(tank) = arena.tank_mut(id) else {
                    continue;
                };
                let radius = tank.size() * config.tank.repulsion_radius_factor;
                let offset = tank.position - other_pos;
                let distance = offset.length();
                if distance < radius && distance > MIN_SEPARATION {
                    let push: Vec2 = offset / distance * config.tank.repulsion_force;
                    tank.position = clamp_to_canvas(
                        tank.position + push,
                        tank.size(),
                        config.arena.width,
                        config.arena.height,
                    );
                }
            }
        }
    }
}

impl Resolver for PhysicsResolver {
    fn handles(&self) -> &[OutputKind] {
        &[]
    }

    fn resolve(
        &self,
        _outputs: &[&OutputEnvelope],
        ctx: &ResolveContext<'_>,
        arena: &mut Arena,
    ) -> Vec<GameEvent> {
        Self::separate(arena, ctx.config);
        Vec::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::{Entity, Team};
    use crate::personality::Personality;
    use crate::tank::Tank;

    fn spawn(arena: &mut Arena, x: f32, y: f32) -> EntityId {
        let config = GameConfig::default();
        arena.spawn_with(|id| {
            Entity::tank(
                id,
                Tank::new(Vec2::new(x, y), Team::Left, Personality::Sniper, &config, 1),
            )
        })
    }

    #[test]
    fn lower_id_is_pushed_away() {
        let config = GameConfig::default();
        let mut arena = Arena::new();
        let a = spawn(&mut arena, 200.0, 300.0);
        let b = spawn(&mut arena, 210.0, 300.0);
        PhysicsResolver::separate(&mut arena, &config);
        assert!((arena.tank(a).map_or(0.0, |t| t.position.x) - 199.5).abs() < 0.0001);
        assert!((arena.tank(b).map_or(0.0, |t| t.position.x) - 210.0).abs() < 0.0001);
    }

    #[test]
    fn distant_and_stacked_tanks_stay_put() {
        let config = GameConfig::default();
        let mut arena = Arena::new();
        let a = spawn(&mut arena, 200.0, 300.0);
        let b = spawn(&mut arena, 200.0, 300.0);
        let c = spawn(&mut arena, 300.0, 300.0);
        PhysicsResolver::separate(&mut arena, &config);
        for id in [a, b] {
            assert_eq!(arena.tank(id).map(|t| t.position), Some(Vec2::new(200.0, 300.0)));
        }
        assert_eq!(arena.tank(c).map(|t| t.position), Some(Vec2::new(300.0, 300.0)));
    }

    #[test]
    fn push_is_clamped_to_canvas() {
        let config = GameConfig::default();
        let mut arena = Arena::new();
        let a = spawn(&mut arena, 15.0, 300.0);
        spawn(&mut arena, 20.0, 300.0);
        PhysicsResolver::separate(&mut arena, &config);
        assert!((arena.tank(a).map_or(0.0, |t| t.position.x) - 15.0).abs() < 0.0001);
    }
}
