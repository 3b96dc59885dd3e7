//! Arena module for the battlefield.
//!
//! The Arena is the container for every tank, shell, freeze grenade and
//! grenade pickup. It provides:
//! - Entity storage with deterministic iteration order (`BTreeMap`)
//! - Entity lifecycle management (spawn/despawn)
//! - Typed views over tanks and proximity queries
//!
//! # Architecture
//!
//! Entity IDs are monotonically increasing and never reused, and the
//! `BTreeMap`'s natural ordering makes every iteration (and every query
//! result) come back in creation order. The world loop never holds references
//! between entities; cross-entity effects look each other up by id or by
//! position through this container.
//!
//! # Example
//!
//! ```
//! use barrage_core::arena::Arena;
//! use barrage_core::config::GameConfig;
//! use barrage_core::entity::{Entity, Team};
//! use barrage_core::personality::Personality;
//! use barrage_core::tank::Tank;
//! use glam::Vec2;
//!
//! let config = GameConfig::default();
//! let mut arena = Arena::new();
//!
//! let id = arena.spawn_with(|id| {
//!     Entity::tank(id, Tank::new(Vec2::new(100.0, 200.0), Team::Left, Personality::Sniper, &config, id.as_u64()))
//! });
//!
//! assert_eq!(arena.tank_count(Team::Left), 1);
//! assert_eq!(arena.query_radius(Vec2::new(100.0, 210.0), 20.0), vec![id]);
//! ```

use std::collections::BTreeMap;

use glam::Vec2;
use rayon::prelude::*;

use crate::entity::{Entity, EntityId, EntityTag, Team};
use crate::grenade::{FreezeGrenade, PickupGrenade};
use crate::shell::Shell;
use crate::tank::Tank;

// =============================================================================
// Arena
// =============================================================================

/// Battlefield container with deterministic iteration.
#[derive(Debug, Clone)]
pub struct Arena {
    /// Monotonically increasing entity ID counter.
    next_id: u64,
    /// Entity storage with deterministic iteration order.
    entities: BTreeMap<EntityId, Entity>,
}

impl Arena {
    /// Creates an empty arena. The first entity gets id 1.
    #[must_use]
    pub fn new() -> Self {
        Self {
            next_id: 1,
            entities: BTreeMap::new(),
        }
    }

    /// Spawns an entity built from its freshly assigned id.
    ///
    /// The builder receives the id so that state derived from it (a tank's
    /// private generator seed) is fixed at construction.
    pub fn spawn_with(&mut self, build: impl FnOnce(EntityId) -> Entity) -> EntityId {
        let id = EntityId::new(self.next_id);
        self.next_id += 1;
        let entity = build(id);
        debug_assert_eq!(entity.id(), id, "entity built with a foreign id");
        self.entities.insert(id, entity);
        id
    }

    /// Puts a shell in the arena.
    pub fn spawn_shell(&mut self, shell: Shell) -> EntityId {
        self.spawn_with(|id| Entity::shell(id, shell))
    }

    /// Puts a freeze grenade in the arena.
    pub fn spawn_freeze_grenade(&mut self, grenade: FreezeGrenade) -> EntityId {
        self.spawn_with(|id| Entity::freeze_grenade(id, grenade))
    }

    /// Puts a grenade pickup in the arena.
    pub fn spawn_pickup(&mut self, pickup: PickupGrenade) -> EntityId {
        self.spawn_with(|id| Entity::pickup(id, pickup))
    }

    /// Removes an entity, returning it if it existed.
    pub fn despawn(&mut self, id: EntityId) -> Option<Entity> {
        self.entities.remove(&id)
    }

    /// Returns a reference to an entity by ID.
    #[must_use]
    pub fn get(&self, id: EntityId) -> Option<&Entity> {
        self.entities.get(&id)
    }

    /// Returns a mutable reference to an entity by ID.
    #[must_use]
    pub fn get_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        self.entities.get_mut(&id)
    }

    /// Returns true if the entity is still present.
    #[must_use]
    pub fn contains(&self, id: EntityId) -> bool {
        self.entities.contains_key(&id)
    }

    /// Returns an iterator over entity IDs in deterministic (sorted) order.
    pub fn entity_ids_sorted(&self) -> impl Iterator<Item = EntityId> + '_ {
        self.entities.keys().copied()
    }

    /// Returns an iterator over entities in deterministic (sorted by ID) order.
    pub fn entities_sorted(&self) -> impl Iterator<Item = &Entity> + '_ {
        self.entities.values()
    }

    /// Returns the number of entities in the arena.
    #[must_use]
    pub fn entity_count(&self) -> usize {
        self.entities.len()
    }

    /// Returns true if the arena has no entities.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// Removes every entity. Ids keep counting up.
    pub fn clear(&mut self) {
        self.entities.clear();
    }

    // =========================================================================
    // Typed views
    // =========================================================================

    /// IDs of every entity with `tag`, in creation order.
    #[must_use]
    pub fn ids_with_tag(&self, tag: EntityTag) -> Vec<EntityId> {
        self.entities
            .values()
            .filter(|e| e.tag() == tag)
            .map(Entity::id)
            .collect()
    }

    /// Returns a tank by ID.
    #[must_use]
    pub fn tank(&self, id: EntityId) -> Option<&Tank> {
        self.entities.get(&id).and_then(Entity::as_tank)
    }

    /// Returns a mutable tank by ID.
    #[must_use]
    pub fn tank_mut(&mut self, id: EntityId) -> Option<&mut Tank> {
        self.entities.get_mut(&id).and_then(Entity::as_tank_mut)
    }

    /// Iterates tanks in creation order.
    pub fn tanks(&self) -> impl Iterator<Item = (EntityId, &Tank)> + '_ {
        self.entities
            .values()
            .filter_map(|e| e.as_tank().map(|t| (e.id(), t)))
    }

    /// Iterates tanks of one team in creation order.
    pub fn team_tanks(&self, team: Team) -> impl Iterator<Item = (EntityId, &Tank)> + '_ {
        self.tanks().filter(move |(_, t)| t.team() == team)
    }

    /// Number of tanks on `team`.
    #[must_use]
    pub fn tank_count(&self, team: Team) -> usize {
        self.team_tanks(team).count()
    }

    /// Runs `f` on every tank in parallel and collects the results.
    ///
    /// Each call gets exclusive access to one tank only. Results come back
    /// in creation order regardless of scheduling.
    pub fn par_map_tanks<R, F>(&mut self, f: F) -> Vec<R>
    where
        R: Send,
        F: Fn(EntityId, &mut Tank) -> R + Sync,
    {
        let tanks: Vec<(EntityId, &mut Tank)> = self
            .entities
            .iter_mut()
            .filter_map(|(id, e)| e.as_tank_mut().map(|t| (*id, t)))
            .collect();
        tanks.into_par_iter().map(|(id, tank)| f(id, tank)).collect()
    }

    /// Returns a shell by ID.
    #[must_use]
    pub fn shell_mut(&mut self, id: EntityId) -> Option<&mut Shell> {
        self.entities.get_mut(&id).and_then(Entity::as_shell_mut)
    }

    /// Returns a freeze grenade by ID.
    #[must_use]
    pub fn freeze_grenade_mut(&mut self, id: EntityId) -> Option<&mut FreezeGrenade> {
        self.entities
            .get_mut(&id)
            .and_then(Entity::as_freeze_grenade_mut)
    }

    /// Returns a pickup by ID.
    #[must_use]
    pub fn pickup_mut(&mut self, id: EntityId) -> Option<&mut PickupGrenade> {
        self.entities.get_mut(&id).and_then(Entity::as_pickup_mut)
    }

    /// Number of live pickups.
    #[must_use]
    pub fn pickup_count(&self) -> usize {
        self.entities
            .values()
            .filter(|e| e.tag() == EntityTag::Pickup)
            .count()
    }

    // =========================================================================
    // Proximity
    // =========================================================================

    /// Entities within `radius` of `center` (edge inclusive), sorted by ID.
    #[must_use]
    pub fn query_radius(&self, center: Vec2, radius: f32) -> Vec<EntityId> {
        let radius_sq = radius * radius;
        self.entities
            .values()
            .filter(|e| center.distance_squared(e.position()) <= radius_sq)
            .map(Entity::id)
            .collect()
    }

    /// Tanks within `radius` of `center` (edge inclusive), optionally of one
    /// team, sorted by ID.
    #[must_use]
    pub fn tanks_within(&self, center: Vec2, radius: f32, team: Option<Team>) -> Vec<EntityId> {
        self.tanks()
            .filter(|(_, t)| team.map_or(true, |team| t.team() == team))
            .filter(|(_, t)| center.distance(t.position) <= radius)
            .map(|(id, _)| id)
            .collect()
    }

    /// True if any tank center lies closer than `min_spacing` to `pos`.
    #[must_use]
    pub fn is_position_occupied(&self, pos: Vec2, min_spacing: f32) -> bool {
        self.tanks()
            .any(|(_, t)| t.position.distance(pos) < min_spacing)
    }
}

impl Default for Arena {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// Tests
// =============================================================================
