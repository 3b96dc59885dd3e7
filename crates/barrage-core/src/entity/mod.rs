//! Entity module for the battlefield arena.
//!
//! This module provides the identity and storage types for everything that
//! lives in the [`Arena`](crate::arena::Arena):
//! - [`EntityId`]: Unique, monotonically assigned identifier
//! - [`EntityTag`]: Type classification (tank, shell, grenade, pickup)
//! - [`EntityInner`]: Type-safe storage for the entity's state
//! - [`Entity`]: The complete entity container
//!
//! The medic and the injured soldier are singletons owned directly by the
//! simulation and do not live in the arena.
//!
//! # Example
//!
//! ```
//! use barrage_core::entity::{Entity, EntityId, EntityTag};
//! use barrage_core::grenade::PickupGrenade;
//! use glam::Vec2;
//!
//! let pickup = Entity::pickup(EntityId::new(7), PickupGrenade::new(Vec2::new(500.0, 200.0), 0));
//!
//! assert_eq!(pickup.id().as_u64(), 7);
//! assert_eq!(pickup.tag(), EntityTag::Pickup);
//! assert!(pickup.as_tank().is_none());
//! ```

pub mod components;

use glam::Vec2;
use serde::{Deserialize, Serialize};
use std::fmt;

pub use components::{DamageOutcome, HealthState, StatusFlags, Team};

use crate::grenade::{FreezeGrenade, PickupGrenade};
use crate::shell::Shell;
use crate::tank::Tank;

/// Unique identifier for an entity.
///
/// Identifiers are assigned by the arena in increasing order and never
/// reused, so ordering by id is ordering by creation.
///
/// # Example
///
/// ```
/// use barrage_core::entity::EntityId;
///
/// let id1 = EntityId::new(1);
/// let id2 = EntityId::new(2);
///
/// assert!(id1 < id2);
/// assert_eq!(id1.as_u64(), 1);
/// ```
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EntityId(u64);

impl EntityId {
    /// Creates a new `EntityId` from a raw `u64` value.
    #[must_use]
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    /// Returns the raw `u64` value of this identifier.
    #[must_use]
    pub const fn as_u64(self) -> u64 {
        self.0
    }
}

impl fmt::Debug for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EntityId({})", self.0)
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for EntityId {
    fn from(id: u64) -> Self {
        Self::new(id)
    }
}

impl From<EntityId> for u64 {
    fn from(id: EntityId) -> Self {
        id.0
    }
}

/// Entity type tag.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityTag {
    /// AI-controlled tank.
    Tank,
    /// Artillery shell in flight.
    Shell,
    /// Freeze grenade thrown by the medic.
    FreezeGrenade,
    /// Grenade lying in the channel waiting to be collected.
    Pickup,
}

impl fmt::Display for EntityTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Tank => write!(f, "Tank"),
            Self::Shell => write!(f, "Shell"),
            Self::FreezeGrenade => write!(f, "FreezeGrenade"),
            Self::Pickup => write!(f, "Pickup"),
        }
    }
}

/// Type-safe storage for entity state.
///
/// The variant always matches the entity's [`EntityTag`]; the typed
/// constructors on [`Entity`] are the only way to build one.
#[derive(Debug, Clone)]
pub enum EntityInner {
    /// Tank state, boxed because it carries the AI brain and its generator.
    Tank(Box<Tank>),
    /// Shell state.
    Shell(Shell),
    /// Freeze grenade state.
    FreezeGrenade(FreezeGrenade),
    /// Pickup state.
    Pickup(PickupGrenade),
}

impl EntityInner {
    /// Returns the corresponding `EntityTag` for this inner storage.
    #[must_use]
    pub const fn tag(&self) -> EntityTag {
        match self {
            Self::Tank(_) => EntityTag::Tank,
            Self::Shell(_) => EntityTag::Shell,
            Self::FreezeGrenade(_) => EntityTag::FreezeGrenade,
            Self::Pickup(_) => EntityTag::Pickup,
        }
    }
}

/// A complete entity in the arena.
#[derive(Debug, Clone)]
pub struct Entity {
    id: EntityId,
    inner: EntityInner,
}

impl Entity {
    /// Wraps a tank.
    #[must_use]
    pub fn tank(id: EntityId, tank: Tank) -> Self {
        Self {
            id,
            inner: EntityInner::Tank(Box::new(tank)),
        }
    }

    /// Wraps a shell.
    #[must_use]
    pub const fn shell(id: EntityId, shell: Shell) -> Self {
        Self {
            id,
            inner: EntityInner::Shell(shell),
        }
    }

    /// Wraps a freeze grenade.
    #[must_use]
    pub const fn freeze_grenade(id: EntityId, grenade: FreezeGrenade) -> Self {
        Self {
            id,
            inner: EntityInner::FreezeGrenade(grenade),
        }
    }

    /// Wraps a grenade pickup.
    #[must_use]
    pub const fn pickup(id: EntityId, pickup: PickupGrenade) -> Self {
        Self {
            id,
            inner: EntityInner::Pickup(pickup),
        }
    }

    /// Returns the entity's unique identifier.
    #[must_use]
    pub const fn id(&self) -> EntityId {
        self.id
    }

    /// Returns the entity's type tag.
    #[must_use]
    pub const fn tag(&self) -> EntityTag {
        self.inner.tag()
    }

    /// Returns a reference to the entity's inner storage.
    #[must_use]
    pub const fn inner(&self) -> &EntityInner {
        &self.inner
    }

    /// Returns the entity's current position.
    #[must_use]
    pub fn position(&self) -> Vec2 {
        match &self.inner {
            EntityInner::Tank(tank) => tank.position,
            EntityInner::Shell(shell) => shell.position(),
            EntityInner::FreezeGrenade(grenade) => grenade.position(),
            EntityInner::Pickup(pickup) => pickup.position(),
        }
    }

    /// Returns the tank state if this is a tank.
    #[must_use]
    pub fn as_tank(&self) -> Option<&Tank> {
        match &self.inner {
            EntityInner::Tank(tank) => Some(&**tank),
            _ => None,
        }
    }

    /// Returns the mutable tank state if this is a tank.
    #[must_use]
    pub fn as_tank_mut(&mut self) -> Option<&mut Tank> {
        match &mut self.inner {
            EntityInner::Tank(tank) => Some(&mut **tank),
            _ => None,
        }
    }

    /// Returns the shell state if this is a shell.
    #[must_use]
    pub const fn as_shell(&self) -> Option<&Shell> {
        match &self.inner {
            EntityInner::Shell(shell) => Some(shell),
            _ => None,
        }
    }

    /// Returns the mutable shell state if this is a shell.
    #[must_use]
    pub fn as_shell_mut(&mut self) -> Option<&mut Shell> {
        match &mut self.inner {
            EntityInner::Shell(shell) => Some(shell),
            _ => None,
        }
    }

    /// Returns the freeze grenade state if this is one.
    #[must_use]
    pub const fn as_freeze_grenade(&self) -> Option<&FreezeGrenade> {
        match &self.inner {
            EntityInner::FreezeGrenade(grenade) => Some(grenade),
            _ => None,
        }
    }

    /// Returns the mutable freeze grenade state if this is one.
    #[must_use]
    pub fn as_freeze_grenade_mut(&mut self) -> Option<&mut FreezeGrenade> {
        match &mut self.inner {
            EntityInner::FreezeGrenade(grenade) => Some(grenade),
            _ => None,
        }
    }

    /// Returns the pickup state if this is a pickup.
    #[must_use]
    pub const fn as_pickup(&self) -> Option<&PickupGrenade> {
        match &self.inner {
            EntityInner::Pickup(pickup) => Some(pickup),
            _ => None,
        }
    }

    /// Returns mutable pickup state if this is a pickup.
    pub fn as_pickup_mut(&mut self) -> Option<&mut PickupGrenade> {
        match &mut self.inner {
            EntityInner::Pickup(pickup) => Some(pickup),
            _ => None,
        }
    }
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}", self.tag(), self.id)
    }
}
