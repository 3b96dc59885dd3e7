//! The medic and the input that drives them.
//!
//! The medic moves only vertically, locked to the center of the channel. They
//! carry at most one soldier and a small stock of freeze grenades with a
//! throw cooldown.
//!
//! Input arrives once per tick as an [`InputState`]: the set of held keys
//! (movement) plus the keys pressed since the previous tick (grenade throws).

use bitflags::bitflags;
use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::clock::Millis;
use crate::config::{ArenaConfig, GameConfig};
use crate::geometry::safe_normalize;

bitflags! {
    /// Input identifiers the simulation understands.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
    pub struct InputKeys: u8 {
        /// Move toward the hospital.
        const MOVE_UP = 1 << 0;
        /// Move toward the soldier.
        const MOVE_DOWN = 1 << 1;
        /// Manual grenade, thrown up.
        const THROW_UP = 1 << 2;
        /// Manual grenade, thrown left.
        const THROW_LEFT = 1 << 3;
        /// Manual grenade, thrown down.
        const THROW_DOWN = 1 << 4;
        /// Manual grenade, thrown right.
        const THROW_RIGHT = 1 << 5;
        /// Fuse grenade, thrown away from the medic's destination.
        const THROW_DEFAULT = 1 << 6;
    }
}

/// Keys held and keys newly pressed this tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct InputState {
    /// Keys currently held down.
    pub held: InputKeys,
    /// Keys pressed since the previous tick.
    pub pressed: InputKeys,
}

impl InputState {
    /// No input.
    #[must_use]
    pub const fn idle() -> Self {
        Self {
            held: InputKeys::empty(),
            pressed: InputKeys::empty(),
        }
    }

    /// Holding `keys`.
    #[must_use]
    pub const fn holding(keys: InputKeys) -> Self {
        Self {
            held: keys,
            pressed: InputKeys::empty(),
        }
    }

    /// Pressing `keys` this tick.
    #[must_use]
    pub const fn pressing(keys: InputKeys) -> Self {
        Self {
            held: InputKeys::empty(),
            pressed: keys,
        }
    }
}

/// A directional grenade key. Each key tracks its own pending manual grenade.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum GrenadeKey {
    /// Throw up.
    Up,
    /// Throw left.
    Left,
    /// Throw down.
    Down,
    /// Throw right.
    Right,
}

impl GrenadeKey {
    /// Every key, in the order presses are processed.
    pub const ALL: [Self; 4] = [Self::Up, Self::Left, Self::Down, Self::Right];

    /// Unit throw direction.
    #[must_use]
    pub const fn direction(self) -> Vec2 {
        match self {
            Self::Up => Vec2::new(0.0, -1.0),
            Self::Left => Vec2::new(-1.0, 0.0),
            Self::Down => Vec2::new(0.0, 1.0),
            Self::Right => Vec2::new(1.0, 0.0),
        }
    }

    /// The input flag for this key.
    #[must_use]
    pub const fn input(self) -> InputKeys {
        match self {
            Self::Up => InputKeys::THROW_UP,
            Self::Left => InputKeys::THROW_LEFT,
            Self::Down => InputKeys::THROW_DOWN,
            Self::Right => InputKeys::THROW_RIGHT,
        }
    }
}

/// The medic.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    /// Body center.
    pub position: Vec2,
    size: f32,
    speed: f32,
    carrying: bool,
    grenades: u32,
    grenade_cooldown_ms: Millis,
    last_throw_at: Option<Millis>,
}

impl Player {
    /// Places the medic at the top of the channel with a full grenade stock.
    #[must_use]
    pub fn new(config: &GameConfig) -> Self {
        Self {
            position: Self::spawn_point(config),
            size: config.player.size,
            speed: config.player.speed,
            carrying: false,
            grenades: config.grenade.count,
            grenade_cooldown_ms: config.grenade.cooldown_ms,
            last_throw_at: None,
        }
    }

    /// Where the medic starts and respawns after a hit.
    #[must_use]
    pub fn spawn_point(config: &GameConfig) -> Vec2 {
        Vec2::new(config.arena.channel_center(), config.player.start_y)
    }

    /// Applies held movement keys and keeps the medic in the channel.
    pub fn update(&mut self, input: &InputState, arena: &ArenaConfig) {
        if input.held.contains(InputKeys::MOVE_UP) {
            self.position.y -= self.speed;
        }
        if input.held.contains(InputKeys::MOVE_DOWN) {
            self.position.y += self.speed;
        }
        self.position.y = self
            .position
            .y
            .clamp(self.size, (arena.height - self.size).max(self.size));
        self.position.x = arena.channel_center();
    }

    /// Body diameter.
    #[must_use]
    pub const fn size(&self) -> f32 {
        self.size
    }

    /// True while carrying the soldier.
    #[must_use]
    pub const fn is_carrying(&self) -> bool {
        self.carrying
    }

    /// Grenades in stock.
    #[must_use]
    pub const fn grenades(&self) -> u32 {
        self.grenades
    }

    /// Picks up the soldier.
    pub fn pick_up(&mut self) {
        self.carrying = true;
    }

    /// Puts the soldier down (delivered or lost).
    pub fn drop_soldier(&mut self) {
        self.carrying = false;
    }

    /// Adds one grenade from a pickup.
    pub fn add_grenade(&mut self) -> u32 {
        self.grenades += 1;
        self.grenades
    }

    /// True if a grenade is in stock and the cooldown has elapsed.
    #[must_use]
    pub fn can_throw(&self, now: Millis) -> bool {
        self.grenades > 0
            && self
                .last_throw_at
                .map_or(true, |t| now.saturating_sub(t) >= self.grenade_cooldown_ms)
    }

    /// Takes a grenade from stock and returns the normalized throw direction.
    ///
    /// A zero direction falls back to straight down.
    pub fn throw(&mut self, now: Millis, direction: Vec2) -> Option<Vec2> {
        if !self.can_throw(now) {
            return None;
        }
        self.grenades -= 1;
        self.last_throw_at = Some(now);
        Some(safe_normalize(direction))
    }

    /// Direction of a default throw: away from where the medic is heading.
    #[must_use]
    pub const fn default_throw_direction(&self) -> Vec2 {
        if self.carrying {
            Vec2::new(0.0, -1.0)
        } else {
            Vec2::new(0.0, 1.0)
        }
    }

    /// Sends the medic back to the spawn point empty-handed.
    pub fn respawn(&mut self, config: &GameConfig) {
        self.position = Self::spawn_point(config);
        self.carrying = false;
    }
}
