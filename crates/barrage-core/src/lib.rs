//! # Barrage Core
//!
//! Tank AI and artillery combat simulation for Barrage.
//!
//! Two AI tank armies face each other across a no-man's-land channel. A medic
//! runs up and down the channel to carry a bleeding soldier to the hospital,
//! dodging shells and freezing tanks with grenades. This crate is the whole
//! game minus drawing, sound and input wiring, which hosts plug in through
//! the render snapshot, [`audio::AudioSink`], [`hud::HudSink`] and
//! [`player::InputState`].
//!
//! ## Architecture
//!
//! - **Entities**: tanks, shells, freeze grenades, pickups, kept in an
//!   [`Arena`] with deterministic id order
//! - **AI**: each tank thinks in parallel against a frozen
//!   [`world_view::WorldView`] and returns outputs instead of touching others
//! - **Resolvers**: shell launches, AI events and tank repulsion are applied
//!   sequentially in sorted output order
//! - **Simulation**: the per-tick loop tying it together with the medic,
//!   the rescue loop, reinforcements and area effects
//!
//! ## Usage
//!
//! ```
//! use barrage_core::{GameConfig, InputKeys, InputState, Simulation};
//!
//! let mut sim = Simulation::new(GameConfig::default(), 7).expect("valid config");
//! sim.start();
//!
//! let mut events = Vec::new();
//! for frame in 0..120u64 {
//!     events.extend(sim.step(frame * 16, &InputState::holding(InputKeys::MOVE_DOWN)));
//! }
//!
//! let frame = sim.snapshot();
//! assert!(frame.player.position.y > 30.0);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

// Core modules
pub mod arena;
pub mod clock;
pub mod config;
pub mod entity;
pub mod error;
pub mod event;
pub mod geometry;

// Combatants
pub mod decision;
pub mod personality;
pub mod shell;
pub mod tank;
pub mod warning;

// Tank AI and resolution
pub mod ai;
pub mod output;
pub mod resolver;
pub mod world_view;

// Medic and rescue loop
pub mod grenade;
pub mod player;
pub mod profiles;
pub mod soldier;

// World loop
pub mod simulation;
pub mod spawn;

// Presentation boundaries
pub mod audio;
pub mod effects;
pub mod hud;
pub mod snapshot;

pub use arena::Arena;
pub use clock::{Millis, SimClock, TickContext};
pub use config::GameConfig;
pub use entity::{EntityId, Team};
pub use error::ConfigError;
pub use event::{GameEvent, SoundCue};
pub use personality::Personality;
pub use player::{GrenadeKey, InputKeys, InputState};
pub use simulation::{Phase, Simulation};
pub use snapshot::RenderSnapshot;

#[cfg(test)]
mod tests;
