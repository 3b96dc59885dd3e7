//! Outputs emitted by tank AI during the parallel phase.
//!
//! Tank AI runs in parallel and may only mutate the tank it is thinking for.
//! Anything that touches the rest of the world is returned as an [`Output`]
//! and applied afterwards by the [resolvers](crate::resolver).
//!
//! # Architecture
//!
//! - [`Command`]: a request to change world state (put a shell in flight)
//! - [`GameEvent`]: a notification for hosts (warning started, tank repaired)
//!
//! Every output is wrapped in an [`OutputEnvelope`] that records which tank
//! produced it, on which tick, and in what order. Envelopes are sorted by
//! `(source, sequence)` before resolution, so the result does not depend on
//! how rayon scheduled the tanks.
//!
//! # Example
//!
//! ```
//! use barrage_core::entity::EntityId;
//! use barrage_core::event::GameEvent;
//! use barrage_core::output::{sort_outputs, Output, OutputEnvelope, OutputKind};
//!
//! let mut outputs = vec![
//!     OutputEnvelope::new(Output::Event(GameEvent::TankRepaired { tank: EntityId::new(9) }), EntityId::new(9), 4, 0),
//!     OutputEnvelope::new(Output::Event(GameEvent::TankUnfrozen { tank: EntityId::new(2) }), EntityId::new(2), 4, 0),
//! ];
//! sort_outputs(&mut outputs);
//!
//! assert_eq!(outputs[0].source(), EntityId::new(2));
//! assert_eq!(outputs[0].output().kind(), OutputKind::Event);
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::entity::EntityId;
use crate::event::GameEvent;
use crate::shell::ShellLaunch;

// =============================================================================
// Commands
// =============================================================================

/// A request to change world state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Command {
    /// Put a new shell in flight.
    LaunchShell(ShellLaunch),
}

// =============================================================================
// Output
// =============================================================================

/// Routing category of an output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OutputKind {
    /// [`Output::Command`].
    Command,
    /// [`Output::Event`].
    Event,
}

impl fmt::Display for OutputKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Command => write!(f, "Command"),
            Self::Event => write!(f, "Event"),
        }
    }
}

/// Anything a tank's AI produces besides changes to itself.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Output {
    /// A world-state change request.
    Command(Command),
    /// A host notification.
    Event(GameEvent),
}

impl Output {
    /// Routing category.
    #[must_use]
    pub const fn kind(&self) -> OutputKind {
        match self {
            Self::Command(_) => OutputKind::Command,
            Self::Event(_) => OutputKind::Event,
        }
    }

    /// True for commands.
    #[must_use]
    pub const fn is_command(&self) -> bool {
        matches!(self, Self::Command(_))
    }

    /// True for events.
    #[must_use]
    pub const fn is_event(&self) -> bool {
        matches!(self, Self::Event(_))
    }
}

impl From<Command> for Output {
    fn from(command: Command) -> Self {
        Self::Command(command)
    }
}

impl From<GameEvent> for Output {
    fn from(event: GameEvent) -> Self {
        Self::Event(event)
    }
}

// =============================================================================
// Envelope
// =============================================================================

/// An output plus where and when it came from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputEnvelope {
    output: Output,
    source: EntityId,
    tick: u64,
    sequence: u32,
}

impl OutputEnvelope {
    /// Wraps `output` emitted by `source` as its `sequence`-th output of `tick`.
    #[must_use]
    pub const fn new(output: Output, source: EntityId, tick: u64, sequence: u32) -> Self {
        Self {
            output,
            source,
            tick,
            sequence,
        }
    }

    /// Wraps a batch of outputs from one tank, numbering them in order.
    ///
    /// A tank emits a handful of outputs per tick, so the `u32` sequence
    /// cannot overflow.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn wrap_all(outputs: Vec<Output>, source: EntityId, tick: u64) -> Vec<Self> {
        outputs
            .into_iter()
            .enumerate()
            .map(|(seq, output)| Self::new(output, source, tick, seq as u32))
            .collect()
    }

    /// The wrapped output.
    #[must_use]
    pub const fn output(&self) -> &Output {
        &self.output
    }

    /// Tank that emitted the output.
    #[must_use]
    pub const fn source(&self) -> EntityId {
        self.source
    }

    /// Tick of emission.
    #[must_use]
    pub const fn tick(&self) -> u64 {
        self.tick
    }

    /// Position among the source's outputs this tick.
    #[must_use]
    pub const fn sequence(&self) -> u32 {
        self.sequence
    }
}

/// Sorts envelopes into resolution order: by source, then sequence.
pub fn sort_outputs(outputs: &mut [OutputEnvelope]) {
    outputs.sort_by(|a, b| {
        a.source
            .cmp(&b.source)
            .then_with(|| a.sequence.cmp(&b.sequence))
    });
}
