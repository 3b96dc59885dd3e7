//! Simulation time.
//!
//! Every timer in the game (cooldowns, freeze, repair, warning, bleed-out,
//! spawn cadence) is a difference between millisecond timestamps. Nothing in
//! the simulation reads the wall clock: the host feeds raw timestamps into a
//! [`SimClock`], which turns them into clamped simulation time, and the
//! resulting [`TickContext`] is passed into every update.
//!
//! # Delta clamping
//!
//! A frame never advances simulation time by more than
//! [`ClockConfig::max_frame_delta_ms`](crate::config::ClockConfig). After a
//! long pause (a backgrounded window, a debugger stop) the game resumes where
//! it left off instead of expiring every pending timer at once. Raw timestamps
//! that go backwards are treated as a zero delta.
//!
//! # Example
//!
//! ```
//! use barrage_core::clock::SimClock;
//!
//! let mut clock = SimClock::new(100);
//! let first = clock.advance(5_000);
//! assert_eq!(first.now_ms, 0);
//!
//! let second = clock.advance(5_016);
//! assert_eq!(second.now_ms, 16);
//!
//! // A ten second stall only advances one clamped frame.
//! let third = clock.advance(15_016);
//! assert_eq!(third.now_ms, 116);
//! assert_eq!(third.delta_ms, 100);
//! ```

use serde::{Deserialize, Serialize};

/// Simulation timestamp in milliseconds.
pub type Millis = u64;

/// Per-tick time context passed into every update.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TickContext {
    /// Tick counter, starting at 0.
    pub tick: u64,
    /// Current simulation time.
    pub now_ms: Millis,
    /// Simulation time elapsed since the previous tick (already clamped).
    pub delta_ms: Millis,
}

impl TickContext {
    /// Creates a context at an explicit time, mainly for tests.
    #[must_use]
    pub const fn at(tick: u64, now_ms: Millis) -> Self {
        Self {
            tick,
            now_ms,
            delta_ms: 0,
        }
    }
}

/// Converts raw host timestamps into monotonic, clamped simulation time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimClock {
    max_delta_ms: Millis,
    last_raw: Option<Millis>,
    now_ms: Millis,
    tick: u64,
}

impl SimClock {
    /// Creates a clock at simulation time 0.
    #[must_use]
    pub const fn new(max_delta_ms: Millis) -> Self {
        Self {
            max_delta_ms,
            last_raw: None,
            now_ms: 0,
            tick: 0,
        }
    }

    /// Feeds a raw host timestamp and returns the context for the new tick.
    ///
    /// The first reading only anchors the clock and yields time 0.
    pub fn advance(&mut self, raw_now: Millis) -> TickContext {
        let delta = match self.last_raw {
            Some(last) => raw_now.saturating_sub(last).min(self.max_delta_ms),
            None => 0,
        };
        self.last_raw = Some(raw_now);
        self.now_ms += delta;
        let ctx = TickContext {
            tick: self.tick,
            now_ms: self.now_ms,
            delta_ms: delta,
        };
        self.tick += 1;
        ctx
    }

    /// Forgets the last raw reading so the next frame starts with a zero delta.
    ///
    /// Used when resuming from pause.
    pub fn reanchor(&mut self) {
        self.last_raw = None;
    }

    /// Current simulation time.
    #[must_use]
    pub const fn now_ms(&self) -> Millis {
        self.now_ms
    }

    /// Number of ticks produced so far.
    #[must_use]
    pub const fn ticks(&self) -> u64 {
        self.tick
    }
}
