//! Audio boundary.
//!
//! The simulation never plays sound. After each tick it hands the tick's
//! events to an optional [`AudioSink`]: discrete cues go to
//! [`AudioSink::play`], shell whistles to [`AudioSink::start_whistle`] and
//! [`AudioSink::stop_whistle`]. Sinks must return promptly; the tick does not
//! wait for audio.
//!
//! # Example
//!
//! ```
//! use barrage_core::audio::{dispatch, AudioSink};
//! use barrage_core::entity::EntityId;
//! use barrage_core::event::{GameEvent, SoundCue};
//!
//! #[derive(Default)]
//! struct Log(Vec<SoundCue>);
//!
//! impl AudioSink for Log {
//!     fn play(&mut self, cue: SoundCue) {
//!         self.0.push(cue);
//!     }
//!     fn start_whistle(&mut self, _shell: EntityId) {}
//!     fn stop_whistle(&mut self, _shell: EntityId) {}
//! }
//!
//! let mut log = Log::default();
//! dispatch(&[GameEvent::PlayerHit { lives: 2 }], &mut log);
//! assert_eq!(log.0, vec![SoundCue::PlayerHit]);
//! ```

use crate::entity::EntityId;
use crate::event::{GameEvent, SoundCue};

/// Receives sound requests.
pub trait AudioSink: Send {
    /// Plays a one-shot cue.
    fn play(&mut self, cue: SoundCue);

    /// Starts the looping whistle of `shell`.
    fn start_whistle(&mut self, shell: EntityId);

    /// Stops the whistle of `shell`. Called at most once per shell.
    fn stop_whistle(&mut self, shell: EntityId);
}

/// Forwards `events` to `sink` in order.
pub fn dispatch(events: &[GameEvent], sink: &mut dyn AudioSink) {
    for event in events {
        match event {
            GameEvent::WhistleStarted { shell } => sink.start_whistle(*shell),
            GameEvent::WhistleStopped { shell } => sink.stop_whistle(*shell),
            other => {
                if let Some(cue) = other.sound() {
                    sink.play(cue);
                }
            }
        }
    }
}
