//! Event resolver for AI notifications.
//!
//! The `EventResolver` forwards [`GameEvent`]s produced by tank AI (warning
//! started, tank repaired, tank unfrozen) to the tick's event list. It does
//! not mutate the arena; it only logs and counts what passed through.

use std::sync::atomic::{AtomicU64, Ordering};

use tracing::trace;

use crate::arena::Arena;
use crate::event::GameEvent;
use crate::output::{Output, OutputEnvelope, OutputKind};

use super::{ResolveContext, Resolver};

/// Resolver that forwards AI events in resolution order.
///
/// # Example
///
/// ```
/// use barrage_core::resolver::{EventResolver, Resolver};
/// use barrage_core::output::OutputKind;
///
/// let resolver = EventResolver::new();
/// assert!(resolver.handles().contains(&OutputKind::Event));
/// assert_eq!(resolver.forwarded(), 0);
/// ```
#[derive(Debug, Default)]
pub struct EventResolver {
    forwarded: AtomicU64,
}

impl EventResolver {
    /// Creates a new event resolver.
    #[must_use]
    pub fn new() -> Self {
        Self {
            forwarded: AtomicU64::new(0),
        }
    }

    /// Total events forwarded since creation.
    #[must_use]
    pub fn forwarded(&self) -> u64 {
        self.forwarded.load(Ordering::Relaxed)
    }
}

impl Resolver for EventResolver {
    fn handles(&self) -> &[OutputKind] {
        &[OutputKind::Event]
    }

    fn resolve(
        &self,
        outputs: &[&OutputEnvelope],
        ctx: &ResolveContext<'_>,
        _arena: &mut Arena,
    ) -> Vec<GameEvent> {
        let events: Vec<GameEvent> = outputs
            .iter()
            .filter_map(|envelope| match envelope.output() {
                Output::Event(event) => {
                    trace!(source = %envelope.source(), tick = ctx.time.tick, ?event, "ai event");
                    Some(event.clone())
                }
                Output::Command(_) => None,
            })
            .collect();
        self.forwarded
            .fetch_add(events.len() as u64, Ordering::Relaxed);
        events
    }
}
