//! Resolvers apply tank AI outputs to the arena.
//!
//! Tank AI runs in parallel and may only touch the thinking tank. Everything
//! else it wants (a shell in the air, a notification for the host) arrives
//! here as sorted [`OutputEnvelope`]s and is applied sequentially.
//!
//! # Architecture
//!
//! Each resolver declares which output kinds it handles via
//! [`Resolver::handles()`]. [`resolve_outputs`] routes the sorted envelopes to
//! every resolver in registration order and concatenates the events they
//! report:
//!
//! - [`CombatResolver`]: launches shells
//! - [`EventResolver`]: forwards AI events to the host
//! - [`PhysicsResolver`]: pushes overlapping tanks apart (runs every tick)
//!
//! The area effects shared by shells and grenades ([`apply_area_damage`],
//! [`apply_area_freeze`]) live alongside the combat resolver.
//!
//! # Invariants
//!
//! - Resolvers must be deterministic given the same arena and output order
//! - Resolvers iterate tanks in id order
//!
//! # Example
//!
//! ```
//! use barrage_core::arena::Arena;
//! use barrage_core::clock::TickContext;
//! use barrage_core::config::GameConfig;
//! use barrage_core::event::GameEvent;
//! use barrage_core::output::{OutputEnvelope, OutputKind};
//! use barrage_core::resolver::{ResolveContext, Resolver};
//!
//! struct Silent;
//!
//! impl Resolver for Silent {
//!     fn handles(&self) -> &[OutputKind] {
//!         &[OutputKind::Event]
//!     }
//!
//!     fn resolve(
//!         &self,
//!         _outputs: &[&OutputEnvelope],
//!         _ctx: &ResolveContext<'_>,
//!         _arena: &mut Arena,
//!     ) -> Vec<GameEvent> {
//!         Vec::new()
//!     }
//! }
//!
//! let config = GameConfig::default();
//! let ctx = ResolveContext::new(TickContext::at(0, 0), &config);
//! assert!(Silent.resolve(&[], &ctx, &mut Arena::new()).is_empty());
//! ```

mod combat;
mod event;
mod physics;

pub use combat::{apply_area_damage, apply_area_freeze, CombatResolver};
pub use event::EventResolver;
pub use physics::PhysicsResolver;

use crate::arena::Arena;
use crate::clock::TickContext;
use crate::config::GameConfig;
use crate::event::GameEvent;
use crate::output::{OutputEnvelope, OutputKind};

/// Time and tuning available to every resolver.
#[derive(Debug, Clone, Copy)]
pub struct ResolveContext<'a> {
    /// Current time.
    pub time: TickContext,
    /// Game tuning.
    pub config: &'a GameConfig,
}

impl<'a> ResolveContext<'a> {
    /// Creates a context.
    #[must_use]
    pub const fn new(time: TickContext, config: &'a GameConfig) -> Self {
        Self { time, config }
    }
}

/// Applies routed outputs to the arena.
///
/// # Implementation Guidelines
///
/// 1. **Determinism**: given the same arena and output order a resolver must
///    produce identical results and events.
/// 2. **Stale references**: an output may name a tank that was removed since
///    it thought. Such outputs are skipped, never fatal.
pub trait Resolver: Send + Sync {
    /// Output kinds routed to this resolver. An empty slice means the resolver
    /// runs for its side effects alone.
    fn handles(&self) -> &[OutputKind];

    /// Applies `outputs` and reports what happened.
    fn resolve(
        &self,
        outputs: &[&OutputEnvelope],
        ctx: &ResolveContext<'_>,
        arena: &mut Arena,
    ) -> Vec<GameEvent>;
}

/// The resolvers the simulation runs, in order.
#[must_use]
pub fn default_resolvers() -> Vec<Box<dyn Resolver>> {
    vec![
        Box::new(CombatResolver::new()),
        Box::new(EventResolver::new()),
        Box::new(PhysicsResolver::new()),
    ]
}

/// Routes `outputs` (already sorted) to each resolver by kind and collects
/// the reported events in resolver order.
pub fn resolve_outputs(
    resolvers: &[Box<dyn Resolver>],
    outputs: &[OutputEnvelope],
    ctx: &ResolveContext<'_>,
    arena: &mut Arena,
) -> Vec<GameEvent> {
    let mut events = Vec::new();
    for resolver in resolvers {
        let kinds = resolver.handles();
        let routed: Vec<&OutputEnvelope> = outputs
            .iter()
            .filter(|envelope| kinds.contains(&envelope.output().kind()))
            .collect();
        events.extend(resolver.resolve(&routed, ctx, arena));
    }
    events
}
