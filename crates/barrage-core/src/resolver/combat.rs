//! Combat resolver and the area effects of shells and grenades.
//!
//! The `CombatResolver` turns [`Command::LaunchShell`] into a shell in the
//! arena and starts its whistle. The free functions below apply the two area
//! effects in the game:
//!
//! - [`apply_area_damage`]: one damage step to every enemy tank in radius
//! - [`apply_area_freeze`]: freezes every tank in radius, whichever team
//!
//! # Processing Order
//!
//! Tanks are visited in id order, so removal of destroyed tanks and the
//! resulting event order are deterministic.

use glam::Vec2;
use tracing::{debug, info};

use crate::arena::Arena;
use crate::clock::Millis;
use crate::entity::{DamageOutcome, Team};
use crate::event::GameEvent;
use crate::output::{Command, Output, OutputEnvelope, OutputKind};
use crate::shell::Shell;

use super::{ResolveContext, Resolver};

/// Resolver for shell launches.
///
/// # Example
///
/// ```
/// use barrage_core::resolver::{CombatResolver, Resolver};
/// use barrage_core::output::OutputKind;
///
/// let resolver = CombatResolver::new();
/// assert_eq!(resolver.handles(), &[OutputKind::Command]);
/// ```
#[derive(Debug, Clone, Default)]
pub struct CombatResolver;

impl CombatResolver {
    /// Creates a new combat resolver.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    fn launch(arena: &mut Arena, command: &Command) -> Vec<GameEvent> {
        let Command::LaunchShell(launch) = command;
        if !arena.contains(launch.owner) {
            return Vec::new();
        }
        let mut shell = Shell::launch(launch);
        let whistling = shell.start_whistle();
        let id = arena.spawn_shell(shell);
        debug!(tank = %launch.owner, shell = %id, team = %launch.team, "shell in flight");

        let mut events = vec![GameEvent::TankShot {
            tank: launch.owner,
            shell: id,
            team: launch.team,
        }];
        if whistling {
            events.push(GameEvent::WhistleStarted { shell: id });
        }
        events
    }
}

impl Resolver for CombatResolver {
    fn handles(&self) -> &[OutputKind] {
        &[OutputKind::Command]
    }

    fn resolve(
        &self,
        outputs: &[&OutputEnvelope],
        _ctx: &ResolveContext<'_>,
        arena: &mut Arena,
    ) -> Vec<GameEvent> {
        outputs
            .iter()
            .filter_map(|envelope| match envelope.output() {
                Output::Command(command) => Some(command),
                Output::Event(_) => None,
            })
            .flat_map(|command| Self::launch(arena, command))
            .collect()
    }
}

// =============================================================================
// Area effects
// =============================================================================

/// Applies one damage step to every tank not on `attacker`'s team within
/// `radius` (inclusive) of `center`.
///
/// Destroyed tanks are removed from the arena. Each hit also cancels the
/// tank's shooting warning.
pub fn apply_area_damage(
    arena: &mut Arena,
    center: Vec2,
    radius: f32,
    attacker: Team,
    now: Millis,
) -> Vec<GameEvent> {
    let mut events = Vec::new();
    for id in arena.tanks_within(center, radius, Some(attacker.opponent())) {
        let Some(tank) = arena.tank_mut(id) else {
            continue;
        };
        let team = tank.team();
        match tank.take_damage(now) {
            DamageOutcome::Destroyed => {
                arena.despawn(id);
                info!(tank = %id, %team, "tank destroyed");
                events.push(GameEvent::TankDestroyed { tank: id, team });
            }
            DamageOutcome::Disabled => {
                info!(tank = %id, %team, "tank disabled");
                events.push(GameEvent::TankDisabled { tank: id });
            }
            DamageOutcome::Damaged => {}
        }
    }
    events
}

/// Freezes every tank within `radius` (inclusive) of `center` until
/// `now + duration_ms`. Returns how many tanks were frozen.
pub fn apply_area_freeze(arena: &mut Arena, center: Vec2, radius: f32, now: Millis, duration_ms: Millis) -> usize {
    let targets = arena.tanks_within(center, radius, None);
    for &id in &targets {
        if let Some(tank) = arena.tank_mut(id) {
            tank.freeze(now, Some(duration_ms));
        }
    }
    targets.len()
}
