//! Tank AI.
//!
//! Each tick every tank thinks once, in parallel with the others. Thinking
//! reads the shared [`WorldView`] and mutates only the thinking tank; anything
//! that affects the rest of the world comes back as [`Output`]s.
//!
//! # Architecture
//!
//! A tick of thought runs these stages in order:
//!
//! 1. **Status**: freeze and repair timers. A frozen or disabled tank stops
//!    here.
//! 2. **Target**: nearest enemy from the view.
//! 3. **Decision**: the [`DecisionSampler`] re-rolls when its timer runs out.
//! 4. **State**: [`AiState`] from distance and exposure.
//! 5. **Intent**: [`movement`] writes a raw direction for the state.
//! 6. **Steering**: [`steering`] snaps it to an axis, holds it for the commit
//!    window and moves the tank.
//! 7. **Weapon**: [`weapon`] starts a warning or fires.
//!
//! # Example
//!
//! ```
//! use barrage_core::ai::{think, AiContext, AiState};
//! use barrage_core::clock::TickContext;
//! use barrage_core::config::GameConfig;
//! use barrage_core::entity::{EntityId, HealthState, Team};
//! use barrage_core::personality::Personality;
//! use barrage_core::tank::Tank;
//! use barrage_core::world_view::{TankSnapshot, WorldView};
//! use glam::Vec2;
//!
//! let config = GameConfig::default();
//! let id = EntityId::new(1);
//! let mut tank = Tank::new(Vec2::new(100.0, 300.0), Team::Left, Personality::Sniper, &config, 1);
//! let view = WorldView::from_snapshots(
//!     0,
//!     vec![TankSnapshot::new(EntityId::new(2), Team::Right, Vec2::new(900.0, 300.0), HealthState::Healthy)],
//! );
//!
//! let ctx = AiContext::new(id, TickContext::at(0, 0), &config);
//! let _outputs = think(&mut tank, &ctx, &view);
//! assert_eq!(tank.brain().state(), AiState::SeekingCover);
//! ```

pub mod movement;
pub mod sensor;
pub mod steering;
pub mod weapon;

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::debug;

use crate::clock::{Millis, TickContext};
use crate::config::GameConfig;
use crate::decision::{Decision, DecisionSampler};
use crate::entity::EntityId;
use crate::event::GameEvent;
use crate::output::Output;
use crate::personality::PersonalityProfile;
use crate::tank::Tank;
use crate::world_view::WorldView;

// =============================================================================
// State
// =============================================================================

/// High-level AI state, re-evaluated every tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum AiState {
    /// No close threat: wander toward the fight.
    #[default]
    Patrol,
    /// Exposed at long range: break line of sight.
    SeekingCover,
    /// Within combat range: personality-specific fighting.
    Combat,
}

impl fmt::Display for AiState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Patrol => write!(f, "patrol"),
            Self::SeekingCover => write!(f, "seeking_cover"),
            Self::Combat => write!(f, "combat"),
        }
    }
}

/// Picks the AI state from the enemy distance and exposure.
///
/// Seeking cover wins over combat and patrol when exposed beyond 1.2x combat
/// range, unless the tank is feeling overconfident.
#[must_use]
pub fn select_state(
    distance: f32,
    exposed: bool,
    decision: Decision,
    profile: &PersonalityProfile,
) -> AiState {
    let combat_range = profile.combat_range();
    if exposed && distance > combat_range * 1.2 && decision != Decision::Overconfident {
        AiState::SeekingCover
    } else if distance < combat_range {
        AiState::Combat
    } else {
        AiState::Patrol
    }
}

// =============================================================================
// Brain
// =============================================================================

/// Per-tank AI memory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AiBrain {
    state: AiState,
    sampler: DecisionSampler,
    direction: Vec2,
    committed: Vec2,
    committed_at: Option<Millis>,
    commit_ms: Millis,
    last_wander_at: Option<Millis>,
    wander_interval_ms: Millis,
}

impl AiBrain {
    /// Fresh brain: patrolling, committed to moving down.
    pub fn new<R: Rng + ?Sized>(commit_ms: Millis, rng: &mut R) -> Self {
        Self {
            state: AiState::Patrol,
            sampler: DecisionSampler::new(rng),
            direction: Vec2::new(0.0, 1.0),
            committed: Vec2::new(0.0, 1.0),
            committed_at: None,
            commit_ms,
            last_wander_at: None,
            wander_interval_ms: rng.gen_range(2000..3000),
        }
    }

    /// Current state.
    #[must_use]
    pub const fn state(&self) -> AiState {
        self.state
    }

    /// Active decision.
    #[must_use]
    pub const fn decision(&self) -> Decision {
        self.sampler.decision()
    }

    /// The decision sampler.
    #[must_use]
    pub const fn sampler(&self) -> &DecisionSampler {
        &self.sampler
    }

    /// Pins a decision, overriding the sampler for `hold_ms`.
    pub fn force_decision(&mut self, decision: Decision, now: Millis, hold_ms: Millis) {
        self.sampler.force(decision, now, hold_ms);
    }

    /// Last movement vector (intent before steering, step after).
    #[must_use]
    pub const fn direction(&self) -> Vec2 {
        self.direction
    }

    /// Axis the tank is committed to.
    #[must_use]
    pub const fn committed_direction(&self) -> Vec2 {
        self.committed
    }
}

// =============================================================================
// Thinking
// =============================================================================

/// Everything a tank needs to think besides itself and the view.
#[derive(Debug, Clone, Copy)]
pub struct AiContext<'a> {
    /// The thinking tank.
    pub tank_id: EntityId,
    /// Current time.
    pub time: TickContext,
    /// Game tuning.
    pub config: &'a GameConfig,
}

impl<'a> AiContext<'a> {
    /// Creates a context.
    #[must_use]
    pub const fn new(tank_id: EntityId, time: TickContext, config: &'a GameConfig) -> Self {
        Self {
            tank_id,
            time,
            config,
        }
    }
}

/// Runs one tick of AI for `tank`.
pub fn think(tank: &mut Tank, ctx: &AiContext<'_>, view: &WorldView) -> Vec<Output> {
    let mut outputs = Vec::new();
    let now = ctx.time.now_ms;
    let id = ctx.tank_id;
    let arena = &ctx.config.arena;

    let status = tank.update_status(now);
    if status.unfrozen {
        debug!(tank = %id, "unfrozen");
        outputs.push(GameEvent::TankUnfrozen { tank: id }.into());
    }
    if status.repaired {
        debug!(tank = %id, team = %tank.team(), "repaired");
        outputs.push(GameEvent::TankRepaired { tank: id }.into());
    }
    if !status.can_act {
        tank.update_warning(now);
        return outputs;
    }

    let enemy = view.nearest_enemy(tank.team(), tank.position);
    let aggressiveness = tank.profile().aggressiveness;
    tank.brain.sampler.update(now, aggressiveness, &mut tank.rng);

    let state = match enemy {
        Some(enemy) => {
            let exposed = sensor::in_line_of_sight(tank.team(), tank.position, enemy.position, arena);
            let distance = tank.position.distance(enemy.position);
            let state = select_state(distance, exposed, tank.brain.sampler.decision(), tank.profile());
            match state {
                AiState::SeekingCover => movement::seek_cover(tank, enemy.position, arena),
                AiState::Combat => movement::combat(tank, enemy.position, arena),
                AiState::Patrol => movement::patrol(tank, Some(enemy.position), now, arena),
            }
            state
        }
        None => {
            movement::patrol(tank, None, now, arena);
            AiState::Patrol
        }
    };
    tank.brain.state = state;

    let direction = steering::commit(&mut tank.brain, now, &mut tank.rng);
    steering::execute(tank, direction, arena);
    weapon::fire(id, tank, enemy, now, ctx.config, &mut outputs);
    outputs
}
